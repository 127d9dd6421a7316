use std::borrow::Cow;
use std::time::Instant;

use crate::detection::domain::candidate_ranker::rank;
use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::domain::frame_resizer::FrameResizer;
use crate::detection::domain::rotated_view_provider::RotatedViewProvider;
use crate::detection::domain::rotation_plan::RotationPlan;
use crate::detection::domain::stabilizer::{Stabilizer, StabilizerState};
use crate::detection::domain::working_surface::WorkingSurface;
use crate::pipeline::frame_scanner::FrameScanner;
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::shared::frame::Frame;
use crate::shared::rectangle::Rectangle;
use crate::shared::source_metadata::SourceMetadata;
use crate::shared::sweep_config::SweepConfig;
use crate::shared::sweep_error::SweepError;
use crate::video::domain::frame_source::FrameSource;

/// Result of one tick.
///
/// Rectangles are in working-raster coordinates; `display_scale` maps them
/// to source pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct TickOutcome {
    pub frame_index: usize,
    pub display_scale: f64,
    /// Up to `top_n` candidates, most confident first.
    pub candidates: Vec<Rectangle>,
    /// The box to draw this tick, if any.
    pub stabilized: Option<Rectangle>,
}

impl TickOutcome {
    fn withheld(frame_index: usize) -> Self {
        Self {
            frame_index,
            display_scale: 1.0,
            candidates: Vec::new(),
            stabilized: None,
        }
    }

    pub fn stabilized_in_source(&self) -> Option<Rectangle> {
        self.stabilized.map(|r| r.scaled(self.display_scale))
    }
}

/// Per-frame multi-angle face detection with temporal hysteresis.
///
/// Each [`tick`](Self::tick) scales the frame to the working raster, sweeps
/// the rotation plan, ranks every candidate by confidence and passes the
/// winner through the stabilizer. Ticks never fail: anything that goes
/// wrong inside one is logged and the tick withholds its result.
pub struct RotationSweepUseCase {
    config: SweepConfig,
    plan: RotationPlan,
    scanner: FrameScanner,
    resizer: Box<dyn FrameResizer>,
    stabilizer: Stabilizer,
    state: StabilizerState,
    surface: Option<WorkingSurface>,
    logger: Box<dyn PipelineLogger>,
}

impl RotationSweepUseCase {
    pub fn new(
        config: SweepConfig,
        provider: Box<dyn RotatedViewProvider>,
        detector: Box<dyn FaceDetector>,
        resizer: Box<dyn FrameResizer>,
        logger: Box<dyn PipelineLogger>,
    ) -> Result<Self, SweepError> {
        config.validate()?;
        let plan = RotationPlan::generate(config.rotation_range, config.rotation_step)?;
        let stabilizer = Stabilizer::new(config.rect_change_threshold, config.change_metric);
        log::debug!(
            "Sweeping {} angle(s) over ±{:.3} rad",
            plan.len(),
            config.rotation_range / 2.0
        );

        Ok(Self {
            config,
            plan,
            scanner: FrameScanner::new(provider, detector),
            resizer,
            stabilizer,
            state: StabilizerState::new(),
            surface: None,
            logger,
        })
    }

    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    pub fn plan(&self) -> &RotationPlan {
        &self.plan
    }

    pub fn working_surface(&self) -> Option<&WorkingSurface> {
        self.surface.as_ref()
    }

    pub fn stabilizer_state(&self) -> &StabilizerState {
        &self.state
    }

    /// Forgets the held rectangle; the next detection is shown as is.
    pub fn reset(&mut self) {
        self.state.reset();
    }

    pub fn tick(&mut self, frame: &Frame) -> TickOutcome {
        if frame.is_empty() {
            log::warn!("{}", SweepError::EmptyFrame { index: frame.index() });
            return TickOutcome::withheld(frame.index());
        }

        let surface = self.surface_for(frame);
        let working = if surface.matches_source() {
            Cow::Borrowed(frame)
        } else {
            match self.resizer.resize(frame, surface.width(), surface.height()) {
                Ok(resized) => Cow::Owned(resized),
                Err(e) => {
                    log::warn!("frame {}: resize failed: {e}", frame.index());
                    return TickOutcome::withheld(frame.index());
                }
            }
        };

        let started = Instant::now();
        let candidates = self
            .scanner
            .scan(&working, &self.plan, surface.center());
        self.logger.timing("scan", elapsed_ms(started));
        self.logger.metric("candidates", candidates.len() as f64);

        let started = Instant::now();
        let ranked = rank(&candidates, self.config.top_n);
        self.logger.timing("rank", elapsed_ms(started));

        let started = Instant::now();
        let stabilized = ranked
            .first()
            .map(|best| self.stabilizer.stabilize(*best, &mut self.state));
        self.logger.timing("stabilize", elapsed_ms(started));

        TickOutcome {
            frame_index: frame.index(),
            display_scale: surface.display_scale(),
            candidates: ranked,
            stabilized,
        }
    }

    /// Ticks over every frame of an opened source, handing each outcome to
    /// `on_outcome`. Returns the number of frames processed.
    pub fn execute(
        &mut self,
        source: &mut dyn FrameSource,
        metadata: &SourceMetadata,
        on_outcome: &mut dyn FnMut(&TickOutcome) -> Result<(), Box<dyn std::error::Error>>,
    ) -> Result<usize, Box<dyn std::error::Error>> {
        let total = metadata.total_frames;
        let mut processed = 0;

        for frame in source.frames() {
            let frame = frame?;
            let outcome = self.tick(&frame);
            on_outcome(&outcome)?;
            processed += 1;
            self.logger.progress(processed, total);
        }

        source.close();
        self.logger.summary();
        Ok(processed)
    }

    /// Working surface for `frame`, re-derived when the source size changes.
    ///
    /// The held rectangle lives in working-raster coordinates, so it is
    /// dropped when the working raster itself changes size.
    fn surface_for(&mut self, frame: &Frame) -> WorkingSurface {
        match self.surface {
            Some(surface) if surface.source_dimensions() == frame.dimensions() => surface,
            previous => {
                let surface =
                    WorkingSurface::new(frame.width(), frame.height(), self.config.max_work_size);
                let raster_changed = previous.is_some_and(|p| {
                    (p.width(), p.height()) != (surface.width(), surface.height())
                });
                if raster_changed && self.state.is_tracking() {
                    log::debug!("Working raster resized; dropping held rectangle");
                    self.state.reset();
                }
                self.logger.info(&format!(
                    "Working raster {}x{} for {}x{} source",
                    surface.width(),
                    surface.height(),
                    frame.width(),
                    frame.height()
                ));
                self.surface = Some(surface);
                surface
            }
        }
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}
