use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use serde_json::json;

use tiltface_core::detection::domain::face_detector::FaceDetector;
use tiltface_core::detection::domain::stabilizer::ChangeMetric;
use tiltface_core::detection::infrastructure::bilinear_rotated_view_provider::BilinearRotatedViewProvider;
use tiltface_core::detection::infrastructure::image_frame_resizer::ImageFrameResizer;
use tiltface_core::detection::infrastructure::onnx_blazeface_detector::{
    OnnxBlazefaceDetector, DEFAULT_CONFIDENCE,
};
use tiltface_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use tiltface_core::pipeline::rotation_sweep_use_case::{RotationSweepUseCase, TickOutcome};
use tiltface_core::shared::constants::{
    DEFAULT_MAX_WORK_SIZE, DEFAULT_RECT_CHANGE_THRESHOLD, DEFAULT_ROTATION_RANGE,
    DEFAULT_ROTATION_STEP, DEFAULT_TOP_N,
};
use tiltface_core::shared::sweep_config::SweepConfig;
use tiltface_core::video::domain::frame_source::FrameSource;
use tiltface_core::video::infrastructure::image_file_reader::ImageFileReader;
use tiltface_core::video::infrastructure::image_sequence_reader::{
    is_image_path, ImageSequenceReader,
};

/// Tilt-tolerant face detection over an image or a directory of frames.
///
/// Writes one JSON object per frame: the stabilized face box in source
/// pixels (or null) and the ranked candidates behind it.
#[derive(Parser)]
#[command(name = "tiltface")]
struct Cli {
    /// Input image, or a directory whose images are read in name order.
    input: PathBuf,

    /// BlazeFace ONNX model (128x128 front-camera variant).
    #[arg(long)]
    model: PathBuf,

    /// Face detection confidence threshold (0.0-1.0).
    #[arg(long, default_value_t = DEFAULT_CONFIDENCE)]
    confidence: f64,

    /// Longest side of the working raster, in pixels.
    #[arg(long, default_value_t = DEFAULT_MAX_WORK_SIZE)]
    max_work_size: u32,

    /// Total angular sweep in radians, centered on upright.
    #[arg(long, default_value_t = DEFAULT_ROTATION_RANGE)]
    rotation_range: f64,

    /// Increment between scanned angles, in radians.
    #[arg(long, default_value_t = DEFAULT_ROTATION_STEP)]
    rotation_step: f64,

    /// Minimum box change (working-raster pixels) before the output moves.
    #[arg(long, default_value_t = DEFAULT_RECT_CHANGE_THRESHOLD)]
    rect_change_threshold: f64,

    /// Candidates reported per frame.
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    top_n: usize,

    /// Count vertical motion in the box change as well.
    #[arg(long)]
    symmetric_delta: bool,

    /// JSON-lines output file (stdout when omitted).
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let mut source = open_source(&cli.input);
    let metadata = source.open(&cli.input)?;
    log::info!(
        "Opened {} ({}x{}, {} frame(s))",
        cli.input.display(),
        metadata.width,
        metadata.height,
        metadata.total_frames
    );

    let detector: Box<dyn FaceDetector> =
        Box::new(OnnxBlazefaceDetector::new(&cli.model, cli.confidence)?);
    let mut use_case = RotationSweepUseCase::new(
        sweep_config(&cli),
        Box::new(BilinearRotatedViewProvider::default()),
        detector,
        Box::new(ImageFrameResizer::default()),
        Box::new(StdoutPipelineLogger::default()),
    )?;

    let mut sink: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let mut detected = 0;
    let processed = use_case.execute(source.as_mut(), &metadata, &mut |outcome| {
        if outcome.stabilized.is_some() {
            detected += 1;
        }
        writeln!(sink, "{}", outcome_json(outcome))?;
        Ok(())
    })?;
    sink.flush()?;

    log::info!("Face found in {detected}/{processed} frame(s)");
    if let Some(path) = &cli.output {
        log::info!("Output written to {}", path.display());
    }
    Ok(())
}

fn sweep_config(cli: &Cli) -> SweepConfig {
    SweepConfig {
        max_work_size: cli.max_work_size,
        rotation_range: cli.rotation_range,
        rotation_step: cli.rotation_step,
        rect_change_threshold: cli.rect_change_threshold,
        top_n: cli.top_n,
        change_metric: if cli.symmetric_delta {
            ChangeMetric::Symmetric
        } else {
            ChangeMetric::Observed
        },
    }
}

fn outcome_json(outcome: &TickOutcome) -> serde_json::Value {
    let candidates: Vec<_> = outcome
        .candidates
        .iter()
        .map(|r| r.scaled(outcome.display_scale))
        .collect();
    json!({
        "frame": outcome.frame_index,
        "face": outcome.stabilized_in_source(),
        "candidates": candidates,
    })
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.input.exists() {
        return Err(format!("Input not found: {}", cli.input.display()).into());
    }
    if !cli.input.is_dir() && !is_image_path(&cli.input) {
        return Err(format!(
            "Input must be an image or a directory of images: {}",
            cli.input.display()
        )
        .into());
    }
    if !cli.model.is_file() {
        return Err(format!("Model file not found: {}", cli.model.display()).into());
    }
    if !(0.0..=1.0).contains(&cli.confidence) {
        return Err(format!(
            "Confidence must be between 0.0 and 1.0, got {}",
            cli.confidence
        )
        .into());
    }
    sweep_config(cli).validate()?;
    Ok(())
}

fn open_source(input: &Path) -> Box<dyn FrameSource> {
    if input.is_dir() {
        Box::new(ImageSequenceReader::new())
    } else {
        Box::new(ImageFileReader::new())
    }
}
