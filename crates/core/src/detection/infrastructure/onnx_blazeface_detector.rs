//! BlazeFace (short-range) face detector running on ONNX Runtime via `ort`.
//!
//! Fast upright-face detector with no tracking or landmarks, which is all
//! the rotation sweep needs from its detector.

use std::path::Path;

use crate::detection::domain::candidate_ranker::rank;
use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::infrastructure::execution_provider::load_session;
use crate::shared::frame::Frame;
use crate::shared::rectangle::Rectangle;

/// BlazeFace model input resolution.
const INPUT_SIZE: u32 = 128;

/// Default confidence threshold.
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

/// NMS IoU threshold within a single raster.
const NMS_IOU_THRESH: f64 = 0.3;

/// Number of BlazeFace anchors (short-range model).
const NUM_ANCHORS: usize = 896;

/// Values per anchor in the regressor output (box + 6 keypoints).
const REGRESSOR_STRIDE: usize = 16;

pub struct OnnxBlazefaceDetector {
    session: ort::session::Session,
    confidence: f64,
    anchors: Vec<[f32; 2]>,
}

impl OnnxBlazefaceDetector {
    pub fn new(model_path: &Path, confidence: f64) -> Result<Self, Box<dyn std::error::Error>> {
        let session = load_session(model_path)?;
        log::info!("Loaded BlazeFace model from {}", model_path.display());
        Ok(Self {
            session,
            confidence,
            anchors: generate_anchors(),
        })
    }
}

impl FaceDetector for OnnxBlazefaceDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Rectangle>, Box<dyn std::error::Error>> {
        if frame.is_empty() {
            return Ok(Vec::new());
        }

        let input_tensor = preprocess(frame, INPUT_SIZE);
        let input_value = ort::value::Tensor::from_array(input_tensor)?;
        let outputs = self.session.run(ort::inputs![input_value])?;

        // regressors: [1, 896, 16], classificators: [1, 896, 1]
        if outputs.len() < 2 {
            return Err(
                format!("BlazeFace model expected 2 outputs, got {}", outputs.len()).into(),
            );
        }

        let regressors = outputs[0].try_extract_array::<f32>()?;
        let scores = outputs[1].try_extract_array::<f32>()?;
        let reg_data = regressors.as_slice().ok_or("Cannot get regressor slice")?;
        let score_data = scores.as_slice().ok_or("Cannot get score slice")?;

        let candidates = decode(
            reg_data,
            score_data,
            &self.anchors,
            self.confidence,
            frame.width() as f64,
            frame.height() as f64,
        );
        Ok(nms(&candidates, NMS_IOU_THRESH))
    }
}

/// Resize to `size × size`, normalize to [0,1], NCHW. Gray frames are
/// replicated across the three input channels.
fn preprocess(frame: &Frame, size: u32) -> ndarray::Array4<f32> {
    let src = frame.as_ndarray();
    let src_h = frame.height() as usize;
    let src_w = frame.width() as usize;
    let last_channel = frame.channels().saturating_sub(1) as usize;
    let s = size as usize;

    let mut tensor = ndarray::Array4::<f32>::zeros((1, 3, s, s));

    for y in 0..s {
        let src_y = (((y as f64 + 0.5) * src_h as f64 / s as f64) as usize).min(src_h - 1);
        for x in 0..s {
            let src_x = (((x as f64 + 0.5) * src_w as f64 / s as f64) as usize).min(src_w - 1);
            for c in 0..3 {
                tensor[[0, c, y, x]] = src[[src_y, src_x, c.min(last_channel)]] as f32 / 255.0;
            }
        }
    }

    tensor
}

/// Turns raw anchor outputs into scored rectangles in frame pixels.
fn decode(
    reg_data: &[f32],
    score_data: &[f32],
    anchors: &[[f32; 2]],
    confidence: f64,
    frame_w: f64,
    frame_h: f64,
) -> Vec<Rectangle> {
    let size = INPUT_SIZE as f32;
    let mut rects = Vec::new();

    for (i, (&raw_score, anchor)) in score_data.iter().zip(anchors).enumerate() {
        let score = sigmoid(raw_score) as f64;
        if score < confidence {
            continue;
        }
        let offset = i * REGRESSOR_STRIDE;
        let Some(reg) = reg_data.get(offset..offset + 4) else {
            break;
        };

        let cx = (anchor[0] + reg[0] / size) as f64;
        let cy = (anchor[1] + reg[1] / size) as f64;
        let w = (reg[2] / size) as f64;
        let h = (reg[3] / size) as f64;

        let x1 = ((cx - w / 2.0) * frame_w).max(0.0);
        let y1 = ((cy - h / 2.0) * frame_h).max(0.0);
        let x2 = ((cx + w / 2.0) * frame_w).min(frame_w);
        let y2 = ((cy + h / 2.0) * frame_h).min(frame_h);
        if x2 <= x1 || y2 <= y1 {
            continue;
        }

        rects.push(Rectangle::new(x1, y1, x2 - x1, y2 - y1, score));
    }

    rects
}

/// Short-range anchors: a 16×16 grid with 2 anchors per cell followed by
/// an 8×8 grid with 6.
fn generate_anchors() -> Vec<[f32; 2]> {
    let strides = [(8, 2), (16, 6)]; // (stride, anchors_per_cell)
    let mut anchors = Vec::with_capacity(NUM_ANCHORS);

    for &(stride, num) in &strides {
        let grid_size = INPUT_SIZE as usize / stride;
        for y in 0..grid_size {
            for x in 0..grid_size {
                let cx = (x as f32 + 0.5) / grid_size as f32;
                let cy = (y as f32 + 0.5) / grid_size as f32;
                for _ in 0..num {
                    anchors.push([cx, cy]);
                }
            }
        }
    }

    anchors
}

/// Greedy NMS, highest confidence first.
fn nms(rects: &[Rectangle], iou_thresh: f64) -> Vec<Rectangle> {
    let mut keep: Vec<Rectangle> = Vec::new();
    for r in rank(rects, rects.len()) {
        if keep.iter().all(|k| k.iou(&r) <= iou_thresh) {
            keep.push(r);
        }
    }
    keep
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}
