pub mod bilinear_rotated_view_provider;
pub mod execution_provider;
pub mod image_frame_resizer;
pub mod onnx_blazeface_detector;
