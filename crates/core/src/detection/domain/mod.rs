pub mod candidate_ranker;
pub mod coordinate_transformer;
pub mod face_detector;
pub mod frame_resizer;
pub mod rotated_view_provider;
pub mod rotation_plan;
pub mod stabilizer;
pub mod working_surface;
