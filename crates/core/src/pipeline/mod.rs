pub mod frame_scanner;
pub mod pipeline_logger;
pub mod rotation_sweep_use_case;
