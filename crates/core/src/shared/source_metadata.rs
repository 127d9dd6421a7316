use std::path::PathBuf;

/// Describes an opened frame source.
///
/// `width`/`height` are the size of the first frame; later frames may
/// differ, which the sweep treats as a resize.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceMetadata {
    pub width: u32,
    pub height: u32,
    pub total_frames: usize,
    pub source_path: Option<PathBuf>,
}
