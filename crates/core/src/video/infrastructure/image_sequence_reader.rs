use std::fs;
use std::path::{Path, PathBuf};

use crate::shared::constants::IMAGE_EXTENSIONS;
use crate::shared::frame::Frame;
use crate::shared::source_metadata::SourceMetadata;
use crate::video::domain::frame_source::FrameSource;
use crate::video::infrastructure::image_file_reader::load_rgb_frame;

/// Treats a directory of images as a frame sequence, in file-name order.
///
/// Frames are decoded lazily, one per iteration step.
pub struct ImageSequenceReader {
    paths: Option<Vec<PathBuf>>,
}

impl ImageSequenceReader {
    pub fn new() -> Self {
        Self { paths: None }
    }
}

impl Default for ImageSequenceReader {
    fn default() -> Self {
        Self::new()
    }
}

pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

impl FrameSource for ImageSequenceReader {
    fn open(&mut self, path: &Path) -> Result<SourceMetadata, Box<dyn std::error::Error>> {
        let mut paths: Vec<PathBuf> = fs::read_dir(path)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && is_image_path(p))
            .collect();
        paths.sort();

        let first = paths
            .first()
            .ok_or_else(|| format!("no images found in {}", path.display()))?;
        let (width, height) = image::image_dimensions(first)?;
        log::debug!("Found {} images in {}", paths.len(), path.display());

        let metadata = SourceMetadata {
            width,
            height,
            total_frames: paths.len(),
            source_path: Some(path.to_path_buf()),
        };
        self.paths = Some(paths);
        Ok(metadata)
    }

    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_> {
        let Some(paths) = &self.paths else {
            return Box::new(std::iter::once(Err("ImageSequenceReader: not opened".into())));
        };
        Box::new(
            paths
                .iter()
                .enumerate()
                .map(|(index, p)| load_rgb_frame(p, index)),
        )
    }

    fn close(&mut self) {
        self.paths = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_image(dir: &Path, name: &str, shade: u8) {
        let img = image::RgbImage::from_pixel(8, 6, image::Rgb([shade, shade, shade]));
        img.save(dir.join(name)).unwrap();
    }

    #[test]
    fn test_is_image_path() {
        assert!(is_image_path(Path::new("a/b.PNG")));
        assert!(is_image_path(Path::new("frame.jpeg")));
        assert!(!is_image_path(Path::new("notes.txt")));
        assert!(!is_image_path(Path::new("no_extension")));
    }

    #[test]
    fn test_frames_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        write_image(dir.path(), "002.png", 20);
        write_image(dir.path(), "001.png", 10);
        write_image(dir.path(), "003.png", 30);
        fs::write(dir.path().join("readme.txt"), "skip me").unwrap();

        let mut reader = ImageSequenceReader::new();
        let meta = reader.open(dir.path()).unwrap();
        assert_eq!(meta.total_frames, 3);
        assert_eq!((meta.width, meta.height), (8, 6));

        let frames: Vec<Frame> = reader.frames().collect::<Result<_, _>>().unwrap();
        let shades: Vec<u8> = frames.iter().map(|f| f.data()[0]).collect();
        let indices: Vec<usize> = frames.iter().map(|f| f.index()).collect();
        assert_eq!(shades, vec![10, 20, 30]);
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_empty_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ImageSequenceReader::new().open(dir.path()).is_err());
    }

    #[test]
    fn test_frames_without_open_returns_error() {
        let mut reader = ImageSequenceReader::new();
        assert!(reader.frames().next().unwrap().is_err());
    }
}
