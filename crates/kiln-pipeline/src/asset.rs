use std::path::{Path, PathBuf};

use crate::transform::TransformError;

/// A file flowing through a stage.
///
/// `path` is relative to the glob base it was matched under and becomes the
/// output path relative to the stage's output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub path: PathBuf,
    pub contents: Vec<u8>,
}

impl Asset {
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }

    /// Contents as UTF-8 text, required by every text transform.
    pub fn text(&self) -> Result<&str, TransformError> {
        std::str::from_utf8(&self.contents)
            .map_err(|e| TransformError::new(format!("not valid UTF-8: {}", e)))
    }

    /// Replace the contents, keeping the path.
    pub fn with_contents(self, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            path: self.path,
            contents: contents.into(),
        }
    }

    /// Swap the file extension (`style.styl` → `style.css`).
    pub fn with_extension(mut self, extension: &str) -> Self {
        self.path.set_extension(extension);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_extension_renames_only_the_suffix() {
        let asset = Asset::new("themes/dark.styl", "a {}").with_extension("css");
        assert_eq!(asset.path(), Path::new("themes/dark.css"));
        assert_eq!(asset.text().unwrap(), "a {}");
    }

    #[test]
    fn text_rejects_binary_contents() {
        let asset = Asset::new("logo.png", vec![0xff, 0xfe, 0x00]);
        assert!(asset.text().is_err());
        assert_eq!(asset.len(), 3);
    }
}
