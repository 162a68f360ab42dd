//! Where sheets live on disk

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::format::FileFormat;

/// Root directory used when none is configured
pub const DEFAULT_ROOT: &str = "assets/Excel";

/// Settings shared by every save/load of a [`Sheet`](crate::Sheet)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetConfig {
    /// Directory every sheet path is resolved against
    pub root: PathBuf,
}

impl SheetConfig {
    /// Create a config rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Full path of `path` saved as `format`: `<root>/<path>.<extension>`
    ///
    /// `path` is given without an extension and may contain directories.
    pub fn resolve(&self, path: impl AsRef<Path>, format: FileFormat) -> PathBuf {
        let mut full: OsString = self.root.join(path).into_os_string();
        full.push(".");
        full.push(format.extension());
        PathBuf::from(full)
    }
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve() {
        let config = SheetConfig::new("data");
        assert_eq!(
            config.resolve("test", FileFormat::Xlsx),
            Path::new("data").join("test.xlsx")
        );
        assert_eq!(
            config.resolve("levels/one", FileFormat::Csv),
            Path::new("data").join("levels/one.csv")
        );
    }

    #[test]
    fn test_extension_is_appended_not_replaced() {
        let config = SheetConfig::new("r");
        assert_eq!(
            config.resolve("a.b", FileFormat::Csv),
            Path::new("r").join("a.b.csv")
        );
    }

    #[test]
    fn test_default_root() {
        assert_eq!(SheetConfig::default().root, PathBuf::from(DEFAULT_ROOT));
    }
}
