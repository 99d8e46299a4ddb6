/// Library configuration, loaded from an optional JSON file.
///
/// Every field has a default, so an empty object (or no file at all) gives
/// a usable configuration.
use crate::error::{Result, TreeError};
use crate::filter::{AudioExtensions, DEFAULT_AUDIO_EXTENSIONS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name used for the persisted tree when none is configured.
pub const DEFAULT_LIBRARY_FILE: &str = "audiotree.tsv";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Extensions (without the dot) of files kept in the tree.
    pub audio_extensions: Vec<String>,

    /// Where the persisted tree is written and read.
    pub library_file: PathBuf,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            audio_extensions: DEFAULT_AUDIO_EXTENSIONS
                .iter()
                .map(|ext| (*ext).to_owned())
                .collect(),
            library_file: PathBuf::from(DEFAULT_LIBRARY_FILE),
        }
    }
}

impl LibraryConfig {
    /// Read and validate a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| TreeError::io(path, e))?;
        let config: Self = serde_json::from_str(&text).map_err(|source| TreeError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.audio_filter()?;
        Ok(config)
    }

    /// Build the extension allow-list this configuration describes.
    pub fn audio_filter(&self) -> Result<AudioExtensions> {
        if self.audio_extensions.is_empty() {
            return Err(TreeError::Config(
                "audio_extensions must list at least one extension".into(),
            ));
        }
        AudioExtensions::new(&self.audio_extensions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = LibraryConfig::default();
        assert_eq!(config.library_file, PathBuf::from(DEFAULT_LIBRARY_FILE));
        assert_eq!(config.audio_filter().unwrap(), AudioExtensions::default());
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "audio_extensions": ["mp3", "FLAC"] }}"#).unwrap();

        let config = LibraryConfig::load(file.path()).unwrap();
        assert_eq!(config.library_file, PathBuf::from(DEFAULT_LIBRARY_FILE));
        let filter = config.audio_filter().unwrap();
        assert!(filter.matches_file_name("a.flac"));
        assert!(!filter.matches_file_name("a.ogg"));
    }

    #[test]
    fn test_load_rejects_bad_extension() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "audio_extensions": ["waveform"] }}"#).unwrap();
        assert!(matches!(
            LibraryConfig::load(file.path()),
            Err(TreeError::Config(_))
        ));
    }

    #[test]
    fn test_load_rejects_empty_list() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "audio_extensions": [] }}"#).unwrap();
        assert!(LibraryConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            LibraryConfig::load(file.path()),
            Err(TreeError::ConfigParse { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = LibraryConfig::load(Path::new("/nonexistent/audiotree.json")).unwrap_err();
        assert!(matches!(err, TreeError::Io { .. }));
    }
}
