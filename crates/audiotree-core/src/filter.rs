/// Audio extension allow-list.
///
/// A file qualifies when the text after the last `.` of its name is one of
/// the configured extensions, compared case-insensitively. Extensions are
/// at most [`MAX_EXTENSION_LEN`] ASCII alphanumeric characters; anything
/// longer can never match.
use crate::error::{Result, TreeError};

/// Longest extension that can match.
pub const MAX_EXTENSION_LEN: usize = 5;

/// Allow-list used when the configuration does not override it.
pub const DEFAULT_AUDIO_EXTENSIONS: &[&str] = &[
    "aac", "aif", "aiff", "alac", "ape", "flac", "m4a", "m4b", "mp2", "mp3", "mpc", "oga", "ogg",
    "opus", "wav", "wma", "wv",
];

/// Case-insensitive set of audio file extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioExtensions {
    /// Lowercased, sorted, deduplicated.
    extensions: Vec<String>,
}

impl AudioExtensions {
    /// Build an allow-list, rejecting entries that could never match.
    pub fn new<I, S>(extensions: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Vec::new();
        for ext in extensions {
            let ext = ext.as_ref().trim_start_matches('.');
            if ext.is_empty()
                || ext.len() > MAX_EXTENSION_LEN
                || !ext.bytes().all(|b| b.is_ascii_alphanumeric())
            {
                return Err(TreeError::Config(format!(
                    "audio extension {ext:?} must be 1 to {MAX_EXTENSION_LEN} ASCII letters or digits"
                )));
            }
            list.push(ext.to_ascii_lowercase());
        }
        list.sort_unstable();
        list.dedup();
        Ok(Self { extensions: list })
    }

    /// Extensions in the list, lowercased and sorted.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(String::as_str)
    }

    /// `true` if `ext` (without the dot) is in the list.
    ///
    /// Zero-heap-allocation: the candidate is lowercased into a stack buffer.
    pub fn matches_extension(&self, ext: &str) -> bool {
        let bytes = ext.as_bytes();
        if bytes.is_empty() || bytes.len() > MAX_EXTENSION_LEN {
            return false;
        }
        let mut lower = [0u8; MAX_EXTENSION_LEN];
        for (dest, &src) in lower.iter_mut().zip(bytes.iter()) {
            *dest = src.to_ascii_lowercase();
        }
        let lower = &lower[..bytes.len()];
        self.extensions
            .binary_search_by(|known| known.as_bytes().cmp(lower))
            .is_ok()
    }

    /// `true` if the file `name` carries an allowed extension.
    pub fn matches_file_name(&self, name: &str) -> bool {
        extract_extension(name).is_some_and(|ext| self.matches_extension(ext))
    }
}

impl Default for AudioExtensions {
    fn default() -> Self {
        let mut extensions: Vec<String> = DEFAULT_AUDIO_EXTENSIONS
            .iter()
            .map(|ext| (*ext).to_owned())
            .collect();
        extensions.sort_unstable();
        Self { extensions }
    }
}

/// Text after the last `.` of `name`, if there is a non-empty one.
pub fn extract_extension(name: &str) -> Option<&str> {
    let (_, ext) = name.rsplit_once('.')?;
    (!ext.is_empty()).then_some(ext)
}
