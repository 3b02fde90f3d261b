//! Sound source selection.

use std::path::{Path, PathBuf};

use super::error::SoundError;

/// Supported audio file extensions.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["wav", "ogg", "mp3", "flac"];

/// What to play when a session completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoundSource {
    /// A user-supplied audio file.
    File {
        /// Path to the audio file.
        path: PathBuf,
    },
    /// The built-in synthesized chime.
    Chime,
}

impl SoundSource {
    /// Creates a file source without checking the path.
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File { path: path.into() }
    }

    /// Creates a file source, checking that the file exists and has a
    /// supported extension.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::FileNotFound` for a missing path and
    /// `SoundError::DecodeError` for an unsupported extension.
    pub fn file_validated(path: impl Into<PathBuf>) -> Result<Self, SoundError> {
        let path = path.into();
        validate_sound_file(&path)?;
        Ok(Self::File { path })
    }

    /// Picks the configured file, or the chime when none is set.
    #[must_use]
    pub fn from_setting(sound_file: Option<&Path>) -> Self {
        sound_file.map_or(Self::Chime, Self::file)
    }

    /// Short name for logs.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::File { path } => path
                .file_name()
                .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned()),
            Self::Chime => "chime".to_string(),
        }
    }

    /// Returns the file path if this is a file source.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File { path } => Some(path),
            Self::Chime => None,
        }
    }
}

impl Default for SoundSource {
    fn default() -> Self {
        Self::Chime
    }
}

fn validate_sound_file(path: &Path) -> Result<(), SoundError> {
    if !path.is_file() {
        return Err(SoundError::FileNotFound(path.display().to_string()));
    }

    let supported = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()));
    if !supported {
        return Err(SoundError::DecodeError(format!(
            "unsupported format: {}",
            path.display()
        )));
    }
    Ok(())
}
