//! Configuration error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A numeric setting is outside its allowed range.
    #[error("{field} は{min}-{max}の範囲で指定してください (指定値: {value})")]
    OutOfRange {
        /// Name of the offending setting.
        field: &'static str,
        /// The rejected value.
        value: u32,
        /// Smallest accepted value.
        min: u32,
        /// Largest accepted value.
        max: u32,
    },

    /// The configuration file could not be read or written.
    #[error("設定ファイルにアクセスできません: {path}: {source}")]
    Io {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for this schema.
    #[error("設定ファイルの形式が正しくありません: {path}: {source}")]
    Parse {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// No home/config directory could be determined.
    #[error("設定ディレクトリを特定できません")]
    NoConfigDir,
}

impl ConfigError {
    /// Returns true if this error comes from value validation.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::OutOfRange { .. })
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::OutOfRange { .. } => "設定値を許容範囲内に修正してください",
            Self::Io { .. } => "ファイルのパーミッションを確認してください",
            Self::Parse { .. } => "設定ファイルのJSONを修正するか削除してください",
            Self::NoConfigDir => "HOME環境変数を確認してください",
        }
    }
}
