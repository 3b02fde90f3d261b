//! Session store error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while persisting or loading sessions.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The timestamp sequence does not describe a finished session.
    #[error("セッションの記録には開始と終了のペアが必要です (タイムスタンプ数: {0})")]
    IncompleteSession(usize),

    /// The history file could not be read or written.
    #[error("セッション履歴にアクセスできません: {path}: {source}")]
    Io {
        /// Path of the history file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The history file is not a valid session list.
    #[error("セッション履歴の形式が正しくありません: {path}: {source}")]
    Parse {
        /// Path of the history file.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// No data directory could be determined.
    #[error("データディレクトリを特定できません")]
    NoDataDir,

    /// Generic backend failure.
    #[error("セッションの保存に失敗しました: {0}")]
    Backend(String),
}

impl StoreError {
    /// Returns true if this error comes from the filesystem.
    #[must_use]
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::NoDataDir)
    }

    /// Returns true if the rejected input was never a complete session.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::IncompleteSession(_))
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::IncompleteSession(_) => "セッションを最後まで完了させてください",
            Self::Io { .. } => "データディレクトリのパーミッションを確認してください",
            Self::Parse { .. } => "sessions.json を修正するか退避してください",
            Self::NoDataDir => "--data-dir でディレクトリを指定してください",
            Self::Backend(_) => "しばらくしてから再試行してください",
        }
    }
}
