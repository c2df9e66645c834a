// ============================================
// src/error.rs
// エラー型の定義
// ============================================

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// 単語リストの読み込みエラー
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("単語ファイルを読み込めませんでした ({path}): {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("単語リストを取得できませんでした ({url}): {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("単語リストの形式が正しくありません: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("単語リストが空です")]
    EmptyList,

    /// 選択肢を 4 つ作れない
    #[error("訳語が {found} 種類しかありません (最低 {required} 種類必要です)")]
    InsufficientDistractors { found: usize, required: usize },
}

/// 音声読み上げのエラー
#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("この環境では音声読み上げを利用できません ({0})")]
    Unsupported(String),

    #[error("音声コマンドの起動に失敗しました: {0}")]
    Spawn(#[source] io::Error),
}

/// 設定ファイルのエラー
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("設定ファイルを読み込めませんでした ({path}): {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("設定ファイルの形式が正しくありません ({path}): {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
