// ============================================
// src/config.rs
// コマンドライン引数と設定ファイル
// ============================================

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::words::WordSource;

const SETTINGS_FILE: &str = "settings.json";
const LOG_FILE: &str = "wordwiz.log";

/// 遊び方
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// 4択クイズ
    #[default]
    Quiz,
    /// 単語カード
    Flashcards,
}

/// WORD WiZ. 英単語の4択クイズ
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    /// 単語リスト (JSONファイルのパス、URL、または builtin)
    #[arg(short, long, value_name = "PATH|URL")]
    pub words: Option<String>,

    /// 遊び方
    #[arg(short, long, value_enum)]
    pub mode: Option<Mode>,

    /// 読み上げをしない
    #[arg(long)]
    pub no_speech: bool,

    /// 乱数のシード (出題順を固定したいとき)
    #[arg(long)]
    pub seed: Option<u64>,

    /// 単語リストを読み込んで内容を確認するだけ
    #[arg(long)]
    pub check: bool,

    /// ログの出力先
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// settings.json の内容。書かれていない項目は None
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub words: Option<String>,
    pub mode: Option<Mode>,
    pub speech: Option<bool>,
}

impl Settings {
    /// ファイルがなければデフォルト
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// MARK:既定の場所から読み込む (失敗してもデフォルトで続行)
    pub fn load() -> Self {
        let Some(dirs) = project_dirs() else {
            return Self::default();
        };
        let path = dirs.config_dir().join(SETTINGS_FILE);
        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("{e}");
                Self::default()
            }
        }
    }
}

/// 実行時の設定 (コマンドライン引数 > settings.json > 既定値)
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub source: WordSource,
    pub mode: Mode,
    pub speech: bool,
    pub seed: Option<u64>,
}

impl Config {
    pub fn resolve(cli: &Cli, settings: Settings) -> Self {
        let words = cli.words.clone().or(settings.words);
        let source = match words {
            Some(w) => w.parse().unwrap_or(WordSource::Builtin),
            None => WordSource::Builtin,
        };

        Self {
            source,
            mode: cli.mode.or(settings.mode).unwrap_or_default(),
            speech: !cli.no_speech && settings.speech.unwrap_or(true),
            seed: cli.seed,
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("jp", "Fukumoto0141", "WORD_WIZ")
}

/// ログファイルのパスを取得する
pub fn default_log_path() -> PathBuf {
    if let Some(dirs) = project_dirs() {
        let data_dir = dirs.data_dir();
        if fs::create_dir_all(data_dir).is_ok() {
            return data_dir.join(LOG_FILE);
        }
    }
    // 取得できなかったらカレントディレクトリに
    PathBuf::from(LOG_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("wordwiz").chain(args.iter().copied()))
    }

    #[test]
    fn defaults_without_arguments() {
        let config = Config::resolve(&cli(&[]), Settings::default());
        assert_eq!(config.source, WordSource::Builtin);
        assert_eq!(config.mode, Mode::Quiz);
        assert!(config.speech);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn cli_overrides_settings() {
        let settings = Settings {
            words: Some("from_settings.json".into()),
            mode: Some(Mode::Flashcards),
            speech: Some(true),
        };
        let config = Config::resolve(
            &cli(&["--words", "https://example.com/w.json", "--mode", "quiz", "--no-speech"]),
            settings,
        );
        assert_eq!(config.source, WordSource::Url("https://example.com/w.json".into()));
        assert_eq!(config.mode, Mode::Quiz);
        assert!(!config.speech);
    }

    #[test]
    fn settings_fill_missing_arguments() {
        let settings = Settings {
            words: Some("words.json".into()),
            mode: Some(Mode::Flashcards),
            speech: Some(false),
        };
        let config = Config::resolve(&cli(&["--seed", "42"]), settings);
        assert_eq!(config.source, WordSource::File(PathBuf::from("words.json")));
        assert_eq!(config.mode, Mode::Flashcards);
        assert!(!config.speech);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn settings_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);

        assert_eq!(Settings::load_from(&path).unwrap(), Settings::default());

        fs::write(&path, r#"{"mode": "flashcards", "speech": false}"#).unwrap();
        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.mode, Some(Mode::Flashcards));
        assert_eq!(settings.speech, Some(false));
        assert_eq!(settings.words, None);

        fs::write(&path, "{ broken").unwrap();
        assert!(matches!(
            Settings::load_from(&path),
            Err(SettingsError::Parse { .. })
        ));
    }
}
