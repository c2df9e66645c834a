// ============================================
// src/words.rs
// 単語データの管理と読み込み
// ============================================

use std::collections::HashSet;
use std::convert::Infallible;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::mpsc::{self, Receiver};
use std::thread;

use serde::{Deserialize, Serialize};

use crate::error::LoadError;
use crate::question::CHOICE_COUNT;

/// 英単語と訳語の組
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordPair {
    #[serde(alias = "english")]
    pub term: String, // 出題する英単語
    #[serde(alias = "japanese")]
    pub translation: String, // 正解の訳語
}

impl WordPair {
    pub fn new(term: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            translation: translation.into(),
        }
    }
}

/// 組み込みの単語リスト
pub const BUILTIN_WORDS: &[(&str, &str)] = &[
    ("apple", "りんご"),
    ("banana", "バナナ"),
    ("cherry", "さくらんぼ"),
    ("orange", "オレンジ"),
    ("grape", "ぶどう"),
    ("peach", "もも"),
    ("lemon", "レモン"),
    ("melon", "メロン"),
    ("strawberry", "いちご"),
    ("watermelon", "すいか"),
];

/// 検証済みの単語リスト
///
/// 作成時に以下が保証される。以降は読み取り専用。
/// - 英単語・訳語ともに空でない
/// - 訳語が重複しない (後から出てきたものは捨てる)
/// - 訳語が `CHOICE_COUNT` 種類以上ある
#[derive(Debug, Clone)]
pub struct WordList {
    words: Vec<WordPair>,
}

impl WordList {
    pub fn new(pairs: Vec<WordPair>) -> Result<Self, LoadError> {
        // 空欄のある項目は使えないので外す
        let usable: Vec<WordPair> = pairs
            .into_iter()
            .filter_map(|pair| {
                let term = pair.term.trim();
                let translation = pair.translation.trim();
                if term.is_empty() || translation.is_empty() {
                    log::warn!("空欄を含む項目をスキップしました: {:?}", pair);
                    None
                } else {
                    Some(WordPair::new(term, translation))
                }
            })
            .collect();

        if usable.is_empty() {
            return Err(LoadError::EmptyList);
        }

        let mut seen = HashSet::new();
        let mut words = Vec::with_capacity(usable.len());
        for pair in usable {
            if seen.insert(pair.translation.clone()) {
                words.push(pair);
            } else {
                log::warn!(
                    "訳語 '{}' が重複しているため '{}' をスキップしました",
                    pair.translation,
                    pair.term
                );
            }
        }

        if words.len() < CHOICE_COUNT {
            return Err(LoadError::InsufficientDistractors {
                found: words.len(),
                required: CHOICE_COUNT,
            });
        }

        Ok(Self { words })
    }

    /// JSON (`[{ "english": ..., "japanese": ... }, ...]`) から作成
    pub fn from_json(text: &str) -> Result<Self, LoadError> {
        let pairs: Vec<WordPair> = serde_json::from_str(text)?;
        Self::new(pairs)
    }

    pub fn builtin() -> Self {
        Self {
            words: BUILTIN_WORDS
                .iter()
                .map(|&(term, translation)| WordPair::new(term, translation))
                .collect(),
        }
    }

    pub fn as_slice(&self) -> &[WordPair] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }
}

/// 単語リストの取得元
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordSource {
    Builtin,
    File(PathBuf),
    Url(String),
}

impl FromStr for WordSource {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("builtin") {
            Ok(Self::Builtin)
        } else if s.starts_with("http://") || s.starts_with("https://") {
            Ok(Self::Url(s.to_string()))
        } else {
            Ok(Self::File(PathBuf::from(s)))
        }
    }
}

impl fmt::Display for WordSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin => write!(f, "builtin"),
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => write!(f, "{url}"),
        }
    }
}

impl WordSource {
    /// MARK:単語リストを読み込む (1回だけ試行、リトライなし)
    pub fn load(&self) -> Result<WordList, LoadError> {
        log::info!("単語リストを読み込みます: {self}");
        let result = match self {
            Self::Builtin => Ok(WordList::builtin()),
            Self::File(path) => fs::read_to_string(path)
                .map_err(|source| LoadError::Read {
                    path: path.clone(),
                    source,
                })
                .and_then(|text| WordList::from_json(&text)),
            Self::Url(url) => reqwest::blocking::get(url)
                .and_then(|res| res.error_for_status())
                .and_then(|res| res.text())
                .map_err(|source| LoadError::Fetch {
                    url: url.clone(),
                    source,
                })
                .and_then(|text| WordList::from_json(&text)),
        };

        match &result {
            Ok(words) => log::info!("{} 語を読み込みました", words.len()),
            Err(e) => log::error!("単語リストの読み込みに失敗しました: {e}"),
        }
        result
    }
}

/// 別スレッドで読み込みを開始し、結果を受け取るチャネルを返す
pub fn spawn_load(source: WordSource) -> Receiver<Result<WordList, LoadError>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        // 受信側が先に終了していても気にしない
        let _ = tx.send(source.load());
    });
    rx
}
