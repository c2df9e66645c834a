// ============================================
// src/flashcards.rs
// 単語カード (意味を隠して覚えるモード)
// ============================================

use crate::words::{WordList, WordPair};

/// 単語カードの束。リストの順番どおりにめくり、最後まで行ったら最初に戻る
pub struct FlashcardDeck {
    words: WordList,
    index: usize,
    revealed: bool, // 訳語を表示中か
}

impl FlashcardDeck {
    pub fn new(words: WordList) -> Self {
        Self {
            words,
            index: 0,
            revealed: false, // 最初は意味を隠しておく
        }
    }

    pub fn current(&self) -> &WordPair {
        &self.words.as_slice()[self.index]
    }

    /// 意味の表示/非表示を切り替える
    pub fn toggle(&mut self) {
        self.revealed = !self.revealed;
    }

    /// 次のカードへ (意味は隠し直す)
    pub fn next(&mut self) {
        self.index = (self.index + 1) % self.words.len();
        self.revealed = false;
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }
}
