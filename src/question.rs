// ============================================
// src/question.rs
// 1問分の選択肢の生成と回答判定
// ============================================

use rand::Rng;

use crate::shuffle::{sample, shuffle};
use crate::words::{WordList, WordPair};

/// 1問あたりの選択肢の数 (正解1 + 不正解3)
pub const CHOICE_COUNT: usize = 4;

/// 選択肢
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub label: String,
    pub is_correct: bool, // 回答前は画面に出さない
}

/// 回答後の選択肢の表示状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceMark {
    /// まだ回答していない (選択可能)
    Pending,
    /// 正解 (選んだもの、または外したときに示す正解)
    Correct,
    /// 選んだが不正解
    Incorrect,
    /// 選択不可になっただけ
    Disabled,
}

/// 表示中の1問
#[derive(Debug, Clone)]
pub struct Question {
    word: WordPair,
    choices: Vec<Choice>,
    selected: Option<usize>,
}

impl Question {
    /// MARK:問題を作成する
    ///
    /// 正解の訳語に、それ以外の訳語から重複なしで選んだ3つを加えて並べ替える。
    /// `WordList` は訳語が4種類以上あることを保証しているので必ず4択になる。
    pub fn present<R: Rng + ?Sized>(word: &WordPair, words: &WordList, rng: &mut R) -> Self {
        let candidates: Vec<&str> = words
            .as_slice()
            .iter()
            .map(|w| w.translation.as_str())
            .filter(|t| *t != word.translation)
            .collect();

        let mut choices: Vec<Choice> = sample(&candidates, CHOICE_COUNT - 1, rng)
            .into_iter()
            .map(|label| Choice {
                label: label.to_string(),
                is_correct: false,
            })
            .collect();
        choices.push(Choice {
            label: word.translation.clone(),
            is_correct: true,
        });

        // 表示順を混ぜるだけ
        shuffle(&mut choices, rng);

        Self {
            word: word.clone(),
            choices,
            selected: None,
        }
    }

    pub fn word(&self) -> &WordPair {
        &self.word
    }

    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    #[cfg(test)]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// 選択肢を選ぶ。正解なら `Some(true)`
    ///
    /// 回答済み、または範囲外のときは `None` で何もしない。
    pub fn select(&mut self, index: usize) -> Option<bool> {
        if self.selected.is_some() {
            return None;
        }
        let is_correct = self.choices.get(index)?.is_correct;
        self.selected = Some(index);
        Some(is_correct)
    }

    /// 各選択肢の表示状態
    pub fn mark(&self, index: usize) -> ChoiceMark {
        let Some(selected) = self.selected else {
            return ChoiceMark::Pending;
        };
        match self.choices.get(index) {
            Some(choice) if choice.is_correct => ChoiceMark::Correct,
            Some(_) if index == selected => ChoiceMark::Incorrect,
            _ => ChoiceMark::Disabled,
        }
    }
}
