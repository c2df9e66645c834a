// ============================================
// src/session.rs
// クイズの進行を管理する状態機械
// ============================================

use rand::rngs::StdRng;

use crate::question::Question;
use crate::shuffle::shuffle;
use crate::words::{WordList, WordPair};

/// クイズの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingAnswer,
    AnswerRevealed,
    Complete,
}

/// 「次へ」ボタンに相当する操作。フェーズから決まる
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryAction {
    None,
    Next,
    Restart,
}

/// 状態遷移の結果、呼び出し側に知らせること
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// 新しい問題を表示した
    QuestionShown,
    /// 回答した (正解なら true)
    Answered(bool),
    /// 全問終わった
    Completed,
}

/// 1回分のクイズ
pub struct QuizSession {
    words: WordList,
    order: Vec<WordPair>,
    position: usize,
    phase: Phase,
    question: Option<Question>, // Complete 以外では必ず Some
    rng: StdRng,
}

impl QuizSession {
    /// セッションを作成し、そのまま開始する
    pub fn new(words: WordList, rng: StdRng) -> Self {
        let mut session = Self {
            order: Vec::with_capacity(words.len()),
            words,
            position: 0,
            phase: Phase::AwaitingAnswer,
            question: None,
            rng,
        };
        session.start();
        session
    }

    /// MARK:出題順をシャッフルして最初の問題へ
    pub fn start(&mut self) -> SessionEvent {
        self.order = self.words.as_slice().to_vec();
        shuffle(&mut self.order, &mut self.rng);
        self.position = 0;
        self.phase = Phase::AwaitingAnswer;
        self.present_current();
        log::info!("クイズを開始しました ({} 問)", self.order.len());
        SessionEvent::QuestionShown
    }

    pub fn restart(&mut self) -> SessionEvent {
        self.start()
    }

    /// 選択肢を選ぶ (AwaitingAnswer のときだけ有効)
    pub fn select_choice(&mut self, index: usize) -> Option<SessionEvent> {
        if self.phase != Phase::AwaitingAnswer {
            log::debug!("{:?} では回答できません", self.phase);
            return None;
        }
        let is_correct = self.question.as_mut()?.select(index)?;
        self.phase = Phase::AnswerRevealed;
        log::debug!(
            "{}問目: {}",
            self.position + 1,
            if is_correct { "正解" } else { "不正解" }
        );
        Some(SessionEvent::Answered(is_correct))
    }

    /// 次の問題へ (AnswerRevealed のときだけ有効)
    pub fn advance(&mut self) -> Option<SessionEvent> {
        if self.phase != Phase::AnswerRevealed {
            log::debug!("{:?} では次へ進めません", self.phase);
            return None;
        }
        self.position += 1;
        if self.position < self.order.len() {
            self.phase = Phase::AwaitingAnswer;
            self.present_current();
            Some(SessionEvent::QuestionShown)
        } else {
            self.phase = Phase::Complete;
            self.question = None;
            log::info!("全 {} 問を終えました", self.order.len());
            Some(SessionEvent::Completed)
        }
    }

    /// 現在のフェーズで「次へ」ボタンがすること
    pub fn primary_action(&self) -> PrimaryAction {
        match self.phase {
            Phase::AwaitingAnswer => PrimaryAction::None,
            Phase::AnswerRevealed => PrimaryAction::Next,
            Phase::Complete => PrimaryAction::Restart,
        }
    }

    pub fn activate_primary(&mut self) -> Option<SessionEvent> {
        match self.primary_action() {
            PrimaryAction::None => None,
            PrimaryAction::Next => self.advance(),
            PrimaryAction::Restart => Some(self.restart()),
        }
    }

    fn present_current(&mut self) {
        let word = &self.order[self.position];
        self.question = Some(Question::present(word, &self.words, &mut self.rng));
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[cfg(test)]
    pub fn order(&self) -> &[WordPair] {
        &self.order
    }

    pub fn question(&self) -> Option<&Question> {
        self.question.as_ref()
    }

    pub fn current_word(&self) -> Option<&WordPair> {
        self.question.as_ref().map(Question::word)
    }
}
