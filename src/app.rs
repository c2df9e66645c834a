// ============================================
// src/app.rs
// 画面の状態とキー入力の処理
// ============================================

use std::sync::mpsc::{Receiver, TryRecvError};

use crossterm::event::KeyCode;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::Mode;
use crate::error::{LoadError, SpeechError};
use crate::flashcards::FlashcardDeck;
use crate::session::{QuizSession, SessionEvent};
use crate::speech::{Announcer, SpeechBackend};
use crate::words::WordList;

/// 今表示している画面
pub enum Screen {
    /// 単語リストの読み込み待ち
    Loading(Receiver<Result<WordList, LoadError>>),
    /// 読み込み失敗。クイズは始めない
    Failed(String),
    Quiz(QuizSession),
    Flashcards(FlashcardDeck),
}

/// アプリ全体の状態を管理する
pub struct App<B: SpeechBackend> {
    screen: Screen,
    mode: Mode,
    seed: Option<u64>,
    announcer: Announcer<B>,
    /// 画面下に一度だけ出すお知らせ
    notice: Option<String>,
    should_quit: bool,
}

impl<B: SpeechBackend> App<B> {
    pub fn new(
        loading: Receiver<Result<WordList, LoadError>>,
        mode: Mode,
        seed: Option<u64>,
        backend: B,
    ) -> Self {
        Self {
            screen: Screen::Loading(loading),
            mode,
            seed,
            announcer: Announcer::new(backend),
            notice: None,
            should_quit: false,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// 読み上げが使えるか (使えなければ操作説明から外す)
    pub fn speech_available(&self) -> bool {
        self.announcer.is_supported()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// 読み込みスレッドから結果が届いていれば受け取る
    pub fn poll_load(&mut self) {
        let Screen::Loading(rx) = &self.screen else {
            return;
        };
        match rx.try_recv() {
            Ok(result) => self.on_loaded(result),
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                self.screen = Screen::Failed("単語リストの読み込みが中断されました".to_string());
            }
        }
    }

    /// MARK:読み込み結果から画面を作る
    pub fn on_loaded(&mut self, result: Result<WordList, LoadError>) {
        let words = match result {
            Ok(words) => words,
            Err(e) => {
                self.screen = Screen::Failed(e.to_string());
                return;
            }
        };

        self.screen = match self.mode {
            Mode::Quiz => {
                let rng = match self.seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_os_rng(),
                };
                Screen::Quiz(QuizSession::new(words, rng))
            }
            Mode::Flashcards => Screen::Flashcards(FlashcardDeck::new(words)),
        };
        self.announce_current();
    }

    /// キー入力の処理
    pub fn handle_key(&mut self, key: KeyCode) {
        if matches!(key, KeyCode::Esc | KeyCode::Char('q')) {
            self.should_quit = true;
            return;
        }

        let announce = match &mut self.screen {
            Screen::Loading(_) | Screen::Failed(_) => false,
            Screen::Quiz(session) => match key {
                KeyCode::Char(c @ '1'..='9') => {
                    session.select_choice(c as usize - '1' as usize);
                    false
                }
                KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('n') => {
                    session.activate_primary() == Some(SessionEvent::QuestionShown)
                }
                KeyCode::Char('r') => {
                    session.restart();
                    true
                }
                KeyCode::Char('s') => true,
                _ => false,
            },
            Screen::Flashcards(deck) => match key {
                KeyCode::Char(' ') | KeyCode::Char('t') => {
                    deck.toggle();
                    false
                }
                KeyCode::Enter | KeyCode::Char('n') => {
                    deck.next();
                    true
                }
                KeyCode::Char('s') => true,
                _ => false,
            },
        };

        // 新しい問題が出たとき、または読み上げボタン
        if announce {
            self.announce_current();
        }
    }

    /// 表示中の英単語を読み上げる
    fn announce_current(&mut self) {
        let term = match &self.screen {
            Screen::Quiz(session) => session.current_word().map(|w| w.term.clone()),
            Screen::Flashcards(deck) => Some(deck.current().term.clone()),
            _ => None,
        };
        let Some(term) = term else {
            return;
        };

        if let Err(e) = self.announcer.speak(&term) {
            log::warn!("{e}");
            if matches!(e, SpeechError::Unsupported(_)) {
                self.notice = Some(e.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Phase;
    use crate::speech::tests::Recorder;
    use crate::words::WordPair;
    use std::sync::mpsc;

    fn fruits() -> WordList {
        WordList::new(vec![
            WordPair::new("apple", "りんご"),
            WordPair::new("banana", "バナナ"),
            WordPair::new("cherry", "さくらんぼ"),
            WordPair::new("orange", "オレンジ"),
            WordPair::new("grape", "ぶどう"),
        ])
        .unwrap()
    }

    fn app(mode: Mode, backend: Recorder) -> (App<Recorder>, mpsc::Sender<Result<WordList, LoadError>>) {
        let (tx, rx) = mpsc::channel();
        (App::new(rx, mode, Some(1), backend), tx)
    }

    fn spoken(app: &App<Recorder>) -> Vec<&str> {
        app.announcer
            .backend()
            .calls
            .iter()
            .filter_map(|c| c.strip_prefix("speak:"))
            .filter_map(|c| c.split(':').next())
            .collect()
    }

    #[test]
    fn stays_loading_until_result_arrives() {
        let (mut app, tx) = app(Mode::Quiz, Recorder::default());
        app.poll_load();
        assert!(matches!(app.screen(), Screen::Loading(_)));

        tx.send(Ok(fruits())).unwrap();
        app.poll_load();
        assert!(matches!(app.screen(), Screen::Quiz(_)));
    }

    #[test]
    fn empty_list_never_shows_a_question() {
        let (mut app, tx) = app(Mode::Quiz, Recorder::default());
        tx.send(WordList::from_json("[]")).unwrap();
        app.poll_load();

        let Screen::Failed(message) = app.screen() else {
            panic!("読み込み失敗の画面になるはず");
        };
        assert_eq!(message, &LoadError::EmptyList.to_string());

        app.handle_key(KeyCode::Char('1'));
        app.handle_key(KeyCode::Enter);
        assert!(matches!(app.screen(), Screen::Failed(_)));
        assert!(spoken(&app).is_empty());
    }

    #[test]
    fn dropped_loader_is_reported() {
        let (mut app, tx) = app(Mode::Quiz, Recorder::default());
        drop(tx);
        app.poll_load();
        assert!(matches!(app.screen(), Screen::Failed(_)));
    }

    #[test]
    fn quiz_keys_drive_the_session() {
        let (mut app, _tx) = app(Mode::Quiz, Recorder::default());
        app.on_loaded(Ok(fruits()));

        let first = match app.screen() {
            Screen::Quiz(s) => s.current_word().unwrap().term.clone(),
            _ => unreachable!(),
        };
        assert_eq!(spoken(&app), vec![first.as_str()]);

        // 回答前の Enter は何もしない
        app.handle_key(KeyCode::Enter);
        app.handle_key(KeyCode::Char('2'));
        let Screen::Quiz(session) = app.screen() else {
            unreachable!()
        };
        assert_eq!(session.phase(), Phase::AnswerRevealed);
        assert_eq!(session.position(), 0);

        app.handle_key(KeyCode::Enter);
        let Screen::Quiz(session) = app.screen() else {
            unreachable!()
        };
        assert_eq!(session.position(), 1);
        assert_eq!(spoken(&app).len(), 2);
    }

    #[test]
    fn enter_restarts_after_completion() {
        let (mut app, _tx) = app(Mode::Quiz, Recorder::default());
        app.on_loaded(Ok(fruits()));
        for _ in 0..5 {
            app.handle_key(KeyCode::Char('1'));
            app.handle_key(KeyCode::Enter);
        }
        let Screen::Quiz(session) = app.screen() else {
            unreachable!()
        };
        assert_eq!(session.phase(), Phase::Complete);

        app.handle_key(KeyCode::Enter);
        let Screen::Quiz(session) = app.screen() else {
            unreachable!()
        };
        assert_eq!(session.phase(), Phase::AwaitingAnswer);
        assert_eq!(session.position(), 0);
    }

    #[test]
    fn unsupported_speech_becomes_a_notice() {
        let backend = Recorder {
            unsupported: true,
            ..Default::default()
        };
        let (mut app, _tx) = app(Mode::Quiz, backend);
        assert!(app.speech_available());
        app.on_loaded(Ok(fruits()));
        assert!(app.notice().is_some());
        assert!(!app.speech_available());

        // クイズはそのまま続けられる
        app.handle_key(KeyCode::Char('1'));
        app.handle_key(KeyCode::Enter);
        let Screen::Quiz(session) = app.screen() else {
            unreachable!()
        };
        assert_eq!(session.position(), 1);
    }

    #[test]
    fn flashcard_keys() {
        let (mut app, _tx) = app(Mode::Flashcards, Recorder::default());
        app.on_loaded(Ok(fruits()));

        app.handle_key(KeyCode::Char(' '));
        let Screen::Flashcards(deck) = app.screen() else {
            unreachable!()
        };
        assert!(deck.is_revealed());

        app.handle_key(KeyCode::Enter);
        let Screen::Flashcards(deck) = app.screen() else {
            unreachable!()
        };
        assert_eq!(deck.current().term, "banana");
        assert!(!deck.is_revealed());
        assert_eq!(spoken(&app), vec!["apple", "banana"]);
    }

    #[test]
    fn escape_quits() {
        let (mut app, _tx) = app(Mode::Quiz, Recorder::default());
        assert!(!app.should_quit());
        app.handle_key(KeyCode::Esc);
        assert!(app.should_quit());
    }
}
