// ============================================
// src/ui.rs
// 画面の描画
// ============================================

use ratatui::{
    prelude::*,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
};

use crate::app::{App, Screen};
use crate::config::Mode;
use crate::flashcards::FlashcardDeck;
use crate::question::ChoiceMark;
use crate::session::{Phase, PrimaryAction, QuizSession};
use crate::speech::SpeechBackend;

pub fn ui<B: SpeechBackend>(f: &mut Frame, app: &App<B>) {
    let size = f.area();
    // 枠線を描画
    let title = match app.mode() {
        Mode::Quiz => "Word Wiz ! - 4択クイズ",
        Mode::Flashcards => "Word Wiz ! - 単語カード",
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner_area = block.inner(size);
    f.render_widget(block, size);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // [0] 進み具合
            Constraint::Length(1), // [1] 空白
            Constraint::Length(1), // [2] 英単語
            Constraint::Length(1), // [3] 空白
            Constraint::Min(4),    // [4] 選択肢 / 訳語
            Constraint::Length(1), // [5] お知らせ
            Constraint::Length(1), // [6] 操作説明
        ])
        .split(inner_area);

    match app.screen() {
        Screen::Loading(_) => {
            f.render_widget(
                Paragraph::new("単語を読み込み中...")
                    .style(Style::default().fg(Color::Gray))
                    .centered(),
                chunks[2],
            );
            render_help(f, chunks[6], "Esc: 終了");
        }
        Screen::Failed(message) => {
            f.render_widget(
                Paragraph::new(message.as_str())
                    .style(Style::default().fg(Color::Red).bold())
                    .centered(),
                chunks[2],
            );
            render_help(f, chunks[6], "Esc: 終了");
        }
        Screen::Quiz(session) => render_quiz(f, &chunks, session, app.speech_available()),
        Screen::Flashcards(deck) => {
            render_flashcards(f, &chunks, deck, app.speech_available())
        }
    }

    if let Some(notice) = app.notice() {
        f.render_widget(
            Paragraph::new(notice).style(Style::default().fg(Color::Yellow)),
            chunks[5],
        );
    }
}

fn render_quiz(f: &mut Frame, chunks: &[Rect], session: &QuizSession, speech: bool) {
    // 0. 進み具合
    let total = session.len();
    let done = match session.phase() {
        Phase::AwaitingAnswer => session.position(),
        _ => (session.position() + 1).min(total),
    };
    let ratio = if total > 0 { done as f64 / total as f64 } else { 0.0 };
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Magenta).bg(Color::Black))
        .ratio(ratio)
        .label(format!("{} / {}", done, total));
    f.render_widget(gauge, chunks[0]);

    let Some(question) = session.question() else {
        // 全問終了
        f.render_widget(
            Paragraph::new(format!("全 {} 問おわり！", total))
                .style(Style::default().fg(Color::Yellow).bold())
                .centered(),
            chunks[2],
        );
        render_help(f, chunks[6], &help_text(session.primary_action(), speech));
        return;
    };

    // 2. 英単語
    f.render_widget(
        Paragraph::new(question.word().term.as_str())
            .style(Style::default().fg(Color::White).bold())
            .centered(),
        chunks[2],
    );

    // 4. 選択肢
    let lines: Vec<Line> = question
        .choices()
        .iter()
        .enumerate()
        .map(|(i, choice)| {
            let style = match question.mark(i) {
                ChoiceMark::Pending => Style::default().fg(Color::White),
                ChoiceMark::Correct => Style::default().fg(Color::Black).bg(Color::Green),
                ChoiceMark::Incorrect => Style::default().fg(Color::White).bg(Color::Red),
                ChoiceMark::Disabled => Style::default().fg(Color::DarkGray),
            };
            Line::from(vec![
                Span::styled(format!("{}. ", i + 1), Style::default().fg(Color::Gray)),
                Span::styled(choice.label.as_str(), style),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines).centered(), chunks[4]);

    render_help(f, chunks[6], &help_text(session.primary_action(), speech));
}

/// 「次へ」ボタンの表示はフェーズから決める
fn help_text(action: PrimaryAction, speech: bool) -> String {
    let primary = match action {
        PrimaryAction::None => "1-4: 回答",
        PrimaryAction::Next => "Enter: 次の問題へ",
        PrimaryAction::Restart => "Enter: もう一度",
    };
    format!("{primary}{} / r: 最初から / Esc: 終了", speak_hint(speech))
}

/// 読み上げが使えないときは出さない
fn speak_hint(speech: bool) -> &'static str {
    if speech { " / s: 発音" } else { "" }
}

fn render_flashcards(f: &mut Frame, chunks: &[Rect], deck: &FlashcardDeck, speech: bool) {
    f.render_widget(
        Paragraph::new(format!("{} / {}", deck.index() + 1, deck.len()))
            .style(Style::default().fg(Color::Magenta)),
        chunks[0],
    );

    let word = deck.current();
    f.render_widget(
        Paragraph::new(word.term.as_str())
            .style(Style::default().fg(Color::White).bold())
            .centered(),
        chunks[2],
    );

    // 意味は隠しておく
    let meaning = if deck.is_revealed() {
        Span::styled(word.translation.as_str(), Style::default().fg(Color::Green))
    } else {
        Span::styled("？？？", Style::default().fg(Color::DarkGray))
    };
    f.render_widget(Paragraph::new(Line::from(meaning)).centered(), chunks[4]);

    render_help(
        f,
        chunks[6],
        &format!(
            "Space: 意味を表示/隠す / Enter: 次の単語へ{} / Esc: 終了",
            speak_hint(speech)
        ),
    );
}

fn render_help(f: &mut Frame, area: Rect, text: &str) {
    f.render_widget(
        Paragraph::new(text).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_follows_primary_action() {
        assert!(help_text(PrimaryAction::None, true).starts_with("1-4"));
        assert!(help_text(PrimaryAction::Next, true).contains("次の問題へ"));
        assert!(help_text(PrimaryAction::Restart, true).contains("もう一度"));
    }

    #[test]
    fn speak_hint_hidden_without_speech() {
        assert!(help_text(PrimaryAction::None, true).contains("s: 発音"));
        assert!(!help_text(PrimaryAction::None, false).contains("発音"));
    }
}
