// ============================================
// src/main.rs (メインファイル)
// ============================================

use std::io::{Result, stdout};
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use console::style;

mod app;
mod config;
mod error;
mod flashcards;
mod logging;
mod question;
mod session;
mod shuffle;
mod speech;
mod ui;
mod words;

use app::App;
use config::{Cli, Config, Settings};
use speech::{SpeechBackend, Voice};
use words::WordSource;

use crossterm::{
    ExecutableCommand,
    cursor::{Hide, Show},
    event::{self, Event, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};

use ratatui::prelude::*;

// --------------------------------------------------
// メイン関数 (TUIセットアップと実行ループ)
// --------------------------------------------------

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let log_path = cli.log_file.clone().unwrap_or_else(config::default_log_path);
    logging::init(&log_path);

    let config = Config::resolve(&cli, Settings::load());
    log::debug!("設定: {config:?}");

    if cli.check {
        return Ok(check_words(&config.source));
    }

    // 読み込みは別スレッド。その間は「読み込み中」を表示する
    let loading = words::spawn_load(config.source.clone());
    let mut app = App::new(
        loading,
        config.mode,
        config.seed,
        Voice::from_enabled(config.speech),
    );

    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, &mut app);
    restore_terminal(&mut terminal)?;
    result?;
    Ok(ExitCode::SUCCESS)
}

/// `--check`: 単語リストを読み込んで概要を表示する
fn check_words(source: &WordSource) -> ExitCode {
    match source.load() {
        Ok(words) => {
            println!(
                "{} {} ({} 語)",
                style("OK").green().bold(),
                source,
                words.len()
            );
            for word in words.as_slice() {
                println!("  {} {}", style(&word.term).bold(), style(&word.translation).dim());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{} {}", style("エラー").red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn setup_terminal() -> Result<Terminal<impl Backend>> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?; // 代替スクリーンを使用
    stdout().execute(Hide)?; // カーソルを非表示
    let backend = CrosstermBackend::new(stdout());
    Terminal::new(backend)
}

fn restore_terminal(_terminal: &mut Terminal<impl Backend>) -> Result<()> {
    stdout().execute(Show)?; // カーソルを再表示
    stdout().execute(LeaveAlternateScreen)?; // 代替スクリーンを終了
    disable_raw_mode()?;
    Ok(())
}

fn run_app<S: SpeechBackend>(terminal: &mut Terminal<impl Backend>, app: &mut App<S>) -> Result<()> {
    while !app.should_quit() {
        app.poll_load();
        terminal.draw(|f| ui::ui(f, app))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key.code);
                }
            }
        }
    }

    log::info!("終了します");
    Ok(())
}
