// ============================================
// src/speech.rs
// 英単語の読み上げ
// ============================================

use std::io::ErrorKind;
use std::process::{Child, Command, Stdio};

use crate::error::SpeechError;

/// 読み上げ言語
pub const SPEECH_LOCALE: &str = "en-US";
/// 読み上げ速度 (1.0 が標準)
pub const SPEECH_RATE: f32 = 0.9;
/// PowerShell に読み上げる文字列を渡す環境変数
const TEXT_ENV: &str = "WORDWIZ_TEXT";

/// 音声合成の実体
pub trait SpeechBackend {
    /// 読み上げを開始する (終了は待たない)
    fn speak(&mut self, text: &str, locale: &str, rate: f32) -> Result<(), SpeechError>;
    /// 読み上げ中のものをすべて止める
    fn cancel(&mut self);
}

/// 読み上げ係
///
/// 常に「前の発話を止めてから話す」。キューは持たず、最後の呼び出しが勝つ。
/// 環境が対応していなければ最初の1回だけエラーを返し、以降は黙る。
pub struct Announcer<B: SpeechBackend> {
    backend: B,
    unsupported: bool,
}

impl<B: SpeechBackend> Announcer<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            unsupported: false,
        }
    }

    pub fn speak(&mut self, text: &str) -> Result<(), SpeechError> {
        if self.unsupported {
            return Ok(());
        }
        self.backend.cancel();
        match self.backend.speak(text, SPEECH_LOCALE, SPEECH_RATE) {
            Err(e @ SpeechError::Unsupported(_)) => {
                self.unsupported = true;
                Err(e)
            }
            other => other,
        }
    }

    pub fn is_supported(&self) -> bool {
        !self.unsupported
    }

    #[cfg(test)]
    pub(crate) fn backend(&self) -> &B {
        &self.backend
    }
}

/// OS の読み上げコマンドを使うバックエンド
#[derive(Default)]
pub struct SystemSpeech {
    child: Option<Child>,
}

impl SystemSpeech {
    pub fn new() -> Self {
        Self::default()
    }

    /// OSごとの候補コマンド
    fn candidates(text: &str, locale: &str, rate: f32) -> Vec<Command> {
        // espeak / say は 1分あたりの語数で速度を指定する
        let wpm = ((175.0 * rate).round() as u32).to_string();

        if cfg!(target_os = "macos") {
            let mut say = Command::new("say");
            say.args(["-r", wpm.as_str(), "--", text]);
            vec![say]
        } else if cfg!(target_os = "windows") {
            vec![Self::powershell(text, locale, rate)]
        } else {
            let voice = locale.to_lowercase();
            ["espeak-ng", "espeak"]
                .iter()
                .map(|program| {
                    let mut cmd = Command::new(program);
                    cmd.args(["-v", voice.as_str(), "-s", wpm.as_str(), "--", text]);
                    cmd
                })
                .collect()
        }
    }

    /// Windows 用。単語はスクリプトに埋め込まず環境変数で渡す
    /// (-Command の後ろの引数はすべてスクリプトとして連結されるため)
    fn powershell(text: &str, locale: &str, rate: f32) -> Command {
        // System.Speech の Rate は -10..10
        let ps_rate = ((rate - 1.0) * 10.0).round().clamp(-10.0, 10.0) as i32;
        let script = format!(
            "Add-Type -AssemblyName System.Speech; \
             $s = New-Object System.Speech.Synthesis.SpeechSynthesizer; \
             try {{ $s.SelectVoiceByHints('NotSet', 'NotSet', 0, [Globalization.CultureInfo]'{locale}') }} catch {{}}; \
             $s.Rate = {ps_rate}; $s.Speak($env:{TEXT_ENV})"
        );
        let mut ps = Command::new("powershell");
        ps.args(["-NoProfile", "-NonInteractive", "-Command", script.as_str()])
            .env(TEXT_ENV, text);
        ps
    }
}

impl SpeechBackend for SystemSpeech {
    fn speak(&mut self, text: &str, locale: &str, rate: f32) -> Result<(), SpeechError> {
        let mut tried = Vec::new();
        for mut cmd in Self::candidates(text, locale, rate) {
            let program = cmd.get_program().to_string_lossy().into_owned();
            // TUI の画面を崩さないよう出力は捨てる
            cmd.stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null());
            match cmd.spawn() {
                Ok(child) => {
                    log::debug!("{program} で読み上げ: {text}");
                    self.child = Some(child);
                    return Ok(());
                }
                Err(e) if e.kind() == ErrorKind::NotFound => tried.push(program),
                Err(e) => return Err(SpeechError::Spawn(e)),
            }
        }
        Err(SpeechError::Unsupported(format!(
            "{} が見つかりません",
            tried.join(" / ")
        )))
    }

    fn cancel(&mut self) {
        if let Some(mut child) = self.child.take() {
            // 既に終わっていれば kill は失敗するが問題ない
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

impl Drop for SystemSpeech {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// 読み上げなし
pub struct Silent;

impl SpeechBackend for Silent {
    fn speak(&mut self, _text: &str, _locale: &str, _rate: f32) -> Result<(), SpeechError> {
        Ok(())
    }

    fn cancel(&mut self) {}
}

/// 実行時に選ぶバックエンド
pub enum Voice {
    System(SystemSpeech),
    Silent(Silent),
}

impl Voice {
    pub fn from_enabled(enabled: bool) -> Self {
        if enabled {
            Self::System(SystemSpeech::new())
        } else {
            Self::Silent(Silent)
        }
    }
}

impl SpeechBackend for Voice {
    fn speak(&mut self, text: &str, locale: &str, rate: f32) -> Result<(), SpeechError> {
        match self {
            Self::System(b) => b.speak(text, locale, rate),
            Self::Silent(b) => b.speak(text, locale, rate),
        }
    }

    fn cancel(&mut self) {
        match self {
            Self::System(b) => b.cancel(),
            Self::Silent(b) => b.cancel(),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// 呼び出しを記録するだけのバックエンド
    #[derive(Default)]
    pub(crate) struct Recorder {
        pub calls: Vec<String>,
        pub unsupported: bool,
    }

    impl SpeechBackend for Recorder {
        fn speak(&mut self, text: &str, locale: &str, rate: f32) -> Result<(), SpeechError> {
            if self.unsupported {
                return Err(SpeechError::Unsupported("test".into()));
            }
            self.calls.push(format!("speak:{text}:{locale}:{rate}"));
            Ok(())
        }

        fn cancel(&mut self) {
            self.calls.push("cancel".into());
        }
    }

    #[test]
    fn cancels_before_every_utterance() {
        let mut announcer = Announcer::new(Recorder::default());
        announcer.speak("apple").unwrap();
        announcer.speak("banana").unwrap();
        assert_eq!(
            announcer.backend.calls,
            vec![
                "cancel",
                "speak:apple:en-US:0.9",
                "cancel",
                "speak:banana:en-US:0.9",
            ]
        );
    }

    #[test]
    fn unsupported_is_reported_once() {
        let mut announcer = Announcer::new(Recorder {
            unsupported: true,
            ..Default::default()
        });
        assert!(matches!(
            announcer.speak("apple"),
            Err(SpeechError::Unsupported(_))
        ));
        assert!(!announcer.is_supported());

        // 2回目以降は黙って成功扱い
        assert!(announcer.speak("banana").is_ok());
        assert_eq!(announcer.backend.calls, vec!["cancel"]);
    }

    #[test]
    fn powershell_receives_text_through_env() {
        let text = "x'; Remove-Item -Recurse ~; '";
        let cmd = SystemSpeech::powershell(text, SPEECH_LOCALE, SPEECH_RATE);

        let args: Vec<String> = cmd
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(args.len(), 4);
        assert_eq!(args[2], "-Command");
        assert!(args.iter().all(|a| !a.contains("Remove-Item")));
        assert!(args[3].contains("$s.Speak($env:WORDWIZ_TEXT)"));
        assert!(args[3].contains("$s.Rate = -1"));

        let envs: Vec<_> = cmd.get_envs().collect();
        assert_eq!(envs.len(), 1);
        assert_eq!(envs[0].0, TEXT_ENV);
        assert_eq!(envs[0].1.map(|v| v.to_string_lossy().into_owned()), Some(text.to_string()));
    }

    #[test]
    fn silent_backend_never_fails() {
        let mut announcer = Announcer::new(Voice::from_enabled(false));
        assert!(announcer.speak("apple").is_ok());
        assert!(announcer.is_supported());
    }
}
