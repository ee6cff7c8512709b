use std::io::{self, Write};

use colored::*;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use oucount_common::config::Credential;
use oucount_common::error::SetupError;

/// Keeps the terminal in raw mode for as long as it lives.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

enum KeyAction {
    Push(char),
    Pop,
    Submit,
    Cancel,
    Ignore,
}

/// Asks for the password of `identity` without echoing it.
pub fn read_credential(identity: &str) -> Result<Credential, SetupError> {
    let failed = |reason: String| SetupError::Credential {
        identity: identity.to_string(),
        reason,
    };

    if !console::user_attended_stderr() {
        return Err(failed("no interactive terminal to prompt on".to_string()));
    }

    let mut stderr = io::stderr();
    write!(stderr, "{} Password for {}: ", "[?]".blue(), identity.bold())
        .and_then(|_| stderr.flush())
        .map_err(|e| failed(e.to_string()))?;

    let password = read_hidden_line().map_err(|e| failed(e.to_string()))?;
    let _ = writeln!(stderr);

    match password {
        None => Err(failed("prompt cancelled".to_string())),
        Some(p) if p.is_empty() => Err(failed("empty password".to_string())),
        Some(password) => Ok(Credential {
            identity: identity.to_string(),
            password,
        }),
    }
}

/// Reads key presses until Enter. `None` means the user cancelled.
fn read_hidden_line() -> io::Result<Option<String>> {
    let _guard = RawModeGuard::enable()?;
    let mut buffer = String::new();

    loop {
        if let Event::Key(key_event) = event::read()? {
            match classify(&key_event) {
                KeyAction::Push(c) => buffer.push(c),
                KeyAction::Pop => {
                    buffer.pop();
                }
                KeyAction::Submit => return Ok(Some(buffer)),
                KeyAction::Cancel => return Ok(None),
                KeyAction::Ignore => {}
            }
        }
    }
}

fn classify(key_event: &KeyEvent) -> KeyAction {
    if key_event.kind != KeyEventKind::Press {
        return KeyAction::Ignore;
    }
    let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);
    match key_event.code {
        KeyCode::Char('c') | KeyCode::Char('d') if ctrl => KeyAction::Cancel,
        KeyCode::Esc => KeyAction::Cancel,
        KeyCode::Enter => KeyAction::Submit,
        KeyCode::Backspace => KeyAction::Pop,
        KeyCode::Char(c) if !ctrl => KeyAction::Push(c),
        _ => KeyAction::Ignore,
    }
}
