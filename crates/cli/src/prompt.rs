use std::io::{BufRead, IsTerminal, Write};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::Print,
    terminal,
    terminal::ClearType,
};

use crate::error::{AppError, Result};

const MAX_ATTEMPTS: usize = 3;

/// What a single key press does to a secret being typed.
#[derive(Debug, PartialEq, Eq)]
enum Edit {
    Pushed,
    Erased,
    Unchanged,
    Submit,
    Abort,
}

fn apply_key(secret: &mut String, key: KeyEvent) -> Edit {
    let control = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Enter => Edit::Submit,
        KeyCode::Char('c') if control => Edit::Abort,
        KeyCode::Backspace if secret.pop().is_some() => Edit::Erased,
        KeyCode::Char(ch) if !control => {
            secret.push(ch);
            Edit::Pushed
        }
        _ => Edit::Unchanged,
    }
}

struct RawMode;

impl RawMode {
    fn enable() -> Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Secret source: the terminal with masked echo, or the next line of a
/// piped stdin.
enum SecretInput {
    Terminal,
    Piped,
}

impl SecretInput {
    fn detect() -> Self {
        if std::io::stdin().is_terminal() {
            Self::Terminal
        } else {
            Self::Piped
        }
    }

    fn read(&self, label: &str) -> Result<String> {
        match self {
            Self::Piped => {
                let mut line = String::new();
                std::io::stdin().lock().read_line(&mut line)?;
                Ok(line.trim_end_matches(['\r', '\n']).to_string())
            }
            Self::Terminal => read_masked(label),
        }
    }

    fn notice(&self, message: &str) -> Result<()> {
        let mut err = std::io::stderr();
        writeln!(err, "{message}")?;
        Ok(())
    }
}

fn read_masked(label: &str) -> Result<String> {
    let _raw = RawMode::enable()?;
    let mut err = std::io::stderr();
    execute!(
        err,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(label)
    )?;

    let mut secret = String::new();
    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        match apply_key(&mut secret, key) {
            Edit::Pushed => execute!(err, Print("*"))?,
            Edit::Erased => execute!(err, cursor::MoveLeft(1), Print(" "), cursor::MoveLeft(1))?,
            Edit::Unchanged => {}
            Edit::Submit => {
                execute!(err, Print("\r\n"))?;
                return Ok(secret);
            }
            Edit::Abort => {
                execute!(err, Print("\r\n"))?;
                return Err(AppError::Input("interrupted".to_string()));
            }
        }
    }
}

pub fn prompt_password(label: &str) -> Result<String> {
    SecretInput::detect().read(label)
}

/// Asks for a new non-empty password. On a terminal it must be typed twice;
/// piped input is taken as is.
pub fn prompt_new_password() -> Result<String> {
    let input = SecretInput::detect();
    let attempts = match input {
        SecretInput::Terminal => MAX_ATTEMPTS,
        SecretInput::Piped => 1,
    };

    for _ in 0..attempts {
        let password = input.read("Password: ")?;
        if password.is_empty() {
            input.notice("Password must not be empty.")?;
            continue;
        }
        if matches!(input, SecretInput::Piped) || input.read("Confirm password: ")? == password {
            return Ok(password);
        }
        input.notice("Passwords do not match. Try again.")?;
    }

    Err(AppError::Input("no usable password entered".to_string()))
}
