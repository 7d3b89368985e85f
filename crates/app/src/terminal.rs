//! Interactive terminal host for one placement session.
//!
//! Runs a single-threaded poll loop: key presses become `select`/`advance`,
//! terminal focus-out reports become `on_focus_lost`, and a once-per-second
//! deadline drives `tick`.

use std::io::{self, Stdout, Write};
use std::time::{Duration, Instant};

use crossterm::cursor::MoveTo;
use crossterm::event::{
    self, DisableFocusChange, EnableFocusChange, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers,
};
use crossterm::style::Print;
use crossterm::terminal::{
    self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use services::PlacementSession;

use crate::render;

const TICK_EVERY: Duration = Duration::from_secs(1);
const POLL_EVERY: Duration = Duration::from_millis(100);

/// How the interactive loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Finished,
    Quit,
}

enum Action {
    Pick(usize),
    Next,
    Quit,
    Ignore,
}

fn action_for(key: KeyEvent) -> Action {
    if key.kind != KeyEventKind::Press {
        return Action::Ignore;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Enter => Action::Next,
        KeyCode::Char(c) => match c.to_digit(10) {
            Some(n) if n > 0 => Action::Pick(n as usize - 1),
            _ => Action::Ignore,
        },
        _ => Action::Ignore,
    }
}

/// Run `session` in the alternate screen until it finishes or the user quits.
///
/// # Errors
///
/// Returns terminal I/O errors; the terminal is restored on every path.
pub fn run_interactive(session: &mut PlacementSession) -> io::Result<Exit> {
    terminal::enable_raw_mode().map_err(|e| {
        io::Error::new(
            e.kind(),
            format!("failed to enable raw mode ({e}); run in a real terminal or pass --answers"),
        )
    })?;

    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen, EnableFocusChange) {
        let _ = terminal::disable_raw_mode();
        return Err(e);
    }

    let result = event_loop(session, &mut stdout);
    let cleanup = restore(&mut stdout);
    result.and_then(|exit| cleanup.map(|()| exit))
}

fn restore(stdout: &mut Stdout) -> io::Result<()> {
    terminal::disable_raw_mode()?;
    execute!(stdout, DisableFocusChange, LeaveAlternateScreen)
}

fn event_loop(session: &mut PlacementSession, stdout: &mut Stdout) -> io::Result<Exit> {
    let mut status: Option<String> = None;
    let mut last_tick = Instant::now();
    draw(session, stdout, status.as_deref())?;

    loop {
        if session.is_complete() {
            return Ok(Exit::Finished);
        }

        if event::poll(POLL_EVERY)? {
            match event::read()? {
                Event::FocusLost => session.on_focus_lost(),
                Event::Key(key) => match action_for(key) {
                    Action::Quit => return Ok(Exit::Quit),
                    Action::Pick(index) => status = pick(session, index),
                    Action::Next => {
                        status = session.advance().err().map(|e| e.to_string());
                    }
                    Action::Ignore => {}
                },
                _ => {}
            }
            draw(session, stdout, status.as_deref())?;
        }

        if last_tick.elapsed() >= TICK_EVERY {
            last_tick = Instant::now();
            if session.tick().is_ok() {
                draw(session, stdout, status.as_deref())?;
            }
        }
    }
}

fn pick(session: &mut PlacementSession, index: usize) -> Option<String> {
    let option = session
        .current_question()
        .and_then(|question| question.options().get(index).cloned());
    let Some(option) = option else {
        return Some(format!("there is no option {}", index + 1));
    };
    session.select(&option).err().map(|e| e.to_string())
}

fn draw(session: &PlacementSession, stdout: &mut Stdout, status: Option<&str>) -> io::Result<()> {
    let Some(question) = session.current_question() else {
        return Ok(());
    };
    let screen = render::question_screen(&session.snapshot(), question);

    queue!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;
    for line in screen.lines() {
        queue!(stdout, Print(line), Print("\r\n"))?;
    }
    if let Some(status) = status {
        queue!(stdout, Print("\r\n"), Print(status), Print("\r\n"))?;
    }
    stdout.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn digits_pick_zero_based_options() {
        assert!(matches!(action_for(press(KeyCode::Char('1'))), Action::Pick(0)));
        assert!(matches!(action_for(press(KeyCode::Char('4'))), Action::Pick(3)));
        assert!(matches!(action_for(press(KeyCode::Char('0'))), Action::Ignore));
    }

    #[test]
    fn enter_advances_and_q_quits() {
        assert!(matches!(action_for(press(KeyCode::Enter)), Action::Next));
        assert!(matches!(action_for(press(KeyCode::Char('q'))), Action::Quit));
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(matches!(action_for(ctrl_c), Action::Quit));
    }
}
