//! `crossterm` implementations of the engine's terminal collaborators.
//!
//! [`GameScreen`] owns the alternate screen for the length of a session.
//! [`RawKeys`] toggles raw mode only when the engine asks, once per capture.

use std::io::{self, Stdout, Write};
use std::sync::Once;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::Print,
    terminal::{
        self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
        enable_raw_mode,
    },
};
use nback_core::{Key, Keys, Screen};

/// Exit status for a session the player aborted with Ctrl-C / Esc.
pub const EXIT_INTERRUPTED: i32 = 130;

/// Set while a [`GameScreen`] owns the terminal.
static SCREEN_OPEN: AtomicBool = AtomicBool::new(false);

static INSTALL_HOOKS: Once = Once::new();

/// Best-effort return to cooked mode on the main screen.
fn restore() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, cursor::Show);
}

/// Undo the game screen if it is still up. Returns whether it was.
fn release_screen() -> bool {
    let was_open = SCREEN_OPEN.swap(false, Ordering::SeqCst);
    if was_open {
        restore();
    }
    was_open
}

/// Panic hook and SIGINT handler, installed once per process. Both only
/// touch the terminal while a [`GameScreen`] is open.
fn install_hooks() {
    INSTALL_HOOKS.call_once(|| {
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            release_screen();
            original_hook(info);
        }));

        // Outside a capture the terminal is cooked, so Ctrl-C arrives as
        // SIGINT and Drop never runs.
        if let Err(e) = ctrlc::set_handler(|| {
            if release_screen() {
                eprintln!("Interrupted.");
            }
            std::process::exit(EXIT_INTERRUPTED);
        }) {
            log::warn!("cannot install Ctrl-C handler: {e}");
        }
    });
}

// ---------------------------------------------------------------------------
// GameScreen
// ---------------------------------------------------------------------------

/// Alternate screen with a hidden cursor. Restored on drop.
pub struct GameScreen {
    out: Stdout,
}

impl GameScreen {
    pub fn open() -> io::Result<Self> {
        install_hooks();
        let mut out = io::stdout();
        execute!(out, EnterAlternateScreen, cursor::Hide)?;
        SCREEN_OPEN.store(true, Ordering::SeqCst);
        Ok(Self { out })
    }
}

impl Drop for GameScreen {
    fn drop(&mut self) {
        SCREEN_OPEN.store(false, Ordering::SeqCst);
        let _ = execute!(self.out, LeaveAlternateScreen, cursor::Show);
    }
}

impl Screen for GameScreen {
    fn show(&mut self, text: &str, line: u16) -> io::Result<()> {
        queue!(
            self.out,
            cursor::MoveTo(0, line),
            Clear(ClearType::CurrentLine),
            Print(text)
        )?;
        self.out.flush()
    }

    fn clear(&mut self) -> io::Result<()> {
        execute!(self.out, Clear(ClearType::All), cursor::MoveTo(0, 0))
    }
}

// ---------------------------------------------------------------------------
// RawKeys
// ---------------------------------------------------------------------------

/// Keyboard input through `crossterm`'s event queue.
#[derive(Debug, Default)]
pub struct RawKeys {
    raw: bool,
}

impl RawKeys {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Drop for RawKeys {
    fn drop(&mut self) {
        if self.raw {
            let _ = disable_raw_mode();
        }
    }
}

impl Keys for RawKeys {
    fn enter_raw(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        self.raw = true;
        // Keys typed while the previous stimulus was on screen belong to
        // that trial, not this one.
        while event::poll(Duration::ZERO)? {
            let _ = event::read()?;
        }
        Ok(())
    }

    fn leave_raw(&mut self) -> io::Result<()> {
        if terminal::is_raw_mode_enabled()? {
            disable_raw_mode()?;
        }
        self.raw = false;
        Ok(())
    }

    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        event::poll(timeout)
    }

    fn read(&mut self) -> io::Result<Key> {
        Ok(decode(&event::read()?))
    }
}

/// Map a terminal event to the engine's key model.
///
/// Ctrl-C and Esc both abort the session; key releases are ignored.
pub fn decode(event: &Event) -> Key {
    let Event::Key(KeyEvent {
        code,
        modifiers,
        kind,
        ..
    }) = event
    else {
        return Key::Other;
    };
    if *kind == KeyEventKind::Release {
        return Key::Other;
    }
    match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Key::Interrupt,
        KeyCode::Esc => Key::Interrupt,
        KeyCode::Char(c) => Key::Char(*c),
        _ => Key::Other,
    }
}
