//! Terminal collaborators the engine drives.
//!
//! The engine never talks to a terminal directly. The CLI implements these
//! traits with `crossterm`; tests implement them with scripted doubles.

use std::io;
use std::time::Duration;

/// Screen lines the engine writes to.
pub const HEADER_LINE: u16 = 0;
pub const STIMULUS_LINE: u16 = 2;
pub const STATUS_LINE: u16 = 4;

/// One decoded key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    /// Ctrl-C (delivered as a key in raw mode) or Esc.
    Interrupt,
    /// Anything else (arrows, function keys, resize, mouse, key release).
    Other,
}

/// Line-oriented output.
pub trait Screen {
    /// Replace the contents of `line` with `text`.
    fn show(&mut self, text: &str, line: u16) -> io::Result<()>;

    /// Blank the whole screen.
    fn clear(&mut self) -> io::Result<()>;
}

/// Character-level input with a readiness check.
pub trait Keys {
    /// Switch the input to unbuffered, unechoed mode.
    fn enter_raw(&mut self) -> io::Result<()>;

    /// Restore the mode that was active before [`Keys::enter_raw`].
    fn leave_raw(&mut self) -> io::Result<()>;

    /// Wait up to `timeout` for input. Returns `true` if a read would not block.
    fn poll(&mut self, timeout: Duration) -> io::Result<bool>;

    /// Read one pending event. Only called after `poll` returned `true`.
    fn read(&mut self) -> io::Result<Key>;
}

impl<T: Screen + ?Sized> Screen for &mut T {
    fn show(&mut self, text: &str, line: u16) -> io::Result<()> {
        (**self).show(text, line)
    }

    fn clear(&mut self) -> io::Result<()> {
        (**self).clear()
    }
}

impl<T: Keys + ?Sized> Keys for &mut T {
    fn enter_raw(&mut self) -> io::Result<()> {
        (**self).enter_raw()
    }

    fn leave_raw(&mut self) -> io::Result<()> {
        (**self).leave_raw()
    }

    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        (**self).poll(timeout)
    }

    fn read(&mut self) -> io::Result<Key> {
        (**self).read()
    }
}

// ---------------------------------------------------------------------------
// RawModeGuard
// ---------------------------------------------------------------------------

/// Holds raw mode for as long as it lives.
///
/// Raw mode is released on drop, so every exit path out of a capture
/// (decision, timeout, error, unwinding panic) restores the terminal.
pub struct RawModeGuard<'a, K: Keys + ?Sized> {
    keys: &'a mut K,
}

impl<'a, K: Keys + ?Sized> RawModeGuard<'a, K> {
    pub fn acquire(keys: &'a mut K) -> io::Result<Self> {
        keys.enter_raw()?;
        Ok(Self { keys })
    }

    pub fn keys(&mut self) -> &mut K {
        &mut *self.keys
    }
}

impl<K: Keys + ?Sized> Drop for RawModeGuard<'_, K> {
    fn drop(&mut self) {
        if let Err(e) = self.keys.leave_raw() {
            log::warn!("failed to restore terminal mode: {e}");
        }
    }
}
