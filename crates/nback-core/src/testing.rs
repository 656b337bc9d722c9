//! Scripted terminal doubles for unit tests.

use std::collections::VecDeque;
use std::io;
use std::time::{Duration, Instant};

use crate::io::{Key, Keys, Screen};

/// Records everything shown; optionally fails after `fail_after` writes.
#[derive(Debug, Default)]
pub struct RecordingScreen {
    pub lines: Vec<(u16, String)>,
    pub clears: usize,
    pub fail_after: Option<usize>,
}

impl RecordingScreen {
    fn tick(&mut self) -> io::Result<()> {
        let writes = self.lines.len() + self.clears;
        if self.fail_after.is_some_and(|n| writes >= n) {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "screen gone"));
        }
        Ok(())
    }

    pub fn shown_on(&self, line: u16) -> Vec<&str> {
        self.lines
            .iter()
            .filter(|(l, _)| *l == line)
            .map(|(_, t)| t.as_str())
            .collect()
    }
}

impl Screen for RecordingScreen {
    fn show(&mut self, text: &str, line: u16) -> io::Result<()> {
        self.tick()?;
        self.lines.push((line, text.to_string()));
        Ok(())
    }

    fn clear(&mut self) -> io::Result<()> {
        self.tick()?;
        self.clears += 1;
        Ok(())
    }
}

/// Plays back one script of `(offset, key)` events per raw-mode session.
#[derive(Debug, Default)]
pub struct ScriptedKeys {
    scripts: VecDeque<Vec<(Duration, Key)>>,
    pending: VecDeque<(Duration, Key)>,
    origin: Option<Instant>,
    /// Key returned immediately by every poll/read, forever.
    pub flood: Option<Key>,
    pub fail_enter: bool,
    pub fail_poll: bool,
    pub raw: bool,
    pub entered: usize,
    pub left: usize,
}

impl ScriptedKeys {
    pub fn new(scripts: Vec<Vec<(Duration, Key)>>) -> Self {
        Self {
            scripts: scripts.into(),
            ..Self::default()
        }
    }

    fn elapsed(&self) -> Duration {
        self.origin.map_or(Duration::ZERO, |o| o.elapsed())
    }
}

impl Keys for ScriptedKeys {
    fn enter_raw(&mut self) -> io::Result<()> {
        if self.fail_enter {
            return Err(io::Error::other("no tty"));
        }
        self.raw = true;
        self.entered += 1;
        self.pending = self.scripts.pop_front().unwrap_or_default().into();
        self.origin = Some(Instant::now());
        Ok(())
    }

    fn leave_raw(&mut self) -> io::Result<()> {
        self.raw = false;
        self.left += 1;
        Ok(())
    }

    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        if self.fail_poll {
            return Err(io::Error::other("poll failed"));
        }
        if self.flood.is_some() {
            return Ok(true);
        }
        let wait = match self.pending.front() {
            Some((at, _)) => at.saturating_sub(self.elapsed()).min(timeout),
            None => timeout,
        };
        std::thread::sleep(wait);
        Ok(self
            .pending
            .front()
            .is_some_and(|(at, _)| *at <= self.elapsed()))
    }

    fn read(&mut self) -> io::Result<Key> {
        if let Some(key) = self.flood {
            return Ok(key);
        }
        Ok(self.pending.pop_front().map_or(Key::Other, |(_, k)| k))
    }
}
