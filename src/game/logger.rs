//! Bump-allocating game logger
//!
//! Every engine announcement goes through one of four channels. Each channel
//! maps to a verbosity level; output can go to stdout, an in-memory buffer
//! (for tests) or both, as text or one JSON object per line.

use crate::game::VerbosityLevel;
use bumpalo::collections::String as BumpString;
use bumpalo::Bump;
use serde::{Deserialize, Serialize};
use std::cell::{Ref, RefCell};
use std::fmt::Write as FmtWrite;
use std::ops::Deref;

/// Output format for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputFormat {
    /// Human-readable text output (default)
    #[default]
    Text,
    /// Machine-readable JSON output (one object per line)
    Json,
}

/// Output destination for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputMode {
    /// Output only to stdout (default)
    #[default]
    Stdout,
    /// Capture only to in-memory buffer (no stdout)
    Memory,
    /// Both stdout and in-memory buffer
    Both,
}

/// Announcement channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    /// Game events: stat changes, steps starting and ending
    Event,
    /// Engine housekeeping: SBA checks, priority grants, TBA batches
    Engine,
    /// Protocol internals
    Debug,
    /// Combat declarations and damage
    Combat,
}

impl Channel {
    pub fn label(self) -> &'static str {
        match self {
            Channel::Event => "EVENT",
            Channel::Engine => "ENGINE",
            Channel::Debug => "DEBUG",
            Channel::Combat => "COMBAT",
        }
    }

    /// Lowest verbosity at which this channel is shown
    pub fn level(self) -> VerbosityLevel {
        match self {
            Channel::Event | Channel::Combat => VerbosityLevel::Normal,
            Channel::Engine => VerbosityLevel::Verbose,
            Channel::Debug => VerbosityLevel::Debug,
        }
    }
}

/// A captured log line
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub level: VerbosityLevel,
    /// None for outcome lines that are not channel announcements
    pub channel: Option<Channel>,
    pub message: String,
}

/// Read-only access to captured entries
pub struct LogGuard<'a> {
    guard: Ref<'a, Vec<LogEntry>>,
}

impl<'a> LogGuard<'a> {
    pub fn iter(&self) -> std::slice::Iter<'_, LogEntry> {
        self.guard.iter()
    }

    pub fn len(&self) -> usize {
        self.guard.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard.is_empty()
    }
}

impl<'a> Deref for LogGuard<'a> {
    type Target = [LogEntry];

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

pub struct GameLogger {
    verbosity: VerbosityLevel,
    output_format: OutputFormat,
    output_mode: OutputMode,

    /// Scratch space for building `| LABEL | msg` lines, reset after each line
    format_bump: RefCell<Bump>,

    log_buffer: RefCell<Vec<LogEntry>>,
}

impl GameLogger {
    /// Logger at Normal verbosity writing to stdout
    pub fn new() -> Self {
        Self::with_verbosity(VerbosityLevel::default())
    }

    pub fn with_verbosity(verbosity: VerbosityLevel) -> Self {
        GameLogger {
            verbosity,
            output_format: OutputFormat::default(),
            output_mode: OutputMode::default(),
            format_bump: RefCell::new(Bump::new()),
            log_buffer: RefCell::new(Vec::new()),
        }
    }

    /// Logger that prints nothing and captures nothing
    pub fn silent() -> Self {
        Self::with_verbosity(VerbosityLevel::Silent)
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    pub fn set_verbosity(&mut self, verbosity: VerbosityLevel) {
        self.verbosity = verbosity;
    }

    pub fn set_output_mode(&mut self, mode: OutputMode) {
        self.output_mode = mode;
    }

    pub fn output_mode(&self) -> OutputMode {
        self.output_mode
    }

    pub fn set_output_format(&mut self, format: OutputFormat) {
        self.output_format = format;
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    /// Capture to memory only (suppresses stdout)
    pub fn enable_capture(&mut self) {
        self.output_mode = OutputMode::Memory;
    }

    pub fn is_capturing(&self) -> bool {
        matches!(self.output_mode, OutputMode::Memory | OutputMode::Both)
    }

    pub fn logs(&self) -> LogGuard<'_> {
        LogGuard {
            guard: self.log_buffer.borrow(),
        }
    }

    /// Captured messages of one channel, in order
    pub fn messages(&self, channel: Channel) -> Vec<String> {
        self.log_buffer
            .borrow()
            .iter()
            .filter(|e| e.channel == Some(channel))
            .map(|e| e.message.clone())
            .collect()
    }

    pub fn clear_logs(&mut self) {
        self.log_buffer.borrow_mut().clear();
        self.format_bump.borrow_mut().reset();
    }

    /// Announce on a channel
    pub fn announce(&self, channel: Channel, message: &str) {
        self.record(channel.level(), Some(channel), message);
    }

    #[inline]
    pub fn event(&self, message: &str) {
        self.announce(Channel::Event, message);
    }

    #[inline]
    pub fn engine(&self, message: &str) {
        self.announce(Channel::Engine, message);
    }

    #[inline]
    pub fn debug(&self, message: &str) {
        self.announce(Channel::Debug, message);
    }

    #[inline]
    pub fn combat(&self, message: &str) {
        self.announce(Channel::Combat, message);
    }

    /// Game outcome lines, shown at Minimal
    pub fn minimal(&self, message: &str) {
        self.record(VerbosityLevel::Minimal, None, message);
    }

    fn record(&self, level: VerbosityLevel, channel: Option<Channel>, message: &str) {
        let should_capture = self.is_capturing();
        let should_output = matches!(self.output_mode, OutputMode::Stdout | OutputMode::Both)
            && level <= self.verbosity;

        if !should_capture && !should_output {
            return;
        }

        if should_capture {
            self.log_buffer.borrow_mut().push(LogEntry {
                level,
                channel,
                message: message.to_string(),
            });
        }

        if should_output {
            match self.output_format {
                OutputFormat::Text => self.print_text(channel, message),
                OutputFormat::Json => self.print_json(level, channel, message),
            }
        }
    }

    fn print_text(&self, channel: Option<Channel>, message: &str) {
        {
            let bump = self.format_bump.borrow();
            let mut line = BumpString::new_in(&bump);
            match channel {
                // Writing into a bump string cannot fail
                Some(ch) => {
                    let _ = write!(line, "| {:^8} | {}", ch.label(), message);
                }
                None => {
                    let _ = write!(line, "{message}");
                }
            }
            println!("{line}");
        }
        self.format_bump.borrow_mut().reset();
    }

    fn print_json(&self, level: VerbosityLevel, channel: Option<Channel>, message: &str) {
        let entry = LogEntry {
            level,
            channel,
            message: message.to_string(),
        };
        match serde_json::to_string(&entry) {
            Ok(line) => println!("{line}"),
            Err(e) => eprintln!("failed to encode log entry: {e}"),
        }
    }
}

impl Default for GameLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GameLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameLogger")
            .field("verbosity", &self.verbosity)
            .field("output_mode", &self.output_mode)
            .field("log_count", &self.log_buffer.borrow().len())
            .finish()
    }
}
