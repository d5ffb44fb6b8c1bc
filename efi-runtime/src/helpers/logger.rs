// SPDX-License-Identifier: MIT OR Apache-2.0

//! This optional feature adds support for the `log` crate, providing
//! a logger implementation which writes to a console supplied by the host
//! (a kernel log buffer, a serial port, a test buffer).
//!
//! Every line is prefixed with its level, [`DEVICE_NAME`] and the source
//! location, so gateway messages can be told apart in a shared log.
//!
//! # Implementation details
//!
//! No buffering is done. Each record is handed to the console in pieces as
//! it is formatted, so the console has to cope with concurrent writers if
//! the gateway is used from several threads.
//!
//! [`DEVICE_NAME`]: crate::device::DEVICE_NAME

use crate::device::DEVICE_NAME;
use core::fmt::{self, Write};
use core::ptr;
use core::sync::atomic::{AtomicPtr, Ordering};

/// A sink for log text.
pub trait Console: Sync {
    /// Appends `s` to the console.
    fn write_str(&self, s: &str) -> fmt::Result;
}

/// Installs `logger` as the global logger, writing to `console`.
///
/// Fails if a global logger is already installed.
pub fn init<C: Console + 'static>(
    logger: &'static Logger<C>,
    console: &'static C,
) -> Result<(), log::SetLoggerError> {
    logger.set_output(console);
    log::set_logger(logger)?;
    log::set_max_level(log::STATIC_MAX_LEVEL);
    Ok(())
}

/// Logging implementation which writes to a host [`Console`].
///
/// The logger starts out disabled; records are dropped until an output is
/// set.
#[derive(Debug)]
pub struct Logger<C> {
    console: AtomicPtr<C>,
}

impl<C: Console> Logger<C> {
    /// Creates a new, disabled logger.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            console: AtomicPtr::new(ptr::null_mut()),
        }
    }

    /// Sets the [`Console`] to which the logger will write.
    pub fn set_output(&self, console: &'static C) {
        self.console
            .store(ptr::from_ref(console).cast_mut(), Ordering::Release);
    }

    /// Disable the logger.
    pub fn disable(&self) {
        self.console.store(ptr::null_mut(), Ordering::Release);
    }

    fn output(&self) -> Option<&'static C> {
        // SAFETY: the pointer is either null or was made from a `&'static C`
        // in `set_output`, and is only ever used for shared access.
        unsafe { self.console.load(Ordering::Acquire).as_ref() }
    }
}

impl<C: Console> Default for Logger<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Console + 'static> log::Log for Logger<C> {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        self.output().is_some()
    }

    fn log(&self, record: &log::Record) {
        if let Some(console) = self.output() {
            // Nowhere to report a failed write.
            let _ = DecoratedLog::write(
                &mut ConsoleWriter(console),
                record.level(),
                record.args(),
                record.file().unwrap_or("<unknown file>"),
                record.line().unwrap_or(0),
            );
        }
    }

    fn flush(&self) {}
}

struct ConsoleWriter<'a, C>(&'a C);

impl<C: Console> Write for ConsoleWriter<'_, C> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.write_str(s)
    }
}

/// Writer wrapper which prints a prefix in front of every line of text.
///
/// `fmt::Arguments` can only be rendered through a `fmt::Write`, and without
/// an allocation the text cannot be post-processed, so the prefixes are
/// injected while the text passes through.
struct DecoratedLog<'writer, 'a, W: Write> {
    writer: &'writer mut W,
    log_level: log::Level,
    at_line_start: bool,
    file: &'a str,
    line: u32,
}

impl<'writer, 'a, W: Write> DecoratedLog<'writer, 'a, W> {
    fn write(
        writer: &'writer mut W,
        log_level: log::Level,
        args: &fmt::Arguments,
        file: &'a str,
        line: u32,
    ) -> fmt::Result {
        let mut decorated_writer = Self {
            writer,
            log_level,
            at_line_start: true,
            file,
            line,
        };
        writeln!(decorated_writer, "{}", *args)
    }
}

impl<W: Write> Write for DecoratedLog<'_, '_, W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let mut lines = s.lines();

        // The input may start in the middle of an output line.
        let first = lines.next().unwrap_or("");
        if self.at_line_start {
            write!(
                self.writer,
                "[{:>5}] {DEVICE_NAME}: {}@{}: ",
                self.log_level, self.file, self.line
            )?;
            self.at_line_start = false;
        }
        write!(self.writer, "{first}")?;

        for line in lines {
            write!(self.writer, "\n[{:>5}] {DEVICE_NAME}: {line}", self.log_level)?;
        }

        // `lines` swallows a trailing newline; put it back and start a fresh
        // prefix on the next write.
        if s.ends_with('\n') {
            writeln!(self.writer)?;
            self.at_line_start = true;
        }
        Ok(())
    }
}
