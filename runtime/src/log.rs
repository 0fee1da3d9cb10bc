// Runtime Logging
//
// Leveled, origin-tagged log output for bring-up diagnostics. The runtime
// starts before there is a timer or a console, so:
//
// - Entries carry a monotonic sequence number instead of a timestamp
// - Output goes to whatever `LogSink` has been installed; with none
//   installed every entry is dropped
// - Nothing in this path allocates, so the heap itself may log
//
// Entry format:
//   [#seq] [LEVEL] [origin] message            (Info and above)
//   [#seq] [LEVEL] [origin] message (file:line) (Debug)
//
// Failures never depend on logging being visible: the heap reports every
// error through its return values. Logs are a debugging aid only.
//
// Sinks must not allocate or log themselves. The heap logs its own
// failures, so an allocating sink could recurse into it.
//
// The sink slot is only locked with interrupts masked, and only long enough
// to copy the reference out; `write_entry` runs with the slot unlocked.

use core::fmt;
use core::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

use spin::Mutex;

use crate::util::without_interrupts;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Debug = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
    Panic = 4,
}

impl LogLevel {
    pub const fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO ",
            LogLevel::Warn => "WARN ",
            LogLevel::Error => "ERROR",
            LogLevel::Panic => "PANIC",
        }
    }

    const fn from_u8(value: u8) -> Self {
        match value {
            0 => LogLevel::Debug,
            1 => LogLevel::Info,
            2 => LogLevel::Warn,
            3 => LogLevel::Error,
            _ => LogLevel::Panic,
        }
    }
}

pub trait LogSink: Sync {
    fn write_entry(&self, args: fmt::Arguments);
}

static CURRENT_LOG_LEVEL: AtomicU8 = AtomicU8::new(LogLevel::Info as u8);
static SEQUENCE: AtomicUsize = AtomicUsize::new(0);
static SINK: Mutex<Option<&'static dyn LogSink>> = Mutex::new(None);

/// Install `sink` as the log backend, returning the previous one.
pub fn set_sink(sink: &'static dyn LogSink) -> Option<&'static dyn LogSink> {
    without_interrupts(|| SINK.lock().replace(sink))
}

pub fn clear_sink() -> Option<&'static dyn LogSink> {
    without_interrupts(|| SINK.lock().take())
}

pub fn set_level(level: LogLevel) {
    CURRENT_LOG_LEVEL.store(level as u8, Ordering::Relaxed);
}

pub fn get_level() -> LogLevel {
    LogLevel::from_u8(CURRENT_LOG_LEVEL.load(Ordering::Relaxed))
}

pub fn _log(level: LogLevel, origin: &str, args: fmt::Arguments, file: &str, line: u32) {
    if level < get_level() {
        return;
    }

    let sink = match without_interrupts(|| *SINK.lock()) {
        Some(sink) => sink,
        None => return,
    };

    let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);

    if level == LogLevel::Debug {
        sink.write_entry(format_args!(
            "[#{}] [{}] [{}] {} ({}:{})\n",
            seq,
            level.as_str(),
            origin,
            args,
            file,
            line
        ));
    } else {
        sink.write_entry(format_args!(
            "[#{}] [{}] [{}] {}\n",
            seq,
            level.as_str(),
            origin,
            args
        ));
    }
}

#[macro_export]
macro_rules! log_debug {
    ($origin:expr, $($arg:tt)*) => {
        $crate::log::_log(
            $crate::log::LogLevel::Debug,
            $origin,
            format_args!($($arg)*),
            file!(),
            line!()
        )
    };
}

#[macro_export]
macro_rules! log_info {
    ($origin:expr, $($arg:tt)*) => {
        $crate::log::_log(
            $crate::log::LogLevel::Info,
            $origin,
            format_args!($($arg)*),
            file!(),
            line!()
        )
    };
}

#[macro_export]
macro_rules! log_warn {
    ($origin:expr, $($arg:tt)*) => {
        $crate::log::_log(
            $crate::log::LogLevel::Warn,
            $origin,
            format_args!($($arg)*),
            file!(),
            line!()
        )
    };
}

#[macro_export]
macro_rules! log_error {
    ($origin:expr, $($arg:tt)*) => {
        $crate::log::_log(
            $crate::log::LogLevel::Error,
            $origin,
            format_args!($($arg)*),
            file!(),
            line!()
        )
    };
}

#[macro_export]
macro_rules! log_panic {
    ($origin:expr, $($arg:tt)*) => {
        $crate::log::_log(
            $crate::log::LogLevel::Panic,
            $origin,
            format_args!($($arg)*),
            file!(),
            line!()
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    use core::sync::atomic::AtomicBool;

    struct Capture(Mutex<String>);

    static SLOT_HELD_DURING_WRITE: AtomicBool = AtomicBool::new(false);

    impl LogSink for Capture {
        fn write_entry(&self, args: fmt::Arguments) {
            use core::fmt::Write;
            // A nested log from an interrupt handler would need the slot.
            // Retry, since other test threads may hold it for an instant.
            if !(0..10_000).any(|_| SINK.try_lock().is_some()) {
                SLOT_HELD_DURING_WRITE.store(true, Ordering::Relaxed);
            }
            let _ = self.0.lock().write_fmt(args);
        }
    }

    static CAPTURE: Capture = Capture(Mutex::new(String::new()));

    // Level and sink are process-wide, so everything that changes them
    // lives in this one test.
    #[test]
    fn filters_by_level_and_formats_entries() {
        set_sink(&CAPTURE);

        set_level(LogLevel::Warn);
        assert_eq!(get_level(), LogLevel::Warn);
        crate::log_info!("test", "hidden {}", 1);
        crate::log_warn!("test", "shown {}", 2);
        crate::log_error!("test", "also shown");

        set_level(LogLevel::Debug);
        crate::log_debug!("test", "with location");

        let out = CAPTURE.0.lock().clone();
        assert!(!out.contains("hidden 1"));
        assert!(out.contains("[WARN ] [test] shown 2\n"));
        assert!(out.contains("[ERROR] [test] also shown\n"));
        assert!(out.contains("[DEBUG] [test] with location ("));
        assert!(out.contains("log.rs:"));
        assert!(!SLOT_HELD_DURING_WRITE.load(Ordering::Relaxed));

        set_level(LogLevel::Info);
        assert!(clear_sink().is_some());
        crate::log_error!("test", "dropped without a sink");
        assert!(!CAPTURE.0.lock().contains("dropped"));
    }
}
