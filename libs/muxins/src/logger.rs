use log::{info, warn, error, Level};
use parking_lot::Mutex;

use crate::ansi;

/// The sink for the user-visible skip and keep messages.
///
/// Messages may contain `§` formatting codes.
pub trait MixinLogger: Send + Sync {
    fn log(&self, level: Level, message: &str);
    #[inline]
    fn info(&self, message: &str) {
        self.log(Level::Info, message)
    }
    #[inline]
    fn warn(&self, message: &str) {
        self.log(Level::Warn, message)
    }
    #[inline]
    fn error(&self, message: &str) {
        self.log(Level::Error, message)
    }
}

/// Forwards to the `log` facade with the `muxins` target
#[derive(Copy, Clone, Debug, Default)]
pub struct LogLogger {
    /// Render formatting codes as ANSI escapes instead of removing them
    pub colored: bool
}
impl MixinLogger for LogLogger {
    fn log(&self, level: Level, message: &str) {
        let message = if self.colored {
            ansi::render(message)
        } else {
            ansi::strip(message)
        };
        match level {
            Level::Error => error!(target: "muxins", "{}", message),
            Level::Warn => warn!(target: "muxins", "{}", message),
            _ => info!(target: "muxins", "{}", message),
        }
    }
}

/// Keeps every message in memory, with formatting codes removed
#[derive(Debug, Default)]
pub struct MemoryLogger {
    messages: Mutex<Vec<(Level, String)>>
}
impl MemoryLogger {
    #[inline]
    pub fn new() -> MemoryLogger {
        MemoryLogger::default()
    }
    pub fn messages(&self) -> Vec<(Level, String)> {
        self.messages.lock().clone()
    }
    pub fn contains(&self, needle: &str) -> bool {
        self.messages.lock().iter().any(|&(_, ref message)| message.contains(needle))
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }
    pub fn clear(&self) {
        self.messages.lock().clear();
    }
}
impl MixinLogger for MemoryLogger {
    fn log(&self, level: Level, message: &str) {
        self.messages.lock().push((level, ansi::strip(message)));
    }
}

#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn memory_logger_strips_codes() {
        let logger = MemoryLogger::new();
        assert!(logger.is_empty());
        logger.info("§2Applying mixin §9Foo");
        logger.warn("plain");
        assert_eq!(logger.messages(), vec![
            (Level::Info, "Applying mixin Foo".to_string()),
            (Level::Warn, "plain".to_string()),
        ]);
        assert!(logger.contains("mixin Foo"));
        logger.clear();
        assert!(logger.is_empty());
    }
}
