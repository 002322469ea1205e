use chrono::Local;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

/// Maximum number of log entries to keep in memory
const MAX_LOG_ENTRIES: usize = 1000;

/// A log entry with timestamp and message
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: String,
    pub target: String,
    pub message: String,
}

impl LogEntry {
    pub fn new(level: Level, target: &str, message: String) -> Self {
        Self {
            timestamp: Local::now().format("%H:%M:%S.%3f").to_string(),
            level: level.to_string().to_uppercase(),
            target: target.to_string(),
            message,
        }
    }

    /// Format for the `logs` command
    pub fn format_for_display(&self) -> String {
        format!(
            "[{}] {} [{}] {}",
            self.timestamp, self.level, self.target, self.message
        )
    }
}

/// Thread-safe ring buffer for log entries
#[derive(Clone, Default)]
pub struct LogRingBuffer {
    entries: Arc<Mutex<VecDeque<LogEntry>>>,
}

impl LogRingBuffer {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(MAX_LOG_ENTRIES))),
        }
    }

    // A panic while holding the lock leaves the entries intact
    fn lock(&self) -> MutexGuard<'_, VecDeque<LogEntry>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn push(&self, entry: LogEntry) {
        let mut entries = self.lock();
        if entries.len() >= MAX_LOG_ENTRIES {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    pub fn get_recent(&self, count: usize) -> Vec<LogEntry> {
        let entries = self.lock();
        let skip = entries.len().saturating_sub(count);
        entries.iter().skip(skip).cloned().collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

/// Custom writer that captures formatted tracing output into the ring buffer
#[derive(Clone)]
pub struct RingBufferWriter {
    buffer: LogRingBuffer,
}

impl RingBufferWriter {
    pub fn new(buffer: LogRingBuffer) -> Self {
        Self { buffer }
    }
}

fn split_level(message: &str) -> Option<(Level, &str)> {
    const LEVELS: [(&str, Level); 5] = [
        ("TRACE ", Level::TRACE),
        ("DEBUG ", Level::DEBUG),
        ("INFO ", Level::INFO),
        ("WARN ", Level::WARN),
        ("ERROR ", Level::ERROR),
    ];
    LEVELS
        .iter()
        .find_map(|(prefix, level)| message.strip_prefix(prefix).map(|rest| (*level, rest)))
}

impl std::io::Write for RingBufferWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let Ok(message) = std::str::from_utf8(buf) else {
            return Ok(buf.len());
        };
        let message = message.trim();
        if message.is_empty() {
            return Ok(buf.len());
        }

        // Compact format is "LEVEL target: message"
        let Some((level, rest)) = split_level(message) else {
            self.buffer
                .push(LogEntry::new(Level::INFO, "general", message.to_string()));
            return Ok(buf.len());
        };

        let (target, msg) = match rest.split_once(": ") {
            Some((target, msg)) if !target.contains(' ') => (target, msg.trim()),
            _ => ("general", rest),
        };

        self.buffer
            .push(LogEntry::new(level, target, msg.to_string()));
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for RingBufferWriter {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Global log buffer accessible throughout the application
static LOG_BUFFER: OnceLock<LogRingBuffer> = OnceLock::new();

/// Get the global log buffer, creating it on first use
pub fn get_log_buffer() -> LogRingBuffer {
    LOG_BUFFER.get_or_init(LogRingBuffer::new).clone()
}

/// Initialize tracing with the ring buffer writer.
///
/// `RUST_LOG` wins over `default_filter` when set. Calling this twice keeps
/// the first subscriber.
pub fn init_tracing(default_filter: &str) -> LogRingBuffer {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let buffer = get_log_buffer();
    let writer = RingBufferWriter::new(buffer.clone());

    let fmt_layer = fmt::layer()
        .with_writer(writer)
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .without_time()
        .compact();

    let filter = EnvFilter::try_from_default_env()
        .ok()
        .or_else(|| EnvFilter::try_new(default_filter).ok())
        .unwrap_or_else(|| EnvFilter::new("info"));

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(target: "system", "Tracing initialized");
    }

    buffer
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_ring_buffer_caps_entries() {
        let buffer = LogRingBuffer::new();
        for i in 0..(MAX_LOG_ENTRIES + 5) {
            buffer.push(LogEntry::new(Level::INFO, "test", format!("entry {}", i)));
        }
        assert_eq!(buffer.len(), MAX_LOG_ENTRIES);

        let recent = buffer.get_recent(2);
        assert_eq!(recent[0].message, format!("entry {}", MAX_LOG_ENTRIES + 3));
        assert_eq!(recent[1].message, format!("entry {}", MAX_LOG_ENTRIES + 4));
    }

    #[test]
    fn test_writer_parses_compact_lines() {
        let buffer = LogRingBuffer::new();
        let mut writer = RingBufferWriter::new(buffer.clone());

        writer
            .write_all(b" WARN user_directory::view::engine: rejected page size 0\n")
            .unwrap();
        writer.write_all(b"plain line\n").unwrap();
        writer.write_all(b"   \n").unwrap();

        let entries = buffer.get_recent(10);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].level, "WARN");
        assert_eq!(entries[0].target, "user_directory::view::engine");
        assert_eq!(entries[0].message, "rejected page size 0");
        assert_eq!(entries[1].target, "general");
    }

    #[test]
    fn test_clear() {
        let buffer = LogRingBuffer::new();
        buffer.push(LogEntry::new(Level::DEBUG, "test", "x".to_string()));
        assert!(!buffer.is_empty());
        buffer.clear();
        assert!(buffer.is_empty());
        assert!(buffer.get_recent(5).is_empty());
    }
}
