use log::{error, info, warn};
use mockall::automock;
use std::{
    fmt::{self, Display},
    io,
    sync::{Arc, Mutex},
};
use thiserror::Error;
use time::{
    format_description::{self, OwnedFormatItem},
    OffsetDateTime, UtcOffset,
};

/// A sink appending lines to a file.
pub mod file;

/// The default timestamp format of the deploy log, e.g. `2024-01-31 12:00:00+09:00`.
pub const DEFAULT_DATE_FORMAT: &str =
    "[year]-[month]-[day] [hour]:[minute]:[second][offset_hour sign:mandatory]:[offset_minute]";

/// A custom error describing the error cases for the journal.
#[derive(Debug, Error)]
pub enum JournalError {
    /// The date format cannot be parsed. The parameters are the format and the reason.
    #[error("invalid date format {0:?} ({1})")]
    InvalidDateFormat(String, String),
}

/// Severity of a journal entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Info,
    Error,
}

impl Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Info => write!(f, "INFO"),
            Level::Error => write!(f, "ERROR"),
        }
    }
}

/// One line of the deploy log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: OffsetDateTime,
    pub level: Level,
    pub message: String,
}

impl LogEntry {
    /// Format the entry as `<timestamp> --- <LEVEL>: <message>`.
    pub fn format(&self, date_format: &OwnedFormatItem) -> Result<String, time::error::Format> {
        let timestamp = self.timestamp.format(date_format)?;
        Ok(format!("{timestamp} --- {}: {}", self.level, self.message))
    }
}

/// The destination of the deploy log lines.
#[automock]
pub trait LogSink {
    /// Append one line to the end of the log.
    fn append(&mut self, line: &str) -> io::Result<()>;
}

/// A sink that keeps the lines in memory. Clones share the same lines.
#[derive(Clone, Debug, Default)]
pub struct MemorySink(Arc<Mutex<Vec<String>>>);

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All lines appended so far.
    pub fn lines(&self) -> Vec<String> {
        match self.0.lock() {
            Ok(lines) => lines.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl LogSink for MemorySink {
    fn append(&mut self, line: &str) -> io::Result<()> {
        self.0
            .lock()
            .map_err(|_| io::Error::other("memory sink is poisoned"))?
            .push(line.to_string());
        Ok(())
    }
}

/// The audit trail of the deployments.
///
/// Every entry is written to the sink (if there is one) with a timestamp and a level,
/// and mirrored to the application log. Failing to write the sink never fails the
/// deployment, it only emits a warning.
pub struct Journal {
    sink: Option<Box<dyn LogSink>>,
    date_format: OwnedFormatItem,
    offset: UtcOffset,
}

impl Journal {
    /// Create a journal writing to the sink, or only to the application log if there is none.
    ///
    /// The offset is the timezone of the timestamps. It should be determined at startup,
    /// because the local offset cannot be safely queried once there are multiple threads.
    pub fn new(
        sink: Option<Box<dyn LogSink>>,
        date_format: &str,
        offset: UtcOffset,
    ) -> Result<Self, JournalError> {
        let date_format = format_description::parse_owned::<1>(date_format).map_err(|err| {
            JournalError::InvalidDateFormat(date_format.to_string(), err.to_string())
        })?;

        Ok(Journal {
            sink,
            date_format,
            offset,
        })
    }

    pub fn info(&mut self, message: impl AsRef<str>) {
        self.write(Level::Info, message.as_ref());
    }

    pub fn error(&mut self, message: impl AsRef<str>) {
        self.write(Level::Error, message.as_ref());
    }

    fn write(&mut self, level: Level, message: &str) {
        match level {
            Level::Info => info!("{message}"),
            Level::Error => error!("{message}"),
        }

        let Some(sink) = self.sink.as_mut() else {
            return;
        };

        let entry = LogEntry {
            timestamp: OffsetDateTime::now_utc().to_offset(self.offset),
            level,
            message: message.to_string(),
        };
        let result = entry
            .format(&self.date_format)
            .map_err(|err| err.to_string())
            .and_then(|line| sink.append(&line).map_err(|err| err.to_string()));
        if let Err(err) = result {
            warn!("Cannot write the deploy log: {err}.");
        }
    }
}
