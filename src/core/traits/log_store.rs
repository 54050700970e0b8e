use crate::core::errors::Result;
use crate::core::models::log_entry::{LogEntry, LogFilter, Page};

/// Port for the append-only audit log.
///
/// Entries are never updated or removed through this interface.
pub trait LogStore: Send + Sync {
    /// Append an entry to the log.
    fn append(&self, entry: &LogEntry) -> Result<()>;

    /// Fetch a single entry by id. `Ok(None)` when no entry has that id.
    fn get(&self, id: &str) -> Result<Option<LogEntry>>;

    /// Entries matching `filter`, newest first, windowed by `page`.
    ///
    /// Ordered by timestamp descending; entries with equal timestamps
    /// come in reverse insertion order.
    fn list(&self, filter: &LogFilter, page: Page) -> Result<Vec<LogEntry>>;

    /// Number of entries matching `filter`.
    fn count(&self, filter: &LogFilter) -> Result<usize>;
}
