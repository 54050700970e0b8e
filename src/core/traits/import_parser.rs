use std::path::Path;

use crate::core::errors::Result;
use crate::core::models::import_row::ImportRow;

/// Port for reading bulk import files into normalized rows.
///
/// Implementations upper-case and trim ids, skip rows without an id,
/// render cell values as trimmed strings and drop blank cells.
pub trait ImportParser: Send + Sync {
    /// Parse raw file content read from `source`.
    fn parse(&self, content: &str, source: &Path) -> Result<Vec<ImportRow>>;

    /// File extensions this parser handles (e.g. `["json"]`).
    fn supported_extensions(&self) -> &[&str];
}
