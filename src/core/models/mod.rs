pub mod diff_result;
pub mod import_row;
pub mod log_entry;
pub mod record;
pub mod restore_outcome;
pub mod target;
