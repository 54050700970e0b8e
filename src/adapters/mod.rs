pub mod entity_stores;
pub mod log_stores;
pub mod parsers;
