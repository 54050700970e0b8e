pub mod entity_store;
pub mod import_parser;
pub mod log_store;
