pub mod field_assignment;
pub mod json_import_parser;
