pub mod audit_recorder;
pub mod catalog_service;
pub mod diff_service;
pub mod restore_engine;
