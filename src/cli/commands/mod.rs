pub mod add;
pub mod bulk_edit;
pub mod delete;
pub mod diff;
pub mod edit;
pub mod import;
pub mod init;
pub mod loan;
pub mod log;
pub mod restore;
pub mod show;
pub mod workspace;
