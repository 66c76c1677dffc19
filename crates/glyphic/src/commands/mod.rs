pub mod analyze;
pub mod expand;
pub mod init;
pub mod log;
pub mod predict;
pub mod report;
pub mod version;
