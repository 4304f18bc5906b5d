pub mod app_state;
pub mod args;
pub mod config;
pub mod file_set;
pub mod options;
pub mod scenario;
pub mod workspace;
