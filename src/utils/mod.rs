pub mod command;
pub mod dir;
pub mod errors;
pub mod execution;
pub mod file_logger;
pub mod logger;
pub mod semver;
pub mod shlex;
pub mod string;
pub mod variables;
