//! CLI command implementations

pub mod config;
pub mod entry;
pub mod info;
pub mod init;
pub mod list;

pub use config::execute as config;
pub use entry::{get, put, remove};
pub use info::{clear, info};
pub use init::execute as init;
pub use list::{keys, namespaces};
