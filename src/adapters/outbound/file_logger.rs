use crate::domains::logger::{DomainLogger, FileLogger};
use log::LevelFilter;
use std::sync::Arc;

/// Initialise the `fast_log` file appender and return a logger the runtime can inject.
pub fn init_file_logger(path: &str, level: LevelFilter) -> Result<Arc<dyn DomainLogger>, String> {
    FileLogger::init(path, level).map_err(|e| format!("Failed to initialize fast_log: {}", e))?;
    Ok(Arc::new(FileLogger))
}
