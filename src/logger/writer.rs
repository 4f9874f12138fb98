//! Log file opening for the file output

use crate::logger::config::FileConfig;
use crate::logger::error::LoggerError;
use std::fs::{File, OpenOptions};
use std::sync::Mutex;

/// Open the configured log file, creating its parent directory.
///
/// The returned `Mutex<File>` is used directly as a `MakeWriter`; records are
/// written unbuffered so nothing is lost when the process exits.
pub(crate) fn open_log_file(config: &FileConfig) -> Result<Mutex<File>, LoggerError> {
    if !config.enabled {
        return Err(LoggerError::config("File output is disabled"));
    }

    if let Some(parent) = config.path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .map_err(|e| LoggerError::open_file(parent, e))?;
    }

    let mut options = OpenOptions::new();
    options.create(true);
    if config.append {
        options.append(true);
    } else {
        options.write(true).truncate(true);
    }

    let file = options
        .open(&config.path)
        .map_err(|e| LoggerError::open_file(&config.path, e))?;

    Ok(Mutex::new(file))
}
