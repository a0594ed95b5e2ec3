use std::{
    fs::OpenOptions,
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Name of the recognition log, created next to the images being read.
pub const LOG_FILE_NAME: &str = "log.txt";

/// What to do with recognised text besides showing it on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WriteMode {
    #[default]
    Off,
    Append,
    Overwrite,
}

impl WriteMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Off => "Off",
            Self::Append => "Append",
            Self::Overwrite => "Overwrite",
        }
    }
}

/// Path of the recognition log for the given image directory.
pub fn log_path(directory: &Path) -> PathBuf {
    directory.join(LOG_FILE_NAME)
}

/// Write one recognition result to the log at `path` according to `mode`.
pub fn log_text(text: &str, mode: WriteMode, path: &Path) -> Result<()> {
    let mut file = match mode {
        WriteMode::Off => return Ok(()),
        WriteMode::Append => OpenOptions::new().create(true).append(true).open(path),
        WriteMode::Overwrite => OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path),
    }
    .with_context(|| format!("Could not open log file `{}`", path.display()))?;

    writeln!(file, "{text}")
        .with_context(|| format!("Could not write to log file `{}`", path.display()))?;

    Ok(())
}
