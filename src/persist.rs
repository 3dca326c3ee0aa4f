use crate::error::SaveError;
use log::{error, info};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes `data` as two space indented JSON to `dir/filename`, replacing whatever was there.
/// Failures are logged with the path and also handed back.
pub fn save_json<T, P>(data: &T, filename: &str, dir: P) -> Result<PathBuf, SaveError>
where
    T: Serialize + ?Sized,
    P: AsRef<Path>,
{
    let file_path = dir.as_ref().join(filename);
    match write_pretty(data, &file_path) {
        Ok(()) => {
            info!("Data successfully saved to {}", file_path.display());
            Ok(file_path)
        }
        Err(e) => {
            error!("{}", e);
            Err(e)
        }
    }
}

fn write_pretty<T: Serialize + ?Sized>(data: &T, file_path: &Path) -> Result<(), SaveError> {
    // Serialize first so a bad value never truncates an existing file
    let content = serde_json::to_vec_pretty(data).map_err(|source| SaveError::Serialize {
        path: file_path.to_path_buf(),
        source,
    })?;
    let io_err = |source| SaveError::Io {
        path: file_path.to_path_buf(),
        source,
    };
    let file = File::create(file_path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&content).map_err(io_err)?;
    writer.flush().map_err(io_err)?;
    Ok(())
}
