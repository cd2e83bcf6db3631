use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::ports::DeviceStore;
use crate::error::AppError;

/// Keeps the anonymous device id in a small file so it survives restarts.
pub struct FileDeviceStore {
    path: PathBuf,
}

impl FileDeviceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DeviceStore for FileDeviceStore {
    fn load_or_create(&self) -> Result<String, AppError> {
        match fs::read_to_string(&self.path) {
            Ok(existing) if !existing.trim().is_empty() => {
                debug!("Loaded device id from {}", self.path.display());
                return Ok(existing.trim().to_string());
            }
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                return Err(AppError::InternalWithMsg(format!(
                    "Failed to read device id from {}: {}", self.path.display(), e
                )));
            }
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::InternalWithMsg(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let id = Uuid::new_v4().to_string();
        fs::write(&self.path, &id).map_err(|e| {
            AppError::InternalWithMsg(format!("Failed to persist device id to {}: {}", self.path.display(), e))
        })?;
        info!("Generated new device id at {}", self.path.display());
        Ok(id)
    }
}
