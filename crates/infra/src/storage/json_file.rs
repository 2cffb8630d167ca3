//! JSON record file backing credentials, schedules and bookings
//!
//! The whole file is read once at startup. Schedules and bookings are
//! read-only afterwards; credential updates are written back through a temp
//! file and a rename.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use slotwise_core::{BookingStore, CredentialStore, ScheduleDirectory};
use slotwise_domain::{AccessCredential, ConfirmedBooking, Result, Schedule, SlotwiseError};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

/// On-disk layout.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataFile {
    #[serde(default)]
    pub credentials: BTreeMap<String, AccessCredential>,
    #[serde(default)]
    pub schedules: Vec<Schedule>,
    #[serde(default)]
    pub bookings: Vec<ConfirmedBooking>,
}

pub struct JsonFileStore {
    path: PathBuf,
    credentials: DashMap<String, AccessCredential>,
    schedules: Vec<Schedule>,
    bookings: Vec<ConfirmedBooking>,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Load the record file. A missing file yields an empty store that is
    /// created on the first credential write.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let data = match fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice::<DataFile>(&bytes).map_err(|e| {
                SlotwiseError::Storage(format!("invalid data file {}: {e}", path.display()))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("data file not found, starting empty");
                DataFile::default()
            }
            Err(e) => {
                return Err(SlotwiseError::Storage(format!(
                    "failed to read data file {}: {e}",
                    path.display()
                )))
            }
        };

        info!(
            credentials = data.credentials.len(),
            schedules = data.schedules.len(),
            bookings = data.bookings.len(),
            "data file loaded"
        );
        Ok(Self::from_data(path, data))
    }

    pub fn from_data(path: PathBuf, data: DataFile) -> Self {
        Self {
            path,
            credentials: data.credentials.into_iter().collect(),
            schedules: data.schedules,
            bookings: data.bookings,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn snapshot(&self) -> DataFile {
        DataFile {
            credentials: self
                .credentials
                .iter()
                .map(|entry| (entry.key().clone(), entry.value().clone()))
                .collect(),
            schedules: self.schedules.clone(),
            bookings: self.bookings.clone(),
        }
    }

    async fn persist(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let data = serde_json::to_vec_pretty(&self.snapshot())
            .map_err(|e| SlotwiseError::Storage(format!("failed to encode data file: {e}")))?;

        let temp_path = self.path.with_extension("tmp");
        if let Some(parent) = temp_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(storage_io)?;
        }

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .await
            .map_err(storage_io)?;
        file.write_all(&data).await.map_err(storage_io)?;
        file.sync_all().await.map_err(storage_io)?;
        drop(file);

        fs::rename(&temp_path, &self.path).await.map_err(storage_io)?;
        debug!(bytes = data.len(), "data file written");
        Ok(())
    }
}

fn storage_io(err: std::io::Error) -> SlotwiseError {
    SlotwiseError::Storage(err.to_string())
}

#[async_trait]
impl CredentialStore for JsonFileStore {
    async fn get(&self, principal_id: &str) -> Result<Option<AccessCredential>> {
        Ok(self.credentials.get(principal_id).map(|entry| entry.value().clone()))
    }

    #[instrument(skip(self, credential))]
    async fn put(&self, principal_id: &str, credential: AccessCredential) -> Result<()> {
        self.credentials.insert(principal_id.to_string(), credential);
        self.persist().await
    }
}

#[async_trait]
impl BookingStore for JsonFileStore {
    async fn list_confirmed_bookings(&self, schedule_id: &str) -> Result<Vec<ConfirmedBooking>> {
        Ok(self.bookings.iter().filter(|b| b.schedule_id == schedule_id).cloned().collect())
    }
}

#[async_trait]
impl ScheduleDirectory for JsonFileStore {
    async fn resolve(&self, schedule_id: &str) -> Result<Option<Schedule>> {
        Ok(self.schedules.iter().find(|s| s.id == schedule_id).cloned())
    }
}
