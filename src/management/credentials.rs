use std::{
    future::Future,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use tokio::io::AsyncWriteExt;

use crate::{
    error::{Error, Result},
    types::{Credentials, GoogleCredentialsFile},
};

/// Something that can durably record a credential set.
///
/// The token supplier only needs this half of the store, which keeps it
/// testable without touching the filesystem.
pub trait CredentialSink: Send + Sync {
    fn save(&self, credentials: &Credentials) -> impl Future<Output = Result<()>> + Send;
}

/// File-backed credential record.
///
/// The record is JSON, replaced wholesale on every save through a temporary
/// file and a rename. The temporary file is created owner-only (0600).
/// Concurrent writers from separate processes are not coordinated.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Reads the record, or an empty one when nothing has been saved yet.
    pub async fn load(&self) -> Result<Credentials> {
        let content = match async_fs::read_to_string(&self.path).await {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Credentials::default()),
            Err(e) => return Err(Error::Io(e)),
        };
        let creds: Credentials = serde_json::from_str(&content)?;
        Ok(creds)
    }

    pub async fn save(&self, credentials: &Credentials) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                async_fs::create_dir_all(parent).await?;
                restrict_permissions(parent, 0o700).await?;
            }
        }

        let json = serde_json::to_string_pretty(credentials)?;
        let temp_path = self.path.with_extension("tmp");
        if let Err(e) = replace_with(&temp_path, &self.path, json.as_bytes()).await {
            let _ = async_fs::remove_file(&temp_path).await;
            return Err(e);
        }

        tracing::debug!(path = %self.path.display(), "credentials saved");
        Ok(())
    }

    /// Removes the record. Removing a missing record succeeds.
    pub async fn clear(&self) -> Result<()> {
        match async_fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Io(e)),
        }
    }
}

impl CredentialSink for CredentialStore {
    async fn save(&self, credentials: &Credentials) -> Result<()> {
        CredentialStore::save(self, credentials).await
    }
}

// Writes `data` to a fresh owner-only file at `temp_path`, then moves it over `target`.
async fn replace_with(temp_path: &Path, target: &Path, data: &[u8]) -> Result<()> {
    match async_fs::remove_file(temp_path).await {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(Error::Io(e)),
    }

    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(temp_path).await?;
    file.write_all(data).await?;
    file.sync_all().await?;
    drop(file);

    async_fs::rename(temp_path, target).await?;
    Ok(())
}

#[cfg(unix)]
async fn restrict_permissions(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    async_fs::set_permissions(path, std::fs::Permissions::from_mode(mode)).await?;
    Ok(())
}

#[cfg(not(unix))]
async fn restrict_permissions(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}

/// Extracts client id and secret from a Google Cloud Console client JSON.
///
/// Accepts both the `installed` (desktop) and `web` layouts.
pub async fn parse_credentials_file(path: &Path) -> Result<(String, String)> {
    let content = async_fs::read_to_string(path).await?;
    let file: GoogleCredentialsFile = serde_json::from_str(&content)?;
    match file.installed.or(file.web) {
        Some(entry) => Ok((entry.client_id, entry.client_secret)),
        None => Err(Error::Configuration(
            "credentials file must have 'installed' or 'web' key".to_string(),
        )),
    }
}
