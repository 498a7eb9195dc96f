//! Credential pair holder.
//!
//! A [`Session`] is passed explicitly to the transport; there is no global
//! token state. Clones share the same credentials, so the transport and the
//! auth client always observe each other's writes. Writes are last-write-wins.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Snapshot of the stored credential pair.
///
/// Both absent means unauthenticated. The serialized keys are fixed:
/// `access_token` and `refresh_token`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(rename = "access_token", default)]
    pub access: Option<String>,
    #[serde(rename = "refresh_token", default)]
    pub refresh: Option<String>,
}

impl Credentials {
    pub fn is_empty(&self) -> bool {
        self.access.is_none() && self.refresh.is_none()
    }
}

#[derive(Clone, Debug, Default)]
pub struct Session {
    path: Option<Arc<PathBuf>>,
    inner: Arc<Mutex<Credentials>>,
}

impl Session {
    /// Session that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Session persisted to `path`.
    ///
    /// A missing file yields an empty session; an unreadable one is logged
    /// and treated as empty.
    pub fn load_or_empty(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let credentials = match read_json_file(&path) {
            Ok(credentials) => credentials,
            Err(SessionError::Io(err)) if err.kind() == io::ErrorKind::NotFound => {
                Credentials::default()
            }
            Err(err) => {
                tracing::warn!("ignoring unreadable session file {}: {err}", path.display());
                Credentials::default()
            }
        };

        Self {
            path: Some(Arc::new(path)),
            inner: Arc::new(Mutex::new(credentials)),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref().map(PathBuf::as_path)
    }

    /// Overwrites both credentials.
    ///
    /// The file is written first; if that fails the previous pair stays in
    /// memory untouched.
    pub async fn set(
        &self,
        access: impl Into<String>,
        refresh: impl Into<String>,
    ) -> Result<(), SessionError> {
        let credentials = Credentials {
            access: Some(access.into()),
            refresh: Some(refresh.into()),
        };

        let mut guard = self.inner.lock().await;
        if let Some(path) = &self.path {
            write_json_file(path, &credentials)?;
        }
        *guard = credentials;
        Ok(())
    }

    pub async fn get(&self) -> Credentials {
        self.inner.lock().await.clone()
    }

    pub async fn access(&self) -> Option<String> {
        let guard = self.inner.lock().await;
        guard.access.clone().filter(|token| !token.is_empty())
    }

    pub async fn refresh(&self) -> Option<String> {
        let guard = self.inner.lock().await;
        guard.refresh.clone().filter(|token| !token.is_empty())
    }

    pub async fn is_authenticated(&self) -> bool {
        self.access().await.is_some()
    }

    /// Removes both credentials.
    ///
    /// Memory is cleared first and unconditionally; the error only reports a
    /// persisted file that could not be removed.
    pub async fn clear(&self) -> Result<(), SessionError> {
        let mut guard = self.inner.lock().await;
        *guard = Credentials::default();

        if let Some(path) = &self.path {
            match fs::remove_file(path.as_path()) {
                Ok(()) => {}
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }
}

fn read_json_file(path: &Path) -> Result<Credentials, SessionError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn write_json_file(path: &Path, credentials: &Credentials) -> Result<(), SessionError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_vec_pretty(credentials)?;

    let tmp = path.with_extension("tmp");
    let mut file = open_private(&tmp)?;
    file.write_all(&json)?;
    file.sync_all()?;
    drop(file);

    match fs::rename(&tmp, path) {
        Ok(()) => Ok(()),
        Err(_) => {
            fs::copy(&tmp, path)?;
            let _ = fs::remove_file(&tmp);
            Ok(())
        }
    }
}

/// Tokens are bearer secrets: the file is readable by its owner only.
#[cfg(unix)]
fn open_private(path: &Path) -> io::Result<fs::File> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // `mode` only applies on creation; a leftover tmp file keeps its bits.
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    Ok(file)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> io::Result<fs::File> {
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}
