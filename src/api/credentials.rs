//! Persistence of the bearer token between runs.

use super::CredentialStoreError;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

const CREDENTIALS_FILE_NAME: &str = "credentials";

/// Storage for the bearer token issued at login.
pub trait CredentialStore: Send + Sync {
    /// Loads the stored token, if any.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialStoreError`] when the store cannot be read.
    fn load(&self) -> Result<Option<String>, CredentialStoreError>;

    /// Replaces the stored token.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialStoreError`] when the store cannot be written.
    fn store(&self, token: &str) -> Result<(), CredentialStoreError>;

    /// Removes the stored token. Removing an absent token succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialStoreError`] when the store cannot be written.
    fn clear(&self) -> Result<(), CredentialStoreError>;
}

/// Token store that lives only as long as the process.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentialStore {
    token: Arc<Mutex<Option<String>>>,
}

impl InMemoryCredentialStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `token`.
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Arc::new(Mutex::new(Some(token.into()))),
        }
    }

    fn slot(&self) -> Result<std::sync::MutexGuard<'_, Option<String>>, CredentialStoreError> {
        self.token
            .lock()
            .map_err(|err| CredentialStoreError::Poisoned(err.to_string()))
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn load(&self) -> Result<Option<String>, CredentialStoreError> {
        Ok(self.slot()?.clone())
    }

    fn store(&self, token: &str) -> Result<(), CredentialStoreError> {
        *self.slot()? = Some(token.to_owned());
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialStoreError> {
        *self.slot()? = None;
        Ok(())
    }
}

/// Token store backed by a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Creates a store at an explicit path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a store at `<config dir>/taskpilot/credentials`.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialStoreError::NoLocation`] when the platform has no
    /// configuration directory.
    pub fn default_location() -> Result<Self, CredentialStoreError> {
        dirs::config_dir()
            .map(|dir| Self::new(dir.join("taskpilot").join(CREDENTIALS_FILE_NAME)))
            .ok_or(CredentialStoreError::NoLocation)
    }

    /// Returns the file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<String>, CredentialStoreError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| token.to_owned()))
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn store(&self, token: &str) -> Result<(), CredentialStoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token)?;
        restrict_permissions(&self.path);
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialStoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    if let Err(error) = fs::set_permissions(path, fs::Permissions::from_mode(0o600)) {
        tracing::warn!(%error, path = %path.display(), "failed to restrict credential file");
    }
}

#[cfg(not(unix))]
const fn restrict_permissions(_path: &Path) {}
