//! Durable session record.
//!
//! One well-known file holds the serialized `{token, user}` pair. The store
//! is the only writer; everything else goes through it. A missing or
//! unparsable record is "no session", never an error.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::session::Principal;

const SESSION_FILE_NAME: &str = "session.json";

#[derive(Serialize, Deserialize)]
struct PersistedSession {
    token: String,
    user: Principal,
}

/// Location of the persisted session record.
#[derive(Clone, Debug)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Well-known per-user location of the session record.
    ///
    /// # Errors
    /// Returns an error if no home directory can be resolved.
    pub fn default_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "EcoTrack", "ecotrack")
            .context("could not resolve a home directory for the session file")?;
        Ok(dirs.data_local_dir().join(SESSION_FILE_NAME))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted record, if present and structurally valid.
    ///
    /// Corrupt records are logged and discarded, not surfaced as errors.
    pub fn load(&self) -> Option<(SecretString, Principal)> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no persisted session");
            return None;
        }

        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) => {
                warn!(path = %self.path.display(), "failed to read session file: {err}");
                return None;
            }
        };

        match serde_json::from_str::<PersistedSession>(&content) {
            Ok(record) => Some((SecretString::from(record.token), record.user)),
            Err(err) => {
                warn!(path = %self.path.display(), "discarding malformed session record: {err}");
                None
            }
        }
    }

    /// Write the record, creating parent directories as needed.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created or the file
    /// cannot be written.
    pub fn save(&self, token: &SecretString, user: &Principal) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory: {}", parent.display()))?;
        }

        let record = PersistedSession {
            token: token.expose_secret().to_string(),
            user: user.clone(),
        };

        let content = serde_json::to_string(&record).context("failed to serialize session")?;
        fs::write(&self.path, content)
            .with_context(|| format!("failed to write session file: {}", self.path.display()))?;

        set_file_permissions(&self.path)?;

        debug!(path = %self.path.display(), "session record written");
        Ok(())
    }

    /// Remove the record. Removing an absent record is a no-op.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be removed.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "session record removed");
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).with_context(|| {
                format!("failed to remove session file: {}", self.path.display())
            }),
        }
    }
}

// The record holds a bearer token; keep it readable by the owner only.
#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
        .with_context(|| format!("failed to set permissions on {}", path.display()))
}

#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Role;
    use tempfile::tempdir;

    fn principal() -> Principal {
        Principal {
            id: 1,
            email: "a@x.com".to_string(),
            role: Role::Admin,
        }
    }

    #[test]
    fn round_trip() -> Result<()> {
        let dir = tempdir()?;
        let file = SessionFile::new(dir.path().join("session.json"));

        file.save(&SecretString::from("t1".to_string()), &principal())?;

        let (token, user) = file.load().context("expected a record")?;
        assert_eq!(token.expose_secret(), "t1");
        assert_eq!(user, principal());
        Ok(())
    }

    #[test]
    fn missing_file_is_no_session() -> Result<()> {
        let dir = tempdir()?;
        let file = SessionFile::new(dir.path().join("session.json"));
        assert!(file.load().is_none());
        Ok(())
    }

    #[test]
    fn malformed_record_is_no_session() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json")?;

        let file = SessionFile::new(path);
        assert!(file.load().is_none());
        Ok(())
    }

    #[test]
    fn unknown_role_is_no_session() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("session.json");
        fs::write(
            &path,
            r#"{"token":"t1","user":{"id":1,"email":"a@x.com","role":"operator"}}"#,
        )?;

        let file = SessionFile::new(path);
        assert!(file.load().is_none());
        Ok(())
    }

    #[test]
    fn clear_is_idempotent() -> Result<()> {
        let dir = tempdir()?;
        let file = SessionFile::new(dir.path().join("session.json"));

        file.save(&SecretString::from("t1".to_string()), &principal())?;
        file.clear()?;
        assert!(file.load().is_none());

        // A second clear with nothing on disk is a no-op.
        file.clear()?;
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn record_is_owner_readable_only() -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir()?;
        let file = SessionFile::new(dir.path().join("session.json"));
        file.save(&SecretString::from("t1".to_string()), &principal())?;

        let mode = fs::metadata(file.path())?.permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        Ok(())
    }
}
