use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{AuthError, Result};
use crate::session::{CachedSession, LegacySession};

/// Either shape a stored session file might be in. [`FileCredentialStore`]
/// loads and returns whichever one parses; callers that need a fresh
/// [`crate::AuthSession`] drive the `Legacy` case through a refresh and
/// re-save it under the current schema.
#[derive(Debug, Clone)]
pub enum StoredSession {
    Current(CachedSession),
    Legacy(LegacySession),
}

/// An opaque key-value persistence layer for sessions, keyed by account
/// (Microsoft account email or gamertag — whatever the caller uses to
/// distinguish profiles). The default implementation is [`FileCredentialStore`].
pub trait CredentialStore {
    fn load(&self, account: &str) -> Result<Option<StoredSession>>;
    fn save(&self, account: &str, session: &CachedSession) -> Result<()>;
    fn clear(&self, account: &str) -> Result<()>;
    fn list(&self) -> Result<Vec<String>>;
}

/// Stores one JSON file per account under `base_dir`, written via
/// temp-file-plus-rename so a crash mid-write never leaves a half-written
/// session file, with owner-only (`0600`) permissions on Unix.
pub struct FileCredentialStore {
    base_dir: PathBuf,
}

impl FileCredentialStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn path_for(&self, account: &str) -> PathBuf {
        self.base_dir.join(format!("{}.json", sanitize(account)))
    }
}

fn sanitize(account: &str) -> String {
    account
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '@' || c == '.' || c == '-' { c } else { '_' })
        .collect()
}

impl CredentialStore for FileCredentialStore {
    fn load(&self, account: &str) -> Result<Option<StoredSession>> {
        let path = self.path_for(account);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(AuthError::Store(e.to_string())),
        };

        if let Ok(current) = serde_json::from_str::<CachedSession>(&raw) {
            return Ok(Some(StoredSession::Current(current)));
        }
        if let Ok(legacy) = serde_json::from_str::<LegacySession>(&raw) {
            tracing::info!(account, "migrating legacy single-field session record");
            return Ok(Some(StoredSession::Legacy(legacy)));
        }

        Err(AuthError::Store(format!(
            "session file for {account} matches neither the current nor legacy schema"
        )))
    }

    fn save(&self, account: &str, session: &CachedSession) -> Result<()> {
        fs::create_dir_all(&self.base_dir).map_err(|e| AuthError::Store(e.to_string()))?;

        let path = self.path_for(account);
        let tmp_path = path.with_extension("json.tmp");
        let body = serde_json::to_vec_pretty(session).map_err(|e| AuthError::Store(e.to_string()))?;

        fs::write(&tmp_path, &body).map_err(|e| AuthError::Store(e.to_string()))?;
        set_owner_only_permissions(&tmp_path)?;
        fs::rename(&tmp_path, &path).map_err(|e| AuthError::Store(e.to_string()))?;

        Ok(())
    }

    fn clear(&self, account: &str) -> Result<()> {
        match fs::remove_file(self.path_for(account)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AuthError::Store(e.to_string())),
        }
    }

    fn list(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.base_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(AuthError::Store(e.to_string())),
        };

        let mut accounts = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| AuthError::Store(e.to_string()))?;
            if let Some(stem) = stem_json(&entry.path()) {
                accounts.push(stem);
            }
        }
        Ok(accounts)
    }
}

fn stem_json(path: &Path) -> Option<String> {
    if path.extension()?.to_str()? != "json" {
        return None;
    }
    path.file_stem()?.to_str().map(str::to_string)
}

#[cfg(unix)]
fn set_owner_only_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let perms = fs::Permissions::from_mode(0o600);
    fs::set_permissions(path, perms).map_err(|e| AuthError::Store(e.to_string()))
}

#[cfg(not(unix))]
fn set_owner_only_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::SystemTime;

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path());

        let session = CachedSession::new(
            "access".to_string(),
            "refresh".to_string(),
            uuid::Uuid::nil(),
            "Notch".to_string(),
            SystemTime::now(),
        );
        store.save("notch@example.com", &session).unwrap();

        match store.load("notch@example.com").unwrap() {
            Some(StoredSession::Current(loaded)) => {
                assert_eq!(loaded.username, "Notch");
            }
            other => panic!("expected a current-schema session, got {other:?}"),
        }
    }

    #[test]
    fn legacy_single_field_session_is_recognized() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("legacy.json"), r#"{"refresh_token":"abc"}"#).unwrap();

        let store = FileCredentialStore::new(dir.path());
        match store.load("legacy").unwrap() {
            Some(StoredSession::Legacy(legacy)) => assert_eq!(legacy.refresh_token, "abc"),
            other => panic!("expected a legacy session, got {other:?}"),
        }
    }

    #[test]
    fn missing_account_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path());
        assert!(store.load("nobody").unwrap().is_none());
    }

    #[test]
    fn list_returns_saved_accounts() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path());
        let session = CachedSession::new(
            "a".to_string(),
            "r".to_string(),
            uuid::Uuid::nil(),
            "Steve".to_string(),
            SystemTime::now(),
        );
        store.save("steve", &session).unwrap();
        assert_eq!(store.list().unwrap(), vec!["steve".to_string()]);
    }

    #[cfg(unix)]
    #[test]
    fn saved_file_has_owner_only_permissions() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path());
        let session = CachedSession::new(
            "a".to_string(),
            "r".to_string(),
            uuid::Uuid::nil(),
            "Steve".to_string(),
            SystemTime::now(),
        );
        store.save("steve", &session).unwrap();
        let meta = fs::metadata(dir.path().join("steve.json")).unwrap();
        assert_eq!(meta.permissions().mode() & 0o777, 0o600);
    }
}
