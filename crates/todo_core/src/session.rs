//! Current-account session holder.
//!
//! # Responsibility
//! - Persist the logged-in account id outside the database.
//! - Hand out an explicit [`Session`] context that scopes every
//!   category/task call.
//!
//! # Invariants
//! - At most one account id is stored at a time.
//! - File writes go through a temp file + rename, so a crash leaves either
//!   the old or the new session, never a partial one.

use crate::model::account::AccountId;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use uuid::Uuid;

pub type SessionResult<T> = Result<T, SessionError>;

/// Scoping context for one logged-in account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    account_id: AccountId,
}

impl Session {
    pub fn new(account_id: AccountId) -> Self {
        Self { account_id }
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }
}

/// Errors from session persistence.
#[derive(Debug)]
pub enum SessionError {
    /// Reading or writing the backing file failed.
    Io(std::io::Error),
    /// Backing file exists but cannot be decoded.
    Corrupt(String),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "session storage failed: {err}"),
            Self::Corrupt(message) => write!(f, "session storage is corrupt: {message}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Corrupt(_) => None,
        }
    }
}

impl From<std::io::Error> for SessionError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Device-local storage for the current account id.
pub trait SessionStore {
    /// Returns the stored account id, if any.
    fn load(&self) -> SessionResult<Option<AccountId>>;
    /// Replaces the stored account id.
    fn save(&self, account_id: AccountId) -> SessionResult<()>;
    /// Removes the stored account id. Clearing an empty store is a no-op.
    fn clear(&self) -> SessionResult<()>;

    /// Returns the stored account id as a scoping context.
    fn current(&self) -> SessionResult<Option<Session>> {
        Ok(self.load()?.map(Session::new))
    }
}

impl<T: SessionStore + ?Sized> SessionStore for &T {
    fn load(&self) -> SessionResult<Option<AccountId>> {
        (**self).load()
    }

    fn save(&self, account_id: AccountId) -> SessionResult<()> {
        (**self).save(account_id)
    }

    fn clear(&self) -> SessionResult<()> {
        (**self).clear()
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFile {
    account_id: Option<String>,
}

/// JSON-file session store (`{"account_id": "..."}`).
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_file(&self, contents: &SessionFile) -> SessionResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let encoded = serde_json::to_vec(contents)
            .map_err(|err| SessionError::Corrupt(format!("encode failed: {err}")))?;
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, encoded)?;
        std::fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> SessionResult<Option<AccountId>> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let decoded: SessionFile = serde_json::from_slice(&bytes).map_err(|err| {
            warn!("event=session_load module=session status=error error_code=session_corrupt");
            SessionError::Corrupt(err.to_string())
        })?;

        decoded
            .account_id
            .map(|raw| {
                Uuid::parse_str(raw.trim())
                    .map_err(|_| SessionError::Corrupt(format!("invalid account id `{raw}`")))
            })
            .transpose()
    }

    fn save(&self, account_id: AccountId) -> SessionResult<()> {
        self.write_file(&SessionFile {
            account_id: Some(account_id.to_string()),
        })?;
        info!("event=session_save module=session status=ok");
        Ok(())
    }

    fn clear(&self) -> SessionResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }
        info!("event=session_clear module=session status=ok");
        Ok(())
    }
}

/// Process-local session store for tests and ephemeral hosts.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<AccountId>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> SessionResult<Option<AccountId>> {
        Ok(*self.slot.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn save(&self, account_id: AccountId) -> SessionResult<()> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(account_id);
        Ok(())
    }

    fn clear(&self) -> SessionResult<()> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}
