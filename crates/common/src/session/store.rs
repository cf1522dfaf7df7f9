use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{BearerToken, LoginTicket};

pub const TOKEN_FILE_NAME: &str = "token";
pub const TICKET_FILE_NAME: &str = "ticket.json";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("corrupt login ticket: {0}")]
    Ticket(#[from] serde_json::Error),
}

/// Persistent client-side session state: the issued token and the ticket of
/// a handshake still in progress, under separate keys.
pub trait SessionStore: Send + Sync {
    fn load_token(&self) -> Result<Option<BearerToken>, StoreError>;
    fn save_token(&self, token: &BearerToken) -> Result<(), StoreError>;
    fn clear_token(&self) -> Result<(), StoreError>;

    fn load_ticket(&self) -> Result<Option<LoginTicket>, StoreError>;
    fn save_ticket(&self, ticket: &LoginTicket) -> Result<(), StoreError>;
    fn clear_ticket(&self) -> Result<(), StoreError>;
}

/// Session state kept as two files in one directory.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn token_path(&self) -> PathBuf {
        self.dir.join(TOKEN_FILE_NAME)
    }

    fn ticket_path(&self) -> PathBuf {
        self.dir.join(TICKET_FILE_NAME)
    }

    fn read(path: &Path) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    fn write(&self, path: &Path, contents: &str) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        };
        fs::create_dir_all(&self.dir).map_err(io_err)?;

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(path).map_err(io_err)?;

        // `mode` only applies on creation; tighten files left by older runs.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))
                .map_err(io_err)?;
        }

        file.write_all(contents.as_bytes()).map_err(io_err)?;
        Ok(())
    }

    fn remove(path: &Path) -> Result<(), StoreError> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

impl SessionStore for FileSessionStore {
    fn load_token(&self) -> Result<Option<BearerToken>, StoreError> {
        Ok(Self::read(&self.token_path())?
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .map(BearerToken::new))
    }

    fn save_token(&self, token: &BearerToken) -> Result<(), StoreError> {
        self.write(&self.token_path(), token.secret())
    }

    fn clear_token(&self) -> Result<(), StoreError> {
        Self::remove(&self.token_path())
    }

    fn load_ticket(&self) -> Result<Option<LoginTicket>, StoreError> {
        match Self::read(&self.ticket_path())? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn save_ticket(&self, ticket: &LoginTicket) -> Result<(), StoreError> {
        let raw = serde_json::to_string(ticket)?;
        self.write(&self.ticket_path(), &raw)
    }

    fn clear_ticket(&self) -> Result<(), StoreError> {
        Self::remove(&self.ticket_path())
    }
}

/// In-process session state, gone when dropped.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    token: Mutex<Option<BearerToken>>,
    ticket: Mutex<Option<LoginTicket>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: BearerToken) -> Self {
        Self {
            token: Mutex::new(Some(token)),
            ticket: Mutex::new(None),
        }
    }

    pub fn with_ticket(ticket: LoginTicket) -> Self {
        Self {
            token: Mutex::new(None),
            ticket: Mutex::new(Some(ticket)),
        }
    }
}

fn slot<T: Clone>(m: &Mutex<Option<T>>) -> std::sync::MutexGuard<'_, Option<T>> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl SessionStore for MemorySessionStore {
    fn load_token(&self) -> Result<Option<BearerToken>, StoreError> {
        Ok(slot(&self.token).clone())
    }

    fn save_token(&self, token: &BearerToken) -> Result<(), StoreError> {
        *slot(&self.token) = Some(token.clone());
        Ok(())
    }

    fn clear_token(&self) -> Result<(), StoreError> {
        *slot(&self.token) = None;
        Ok(())
    }

    fn load_ticket(&self) -> Result<Option<LoginTicket>, StoreError> {
        Ok(slot(&self.ticket).clone())
    }

    fn save_ticket(&self, ticket: &LoginTicket) -> Result<(), StoreError> {
        *slot(&self.ticket) = Some(ticket.clone());
        Ok(())
    }

    fn clear_ticket(&self) -> Result<(), StoreError> {
        *slot(&self.ticket) = None;
        Ok(())
    }
}
