use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use admin_sdk::{errors::Result, AdminError, CookieStorage, StoredCookie};
use chrono::Utc;
use dashmap::DashMap;

/// Cookie jar for the console.
///
/// Persistent cookies are written to a JSON file so a remembered login
/// survives between runs. Session cookies stay in memory and die with the
/// process. Expired cookies read as absent and are evicted on access.
#[derive(Debug, Clone)]
pub struct FileCookieJar {
    path: PathBuf,
    session: Arc<DashMap<String, StoredCookie>>,
    file_lock: Arc<Mutex<()>>,
}

type CookieFile = BTreeMap<String, StoredCookie>;

impl FileCookieJar {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            session: Arc::new(DashMap::new()),
            file_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `f` over the on-disk cookies, writing them back if it returns true.
    fn with_file<T>(&self, f: impl FnOnce(&mut CookieFile) -> (T, bool)) -> Result<T> {
        let _guard = self
            .file_lock
            .lock()
            .map_err(|_| AdminError::Storage("cookie file lock poisoned".to_string()))?;

        let mut cookies = self.read_file()?;
        let (value, dirty) = f(&mut cookies);
        if dirty {
            self.write_file(&cookies)?;
        }
        Ok(value)
    }

    fn read_file(&self) -> Result<CookieFile> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(CookieFile::new()),
            Err(e) => return Err(storage_error(&self.path, e)),
        };
        if contents.trim().is_empty() {
            return Ok(CookieFile::new());
        }

        serde_json::from_str(&contents).or_else(|e| {
            tracing::warn!(
                "Ignoring unreadable cookie file {}: {}",
                self.path.display(),
                e
            );
            Ok(CookieFile::new())
        })
    }

    fn write_file(&self, cookies: &CookieFile) -> Result<()> {
        if cookies.is_empty() {
            return match std::fs::remove_file(&self.path) {
                Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
                    Err(storage_error(&self.path, e))
                }
                _ => Ok(()),
            };
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| storage_error(parent, e))?;
        }
        let json = serde_json::to_vec_pretty(cookies)?;
        std::fs::write(&self.path, json).map_err(|e| storage_error(&self.path, e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .map_err(|e| storage_error(&self.path, e))?;
        }
        Ok(())
    }
}

fn storage_error(path: &Path, err: std::io::Error) -> AdminError {
    AdminError::Storage(format!("{}: {}", path.display(), err))
}

impl CookieStorage for FileCookieJar {
    fn set(&self, name: &str, cookie: StoredCookie) -> Result<()> {
        if cookie.is_persistent() {
            self.session.remove(name);
            self.with_file(|cookies| {
                cookies.insert(name.to_string(), cookie);
                ((), true)
            })
        } else {
            // A session cookie replaces any remembered one of the same name.
            self.session.insert(name.to_string(), cookie);
            self.with_file(|cookies| ((), cookies.remove(name).is_some()))
        }
    }

    fn get(&self, name: &str) -> Result<Option<StoredCookie>> {
        if let Some(cookie) = self.session.get(name) {
            return Ok(Some(cookie.clone()));
        }

        let now = Utc::now();
        self.with_file(|cookies| match cookies.get(name) {
            Some(cookie) if cookie.is_expired_at(now) => {
                tracing::debug!("Cookie {} expired, evicting", name);
                cookies.remove(name);
                (None, true)
            }
            Some(cookie) => (Some(cookie.clone()), false),
            None => (None, false),
        })
    }

    fn remove(&self, name: &str) -> Result<()> {
        self.session.remove(name);
        self.with_file(|cookies| ((), cookies.remove(name).is_some()))
    }
}
