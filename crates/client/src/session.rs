//! Состояние входа: текущий principal, сохраняемый в файл сессии

use common::{DashboardResult, ValidationError};
use domain::Principal;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Serialize, Deserialize)]
struct SessionFile {
    principal: Principal,
}

type ClearHook = Box<dyn Fn() + Send + Sync>;

/// Сессия клиента. Выход вызывает clear-хуки (сброс кэша запросов)
pub struct Session {
    path: Option<PathBuf>,
    principal: RwLock<Option<Principal>>,
    clear_hooks: Mutex<Vec<ClearHook>>,
}

impl Session {
    /// Загрузить сессию из файла; отсутствующий или битый файл даёт пустую сессию
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let principal = match Self::read_file(&path) {
            Ok(principal) => principal,
            Err(e) => {
                warn!("Ignoring unreadable session file {}: {}", path.display(), e);
                None
            }
        };

        Self {
            path: Some(path),
            principal: RwLock::new(principal),
            clear_hooks: Mutex::new(Vec::new()),
        }
    }

    /// Сессия без файла
    pub fn ephemeral() -> Self {
        Self {
            path: None,
            principal: RwLock::new(None),
            clear_hooks: Mutex::new(Vec::new()),
        }
    }

    fn read_file(path: &Path) -> DashboardResult<Option<Principal>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        let file: SessionFile = serde_json::from_str(&content)?;
        Ok(Some(file.principal).filter(|p| !p.is_anonymous()))
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn principal(&self) -> Option<Principal> {
        self.principal.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.principal.read().is_some()
    }

    /// Зарегистрировать хук, вызываемый при выходе и смене principal'а
    pub fn on_clear(&self, hook: impl Fn() + Send + Sync + 'static) {
        self.clear_hooks.lock().push(Box::new(hook));
    }

    fn run_clear_hooks(&self) {
        for hook in self.clear_hooks.lock().iter() {
            hook();
        }
    }

    pub fn login(&self, principal: Principal) -> DashboardResult<()> {
        if principal.is_anonymous() {
            return Err(ValidationError::InvalidInput {
                field: "principal".to_string(),
                reason: "cannot log in as the anonymous principal".to_string(),
            }
            .into());
        }

        if let Some(path) = &self.path {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            let content = serde_json::to_string_pretty(&SessionFile {
                principal: principal.clone(),
            })?;
            fs::write(path, content)?;
            debug!("Session saved to {}", path.display());
        }

        let previous = self.principal.write().replace(principal.clone());
        if previous.is_some_and(|p| p != principal) {
            self.run_clear_hooks();
        }
        info!("Logged in as {}", principal);
        Ok(())
    }

    pub fn logout(&self) -> DashboardResult<()> {
        if let Some(path) = &self.path {
            if path.exists() {
                fs::remove_file(path)?;
            }
        }

        self.principal.write().take();
        self.run_clear_hooks();
        info!("Logged out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;

    #[test]
    fn test_login_persists_and_reloads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let session = Session::load(&path);
        assert!(!session.is_authenticated());
        session.login(Principal::new("alice")).unwrap();

        let reloaded = Session::load(&path);
        assert_eq!(reloaded.principal(), Some(Principal::new("alice")));
    }

    #[test]
    fn test_logout_runs_clear_hooks_and_removes_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        let session = Session::load(&path);
        let cleared = Arc::new(AtomicUsize::new(0));
        let counter = cleared.clone();
        session.on_clear(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        session.login(Principal::new("alice")).unwrap();
        assert_eq!(cleared.load(Ordering::SeqCst), 0);

        session.logout().unwrap();
        assert_eq!(cleared.load(Ordering::SeqCst), 1);
        assert!(!path.exists());
        assert!(session.principal().is_none());
    }

    #[test]
    fn test_anonymous_login_rejected() {
        let session = Session::ephemeral();
        assert!(session.login(Principal::anonymous()).is_err());
    }

    #[test]
    fn test_corrupted_file_gives_empty_session() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        assert!(Session::load(&path).principal().is_none());
    }
}
