//! Session state: the bearer token on disk and the signed-in profile in
//! memory.
//!
//! There is one session per process. It lives in an explicit
//! [`SessionStore`] handed to whoever needs it; consumers that want to
//! react to changes subscribe rather than reading ambient state.

use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, RwLock};

use moneta_core::Profile;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::error::ApiError;

/// The authenticated identity of the current user.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub profile: Profile,
}

/// Outcome of the startup session check.
#[derive(Debug)]
pub enum SessionState {
    /// No usable token; nothing was fetched.
    Anonymous,
    /// A session is loaded (either already present or freshly fetched).
    Active(Session),
    /// The profile fetch failed for a non-auth reason. The token is kept;
    /// the user is not logged out for a transient error.
    Unavailable(ApiError),
}

/// Persistence for the single well-known token key.
///
/// All three operations are safe to call at any time from any number of
/// in-flight requests; clearing an empty store is a no-op.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Option<String>;
    fn save(&self, token: &str) -> io::Result<()>;
    fn clear(&self) -> io::Result<()>;
}

/// Treat the literal strings some upstream bugs persist as no token at all,
/// so we never send `Authorization: Bearer undefined`.
fn real_token(raw: String) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "undefined" || trimmed == "null" {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct TokenFile {
    token: Option<String>,
}

/// Token storage as a small JSON file under the app home
/// (`~/.moneta/auth.json`).
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<String> {
        let text = std::fs::read_to_string(&self.path).ok()?;
        let file: TokenFile = match serde_json::from_str(&text) {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!("ignoring malformed token file {}: {e}", self.path.display());
                return None;
            }
        };
        file.token.and_then(real_token)
    }

    fn save(&self, token: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = TokenFile {
            token: Some(token.to_string()),
        };
        let text = serde_json::to_string_pretty(&file).map_err(io::Error::other)?;
        std::fs::write(&self.path, text)
    }

    fn clear(&self) -> io::Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

/// In-memory store for tests and one-off scripted use.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.token.lock().unwrap().clone().and_then(real_token)
    }

    fn save(&self, token: &str) -> io::Result<()> {
        *self.token.lock().unwrap() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        *self.token.lock().unwrap() = None;
        Ok(())
    }
}

type InvalidatedHook = Box<dyn Fn() + Send + Sync>;

/// Observable holder for the process-wide session.
///
/// Any in-flight request may call [`SessionStore::invalidate`] on a 401;
/// the token clear and the in-memory clear are both idempotent, so the
/// result is the same whichever request gets there first.
pub struct SessionStore {
    current: watch::Sender<Option<Session>>,
    tokens: Arc<dyn TokenStore>,
    on_invalidated: RwLock<Option<InvalidatedHook>>,
    /// Serializes bootstrap so concurrent callers share one profile fetch.
    pub(crate) bootstrap_gate: tokio::sync::Mutex<()>,
}

impl SessionStore {
    pub fn new(tokens: Arc<dyn TokenStore>) -> Self {
        let (current, _) = watch::channel(None);
        Self {
            current,
            tokens,
            on_invalidated: RwLock::new(None),
            bootstrap_gate: tokio::sync::Mutex::new(()),
        }
    }

    /// Watch for session changes; the receiver always holds the latest
    /// value.
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.current.subscribe()
    }

    pub fn current(&self) -> Option<Session> {
        self.current.borrow().clone()
    }

    /// The persisted token, with sentinel values already filtered out.
    pub fn token(&self) -> Option<String> {
        self.tokens.load()
    }

    pub fn store_token(&self, token: &str) -> io::Result<()> {
        self.tokens.save(token)
    }

    pub fn set(&self, session: Session) {
        self.current.send_replace(Some(session));
    }

    /// Register the side effect to run when the session is invalidated by
    /// an authorization failure (the CLI points the user back at login).
    pub fn on_invalidated(&self, hook: impl Fn() + Send + Sync + 'static) {
        *self.on_invalidated.write().unwrap() = Some(Box::new(hook));
    }

    /// Drop the session everywhere: persisted token, in-memory state, and
    /// all subscribers. Fires the `on_invalidated` hook once per
    /// transition out of a signed-in state; repeated calls are no-ops.
    pub fn invalidate(&self) {
        let had_token = self.tokens.load().is_some();
        if let Err(e) = self.tokens.clear() {
            tracing::warn!("could not clear stored token: {e}");
        }
        let had_session = self.current.send_replace(None).is_some();

        if had_token || had_session {
            if let Some(hook) = self.on_invalidated.read().unwrap().as_ref() {
                hook();
            }
        }
    }

    /// Explicit sign-out: same clearing as [`invalidate`](Self::invalidate)
    /// but without the expired-session side effect.
    pub fn log_out(&self) {
        if let Err(e) = self.tokens.clear() {
            tracing::warn!("could not clear stored token: {e}");
        }
        self.current.send_replace(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn profile() -> Profile {
        Profile {
            full_name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            profile_image_url: None,
        }
    }

    #[test]
    fn test_sentinel_tokens_load_as_none() {
        for sentinel in ["undefined", "null", "", "  "] {
            let store = MemoryTokenStore::with_token(sentinel);
            assert_eq!(store.load(), None, "sentinel {sentinel:?} leaked");
        }
        assert_eq!(
            MemoryTokenStore::with_token("abc123").load(),
            Some("abc123".to_string())
        );
    }

    #[test]
    fn test_file_store_round_trip_and_idempotent_clear() {
        let path = std::env::temp_dir().join(format!("moneta-token-{}.json", std::process::id()));
        let store = FileTokenStore::new(path.clone());

        assert_eq!(store.load(), None);
        store.save("tok-1").unwrap();
        assert_eq!(store.load(), Some("tok-1".to_string()));

        store.clear().unwrap();
        assert_eq!(store.load(), None);
        // Clearing an already-empty store must not fail.
        store.clear().unwrap();

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_invalidate_clears_everything_and_fires_hook_once() {
        let store = SessionStore::new(Arc::new(MemoryTokenStore::with_token("tok")));
        store.set(Session {
            token: "tok".to_string(),
            profile: profile(),
        });

        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        store.on_invalidated(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let rx = store.subscribe();
        store.invalidate();

        assert_eq!(store.token(), None);
        assert_eq!(store.current(), None);
        assert!(rx.borrow().is_none());
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        // Second 401 arriving late changes nothing.
        store.invalidate();
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_log_out_does_not_fire_expired_hook() {
        let store = SessionStore::new(Arc::new(MemoryTokenStore::with_token("tok")));
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        store.on_invalidated(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        store.log_out();
        assert_eq!(store.token(), None);
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_subscribers_see_updates() {
        let store = SessionStore::new(Arc::new(MemoryTokenStore::default()));
        let rx = store.subscribe();
        assert!(rx.borrow().is_none());

        store.set(Session {
            token: "tok".to_string(),
            profile: profile(),
        });
        assert_eq!(
            rx.borrow().as_ref().map(|s| s.profile.email.clone()),
            Some("ada@example.com".to_string())
        );
    }
}
