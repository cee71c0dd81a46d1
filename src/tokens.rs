use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

const KEYRING_SERVICE: &str = "com.aistaff.client";
pub const ACCESS_TOKEN_KEY: &str = "aistaff_access_token";
pub const REFRESH_TOKEN_KEY: &str = "aistaff_refresh_token";

/// Access/refresh credential pair. No expiry metadata is tracked; validity
/// is discovered by a failed authenticated request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Durable storage for the token pair.
///
/// The pair is read, written and cleared as a unit: no interleaving of
/// store operations can produce a mismatched access/refresh combination
/// within the process.
pub trait TokenStore: Send + Sync {
    async fn pair(&self) -> Option<TokenPair>;
    async fn store(&self, pair: TokenPair);
    async fn clear(&self);

    async fn access_token(&self) -> Option<String> {
        self.pair().await.map(|p| p.access_token)
    }
}

enum Cache {
    Unloaded,
    Loaded(Option<TokenPair>),
}

/// Token pair persisted in the OS keychain/secret service as two entries
/// with fixed names, fronted by an in-memory cache.
///
/// On platforms without a usable secret service the store degrades to the
/// in-memory cache: tokens survive for the process lifetime only.
#[derive(Clone)]
pub struct KeyringTokenStore {
    access: Option<Arc<keyring::Entry>>,
    refresh: Option<Arc<keyring::Entry>>,
    cache: Arc<Mutex<Cache>>,
}

impl KeyringTokenStore {
    pub fn new() -> Self {
        Self {
            access: keyring::Entry::new(KEYRING_SERVICE, ACCESS_TOKEN_KEY)
                .ok()
                .map(Arc::new),
            refresh: keyring::Entry::new(KEYRING_SERVICE, REFRESH_TOKEN_KEY)
                .ok()
                .map(Arc::new),
            cache: Arc::new(Mutex::new(Cache::Unloaded)),
        }
    }

    pub fn is_available(&self) -> bool {
        self.access.is_some() && self.refresh.is_some()
    }

    fn read_entry(entry: Option<&Arc<keyring::Entry>>) -> Option<String> {
        let value = entry?.get_password().ok()?;
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    fn load_persisted(&self) -> Option<TokenPair> {
        let access_token = Self::read_entry(self.access.as_ref())?;
        let refresh_token = Self::read_entry(self.refresh.as_ref())?;
        Some(TokenPair {
            access_token,
            refresh_token,
        })
    }
}

impl Default for KeyringTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStore for KeyringTokenStore {
    async fn pair(&self) -> Option<TokenPair> {
        let mut guard = self.cache.lock().await;
        if let Cache::Loaded(pair) = &*guard {
            return pair.clone();
        }
        let pair = self.load_persisted();
        *guard = Cache::Loaded(pair.clone());
        pair
    }

    async fn store(&self, pair: TokenPair) {
        let mut guard = self.cache.lock().await;
        if let Some(entry) = &self.access {
            if entry.set_password(&pair.access_token).is_err() {
                tracing::warn!("failed to persist access token; keeping it in memory only");
            }
        }
        if let Some(entry) = &self.refresh {
            if entry.set_password(&pair.refresh_token).is_err() {
                tracing::warn!("failed to persist refresh token; keeping it in memory only");
            }
        }
        *guard = Cache::Loaded(Some(pair));
    }

    async fn clear(&self) {
        let mut guard = self.cache.lock().await;
        if let Some(entry) = &self.access {
            let _ = entry.delete_credential();
        }
        if let Some(entry) = &self.refresh {
            let _ = entry.delete_credential();
        }
        *guard = Cache::Loaded(None);
    }
}

/// In-memory token store for tests and embedding scenarios where keychain
/// access is undesirable.
#[derive(Default)]
pub struct MemoryTokenStore {
    pair: Mutex<Option<TokenPair>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pair(pair: TokenPair) -> Self {
        Self {
            pair: Mutex::new(Some(pair)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    async fn pair(&self) -> Option<TokenPair> {
        self.pair.lock().await.clone()
    }

    async fn store(&self, pair: TokenPair) {
        *self.pair.lock().await = Some(pair);
    }

    async fn clear(&self) {
        *self.pair.lock().await = None;
    }
}
