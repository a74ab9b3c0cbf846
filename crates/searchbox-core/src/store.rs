#![forbid(unsafe_code)]

//! Keyed session store.
//!
//! One [`SessionStore`] holds the records of every widget in one host
//! session. Records are addressed only by their own key; nothing here ever
//! touches a record through another key.
//!
//! # Lifecycle
//!
//! ```text
//! get_or_init(k) ──(absent)──▶ create from seed, fresh identity
//!                └─(present)─▶ unchanged (seed ignored)
//! reset(k)       ────────────▶ replace from seed, fresh identity
//! get(k)         ──(absent)──▶ Err(SessionUnavailable)
//! remove(k) / retain(..)     ▶ host drops records it no longer renders
//! ```

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::session::{SearchSession, SessionSeed};

/// The record for a key is gone.
///
/// Raised when an event arrives for a widget whose record the host has
/// already dropped, e.g. from a stale cycle. Callers at the cycle entry treat
/// it as benign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUnavailable {
    pub key: String,
}

impl core::fmt::Display for SessionUnavailable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "no session record for key {:?}", self.key)
    }
}

impl std::error::Error for SessionUnavailable {}

/// Keyed container of [`SearchSession`] records.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<String, SearchSession>,
    next_generation: u64,
}

fn bump(next: &mut u64) -> u64 {
    *next += 1;
    *next
}

#[cfg(feature = "tracing")]
fn log_created(key: &str, generation: u64) {
    tracing::debug!(
        target: "searchbox.store",
        key = %key,
        generation = generation,
        "session record created"
    );
}

#[cfg(not(feature = "tracing"))]
fn log_created(_key: &str, _generation: u64) {}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the record for `key`, creating it from `seed` if absent.
    ///
    /// The seed is only honored on creation.
    pub fn get_or_init(&mut self, key: &str, seed: &SessionSeed) -> &mut SearchSession {
        match self.sessions.entry(key.to_owned()) {
            Entry::Occupied(slot) => slot.into_mut(),
            Entry::Vacant(slot) => {
                let generation = bump(&mut self.next_generation);
                log_created(key, generation);
                slot.insert(SearchSession::from_seed(key, seed, generation))
            }
        }
    }

    /// Replace the record for `key` unconditionally.
    pub fn reset(&mut self, key: &str, seed: &SessionSeed) -> &mut SearchSession {
        let generation = bump(&mut self.next_generation);
        log_created(key, generation);
        let session = SearchSession::from_seed(key, seed, generation);
        match self.sessions.entry(key.to_owned()) {
            Entry::Occupied(mut slot) => {
                slot.insert(session);
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(session),
        }
    }

    /// Look up an existing record.
    pub fn get(&self, key: &str) -> Result<&SearchSession, SessionUnavailable> {
        self.sessions.get(key).ok_or_else(|| SessionUnavailable {
            key: key.to_owned(),
        })
    }

    /// Look up an existing record for mutation.
    pub fn get_mut(&mut self, key: &str) -> Result<&mut SearchSession, SessionUnavailable> {
        self.sessions.get_mut(key).ok_or_else(|| SessionUnavailable {
            key: key.to_owned(),
        })
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.sessions.contains_key(key)
    }

    /// Drop the record for `key`, returning it if present.
    pub fn remove(&mut self, key: &str) -> Option<SearchSession> {
        let removed = self.sessions.remove(key);

        #[cfg(feature = "tracing")]
        if removed.is_some() {
            tracing::debug!(target: "searchbox.store", key = %key, "session record removed");
        }

        removed
    }

    /// Keep only the records whose key satisfies `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.sessions.retain(|key, _| keep(key));
    }

    pub fn clear(&mut self) {
        self.sessions.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Keys of all live records, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.sessions.keys().map(String::as_str)
    }
}

/// A [`SessionStore`] shared between threads.
///
/// Hosts that serve one session from several threads must serialize
/// `get_or_init` / `reset` / dispatch per session; this wrapper does that with
/// a single mutex around the whole store.
#[derive(Debug, Clone, Default)]
pub struct SharedSessionStore {
    inner: Arc<Mutex<SessionStore>>,
}

impl SharedSessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock the store on behalf of `key`.
    ///
    /// A poisoned lock means a previous cycle panicked mid-mutation; the
    /// record for `key` is then reported unavailable rather than trusted.
    pub fn lock_for(&self, key: &str) -> Result<MutexGuard<'_, SessionStore>, SessionUnavailable> {
        self.inner.lock().map_err(|_| SessionUnavailable {
            key: key.to_owned(),
        })
    }

    /// Run `f` with exclusive access to the store.
    pub fn with_store<R>(
        &self,
        key: &str,
        f: impl FnOnce(&mut SessionStore) -> R,
    ) -> Result<R, SessionUnavailable> {
        let mut guard = self.lock_for(key)?;
        Ok(f(&mut guard))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::option::Item;
    use crate::value::Value;
    use serde_json::json;

    fn seed() -> SessionSeed {
        SessionSeed::new("dflt")
            .with_searchterm("start")
            .with_options(vec![Item::bare("x"), Item::bare("y")])
    }

    #[test]
    fn get_or_init_creates_once() {
        let mut store = SessionStore::new();
        let first = store.get_or_init("k", &seed()).clone();
        assert_eq!(first.result(), &json!("dflt"));
        assert_eq!(first.search(), "start");
        assert_eq!(first.options_native().len(), 2);

        // Different seed is ignored for an existing key.
        let again = store.get_or_init("k", &SessionSeed::new(99)).clone();
        assert_eq!(again, first);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn reset_replaces_and_changes_identity() {
        let mut store = SessionStore::new();
        let before = store.get_or_init("k", &seed()).clone();
        store.get_mut("k").unwrap().commit_result(json!("picked"));
        store.get_mut("k").unwrap().record_search("typed");

        let after = store.reset("k", &seed()).clone();
        assert_eq!(after.result(), &json!("dflt"));
        assert_eq!(after.search(), "start");
        assert_ne!(after.render_identity(), before.render_identity());
    }

    #[test]
    fn reset_creates_when_absent() {
        let mut store = SessionStore::new();
        store.reset("fresh", &SessionSeed::default());
        assert!(store.contains("fresh"));
    }

    #[test]
    fn identities_never_repeat() {
        let mut store = SessionStore::new();
        let a = store.get_or_init("a", &SessionSeed::default()).render_identity().clone();
        let b = store.get_or_init("b", &SessionSeed::default()).render_identity().clone();
        let a2 = store.reset("a", &SessionSeed::default()).render_identity().clone();
        store.remove("a");
        let a3 = store.get_or_init("a", &SessionSeed::default()).render_identity().clone();
        let gens = [a.generation(), b.generation(), a2.generation(), a3.generation()];
        for (i, x) in gens.iter().enumerate() {
            for y in &gens[i + 1..] {
                assert_ne!(x, y);
            }
        }
    }

    #[test]
    fn get_missing_is_unavailable() {
        let store = SessionStore::new();
        let err = store.get("nope").unwrap_err();
        assert_eq!(err.key, "nope");
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn keys_are_isolated() {
        let mut store = SessionStore::new();
        store.get_or_init("one", &SessionSeed::default());
        store.get_or_init("two", &SessionSeed::default());
        store.get_mut("one").unwrap().commit_result(json!(1));
        assert_eq!(store.get("two").unwrap().result(), &Value::Null);
    }

    #[test]
    fn retain_and_remove() {
        let mut store = SessionStore::new();
        for key in ["a", "b", "c"] {
            store.get_or_init(key, &SessionSeed::default());
        }
        store.retain(|key| key != "b");
        let mut keys: Vec<_> = store.keys().collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["a", "c"]);
        assert!(store.remove("a").is_some());
        assert!(store.remove("a").is_none());
        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn shared_store_serializes_access() {
        let shared = SharedSessionStore::new();
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let shared = shared.clone();
                std::thread::spawn(move || {
                    let key = format!("k{i}");
                    shared
                        .with_store(&key, |store| {
                            store.get_or_init(&key, &SessionSeed::new(i));
                        })
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        let len = shared.with_store("any", |store| store.len()).unwrap();
        assert_eq!(len, 4);
    }
}
