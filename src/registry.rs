//! Per-seed mutual exclusion for sessions shared across threads.
//!
//! Sessions are keyed by their published server hash. Each one sits behind its own mutex, so
//! calls against one seed identity run one at a time (nonce bump and sink emit included) while
//! different seeds proceed in parallel.
use crate::error::Error;
use crate::session::Session;
use crate::sink::StateSink;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use tracing::debug;

type Shared<S> = Arc<Mutex<Session<S>>>;

pub struct SessionRegistry<S: StateSink> {
    sessions: RwLock<HashMap<String, Shared<S>>>,
}

impl<S: StateSink> Default for SessionRegistry<S> {
    fn default() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }
}

impl<S: StateSink> SessionRegistry<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session under its server hash, returning the key.
    ///
    /// A session already registered under the same hash is rejected.
    pub fn insert(&self, session: Session<S>) -> Result<String, Error> {
        let key = session.state().server_hash.clone();
        let mut guard = self.sessions.write().expect("registry lock poisoned");
        if guard.contains_key(&key) {
            return Err(Error::InvalidConfig(format!(
                "session {key} already registered"
            )));
        }
        guard.insert(key.clone(), Arc::new(Mutex::new(session)));
        debug!(server_hash = %key, "session registered");
        Ok(key)
    }

    pub fn contains(&self, server_hash: &str) -> bool {
        self.sessions
            .read()
            .expect("registry lock poisoned")
            .contains_key(server_hash)
    }

    pub fn len(&self) -> usize {
        self.sessions.read().expect("registry lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run `f` with exclusive access to the session for `server_hash`.
    ///
    /// Fails with [`Error::UnknownSession`] if the session was rotated away while waiting.
    pub fn with_session<T>(
        &self,
        server_hash: &str,
        f: impl FnOnce(&mut Session<S>) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let shared = self.get(server_hash)?;
        let mut session = shared.lock().expect("session lock poisoned");
        if session.state().server_hash != server_hash {
            return Err(Error::UnknownSession(server_hash.to_owned()));
        }
        f(&mut session)
    }

    /// Take the session for `server_hash` out of the registry.
    ///
    /// A session another caller is still using stays registered and yields
    /// [`Error::SessionBusy`].
    pub fn remove(&self, server_hash: &str) -> Result<Session<S>, Error> {
        let mut guard = self.sessions.write().expect("registry lock poisoned");
        let shared = guard
            .remove(server_hash)
            .ok_or_else(|| Error::UnknownSession(server_hash.to_owned()))?;
        match Arc::try_unwrap(shared) {
            Ok(mutex) => Ok(mutex.into_inner().expect("session lock poisoned")),
            Err(shared) => {
                guard.insert(server_hash.to_owned(), shared);
                Err(Error::SessionBusy(server_hash.to_owned()))
            }
        }
    }

    /// Rotate the session for `server_hash` in place and re-key it, returning the new key.
    ///
    /// Only the session's own lock is held while the next seeds are derived; the registry
    /// lock is taken just for the key swap.
    pub fn rotate(
        &self,
        server_hash: &str,
        salt: &str,
        client_seed: Option<&str>,
    ) -> Result<String, Error> {
        let shared = self.get(server_hash)?;
        let mut session = shared.lock().expect("session lock poisoned");
        if session.state().server_hash != server_hash {
            return Err(Error::UnknownSession(server_hash.to_owned()));
        }
        let next = session.next(salt, client_seed)?;
        let key = next.server_hash.clone();
        {
            let mut guard = self.sessions.write().expect("registry lock poisoned");
            match guard.get(server_hash) {
                Some(current) if Arc::ptr_eq(current, &shared) => {}
                _ => return Err(Error::UnknownSession(server_hash.to_owned())),
            }
            if guard.contains_key(&key) {
                return Err(Error::InvalidConfig(format!(
                    "session {key} already registered"
                )));
            }
            guard.remove(server_hash);
            guard.insert(key.clone(), Arc::clone(&shared));
        }
        session.adopt(next);
        debug!(from = %server_hash, to = %key, "session rotated");
        Ok(key)
    }

    fn get(&self, server_hash: &str) -> Result<Shared<S>, Error> {
        self.sessions
            .read()
            .expect("registry lock poisoned")
            .get(server_hash)
            .cloned()
            .ok_or_else(|| Error::UnknownSession(server_hash.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::RecordingSink;
    use crate::types::{SeedConfig, SeedConfigBuilder};
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    fn session(sink: RecordingSink) -> Session<RecordingSink> {
        let config = SeedConfigBuilder::default()
            .server_seed("server")
            .client_seed("client")
            .build()
            .unwrap();
        Session::with_sink(config, sink).unwrap()
    }

    #[test]
    fn concurrent_calls_on_one_seed_are_serialized() {
        let sink = RecordingSink::new();
        let registry = Arc::new(SessionRegistry::new());
        let key = registry.insert(session(sink.clone())).unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let registry = Arc::clone(&registry);
                let key = key.clone();
                thread::spawn(move || {
                    for _ in 0..25 {
                        registry.with_session(&key, |s| s.ints(1, 100, 0)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let nonces: Vec<u64> = sink.snapshots().iter().map(|s| s.nonce).collect();
        assert_eq!(nonces, (1..=100).collect::<Vec<u64>>());
        let nonce = registry.with_session(&key, |s| Ok(s.state().nonce)).unwrap();
        assert_eq!(nonce, 100);
    }

    #[test]
    fn duplicate_and_unknown_keys_are_rejected() {
        let registry = SessionRegistry::new();
        registry.insert(session(RecordingSink::new())).unwrap();
        assert!(registry.insert(session(RecordingSink::new())).is_err());
        assert!(matches!(
            registry.with_session("missing", |s| s.tick().map(|_| ())),
            Err(Error::UnknownSession(_))
        ));
    }

    #[test]
    fn rotate_replaces_key() {
        let registry = SessionRegistry::new();
        let key = registry.insert(session(RecordingSink::new())).unwrap();
        registry.with_session(&key, |s| s.tick().map(|_| ())).unwrap();
        let rotated = registry.rotate(&key, "salt", None).unwrap();
        assert_ne!(rotated, key);
        assert!(!registry.contains(&key));
        let nonce = registry
            .with_session(&rotated, |s| Ok(s.state().nonce))
            .unwrap();
        assert_eq!(nonce, 0);
    }

    #[test]
    fn remove_returns_session() {
        let registry = SessionRegistry::new();
        let key = registry
            .insert(Session::with_sink(SeedConfig::default(), RecordingSink::new()).unwrap())
            .unwrap();
        let removed = registry.remove(&key).unwrap();
        assert_eq!(removed.state().server_hash, key);
        assert!(registry.is_empty());
        assert!(matches!(
            registry.remove(&key),
            Err(Error::UnknownSession(_))
        ));
    }

    #[test]
    fn remove_keeps_session_in_use() {
        let registry = SessionRegistry::new();
        let key = registry.insert(session(RecordingSink::new())).unwrap();
        let borrowed = registry.get(&key).unwrap();
        assert_eq!(registry.remove(&key).err(), Some(Error::SessionBusy(key.clone())));
        assert!(registry.contains(&key));
        drop(borrowed);
        assert!(registry.remove(&key).is_ok());
    }

    fn other_session() -> Session<RecordingSink> {
        let config = SeedConfigBuilder::default()
            .server_seed("other-server")
            .client_seed("client")
            .build()
            .unwrap();
        Session::with_sink(config, RecordingSink::new()).unwrap()
    }

    #[test]
    fn rotating_a_busy_seed_leaves_other_seeds_free() {
        let registry = Arc::new(SessionRegistry::new());
        let busy = registry.insert(session(RecordingSink::new())).unwrap();
        let free = registry.insert(other_session()).unwrap();

        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let holder = {
            let registry = Arc::clone(&registry);
            let busy = busy.clone();
            thread::spawn(move || {
                registry
                    .with_session(&busy, |_| {
                        entered_tx.send(()).unwrap();
                        release_rx.recv().unwrap();
                        Ok(())
                    })
                    .unwrap();
            })
        };
        entered_rx.recv().unwrap();

        let rotator = {
            let registry = Arc::clone(&registry);
            let busy = busy.clone();
            thread::spawn(move || registry.rotate(&busy, "salt", None))
        };
        thread::sleep(Duration::from_millis(50));

        // The rotator is parked on the busy session; the other seed must not wait for it.
        let nonce = registry
            .with_session(&free, |s| s.tick().map(|state| state.nonce))
            .unwrap();
        assert_eq!(nonce, 1);

        release_tx.send(()).unwrap();
        holder.join().unwrap();
        let rotated = rotator.join().unwrap().unwrap();
        assert!(registry.contains(&rotated));
        assert!(!registry.contains(&busy));
        assert!(matches!(
            registry.with_session(&busy, |s| s.tick().map(|_| ())),
            Err(Error::UnknownSession(_))
        ));
    }
}
