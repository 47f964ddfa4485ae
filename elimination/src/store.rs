//! Durable eliminated-actor roster
//!
//! # Layout
//!
//! One record keyed by the collection name, holding an ordered JSON array
//! of actor-identity strings. JSON so operators can inspect and edit the
//! record externally; `reload` exists for exactly that case and performs
//! a full replace, not a merge.
//!
//! Reads are served from an in-memory cache and never touch the disk;
//! writes go through to RocksDB immediately.

use crate::{Error, Result};
use life_ledger::ActorId;
use parking_lot::RwLock;
use rocksdb::{Options, DB};
use std::collections::BTreeSet;
use std::path::Path;

/// Durable set of eliminated actor identities
pub struct EliminationStore {
    db: DB,
    collection: String,
    cache: RwLock<BTreeSet<ActorId>>,
}

impl EliminationStore {
    /// Open or create the backing database and load the roster
    pub fn open(path: impl AsRef<Path>, collection: impl Into<String>) -> Result<Self> {
        let path = path.as_ref();
        std::fs::create_dir_all(path)?;

        let mut opts = Options::default();
        opts.create_if_missing(true);
        let db = DB::open(&opts, path)?;

        let store = Self {
            db,
            collection: collection.into(),
            cache: RwLock::new(BTreeSet::new()),
        };
        store.reload()?;

        tracing::info!(
            path = %path.display(),
            collection = %store.collection,
            count = store.len(),
            "Opened elimination store"
        );

        Ok(store)
    }

    /// Whether `actor` is on the roster
    pub fn contains(&self, actor: ActorId) -> bool {
        self.cache.read().contains(&actor)
    }

    /// Add `actor` and persist.
    ///
    /// Returns `Ok(false)` without touching the disk when the actor is
    /// already present. On a persist failure the in-memory insert stands
    /// (the cache is the source of truth for the rest of the process
    /// lifetime) and the error is reported to the caller for logging.
    pub fn add(&self, actor: ActorId) -> Result<bool> {
        if !self.cache.write().insert(actor) {
            return Ok(false);
        }
        self.persist()?;
        tracing::debug!(actor = %actor, "Roster entry added");
        Ok(true)
    }

    /// Remove `actor` and persist.
    ///
    /// Same contract as [`EliminationStore::add`]: `Ok(false)` when
    /// absent, in-memory removal stands on persist failure.
    pub fn remove(&self, actor: ActorId) -> Result<bool> {
        if !self.cache.write().remove(&actor) {
            return Ok(false);
        }
        self.persist()?;
        tracing::debug!(actor = %actor, "Roster entry removed");
        Ok(true)
    }

    /// Snapshot of the roster in identity order
    pub fn all(&self) -> Vec<ActorId> {
        self.cache.read().iter().copied().collect()
    }

    /// Number of eliminated actors
    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    /// Whether the roster is empty
    pub fn is_empty(&self) -> bool {
        self.cache.read().is_empty()
    }

    /// Re-read the roster from the durable backing, discarding the cache.
    ///
    /// Full replace: entries added in memory since the last successful
    /// persist are dropped in favour of what the backing holds.
    pub fn reload(&self) -> Result<()> {
        let loaded = self.load()?;
        *self.cache.write() = loaded;
        Ok(())
    }

    fn load(&self) -> Result<BTreeSet<ActorId>> {
        let mut roster = BTreeSet::new();

        if let Some(value) = self.db.get(self.collection.as_bytes())? {
            let raw: Vec<String> = serde_json::from_slice(&value)?;
            for entry in raw {
                match ActorId::parse_str(&entry) {
                    Some(actor) => {
                        roster.insert(actor);
                    }
                    // External edits are expected; a bad entry must not
                    // take the whole roster down with it.
                    None => tracing::warn!(entry = %entry, "Skipping unparseable roster entry"),
                }
            }
        }

        Ok(roster)
    }

    fn persist(&self) -> Result<()> {
        let ids: Vec<String> = self.cache.read().iter().map(ToString::to_string).collect();
        let value = serde_json::to_vec(&ids)?;
        self.db.put(self.collection.as_bytes(), value)?;
        Ok(())
    }
}
