use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::{
        Arc, RwLock,
        atomic::{AtomicU64, Ordering},
    },
};

use fjall::{Config, PersistMode, TransactionalKeyspace, TransactionalPartitionHandle};
use personbench_serialization::{Read, Write};
use spdlog::debug;

use crate::{
    DEFAULT_PASSWORD, DEFAULT_USER, Entity, RecordId, StoreError,
    session::{CommitMode, Session},
};

const META_PARTITION: &str = "store-meta";
const CREDENTIALS_KEY: &str = "credentials";
const NEXT_CLUSTER_KEY: &str = "next_cluster";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Closed,
    Creating,
    Open,
}

impl State {
    fn as_str(&self) -> &'static str {
        match self {
            State::Closed => "closed",
            State::Creating => "creating",
            State::Open => "open",
        }
    }
}

pub(crate) struct ClassEntry {
    pub name: &'static str,
    pub cluster: u32,
    pub partition: TransactionalPartitionHandle,
    pub next_position: AtomicU64,
}

pub(crate) type ClassRegistry = Arc<RwLock<HashMap<&'static str, Arc<ClassEntry>>>>;

/// Handle to a store rooted at a directory.
///
/// The handle itself is shared between workers; every worker binds its own
/// [`Session`] before issuing operations.
pub struct Database {
    path: PathBuf,
    state: State,
    keyspace: Option<TransactionalKeyspace>,
    classes: ClassRegistry,
}

impl Database {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            state: State::Closed,
            keyspace: None,
            classes: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// A store exists when its root directory is present and not empty.
    pub fn exists(&self) -> bool {
        fs::read_dir(&self.path)
            .map(|mut entries| entries.next().is_some())
            .unwrap_or(false)
    }

    pub fn create(&mut self) -> Result<(), StoreError> {
        self.expect_state(State::Closed)?;
        if self.exists() {
            return Err(StoreError::AlreadyExists(self.path.display().to_string()));
        }
        self.state = State::Creating;
        match self.create_inner() {
            Ok(keyspace) => {
                self.keyspace = Some(keyspace);
                self.state = State::Open;
                debug!("created store at {}", self.path.display());
                Ok(())
            }
            Err(e) => {
                self.state = State::Closed;
                Err(e)
            }
        }
    }

    fn create_inner(&self) -> Result<TransactionalKeyspace, StoreError> {
        fs::create_dir_all(&self.path)?;
        let keyspace = Config::new(&self.path).open_transactional()?;
        let meta = keyspace.open_partition(META_PARTITION, Default::default())?;
        let credentials = (DEFAULT_USER.to_string(), DEFAULT_PASSWORD.to_string()).pack()?;
        let mut tx = keyspace.write_tx()?;
        tx.insert(&meta, CREDENTIALS_KEY, credentials);
        tx.insert(&meta, NEXT_CLUSTER_KEY, 1u32.pack()?);
        if tx.commit()?.is_err() {
            return Err(StoreError::Conflict);
        }
        Ok(keyspace)
    }

    pub fn open(&mut self, user: &str, password: &str) -> Result<(), StoreError> {
        self.expect_state(State::Closed)?;
        if !self.exists() {
            return Err(StoreError::NotFound(self.path.display().to_string()));
        }
        let keyspace = Config::new(&self.path).open_transactional()?;
        let meta = keyspace.open_partition(META_PARTITION, Default::default())?;
        let stored = keyspace
            .read_tx()
            .get(&meta, CREDENTIALS_KEY)?
            .ok_or_else(|| StoreError::NotFound(self.path.display().to_string()))?;
        let (stored_user, stored_password) = <(String, String)>::unpack(&stored)?;
        if stored_user != user || stored_password != password {
            return Err(StoreError::CredentialsRejected(user.to_string()));
        }
        self.keyspace = Some(keyspace);
        self.state = State::Open;
        debug!("opened store at {} as {}", self.path.display(), user);
        Ok(())
    }

    /// Destroys the open store and everything under its root.
    pub fn drop(&mut self) -> Result<(), StoreError> {
        self.expect_state(State::Open)?;
        self.release()?;
        fs::remove_dir_all(&self.path)?;
        debug!("dropped store at {}", self.path.display());
        Ok(())
    }

    /// Flushes the journal and releases the keyspace. Closing a closed
    /// store does nothing.
    pub fn close(&mut self) -> Result<(), StoreError> {
        if self.state == State::Closed {
            return Ok(());
        }
        if let Some(keyspace) = &self.keyspace {
            keyspace.persist(PersistMode::SyncAll)?;
        }
        self.release()?;
        debug!("closed store at {}", self.path.display());
        Ok(())
    }

    fn release(&mut self) -> Result<(), StoreError> {
        self.classes.write()?.clear();
        self.keyspace = None;
        self.state = State::Closed;
        Ok(())
    }

    /// Declares the shape of `T` to the store. Registering the same class
    /// twice returns the cluster it already has.
    pub fn register_entity<T: Entity>(&self) -> Result<u32, StoreError> {
        self.expect_state(State::Open)?;
        let name = T::class_name();
        if let Some(entry) = self.classes.read()?.get(name) {
            return Ok(entry.cluster);
        }

        let keyspace = self.keyspace()?;
        let meta = keyspace.open_partition(META_PARTITION, Default::default())?;
        let class_key = format!("class:{}", name);
        let mut tx = keyspace.write_tx()?;
        let cluster = match tx.get(&meta, &class_key)? {
            Some(existing) => u32::unpack(&existing)?,
            None => {
                let next = match tx.get(&meta, NEXT_CLUSTER_KEY)? {
                    Some(raw) => u32::unpack(&raw)?,
                    None => 1,
                };
                tx.insert(&meta, class_key.as_str(), next.pack()?);
                tx.insert(&meta, NEXT_CLUSTER_KEY, (next + 1).pack()?);
                next
            }
        };
        if tx.commit()?.is_err() {
            return Err(StoreError::Conflict);
        }

        let partition = keyspace.open_partition(name, Default::default())?;
        let next_position = match keyspace.read_tx().iter(&partition).next_back() {
            Some(last) => {
                let (key, _) = last?;
                RecordId::from_key(cluster, &key)?.position + 1
            }
            None => 0,
        };

        let entry = Arc::new(ClassEntry {
            name,
            cluster,
            partition,
            next_position: AtomicU64::new(next_position),
        });
        self.classes.write()?.entry(name).or_insert(entry);
        debug!(
            "registered class {} as cluster {} (next position {})",
            name,
            cluster,
            next_position
        );
        Ok(cluster)
    }

    pub fn is_registered<T: Entity>(&self) -> bool {
        self.classes
            .read()
            .map(|classes| classes.contains_key(T::class_name()))
            .unwrap_or(false)
    }

    /// Binds a new auto-committing session to the calling worker.
    pub fn session(&self) -> Result<Session, StoreError> {
        self.session_with(CommitMode::AutoCommit)
    }

    pub fn session_with(&self, mode: CommitMode) -> Result<Session, StoreError> {
        self.expect_state(State::Open)?;
        Ok(Session::new(self.keyspace()?.clone(), self.classes.clone(), mode))
    }

    fn keyspace(&self) -> Result<&TransactionalKeyspace, StoreError> {
        self.keyspace
            .as_ref()
            .ok_or_else(|| StoreError::InternalError("keyspace not open".into()))
    }

    fn expect_state(&self, expected: State) -> Result<(), StoreError> {
        if self.state != expected {
            return Err(StoreError::InvalidState {
                expected: expected.as_str(),
                found: self.state.as_str(),
            });
        }
        Ok(())
    }
}

impl Drop for Database {
    fn drop(&mut self) {
        if self.state == State::Open {
            if let Err(e) = self.close() {
                debug!("failed to close store at {}: {}", self.path.display(), e);
            }
        }
    }
}

impl ClassEntry {
    pub(crate) fn allocate(&self) -> RecordId {
        RecordId::new(self.cluster, self.next_position.fetch_add(1, Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use personbench_proc_macros::{Entity, NumBytes, Read, Write};
    use tempfile::tempdir;

    use super::*;

    #[derive(Debug, Default, Clone, PartialEq, Read, Write, NumBytes, Entity)]
    struct Note {
        text: String,
    }

    #[test]
    fn lifecycle_states() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let mut db = Database::new(&dir.path().join("store"));
        assert_eq!(db.state(), State::Closed);
        assert!(!db.exists());

        db.create()?;
        assert_eq!(db.state(), State::Open);
        assert!(db.exists());
        assert!(matches!(db.create(), Err(StoreError::InvalidState { .. })));

        db.close()?;
        assert_eq!(db.state(), State::Closed);
        db.close()?;

        db.open(DEFAULT_USER, DEFAULT_PASSWORD)?;
        db.drop()?;
        assert_eq!(db.state(), State::Closed);
        assert!(!db.exists());
        Ok(())
    }

    #[test]
    fn rejects_wrong_credentials() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("store");
        let mut db = Database::new(&path);
        db.create()?;
        db.close()?;

        let err = db.open("admin", "nope").unwrap_err();
        assert!(matches!(err, StoreError::CredentialsRejected(user) if user == "admin"));
        assert_eq!(db.state(), State::Closed);
        Ok(())
    }

    #[test]
    fn create_refuses_existing_store() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("store");
        let mut db = Database::new(&path);
        db.create()?;
        db.close()?;

        let mut other = Database::new(&path);
        assert!(matches!(other.create(), Err(StoreError::AlreadyExists(_))));
        assert_eq!(other.state(), State::Closed);
        Ok(())
    }

    #[test]
    fn open_missing_store() {
        let dir = tempdir().unwrap();
        let mut db = Database::new(&dir.path().join("absent"));
        assert!(matches!(db.open(DEFAULT_USER, DEFAULT_PASSWORD), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn register_is_idempotent_and_persistent() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("store");
        let mut db = Database::new(&path);
        assert!(db.register_entity::<Note>().is_err());

        db.create()?;
        let cluster = db.register_entity::<Note>()?;
        assert_eq!(db.register_entity::<Note>()?, cluster);
        assert!(db.is_registered::<Note>());

        let mut session = db.session()?;
        session.save(&Note { text: "a".into() })?;
        session.save(&Note { text: "b".into() })?;
        drop(session);
        db.close()?;
        assert!(!db.is_registered::<Note>());

        db.open(DEFAULT_USER, DEFAULT_PASSWORD)?;
        assert_eq!(db.register_entity::<Note>()?, cluster);
        let mut session = db.session()?;
        let id = session.save(&Note { text: "c".into() })?;
        assert_eq!(id, RecordId::new(cluster, 2));
        Ok(())
    }

    #[test]
    fn session_requires_open_store() {
        let dir = tempdir().unwrap();
        let db = Database::new(dir.path());
        assert!(matches!(db.session(), Err(StoreError::InvalidState { .. })));
    }
}
