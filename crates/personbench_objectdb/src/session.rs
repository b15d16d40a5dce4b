use std::sync::Arc;

use fjall::{TransactionalKeyspace, WriteTransaction};

use crate::{
    Entity, RecordId, StoreError,
    database::{ClassEntry, ClassRegistry},
};

/// When a session's writes become durable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum CommitMode {
    /// Every save is committed on its own.
    #[default]
    #[cfg_attr(feature = "clap", value(name = "auto", alias = "autocommit"))]
    AutoCommit,
    /// Saves accumulate until [`Session::commit`].
    #[cfg_attr(feature = "clap", value(alias = "batch"))]
    Explicit,
}

/// Per-worker context for issuing operations against an open store.
///
/// A session owns at most one write transaction, opened lazily on the
/// first operation. Dropping a session with pending work rolls it back.
pub struct Session {
    keyspace: TransactionalKeyspace,
    classes: ClassRegistry,
    tx: Option<WriteTransaction>,
    mode: CommitMode,
    pending: usize,
}

impl Session {
    pub(crate) fn new(keyspace: TransactionalKeyspace, classes: ClassRegistry, mode: CommitMode) -> Self {
        Self {
            keyspace,
            classes,
            tx: None,
            mode,
            pending: 0,
        }
    }

    pub fn mode(&self) -> CommitMode {
        self.mode
    }

    /// Number of writes not yet committed.
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Stores `object` as a new record of its class and returns the
    /// identity assigned to it.
    pub fn save<T: Entity>(&mut self, object: &T) -> Result<RecordId, StoreError> {
        let class = self.class::<T>()?;
        let serialized = object.pack()?;
        let id = class.allocate();
        self.tx()?.insert(&class.partition, id.key(), serialized);
        self.written()?;
        Ok(id)
    }

    /// Replaces the record stored under `id`.
    pub fn update<T: Entity>(&mut self, id: RecordId, object: &T) -> Result<(), StoreError> {
        let class = self.class::<T>()?;
        if id.cluster != class.cluster {
            return Err(StoreError::RecordNotFound(id.to_string()));
        }
        let serialized = object.pack()?;
        let tx = self.tx()?;
        if !tx.contains_key(&class.partition, id.key())? {
            return Err(StoreError::RecordNotFound(id.to_string()));
        }
        tx.insert(&class.partition, id.key(), serialized);
        self.written()
    }

    pub fn load<T: Entity>(&mut self, id: RecordId) -> Result<Option<T>, StoreError> {
        let class = self.class::<T>()?;
        if id.cluster != class.cluster {
            return Ok(None);
        }
        match self.tx()?.get(&class.partition, id.key())? {
            Some(serialized) => Ok(Some(T::unpack(&serialized)?)),
            None => Ok(None),
        }
    }

    pub fn count<T: Entity>(&mut self) -> Result<usize, StoreError> {
        let class = self.class::<T>()?;
        let tx = self.tx()?;
        let mut count = 0;
        for item in tx.iter(&class.partition) {
            item?;
            count += 1;
        }
        Ok(count)
    }

    /// Full scan of a class in position order.
    pub fn browse<T: Entity>(&mut self) -> Result<Vec<(RecordId, T)>, StoreError> {
        let class = self.class::<T>()?;
        let tx = self.tx()?;
        let mut records = Vec::new();
        for item in tx.iter(&class.partition) {
            let (key, value) = item?;
            records.push((RecordId::from_key(class.cluster, &key)?, T::unpack(&value)?));
        }
        Ok(records)
    }

    pub fn commit(&mut self) -> Result<(), StoreError> {
        self.pending = 0;
        if let Some(tx) = self.tx.take() {
            if tx.commit()?.is_err() {
                return Err(StoreError::Conflict);
            }
        }
        Ok(())
    }

    pub fn rollback(&mut self) {
        self.pending = 0;
        if let Some(tx) = self.tx.take() {
            tx.rollback();
        }
    }

    fn written(&mut self) -> Result<(), StoreError> {
        self.pending += 1;
        if self.mode == CommitMode::AutoCommit {
            self.commit()?;
        }
        Ok(())
    }

    fn class<T: Entity>(&self) -> Result<Arc<ClassEntry>, StoreError> {
        let name = T::class_name();
        let classes = self.classes.read()?;
        let class = classes
            .get(name)
            .cloned()
            .ok_or(StoreError::UnregisteredEntity(name))?;
        debug_assert_eq!(class.name, name);
        Ok(class)
    }

    fn tx(&mut self) -> Result<&mut WriteTransaction, StoreError> {
        if self.tx.is_none() {
            self.tx = Some(self.keyspace.write_tx()?);
        }
        self.tx
            .as_mut()
            .ok_or_else(|| StoreError::InternalError("no active transaction".into()))
    }
}
