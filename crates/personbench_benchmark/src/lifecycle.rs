use personbench_error::{SetupError, SetupStage};
use personbench_objectdb::{CommitMode, Database, Session, StoreError};
use spdlog::{error, info};

use crate::{
    config::BenchConfig,
    model::{Address, Person, PrivateData},
};

/// An open store with the benchmark schema registered.
pub struct StoreHandle {
    db: Database,
    mode: CommitMode,
}

impl StoreHandle {
    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn commit_mode(&self) -> CommitMode {
        self.mode
    }

    /// Binds a session for the calling worker.
    pub fn session(&self) -> Result<Session, StoreError> {
        self.db.session_with(self.mode)
    }
}

pub fn register_schema(db: &Database) -> Result<(), StoreError> {
    db.register_entity::<Person>()?;
    db.register_entity::<Address>()?;
    db.register_entity::<PrivateData>()?;
    Ok(())
}

/// Creates a fresh store at the configured path, dropping any store that is
/// already there. Failures are logged and returned, never raised.
pub fn setup_store(config: &BenchConfig) -> Result<StoreHandle, SetupError> {
    info!("started setup code");
    let result = create_fresh(config);
    if let Err(e) = &result {
        error!("error in creating db: {}", e);
    }
    result
}

fn create_fresh(config: &BenchConfig) -> Result<StoreHandle, SetupError> {
    let mut db = Database::new(&config.store_path());
    if db.exists() {
        db.open(&config.user, &config.password)
            .map_err(|e| SetupError::new(SetupStage::Open, e))?;
        db.drop().map_err(|e| SetupError::new(SetupStage::Drop, e))?;
    }
    db.create().map_err(|e| SetupError::new(SetupStage::Create, e))?;
    register_schema(&db).map_err(|e| SetupError::new(SetupStage::Register, e))?;
    info!("store ready at {}", db.path().display());
    Ok(StoreHandle {
        db,
        mode: config.commit_mode,
    })
}

/// Commits whatever is pending and closes the store. Errors are logged.
pub fn teardown_store(handle: StoreHandle) {
    info!("started cleanup code");
    let StoreHandle { mut db, mode } = handle;
    // Pass sessions commit or roll back before they drop, so this session
    // holds no transaction unless a caller left work on the handle's store.
    match db.session_with(mode) {
        Ok(mut session) => {
            if let Err(e) = session.commit() {
                error!("failed to commit pending work: {}", e);
            }
        }
        Err(e) => error!("failed to bind session for cleanup: {}", e),
    }
    if let Err(e) = db.close() {
        error!("failed to close store at {}: {}", db.path().display(), e);
    }
}

#[cfg(test)]
mod tests {
    use personbench_objectdb::{DEFAULT_PASSWORD, DEFAULT_USER};
    use tempfile::tempdir;

    use super::*;

    fn config(root: &std::path::Path) -> BenchConfig {
        BenchConfig {
            db_root: root.to_path_buf(),
            ..BenchConfig::default()
        }
    }

    #[test]
    fn setup_replaces_existing_store() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let config = config(dir.path());

        let handle = setup_store(&config)?;
        handle.session()?.save(&Person::default())?;
        teardown_store(handle);

        let handle = setup_store(&config)?;
        assert_eq!(handle.session()?.count::<Person>()?, 0);
        assert!(handle.database().is_registered::<Address>());
        assert!(handle.database().is_registered::<PrivateData>());
        teardown_store(handle);
        Ok(())
    }

    #[test]
    fn setup_reports_rejected_credentials() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let mut config = config(dir.path());
        teardown_store(setup_store(&config)?);

        config.password = "wrong".to_string();
        let err = setup_store(&config).err().expect("setup should fail");
        assert_eq!(err.stage, SetupStage::Open);
        assert!(matches!(err.source, StoreError::CredentialsRejected(_)));
        Ok(())
    }

    #[test]
    fn teardown_leaves_reopenable_store() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let config = config(dir.path());
        let handle = setup_store(&config)?;
        {
            let mut session = handle.session()?;
            session.save(&Person::default())?;
        }
        teardown_store(handle);

        let mut db = Database::new(&config.store_path());
        db.open(DEFAULT_USER, DEFAULT_PASSWORD)?;
        register_schema(&db)?;
        assert_eq!(db.session()?.count::<Person>()?, 1);
        Ok(())
    }
}
