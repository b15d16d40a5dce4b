use std::{fmt, path::PathBuf};

use thiserror::Error;

use crate::StoreError;

/// The step of trial setup that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupStage {
    Open,
    Drop,
    Create,
    Register,
}

impl fmt::Display for SetupStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stage = match self {
            SetupStage::Open => "open existing store",
            SetupStage::Drop => "drop existing store",
            SetupStage::Create => "create store",
            SetupStage::Register => "register entity classes",
        };
        f.write_str(stage)
    }
}

#[derive(Debug, Error)]
#[error("failed to {stage}: {source}")]
pub struct SetupError {
    pub stage: SetupStage,
    #[source]
    pub source: StoreError,
}

impl SetupError {
    pub fn new(stage: SetupStage, source: StoreError) -> Self {
        Self { stage, source }
    }
}

#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("fixture resource {path} could not be read: {source}")]
    Missing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("fixture resource {path} is malformed: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum BenchError {
    #[error("trial has no usable store: {0}")]
    BrokenTrial(String),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
