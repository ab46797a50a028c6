use std::fmt::Display;

use thiserror::Error;

use crate::instance::InstanceError;

pub(crate) type MigschedResult<T> = Result<T, MigschedError>;

#[derive(Error, Debug)]
pub(crate) enum MigschedError {
    #[error("IO error, more details: {0}")]
    IOError(#[from] std::io::Error),
    #[error("The file {0} is not supported.")]
    InvalidInstanceFile(String),
    #[error("The instance is not valid JSON, more details: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("The instance is inconsistent: {0}")]
    InvalidInstance(#[from] InstanceError),
}

impl MigschedError {
    pub(crate) fn invalid_instance(path: impl Display) -> Self {
        Self::InvalidInstanceFile(format!("{path}"))
    }
}
