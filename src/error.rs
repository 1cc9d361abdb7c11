use super::lifecycle::Rejection;
use std::convert::Infallible;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("no order with id {0}")]
    NotFound(String),
    #[error("order store backend failed: {0}")]
    Backend(#[from] sled::Error),
    #[error("order record could not be encoded: {0}")]
    Encode(#[from] minicbor::encode::Error<Infallible>),
    #[error("order record could not be decoded: {0}")]
    Decode(#[from] minicbor::decode::Error),
    #[error("order key is not valid utf-8: {0}")]
    Key(#[from] std::string::FromUtf8Error),
    #[error("failed to generate an order id: {0}")]
    IdGeneration(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("order id {0} is already taken")]
    IdTaken(String),
}

#[derive(thiserror::Error, Debug)]
pub enum OrderError {
    #[error("no order with id {id}")]
    NotFound { id: String },
    #[error("{0}")]
    InvalidTransition(Rejection),
    #[error("order {id} changed or vanished before the update could apply")]
    ConflictOnReplace { id: String },
    #[error("replace on order {id} matched {matched} records, ids are no longer unique")]
    StoreInvariant { id: String, matched: usize },
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for OrderError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(id) => OrderError::NotFound { id },
            other => OrderError::Store(other),
        }
    }
}
