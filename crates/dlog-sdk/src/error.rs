use dlog_chain::ChainError;
use dlog_names::NameError;
use dlog_store::StoreError;
use dlog_types::ContentRef;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("name not registered: {0}")]
    NotRegistered(String),

    #[error("a writer session is already open for {0}")]
    SessionBusy(String),

    #[error("object not found: {0}")]
    ObjectNotFound(ContentRef),

    #[error("chain error: {0}")]
    Chain(#[from] ChainError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("registry error: {0}")]
    Names(#[from] NameError),
}

pub type SdkResult<T> = Result<T, SdkError>;
