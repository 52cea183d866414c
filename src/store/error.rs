//! Record store errors

use crate::gateway::GatewayError;
use crate::records::{EntityKind, ValidationError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    /// The record was rejected before any request was made
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// An update was attempted on a record the server never assigned an id
    #[error("{0} record has no id")]
    MissingId(EntityKind),
}

pub type StoreResult<T> = Result<T, StoreError>;
