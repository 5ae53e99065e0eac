use chat_common::{ClientName, CodecError};
use thiserror::Error;

use crate::session::SessionId;

/// Failure writing to a single session's sink.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session is closed")]
    Closed,

    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// One recipient that could not be reached during fan-out.
#[derive(Debug, Error)]
#[error("delivery to session {session} ({name:?}) failed: {source}")]
pub struct DeliveryFailure {
    pub session: SessionId,
    pub name: ClientName,
    #[source]
    pub source: SessionError,
}

#[derive(Debug, Error)]
pub enum DispatchError {
    /// Every target was attempted; these are the ones that failed.
    #[error("{} of the deliveries failed", .0.len())]
    Delivery(Vec<DeliveryFailure>),

    #[error("failed to close session transport: {0}")]
    Close(#[source] SessionError),
}
