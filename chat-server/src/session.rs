use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use chat_common::{ChatCodec, ClientName, Command};
use futures::SinkExt;
use parking_lot::RwLock;
use tokio::io::AsyncWrite;
use tokio::sync::Mutex;
use tokio_util::codec::FramedWrite;

use crate::error::SessionError;

pub type SessionId = u64;

type SessionSink = FramedWrite<Box<dyn AsyncWrite + Send + Unpin>, ChatCodec>;

/// One live connection: its identity, display name and output sink.
///
/// The sink is behind an async mutex so each command reaches the peer as a
/// whole line, flushed, even when several sessions fan out to it at once.
/// Once [`mark_closed`](Session::mark_closed) has run no further writes are
/// accepted; it must run before the session leaves the registry.
pub struct Session {
    id: SessionId,
    name: RwLock<ClientName>,
    sink: Mutex<SessionSink>,
    closed: AtomicBool,
    shut_down: AtomicBool,
}

impl Session {
    pub fn new<W>(id: SessionId, writer: W) -> Self
    where
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let writer: Box<dyn AsyncWrite + Send + Unpin> = Box::new(writer);
        Self {
            id,
            name: RwLock::new(ClientName::new()),
            sink: Mutex::new(FramedWrite::new(writer, ChatCodec::new())),
            closed: AtomicBool::new(false),
            shut_down: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Empty until the session logs in.
    pub fn name(&self) -> ClientName {
        self.name.read().clone()
    }

    pub(crate) fn set_name(&self, name: ClientName) {
        *self.name.write() = name;
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Writes one command and flushes it. No retry on failure.
    pub async fn deliver(&self, command: &Command) -> Result<(), SessionError> {
        let mut sink = self.sink.lock().await;
        if self.is_closed() {
            return Err(SessionError::Closed);
        }
        sink.send(command).await?;
        Ok(())
    }

    /// Refuses every later [`deliver`](Session::deliver). Returns `false` if
    /// the session was already closed.
    pub fn mark_closed(&self) -> bool {
        !self.closed.swap(true, Ordering::AcqRel)
    }

    /// Marks the session closed and shuts down its transport. Idempotent.
    pub async fn close(&self) -> Result<(), SessionError> {
        self.mark_closed();
        let mut sink = self.sink.lock().await;
        if self.shut_down.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        SinkExt::<&Command>::close(&mut *sink).await?;
        Ok(())
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("name", &*self.name.read())
            .field("closed", &self.is_closed())
            .finish()
    }
}
