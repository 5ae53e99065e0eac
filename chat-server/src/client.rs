use std::sync::Arc;

use chat_common::ChatCodec;
use futures::stream::StreamExt;
use log::{error, trace, warn};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::FramedRead;

use crate::dispatch::{dispatch, Flow};
use crate::error::DispatchError;
use crate::registry::Registry;
use crate::session::Session;

pub struct ClientData<R> {
    pub(crate) session: Arc<Session>,
    pub(crate) registry: Arc<Registry>,
    pub(crate) framed: FramedRead<R, ChatCodec>,
}

impl<R> ClientData<R>
where
    R: AsyncRead + Unpin,
{
    /// Registers a new session writing to `writer` and reading from `reader`.
    pub fn new<W>(registry: Arc<Registry>, reader: R, writer: W, max_line_length: usize) -> Self
    where
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let session = registry.open_session(writer);
        Self {
            session,
            registry,
            framed: FramedRead::new(reader, ChatCodec::with_max_length(max_line_length)),
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }
}

/// Reads, decodes and dispatches commands until the peer goes away or logs
/// out, then removes the session from the registry.
pub async fn handle_client<R>(mut client_data: ClientData<R>)
where
    R: AsyncRead + Unpin,
{
    let id = client_data.session.id();

    loop {
        match client_data.framed.next().await {
            Some(Ok(Ok(command))) => {
                trace!("Got message from {} : {:?}", id, command);
                match dispatch(&client_data.registry, &client_data.session, command).await {
                    Ok(Flow::Continue) => {}
                    Ok(Flow::Close) => break,
                    Err(e @ DispatchError::Close(_)) => {
                        error!("handle cmd err on session {id}: {e}");
                        break;
                    }
                    Err(e) => error!("handle cmd err on session {id}: {e}"),
                }
            }
            Some(Ok(Err(e))) => warn!("read message err on session {id}: {e}"),
            Some(Err(e)) => {
                error!("TCP receive error on session {id}: {e}");
                break;
            }
            None => {
                trace!("Session {id} reached end of stream");
                break;
            }
        }
    }

    client_data.session.mark_closed();
    client_data.registry.deregister(id);
    if let Err(e) = client_data.session.close().await {
        trace!("Closing session {id} after disconnect: {e}");
    }
    trace!(
        "Session {id} removed, {} still connected",
        client_data.registry.session_count()
    );
}
