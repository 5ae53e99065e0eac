use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use log::{error, info, trace};
use tokio::net::{TcpListener, TcpStream};
use tokio::select;

use crate::client::{handle_client, ClientData};
use crate::registry::Registry;

pub struct Server {
    tcp_listener: TcpListener,
    registry: Arc<Registry>,
    max_line_length: usize,
}

impl Server {
    pub async fn bind(bind_addr: SocketAddr, max_line_length: usize) -> Result<Self, tokio::io::Error> {
        let tcp_listener = match TcpListener::bind(bind_addr).await {
            Ok(l) => l,
            Err(e) => {
                error!("Failed to bind to {}: {:?}", bind_addr, e);
                return Err(e);
            }
        };

        info!("Listening on {}", tcp_listener.local_addr()?);

        Ok(Self {
            tcp_listener,
            registry: Arc::new(Registry::new()),
            max_line_length,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, tokio::io::Error> {
        self.tcp_listener.local_addr()
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    fn admit_client(&self, stream: TcpStream, addr: SocketAddr) {
        let (reader, writer) = stream.into_split();
        let client_data = ClientData::new(
            Arc::clone(&self.registry),
            reader,
            writer,
            self.max_line_length,
        );
        info!(
            "Accepting connection from {} as session {}",
            addr,
            client_data.session().id()
        );

        tokio::spawn(handle_client(client_data));
    }

    /// Accepts connections until `shutdown` resolves.
    ///
    /// Sessions already running are left alone; only new connections stop.
    pub async fn serve<F>(&mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            select! {
                _ = &mut shutdown => {
                    info!("chat server is shutting down...");
                    break;
                },
                client = self.tcp_listener.accept() => match client {
                    Ok((stream, addr)) => {
                        trace!("Client joined from {}", addr);
                        self.admit_client(stream, addr);
                    },
                    Err(e) => {
                        error!("Could not accept client: {:?}", e);
                        continue
                    }
                }
            }
        }
    }
}
