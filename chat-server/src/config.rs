use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use chat_common::DEFAULT_MAX_LINE_LENGTH;
use clap::Parser;

/// Multi-user chat server speaking the CHAT/1.0 line protocol.
#[derive(Parser, Debug)]
#[command(name = "chat-server")]
pub struct Config {
    /// Address to listen on.
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,
    /// TCP port to listen on.
    #[arg(value_name = "PORT")]
    pub port: u16,
    /// Longest accepted line in bytes; longer lines are rejected and skipped.
    #[arg(long, default_value_t = DEFAULT_MAX_LINE_LENGTH)]
    pub max_line_length: usize,
}

impl Config {
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
