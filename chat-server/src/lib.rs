//! Chat server core: the session registry, command routing and the
//! connection loops that drive them.

pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod registry;
pub mod server;
pub mod session;
