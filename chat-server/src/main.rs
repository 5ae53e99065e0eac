use std::{env, error::Error};

use chat_server::{config::Config, server::Server};
use clap::Parser;
use log::error;
use tokio::signal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    if env::var_os("RUST_LOG").is_none() {
        env::set_var("RUST_LOG", "chat_server=info");
    }
    pretty_env_logger::init();

    let config = Config::parse();
    let mut server = Server::bind(config.bind_addr(), config.max_line_length).await?;

    server
        .serve(async {
            if let Err(e) = signal::ctrl_c().await {
                error!("failed to listen for CTRL+C event: {:?}", e);
            }
        })
        .await;

    Ok(())
}
