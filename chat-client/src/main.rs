mod input;

use std::{env, error::Error, io::Write, process};

use chat_common::{ChatCodec, Command};
use clap::Parser;
use futures::{stream::StreamExt, SinkExt};
use input::{parse_input, valid_nickname, USAGE};
use log::{error, info, trace, warn};
use tokio::{net::TcpStream, select, signal};
use tokio_util::codec::{Framed, FramedRead, LinesCodec};

/// Terminal client for the CHAT/1.0 server.
#[derive(Parser, Debug)]
#[command(name = "chat-client")]
struct Args {
    /// Server hostname.
    #[arg(value_name = "HOSTNAME")]
    host: String,
    /// Server port.
    #[arg(value_name = "PORT")]
    port: u16,
}

fn flush() {
    // Nothing useful to do if the terminal went away.
    let _ = std::io::stdout().flush();
}

fn clear_terminal() {
    print!("{esc}[2J{esc}[1;1H", esc = 27 as char);
    flush();
}

fn prompt(p: &str) {
    print!("{p}");
    flush();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    if env::var_os("RUST_LOG").is_none() {
        env::set_var("RUST_LOG", "chat_client=warn");
    }
    pretty_env_logger::init();

    let args = Args::parse();

    let mut stdin = FramedRead::new(tokio::io::stdin(), LinesCodec::new());
    prompt("Please enter your nickname: ");
    let client_name = match stdin.next().await {
        Some(Ok(name)) if valid_nickname(name.trim()) => name.trim().to_string(),
        _ => {
            eprintln!("Please enter a name without spaces.");
            process::exit(1);
        }
    };

    clear_terminal();

    let server_addr = format!("{}:{}", args.host, args.port);
    info!("Connecting to server {}...", server_addr);

    let stream = match TcpStream::connect(&server_addr).await {
        Ok(stream) => stream,
        Err(e) => {
            eprintln!("Failed to connect to {}: {:?}... Stopping.", server_addr, e);
            process::exit(1);
        }
    };

    info!("Connected to server. Use CTRL+C or /quit to leave.");
    let mut framed = Framed::new(stream, ChatCodec::new());

    if let Err(e) = framed.send(Command::Login { username: client_name }).await {
        error!("TCP send error: {:?}", e);
        process::exit(1);
    }

    println!("{USAGE}");
    prompt("> ");

    loop {
        select! {
            quit = signal::ctrl_c() => {
                if let Err(e) = quit {
                    error!("failed to listen for CTRL+C event: {:?}", e);
                }
                if let Err(e) = framed.send(Command::Logout).await {
                    warn!("could not log out cleanly: {:?}", e);
                }
                break;
            },
            Some(Ok(line)) = stdin.next() => {
                let Some(command) = parse_input(&line) else {
                    println!("{USAGE}");
                    prompt("> ");
                    continue;
                };

                trace!("Sending command to server: {:?}", command);
                let logout = command == Command::Logout;
                if let Err(e) = framed.send(command).await {
                    error!("TCP send error: {:?}", e);
                    process::exit(1);
                }
                if logout {
                    break;
                }
                prompt("> ");
            },
            received = framed.next() => match received {
                Some(Ok(Ok(Command::Receive { from, data }))) => {
                    println!("\r{from: >10} : {data}");
                    prompt("> ");
                },
                Some(Ok(Ok(other))) => warn!("Unexpected command from server: {:?}", other),
                Some(Ok(Err(e))) => warn!("Decode error: {}", e),
                Some(Err(e)) => {
                    error!("TCP receive error: {:?}", e);
                    process::exit(1);
                },
                None => {
                    println!("\rServer closed the connection.");
                    break;
                }
            }
        }
    }

    Ok(())
}
