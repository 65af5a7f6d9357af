mod config;
mod dns_header;
mod dns_message;
mod dns_question_and_answer;
mod error;
mod local;
mod logging;
mod privileges;
mod server;

use std::convert::Infallible;
use std::net::{SocketAddr, UdpSocket};
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use config::{Args, Config};
use error::{ServeError, StartupError};
use local::build_answer;
use server::DnsServer;

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init_logging(&args.log_level, args.log_format);

    match run(args) {
        Ok(never) => match never {},
        Err(e) => {
            error!("{e:#}");
            ExitCode::from(exit_code(&e))
        }
    }
}

fn run(args: Args) -> anyhow::Result<Infallible> {
    let config = Config::from_args(args)?;

    // Work out the A record to serve before opening any socket
    let answer = build_answer(&config.target, &config.ttl)?;

    let listen = SocketAddr::V4(config.listen);
    let socket =
        UdpSocket::bind(listen).map_err(|source| StartupError::Bind { addr: listen, source })?;
    let local_addr = socket.local_addr().map_err(StartupError::LocalAddr)?;
    info!(listen = %local_addr, target = %config.target, ttl = %config.ttl, "Listening");

    if let Some(user) = &config.user {
        privileges::drop_privileges(user)?;
        info!(user = %user, "Dropped privileges");
    }

    let mut server = DnsServer::new(socket, answer);
    Err(server.run().into())
}

fn exit_code(err: &anyhow::Error) -> u8 {
    if let Some(e) = err.downcast_ref::<StartupError>() {
        e.exit_code()
    } else if let Some(e) = err.downcast_ref::<ServeError>() {
        e.exit_code()
    } else {
        1
    }
}
