use std::net::{Ipv4Addr, SocketAddrV4};

use clap::{Parser, ValueEnum};

use crate::error::StartupError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Responds with a single A record for ADDR (which may be a hostname) to all
/// DNS queries.
#[derive(Parser, Debug)]
#[command(name = "arec-responder", version)]
pub struct Args {
    /// Address to answer with: an IPv4 address or a hostname resolved at startup
    pub addr: String,

    /// Listen IPv4 address
    #[arg(short = 'l', long, default_value = "0.0.0.0")]
    pub listen_address: String,

    /// Listen port
    #[arg(short = 'p', long, default_value = "53")]
    pub listen_port: String,

    /// Response TTL in seconds
    #[arg(short = 't', long, default_value = "300")]
    pub ttl: String,

    /// Switch to this user after binding the socket
    #[arg(short = 'u', long)]
    pub user: Option<String>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Log line format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

/// Validated startup configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub listen: SocketAddrV4,
    pub target: String,
    pub ttl: String,
    pub user: Option<String>,
}

impl Config {
    pub fn from_args(args: Args) -> Result<Self, StartupError> {
        let ip: Ipv4Addr = args
            .listen_address
            .parse()
            .map_err(|_| StartupError::ListenAddress(args.listen_address.clone()))?;
        let port: u16 = args
            .listen_port
            .parse()
            .map_err(|e: std::num::ParseIntError| StartupError::ListenPort {
                value: args.listen_port.clone(),
                reason: e.to_string(),
            })?;

        Ok(Config {
            listen: SocketAddrV4::new(ip, port),
            target: args.addr,
            ttl: args.ttl,
            user: args.user,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Result<Config, StartupError> {
        let args = Args::try_parse_from(argv).unwrap();
        Config::from_args(args)
    }

    #[test]
    fn test_defaults() {
        let config = parse(&["arec-responder", "192.0.2.7"]).unwrap();
        assert_eq!(config.listen, SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 53));
        assert_eq!(config.target, "192.0.2.7");
        assert_eq!(config.ttl, "300");
        assert_eq!(config.user, None);
    }

    #[test]
    fn test_short_flags() {
        let config = parse(&[
            "arec-responder",
            "-l",
            "127.0.0.1",
            "-p",
            "5353",
            "-t",
            "60",
            "-u",
            "nobody",
            "sinkhole.example",
        ])
        .unwrap();
        assert_eq!(config.listen, "127.0.0.1:5353".parse::<SocketAddrV4>().unwrap());
        assert_eq!(config.target, "sinkhole.example");
        assert_eq!(config.ttl, "60");
        assert_eq!(config.user.as_deref(), Some("nobody"));
    }

    #[test]
    fn test_bad_listen_address() {
        for addr in ["localhost", "::", "256.0.0.1"] {
            let err = parse(&["arec-responder", "-l", addr, "10.0.0.1"]).unwrap_err();
            assert!(matches!(err, StartupError::ListenAddress(_)), "{addr}");
            assert_eq!(err.exit_code(), 8);
        }
    }

    #[test]
    fn test_bad_listen_port() {
        for port in ["65536", "dns", "5x"] {
            let err = parse(&["arec-responder", "-p", port, "10.0.0.1"]).unwrap_err();
            assert!(matches!(err, StartupError::ListenPort { .. }), "{port}");
            assert_eq!(err.exit_code(), 13);
        }
    }

    #[test]
    fn test_target_is_required() {
        assert!(Args::try_parse_from(["arec-responder"]).is_err());
    }

    #[test]
    fn test_log_options() {
        let args = Args::try_parse_from(["arec-responder", "10.0.0.1"]).unwrap();
        assert_eq!(args.log_format, LogFormat::Text);
        assert_eq!(args.log_level, "info");

        let args =
            Args::try_parse_from(["arec-responder", "--log-format", "json", "10.0.0.1"]).unwrap();
        assert_eq!(args.log_format, LogFormat::Json);
    }
}
