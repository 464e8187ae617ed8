use std::net::{IpAddr, SocketAddr};

use clap::Parser;

use crate::error::ServeError;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "preassessment-webhook-receiver",
    version,
    about = "Receives organization_id, preassessment_id and regulation_id webhooks"
)]
pub struct Cli {
    /// Interface to listen on
    #[arg(long, default_value = "0.0.0.0", env = "WEBHOOK_RECEIVER_HOST")]
    pub host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 8008, env = "WEBHOOK_RECEIVER_PORT")]
    pub port: u16,
}

impl Cli {
    pub fn bind_addr(&self) -> Result<SocketAddr, ServeError> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ServeError::InvalidHost {
                host: self.host.clone(),
                source,
            })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_bind_all_interfaces_on_8008() {
        let cli = Cli::parse_from(["preassessment-webhook-receiver"]);
        assert_eq!(cli.bind_addr().unwrap(), "0.0.0.0:8008".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from([
            "preassessment-webhook-receiver",
            "--host",
            "127.0.0.1",
            "--port",
            "9000",
        ]);
        assert_eq!(cli.bind_addr().unwrap(), "127.0.0.1:9000".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn rejects_hostnames() {
        let cli = Cli::parse_from(["preassessment-webhook-receiver", "--host", "localhost"]);
        let err = cli.bind_addr().unwrap_err();
        assert!(matches!(&err, ServeError::InvalidHost { host, .. } if host == "localhost"));
        assert!(err.to_string().contains("localhost"));
    }
}
