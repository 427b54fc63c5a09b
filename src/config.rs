//! Command-line and environment configuration.
//!
//! One binary runs any of the three processes; the positional `SERVICE` argument picks
//! which. Every option falls back to an environment variable and then to a default.

use clap::{Parser, ValueEnum};
use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ServiceKind {
    /// Product records on `/api/products`.
    Product,
    /// User records on `/api/users`.
    User,
    /// API gateway in front of both services.
    Gateway,
}

impl ServiceKind {
    pub fn default_port(self) -> u16 {
        match self {
            ServiceKind::Product => 8082,
            ServiceKind::User => 8081,
            ServiceKind::Gateway => 3000,
        }
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "record-services", about = "Product and user record services", version)]
pub struct Cli {
    #[arg(value_enum, value_name = "SERVICE", help = "Process to run")]
    pub service: ServiceKind,

    #[arg(long, env = "HOST", default_value = "0.0.0.0", help = "Address to bind")]
    pub host: String,

    #[arg(
        long,
        env = "PORT",
        help = "Port to bind [default: 8082 product, 8081 user, 3000 gateway]"
    )]
    pub port: Option<u16>,

    #[arg(
        long,
        env = "DATABASE_PATH",
        value_name = "FILE",
        help = "SQLite database file (in-memory when omitted)"
    )]
    pub database: Option<PathBuf>,

    #[arg(
        long,
        env = "STORE_BUFFER",
        default_value = "32",
        help = "Capacity of the store request channel (at least 1)"
    )]
    pub store_buffer: NonZeroUsize,

    #[arg(long, env = "USER_SERVICE_URL", default_value = "http://localhost:8081")]
    pub user_service_url: String,

    #[arg(long, env = "PRODUCT_SERVICE_URL", default_value = "http://localhost:8082")]
    pub product_service_url: String,

    #[arg(
        long,
        env = "UPSTREAM_TIMEOUT_MS",
        default_value_t = 5000,
        help = "Gateway timeout for upstream calls, in milliseconds"
    )]
    pub upstream_timeout_ms: u64,
}

impl Cli {
    pub fn port(&self) -> u16 {
        self.port.unwrap_or_else(|| self.service.default_port())
    }

    /// `host:port` as a socket address string, resolved by the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port())
    }

    pub fn store_settings(&self) -> StoreSettings {
        StoreSettings {
            database: self.database.clone(),
            buffer: self.store_buffer.get(),
        }
    }

    pub fn gateway_settings(&self) -> GatewaySettings {
        GatewaySettings {
            user_service_url: self.user_service_url.clone(),
            product_service_url: self.product_service_url.clone(),
            timeout: Duration::from_millis(self.upstream_timeout_ms),
        }
    }
}

/// Where a record service keeps its data.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSettings {
    /// `None` keeps everything in a private in-memory database.
    pub database: Option<PathBuf>,
    pub buffer: usize,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            database: None,
            buffer: 32,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GatewaySettings {
    pub user_service_url: String,
    pub product_service_url: String,
    pub timeout: Duration,
}

impl GatewaySettings {
    pub fn new(user_service: SocketAddr, product_service: SocketAddr) -> Self {
        Self {
            user_service_url: format!("http://{user_service}"),
            product_service_url: format!("http://{product_service}"),
            timeout: Duration::from_millis(5000),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ports_default_per_service() {
        let cli = Cli::try_parse_from(["record-services", "user"]).unwrap();
        assert_eq!(cli.port(), 8081);
        assert_eq!(cli.store_settings().database, None);

        let cli = Cli::try_parse_from(["record-services", "product", "--port", "9000"]).unwrap();
        assert_eq!(cli.port(), 9000);
        assert!(cli.bind_address().ends_with(":9000"));
    }

    #[test]
    fn gateway_settings_carry_the_timeout() {
        let cli = Cli::try_parse_from([
            "record-services",
            "gateway",
            "--upstream-timeout-ms",
            "250",
            "--user-service-url",
            "http://users:8081",
        ])
        .unwrap();
        let settings = cli.gateway_settings();
        assert_eq!(settings.timeout, Duration::from_millis(250));
        assert_eq!(settings.user_service_url, "http://users:8081");
    }

    #[test]
    fn store_buffer_must_be_positive() {
        let cli = Cli::try_parse_from(["record-services", "user"]).unwrap();
        assert_eq!(cli.store_settings().buffer, 32);

        let cli =
            Cli::try_parse_from(["record-services", "user", "--store-buffer", "4"]).unwrap();
        assert_eq!(cli.store_settings().buffer, 4);

        assert!(Cli::try_parse_from(["record-services", "user", "--store-buffer", "0"]).is_err());
    }

    #[test]
    fn unknown_service_is_rejected() {
        assert!(Cli::try_parse_from(["record-services", "orders"]).is_err());
    }
}
