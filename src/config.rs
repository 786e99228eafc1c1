//! Configuration from the environment

use std::net::SocketAddr;

use anyhow::Context;
use anyhow::Result;
use chrono::FixedOffset;

use crate::password::generate;
use crate::utils::env_var;
use crate::utils::env_var_or_else;

const DEFAULT_ADDRESS: &str = "0.0.0.0:6000";
const DEFAULT_DATABASE: &str = "quire";

/// Where documents are kept
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageConfig {
    /// In-memory, lost on shutdown
    Memory,

    /// MongoDB server
    Mongo { uri: String, database: String },
}

/// Settings of the service
#[derive(Clone, Debug)]
pub struct Config {
    /// Address to listen on
    pub address: SocketAddr,

    /// Secret used to sign access tokens
    pub jwt_secret: String,

    pub storage: StorageConfig,

    /// Offset of all timestamps
    pub timezone: FixedOffset,
}

impl Config {
    /// Read the configuration from the environment
    ///
    /// # Errors
    ///
    /// Will return `Err` when the address, port or timezone offset cannot be parsed
    pub fn from_env() -> Result<Self> {
        let address = parse_address(
            &env_var_or_else("ADDRESS", || DEFAULT_ADDRESS.to_string()),
            env_var("PORT").as_deref(),
        )?;

        let jwt_secret = env_var_or_else("JWT_SECRET", || {
            let jwt_secret = generate();
            tracing::info!("`JWT_SECRET` is not set, generating temporary one: {jwt_secret}");
            jwt_secret
        });

        let storage = match env_var("MONGODB_URI") {
            Some(uri) => StorageConfig::Mongo {
                uri,
                database: env_var_or_else("MONGODB_DATABASE", || DEFAULT_DATABASE.to_string()),
            },
            None => {
                tracing::info!("`MONGODB_URI` is not set, keeping everything in memory");
                StorageConfig::Memory
            }
        };

        let timezone = match env_var("TIMEZONE_OFFSET") {
            Some(offset) => parse_offset(&offset)?,
            None => FixedOffset::east_opt(0).context("UTC offset")?,
        };

        Ok(Self {
            address,
            jwt_secret,
            storage,
            timezone,
        })
    }

    /// Configuration for tests, in memory with a fixed secret
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            address: SocketAddr::from(([127, 0, 0, 1], 0)),
            jwt_secret: "test-secret".to_string(),
            storage: StorageConfig::Memory,
            timezone: FixedOffset::east_opt(0).unwrap(),
        }
    }
}

/// Parse the address, with an optional override of just the port
fn parse_address(address: &str, port: Option<&str>) -> Result<SocketAddr> {
    let mut address = address
        .parse::<SocketAddr>()
        .with_context(|| format!("Invalid `ADDRESS`: {address}"))?;

    if let Some(port) = port {
        let port = port
            .parse::<u16>()
            .with_context(|| format!("Invalid `PORT`: {port}"))?;

        address.set_port(port);
    }

    Ok(address)
}

/// Parse an offset like `+02:00`, `-0530` or `Z`
fn parse_offset(offset: &str) -> Result<FixedOffset> {
    let offset = offset.trim();

    if offset.eq_ignore_ascii_case("z") {
        return FixedOffset::east_opt(0).context("UTC offset");
    }

    offset
        .parse::<FixedOffset>()
        .with_context(|| format!("Invalid `TIMEZONE_OFFSET`: {offset}"))
}
