//! Environment-driven configuration.

use std::env;
use std::fmt::Display;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use tracing::info;

use crate::error::Error;

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub public_dir: PathBuf,
    pub index_page: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 3000,
            public_dir: PathBuf::from("public"),
            index_page: PathBuf::from("views/index.html"),
        }
    }
}

impl Config {
    /// Reads `HOST`, `PORT`, `PUBLIC_DIR` and `INDEX_PAGE` from the process
    /// environment.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key → value lookup. Unset keys fall back to
    /// [`Config::default`]; set keys that do not parse are an error.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let defaults = Self::default();
        Ok(Self {
            host: try_load(&lookup, "HOST", defaults.host)?,
            port: try_load(&lookup, "PORT", defaults.port)?,
            public_dir: try_load(&lookup, "PUBLIC_DIR", defaults.public_dir)?,
            index_page: try_load(&lookup, "INDEX_PAGE", defaults.index_page)?,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn try_load<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, Error>
where
    T: FromStr + std::fmt::Debug,
    T::Err: Display,
{
    match lookup(key) {
        None => {
            info!("{key} not set, using default: {default:?}");
            Ok(default)
        }
        Some(value) => match value.trim().parse() {
            Ok(parsed) => Ok(parsed),
            Err(e) => Err(Error::Config { key, reason: e.to_string(), value }),
        },
    }
}
