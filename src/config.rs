//! Environment-based configuration.
//!
//! | variable | default | meaning |
//! |---|---|---|
//! | `RESTVIEW_ADDR` | `0.0.0.0:3000` | listen address |
//! | `RESTVIEW_DEBUG` | `false` | attach `Processing-Time` to every response |
//! | `RESTVIEW_MAX_BODY_BYTES` | `8388608` (8 MiB) | request body ceiling; larger bodies get `413` |
//!
//! Unset variables take the default. Set-but-invalid variables are an
//! error: a typo in a deployment manifest should stop the process, not be
//! papered over.
//!
//! ```rust
//! use restview::Config;
//!
//! let config = Config::from_lookup(|key| match key {
//!     "RESTVIEW_DEBUG" => Some("true".to_owned()),
//!     _ => None,
//! })
//! .unwrap();
//! assert!(config.debug);
//! assert_eq!(config.max_body_bytes, 8 * 1024 * 1024);
//! ```

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;

use crate::error::Error;

pub const ADDR_VAR: &str = "RESTVIEW_ADDR";
pub const DEBUG_VAR: &str = "RESTVIEW_DEBUG";
pub const MAX_BODY_VAR: &str = "RESTVIEW_MAX_BODY_BYTES";

/// Default upload ceiling: 8 MiB.
pub const DEFAULT_MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

/// Process-level settings for the server and dispatcher.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub addr: SocketAddr,
    pub debug: bool,
    pub max_body_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            debug: false,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl Config {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads settings through `lookup`, which returns a variable's value if
    /// it is set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let defaults = Self::default();
        Ok(Self {
            addr: parse_var(&lookup, ADDR_VAR, defaults.addr)?,
            debug: match lookup(DEBUG_VAR) {
                Some(value) => parse_flag(DEBUG_VAR, value)?,
                None => defaults.debug,
            },
            max_body_bytes: parse_var(&lookup, MAX_BODY_VAR, defaults.max_body_bytes)?,
        })
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, Error>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => {
            let parsed = value.trim().parse::<T>();
            parsed.map_err(|e| Error::Config { key, reason: e.to_string(), value })
        }
    }
}

fn parse_flag(key: &'static str, value: String) -> Result<bool, Error> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(Error::Config { key, value, reason: "expected a boolean".to_owned() }),
    }
}
