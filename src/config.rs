//! Server configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use log::info;

#[derive(Clone, Debug)]
pub struct Config {
    /// Address handed to `Iron::http`, e.g. "localhost:3000".
    pub bind_addr: String,

    /// Directory served under `/static`.
    pub static_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// - `BLOG_BIND_ADDR`: server bind address (default: "localhost:3000")
    /// - `BLOG_STATIC_DIR`: static asset directory (default: "static")
    pub fn from_env() -> Config {
        let bind_addr = env::var("BLOG_BIND_ADDR").unwrap_or_else(|_| "localhost:3000".to_string());
        let static_dir = env::var("BLOG_STATIC_DIR").unwrap_or_else(|_| "static".to_string());

        let config = Config {
            bind_addr: bind_addr,
            static_dir: PathBuf::from(static_dir),
        };
        info!(
            "configuration loaded: bind_addr={} static_dir={}",
            config.bind_addr,
            config.static_dir.display()
        );
        config
    }
}

impl Default for Config {
    fn default() -> Config {
        Config {
            bind_addr: "localhost:3000".to_string(),
            static_dir: PathBuf::from("static"),
        }
    }
}
