//! Process configuration: CLI flags with environment fallbacks.

use std::net::SocketAddr;
use std::path::PathBuf;

use actix_web::cookie::Key;
use clap::Parser;
use tracing::warn;

/// Runtime configuration, parsed from flags or the environment.
#[derive(Debug, Clone, Parser)]
#[command(name = "landing-backend", about = "Pre-launch landing page backend")]
pub struct AppConfig {
    /// Socket address the HTTP server binds to.
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    pub bind_addr: SocketAddr,

    /// PostgreSQL connection URL.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// File holding the session key material.
    #[arg(long, env = "SESSION_KEY_FILE", default_value = "/var/run/secrets/session_key")]
    pub session_key_file: PathBuf,

    /// Whether session cookies require HTTPS.
    #[arg(
        long,
        env = "SESSION_COOKIE_SECURE",
        default_value_t = true,
        action = clap::ArgAction::Set
    )]
    pub cookie_secure: bool,

    /// Allow an ephemeral session key when the key file is unreadable.
    /// Always permitted in debug builds.
    #[arg(
        long,
        env = "SESSION_ALLOW_EPHEMERAL",
        default_value_t = false,
        action = clap::ArgAction::Set
    )]
    pub allow_ephemeral_key: bool,
}

impl AppConfig {
    /// Parse configuration from the process arguments and environment.
    pub fn load() -> Self {
        Self::parse()
    }

    /// Derive the session key from the configured key file.
    ///
    /// Falls back to a generated key in debug builds or when explicitly
    /// allowed; sessions then do not survive restarts.
    pub fn session_key(&self) -> std::io::Result<Key> {
        match std::fs::read(&self.session_key_file) {
            Ok(bytes) => Ok(Key::derive_from(&bytes)),
            Err(err) => {
                if cfg!(debug_assertions) || self.allow_ephemeral_key {
                    warn!(
                        path = %self.session_key_file.display(),
                        error = %err,
                        "using temporary session key (dev only)"
                    );
                    Ok(Key::generate())
                } else {
                    Err(std::io::Error::other(format!(
                        "failed to read session key at {}: {err}",
                        self.session_key_file.display()
                    )))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(args: &[&str]) -> AppConfig {
        AppConfig::try_parse_from(
            std::iter::once("landing-backend").chain(args.iter().copied()),
        )
        .expect("arguments parse")
    }

    #[rstest]
    fn defaults_apply() {
        let config = parse(&["--database-url", "postgres://localhost/landing"]);
        assert_eq!(config.bind_addr, "0.0.0.0:8080".parse().expect("addr"));
        assert!(config.cookie_secure);
        assert!(!config.allow_ephemeral_key);
    }

    #[rstest]
    fn flags_override_defaults() {
        let config = parse(&[
            "--database-url",
            "postgres://localhost/landing",
            "--bind-addr",
            "127.0.0.1:9000",
            "--cookie-secure",
            "false",
        ]);
        assert_eq!(config.bind_addr, "127.0.0.1:9000".parse().expect("addr"));
        assert!(!config.cookie_secure);
    }
}
