use crate::err::Error;
use config::{Config, File};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub address: String,
    pub port: u16,
    pub request_timeout_secs: u64,
    pub header_read_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub shutdown_grace_secs: u64,
    pub log_level: String,
    pub tls_cert: Option<String>,
    pub tls_key: Option<String>,
}

impl Settings {
    /// Load settings from defaults, the config file, `PORT` and the command line,
    /// in increasing order of precedence.
    pub fn new(
        config_file: Option<String>,
        env_port: Option<String>,
        address: Option<String>,
        port: Option<u16>,
        tls_cert: Option<String>,
        tls_key: Option<String>,
        log_level: Option<String>,
    ) -> Result<Self, Error> {
        let file = match config_file {
            Some(path) => File::with_name(&path).required(true),
            None => File::with_name("config").required(false),
        };
        let env_port = match env_port {
            Some(raw) => parse_port(&raw)?,
            None => None,
        };

        let builder = Config::builder()
            .set_default("address", "0.0.0.0")?
            .set_default("port", 8080)?
            .set_default("request_timeout_secs", 10)?
            .set_default("header_read_timeout_secs", 5)?
            .set_default("idle_timeout_secs", 60)?
            .set_default("shutdown_grace_secs", 10)?
            .set_default("log_level", "info")?
            .add_source(file)
            .set_override_option("port", env_port)?
            .set_override_option("address", address)?
            .set_override_option("port", port)?
            .set_override_option("tls_cert", tls_cert)?
            .set_override_option("tls_key", tls_key)?
            .set_override_option("log_level", log_level)?;

        let settings: Settings = builder.build()?.try_deserialize()?;

        if settings.tls_cert.is_some() != settings.tls_key.is_some() {
            return Err(Error::IncompleteTls);
        }

        Ok(settings)
    }

    pub fn bind_address(&self) -> String {
        if self.address.contains(':') && !self.address.starts_with('[') {
            format!("[{}]:{}", self.address, self.port)
        } else {
            format!("{}:{}", self.address, self.port)
        }
    }

    pub fn tls_enabled(&self) -> bool {
        self.tls_cert.is_some() && self.tls_key.is_some()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn header_read_timeout(&self) -> Duration {
        Duration::from_secs(self.header_read_timeout_secs)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }

    pub fn print(&self) {
        tracing::info!(
            address = %self.bind_address(),
            tls = self.tls_enabled(),
            request_timeout_secs = self.request_timeout_secs,
            header_read_timeout_secs = self.header_read_timeout_secs,
            idle_timeout_secs = self.idle_timeout_secs,
            shutdown_grace_secs = self.shutdown_grace_secs,
            "effective settings"
        );
    }
}

/// Parse a `PORT` value. Accepts `8080` and `:8080`; blank means unset.
pub fn parse_port(raw: &str) -> Result<Option<u16>, Error> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix(':').unwrap_or(trimmed);
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse()
        .map(Some)
        .map_err(|_| Error::InvalidPort(raw.to_owned()))
}
