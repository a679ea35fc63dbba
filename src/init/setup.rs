use crate::{app::App, clock::SystemClock, err::Error, init::settings::Settings};
use axum_server::tls_rustls::RustlsConfig;
use std::{io, path::Path, sync::Arc};
use tokio_util::sync::CancellationToken;

/// Build the application from loaded settings, wired to the wall clock.
pub async fn setup(settings: &Settings, shutdown: CancellationToken) -> Result<App, Error> {
    let tls_config = match (&settings.tls_cert, &settings.tls_key) {
        (Some(cert), Some(key)) => Some(setup_tls_config(cert, key).await?),
        _ => None,
    };

    tracing::info!("Setup complete.");
    Ok(App::new(
        Arc::new(SystemClock),
        shutdown,
        settings.request_timeout(),
        tls_config,
    )
    .with_timeouts(settings.header_read_timeout(), settings.idle_timeout()))
}

pub async fn setup_tls_config(cert_path: &str, key_path: &str) -> Result<RustlsConfig, Error> {
    for (what, path) in [("certificate", cert_path), ("key", key_path)] {
        if !Path::new(path).try_exists()? {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("TLS {} not found: {}", what, path),
            )
            .into());
        }
    }

    let tls_config = RustlsConfig::from_pem_file(cert_path, key_path).await?;
    tracing::debug!(cert = cert_path, key = key_path, "TLS configuration loaded");

    Ok(tls_config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_certificate() {
        match setup_tls_config("/nonexistent/server.crt", "/nonexistent/server.key").await {
            Err(Error::Io(e)) => {
                assert_eq!(e.kind(), io::ErrorKind::NotFound);
                assert!(e.to_string().contains("certificate"));
            }
            Err(other) => panic!("unexpected error: {other:?}"),
            Ok(_) => panic!("missing files were accepted"),
        }
    }

    #[tokio::test]
    async fn plain_http_without_tls() {
        let settings = Settings::new(None, None, None, None, None, None, None).unwrap();
        assert!(setup(&settings, CancellationToken::new()).await.is_ok());
    }
}
