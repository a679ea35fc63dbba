use axum_server::Handle;
use clap::Parser;
use epochd::init::{
    logging::init_logging, settings::Settings, setup::setup, shutdown::shutdown_on_signal,
};
use std::env;
use tokio_util::sync::CancellationToken;

/// Epoch days server
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Server address
    #[arg(short, long)]
    address: Option<String>,
    /// Port (overrides the PORT environment variable)
    #[arg(short, long)]
    port: Option<u16>,
    /// Config file path
    #[arg(short, long)]
    config_file: Option<String>,
    /// TLS certificate (PEM)
    #[arg(long, requires = "tls_key")]
    tls_cert: Option<String>,
    /// TLS private key (PEM)
    #[arg(long, requires = "tls_cert")]
    tls_key: Option<String>,
    /// Log level or filter directive, used when RUST_LOG is unset
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let settings = Settings::new(
        args.config_file,
        env::var("PORT").ok(),
        args.address,
        args.port,
        args.tls_cert,
        args.tls_key,
        args.log_level,
    )?;
    init_logging(&settings.log_level)?;
    settings.print();

    let shutdown = CancellationToken::new();
    let handle = Handle::new();
    let app = setup(&settings, shutdown.clone()).await?;

    tokio::spawn(shutdown_on_signal(
        handle.clone(),
        shutdown,
        settings.shutdown_grace(),
    ));

    if let Err(e) = app.serve(&settings.bind_address(), handle).await {
        tracing::error!(error = %e, "server failed");
        return Err(e.into());
    }

    tracing::info!("Server exited");
    Ok(())
}
