use aistaff_client::{
    cli::Cli, commands, ApiClient, ApiConfig, KeyringTokenStore, ReqwestTransport, Session,
};
use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli
        .api_url
        .as_deref()
        .map(ApiConfig::new)
        .unwrap_or_else(ApiConfig::from_env);

    let client = Arc::new(ApiClient::new(
        config,
        ReqwestTransport::new()?,
        KeyringTokenStore::new(),
    ));
    let invalid = client.session_invalid();
    let session = Session::new(client);

    let result = commands::dispatch(cli.command, &session).await;
    if *invalid.borrow() {
        eprintln!("Session expired. Run `aistaff login` to sign in again.");
    }
    result
}
