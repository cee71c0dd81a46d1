//! CLI command handlers. Presentation only: parse-level input comes from
//! [`crate::cli`], all behavior lives in the library, results are printed.

mod agents;
mod auth;
mod marketplace;

use crate::cli::Command;
use crate::client::HttpTransport;
use crate::session::Session;
use crate::tokens::TokenStore;
use anyhow::Result;

pub async fn dispatch<T: HttpTransport, S: TokenStore>(
    command: Command,
    session: &Session<T, S>,
) -> Result<()> {
    match command {
        Command::Login { username, password } => auth::login(session, &username, password).await,
        Command::Register {
            username,
            email,
            password,
            full_name,
        } => auth::register(session, &username, &email, password, full_name.as_deref()).await,
        Command::Logout => auth::logout(session).await,
        Command::Whoami => auth::whoami(session).await,
        Command::Agents(command) => agents::run(session.client(), command).await,
        Command::Marketplace(command) => marketplace::run(session.client(), command).await,
    }
}

/// Render a backend timestamp compactly, falling back to the raw string
/// when it is not RFC 3339.
fn short_date(raw: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| raw.to_string())
}
