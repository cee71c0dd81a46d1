use crate::client::HttpTransport;
use crate::session::Session;
use crate::tokens::TokenStore;
use anyhow::{Context, Result};

fn resolve_password(provided: Option<String>, prompt: &str) -> Result<String> {
    match provided {
        Some(password) => Ok(password),
        None => dialoguer::Password::new()
            .with_prompt(prompt)
            .interact()
            .context("failed to read password"),
    }
}

pub async fn login<T: HttpTransport, S: TokenStore>(
    session: &Session<T, S>,
    username: &str,
    password: Option<String>,
) -> Result<()> {
    let password = resolve_password(password, "Password")?;
    let user = session.login(username, &password).await?;
    println!("Logged in as {}.", user.username);
    Ok(())
}

pub async fn register<T: HttpTransport, S: TokenStore>(
    session: &Session<T, S>,
    username: &str,
    email: &str,
    password: Option<String>,
    full_name: Option<&str>,
) -> Result<()> {
    let password = resolve_password(password, "Choose a password")?;
    let user = session
        .register(username, email, &password, full_name)
        .await?;
    println!("Registered and logged in as {}.", user.username);
    Ok(())
}

pub async fn logout<T: HttpTransport, S: TokenStore>(session: &Session<T, S>) -> Result<()> {
    session.logout().await;
    println!("Logged out.");
    Ok(())
}

pub async fn whoami<T: HttpTransport, S: TokenStore>(session: &Session<T, S>) -> Result<()> {
    session.bootstrap().await;
    match session.current_user().await {
        Some(user) => {
            println!("{} <{}>", user.username, user.email);
            if let Some(full_name) = &user.full_name {
                println!("  name:  {full_name}");
            }
            println!(
                "  state: {}{}",
                if user.is_active { "active" } else { "inactive" },
                if user.is_admin { ", admin" } else { "" }
            );
        }
        None => {
            println!("Not logged in. Run `aistaff login` to sign in.");
        }
    }
    Ok(())
}
