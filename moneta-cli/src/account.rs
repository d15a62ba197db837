use anyhow::{Context, Result, bail};
use moneta_client::{ApiClient, LoginRequest, RegisterRequest, Session, SessionState};
use moneta_core::validate::{validate_login, validate_register};
use std::io::{self, Write};

fn prompt(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush().ok();
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s.trim().to_string())
}

fn prompt_secret(label: &str) -> Result<String> {
    // Minimal portable secret prompt: just stdin.
    // (We can switch to rpassword later.)
    prompt(label)
}

/// Resolve the stored session or tell the user how to get one.
///
/// Every authenticated command goes through here, so a half-dead token is
/// handled in one place instead of per command.
pub async fn require_session(client: &ApiClient) -> Result<Session> {
    match client.bootstrap().await {
        SessionState::Active(session) => Ok(session),
        SessionState::Anonymous => bail!("Not logged in. Run: moneta login"),
        SessionState::Unavailable(e) => Err(e).context("could not verify the stored session"),
    }
}

pub async fn log_in(client: &ApiClient) -> Result<()> {
    let email = prompt("Email")?;
    let password = prompt_secret("Password")?;
    validate_login(&email, &password)?;

    let session = client.log_in(&LoginRequest { email, password }).await?;
    println!(
        "Logged in as {} <{}>",
        session.profile.full_name, session.profile.email
    );
    Ok(())
}

pub async fn register(client: &ApiClient) -> Result<()> {
    let full_name = prompt("Full name")?;
    let email = prompt("Email")?;
    let password = prompt_secret("Password")?;
    let image = prompt("Profile image URL (optional)")?;
    validate_register(&full_name, &email, &password)?;

    client
        .register(&RegisterRequest {
            full_name,
            email,
            password,
            profile_image_url: if image.is_empty() { None } else { Some(image) },
        })
        .await?;

    println!("Account created. Activate it via the emailed link, then run: moneta login");
    Ok(())
}

pub fn log_out(client: &ApiClient) {
    client.sessions().log_out();
    println!("Logged out.");
}

pub async fn whoami(client: &ApiClient) -> Result<()> {
    let session = require_session(client).await?;
    println!("{} <{}>", session.profile.full_name, session.profile.email);
    if let Some(url) = &session.profile.profile_image_url {
        println!("Avatar: {url}");
    }
    Ok(())
}
