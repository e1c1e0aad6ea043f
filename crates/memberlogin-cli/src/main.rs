//! memberlogin - sign in to a member account from the terminal.
//!
//! Prompts for ID and password, exchanges them for a session token, and
//! remembers the ID for next time when asked to.

mod terminal;

use std::io;

use anyhow::{Context, Result};
use memberlogin_core::controller::{PASSWORD_RECOVERY_ROUTE, SIGNUP_ROUTE};
use memberlogin_core::{
    Config, Field, FileIdentifierStore, HttpAuthClient, IdentifierStore, KeyringIdentifierStore,
    LoginController, LoginEvent, SessionContext, StoreBackend, SubmitOutcome,
};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use terminal::TerminalHost;

// ============================================================================
// Constants
// ============================================================================

/// Attempts before giving up
const MAX_ATTEMPTS: u32 = 3;

/// Pre-fills the ID when none is remembered
const ENV_IDENTIFIER: &str = "MEMBERLOGIN_ID";

/// Used as the password for the first attempt
const ENV_PASSWORD: &str = "MEMBERLOGIN_PASSWORD";

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn open_store(config: &Config) -> Result<Box<dyn IdentifierStore>> {
    Ok(match config.identifier_store {
        StoreBackend::File => Box::new(
            FileIdentifierStore::default_location()
                .context("Failed to locate remembered ID file")?,
        ),
        StoreBackend::Keyring => Box::new(KeyringIdentifierStore::default()),
    })
}

fn print_usage() {
    println!("Usage: memberlogin [--forget | --init-config | --print-token]");
    println!();
    println!("  --forget        Remove the remembered ID and exit");
    println!("  --init-config   Write the current config to the config directory and exit");
    println!("  --print-token   Print the session token to stdout after signing in");
    println!();
    println!("Forgot your password? {}", PASSWORD_RECOVERY_ROUTE);
    println!("No account yet?       {}", SIGNUP_ROUTE);
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let config = Config::load().context("Failed to load config")?;
    debug!(?config, "Config loaded");
    let store = open_store(&config)?;

    let args: Vec<String> = std::env::args().collect();
    let mut print_token = false;
    match args.get(1).map(String::as_str) {
        Some("--forget") => {
            store.clear().context("Failed to remove remembered ID")?;
            println!("Remembered ID removed.");
            return Ok(());
        }
        Some("--init-config") => {
            config.save().context("Failed to save config")?;
            println!("Config written to {}", Config::config_dir()?.display());
            return Ok(());
        }
        Some("--print-token") => print_token = true,
        Some("--help") | Some("-h") => {
            print_usage();
            return Ok(());
        }
        Some(other) => {
            print_usage();
            anyhow::bail!("Unknown argument: {}", other);
        }
        None => {}
    }

    let auth = HttpAuthClient::from_config(&config).context("Failed to create HTTP client")?;
    let session = SessionContext::new();
    let mut form = LoginController::new(auth, store, session.clone(), TerminalHost)
        .with_landing_route(config.landing_route.clone());
    debug!(landing_route = form.landing_route(), "Login form ready");

    if form.identifier().is_empty() {
        if let Ok(identifier) = std::env::var(ENV_IDENTIFIER) {
            form.set_identifier(identifier);
        }
    }
    let mut env_password = std::env::var(ENV_PASSWORD).ok().filter(|p| !p.is_empty());

    println!("\n=== Member Login ===\n");

    for attempt in 1..=MAX_ATTEMPTS {
        if let Some(identifier) = terminal::prompt_identifier(form.identifier())? {
            form.set_identifier(identifier);
        }
        let password = match env_password.take() {
            Some(password) => password,
            None => terminal::prompt_password()?,
        };
        form.set_secret(password);
        let remember = terminal::prompt_remember(form.remember())?;
        form.set_remember(remember);

        match form.submit() {
            SubmitOutcome::Invalid => {
                terminal::print_errors(form.errors());
                continue;
            }
            SubmitOutcome::Ignored => break,
            SubmitOutcome::Started => println!("\nSigning in..."),
        }

        match form.wait_for_completion().await {
            Some(LoginEvent::Authenticated) => {
                let started = session.snapshot().authenticated_at;
                info!(attempt, ?started, "Login successful");
                if print_token {
                    if let Some(token) = session.token() {
                        println!("{}", token.as_str());
                    }
                }
                return Ok(());
            }
            Some(LoginEvent::Rejected) => {
                if let Some(message) = form.error(Field::Secret) {
                    eprintln!("  ✗ {}", message);
                }
            }
            Some(LoginEvent::Unreachable) => {
                if let Some(notice) = form.notice() {
                    eprintln!("  ! {}", notice);
                }
            }
            None => break,
        }
    }

    form.dispose();
    anyhow::bail!("Not signed in after {} attempts", MAX_ATTEMPTS)
}
