//! Terminal stand-ins for the login page: prompts and the host that shows
//! notifications and "navigates".

use std::io::{self, Write};

use anyhow::{Context, Result};
use memberlogin_core::{Field, LoginHost, ValidationErrors};

/// Prints notifications and the redirect target to stdout
pub struct TerminalHost;

impl LoginHost for TerminalHost {
    fn notify_success(&self, message: &str) {
        println!("\n✓ {}", message);
    }

    fn redirect(&self, route: &str) {
        println!("→ Continuing to {}", route);
    }
}

/// Ask for the ID, offering the current value as the default
pub fn prompt_identifier(current: &str) -> Result<Option<String>> {
    if current.is_empty() {
        print!("ID: ");
    } else {
        print!("ID [{}]: ", current);
    }
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .context("Failed to read ID")?;
    let input = input.trim();

    if input.is_empty() {
        Ok(None)
    } else {
        Ok(Some(input.to_string()))
    }
}

pub fn prompt_password() -> Result<String> {
    rpassword::prompt_password("Password: ").context("Failed to read password")
}

/// Ask whether to remember the ID, defaulting to `current`
pub fn prompt_remember(current: bool) -> Result<bool> {
    if current {
        print!("Remember ID? [Y/n]: ");
    } else {
        print!("Remember ID? [y/N]: ");
    }
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .context("Failed to read answer")?;

    Ok(parse_yes_no(input.trim(), current))
}

fn parse_yes_no(input: &str, default: bool) -> bool {
    match input.to_lowercase().as_str() {
        "y" | "yes" => true,
        "n" | "no" => false,
        _ => default,
    }
}

pub fn print_errors(errors: &ValidationErrors) {
    for (field, message) in errors.iter() {
        eprintln!("  ✗ {}", format_error(field, message));
    }
}

fn format_error(field: Field, message: &str) -> String {
    format!("{}: {}", field.name(), message)
}
