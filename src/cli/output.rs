use colored::Colorize;

use crate::error::PixivError;
use crate::token::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Pretty,
    Json,
}

impl OutputMode {
    pub fn from_flag(json: bool) -> Self {
        if json {
            OutputMode::Json
        } else {
            OutputMode::Pretty
        }
    }
}

/// Summary of an authenticated account, without any credential.
pub fn account_summary(token: &Token) -> serde_json::Value {
    serde_json::json!({
        "id": token.user.id,
        "account": token.user.account,
        "name": token.user.name,
        "expiresAt": token.expires_at().map(|at| at.to_rfc3339()),
    })
}

fn expiry_text(token: &Token) -> String {
    token
        .expires_at()
        .map_or_else(|| "never".to_string(), |at| at.to_string())
}

pub fn print_account(action: &str, token: &Token, mode: OutputMode, is_tty: bool) {
    match mode {
        OutputMode::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&account_summary(token)).unwrap_or_default()
            );
        }
        OutputMode::Pretty => {
            let who = format!("{} ({})", token.user.name, token.user.account);
            if is_tty {
                println!("{} as {}", action.green().bold(), who.bold());
                println!("{}", format!("Token expires: {}", expiry_text(token)).dimmed());
            } else {
                println!("{action} as {who}");
                println!("Token expires: {}", expiry_text(token));
            }
        }
    }
}

pub fn print_value(value: &serde_json::Value) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

pub fn print_error(err: &PixivError, mode: OutputMode, is_tty: bool) {
    match mode {
        OutputMode::Json => {
            println!("{}", serde_json::to_string_pretty(&err.to_json()).unwrap_or_default());
        }
        OutputMode::Pretty => {
            let label = if is_tty {
                "Error".red().bold().to_string()
            } else {
                "Error".to_string()
            };
            eprintln!("{label}: {err}");
        }
    }
}
