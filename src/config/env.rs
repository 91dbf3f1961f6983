use crate::error::PixivError;

use super::types::PixivConfig;

/// Expand environment variable references in a string.
///
/// Supported syntaxes:
/// - `${VAR}` - replaced with env var value; error if unset
/// - `${VAR:-fallback}` - replaced with env var value, or fallback if unset or empty
///
/// A `$` not followed by `{` is kept literally.
pub fn expand_env_vars(input: &str) -> Result<String, PixivError> {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '$' || chars.peek() != Some(&'{') {
            result.push(ch);
            continue;
        }
        chars.next(); // consume '{'

        let mut var_expr = String::new();
        let mut found_close = false;
        for c in chars.by_ref() {
            if c == '}' {
                found_close = true;
                break;
            }
            var_expr.push(c);
        }
        if !found_close {
            return Err(env_error(&format!(
                "Unclosed variable reference: ${{{var_expr}"
            )));
        }

        match var_expr.split_once(":-") {
            Some((var_name, fallback)) => match std::env::var(var_name) {
                Ok(val) if !val.is_empty() => result.push_str(&val),
                _ => result.push_str(fallback),
            },
            None => {
                let val = std::env::var(&var_expr).map_err(|_| {
                    env_error(&format!("Environment variable '{var_expr}' is not set"))
                })?;
                result.push_str(&val);
            }
        }
    }

    Ok(result)
}

/// Expand environment variables in every string field of a config.
pub fn expand_config(config: &mut PixivConfig) -> Result<(), PixivError> {
    for field in [
        &mut config.client_id,
        &mut config.client_secret,
        &mut config.hash_secret,
        &mut config.oauth_url,
        &mut config.api_referer,
    ] {
        *field = expand_env_vars(field.as_str())?;
    }
    Ok(())
}

fn env_error(detail: &str) -> PixivError {
    PixivError::Config {
        path: std::path::PathBuf::from("<env>"),
        detail: detail.to_string(),
    }
}
