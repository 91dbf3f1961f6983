//! Response decoding with a caller-supplied per-object transform.
//!
//! A [`DecodeHook`] sees every JSON object of a response, innermost first,
//! and returns the value that replaces it. Hooks are how callers turn raw
//! API objects (illusts, users, pages) into their own shapes during parse.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::PixivError;

pub trait DecodeHook {
    /// Transform one decoded object. Its children have already been visited.
    fn visit_object(&self, object: Map<String, Value>) -> Result<Value, PixivError>;
}

/// Leaves every object as decoded.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl DecodeHook for Identity {
    fn visit_object(&self, object: Map<String, Value>) -> Result<Value, PixivError> {
        Ok(Value::Object(object))
    }
}

impl<F> DecodeHook for F
where
    F: Fn(Map<String, Value>) -> Value,
{
    fn visit_object(&self, object: Map<String, Value>) -> Result<Value, PixivError> {
        Ok(self(object))
    }
}

/// Interpret a response body as raw UTF-8 text.
pub fn body_text(bytes: &[u8]) -> Result<String, PixivError> {
    String::from_utf8(bytes.to_vec())
        .map_err(|e| PixivError::Decode(format!("Response body is not valid UTF-8: {e}")))
}

/// Parse `text` as JSON and run `hook` over every object, bottom-up.
pub fn decode_with<H>(text: &str, hook: &H) -> Result<Value, PixivError>
where
    H: DecodeHook + ?Sized,
{
    let value: Value = serde_json::from_str(text)
        .map_err(|e| PixivError::Decode(format!("Invalid JSON response: {e}")))?;
    apply(value, hook)
}

/// Decode through `hook`, then deserialize the result into `T`.
pub fn decode_as<T, H>(text: &str, hook: &H) -> Result<T, PixivError>
where
    T: DeserializeOwned,
    H: DecodeHook + ?Sized,
{
    let value = decode_with(text, hook)?;
    serde_json::from_value(value)
        .map_err(|e| PixivError::Decode(format!("Unexpected response shape: {e}")))
}

fn apply<H>(value: Value, hook: &H) -> Result<Value, PixivError>
where
    H: DecodeHook + ?Sized,
{
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| apply(item, hook))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Value::Object(object) => {
            let visited = object
                .into_iter()
                .map(|(k, v)| Ok((k, apply(v, hook)?)))
                .collect::<Result<Map<_, _>, PixivError>>()?;
            hook.visit_object(visited)
        }
        scalar => Ok(scalar),
    }
}
