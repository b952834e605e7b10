//! Decoded response bodies and envelope helpers
//!
//! The transport layer never unwraps envelopes. Operations hand back a
//! [`Payload`] as the backend sent it, and callers pick the shape they
//! expect with the helpers here.

use crate::error::{ApiError, ApiResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A decoded response body
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    /// Body declared as JSON and parsed successfully
    Json(Value),
    /// Body not declared as JSON
    Text(String),
    /// Body declared as JSON but malformed, or unreadable
    Null,
}

impl Payload {
    /// Decode a raw body according to its declared content type.
    ///
    /// Malformed JSON yields [`Payload::Null`] instead of an error.
    #[must_use]
    pub fn decode(content_type: &str, body: &str) -> Self {
        if content_type.contains("application/json") {
            serde_json::from_str(body).map_or(Self::Null, Self::Json)
        } else {
            Self::Text(body.to_string())
        }
    }

    /// Check for the null payload
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null | Self::Json(Value::Null))
    }

    /// JSON value, if the body was JSON
    #[must_use]
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(v) => Some(v),
            _ => None,
        }
    }

    /// Raw text, if the body was not JSON
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Deserialize a JSON payload into a typed value
    pub fn into_typed<T: DeserializeOwned>(self) -> ApiResult<T> {
        match self {
            Self::Json(v) => serde_json::from_value(v)
                .map_err(|e| ApiError::UnexpectedPayload(e.to_string())),
            Self::Text(_) => Err(ApiError::UnexpectedPayload(
                "expected a JSON body, got text".to_string(),
            )),
            Self::Null => Err(ApiError::UnexpectedPayload(
                "expected a JSON body, got none".to_string(),
            )),
        }
    }

    /// Recipes from either a `{ "results": [...] }` envelope or a bare array.
    ///
    /// Any other shape yields an empty list. Entries that are not objects are
    /// skipped.
    #[must_use]
    pub fn recipe_list(&self) -> Vec<RecipeSummary> {
        let items = match self.as_json() {
            Some(Value::Array(items)) => items,
            Some(Value::Object(map)) => match map.get("results") {
                Some(Value::Array(items)) => items,
                _ => return Vec::new(),
            },
            _ => return Vec::new(),
        };
        items
            .iter()
            .filter(|v| v.is_object())
            .map(RecipeSummary::from_json)
            .collect()
    }

    /// Pick the message for a failing response.
    ///
    /// Exactly one source is used, in order: a `detail` field, an `error` or
    /// `message` field (JSON bodies only), the raw text body, then
    /// `HTTP <status>`. Empty or null fields are skipped.
    #[must_use]
    pub fn error_message(&self, status: u16) -> String {
        if let Self::Json(Value::Object(map)) = self {
            let found = ["detail", "error", "message"]
                .iter()
                .find_map(|key| map.get(*key).and_then(message_text));
            if let Some(msg) = found {
                return msg;
            }
        }
        match self {
            Self::Text(s) if !s.is_empty() => s.clone(),
            _ => format!("HTTP {status}"),
        }
    }
}

fn message_text(v: &Value) -> Option<String> {
    match v {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Recipe as listed by search and the saved collection
///
/// Built field by field from the JSON object. When a backend sends more than
/// one spelling of a field, the first one present wins. A field of an
/// unexpected type reads as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecipeSummary {
    /// Recipe identifier (`id`, `recipe_id`, then `_id`)
    pub id: Option<String>,
    /// Title
    pub title: Option<String>,
    /// Image URL (`image`, then `image_url`)
    pub image: Option<String>,
    /// Preparation time in minutes (`ready_in_minutes`, then `readyInMinutes`)
    pub ready_in_minutes: Option<u32>,
    /// Number of servings
    pub servings: Option<u32>,
    /// Short summary (`summary`, then `description`)
    pub summary: Option<String>,
}

impl RecipeSummary {
    /// Read a recipe out of any JSON value. Non-objects give an empty recipe.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        let Value::Object(map) = value else {
            return Self::default();
        };
        let first = |keys: &[&str]| {
            keys.iter()
                .find_map(|k| map.get(*k).filter(|v| !v.is_null()))
        };

        Self {
            id: first(&["id", "recipe_id", "_id"]).and_then(id_text),
            title: first(&["title"]).and_then(string_field),
            image: first(&["image", "image_url"]).and_then(string_field),
            ready_in_minutes: first(&["ready_in_minutes", "readyInMinutes"])
                .and_then(count_field),
            servings: first(&["servings"]).and_then(count_field),
            summary: first(&["summary", "description"]).and_then(string_field),
        }
    }

    /// Title with the listing fallback
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or("Untitled recipe")
    }
}

impl<'de> Deserialize<'de> for RecipeSummary {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(|value| Self::from_json(&value))
    }
}

// Backends disagree on whether ids are numbers or strings.
fn id_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn string_field(v: &Value) -> Option<String> {
    v.as_str().map(str::to_string)
}

// Whole counts; fractional minutes round, numeric strings parse.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn count_field(v: &Value) -> Option<u32> {
    match v {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f >= 0.0)
                    .map(|f| f.round() as u64)
            })
            .and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Body returned by the login and signup endpoints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Bearer token, when the backend issued one
    #[serde(default)]
    pub access_token: Option<String>,
    /// Opaque user record
    #[serde(default)]
    pub user: Option<Value>,
}
