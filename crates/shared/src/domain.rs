use std::fmt;

use chrono::NaiveDate;
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};

/// Server-assigned promotion identifier.
///
/// Treated as opaque text: the service may hand out numeric or string ids and
/// the client only ever echoes them back into request paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PromotionId(pub String);

impl PromotionId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PromotionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for PromotionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(raw) => Ok(Self(raw)),
            Value::Number(raw) => Ok(Self(raw.to_string())),
            other => Err(de::Error::custom(format!(
                "promotion id must be a string or number, got {other}"
            ))),
        }
    }
}

/// Two-valued encoding of the status text control.
///
/// Only the literal `"true"` reads as active; every other value, including the
/// empty string left behind by a cleared form, reads as inactive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StatusFlag {
    Active,
    #[default]
    Inactive,
}

impl StatusFlag {
    pub fn parse(text: &str) -> Self {
        if text == "true" {
            Self::Active
        } else {
            Self::Inactive
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "true",
            Self::Inactive => "false",
        }
    }

    pub fn is_active(self) -> bool {
        self == Self::Active
    }
}

impl From<bool> for StatusFlag {
    fn from(value: bool) -> Self {
        if value {
            Self::Active
        } else {
            Self::Inactive
        }
    }
}

impl fmt::Display for StatusFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A promotion record as returned by the promotions service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Promotion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PromotionId>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub name: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub description: String,
    #[serde(rename = "type", default, deserialize_with = "text_or_number")]
    pub kind: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub promotion_value: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub promotion_percent: String,
    #[serde(default, deserialize_with = "loose_bool")]
    pub status: bool,
    #[serde(default, deserialize_with = "text_or_number")]
    pub expiry: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated_at: Option<NaiveDate>,
}

impl Promotion {
    pub fn status_flag(&self) -> StatusFlag {
        StatusFlag::from(self.status)
    }
}

/// Accepts text, numbers and null for fields the UI shows as plain text.
fn text_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(raw) => Ok(raw),
        Value::Number(raw) => Ok(number_text(&raw)),
        Value::Bool(raw) => Ok(raw.to_string()),
        other => Err(de::Error::custom(format!(
            "expected text or number, got {other}"
        ))),
    }
}

/// Whole-valued floats print without a fractional part, so `20.0` reads as `20`.
fn number_text(raw: &Number) -> String {
    match raw.as_f64() {
        Some(value) if raw.is_f64() && value.fract() == 0.0 && value.abs() < 1e15 => {
            format!("{value:.0}")
        }
        _ => raw.to_string(),
    }
}

/// Anything that compares equal to `true` is active; everything else is not.
fn loose_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(raw) => raw,
        Value::Number(raw) => raw.as_f64() == Some(1.0),
        Value::String(raw) => matches!(raw.trim(), "1" | "true"),
        _ => false,
    })
}
