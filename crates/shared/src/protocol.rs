use serde::{Deserialize, Serialize};

/// Request body for create and update.
///
/// Text fields carry whatever the operator typed; the service is the only
/// validator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionPayload {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub promotion_value: String,
    pub promotion_percent: String,
    pub status: bool,
    pub expiry: String,
}

/// Query string for the search listing.
///
/// The listing is filtered by status only, and only when filtering to active
/// promotions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchQuery {
    pub active_only: bool,
}

impl SearchQuery {
    pub fn to_query_string(self) -> String {
        if self.active_only {
            "status=true".to_string()
        } else {
            String::new()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub message: String,
}
