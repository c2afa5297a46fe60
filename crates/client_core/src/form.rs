//! Form binding between the promotion edit fields and wire records.

use std::{fmt, str::FromStr};

use shared::{
    domain::{Promotion, PromotionId, StatusFlag},
    protocol::{PromotionPayload, SearchQuery},
};
use thiserror::Error;

/// Named fields of the promotion form, identified by their UI roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Id,
    Name,
    Description,
    Type,
    Value,
    Percent,
    Status,
    Available,
    Expiry,
}

impl FormField {
    pub const ALL: [FormField; 9] = [
        FormField::Id,
        FormField::Name,
        FormField::Description,
        FormField::Type,
        FormField::Value,
        FormField::Percent,
        FormField::Status,
        FormField::Available,
        FormField::Expiry,
    ];

    pub fn ui_name(self) -> &'static str {
        match self {
            FormField::Id => "promotion_id",
            FormField::Name => "promotion_name",
            FormField::Description => "promotion_description",
            FormField::Type => "promotion_type",
            FormField::Value => "promotion_value",
            FormField::Percent => "promotion_percent",
            FormField::Status => "promotion_status",
            FormField::Available => "promotion_available",
            FormField::Expiry => "promotion_expiry",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ui_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown form field '{0}'")]
pub struct UnknownField(pub String);

impl FromStr for FormField {
    type Err = UnknownField;

    /// Accepts the full UI name or the same name without the `promotion_` prefix.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim();
        let short = wanted.strip_prefix("promotion_").unwrap_or(wanted);
        FormField::ALL
            .into_iter()
            .find(|field| field.ui_name().trim_start_matches("promotion_") == short)
            .ok_or_else(|| UnknownField(raw.to_string()))
    }
}

/// Current contents of the single promotion form.
///
/// Every field is raw text, as typed or as last written from a response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromotionForm {
    pub id: String,
    pub name: String,
    pub description: String,
    pub kind: String,
    pub value: String,
    pub percent: String,
    pub status: String,
    pub available: String,
    pub expiry: String,
}

impl PromotionForm {
    /// Builds the create/update body from the current field values.
    pub fn read(&self) -> PromotionPayload {
        PromotionPayload {
            name: self.name.clone(),
            description: self.description.clone(),
            kind: self.kind.clone(),
            promotion_value: self.value.clone(),
            promotion_percent: self.percent.clone(),
            status: self.status_flag().is_active(),
            expiry: self.expiry.clone(),
        }
    }

    pub fn write(&mut self, record: &Promotion) {
        let status = record.status_flag().as_str();
        self.id = record
            .id
            .as_ref()
            .map(|id| id.as_str().to_string())
            .unwrap_or_default();
        self.name = record.name.clone();
        self.description = record.description.clone();
        self.kind = record.kind.clone();
        self.value = record.promotion_value.clone();
        self.percent = record.promotion_percent.clone();
        self.status = status.to_string();
        self.available = status.to_string();
        self.expiry = record.expiry.clone();
    }

    /// Empties the editable fields. The id and the availability display stay.
    pub fn clear(&mut self) {
        self.name.clear();
        self.description.clear();
        self.kind.clear();
        self.value.clear();
        self.percent.clear();
        self.status.clear();
        self.expiry.clear();
    }

    pub fn status_flag(&self) -> StatusFlag {
        StatusFlag::parse(&self.status)
    }

    /// Lookup key for retrieve, update, delete and the activation toggles.
    pub fn lookup_id(&self) -> PromotionId {
        PromotionId::new(self.id.clone())
    }

    pub fn search_query(&self) -> SearchQuery {
        SearchQuery {
            active_only: self.status_flag().is_active(),
        }
    }

    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Id => &self.id,
            FormField::Name => &self.name,
            FormField::Description => &self.description,
            FormField::Type => &self.kind,
            FormField::Value => &self.value,
            FormField::Percent => &self.percent,
            FormField::Status => &self.status,
            FormField::Available => &self.available,
            FormField::Expiry => &self.expiry,
        }
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let slot = match field {
            FormField::Id => &mut self.id,
            FormField::Name => &mut self.name,
            FormField::Description => &mut self.description,
            FormField::Type => &mut self.kind,
            FormField::Value => &mut self.value,
            FormField::Percent => &mut self.percent,
            FormField::Status => &mut self.status,
            FormField::Available => &mut self.available,
            FormField::Expiry => &mut self.expiry,
        };
        *slot = value.into();
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
