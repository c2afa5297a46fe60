//! Search result rendering.

use shared::domain::Promotion;

use crate::form::PromotionForm;

pub const COLUMNS: [&str; 8] = [
    "ID",
    "Name",
    "Description",
    "Type",
    "Value",
    "Percent",
    "Status",
    "Expiry",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    /// Position in the response; only stable for the render that produced it.
    pub index: usize,
    pub cells: [String; 8],
}

impl ResultRow {
    fn from_record(index: usize, record: &Promotion) -> Self {
        Self {
            index,
            cells: [
                record
                    .id
                    .as_ref()
                    .map(|id| id.as_str().to_string())
                    .unwrap_or_default(),
                record.name.clone(),
                record.description.clone(),
                record.kind.clone(),
                record.promotion_value.clone(),
                record.promotion_percent.clone(),
                record.status_flag().to_string(),
                record.expiry.clone(),
            ],
        }
    }

    pub fn dom_id(&self) -> String {
        format!("row_{}", self.index)
    }
}

/// One rendered search listing, rows in server order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultsTable {
    pub rows: Vec<ResultRow>,
}

impl ResultsTable {
    pub fn from_records(records: &[Promotion]) -> Self {
        Self {
            rows: records
                .iter()
                .enumerate()
                .map(|(index, record)| ResultRow::from_record(index, record))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Markup for the `search_results` region. Cell values are interpolated
    /// without escaping.
    pub fn to_html(&self) -> String {
        let mut html = String::from(r#"<table class="table table-striped" cellpadding="10">"#);
        html.push_str("<thead><tr>");
        for column in COLUMNS {
            html.push_str(&format!(r#"<th class="col-md-2">{column}</th>"#));
        }
        html.push_str("</tr></thead><tbody>");
        for row in &self.rows {
            html.push_str(&format!(r#"<tr id="{}">"#, row.dom_id()));
            for cell in &row.cells {
                html.push_str(&format!("<td>{cell}</td>"));
            }
            html.push_str("</tr>");
        }
        html.push_str("</tbody></table>");
        html
    }
}

/// Renders a search response and copies its first record into the form.
///
/// An empty response leaves the form as it was.
pub fn render_search_results(records: &[Promotion], form: &mut PromotionForm) -> ResultsTable {
    let table = ResultsTable::from_records(records);
    if let Some(first) = records.first() {
        form.write(first);
    }
    table
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
