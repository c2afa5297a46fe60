//! Terminal rendering of the form and the search listing.

use client_core::{render::COLUMNS, FormField, PromotionForm, ResultsTable};
use tabled::{builder::Builder, settings::Style};

pub fn form_table(form: &PromotionForm) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for field in FormField::ALL {
        builder.push_record([field.ui_name(), form.get(field)]);
    }
    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.to_string()
}

pub fn results_table(results: &ResultsTable) -> String {
    let mut builder = Builder::default();
    builder.push_record(COLUMNS);
    for row in &results.rows {
        builder.push_record(row.cells.iter().map(String::as_str));
    }
    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.to_string()
}

pub fn flash_line(flash: &str) -> String {
    format!("flash_message: {flash}")
}
