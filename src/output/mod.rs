pub mod report;

use serde::Serialize;

use crate::model::UserRecord;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Html,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".html") || lower.ends_with(".htm") {
        return Some(OutputFormat::Html);
    }
    if lower.ends_with(".txt") {
        return Some(OutputFormat::Text);
    }
    None
}

/// One row of the user list: name, email and where they live.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct OutputRecord {
    pub name: String,
    pub email: String,
    pub location: String,
}

pub fn build_records(users: &[UserRecord]) -> Vec<OutputRecord> {
    users
        .iter()
        .map(|u| OutputRecord {
            name: u.full_name(),
            email: u.email.clone(),
            location: u.city_country(),
        })
        .collect()
}

// Columns split 40/40/20 of `width`.
pub fn column_widths(width: usize) -> (usize, usize, usize) {
    let name = width * 2 / 5;
    let email = width * 2 / 5;
    (name, email, width - name - email)
}

fn fit(value: &str, width: usize) -> String {
    let count = value.chars().count();
    if count <= width {
        return format!("{value:<width$}");
    }
    if width <= 1 {
        return value.chars().take(width).collect();
    }
    let mut out: String = value.chars().take(width - 1).collect();
    out.push('…');
    out
}

pub fn render_table_row(record: &OutputRecord, index: usize, width: usize) -> String {
    let (name_w, email_w, loc_w) = column_widths(width);
    let line = format!(
        "{:>5}  {} {} {}",
        index,
        fit(&record.name, name_w),
        fit(&record.email, email_w),
        fit(&record.location, loc_w)
    );
    line.trim_end().to_string()
}

pub fn render_text(records: &[OutputRecord], width: usize) -> Vec<u8> {
    let mut out = String::new();
    for (i, r) in records.iter().enumerate() {
        out.push_str(&render_table_row(r, i, width));
        out.push('\n');
    }
    out.into_bytes()
}

pub fn render_json(users: &[UserRecord]) -> Vec<u8> {
    serde_json::to_vec_pretty(users).unwrap_or_else(|_| b"[]\n".to_vec())
}

pub fn render_html(records: &[OutputRecord], users: &[UserRecord]) -> Vec<u8> {
    report::render_html(records, users)
}

pub fn render(format: OutputFormat, users: &[UserRecord], width: usize) -> Vec<u8> {
    match format {
        OutputFormat::Text => render_text(&build_records(users), width),
        OutputFormat::Json => render_json(users),
        OutputFormat::Html => render_html(&build_records(users), users),
    }
}
