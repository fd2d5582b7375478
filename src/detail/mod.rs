use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::DateTime;
use colored::Colorize;
use thiserror::Error;
use tracing::info;

use crate::model::UserRecord;

#[derive(Debug, Error)]
pub enum DetailError {
    #[error("failed to write detail page {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to print detail view: {source}")]
    Print {
        #[source]
        source: std::io::Error,
    },
}

/// Somewhere a single user's details can be shown.
pub trait DetailView {
    fn show_detail(&self, user: &UserRecord) -> Result<(), DetailError>;
}

/// "Dec 10, 1990" for an RFC 3339 date of birth; the raw value if it does not parse.
pub fn format_dob(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => dt.format("%b %-d, %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

pub fn address_lines(user: &UserRecord) -> [String; 3] {
    let loc = &user.location;
    [
        format!("{} {}", loc.street.number, loc.street.name),
        format!("{}, {} {}", loc.city, loc.state, loc.postcode),
        loc.country.clone(),
    ]
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

pub fn render_detail_text(user: &UserRecord) -> String {
    let [street, city_line, country] = address_lines(user);
    let mut out = String::new();
    out.push_str(&format!("{}\n", "Name:".bold()));
    out.push_str(&format!("  {}\n", user.full_name()));
    out.push_str(&format!("{}\n", "Email:".bold()));
    out.push_str(&format!("  {}\n", user.email));
    out.push_str(&format!("{}\n", "Address:".bold()));
    out.push_str(&format!("  {street}\n  {city_line}\n  {country}\n"));
    out.push_str(&format!("{}\n", "Phone:".bold()));
    out.push_str(&format!("  Main: {}\n  Cell: {}\n", user.phone, user.cell));
    out.push_str(&format!("{}\n", "Date of Birth:".bold()));
    out.push_str(&format!("  {}\n", format_dob(&user.dob.date)));
    out
}

pub fn render_detail_html(user: &UserRecord) -> String {
    let [street, city_line, country] = address_lines(user);
    let name = escape_html(&user.full_name());
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8"/>
  <title>{name}</title>
</head>
<body>
  <div>
    <div>
      <img src="{picture}" alt="User Profile"/>
    </div>
    <div>
      <b>Name:</b><br/>
      <div>{name}</div>
    </div>
    <div>
      <b>Email:</b><br/>
      <div>{email}</div>
    </div>
    <div>
      <b>Address:</b><br/>
      <div>
        {street}<br/>
        {city_line}<br/>
        {country}
      </div>
    </div>
    <div>
      <b>Phone:</b><br/>
      <div>
        Main: {phone}<br/>
        Cell: {cell}
      </div>
    </div>
    <div>
      <b>Date of Birth:</b><br/>
      <div>{dob}</div>
    </div>
  </div>
</body>
</html>
"#,
        picture = escape_html(&user.picture.large),
        email = escape_html(&user.email),
        street = escape_html(&street),
        city_line = escape_html(&city_line),
        country = escape_html(&country),
        phone = escape_html(&user.phone),
        cell = escape_html(&user.cell),
        dob = escape_html(&format_dob(&user.dob.date)),
    )
}

/// Prints the detail view to stdout.
#[derive(Clone, Copy, Debug, Default)]
pub struct TerminalDetail;

impl DetailView for TerminalDetail {
    fn show_detail(&self, user: &UserRecord) -> Result<(), DetailError> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", user.full_name().bold().underline())
            .and_then(|_| stdout.write_all(render_detail_text(user).as_bytes()))
            .map_err(|source| DetailError::Print { source })
    }
}

/// Writes one standalone HTML page per user into `dir`.
#[derive(Clone, Debug)]
pub struct HtmlDetail {
    dir: PathBuf,
}

impl HtmlDetail {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn page_path(&self, user: &UserRecord) -> PathBuf {
        self.dir.join(detail_file_name(user))
    }
}

fn detail_file_name(user: &UserRecord) -> String {
    let stem: String = user
        .full_name()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect();
    let stem = stem.trim_matches('-');
    if stem.is_empty() {
        "user.html".to_string()
    } else {
        format!("{stem}.html")
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), DetailError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| DetailError::Write {
            path: parent.display().to_string(),
            source,
        })?;
    }
    std::fs::write(path, contents).map_err(|source| DetailError::Write {
        path: path.display().to_string(),
        source,
    })
}

impl DetailView for HtmlDetail {
    fn show_detail(&self, user: &UserRecord) -> Result<(), DetailError> {
        let path = self.page_path(user);
        write_file(&path, &render_detail_html(user))?;
        info!(path = %path.display(), "wrote detail page");
        println!("{} {}", "Detail page:".bold(), path.display());
        Ok(())
    }
}
