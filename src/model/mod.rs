use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// Anything that can be ordered by first name.
pub trait FirstName {
    fn first_name(&self) -> &str;
}

/// Anything that can be matched by first or last name.
pub trait PersonName: FirstName {
    fn last_name(&self) -> &str;
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Name {
    #[serde(default)]
    pub title: String,
    pub first: String,
    pub last: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Street {
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub name: String,
}

// The API emits numeric postcodes for some nationalities and strings for others.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Postcode {
    Number(i64),
    Text(String),
}

impl Default for Postcode {
    fn default() -> Self {
        Postcode::Text(String::new())
    }
}

impl fmt::Display for Postcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Postcode::Number(n) => write!(f, "{n}"),
            Postcode::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Location {
    #[serde(default)]
    pub street: Street,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub postcode: Postcode,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Picture {
    #[serde(default)]
    pub large: String,
    #[serde(default)]
    pub medium: String,
    #[serde(default)]
    pub thumbnail: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DateOfBirth {
    pub date: String,
    #[serde(default)]
    pub age: u32,
}

/// One randomuser.me result, restricted to the fields requested through `inc=`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct UserRecord {
    pub name: Name,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub cell: String,
    #[serde(default)]
    pub dob: DateOfBirth,
    #[serde(default)]
    pub picture: Picture,
}

impl UserRecord {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name.first, self.name.last)
    }

    pub fn city_country(&self) -> String {
        format!("{}, {}", self.location.city, self.location.country)
    }
}

impl FirstName for UserRecord {
    fn first_name(&self) -> &str {
        &self.name.first
    }
}

impl PersonName for UserRecord {
    fn last_name(&self) -> &str {
        &self.name.last
    }
}

/// Body of a `noinfo` response: just the results array.
#[derive(Clone, Debug, Deserialize)]
pub struct Page<T> {
    pub results: Vec<T>,
}
