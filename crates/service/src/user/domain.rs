use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Stored user (business view). Serialized with the camelCase field names of the HTTP surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    pub address: Option<String>,
    pub phone_number: Option<String>,
}

/// The mutable fields of a user; input of create and full replace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    pub address: Option<String>,
    pub phone_number: Option<String>,
}

/// What the repository persists: `id` is `None` until storage assigns one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: Option<i64>,
    pub data: UserData,
}

impl User {
    pub fn from_parts(id: i64, data: UserData) -> Self {
        Self {
            id,
            email: data.email,
            first_name: data.first_name,
            last_name: data.last_name,
            birth_date: data.birth_date,
            address: data.address,
            phone_number: data.phone_number,
        }
    }

    /// Overwrite every mutable field, keeping `id`.
    pub fn replace_data(&mut self, data: UserData) {
        *self = Self::from_parts(self.id, data);
    }

    pub fn data(&self) -> UserData {
        UserData {
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            birth_date: self.birth_date,
            address: self.address.clone(),
            phone_number: self.phone_number.clone(),
        }
    }
}

impl UserRecord {
    pub fn new(data: UserData) -> Self {
        Self { id: None, data }
    }
}

impl From<User> for UserRecord {
    fn from(user: User) -> Self {
        let data = user.data();
        Self { id: Some(user.id), data }
    }
}

impl From<models::user::Model> for User {
    fn from(m: models::user::Model) -> Self {
        Self {
            id: m.id,
            email: m.email,
            first_name: m.first_name,
            last_name: m.last_name,
            birth_date: m.birth_date,
            address: m.address,
            phone_number: m.phone_number,
        }
    }
}

/// Parse a calendar date in the strict `YYYY-MM-DD` form; `2000-1-1` is rejected.
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    let b = raw.as_bytes();
    let shaped = b.len() == 10
        && b[4] == b'-'
        && b[7] == b'-'
        && b.iter().enumerate().all(|(i, c)| i == 4 || i == 7 || c.is_ascii_digit());
    if !shaped {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}
