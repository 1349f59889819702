//! Partial updates of a user.
//!
//! A patch arrives as a JSON object keyed by camelCase field name. Every key is
//! parsed into a typed [`UserPatch`] before anything is applied, so an unknown
//! key or a badly typed value leaves the stored record untouched.

use chrono::NaiveDate;
use serde_json::{Map, Value};

use super::domain::{parse_iso_date, User};
use crate::errors::ServiceError;

/// Fields a patch may touch. `id` is deliberately absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserField {
    Email,
    FirstName,
    LastName,
    BirthDate,
    Address,
    PhoneNumber,
}

impl UserField {
    pub const ALL: [UserField; 6] = [
        UserField::Email,
        UserField::FirstName,
        UserField::LastName,
        UserField::BirthDate,
        UserField::Address,
        UserField::PhoneNumber,
    ];

    /// Wire name of the field.
    pub fn key(self) -> &'static str {
        match self {
            UserField::Email => "email",
            UserField::FirstName => "firstName",
            UserField::LastName => "lastName",
            UserField::BirthDate => "birthDate",
            UserField::Address => "address",
            UserField::PhoneNumber => "phoneNumber",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }
}

/// One typed field assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserPatch {
    Email(String),
    FirstName(String),
    LastName(String),
    BirthDate(NaiveDate),
    Address(Option<String>),
    PhoneNumber(Option<String>),
}

impl UserPatch {
    /// Parse a single `key: value` pair.
    ///
    /// Required fields reject `null`; optional fields accept it and clear the value.
    pub fn parse(key: &str, value: &Value) -> Result<Self, ServiceError> {
        let field = UserField::from_key(key)
            .ok_or_else(|| ServiceError::Validation(format!("Invalid field: {key}")))?;
        let invalid = || ServiceError::Validation(format!("Invalid value for field: {key}"));

        let patch = match field {
            UserField::Email => UserPatch::Email(required_string(value).ok_or_else(invalid)?),
            UserField::FirstName => UserPatch::FirstName(required_string(value).ok_or_else(invalid)?),
            UserField::LastName => UserPatch::LastName(required_string(value).ok_or_else(invalid)?),
            UserField::BirthDate => {
                let raw = value.as_str().ok_or_else(invalid)?;
                let date = parse_iso_date(raw).ok_or_else(invalid)?;
                UserPatch::BirthDate(date)
            }
            UserField::Address => UserPatch::Address(optional_string(value).ok_or_else(invalid)?),
            UserField::PhoneNumber => UserPatch::PhoneNumber(optional_string(value).ok_or_else(invalid)?),
        };
        Ok(patch)
    }

    pub fn field(&self) -> UserField {
        match self {
            UserPatch::Email(_) => UserField::Email,
            UserPatch::FirstName(_) => UserField::FirstName,
            UserPatch::LastName(_) => UserField::LastName,
            UserPatch::BirthDate(_) => UserField::BirthDate,
            UserPatch::Address(_) => UserField::Address,
            UserPatch::PhoneNumber(_) => UserField::PhoneNumber,
        }
    }

    pub fn apply(self, user: &mut User) {
        match self {
            UserPatch::Email(v) => user.email = v,
            UserPatch::FirstName(v) => user.first_name = v,
            UserPatch::LastName(v) => user.last_name = v,
            UserPatch::BirthDate(v) => user.birth_date = v,
            UserPatch::Address(v) => user.address = v,
            UserPatch::PhoneNumber(v) => user.phone_number = v,
        }
    }
}

/// Parse a whole update map; the first bad key aborts with nothing applied.
pub fn parse_updates(updates: &Map<String, Value>) -> Result<Vec<UserPatch>, ServiceError> {
    updates.iter().map(|(k, v)| UserPatch::parse(k, v)).collect()
}

fn required_string(value: &Value) -> Option<String> {
    value.as_str().map(str::to_owned)
}

fn optional_string(value: &Value) -> Option<Option<String>> {
    match value {
        Value::Null => Some(None),
        Value::String(s) => Some(Some(s.clone())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn updates(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn every_field_round_trips_through_its_key() {
        for f in UserField::ALL {
            assert_eq!(UserField::from_key(f.key()), Some(f));
        }
        assert_eq!(UserField::from_key("id"), None);
        assert_eq!(UserField::from_key("first_name"), None);
    }

    #[test]
    fn parses_typed_values() {
        let parsed = parse_updates(&updates(json!({
            "birthDate": "2000-01-31",
            "address": null,
            "phoneNumber": "555",
            "firstName": "John"
        })))
        .unwrap();
        assert!(parsed.contains(&UserPatch::BirthDate(NaiveDate::from_ymd_opt(2000, 1, 31).unwrap())));
        assert!(parsed.contains(&UserPatch::Address(None)));
        assert!(parsed.contains(&UserPatch::PhoneNumber(Some("555".into()))));
        assert!(parsed.contains(&UserPatch::FirstName("John".into())));
    }

    #[test]
    fn unknown_key_is_rejected_by_name() {
        let err = parse_updates(&updates(json!({"firstName": "X", "nickname": "x"}))).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref m) if m == "Invalid field: nickname"));
    }

    #[test]
    fn id_is_not_patchable() {
        let err = UserPatch::parse("id", &json!(5)).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref m) if m == "Invalid field: id"));
    }

    #[test]
    fn wrong_types_and_nulls_on_required_fields_are_rejected() {
        for (k, v) in [
            ("email", json!(null)),
            ("firstName", json!(42)),
            ("birthDate", json!("31/01/2000")),
            ("birthDate", json!("2000-1-31")),
            ("birthDate", json!(20000131)),
            ("address", json!(true)),
        ] {
            let err = UserPatch::parse(k, &v).unwrap_err();
            assert!(
                matches!(err, ServiceError::Validation(ref m) if *m == format!("Invalid value for field: {k}")),
                "{k}: {v}"
            );
        }
    }

    #[test]
    fn apply_changes_only_the_named_field() {
        let mut user = User {
            id: 1,
            email: "a@gmail.com".into(),
            first_name: "A".into(),
            last_name: "B".into(),
            birth_date: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            address: Some("Old".into()),
            phone_number: None,
        };
        let before = user.clone();
        UserPatch::Address(Some("NewAddr".into())).apply(&mut user);
        assert_eq!(user.address.as_deref(), Some("NewAddr"));
        assert_eq!(User { address: before.address.clone(), ..user.clone() }, before);
    }
}
