//! Request and response bodies for the auth service.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Login request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Registration request body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationInput {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dob: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

/// Successful login/registration response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthGrant {
    pub token: String,
    pub user_id: String,
}

/// Profile as owned by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    /// Filled from the request path when the backend omits it.
    #[serde(rename = "userId", alias = "_id", alias = "id", default)]
    pub user_id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u8>,
    #[serde(default, with = "calendar_date", skip_serializing_if = "Option::is_none")]
    pub dob: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

/// Partial profile sent with `PUT /profile/:userId`.
///
/// `None` leaves a field out of the body. For the optional fields,
/// `Some(None)` is sent as `null` and clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfilePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "clearable"
    )]
    pub age: Option<Option<u8>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "clearable"
    )]
    pub dob: Option<Option<NaiveDate>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "clearable"
    )]
    pub contact: Option<Option<String>>,
}

impl ProfilePatch {
    /// Returns true when the patch carries no fields.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.age.is_none()
            && self.dob.is_none()
            && self.contact.is_none()
    }
}

/// A present key (even `null`) is `Some`; only a missing key stays `None`.
fn clearable<'de, D, T>(d: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(d).map(Some)
}

/// Logout acknowledgement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgement {
    #[serde(default)]
    pub message: Option<String>,
}

/// Serde adapter for optional calendar dates.
///
/// Reads `YYYY-MM-DD` or a full ISO datetime (keeping the date part); an
/// unreadable value becomes `None`. Always writes `YYYY-MM-DD`.
mod calendar_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::validate::parse_calendar_date;

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(date) => s.serialize_str(&date.format("%Y-%m-%d").to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        Ok(raw.as_deref().and_then(parse_calendar_date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_dob_datetime_is_normalized() {
        let json = r#"{
            "_id": "u1",
            "name": "Ada",
            "email": "ada@example.com",
            "age": 36,
            "dob": "1988-12-10T00:00:00.000Z"
        }"#;
        let record: ProfileRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.user_id, "u1");
        assert_eq!(record.dob, NaiveDate::from_ymd_opt(1988, 12, 10));
        assert_eq!(record.contact, None);

        let out = serde_json::to_value(&record).unwrap();
        assert_eq!(out["dob"], "1988-12-10");
        assert_eq!(out["userId"], "u1");
    }

    #[test]
    fn test_profile_tolerates_null_and_garbage_dob() {
        let json = r#"{"userId":"u1","name":"Ada","email":"a@b.com","dob":null}"#;
        let record: ProfileRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.dob, None);

        let json = r#"{"userId":"u1","name":"Ada","email":"a@b.com","dob":"soon"}"#;
        let record: ProfileRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.dob, None);
    }

    #[test]
    fn test_patch_omits_unset_fields() {
        let patch = ProfilePatch {
            name: Some("Ada".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&patch).unwrap();
        assert_eq!(json, r#"{"name":"Ada"}"#);
        assert!(!patch.is_empty());
        assert!(ProfilePatch::default().is_empty());
    }

    #[test]
    fn test_patch_sends_null_for_cleared_fields() {
        let patch = ProfilePatch {
            age: Some(None),
            dob: Some(NaiveDate::from_ymd_opt(1990, 5, 17)),
            contact: Some(None),
            ..Default::default()
        };
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "age": null, "dob": "1990-05-17", "contact": null })
        );

        let back: ProfilePatch = serde_json::from_value(value).unwrap();
        assert_eq!(back, patch);
        assert_eq!(back.name, None);
    }

    #[test]
    fn test_auth_grant_uses_camel_case() {
        let grant: AuthGrant = serde_json::from_str(r#"{"token":"t1","userId":"u1"}"#).unwrap();
        assert_eq!(grant.user_id, "u1");
    }
}
