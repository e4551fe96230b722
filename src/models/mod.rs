//! Wire types for the ProjectDesk API.

pub mod auth;
pub mod project;
pub mod user;

pub use auth::{AddPasswordRequest, LoginRequest, RefreshRequest, RegisterRequest, TokenResponse};
pub use project::{Project, ProjectCreate, ProjectUpdate};
pub use user::{HealthStatus, ListUsersQuery, RoleUpdate, User, UserRole, UserStats, UserUpdate};

/// Timestamp (de)serialization.
///
/// The server emits ISO-8601 timestamps that may or may not carry an offset;
/// offset-less values are read as UTC.
pub(crate) mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer};

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
    }

    pub mod option {
        use super::*;

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) => parse(&raw)
                    .map(Some)
                    .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}"))),
                None => Ok(None),
            }
        }
    }

}
