use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReminderKind {
    Medication,
    Therapy,
    Exercise,
    Custom,
}

impl std::fmt::Display for ReminderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReminderKind::Medication => write!(f, "medication"),
            ReminderKind::Therapy => write!(f, "therapy"),
            ReminderKind::Exercise => write!(f, "exercise"),
            ReminderKind::Custom => write!(f, "custom"),
        }
    }
}

impl FromStr for ReminderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "medication" => Ok(ReminderKind::Medication),
            "therapy" => Ok(ReminderKind::Therapy),
            "exercise" => Ok(ReminderKind::Exercise),
            "custom" => Ok(ReminderKind::Custom),
            other => Err(format!("Unknown reminder type '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Reminder {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub description: Option<String>,
    #[serde(with = "hhmm")]
    #[schema(value_type = String, example = "09:00")]
    pub time: NaiveTime,
    pub is_active: bool,
    pub last_triggered: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    #[sqlx(skip)]
    pub days: Vec<i16>,
}

/// Row shape the scheduler scans for: a due reminder joined with its owner's
/// notifications preference.
#[derive(Debug, Clone, FromRow)]
pub struct DueReminder {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: String,
    pub title: String,
    pub description: Option<String>,
    pub time: NaiveTime,
    pub user_notifications: bool,
}

/// Payload delivered to the owner when a reminder fires.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReminderAlert {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    #[schema(example = "09:00")]
    pub time: String,
}

impl From<&DueReminder> for ReminderAlert {
    fn from(due: &DueReminder) -> Self {
        Self {
            id: due.id,
            title: due.title.clone(),
            description: due.description.clone(),
            kind: due.kind.clone(),
            time: due.time.format("%H:%M").to_string(),
        }
    }
}

pub fn parse_time_of_day(s: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|_| format!("Invalid time '{}', expected HH:MM", s))
}

/// Minute-precision wire format for time-of-day fields.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        super::parse_time_of_day(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trip() {
        for kind in ["medication", "therapy", "exercise", "custom"] {
            assert_eq!(ReminderKind::from_str(kind).unwrap().to_string(), kind);
        }
    }

    #[test]
    fn test_unknown_kind_rejected() {
        assert!(ReminderKind::from_str("nap").is_err());
    }

    #[test]
    fn test_parse_time_of_day() {
        assert_eq!(
            parse_time_of_day("09:00").unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap()
        );
        assert_eq!(
            parse_time_of_day("23:59").unwrap(),
            NaiveTime::from_hms_opt(23, 59, 0).unwrap()
        );
        // seconds are tolerated on input, dropped on output
        assert_eq!(
            parse_time_of_day("08:30:00").unwrap(),
            NaiveTime::from_hms_opt(8, 30, 0).unwrap()
        );
        assert!(parse_time_of_day("9am").is_err());
        assert!(parse_time_of_day("25:00").is_err());
    }
}
