use std::fmt;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

/// Identifier as served by the events endpoint. The feed uses integers,
/// but string ids are accepted so a differently shaped backend still works.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum EventId {
    Num(i64),
    Text(String),
}

impl EventId {
    /// Parses user input the way the page reads `data-event-id`: numeric
    /// text becomes a numeric id.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        match trimmed.parse::<i64>() {
            Ok(n) => EventId::Num(n),
            Err(_) => EventId::Text(trimmed.to_string()),
        }
    }

    /// Loose comparison used when resolving typed or stale ids against the
    /// catalog: `3` and `"3"` name the same event.
    pub fn matches(&self, other: &EventId) -> bool {
        match (self, other) {
            (EventId::Num(a), EventId::Num(b)) => a == b,
            (EventId::Text(a), EventId::Text(b)) => a == b,
            (EventId::Num(n), EventId::Text(s)) | (EventId::Text(s), EventId::Num(n)) => {
                s.trim() == n.to_string()
            }
        }
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventId::Num(n) => write!(f, "{n}"),
            EventId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for EventId {
    fn from(value: i64) -> Self {
        EventId::Num(value)
    }
}

impl From<&str> for EventId {
    fn from(value: &str) -> Self {
        EventId::Text(value.to_string())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub category: String,
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub location: String,
    // only ever changed in memory, never written back to the source
    pub spots_left: i64,
}

impl Event {
    pub fn is_full(&self) -> bool {
        self.spots_left <= 0
    }

    pub fn calendar_date(&self) -> Option<NaiveDate> {
        parse_event_date(&self.date)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpotsInfo {
    pub text: String,
    pub class_name: &'static str,
}

impl SpotsInfo {
    pub fn for_spots(spots_left: i64) -> Self {
        if spots_left < 10 {
            Self {
                text: format!("Only {spots_left} spots left!"),
                class_name: "card-spots warning",
            }
        } else {
            Self {
                text: format!("{spots_left} spots available"),
                class_name: "card-spots",
            }
        }
    }
}

pub fn parse_event_date(input: &str) -> Option<NaiveDate> {
    let cleaned = input.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(&cleaned) {
        return Some(dt.date_naive());
    }

    let formats = [
        "%Y-%m-%d",
        "%m/%d/%Y",
        "%B %d, %Y",
        "%b %d, %Y",
        "%B %e, %Y",
        "%b %e, %Y",
    ];
    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&cleaned, fmt).ok())
}
