use std::fmt;

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::members::AccountId;
use crate::workflows::validation::{trimmed_text, ValidationError};

pub const TITLE_MAX_LEN: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub u64);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Scheduled class or activity shown on the gym calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: EventId,
    #[serde(flatten)]
    pub fields: EventFields,
    pub created_by: AccountId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated event fields. `start_date <= end_date` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFields {
    pub title: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub capacity: u32,
    pub subscriptions: u32,
}

impl CalendarEvent {
    pub fn starts_at(&self) -> NaiveDateTime {
        self.fields.start_date.and_time(self.fields.start_time)
    }

    pub fn ends_at(&self) -> NaiveDateTime {
        self.fields.end_date.and_time(self.fields.end_time)
    }

    /// True when `day` falls inside the event's date range.
    pub fn occurs_on(&self, day: NaiveDate) -> bool {
        self.fields.start_date <= day && day <= self.fields.end_date
    }

    /// True when the event lies entirely between `today` and the coming Sunday.
    pub fn within_week_of(&self, today: NaiveDate) -> bool {
        self.fields.start_date >= today && self.fields.end_date <= end_of_week(today)
    }

    pub fn feed_entry(&self) -> FeedEntry {
        FeedEntry {
            id: self.id,
            title: self.fields.title.clone(),
            start: self.starts_at(),
            end: self.ends_at(),
            description: self.fields.description.clone(),
        }
    }
}

/// Sunday of the week containing `today`.
pub fn end_of_week(today: NaiveDate) -> NaiveDate {
    let remaining = 6 - u64::from(today.weekday().num_days_from_monday());
    today.checked_add_days(Days::new(remaining)).unwrap_or(NaiveDate::MAX)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(default)]
    pub capacity: u32,
    #[serde(default)]
    pub subscriptions: u32,
}

impl EventDraft {
    pub fn validate(self) -> Result<EventFields, ValidationError> {
        if self.start_date > self.end_date {
            return Err(ValidationError::new(
                "start_date",
                "must not be later than end_date",
            ));
        }

        Ok(EventFields {
            title: trimmed_text("title", &self.title, 1, TITLE_MAX_LEN)?,
            description: trimmed_text("description", &self.description, 1, usize::MAX)?,
            start_date: self.start_date,
            end_date: self.end_date,
            start_time: self.start_time,
            end_time: self.end_time,
            capacity: self.capacity,
            subscriptions: self.subscriptions,
        })
    }
}

/// Calendar widget entry with date and time combined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedEntry {
    pub id: EventId,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub description: String,
}

/// Dashboard counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSummary {
    pub today: usize,
    pub week: usize,
    pub total: usize,
}
