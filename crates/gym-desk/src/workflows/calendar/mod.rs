//! Gym calendar: scheduled events, the widget feed and dashboard counters.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{
    end_of_week, CalendarEvent, EventDraft, EventFields, EventId, EventSummary, FeedEntry,
};
pub use repository::CalendarRepository;
pub use router::calendar_router;
pub use service::{CalendarService, CalendarServiceError};
