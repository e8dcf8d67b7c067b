use chrono::{DateTime, Utc};

use super::domain::{CalendarEvent, EventFields, EventId};
use crate::store::RepositoryError;
use crate::workflows::members::AccountId;

pub trait CalendarRepository: Send + Sync {
    fn insert_event(
        &self,
        fields: EventFields,
        created_by: AccountId,
        at: DateTime<Utc>,
    ) -> Result<CalendarEvent, RepositoryError>;
    fn update_event(&self, event: CalendarEvent) -> Result<CalendarEvent, RepositoryError>;
    fn delete_event(&self, id: EventId) -> Result<(), RepositoryError>;
    fn event(&self, id: EventId) -> Result<Option<CalendarEvent>, RepositoryError>;
    fn events(&self) -> Result<Vec<CalendarEvent>, RepositoryError>;
}
