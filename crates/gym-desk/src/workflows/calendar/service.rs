use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate, Utc};
use tracing::info;

use super::domain::{CalendarEvent, EventDraft, EventId, EventSummary, FeedEntry};
use super::repository::CalendarRepository;
use crate::store::RepositoryError;
use crate::workflows::members::access::{
    is_administrator, require_administrator, AccessError, Caller, CallerError,
};
use crate::workflows::members::repository::AccountRepository;
use crate::workflows::members::{Account, AccountId};
use crate::workflows::validation::ValidationError;

/// Event scheduling plus the read models behind the calendar and dashboard.
///
/// Administrators see every event. Other members see events whose creator is
/// staff at the time of the read. Anonymous callers see nothing.
pub struct CalendarService<S> {
    store: Arc<S>,
}

impl<S> CalendarService<S>
where
    S: AccountRepository + CalendarRepository + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn caller(&self, caller: Caller) -> Result<Account, CalendarServiceError> {
        Ok(caller.require(&*self.store)?)
    }

    /// Resolve a caller that may be anonymous.
    pub fn viewer(&self, caller: Caller) -> Result<Option<Account>, CalendarServiceError> {
        Ok(caller.resolve(&*self.store)?)
    }

    pub fn create_event(
        &self,
        actor: &Account,
        draft: EventDraft,
    ) -> Result<CalendarEvent, CalendarServiceError> {
        require_administrator(actor, "schedule events")?;
        let fields = draft.validate()?;
        let event = self.store.insert_event(fields, actor.id, Utc::now())?;
        info!(event = event.id.0, title = %event.fields.title, "event scheduled");
        Ok(event)
    }

    pub fn update_event(
        &self,
        actor: &Account,
        id: EventId,
        draft: EventDraft,
    ) -> Result<CalendarEvent, CalendarServiceError> {
        require_administrator(actor, "edit events")?;
        let fields = draft.validate()?;
        let mut event = self.require_event(id)?;
        event.fields = fields;
        event.updated_at = Utc::now();
        Ok(self.store.update_event(event)?)
    }

    pub fn delete_event(&self, actor: &Account, id: EventId) -> Result<(), CalendarServiceError> {
        require_administrator(actor, "delete events")?;
        self.require_event(id)?;
        self.store.delete_event(id)?;
        info!(event = id.0, actor = actor.id.0, "event deleted");
        Ok(())
    }

    /// Visible events, most recently created first.
    pub fn events(&self, viewer: Option<&Account>) -> Result<Vec<CalendarEvent>, CalendarServiceError> {
        let Some(viewer) = viewer else {
            return Ok(Vec::new());
        };

        let mut events = self.store.events()?;
        if !is_administrator(viewer) {
            let mut staff: HashMap<AccountId, bool> = HashMap::new();
            let mut visible = Vec::with_capacity(events.len());
            for event in events {
                let creator_is_staff = match staff.get(&event.created_by) {
                    Some(flag) => *flag,
                    None => {
                        let flag = self
                            .store
                            .account(event.created_by)?
                            .is_some_and(|creator| creator.is_staff);
                        staff.insert(event.created_by, flag);
                        flag
                    }
                };
                if creator_is_staff {
                    visible.push(event);
                }
            }
            events = visible;
        }

        events.sort_by(|left, right| {
            right
                .created_at
                .cmp(&left.created_at)
                .then_with(|| right.id.cmp(&left.id))
        });
        Ok(events)
    }

    /// A single event, hidden behind the same visibility rule as the list.
    pub fn event(
        &self,
        viewer: Option<&Account>,
        id: EventId,
    ) -> Result<CalendarEvent, CalendarServiceError> {
        self.events(viewer)?
            .into_iter()
            .find(|event| event.id == id)
            .ok_or(CalendarServiceError::EventNotFound(id))
    }

    pub fn feed(&self, viewer: Option<&Account>) -> Result<Vec<FeedEntry>, CalendarServiceError> {
        Ok(self
            .events(viewer)?
            .iter()
            .map(CalendarEvent::feed_entry)
            .collect())
    }

    pub fn events_on(
        &self,
        viewer: Option<&Account>,
        day: NaiveDate,
    ) -> Result<Vec<CalendarEvent>, CalendarServiceError> {
        Ok(self
            .events(viewer)?
            .into_iter()
            .filter(|event| event.occurs_on(day))
            .collect())
    }

    pub fn summary(
        &self,
        viewer: &Account,
        today: NaiveDate,
    ) -> Result<EventSummary, CalendarServiceError> {
        let events = self.events(Some(viewer))?;
        Ok(EventSummary {
            today: events.iter().filter(|event| event.occurs_on(today)).count(),
            week: events
                .iter()
                .filter(|event| event.within_week_of(today))
                .count(),
            total: events.len(),
        })
    }

    /// Visible events per start month, January first. Every year counts.
    pub fn year_chart(&self, viewer: &Account) -> Result<[u32; 12], CalendarServiceError> {
        let mut months = [0u32; 12];
        for event in self.events(Some(viewer))? {
            let month = event.fields.start_date.month0() as usize;
            months[month] += 1;
        }
        Ok(months)
    }

    fn require_event(&self, id: EventId) -> Result<CalendarEvent, CalendarServiceError> {
        self.store
            .event(id)?
            .ok_or(CalendarServiceError::EventNotFound(id))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CalendarServiceError {
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("event {0} not found")]
    EventNotFound(EventId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<CallerError> for CalendarServiceError {
    fn from(value: CallerError) -> Self {
        match value {
            CallerError::Access(err) => Self::Access(err),
            CallerError::Repository(err) => Self::Repository(err),
        }
    }
}
