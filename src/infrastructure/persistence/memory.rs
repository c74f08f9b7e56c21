//! In-process store implementations.
//!
//! Used with `STORAGE_BACKEND=memory` and throughout the test suite. Both stores
//! are lock-free for readers and safe to share across tasks.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::domain::entities::{Alias, ClickEvent, NewAlias, NewClickEvent};
use crate::domain::repositories::{DestinationStore, EventStore};
use crate::domain::window::TimeWindow;
use crate::error::AppError;

/// DashMap-backed alias store.
///
/// `insert_if_absent` goes through the map's entry API, which holds the shard
/// lock for the duration of the check and insert.
#[derive(Default)]
pub struct MemoryDestinationStore {
    aliases: DashMap<String, Alias>,
}

impl MemoryDestinationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

#[async_trait]
impl DestinationStore for MemoryDestinationStore {
    async fn find_by_code(&self, code: &str) -> Result<Option<Alias>, AppError> {
        Ok(self.aliases.get(code).map(|entry| entry.value().clone()))
    }

    async fn insert_if_absent(&self, new_alias: NewAlias) -> Result<Option<Alias>, AppError> {
        match self.aliases.entry(new_alias.code.clone()) {
            Entry::Occupied(_) => Ok(None),
            Entry::Vacant(slot) => {
                let alias = new_alias.into_alias(Utc::now());
                slot.insert(alias.clone());
                Ok(Some(alias))
            }
        }
    }

    async fn list_codes_by_group(&self, group: &str) -> Result<Vec<String>, AppError> {
        let mut codes: Vec<String> = self
            .aliases
            .iter()
            .filter(|entry| entry.value().group.as_deref() == Some(group))
            .map(|entry| entry.key().clone())
            .collect();
        codes.sort();
        Ok(codes)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// DashMap-backed click log keyed by event id.
#[derive(Default)]
pub struct MemoryEventStore {
    events: DashMap<i64, ClickEvent>,
    next_id: AtomicI64,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event with an explicit timestamp.
    ///
    /// Used to seed fixtures; the service path goes through [`EventStore::append`].
    pub fn append_at(&self, new_event: NewClickEvent, occurred_at: DateTime<Utc>) -> ClickEvent {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let event = new_event.into_event(id, occurred_at);
        self.events.insert(id, event.clone());
        event
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    fn collect_where(
        &self,
        window: TimeWindow,
        keep: impl Fn(&ClickEvent) -> bool,
    ) -> Vec<ClickEvent> {
        let mut events: Vec<ClickEvent> = self
            .events
            .iter()
            .filter(|entry| window.contains(entry.value().occurred_at) && keep(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        events.sort_by(|a, b| a.occurred_at.cmp(&b.occurred_at).then(a.id.cmp(&b.id)));
        events
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn append(&self, new_event: NewClickEvent) -> Result<ClickEvent, AppError> {
        Ok(self.append_at(new_event, Utc::now()))
    }

    async fn query_by_alias_set(
        &self,
        codes: &[String],
        window: TimeWindow,
    ) -> Result<Vec<ClickEvent>, AppError> {
        if codes.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.collect_where(window, |event| codes.contains(&event.alias_code)))
    }

    async fn query_all(&self, window: TimeWindow) -> Result<Vec<ClickEvent>, AppError> {
        Ok(self.collect_where(window, |_| true))
    }
}
