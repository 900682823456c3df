//! Domain events raised by entity methods.
//!
//! Entities never queue events internally. A method that raises an event
//! returns it, and the caller decides what to do with it. Nothing in the
//! workspace dispatches events yet; handlers log them.

use serde::Serialize;
use uuid::Uuid;

use crate::component::{ComponentStatus, ComponentType};
use crate::types::{DbId, Timestamp};

/// Envelope common to every domain event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainEvent {
    pub event_id: Uuid,
    pub occurred_at: Timestamp,
    /// Optional identifier tying related events together.
    pub correlation_id: Option<String>,
    #[serde(flatten)]
    pub kind: DomainEventKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DomainEventKind {
    ComponentAdded {
        dashboard_id: DbId,
        component_id: DbId,
        component_name: String,
        component_type: ComponentType,
    },
    ComponentRemoved {
        dashboard_id: DbId,
        component_id: DbId,
        component_name: String,
    },
    ComponentStatusChanged {
        component_id: DbId,
        old_status: ComponentStatus,
        new_status: ComponentStatus,
        reason: Option<String>,
    },
}

impl DomainEvent {
    pub fn new(kind: DomainEventKind) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: chrono::Utc::now(),
            correlation_id: None,
            kind,
        }
    }

    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    /// Stable event name, used as a log field.
    pub fn name(&self) -> &'static str {
        match self.kind {
            DomainEventKind::ComponentAdded { .. } => "component_added",
            DomainEventKind::ComponentRemoved { .. } => "component_removed",
            DomainEventKind::ComponentStatusChanged { .. } => "component_status_changed",
        }
    }
}
