//! The `Dashboard` entity: a named container owning an ordered set of
//! components.

use crate::component::DashboardComponent;
use crate::entity::Entity;
use crate::error::CoreError;
use crate::events::{DomainEvent, DomainEventKind};
use crate::types::{now, DbId, Timestamp};
use crate::validation::{validate_description, validate_name};

#[derive(Debug, Clone)]
pub struct Dashboard {
    id: DbId,
    name: String,
    description: String,
    created_at: Timestamp,
    /// Owned components, oldest first.
    components: Vec<DashboardComponent>,
}

crate::impl_entity_identity!(Dashboard, "Dashboard");

impl Dashboard {
    pub fn new(
        id: DbId,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, CoreError> {
        let name = name.into();
        let description = description.into();

        if id.is_nil() {
            return Err(CoreError::Validation("Dashboard ID cannot be empty.".into()));
        }
        validate_name("Dashboard", &name)?;
        validate_description("Dashboard", &description)?;

        Ok(Self {
            id,
            name,
            description,
            created_at: now(),
            components: Vec::new(),
        })
    }

    /// Rebuild a dashboard from persisted state without re-running checks.
    ///
    /// Components are re-sorted by creation time.
    pub fn from_parts(
        id: DbId,
        name: String,
        description: String,
        created_at: Timestamp,
        mut components: Vec<DashboardComponent>,
    ) -> Self {
        components.sort_by_key(|c| (c.created_at(), c.id()));
        Self {
            id,
            name,
            description,
            created_at,
            components,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn components(&self) -> &[DashboardComponent] {
        &self.components
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    pub fn update_name(&mut self, new_name: impl Into<String>) -> Result<(), CoreError> {
        let new_name = new_name.into();
        validate_name("Dashboard", &new_name)?;
        self.name = new_name;
        Ok(())
    }

    pub fn update_description(
        &mut self,
        new_description: impl Into<String>,
    ) -> Result<(), CoreError> {
        let new_description = new_description.into();
        validate_description("Dashboard", &new_description)?;
        self.description = new_description;
        Ok(())
    }

    /// Attach a component that already points at this dashboard.
    pub fn add_component(
        &mut self,
        component: DashboardComponent,
    ) -> Result<DomainEvent, CoreError> {
        if component.dashboard_id() != self.id {
            return Err(CoreError::Validation(format!(
                "Component {} belongs to dashboard {}, not {}.",
                component.id(),
                component.dashboard_id(),
                self.id
            )));
        }
        if self.components.iter().any(|c| c.id() == component.id()) {
            return Err(CoreError::Validation(format!(
                "Component {} is already on dashboard {}.",
                component.id(),
                self.id
            )));
        }

        let event = DomainEvent::new(DomainEventKind::ComponentAdded {
            dashboard_id: self.id,
            component_id: component.id(),
            component_name: component.name().to_owned(),
            component_type: component.component_type(),
        });
        self.components.push(component);
        Ok(event)
    }

    /// Detach a component. Returns `None` if it is not on this dashboard.
    pub fn remove_component(&mut self, component_id: DbId) -> Option<DomainEvent> {
        let index = self.components.iter().position(|c| c.id() == component_id)?;
        let removed = self.components.remove(index);

        Some(DomainEvent::new(DomainEventKind::ComponentRemoved {
            dashboard_id: self.id,
            component_id,
            component_name: removed.name().to_owned(),
        }))
    }
}
