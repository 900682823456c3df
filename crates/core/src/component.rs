//! The `DashboardComponent` entity and its type/status enums.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::events::{DomainEvent, DomainEventKind};
use crate::types::{now, DbId, Timestamp};
use crate::validation::{validate_description, validate_name};

/// Declares a closed string enum: each variant is persisted and serialized
/// as its own name (`"DataGrid"`), and parsing rejects anything else.
macro_rules! define_string_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($label:literal) {
            $( $(#[$vmeta:meta])* $variant:ident ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[ $( $name::$variant ),+ ];

            /// The persisted/serialized name of the variant.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => stringify!($variant) ),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( stringify!($variant) => Ok($name::$variant), )+
                    other => Err(CoreError::Validation(format!(
                        concat!("Invalid ", $label, ": {}"),
                        other
                    ))),
                }
            }
        }
    };
}

define_string_enum! {
    /// Kind of widget. Fixed when the component is created.
    ComponentType ("component type") {
        Chart,
        DataGrid,
        Metric,
        Custom,
    }
}

define_string_enum! {
    /// Runtime status of a component.
    ComponentStatus ("component status") {
        Active,
        Inactive,
        Error,
        Loading,
    }
}

/// A typed widget belonging to exactly one dashboard.
#[derive(Debug, Clone)]
pub struct DashboardComponent {
    id: DbId,
    dashboard_id: DbId,
    name: String,
    description: String,
    component_type: ComponentType,
    status: ComponentStatus,
    created_at: Timestamp,
}

crate::impl_entity_identity!(DashboardComponent, "Component");

impl DashboardComponent {
    /// Create a new component in the `Active` status.
    pub fn new(
        id: DbId,
        name: impl Into<String>,
        description: impl Into<String>,
        component_type: ComponentType,
        dashboard_id: DbId,
    ) -> Result<Self, CoreError> {
        let name = name.into();
        let description = description.into();

        if id.is_nil() {
            return Err(CoreError::Validation("Component ID cannot be empty.".into()));
        }
        if dashboard_id.is_nil() {
            return Err(CoreError::Validation("Dashboard ID cannot be empty.".into()));
        }
        validate_name("Component", &name)?;
        validate_description("Component", &description)?;

        Ok(Self {
            id,
            dashboard_id,
            name,
            description,
            component_type,
            status: ComponentStatus::Active,
            created_at: now(),
        })
    }

    /// Rebuild a component from persisted state without re-running checks.
    pub fn from_parts(
        id: DbId,
        dashboard_id: DbId,
        name: String,
        description: String,
        component_type: ComponentType,
        status: ComponentStatus,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            dashboard_id,
            name,
            description,
            component_type,
            status,
            created_at,
        }
    }

    pub fn dashboard_id(&self) -> DbId {
        self.dashboard_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn component_type(&self) -> ComponentType {
        self.component_type
    }

    pub fn status(&self) -> ComponentStatus {
        self.status
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn update_name(&mut self, new_name: impl Into<String>) -> Result<(), CoreError> {
        let new_name = new_name.into();
        validate_name("Component", &new_name)?;
        self.name = new_name;
        Ok(())
    }

    pub fn update_description(
        &mut self,
        new_description: impl Into<String>,
    ) -> Result<(), CoreError> {
        let new_description = new_description.into();
        validate_description("Component", &new_description)?;
        self.description = new_description;
        Ok(())
    }

    /// Move to `new_status`.
    ///
    /// Returns `None` (and changes nothing) when the component is already in
    /// that status, otherwise the `ComponentStatusChanged` event.
    pub fn change_status(
        &mut self,
        new_status: ComponentStatus,
        reason: Option<&str>,
    ) -> Option<DomainEvent> {
        if new_status == self.status {
            return None;
        }

        let old_status = self.status;
        self.status = new_status;

        Some(DomainEvent::new(DomainEventKind::ComponentStatusChanged {
            component_id: self.id,
            old_status,
            new_status,
            reason: reason.map(str::to_owned),
        }))
    }

    pub fn activate(&mut self) -> Option<DomainEvent> {
        self.change_status(ComponentStatus::Active, Some("Component activated"))
    }

    pub fn deactivate(&mut self) -> Option<DomainEvent> {
        self.change_status(ComponentStatus::Inactive, Some("Component deactivated"))
    }

    pub fn mark_as_error(&mut self, reason: &str) -> Option<DomainEvent> {
        self.change_status(ComponentStatus::Error, Some(reason))
    }

    /// Reassign the component to another dashboard.
    pub fn move_to_dashboard(&mut self, dashboard_id: DbId) -> Result<(), CoreError> {
        if dashboard_id.is_nil() {
            return Err(CoreError::Validation("Dashboard ID cannot be empty.".into()));
        }
        self.dashboard_id = dashboard_id;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::entity::Entity;
    use crate::types::new_id;

    fn chart(dashboard_id: DbId) -> DashboardComponent {
        DashboardComponent::new(
            new_id(),
            "Revenue Chart",
            "Monthly revenue",
            ComponentType::Chart,
            dashboard_id,
        )
        .unwrap()
    }

    #[test]
    fn new_component_keeps_inputs_and_starts_active() {
        let dashboard_id = new_id();
        let id = new_id();
        let c = DashboardComponent::new(id, "Orders", "", ComponentType::DataGrid, dashboard_id)
            .unwrap();

        assert_eq!(c.id(), id);
        assert_eq!(c.name(), "Orders");
        assert_eq!(c.description(), "");
        assert_eq!(c.component_type(), ComponentType::DataGrid);
        assert_eq!(c.status(), ComponentStatus::Active);
        assert_eq!(c.dashboard_id(), dashboard_id);
    }

    #[test]
    fn construction_rejects_bad_input() {
        let d = new_id();
        assert_matches!(
            DashboardComponent::new(new_id(), "ab", "", ComponentType::Chart, d),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            DashboardComponent::new(new_id(), "Valid", "x".repeat(1001), ComponentType::Chart, d),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            DashboardComponent::new(new_id(), "Valid", "", ComponentType::Chart, DbId::nil()),
            Err(CoreError::Validation(msg)) if msg == "Dashboard ID cannot be empty."
        );
        assert_matches!(
            DashboardComponent::new(DbId::nil(), "Valid", "", ComponentType::Chart, d),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn failed_update_leaves_state_unchanged() {
        let mut c = chart(new_id());
        assert!(c.update_name("x").is_err());
        assert!(c.update_description("y".repeat(1001)).is_err());
        assert_eq!(c.name(), "Revenue Chart");
        assert_eq!(c.description(), "Monthly revenue");
    }

    #[test]
    fn update_with_same_value_is_harmless() {
        let mut c = chart(new_id());
        c.update_name("Revenue Chart").unwrap();
        c.update_description("Monthly revenue").unwrap();
        assert_eq!(c.name(), "Revenue Chart");
        assert_eq!(c.description(), "Monthly revenue");
    }

    #[test]
    fn change_status_is_idempotent() {
        let mut c = chart(new_id());

        let first = c.change_status(ComponentStatus::Loading, Some("refresh"));
        assert_matches!(
            first.map(|e| e.kind),
            Some(DomainEventKind::ComponentStatusChanged {
                old_status: ComponentStatus::Active,
                new_status: ComponentStatus::Loading,
                ..
            })
        );

        let second = c.change_status(ComponentStatus::Loading, Some("refresh"));
        assert!(second.is_none());
        assert_eq!(c.status(), ComponentStatus::Loading);
    }

    #[test]
    fn convenience_transitions() {
        let mut c = chart(new_id());
        assert!(c.activate().is_none(), "already active");

        let event = c.deactivate().unwrap();
        assert_eq!(c.status(), ComponentStatus::Inactive);
        assert_matches!(
            event.kind,
            DomainEventKind::ComponentStatusChanged { reason: Some(r), .. } if r == "Component deactivated"
        );

        c.mark_as_error("query failed").unwrap();
        assert_eq!(c.status(), ComponentStatus::Error);

        assert!(c.activate().is_some());
        assert_eq!(c.status(), ComponentStatus::Active);
    }

    #[test]
    fn move_to_dashboard_rejects_nil() {
        let mut c = chart(new_id());
        let target = new_id();
        c.move_to_dashboard(target).unwrap();
        assert_eq!(c.dashboard_id(), target);
        assert!(c.move_to_dashboard(DbId::nil()).is_err());
        assert_eq!(c.dashboard_id(), target);
    }

    #[test]
    fn enums_round_trip_through_strings() {
        for t in ComponentType::ALL {
            assert_eq!(t.as_str().parse::<ComponentType>().unwrap(), *t);
        }
        for s in ComponentStatus::ALL {
            assert_eq!(s.to_string().parse::<ComponentStatus>().unwrap(), *s);
        }
        assert_eq!(
            "Pie".parse::<ComponentType>().unwrap_err(),
            CoreError::Validation("Invalid component type: Pie".into())
        );
        assert!("active".parse::<ComponentStatus>().is_err());
    }
}
