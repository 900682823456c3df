//! Write-side handlers.

mod component;
mod dashboard;

use serde::{Deserialize, Deserializer};

pub use component::{
    add_component, change_component_status, move_component, remove_component, update_component,
    AddComponent, ChangeComponentStatus, MoveComponent, RemoveComponent, UpdateComponent,
};
pub use dashboard::{
    create_dashboard, delete_dashboard, update_dashboard, CreateDashboard, DeleteDashboard,
    UpdateDashboard,
};

/// Read an absent or `null` body field as its default, so the field's own
/// validation rule reports it instead of the deserializer.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
