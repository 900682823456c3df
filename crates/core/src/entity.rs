//! Entity identity.
//!
//! Entities are compared by identity, never by state: two values of the same
//! entity type are equal when their ids are equal. Values of different
//! entity types never compare (they are different Rust types), which gives
//! the "(concrete type, id)" equality rule for free.

use crate::types::DbId;

/// A domain object with a stable identity.
pub trait Entity {
    /// Display name of the entity kind, used in messages (`"Dashboard"`).
    const KIND: &'static str;

    /// The entity identifier. Immutable after construction.
    fn id(&self) -> DbId;
}

/// Implement [`Entity`] together with identity-based `PartialEq`, `Eq` and
/// `Hash` for a struct holding an `id: DbId` field.
///
/// ```
/// use dashlens_core::entity::Entity;
/// use dashlens_core::types::{new_id, DbId};
///
/// #[derive(Debug)]
/// struct Widget {
///     id: DbId,
///     label: String,
/// }
///
/// dashlens_core::impl_entity_identity!(Widget, "Widget");
///
/// let id = new_id();
/// let a = Widget { id, label: "a".into() };
/// let b = Widget { id, label: "b".into() };
/// assert_eq!(a, b);
/// assert_eq!(Widget::KIND, "Widget");
/// ```
#[macro_export]
macro_rules! impl_entity_identity {
    ($ty:ty, $kind:literal) => {
        impl $crate::entity::Entity for $ty {
            const KIND: &'static str = $kind;

            fn id(&self) -> $crate::types::DbId {
                self.id
            }
        }

        impl PartialEq for $ty {
            fn eq(&self, other: &Self) -> bool {
                self.id == other.id
            }
        }

        impl Eq for $ty {}

        impl std::hash::Hash for $ty {
            fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
                <Self as $crate::entity::Entity>::KIND.hash(state);
                self.id.hash(state);
            }
        }
    };
}
