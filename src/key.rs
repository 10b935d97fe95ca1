//! Service key types for the reference container.

use std::any::TypeId;
use std::hash::{Hash, Hasher};

/// Key for service storage and lookup.
///
/// Identifies a registration by the concrete type it produces. The type name
/// rides along for error messages and cycle paths; equality and hashing only
/// look at the `TypeId`.
///
/// # Examples
///
/// ```rust
/// use ferrous_scope::Key;
///
/// let key = Key::of::<String>();
/// assert_eq!(key.display_name(), "alloc::string::String");
/// assert_eq!(key, Key::of::<String>());
/// assert_ne!(key, Key::of::<u32>());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Key {
    id: TypeId,
    name: &'static str,
}

impl Key {
    /// Key for the concrete type `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Get the type name for display
    pub fn display_name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Key {}

impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Convenience function for [`Key::of`].
pub fn key_of_type<T: ?Sized + 'static>() -> Key {
    Key::of::<T>()
}
