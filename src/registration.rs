//! Service registration types.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::error::DiResult;
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::provider::ResolverContext;

// Type-erased Arc for storage
pub(crate) type AnyArc = Arc<dyn Any + Send + Sync>;

pub(crate) type Ctor = Arc<dyn for<'a> Fn(&ResolverContext<'a>) -> DiResult<AnyArc> + Send + Sync>;

/// Service registration with lifetime and constructor
pub(crate) struct Registration {
    pub(crate) lifetime: Lifetime,
    pub(crate) ctor: Ctor,
    /// Singleton cache, lock-free after initialization
    pub(crate) singleton: Option<OnceCell<AnyArc>>,
    /// Constructor registers a disposer with its resolver
    pub(crate) disposable: bool,
}

impl Registration {
    pub(crate) fn new(lifetime: Lifetime, ctor: Ctor) -> Self {
        let singleton = match lifetime {
            Lifetime::Singleton => Some(OnceCell::new()),
            _ => None,
        };
        Self {
            lifetime,
            ctor,
            singleton,
            disposable: false,
        }
    }

    pub(crate) fn with_disposal(mut self) -> Self {
        self.disposable = true;
        self
    }
}

/// Service registry holding all registrations
#[derive(Default)]
pub(crate) struct Registry {
    entries: HashMap<Key, Registration>,
}

impl Registry {
    /// Inserts a registration, replacing any previous one for the key.
    pub(crate) fn insert(&mut self, key: Key, registration: Registration) -> Option<Registration> {
        self.entries.insert(key, registration)
    }

    #[inline]
    pub(crate) fn get(&self, key: &Key) -> Option<&Registration> {
        self.entries.get(key)
    }

    pub(crate) fn contains_key(&self, key: &Key) -> bool {
        self.entries.contains_key(key)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg_attr(not(feature = "diagnostics"), allow(dead_code))]
    pub(crate) fn iter(&self) -> impl Iterator<Item = (&Key, &Registration)> {
        self.entries.iter()
    }
}
