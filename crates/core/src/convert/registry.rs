// Converter registry with hierarchical name resolution
use super::ValueConverter;
use super::naming::derived_name;
use crate::error::{ConveyError, Result};
use indexmap::IndexMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

/// Registry mapping converter names to published converter instances.
///
/// Lookup is hierarchical: a local (per-view) registry is consulted before
/// its parent, so local registrations shadow global ones. Registration is
/// serialized behind a write lock; resolution takes a read lock and clones
/// the published `Arc`, so entries are immutable once visible and replacement
/// is never partially observable.
#[derive(Debug)]
pub struct ConverterRegistry {
    converters: RwLock<IndexMap<String, Arc<dyn ValueConverter>>>,
    parent: Option<Arc<ConverterRegistry>>,
}

impl ConverterRegistry {
    /// Create a new empty root registry
    pub fn new() -> Self {
        Self {
            converters: RwLock::new(IndexMap::new()),
            parent: None,
        }
    }

    /// Create a local registry scoped under this one
    pub fn child(self: &Arc<Self>) -> ConverterRegistry {
        ConverterRegistry {
            converters: RwLock::new(IndexMap::new()),
            parent: Some(Arc::clone(self)),
        }
    }

    /// Register a converter under `name`.
    ///
    /// Fails with `DuplicateName` if the name is already bound in this
    /// registry. Shadowing a parent registration is allowed.
    pub fn register(
        &self,
        name: impl Into<String>,
        converter: Arc<dyn ValueConverter>,
    ) -> Result<()> {
        let name = name.into();
        let mut converters = self.write_lock();
        if converters.contains_key(&name) {
            return Err(ConveyError::duplicate_name(name));
        }
        debug!("Registering converter '{}'", name);
        converters.insert(name, converter);
        Ok(())
    }

    /// Register a converter under `name`, replacing any existing
    /// registration atomically
    pub fn register_replacing(&self, name: impl Into<String>, converter: Arc<dyn ValueConverter>) {
        let name = name.into();
        debug!("Registering converter '{}' (replace)", name);
        self.write_lock().insert(name, converter);
    }

    /// Register a converter under the name derived from its type identifier.
    ///
    /// Returns the derived name on success.
    pub fn register_by_convention<C>(&self, converter: C) -> Result<String>
    where
        C: ValueConverter + 'static,
    {
        let name = derived_name(std::any::type_name::<C>());
        self.register(name.clone(), Arc::new(converter))?;
        Ok(name)
    }

    /// Resolve a converter by name, consulting this registry before its
    /// parent chain
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn ValueConverter>> {
        if let Some(converter) = self.read_lock().get(name) {
            return Ok(Arc::clone(converter));
        }
        match &self.parent {
            Some(parent) => parent.resolve(name),
            None => Err(ConveyError::unknown_converter(name)),
        }
    }

    /// Check if a name resolves in this registry or its parent chain
    pub fn contains(&self, name: &str) -> bool {
        if self.read_lock().contains_key(name) {
            return true;
        }
        self.parent.as_ref().is_some_and(|p| p.contains(name))
    }

    /// List names registered in this registry, in registration order
    pub fn names(&self) -> Vec<String> {
        self.read_lock().keys().cloned().collect()
    }

    /// Get the number of converters registered in this registry
    pub fn len(&self) -> usize {
        self.read_lock().len()
    }

    /// Check if this registry has no local registrations
    pub fn is_empty(&self) -> bool {
        self.read_lock().is_empty()
    }

    // Entries are immutable Arcs, so a poisoned lock still holds consistent
    // data; recover the guard instead of panicking.
    fn read_lock(&self) -> RwLockReadGuard<'_, IndexMap<String, Arc<dyn ValueConverter>>> {
        self.converters.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_lock(&self) -> RwLockWriteGuard<'_, IndexMap<String, Arc<dyn ValueConverter>>> {
        self.converters.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::new()
    }
}
