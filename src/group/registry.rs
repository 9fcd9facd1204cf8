//! Group Registry
//!
//! Name -> group lookup shared by the peer server and the application.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use crate::error::{CacheError, Result};
use crate::group::{Group, Loader};
use crate::peers::PeerPicker;

// == Group Registry ==
/// Holds every group of this process for its whole lifetime.
///
/// Groups are registered once, usually at startup, and never removed.
#[derive(Debug, Default)]
pub struct GroupRegistry {
    groups: RwLock<HashMap<String, Arc<Group>>>,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // == Create Group ==
    /// Creates and registers a group.
    ///
    /// Returns [`CacheError::GroupExists`] if the name is already taken.
    pub fn create_group<L>(
        &self,
        name: impl Into<String>,
        max_bytes: usize,
        loader: L,
    ) -> Result<Arc<Group>>
    where
        L: Loader + 'static,
    {
        let name = name.into();
        let mut groups = self.groups.write();
        if groups.contains_key(&name) {
            return Err(CacheError::GroupExists(name));
        }

        let group = Arc::new(Group::new(name.clone(), max_bytes, Arc::new(loader)));
        groups.insert(name.clone(), group.clone());
        info!(group = %name, max_bytes, "group created");
        Ok(group)
    }

    // == Get Group ==
    /// Looks up a group by name.
    pub fn get_group(&self, name: &str) -> Option<Arc<Group>> {
        self.groups.read().get(name).cloned()
    }

    /// Returns the registered group names in sorted order.
    pub fn group_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.groups.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Returns all registered groups, sorted by name.
    pub fn groups(&self) -> Vec<Arc<Group>> {
        let mut groups: Vec<Arc<Group>> = self.groups.read().values().cloned().collect();
        groups.sort_by(|a, b| a.name().cmp(b.name()));
        groups
    }

    // == Register Peers ==
    /// Registers the same peer picker with every group currently present.
    pub fn register_peers(&self, peers: Arc<dyn PeerPicker>) -> Result<()> {
        for group in self.groups() {
            group.register_peers(peers.clone())?;
        }
        Ok(())
    }
}
