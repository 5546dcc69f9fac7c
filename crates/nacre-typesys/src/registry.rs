// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 nacre contributors

//! Dual-indexed descriptor store.
//!
//! The registry keeps every published interface reachable two ways: by
//! qualified name and by interface id. Both indices live under a single
//! lock so a descriptor can never be observed through one index and not
//! the other. Registration happens during bootstrap and module load;
//! lookups run on RPC paths and only ever take the shared lock.

use crate::descriptor::InterfaceDescriptor;
use crate::error::{Result, TypeSystemError};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

#[derive(Default)]
struct Indices {
    by_name: BTreeMap<String, Arc<InterfaceDescriptor>>,
    by_code: HashMap<u64, Arc<InterfaceDescriptor>>,
    member_total: usize,
}

/// Store of registered interface descriptors.
///
/// Descriptors are shared, never copied; the registry drops its references
/// on drop and frees nothing else.
#[derive(Default)]
pub struct Registry {
    indices: RwLock<Indices>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a descriptor into both indices.
    ///
    /// Rejects a second registration under an already-used name or
    /// interface id without touching either index.
    pub fn register(&self, desc: Arc<InterfaceDescriptor>) -> Result<()> {
        let mut indices = self.indices.write();

        if indices.by_name.contains_key(&desc.name) {
            log::debug!(
                "[TYPESYS] register rejected (name clash) name='{}'",
                desc.name
            );
            return Err(TypeSystemError::NameClash(desc.name.clone()));
        }
        if indices.by_code.contains_key(&desc.code.interface_id()) {
            log::debug!(
                "[TYPESYS] register rejected (id clash) name='{}' code={}",
                desc.name,
                desc.code
            );
            return Err(TypeSystemError::TypeCodeClash(desc.code));
        }

        log::debug!(
            "[TYPESYS] register name='{}' code={} members={}",
            desc.name,
            desc.code,
            desc.member_count()
        );

        indices.member_total += desc.member_count();
        indices
            .by_code
            .insert(desc.code.interface_id(), Arc::clone(&desc));
        indices.by_name.insert(desc.name.clone(), desc);
        Ok(())
    }

    /// Interface registered under the given qualified name.
    pub fn lookup_by_name(&self, name: &str) -> Option<Arc<InterfaceDescriptor>> {
        self.indices.read().by_name.get(name).cloned()
    }

    /// Interface registered under the given interface id.
    pub fn lookup_by_code(&self, interface_id: u64) -> Option<Arc<InterfaceDescriptor>> {
        self.indices.read().by_code.get(&interface_id).cloned()
    }

    /// Number of registered interfaces.
    pub fn interface_count(&self) -> usize {
        self.indices.read().by_name.len()
    }

    /// Total member count across every registered interface.
    ///
    /// Upper bound for alias-chain traversal: a well-formed chain cannot
    /// visit more members than exist.
    pub fn member_total(&self) -> usize {
        self.indices.read().member_total
    }

    /// All registered interfaces, in name order.
    ///
    /// The returned sequence is a point-in-time snapshot owned by the
    /// caller; enumeration does not hold the registry lock.
    pub fn snapshot(&self) -> Vec<Arc<InterfaceDescriptor>> {
        self.indices.read().by_name.values().cloned().collect()
    }
}
