// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 nacre contributors

//! The type system capability.
//!
//! [`TypeSystem`] owns the registry and is the surface handed to RPC
//! marshalling and domain bootstrap code: publication
//! (`register_interface`), qualified-name resolution, enumeration, and the
//! subtype/alias checks. Construction seeds the registry with the
//! meta-interface before any caller can observe it.

use crate::descriptor::InterfaceDescriptor;
use crate::error::{Result, TypeSystemError};
use crate::meta::{self, META_INTERFACE_ID};
use crate::registry::Registry;
use crate::typecode::TypeCode;
use std::sync::Arc;

/// The interface type system.
///
/// One value per registry domain, constructed once at startup and passed
/// by reference to whatever needs it. All reads are side-effect free and
/// may run concurrently; registration takes the registry's exclusive lock.
///
/// # Example
///
/// ```
/// use nacre_typesys::{InterfaceDescriptor, TypeSystem};
///
/// let ts = TypeSystem::new();
/// ts.register_interface(
///     InterfaceDescriptor::builder("io.stream", 0x51)
///         .record("window", 16)
///         .operation("read")
///         .build()
///         .into(),
/// )?;
///
/// let any = ts.get("io.stream.read")?;
/// assert!(ts.is_type(any.code, any.code)?);
/// # Ok::<(), nacre_typesys::TypeSystemError>(())
/// ```
pub struct TypeSystem {
    registry: Registry,
    meta: Arc<InterfaceDescriptor>,
}

impl TypeSystem {
    /// Create a type system seeded with the meta-interface.
    pub fn new() -> Self {
        let ts = Self {
            registry: Registry::new(),
            meta: meta::meta_interface(),
        };
        // The meta-interface goes through the same registration entry
        // point as everything else; the audit is skipped for it.
        ts.register_interface(Arc::clone(&ts.meta))
            .expect("empty registry cannot clash");
        log::debug!(
            "[TYPESYS] bootstrap complete, meta='{}' primitives={}",
            ts.meta.name,
            ts.meta.member_count()
        );
        ts
    }

    /// Start a builder that batches bootstrap registrations.
    pub fn builder() -> TypeSystemBuilder {
        TypeSystemBuilder::default()
    }

    /// The meta-interface descriptor.
    pub fn meta(&self) -> &Arc<InterfaceDescriptor> {
        &self.meta
    }

    pub(crate) fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Publish an interface descriptor.
    ///
    /// Fails with [`TypeSystemError::NameClash`] or
    /// [`TypeSystemError::TypeCodeClash`] if the name or interface id is
    /// already taken, leaving the registry unchanged. Every member is
    /// audited against its declared position first (the meta-interface
    /// arrives pre-checked and skips the audit).
    pub fn register_interface(&self, desc: Arc<InterfaceDescriptor>) -> Result<()> {
        if desc.code.interface_id() != META_INTERFACE_ID {
            self.audit_members(&desc)?;
        }
        self.registry.register(desc)
    }

    /// Check that a descriptor's members carry the owner's interface id
    /// and their declaration-order subtype index.
    ///
    /// This is the registration-time binding step: each member's kind is
    /// fixed by its descriptor, so binding reduces to verifying the codes
    /// the offline compiler emitted line up with the member sequence.
    fn audit_members(&self, desc: &InterfaceDescriptor) -> Result<()> {
        if !desc.code.is_interface() {
            return Err(TypeSystemError::BadCode(desc.code));
        }
        for (index, member) in desc.members.iter().enumerate() {
            let expected = TypeCode::pack(desc.code.interface_id(), index as u16 + 1);
            if member.code != expected {
                log::warn!(
                    "[TYPESYS] audit failed name='{}' member='{}' code={} expected={}",
                    desc.name,
                    member.name,
                    member.code,
                    expected
                );
                return Err(TypeSystemError::BadCode(member.code));
            }
            log::debug!(
                "[TYPESYS] bind {}.{} as {}",
                desc.name,
                member.name,
                member.kind.label()
            );
        }
        Ok(())
    }
}

impl Default for TypeSystem {
    fn default() -> Self {
        Self::new()
    }
}

/// Batches descriptor registration behind bootstrap construction.
///
/// Descriptors queue in order; `build` constructs the type system (meta
/// first) and then registers the queue, failing fast on the first clash.
#[derive(Default)]
pub struct TypeSystemBuilder {
    pending: Vec<Arc<InterfaceDescriptor>>,
}

impl TypeSystemBuilder {
    /// Queue a descriptor for registration.
    pub fn register(mut self, desc: Arc<InterfaceDescriptor>) -> Self {
        self.pending.push(desc);
        self
    }

    /// Bootstrap the type system and register every queued descriptor.
    pub fn build(self) -> Result<TypeSystem> {
        let ts = TypeSystem::new();
        for desc in self.pending {
            ts.register_interface(desc)?;
        }
        Ok(ts)
    }
}
