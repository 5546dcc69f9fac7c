// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 nacre contributors

//! Qualified-name resolution and naming-context views.
//!
//! Names are dot-separated, `Interface.Member`. Resolution splits on the
//! first dot, finds the interface through the registry's name index, then
//! searches its declared members. The meta-interface is the one naming
//! context that recurses: a right part that is not one of its own members
//! is re-entered as a fresh top-level name, which is what makes
//! `meta_interface.some.iface.Member` paths work.
//!
//! Every context view over the registry is read-only: `add` and `remove`
//! are permanently denied, `destroy` succeeds as a no-op.

use crate::descriptor::InterfaceDescriptor;
use crate::error::{Result, TypeSystemError};
use crate::system::TypeSystem;
use crate::value::Any;
use std::sync::Arc;

/// The naming capability: resolve and enumerate child names under a
/// context, with nominally mutable entry points.
///
/// The registry's implementations never mutate; contexts backed by other
/// services may.
pub trait NamingContext {
    /// All names reachable from this context, children after parents.
    fn list(&self) -> Vec<String>;

    /// Resolve one (possibly dotted) name to its tagged value.
    fn get(&self, name: &str) -> Result<Any>;

    /// Bind a name. Denied on registry-backed contexts.
    fn add(&self, name: &str, value: Any) -> Result<()>;

    /// Unbind a name. Denied on registry-backed contexts.
    fn remove(&self, name: &str) -> Result<()>;

    /// Release the context view. A no-op for registry-backed contexts;
    /// clearing the registry is not a capability of the view.
    fn destroy(&self) -> Result<()>;
}

impl TypeSystem {
    /// Resolve a dotted qualified name against the registry.
    ///
    /// `Interface` yields the interface's capability reference;
    /// `Interface.Member` yields the member's tagged value. Under the
    /// meta-interface the right part falls back to a fresh top-level
    /// resolution, so paths may tunnel through it. A multi-segment right
    /// part under any other interface fails with
    /// [`TypeSystemError::NotContext`]: no other registry-backed interface
    /// can act as a naming context.
    pub fn resolve(&self, qualified: &str) -> Result<Any> {
        let (left, rest) = match qualified.split_once('.') {
            Some((left, rest)) => (left, Some(rest)),
            None => (qualified, None),
        };

        let iface = self
            .registry()
            .lookup_by_name(left)
            .ok_or_else(|| TypeSystemError::NotFound(qualified.to_string()))?;

        let Some(rest) = rest else {
            return Ok(InterfaceDescriptor::reference(&iface));
        };

        if let Some(member) = iface.member_named(rest) {
            return Ok(member.any());
        }

        if Arc::ptr_eq(&iface, self.meta()) {
            // The right part did not name a built-in type; treat it as a
            // fresh top-level qualified name.
            return self.resolve(rest);
        }

        if rest.contains('.') {
            Err(TypeSystemError::NotContext(left.to_string()))
        } else {
            Err(TypeSystemError::NotFound(qualified.to_string()))
        }
    }

    /// Alias for [`resolve`](Self::resolve), matching the capability
    /// surface consumed by marshalling code.
    pub fn get(&self, qualified: &str) -> Result<Any> {
        self.resolve(qualified)
    }

    /// Enumerate every registered interface and its members as qualified
    /// names, each interface immediately followed by its own members in
    /// declaration order.
    ///
    /// Enumeration order is the registry's own. The meta-interface entry
    /// is not part of the general enumeration; the
    /// [`meta_context`](Self::meta_context) view is the one that shows it
    /// along with the built-in types.
    pub fn list(&self) -> Vec<String> {
        let mut names = Vec::new();
        for iface in self.registry().snapshot() {
            if Arc::ptr_eq(&iface, self.meta()) {
                continue;
            }
            push_interface_names(&iface, &mut names);
        }
        names
    }

    /// The meta-interface's naming-context view.
    pub fn meta_context(&self) -> MetaContext<'_> {
        MetaContext { system: self }
    }

    /// Read-only naming-context view of one registered interface.
    ///
    /// Fails with [`TypeSystemError::NotFound`] if the name is not
    /// registered.
    pub fn interface_context(&self, name: &str) -> Result<InterfaceContext> {
        let iface = self
            .registry()
            .lookup_by_name(name)
            .ok_or_else(|| TypeSystemError::NotFound(name.to_string()))?;
        Ok(InterfaceContext { iface })
    }
}

fn push_interface_names(iface: &InterfaceDescriptor, names: &mut Vec<String>) {
    names.push(iface.name.clone());
    for member in &iface.members {
        names.push(format!("{}.{}", iface.name, member.name));
    }
}

impl NamingContext for TypeSystem {
    fn list(&self) -> Vec<String> {
        TypeSystem::list(self)
    }

    fn get(&self, name: &str) -> Result<Any> {
        self.resolve(name)
    }

    fn add(&self, _name: &str, _value: Any) -> Result<()> {
        Err(TypeSystemError::Denied)
    }

    fn remove(&self, _name: &str) -> Result<()> {
        Err(TypeSystemError::Denied)
    }

    fn destroy(&self) -> Result<()> {
        Ok(())
    }
}

/// The meta-interface as a naming context.
///
/// Differs from the general view in that the built-in types come first:
/// `get` checks them before consulting the registry, `list` emits them
/// before the interface enumeration (which here includes the
/// meta-interface itself).
pub struct MetaContext<'a> {
    system: &'a TypeSystem,
}

impl NamingContext for MetaContext<'_> {
    fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .system
            .meta()
            .members
            .iter()
            .map(|m| m.name.clone())
            .collect();
        for iface in self.system.registry().snapshot() {
            push_interface_names(&iface, &mut names);
        }
        names
    }

    fn get(&self, name: &str) -> Result<Any> {
        if let Some(member) = self.system.meta().member_named(name) {
            return Ok(member.any());
        }
        self.system.resolve(name)
    }

    fn add(&self, _name: &str, _value: Any) -> Result<()> {
        Err(TypeSystemError::Denied)
    }

    fn remove(&self, _name: &str) -> Result<()> {
        Err(TypeSystemError::Denied)
    }

    fn destroy(&self) -> Result<()> {
        Ok(())
    }
}

/// One interface's members as a read-only naming context.
pub struct InterfaceContext {
    iface: Arc<InterfaceDescriptor>,
}

impl InterfaceContext {
    /// The interface backing this view.
    pub fn interface(&self) -> &Arc<InterfaceDescriptor> {
        &self.iface
    }
}

impl NamingContext for InterfaceContext {
    fn list(&self) -> Vec<String> {
        self.iface.members.iter().map(|m| m.name.clone()).collect()
    }

    fn get(&self, name: &str) -> Result<Any> {
        if name.contains('.') {
            // Members are not contexts; there is nothing to recurse into.
            return Err(TypeSystemError::NotContext(self.iface.name.clone()));
        }
        self.iface
            .member_named(name)
            .map(|m| m.any())
            .ok_or_else(|| TypeSystemError::NotFound(name.to_string()))
    }

    fn add(&self, _name: &str, _value: Any) -> Result<()> {
        Err(TypeSystemError::Denied)
    }

    fn remove(&self, _name: &str) -> Result<()> {
        Err(TypeSystemError::Denied)
    }

    fn destroy(&self) -> Result<()> {
        Ok(())
    }
}
