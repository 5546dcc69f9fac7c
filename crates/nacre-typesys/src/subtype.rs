// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 nacre contributors

//! Subtype and alias checks.
//!
//! These are the soundness gates RPC marshalling leans on: `is_type`
//! decides compatibility along the single-supertype chain, `narrow` is the
//! only way an opaque payload becomes a typed one, and `unalias` follows
//! alias members to the underlying concrete type.
//!
//! Supertype and alias chains come from caller-supplied descriptors and
//! are not provably acyclic, so every walk carries an explicit hop bound
//! sized from the registry. A well-formed system never reaches the bound;
//! a malformed one degrades to a negative answer instead of spinning.

use crate::descriptor::{InterfaceDescriptor, MemberKind};
use crate::error::{Result, TypeSystemError};
use crate::system::TypeSystem;
use crate::typecode::TypeCode;
use crate::value::{Any, Value};
use std::sync::Arc;

/// What a typecode resolved to.
enum Resolved {
    /// The interface itself.
    Interface(Arc<InterfaceDescriptor>),
    /// A member, addressed by its subtype index within the interface.
    Member(Arc<InterfaceDescriptor>, u16),
}

impl TypeSystem {
    /// Resolve a code to its owning interface, validating the subtype
    /// index against the member bound.
    fn resolve_code(&self, code: TypeCode) -> Result<Resolved> {
        let iface = self
            .registry()
            .lookup_by_code(code.interface_id())
            .ok_or(TypeSystemError::BadCode(code))?;
        if code.is_interface() {
            return Ok(Resolved::Interface(iface));
        }
        if !code.in_member_bound(iface.member_count()) {
            return Err(TypeSystemError::BadCode(code));
        }
        Ok(Resolved::Member(iface, code.subtype()))
    }

    /// Is `sub` compatible with `super_code`?
    ///
    /// Reflexive for any valid code. Interface-level codes are compatible
    /// with every interface on their supertype chain. Member-level codes
    /// never subtype each other; only exact equality holds for them.
    ///
    /// Fails with [`TypeSystemError::BadCode`] when either code's
    /// interface id is unknown, or when a declared supertype does not
    /// resolve mid-walk.
    pub fn is_type(&self, sub: TypeCode, super_code: TypeCode) -> Result<bool> {
        self.registry()
            .lookup_by_code(super_code.interface_id())
            .ok_or(TypeSystemError::BadCode(super_code))?;

        if sub == super_code {
            return Ok(true);
        }

        let mut iface = self
            .registry()
            .lookup_by_code(sub.interface_id())
            .ok_or(TypeSystemError::BadCode(sub))?;

        if !sub.is_interface() {
            // A concrete member type with a different code: incompatible.
            return Ok(false);
        }

        // Walk the supertype chain. An acyclic chain cannot be longer than
        // the number of registered interfaces.
        let mut hops = self.registry().interface_count();
        loop {
            if iface.code == super_code {
                return Ok(true);
            }
            let Some(parent) = iface.supertype else {
                return Ok(false);
            };
            if hops == 0 {
                log::warn!(
                    "[TYPESYS] supertype chain bound exceeded at {} (cyclic descriptor data?)",
                    iface.code
                );
                return Ok(false);
            }
            hops -= 1;
            iface = self
                .registry()
                .lookup_by_code(parent.interface_id())
                .ok_or(TypeSystemError::BadCode(parent))?;
        }
    }

    /// Type-checked extraction of a payload from a tagged value.
    ///
    /// Succeeds iff `is_type(value.code, target)`; the payload comes back
    /// unchanged. This is the sole gate between an untyped payload and a
    /// consumer assuming a concrete shape.
    pub fn narrow(&self, value: &Any, target: TypeCode) -> Result<Value> {
        if self.is_type(value.code, target)? {
            Ok(value.value.clone())
        } else {
            Err(TypeSystemError::Incompatible {
                actual: value.code,
                target,
            })
        }
    }

    /// Follow alias members to the underlying concrete type.
    ///
    /// Interface-level codes are never aliases and come back unchanged.
    /// A malformed cyclic chain exhausts the hop bound and yields the code
    /// reached so far rather than an error.
    pub fn unalias(&self, code: TypeCode) -> Result<TypeCode> {
        let mut code = code;
        // An acyclic chain cannot visit more members than are registered.
        let mut hops = self.registry().member_total();
        loop {
            if code.is_interface() {
                return Ok(code);
            }
            let iface = self
                .registry()
                .lookup_by_code(code.interface_id())
                .ok_or(TypeSystemError::BadCode(code))?;
            let member = iface
                .member(code.subtype())
                .ok_or(TypeSystemError::BadCode(code))?;
            match member.kind {
                MemberKind::Alias { target } => {
                    if hops == 0 {
                        log::warn!(
                            "[TYPESYS] alias chain bound exceeded at {} (cyclic descriptor data?)",
                            code
                        );
                        return Ok(code);
                    }
                    hops -= 1;
                    code = target;
                }
                _ => return Ok(code),
            }
        }
    }

    /// Tagged value describing whatever the code denotes.
    pub fn info(&self, code: TypeCode) -> Result<Any> {
        match self.resolve_code(code)? {
            Resolved::Interface(iface) => Ok(InterfaceDescriptor::reference(&iface)),
            Resolved::Member(iface, subtype) => Ok(iface
                .member(subtype)
                .ok_or(TypeSystemError::BadCode(code))?
                .any()),
        }
    }

    /// Size in bytes of the denoted type.
    pub fn size(&self, code: TypeCode) -> Result<u64> {
        match self.resolve_code(code)? {
            Resolved::Interface(iface) => Ok(iface.size),
            Resolved::Member(iface, subtype) => Ok(iface
                .member(subtype)
                .ok_or(TypeSystemError::BadCode(code))?
                .size),
        }
    }

    /// Name of the denoted type (unqualified for members).
    pub fn name(&self, code: TypeCode) -> Result<String> {
        match self.resolve_code(code)? {
            Resolved::Interface(iface) => Ok(iface.name.clone()),
            Resolved::Member(iface, subtype) => Ok(iface
                .member(subtype)
                .ok_or(TypeSystemError::BadCode(code))?
                .name
                .clone()),
        }
    }

    /// Documentation string of the denoted type.
    pub fn docstring(&self, code: TypeCode) -> Result<String> {
        match self.resolve_code(code)? {
            Resolved::Interface(iface) => Ok(iface.docstring.clone()),
            Resolved::Member(iface, subtype) => Ok(iface
                .member(subtype)
                .ok_or(TypeSystemError::BadCode(code))?
                .docstring
                .clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::InterfaceDescriptor;
    use crate::meta::META_INTERFACE_CODE;

    /// Chain base <- middle <- leaf, plus an unrelated interface.
    fn chained() -> TypeSystem {
        TypeSystem::builder()
            .register(Arc::new(
                InterfaceDescriptor::builder("base", 0x100).build(),
            ))
            .register(Arc::new(
                InterfaceDescriptor::builder("middle", 0x200)
                    .supertype(TypeCode::interface(0x100))
                    .build(),
            ))
            .register(Arc::new(
                InterfaceDescriptor::builder("leaf", 0x300)
                    .supertype(TypeCode::interface(0x200))
                    .build(),
            ))
            .register(Arc::new(
                InterfaceDescriptor::builder("other", 0x400).build(),
            ))
            .build()
            .unwrap()
    }

    #[test]
    fn test_is_type_reflexive() {
        let ts = chained();
        for id in [0x100u64, 0x200, 0x300, 0x400] {
            let code = TypeCode::interface(id);
            assert!(ts.is_type(code, code).unwrap());
        }
        assert!(ts.is_type(META_INTERFACE_CODE, META_INTERFACE_CODE).unwrap());
    }

    #[test]
    fn test_is_type_walks_supertype_chain() {
        let ts = chained();
        let base = TypeCode::interface(0x100);
        let leaf = TypeCode::interface(0x300);
        assert!(ts.is_type(leaf, TypeCode::interface(0x200)).unwrap());
        assert!(ts.is_type(leaf, base).unwrap());
        // Subtyping is directional.
        assert!(!ts.is_type(base, leaf).unwrap());
        assert!(!ts.is_type(TypeCode::interface(0x400), base).unwrap());
    }

    #[test]
    fn test_is_type_member_codes_require_equality() {
        let ts = TypeSystem::builder()
            .register(Arc::new(
                InterfaceDescriptor::builder("pair", 0x10)
                    .record("left", 4)
                    .record("right", 4)
                    .build(),
            ))
            .build()
            .unwrap();
        let left = TypeCode::pack(0x10, 1);
        let right = TypeCode::pack(0x10, 2);
        assert!(ts.is_type(left, left).unwrap());
        assert!(!ts.is_type(left, right).unwrap());
        assert!(!ts.is_type(left, TypeCode::interface(0x10)).unwrap());
    }

    #[test]
    fn test_is_type_unknown_codes_fail() {
        let ts = chained();
        let known = TypeCode::interface(0x100);
        let unknown = TypeCode::interface(0xDEAD);
        assert_eq!(
            ts.is_type(known, unknown),
            Err(TypeSystemError::BadCode(unknown))
        );
        assert_eq!(
            ts.is_type(unknown, known),
            Err(TypeSystemError::BadCode(unknown))
        );
        // The super side is validated even when the codes are equal.
        assert_eq!(
            ts.is_type(unknown, unknown),
            Err(TypeSystemError::BadCode(unknown))
        );
    }

    #[test]
    fn test_is_type_dangling_supertype_is_hard_failure() {
        let ts = TypeSystem::builder()
            .register(Arc::new(
                InterfaceDescriptor::builder("orphan", 0x10)
                    .supertype(TypeCode::interface(0xBEEF))
                    .build(),
            ))
            .register(Arc::new(
                InterfaceDescriptor::builder("target", 0x20).build(),
            ))
            .build()
            .unwrap();
        assert_eq!(
            ts.is_type(TypeCode::interface(0x10), TypeCode::interface(0x20)),
            Err(TypeSystemError::BadCode(TypeCode::interface(0xBEEF)))
        );
    }

    #[test]
    fn test_is_type_tolerates_cyclic_supertypes() {
        // a <- b <- a: malformed, must answer false rather than loop.
        let ts = TypeSystem::builder()
            .register(Arc::new(
                InterfaceDescriptor::builder("a", 0x1)
                    .supertype(TypeCode::interface(0x2))
                    .build(),
            ))
            .register(Arc::new(
                InterfaceDescriptor::builder("b", 0x2)
                    .supertype(TypeCode::interface(0x1))
                    .build(),
            ))
            .register(Arc::new(InterfaceDescriptor::builder("c", 0x3).build()))
            .build()
            .unwrap();
        assert!(!ts
            .is_type(TypeCode::interface(0x1), TypeCode::interface(0x3))
            .unwrap());
    }

    #[test]
    fn test_narrow_success_returns_payload_unchanged() {
        let ts = chained();
        let leaf = ts.registry().lookup_by_name("leaf").unwrap();
        let any = InterfaceDescriptor::reference(&leaf);
        let payload = ts.narrow(&any, TypeCode::interface(0x100)).unwrap();
        assert_eq!(payload, any.value);
    }

    #[test]
    fn test_narrow_incompatible() {
        let ts = chained();
        let base = ts.registry().lookup_by_name("base").unwrap();
        let any = InterfaceDescriptor::reference(&base);
        let err = ts.narrow(&any, TypeCode::interface(0x300)).unwrap_err();
        assert_eq!(
            err,
            TypeSystemError::Incompatible {
                actual: TypeCode::interface(0x100),
                target: TypeCode::interface(0x300),
            }
        );
    }

    fn aliased() -> TypeSystem {
        // alias1 -> alias2 -> concrete, all inside one interface.
        TypeSystem::builder()
            .register(Arc::new(
                InterfaceDescriptor::builder("aliases", 0x10)
                    .record("concrete", 8)
                    .alias("alias2", TypeCode::pack(0x10, 1))
                    .alias("alias1", TypeCode::pack(0x10, 2))
                    .build(),
            ))
            .build()
            .unwrap()
    }

    #[test]
    fn test_unalias_follows_chain() {
        let ts = aliased();
        let concrete = TypeCode::pack(0x10, 1);
        assert_eq!(ts.unalias(TypeCode::pack(0x10, 3)).unwrap(), concrete);
        assert_eq!(ts.unalias(TypeCode::pack(0x10, 2)).unwrap(), concrete);
        // Non-alias codes come back unchanged.
        assert_eq!(ts.unalias(concrete).unwrap(), concrete);
        assert_eq!(
            ts.unalias(TypeCode::interface(0x10)).unwrap(),
            TypeCode::interface(0x10)
        );
    }

    #[test]
    fn test_unalias_cross_interface_chain() {
        let ts = TypeSystem::builder()
            .register(Arc::new(
                InterfaceDescriptor::builder("a", 0x1)
                    .alias("to_b", TypeCode::pack(0x2, 1))
                    .build(),
            ))
            .register(Arc::new(
                InterfaceDescriptor::builder("b", 0x2)
                    .record("final", 4)
                    .build(),
            ))
            .build()
            .unwrap();
        assert_eq!(
            ts.unalias(TypeCode::pack(0x1, 1)).unwrap(),
            TypeCode::pack(0x2, 1)
        );
    }

    #[test]
    fn test_unalias_bad_codes() {
        let ts = aliased();
        let unknown_iface = TypeCode::pack(0xDEAD, 1);
        assert_eq!(
            ts.unalias(unknown_iface),
            Err(TypeSystemError::BadCode(unknown_iface))
        );
        let out_of_range = TypeCode::pack(0x10, 9);
        assert_eq!(
            ts.unalias(out_of_range),
            Err(TypeSystemError::BadCode(out_of_range))
        );
    }

    #[test]
    fn test_unalias_tolerates_cycle() {
        // x -> y -> x: degrade to some code on the cycle, no error, no hang.
        let ts = TypeSystem::builder()
            .register(Arc::new(
                InterfaceDescriptor::builder("cyc", 0x10)
                    .alias("x", TypeCode::pack(0x10, 2))
                    .alias("y", TypeCode::pack(0x10, 1))
                    .build(),
            ))
            .build()
            .unwrap();
        let out = ts.unalias(TypeCode::pack(0x10, 1)).unwrap();
        assert_eq!(out.interface_id(), 0x10);
    }

    #[test]
    fn test_info_size_name_docstring() {
        let ts = TypeSystem::builder()
            .register(Arc::new(
                InterfaceDescriptor::builder("doc.iface", 0x10)
                    .docstring("An interface")
                    .record("rec", 24)
                    .member_docstring("A record")
                    .build(),
            ))
            .build()
            .unwrap();

        let iface_code = TypeCode::interface(0x10);
        let member_code = TypeCode::pack(0x10, 1);

        assert_eq!(ts.name(iface_code).unwrap(), "doc.iface");
        assert_eq!(ts.name(member_code).unwrap(), "rec");
        assert_eq!(ts.size(member_code).unwrap(), 24);
        assert_eq!(ts.docstring(iface_code).unwrap(), "An interface");
        assert_eq!(ts.docstring(member_code).unwrap(), "A record");

        let info = ts.info(iface_code).unwrap();
        assert!(info.value.as_interface().is_some());
        let info = ts.info(member_code).unwrap();
        assert_eq!(info.value.as_code(), Some(member_code));

        let bad = TypeCode::pack(0x10, 7);
        assert_eq!(ts.size(bad), Err(TypeSystemError::BadCode(bad)));
    }
}
