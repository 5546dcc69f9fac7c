// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 nacre contributors

//! Meta-interface bootstrap.
//!
//! The meta-interface describes every interface in the system, itself
//! included, and exposes the thirteen predefined built-in types as its
//! members. It is constructed statically, before the registry accepts any
//! other descriptor, and is registered through the ordinary registration
//! path with the member audit skipped (it arrives pre-checked).
//!
//! Its interface id sits at the top of the 48-bit space, outside the range
//! the offline compiler assigns from, so it can never collide with a
//! compiler-generated id.

use crate::descriptor::{InterfaceDescriptor, MemberKind, PrimitiveKind, TypeDescriptor};
use crate::typecode::TypeCode;
use std::sync::Arc;

/// Reserved interface id of the meta-interface.
pub const META_INTERFACE_ID: u64 = 0xFFFF_FFFF_FFFF;

/// Typecode of the meta-interface itself.
pub const META_INTERFACE_CODE: TypeCode = TypeCode::interface(META_INTERFACE_ID);

/// Qualified name the meta-interface is registered under.
pub const META_INTERFACE_NAME: &str = "meta_interface";

/// Number of predefined built-in types.
pub const PREDEFINED_COUNT: usize = PrimitiveKind::ALL.len();

/// Build the meta-interface descriptor.
///
/// Members are the predefined types, subtype indices 1 through 13 in
/// declaration order.
pub(crate) fn meta_interface() -> Arc<InterfaceDescriptor> {
    let members = PrimitiveKind::ALL
        .iter()
        .enumerate()
        .map(|(index, kind)| TypeDescriptor {
            name: kind.name().to_string(),
            code: TypeCode::pack(META_INTERFACE_ID, index as u16 + 1),
            kind: MemberKind::Predefined(*kind),
            size: kind.size(),
            docstring: format!("Built-in type {}", kind.name()),
        })
        .collect();

    Arc::new(InterfaceDescriptor {
        name: META_INTERFACE_NAME.to_string(),
        code: META_INTERFACE_CODE,
        supertype: None,
        members,
        docstring: "Meta-interface describing all interfaces in the system.".to_string(),
        local: true,
        size: std::mem::size_of::<usize>() as u64,
    })
}
