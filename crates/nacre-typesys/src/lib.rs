// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 nacre contributors

//! # nacre-typesys - Runtime interface type system for Nacre
//!
//! Every cross-domain interaction in Nacre (kernel to driver, domain to
//! domain RPC) is described by an interface definition compiled ahead of
//! time into an in-memory descriptor. This crate is the runtime half: any
//! domain can publish descriptors, look them up by qualified name or by
//! compact numeric typecode, verify subtype compatibility, and safely
//! narrow a dynamically-tagged value to a concrete type without leaning on
//! the host language's type system.
//!
//! ## Quick Start
//!
//! ```rust
//! use nacre_typesys::{InterfaceDescriptor, TypeCode, TypeSystem};
//! use std::sync::Arc;
//!
//! let ts = TypeSystem::builder()
//!     .register(Arc::new(
//!         InterfaceDescriptor::builder("vfs.node", 0x3A21)
//!             .docstring("Filesystem node capability")
//!             .record("stat_info", 64)
//!             .operation("open")
//!             .build(),
//!     ))
//!     .build()?;
//!
//! // Resolve by qualified name, then gate a payload on compatibility.
//! let node = ts.get("vfs.node")?;
//! let payload = ts.narrow(&node, TypeCode::interface(0x3A21))?;
//! assert!(payload.as_interface().is_some());
//! # Ok::<(), nacre_typesys::TypeSystemError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +--------------------------------------------------------------+
//! |                    RPC marshalling / domains                 |
//! +--------------------------------------------------------------+
//! |  TypeSystem capability                                       |
//! |    naming: resolve/list (dotted names, meta fallback)        |
//! |    subtype: is_type/narrow/unalias + info/size/name/doc      |
//! +--------------------------------------------------------------+
//! |  Registry: by_name + by_code indices (single lock)           |
//! +--------------------------------------------------------------+
//! |  Descriptors (compiler-emitted, immutable) | TypeCode algebra|
//! +--------------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`TypeCode`] | 64-bit identifier: 48-bit interface id + 16-bit subtype index |
//! | [`Any`] | Tagged value crossing a trust boundary (typecode + opaque payload) |
//! | [`InterfaceDescriptor`] | One interface: name, supertype, ordered members |
//! | [`TypeSystem`] | The registry capability: publish, resolve, check, narrow |
//! | [`NamingContext`] | Read-only resolve/enumerate capability over a context |
//!
//! The meta-interface seeds the registry at construction: a self-describing
//! descriptor whose members are the thirteen predefined built-in types, and
//! through which dotted paths tunnel into the general namespace.
//!
//! Registration is bootstrap-phase work guarded by a registry-wide lock;
//! every read path is side-effect free and safe to run concurrently once
//! registration has quiesced.

mod descriptor;
mod error;
mod meta;
mod naming;
mod registry;
mod subtype;
mod system;
mod typecode;
mod value;

pub use descriptor::{
    InterfaceBuilder, InterfaceDescriptor, MemberKind, PrimitiveKind, TypeDescriptor,
};
pub use error::{Result, TypeSystemError};
pub use meta::{META_INTERFACE_CODE, META_INTERFACE_ID, META_INTERFACE_NAME, PREDEFINED_COUNT};
pub use naming::{InterfaceContext, MetaContext, NamingContext};
pub use system::{TypeSystem, TypeSystemBuilder};
pub use typecode::{TypeCode, INTERFACE_ID_MAX, SELF_SUBTYPE, SUBTYPE_BITS};
pub use value::{Any, Value};
