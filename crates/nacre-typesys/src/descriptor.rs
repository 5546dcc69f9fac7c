// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 nacre contributors

//! Interface and member descriptors.
//!
//! Descriptors are passive values produced ahead of time by the offline
//! interface compiler (or statically, for the bootstrap meta-interface) and
//! handed to the registry fully formed. The registry never copies or
//! mutates them; everything here is read accessors over a stable,
//! order-preserving representation.

use crate::typecode::TypeCode;
use crate::value::{Any, Value};
use std::sync::Arc;

/// The thirteen predefined built-in types exposed by the meta-interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Octet,
    Card16,
    Card32,
    Card64,
    Int8,
    Int16,
    Int32,
    Int64,
    Float,
    Double,
    Boolean,
    String,
    Opaque,
}

impl PrimitiveKind {
    /// All predefined types, in declaration order.
    pub const ALL: [PrimitiveKind; 13] = [
        PrimitiveKind::Octet,
        PrimitiveKind::Card16,
        PrimitiveKind::Card32,
        PrimitiveKind::Card64,
        PrimitiveKind::Int8,
        PrimitiveKind::Int16,
        PrimitiveKind::Int32,
        PrimitiveKind::Int64,
        PrimitiveKind::Float,
        PrimitiveKind::Double,
        PrimitiveKind::Boolean,
        PrimitiveKind::String,
        PrimitiveKind::Opaque,
    ];

    /// IDL-level name of the built-in type.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Octet => "octet",
            Self::Card16 => "card16",
            Self::Card32 => "card32",
            Self::Card64 => "card64",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Float => "float",
            Self::Double => "double",
            Self::Boolean => "boolean",
            Self::String => "string",
            Self::Opaque => "opaque",
        }
    }

    /// Size in bytes of the native machine representation.
    ///
    /// `string` and `opaque` values cross domain boundaries by reference
    /// and are reference-sized.
    pub const fn size(self) -> u64 {
        match self {
            Self::Octet | Self::Int8 | Self::Boolean => 1,
            Self::Card16 | Self::Int16 => 2,
            Self::Card32 | Self::Int32 | Self::Float => 4,
            Self::Card64 | Self::Int64 | Self::Double => 8,
            Self::String | Self::Opaque => std::mem::size_of::<usize>() as u64,
        }
    }
}

/// What a member declared inside an interface is.
///
/// The discriminator is fixed at construction and never changes; every use
/// site pattern-matches on it. Aliases carry the next code in their chain
/// directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    /// One of the thirteen built-in types (meta-interface members only).
    Predefined(PrimitiveKind),
    /// A name for another type; `target` is the next code in the chain.
    Alias { target: TypeCode },
    /// A record (struct) type.
    Record,
    /// A choice (tagged union) type.
    Choice,
    /// An enumeration type.
    Enum,
    /// A reference to another interface type.
    InterfaceRef,
    /// An operation (method) declared by the interface.
    Operation,
    /// An exception declared by the interface.
    Exception,
}

impl MemberKind {
    /// Short label used in log lines.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Predefined(_) => "predefined",
            Self::Alias { .. } => "alias",
            Self::Record => "record",
            Self::Choice => "choice",
            Self::Enum => "enum",
            Self::InterfaceRef => "iref",
            Self::Operation => "operation",
            Self::Exception => "exception",
        }
    }

    /// True for the type-declaring kinds (everything except operations and
    /// exceptions).
    pub const fn is_type(&self) -> bool {
        !matches!(self, Self::Operation | Self::Exception)
    }
}

/// One named type, operation or exception declared inside an interface.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
    /// Name, unique within the owning interface.
    pub name: String,
    /// Own typecode: owner's interface id + this member's subtype index.
    pub code: TypeCode,
    /// Kind discriminator, fixed at construction.
    pub kind: MemberKind,
    /// Size in bytes of a value of this type.
    pub size: u64,
    /// Documentation string from the interface definition.
    pub docstring: String,
}

impl TypeDescriptor {
    /// Tagged value denoting this type.
    ///
    /// A resolved type name denotes the type itself, so the payload carries
    /// the member's typecode.
    pub fn any(&self) -> Any {
        Any::new(self.code, Value::Code(self.code))
    }
}

/// One registered interface: its identity, optional supertype, and the
/// ordered sequence of members it declares.
///
/// Members are stored in declaration order; member `i` (0-based) carries
/// subtype index `i + 1`. Operations and exceptions share the member
/// sequence and the subtype index space with type members and are told
/// apart by [`MemberKind`].
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceDescriptor {
    /// Globally qualified interface name.
    pub name: String,
    /// Own typecode (interface id + sentinel subtype).
    pub code: TypeCode,
    /// Optional single parent interface for subtype chains.
    pub supertype: Option<TypeCode>,
    /// All declared members, in declaration order.
    pub members: Vec<TypeDescriptor>,
    /// Documentation string from the interface definition.
    pub docstring: String,
    /// True if the interface can only be invoked within its own domain.
    pub local: bool,
    /// Size in bytes of a reference to this interface.
    pub size: u64,
}

impl InterfaceDescriptor {
    /// Start building an interface descriptor.
    pub fn builder(name: impl Into<String>, interface_id: u64) -> InterfaceBuilder {
        InterfaceBuilder::new(name, interface_id)
    }

    /// Number of declared members.
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Member with the given subtype index (members are numbered from 1).
    pub fn member(&self, subtype: u16) -> Option<&TypeDescriptor> {
        if subtype == 0 {
            return None;
        }
        self.members.get(subtype as usize - 1)
    }

    /// Member with the given name.
    pub fn member_named(&self, name: &str) -> Option<&TypeDescriptor> {
        self.members.iter().find(|m| m.name == name)
    }

    /// Type members only (no operations or exceptions).
    pub fn types(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.members.iter().filter(|m| m.kind.is_type())
    }

    /// Operation members only.
    pub fn operations(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.members
            .iter()
            .filter(|m| matches!(m.kind, MemberKind::Operation))
    }

    /// Exception members only.
    pub fn exceptions(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.members
            .iter()
            .filter(|m| matches!(m.kind, MemberKind::Exception))
    }

    /// Capability reference to this interface as a tagged value.
    ///
    /// The tag is the interface's own typecode, so narrowing the reference
    /// against the interface or any of its supertypes succeeds.
    pub fn reference(this: &Arc<InterfaceDescriptor>) -> Any {
        Any::new(this.code, Value::Interface(Arc::clone(this)))
    }
}

/// Fluent construction of an [`InterfaceDescriptor`].
///
/// Subtype indices are assigned from the declaration order of the builder
/// calls, starting at 1. The offline compiler emits descriptors through
/// this same path at link time.
///
/// # Example
///
/// ```
/// use nacre_typesys::{InterfaceDescriptor, TypeCode};
///
/// let iface = InterfaceDescriptor::builder("fs.file", 0x2001)
///     .docstring("File capability")
///     .record("stat_info", 64)
///     .operation("read")
///     .exception("would_block")
///     .build();
/// assert_eq!(iface.code, TypeCode::interface(0x2001));
/// assert_eq!(iface.member_count(), 3);
/// assert_eq!(iface.member(1).unwrap().name, "stat_info");
/// ```
#[derive(Debug)]
pub struct InterfaceBuilder {
    name: String,
    interface_id: u64,
    supertype: Option<TypeCode>,
    members: Vec<TypeDescriptor>,
    docstring: String,
    local: bool,
    size: u64,
}

impl InterfaceBuilder {
    fn new(name: impl Into<String>, interface_id: u64) -> Self {
        Self {
            name: name.into(),
            interface_id,
            supertype: None,
            members: Vec::new(),
            docstring: String::new(),
            local: false,
            size: std::mem::size_of::<usize>() as u64,
        }
    }

    /// Declare the single parent interface.
    pub fn supertype(mut self, code: TypeCode) -> Self {
        self.supertype = Some(code);
        self
    }

    /// Attach a documentation string.
    pub fn docstring(mut self, doc: impl Into<String>) -> Self {
        self.docstring = doc.into();
        self
    }

    /// Mark the interface as invocable only within its own domain.
    pub fn local(mut self) -> Self {
        self.local = true;
        self
    }

    fn push(mut self, name: impl Into<String>, kind: MemberKind, size: u64) -> Self {
        let subtype = self.members.len() as u16 + 1;
        self.members.push(TypeDescriptor {
            name: name.into(),
            code: TypeCode::pack(self.interface_id, subtype),
            kind,
            size,
            docstring: String::new(),
        });
        self
    }

    /// Declare an alias member pointing at `target`.
    pub fn alias(self, name: impl Into<String>, target: TypeCode) -> Self {
        self.push(name, MemberKind::Alias { target }, 0)
    }

    /// Declare a record member of the given size.
    pub fn record(self, name: impl Into<String>, size: u64) -> Self {
        self.push(name, MemberKind::Record, size)
    }

    /// Declare a choice member of the given size.
    pub fn choice(self, name: impl Into<String>, size: u64) -> Self {
        self.push(name, MemberKind::Choice, size)
    }

    /// Declare an enumeration member.
    pub fn enumeration(self, name: impl Into<String>) -> Self {
        self.push(name, MemberKind::Enum, 4)
    }

    /// Declare an interface-reference member.
    pub fn interface_ref(self, name: impl Into<String>) -> Self {
        let size = std::mem::size_of::<usize>() as u64;
        self.push(name, MemberKind::InterfaceRef, size)
    }

    /// Declare an operation member.
    pub fn operation(self, name: impl Into<String>) -> Self {
        self.push(name, MemberKind::Operation, 0)
    }

    /// Declare an exception member.
    pub fn exception(self, name: impl Into<String>) -> Self {
        self.push(name, MemberKind::Exception, 0)
    }

    /// Attach a documentation string to the most recently declared member.
    pub fn member_docstring(mut self, doc: impl Into<String>) -> Self {
        if let Some(last) = self.members.last_mut() {
            last.docstring = doc.into();
        }
        self
    }

    /// Finish the descriptor.
    pub fn build(self) -> InterfaceDescriptor {
        InterfaceDescriptor {
            name: self.name,
            code: TypeCode::interface(self.interface_id),
            supertype: self.supertype,
            members: self.members,
            docstring: self.docstring,
            local: self.local,
            size: self.size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_names_and_sizes() {
        assert_eq!(PrimitiveKind::Octet.name(), "octet");
        assert_eq!(PrimitiveKind::Octet.size(), 1);
        assert_eq!(PrimitiveKind::Card64.size(), 8);
        assert_eq!(PrimitiveKind::Float.size(), 4);
        assert_eq!(PrimitiveKind::ALL.len(), 13);
    }

    #[test]
    fn test_builder_assigns_subtype_indices() {
        let iface = InterfaceDescriptor::builder("net.socket", 0x42)
            .record("endpoint", 16)
            .enumeration("state")
            .operation("connect")
            .build();

        assert_eq!(iface.member(1).unwrap().code, TypeCode::pack(0x42, 1));
        assert_eq!(iface.member(2).unwrap().code, TypeCode::pack(0x42, 2));
        assert_eq!(iface.member(3).unwrap().kind, MemberKind::Operation);
        assert!(iface.member(0).is_none());
        assert!(iface.member(4).is_none());
    }

    #[test]
    fn test_member_kind_filters() {
        let iface = InterfaceDescriptor::builder("dom.loader", 0x7)
            .record("image", 32)
            .operation("load")
            .exception("bad_image")
            .build();

        assert_eq!(iface.types().count(), 1);
        assert_eq!(iface.operations().count(), 1);
        assert_eq!(iface.exceptions().count(), 1);
        assert_eq!(iface.member_named("bad_image").unwrap().kind.label(), "exception");
        assert!(iface.member_named("missing").is_none());
    }

    #[test]
    fn test_member_any_is_type_valued() {
        let iface = InterfaceDescriptor::builder("dom.loader", 0x7)
            .record("image", 32)
            .build();
        let any = iface.member(1).unwrap().any();
        assert_eq!(any.code, TypeCode::pack(0x7, 1));
        assert_eq!(any.value.as_code(), Some(TypeCode::pack(0x7, 1)));
    }

    #[test]
    fn test_interface_reference_tag() {
        let iface = Arc::new(
            InterfaceDescriptor::builder("dom.loader", 0x7)
                .docstring("Domain loader")
                .build(),
        );
        let any = InterfaceDescriptor::reference(&iface);
        assert_eq!(any.code, iface.code);
        assert!(any.value.as_interface().is_some());
    }
}
