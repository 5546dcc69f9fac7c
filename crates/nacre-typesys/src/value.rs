// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 nacre contributors

//! Tagged values crossing domain boundaries.

use crate::descriptor::InterfaceDescriptor;
use crate::typecode::TypeCode;
use std::sync::Arc;

/// Opaque payload of an [`Any`].
///
/// The payload is not interpreted until the tag has been checked; `narrow`
/// is the only sanctioned way to turn one into something typed.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// An immediate integer payload.
    Scalar(u64),
    /// A typecode payload; produced when a name resolves to a type.
    Code(TypeCode),
    /// A capability reference to an interface.
    Interface(Arc<InterfaceDescriptor>),
}

impl Value {
    /// Payload as an immediate integer, if it is one.
    pub fn as_scalar(&self) -> Option<u64> {
        match self {
            Self::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    /// Payload as a typecode, if it is one.
    pub fn as_code(&self) -> Option<TypeCode> {
        match self {
            Self::Code(c) => Some(*c),
            _ => None,
        }
    }

    /// Payload as an interface reference, if it is one.
    pub fn as_interface(&self) -> Option<&Arc<InterfaceDescriptor>> {
        match self {
            Self::Interface(i) => Some(i),
            _ => None,
        }
    }
}

/// A dynamically-tagged value: a typecode plus an opaque payload.
///
/// `Any` is how values travel where no static typing is available, e.g.
/// across RPC marshalling. Consumers go through
/// [`TypeSystem::narrow`](crate::TypeSystem::narrow) before trusting the
/// payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Any {
    /// Tag: the type the payload claims to be.
    pub code: TypeCode,
    /// Opaque payload, uninterpreted until narrowed.
    pub value: Value,
}

impl Any {
    /// Tag a payload with a typecode.
    pub fn new(code: TypeCode, value: Value) -> Self {
        Self { code, value }
    }

    /// Tag an immediate integer.
    pub fn scalar(code: TypeCode, value: u64) -> Self {
        Self::new(code, Value::Scalar(value))
    }
}
