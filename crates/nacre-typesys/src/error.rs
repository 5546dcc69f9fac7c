// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 nacre contributors

//! Type system failure kinds.

use crate::typecode::TypeCode;
use thiserror::Error;

/// Everything the type system can report to a caller.
///
/// Failures are detected at the point of the invalid input and reported to
/// the immediate caller; nothing is swallowed or silently defaulted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeSystemError {
    /// Registration under a qualified name that is already taken.
    #[error("interface name already registered: {0}")]
    NameClash(String),

    /// Registration under an interface id that is already taken.
    #[error("interface id already registered: {0}")]
    TypeCodeClash(TypeCode),

    /// A typecode whose interface id or subtype index resolves to nothing.
    #[error("typecode does not resolve: {0}")]
    BadCode(TypeCode),

    /// A narrow against a typecode the value's type is not compatible with.
    #[error("cannot narrow {actual} to {target}")]
    Incompatible {
        /// The value's actual type tag.
        actual: TypeCode,
        /// The requested target type.
        target: TypeCode,
    },

    /// Dotted-name resolution tried to recurse into an interface that
    /// cannot act as a naming context.
    #[error("`{0}` cannot act as a naming context")]
    NotContext(String),

    /// Qualified-name resolution found nothing at some segment.
    #[error("name not found: `{0}`")]
    NotFound(String),

    /// Mutation attempted on a read-only naming-context view.
    #[error("naming context is read-only")]
    Denied,
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, TypeSystemError>;
