//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**: two with the
/// same attribute values are equal. Every engine input and result is one,
/// created fresh per call and never mutated after construction.
///
/// To "modify" a value object, build a new one with the new values.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
