//! Value object trait: equality by value, not identity.
//!
//! Value objects have **no identity**: two expense entries with the same
//! category, amount and description are interchangeable.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values. To
/// "modify" one, build a new one.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct CategoryTotal {
///     category: String,
///     total: Decimal,
/// }
///
/// impl ValueObject for CategoryTotal {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
