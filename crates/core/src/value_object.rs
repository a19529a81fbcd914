//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Category names and expiration dates are value objects: two `CategoryName`s
/// holding the same text are the same category, whatever instance they came
/// from. Constructors validate, so a value object that exists is well formed.
///
/// ```ignore
/// let a = CategoryName::parse("Drinks")?;
/// let b = CategoryName::parse(" Drinks ")?;
/// assert_eq!(a, b);
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
