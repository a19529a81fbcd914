//! Entity trait: identity + continuity across edits.

/// Entity marker + minimal interface.
///
/// An item keeps its identity while its name, count and expiration date are
/// overwritten by edits.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
