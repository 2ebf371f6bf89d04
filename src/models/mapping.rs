//! Entity <-> DTO conversion helpers.
//!
//! Single records convert through the `From` impls defined next to each model.
//! These helpers add the null-propagation rules on top: an absent record maps
//! to an absent record, and an absent collection maps to an empty one.

use indexmap::IndexSet;
use std::hash::Hash;

/// Map an optional record, propagating absence.
pub fn map_one<S, T>(source: Option<S>) -> Option<T>
where
    T: From<S>,
{
    source.map(T::from)
}

/// Map an optional collection into a list, preserving iteration order.
pub fn map_all<S, T, I>(source: Option<I>) -> Vec<T>
where
    I: IntoIterator<Item = S>,
    T: From<S>,
{
    source
        .map(|items| items.into_iter().map(T::from).collect())
        .unwrap_or_default()
}

/// Map an optional collection into an identity set (first occurrence wins).
pub fn map_set<S, T, I>(source: Option<I>) -> IndexSet<T>
where
    I: IntoIterator<Item = S>,
    T: From<S> + Hash + Eq,
{
    source
        .map(|items| items.into_iter().map(T::from).collect())
        .unwrap_or_default()
}
