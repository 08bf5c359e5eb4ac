//! # Value Kinds
//!
//! The seven kinds a token source reports for a JSON value. `true` and
//! `false` are distinct kinds: a schema's declared type can name a single
//! literal, and uniqueness tracks them as independent flags.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of a JSON value as reported by the token source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Number,
    String,
    Array,
    Object,
    True,
    False,
    Null,
}

impl Kind {
    /// All kinds, in declaration order.
    pub const ALL: [Kind; 7] = [
        Kind::Number,
        Kind::String,
        Kind::Array,
        Kind::Object,
        Kind::True,
        Kind::False,
        Kind::Null,
    ];

    /// The lowercase name used in diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Number => "number",
            Kind::String => "string",
            Kind::Array => "array",
            Kind::Object => "object",
            Kind::True => "true",
            Kind::False => "false",
            Kind::Null => "null",
        }
    }

    /// Returns true for arrays and objects.
    pub fn is_composite(self) -> bool {
        matches!(self, Kind::Array | Kind::Object)
    }

    /// Returns true for the two boolean literals.
    pub fn is_boolean(self) -> bool {
        matches!(self, Kind::True | Kind::False)
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A small copyable set of [`Kind`]s.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct KindSet(u8);

impl KindSet {
    /// The empty set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// A set holding exactly `kind`.
    pub fn single(kind: Kind) -> Self {
        Self(kind.bit())
    }

    /// Returns a copy of this set with `kind` added.
    #[must_use]
    pub fn with(self, kind: Kind) -> Self {
        Self(self.0 | kind.bit())
    }

    /// Add `kind` to the set.
    pub fn insert(&mut self, kind: Kind) {
        self.0 |= kind.bit();
    }

    /// Union of two sets.
    #[must_use]
    pub fn union(self, other: KindSet) -> Self {
        Self(self.0 | other.0)
    }

    /// Returns true if `kind` is a member.
    pub fn contains(self, kind: Kind) -> bool {
        self.0 & kind.bit() != 0
    }

    /// Returns true if the set has no members.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of members.
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Members in declaration order.
    pub fn iter(self) -> impl Iterator<Item = Kind> {
        Kind::ALL.into_iter().filter(move |k| self.contains(*k))
    }
}

impl FromIterator<Kind> for KindSet {
    fn from_iter<I: IntoIterator<Item = Kind>>(iter: I) -> Self {
        iter.into_iter().fold(KindSet::empty(), KindSet::with)
    }
}

impl fmt::Debug for KindSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_contains_only_that_kind() {
        let set = KindSet::single(Kind::True);
        assert!(set.contains(Kind::True));
        assert!(!set.contains(Kind::False));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_union_and_iter_order() {
        let set = KindSet::single(Kind::Null).union(KindSet::single(Kind::Number));
        let kinds: Vec<Kind> = set.iter().collect();
        assert_eq!(kinds, vec![Kind::Number, Kind::Null]);
    }

    #[test]
    fn test_from_iterator() {
        let set: KindSet = [Kind::True, Kind::False].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert!(set.iter().all(Kind::is_boolean));
    }

    #[test]
    fn test_empty_set() {
        assert!(KindSet::empty().is_empty());
        assert_eq!(KindSet::default(), KindSet::empty());
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(Kind::Object.to_string(), "object");
        assert_eq!(Kind::False.to_string(), "false");
    }
}
