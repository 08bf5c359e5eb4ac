//! # Validation Scratch Space
//!
//! Short-lived allocations made while validating one array or object
//! (canonical element text, member names) go into a [`Scratch`] arena
//! owned by that call. The hash sets over them borrow from the arena, so
//! everything is released together when the call returns, whichever way
//! it returns.

use std::collections::HashSet;

use bumpalo::Bump;
use sjv_core::Kind;

/// Bump arena for one validate call.
#[derive(Default)]
pub struct Scratch {
    bump: Bump,
}

impl Scratch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy `text` into the arena.
    pub fn intern(&self, text: &str) -> &str {
        self.bump.alloc_str(text)
    }
}

/// Seen-value sets for `uniqueItems`, partitioned by kind.
///
/// Values of different kinds are never compared. The three literals need
/// no text at all, so they are tracked as flags.
#[derive(Debug, Default)]
pub struct UniqueBuckets<'b> {
    numbers: HashSet<&'b str>,
    strings: HashSet<&'b str>,
    arrays: HashSet<&'b str>,
    objects: HashSet<&'b str>,
    seen_true: bool,
    seen_false: bool,
    seen_null: bool,
}

impl<'b> UniqueBuckets<'b> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a literal. Returns false if it was already present.
    pub fn insert_literal(&mut self, kind: Kind) -> bool {
        let seen = match kind {
            Kind::True => &mut self.seen_true,
            Kind::False => &mut self.seen_false,
            Kind::Null => &mut self.seen_null,
            _ => return true,
        };
        !std::mem::replace(seen, true)
    }

    /// Record a value by its canonical text. Returns false if an equal
    /// value of the same kind was already present.
    pub fn insert(&mut self, kind: Kind, canonical: &'b str) -> bool {
        let bucket = match kind {
            Kind::Number => &mut self.numbers,
            Kind::String => &mut self.strings,
            Kind::Array => &mut self.arrays,
            Kind::Object => &mut self.objects,
            Kind::True | Kind::False | Kind::Null => return self.insert_literal(kind),
        };
        bucket.insert(canonical)
    }
}
