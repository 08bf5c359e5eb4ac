//! # Type Vocabulary
//!
//! Maps the names a schema uses in `type` to document value kinds. The
//! strict table accepts exactly `number`, `string`, `array`, `object`,
//! `true`, `false` and `null`, where a boolean schema names the specific
//! literal it matches. The extended table also accepts `boolean` and
//! `integer`.

use std::collections::HashMap;

use sjv_core::{Kind, KindSet};

/// The constraint-node variant a declared type compiles to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Number,
    String,
    Array,
    Object,
    Boolean,
    Null,
}

impl Variant {
    /// The variant holding values of `kind`.
    pub fn of(kind: Kind) -> Self {
        match kind {
            Kind::Number => Variant::Number,
            Kind::String => Variant::String,
            Kind::Array => Variant::Array,
            Kind::Object => Variant::Object,
            Kind::True | Kind::False => Variant::Boolean,
            Kind::Null => Variant::Null,
        }
    }
}

/// What a `type` declaration resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeclaredType {
    /// Kinds a matching value may have.
    pub kinds: KindSet,
    /// Numbers must be integral.
    pub integral: bool,
}

impl DeclaredType {
    /// A declaration accepting exactly one kind.
    pub fn of(kind: Kind) -> Self {
        Self {
            kinds: KindSet::single(kind),
            integral: false,
        }
    }

    /// Combine two entries of a `type` array.
    ///
    /// A number is integral-only if every numeric entry demands it.
    #[must_use]
    pub fn merge(self, other: DeclaredType) -> Self {
        let integral = match (
            self.kinds.contains(Kind::Number),
            other.kinds.contains(Kind::Number),
        ) {
            (true, true) => self.integral && other.integral,
            (true, false) => self.integral,
            (false, true) => other.integral,
            (false, false) => false,
        };
        Self {
            kinds: self.kinds.union(other.kinds),
            integral,
        }
    }

    /// The single variant all declared kinds belong to, if there is one.
    pub fn variant(&self) -> Option<Variant> {
        let mut kinds = self.kinds.iter();
        let first = Variant::of(kinds.next()?);
        kinds.all(|k| Variant::of(k) == first).then_some(first)
    }
}

/// Type-name table consulted by the type-info extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeVocabulary {
    names: HashMap<String, DeclaredType>,
}

impl TypeVocabulary {
    /// The seven kind names, with a separate name per boolean literal.
    pub fn strict() -> Self {
        let names = Kind::ALL
            .into_iter()
            .map(|kind| (kind.as_str().to_owned(), DeclaredType::of(kind)))
            .collect();
        Self { names }
    }

    /// The strict table plus `boolean` and `integer`.
    pub fn extended() -> Self {
        Self::strict()
            .with_name(
                "boolean",
                DeclaredType {
                    kinds: KindSet::single(Kind::True).with(Kind::False),
                    integral: false,
                },
            )
            .with_name(
                "integer",
                DeclaredType {
                    kinds: KindSet::single(Kind::Number),
                    integral: true,
                },
            )
    }

    /// Add or replace one name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>, declared: DeclaredType) -> Self {
        self.names.insert(name.into(), declared);
        self
    }

    /// Look up a type name.
    pub fn resolve(&self, name: &str) -> Option<DeclaredType> {
        self.names.get(name).copied()
    }
}

impl Default for TypeVocabulary {
    fn default() -> Self {
        Self::strict()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_has_literal_names_only() {
        let vocab = TypeVocabulary::strict();
        assert_eq!(vocab.resolve("true"), Some(DeclaredType::of(Kind::True)));
        assert_eq!(vocab.resolve("boolean"), None);
        assert_eq!(vocab.resolve("integer"), None);
    }

    #[test]
    fn test_extended_adds_boolean_and_integer() {
        let vocab = TypeVocabulary::extended();
        let boolean = vocab.resolve("boolean").unwrap();
        assert_eq!(boolean.variant(), Some(Variant::Boolean));
        assert_eq!(boolean.kinds.len(), 2);
        let integer = vocab.resolve("integer").unwrap();
        assert!(integer.integral);
        assert_eq!(integer.variant(), Some(Variant::Number));
    }

    #[test]
    fn test_literal_pair_is_one_variant() {
        let pair = DeclaredType::of(Kind::True).merge(DeclaredType::of(Kind::False));
        assert_eq!(pair.variant(), Some(Variant::Boolean));
    }

    #[test]
    fn test_mixed_kinds_have_no_variant() {
        let mixed = DeclaredType::of(Kind::Number).merge(DeclaredType::of(Kind::String));
        assert_eq!(mixed.variant(), None);
    }

    #[test]
    fn test_merge_integer_with_number_is_not_integral() {
        let vocab = TypeVocabulary::extended();
        let merged = vocab
            .resolve("integer")
            .unwrap()
            .merge(vocab.resolve("number").unwrap());
        assert!(!merged.integral);
    }

    #[test]
    fn test_custom_name() {
        let vocab = TypeVocabulary::strict().with_name("text", DeclaredType::of(Kind::String));
        assert_eq!(vocab.resolve("text").unwrap().variant(), Some(Variant::String));
    }
}
