//! # Document Validation
//!
//! Walks a document's token stream alongside a [`CompiledSchema`] in one
//! forward pass. Each value is checked against its node in two steps:
//!
//! 1. **Common constraints.** `enum` membership, else `const` equality,
//!    compared by canonical form on a look-ahead cursor.
//! 2. **Type-specific constraints.** The value's kind must be declared by
//!    the node; then bounds, lengths, patterns, element and member rules
//!    apply, recursing into array elements and object members.
//!
//! Validation stops at the first failing check and reports it as a
//! [`Mismatch`] naming the keyword and a JSON Pointer to the value.

use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;

use sjv_core::canonical::write_canonical;
use sjv_core::{
    decode_string, parse_number, CanonicalError, CanonicalForm, DepthLimitExceeded, Kind,
    ParseError, Scanner, Token, TokenSource,
};

use crate::error::ValidateError;
use crate::scratch::{Scratch, UniqueBuckets};
use crate::tree::{
    ArrayRules, CompiledSchema, ConstraintNode, NodeBody, NodeId, NumberRules, ObjectRules,
    StringRules,
};
use crate::type_info::member_name;
use crate::vocabulary::DeclaredType;

/// Outcome of validating a well-formed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Match,
    NoMatch(Mismatch),
}

impl Verdict {
    pub fn is_match(&self) -> bool {
        matches!(self, Verdict::Match)
    }

    /// The failing check, if any.
    pub fn mismatch(&self) -> Option<&Mismatch> {
        match self {
            Verdict::Match => None,
            Verdict::NoMatch(m) => Some(m),
        }
    }
}

/// The first check a document failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    /// Keyword of the failing check, or `type` for a kind mismatch.
    pub keyword: &'static str,
    /// JSON Pointer to the failing value; empty for the document root.
    pub path: String,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at #{}", self.keyword, self.path)
    }
}

impl CompiledSchema {
    /// Validate a document.
    ///
    /// # Errors
    ///
    /// Returns [`ValidateError`] if the document is malformed up to the
    /// point validation reached, or nests deeper than the depth guard.
    pub fn validate(&self, document: &str) -> Result<Verdict, ValidateError> {
        self.validate_tokens(&mut Scanner::new(document))
    }

    /// Validate a document given as bytes, which must be UTF-8.
    pub fn validate_bytes(&self, document: &[u8]) -> Result<Verdict, ValidateError> {
        self.validate_tokens(&mut Scanner::from_slice(document)?)
    }

    /// Validate the single value held by `tokens`.
    ///
    /// On [`Verdict::Match`] the source has been checked for trailing
    /// content. On a mismatch the rest of the input is left unread.
    pub fn validate_tokens<'a, T: TokenSource<'a>>(
        &self,
        tokens: &mut T,
    ) -> Result<Verdict, ValidateError> {
        let _span = tracing::debug_span!("validate", nodes = self.node_count()).entered();
        let first = tokens.expect_value()?;
        let mut walker = Walker {
            schema: self,
            path: Vec::new(),
        };
        match walker.value(tokens, first, self.root, 0) {
            Ok(()) => {
                tokens.finish()?;
                Ok(Verdict::Match)
            }
            Err(Stop::Mismatch(mismatch)) => {
                tracing::debug!(
                    keyword = mismatch.keyword,
                    path = %mismatch.path,
                    "document rejected"
                );
                Ok(Verdict::NoMatch(mismatch))
            }
            Err(Stop::Error(err)) => Err(err),
        }
    }

    /// Returns true if the document matches.
    pub fn is_valid(&self, document: &str) -> Result<bool, ValidateError> {
        Ok(self.validate(document)?.is_match())
    }
}

/// Why a walk ended early.
enum Stop {
    Mismatch(Mismatch),
    Error(ValidateError),
}

impl From<ParseError> for Stop {
    fn from(err: ParseError) -> Self {
        Stop::Error(err.into())
    }
}

impl From<DepthLimitExceeded> for Stop {
    fn from(err: DepthLimitExceeded) -> Self {
        Stop::Error(err.into())
    }
}

impl From<CanonicalError> for Stop {
    fn from(err: CanonicalError) -> Self {
        Stop::Error(err.into())
    }
}

enum Segment<'a> {
    Key(Cow<'a, str>),
    Index(usize),
}

struct Walker<'s, 'a> {
    schema: &'s CompiledSchema,
    path: Vec<Segment<'a>>,
}

impl<'s, 'a> Walker<'s, 'a> {
    /// Check the value started by `first` against node `id`, consuming it.
    fn value<T: TokenSource<'a>>(
        &mut self,
        tokens: &mut T,
        first: Token<'a>,
        id: NodeId,
        level: usize,
    ) -> Result<(), Stop> {
        let schema = self.schema;
        let node = schema.node(id);
        let level = schema.guard.enter(level)?;
        let kind = first
            .value_kind
            .ok_or_else(|| ParseError::new(first.offset, "expected a value"))?;

        self.common(tokens, &first, kind, node, level)?;
        if !node.declares(kind) {
            return Err(self.mismatch("type"));
        }

        match &node.body {
            NodeBody::Number(rules) => self.number(&first, rules),
            NodeBody::String(rules) => self.string(&first, rules),
            NodeBody::Array(rules) => self.array(tokens, first, rules, level),
            NodeBody::Object(rules) => self.object(tokens, first, rules, level),
            // Literals carry nothing beyond the common check.
            NodeBody::Boolean(_) | NodeBody::Null(_) => Ok(()),
        }
    }

    /// `enum`, then `const`. Leaves the cursor where it was.
    fn common<T: TokenSource<'a>>(
        &self,
        tokens: &T,
        first: &Token<'a>,
        kind: Kind,
        node: &ConstraintNode,
        level: usize,
    ) -> Result<(), Stop> {
        match &node.body {
            NodeBody::Boolean(rules) => {
                if let Some(accepted) = rules.enum_literals {
                    if !accepted.contains(kind) {
                        return Err(self.mismatch("enum"));
                    }
                } else if let Some(accepted) = rules.const_literals {
                    if !accepted.contains(kind) {
                        return Err(self.mismatch("const"));
                    }
                }
                return Ok(());
            }
            NodeBody::Null(rules) => {
                if let Some(allows) = rules.enum_allows_null {
                    if !(allows && kind == Kind::Null) {
                        return Err(self.mismatch("enum"));
                    }
                } else if let Some(allows) = rules.const_allows_null {
                    if !(allows && kind == Kind::Null) {
                        return Err(self.mismatch("const"));
                    }
                }
                return Ok(());
            }
            _ => {}
        }

        if let Some(members) = &node.common.enumeration {
            if !members.contains(&self.canonical(tokens, first, level)?) {
                return Err(self.mismatch("enum"));
            }
        } else if let Some(constant) = &node.common.constant {
            if self.canonical(tokens, first, level)? != *constant {
                return Err(self.mismatch("const"));
            }
        }
        Ok(())
    }

    /// Canonical form of the value started by `first`, read on a clone.
    fn canonical<T: TokenSource<'a>>(
        &self,
        tokens: &T,
        first: &Token<'a>,
        level: usize,
    ) -> Result<CanonicalForm, CanonicalError> {
        let mut probe = tokens.clone();
        CanonicalForm::from_tokens(&mut probe, *first, &self.schema.guard, level)
    }

    fn number(&self, first: &Token<'a>, rules: &NumberRules) -> Result<(), Stop> {
        let value = parse_number(first.raw, first.offset)?;
        if rules.integral && value.fract() != 0.0 {
            return Err(self.mismatch("type"));
        }
        if rules.minimum.is_some_and(|min| value < min) {
            return Err(self.mismatch("minimum"));
        }
        if rules.maximum.is_some_and(|max| value > max) {
            return Err(self.mismatch("maximum"));
        }
        if rules.exclusive_minimum.is_some_and(|min| value <= min) {
            return Err(self.mismatch("exclusiveMinimum"));
        }
        if rules.exclusive_maximum.is_some_and(|max| value >= max) {
            return Err(self.mismatch("exclusiveMaximum"));
        }
        if rules
            .multiple_of
            .is_some_and(|divisor| (value / divisor).fract() != 0.0)
        {
            return Err(self.mismatch("multipleOf"));
        }
        Ok(())
    }

    fn string(&self, first: &Token<'a>, rules: &StringRules) -> Result<(), Stop> {
        // Length of the undecoded content.
        let length = first.raw.len();
        if rules.min_length.is_some_and(|min| length < min) {
            return Err(self.mismatch("minLength"));
        }
        if rules.max_length.is_some_and(|max| length > max) {
            return Err(self.mismatch("maxLength"));
        }
        if let Some(pattern) = &rules.pattern {
            if !pattern.is_match(&decode_string(first.raw)?) {
                return Err(self.mismatch("pattern"));
            }
        }
        Ok(())
    }

    fn array<T: TokenSource<'a>>(
        &mut self,
        tokens: &mut T,
        first: Token<'a>,
        rules: &ArrayRules,
        level: usize,
    ) -> Result<(), Stop> {
        let scratch = Scratch::new();
        let mut buckets = UniqueBuckets::new();
        let mut canonical = String::new();
        let mut count = 0;
        let mut contained = 0;

        loop {
            let element = tokens.expect_token()?;
            if element.closes(&first) {
                break;
            }
            let kind = element
                .value_kind
                .ok_or_else(|| ParseError::new(element.offset, "expected a value"))?;
            self.path.push(Segment::Index(count));

            if let Some(items) = &rules.item_kinds {
                if !declared_match(items, kind, &element)? {
                    return Err(self.mismatch("items"));
                }
            }
            if let Some(counted) = &rules.contains_kinds {
                if declared_match(counted, kind, &element)? {
                    contained += 1;
                }
            }

            let prefix = rules.prefix_items.get(count).copied();
            if prefix.is_none() && !rules.allow_additional_items {
                return Err(self.mismatch("items"));
            }

            let mut consumed = false;
            if rules.unique_items {
                let fresh = if matches!(kind, Kind::True | Kind::False | Kind::Null) {
                    buckets.insert_literal(kind)
                } else {
                    canonical.clear();
                    if prefix.is_some() {
                        let mut probe = tokens.clone();
                        write_canonical(&mut canonical, &mut probe, element, &self.schema.guard, level)?;
                    } else {
                        write_canonical(&mut canonical, tokens, element, &self.schema.guard, level)?;
                        consumed = true;
                    }
                    buckets.insert(kind, scratch.intern(&canonical))
                };
                if !fresh {
                    return Err(self.mismatch("uniqueItems"));
                }
            }

            match prefix {
                Some(id) => self.value(tokens, element, id, level)?,
                None if !consumed => tokens.skip_opened(&element)?,
                None => {}
            }
            self.path.pop();
            count += 1;
        }

        if rules.contains_kinds.is_some() {
            if rules.max_contains.is_some_and(|max| contained > max) {
                return Err(self.mismatch("maxContains"));
            }
            if rules.min_contains.is_some_and(|min| contained < min) {
                return Err(self.mismatch("minContains"));
            }
        }
        if rules.max_items.is_some_and(|max| count > max) {
            return Err(self.mismatch("maxItems"));
        }
        if rules.min_items.is_some_and(|min| count < min) {
            return Err(self.mismatch("minItems"));
        }
        Ok(())
    }

    fn object<T: TokenSource<'a>>(
        &mut self,
        tokens: &mut T,
        first: Token<'a>,
        rules: &ObjectRules,
        level: usize,
    ) -> Result<(), Stop> {
        let scratch = Scratch::new();
        let mut present: HashSet<&str> = HashSet::new();
        let track = rules.tracks_presence();
        let mut count = 0;

        loop {
            let token = tokens.expect_token()?;
            if token.closes(&first) {
                break;
            }
            let name = member_name(&token)?;
            let value = tokens.expect_value()?;
            count += 1;
            if track {
                present.insert(scratch.intern(&name));
            }

            let property = rules.properties.get(&*name).copied();
            self.path.push(Segment::Key(name));
            match property {
                Some(id) => self.value(tokens, value, id, level)?,
                None if rules.additional_properties => tokens.skip_opened(&value)?,
                None => return Err(self.mismatch("additionalProperties")),
            }
            self.path.pop();
        }

        if rules.max_properties.is_some_and(|max| count > max) {
            return Err(self.mismatch("maxProperties"));
        }
        if rules.min_properties.is_some_and(|min| count < min) {
            return Err(self.mismatch("minProperties"));
        }
        if rules.required.iter().any(|name| !present.contains(name.as_str())) {
            return Err(self.mismatch("required"));
        }
        let dependency_missing = rules
            .dependent_required
            .iter()
            .filter(|(trigger, _)| present.contains(trigger.as_str()))
            .any(|(_, dependents)| dependents.iter().any(|d| !present.contains(d.as_str())));
        if dependency_missing {
            return Err(self.mismatch("dependentRequired"));
        }
        Ok(())
    }

    fn mismatch(&self, keyword: &'static str) -> Stop {
        Stop::Mismatch(Mismatch {
            keyword,
            path: self.pointer(),
        })
    }

    /// The current path as a JSON Pointer.
    fn pointer(&self) -> String {
        let mut out = String::new();
        for segment in &self.path {
            out.push('/');
            match segment {
                Segment::Key(name) => {
                    for ch in name.chars() {
                        match ch {
                            '~' => out.push_str("~0"),
                            '/' => out.push_str("~1"),
                            _ => out.push(ch),
                        }
                    }
                }
                Segment::Index(index) => out.push_str(&index.to_string()),
            }
        }
        out
    }
}

/// Returns true if an element of `kind` satisfies `declared`.
fn declared_match(
    declared: &DeclaredType,
    kind: Kind,
    element: &Token<'_>,
) -> Result<bool, ParseError> {
    if !declared.kinds.contains(kind) {
        return Ok(false);
    }
    if declared.integral && kind == Kind::Number {
        return Ok(parse_number(element.raw, element.offset)?.fract() == 0.0);
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::compile;
    use crate::config::{ValidatorConfig, VocabularyChoice};

    fn schema(text: &str) -> CompiledSchema {
        compile(text, &ValidatorConfig::default()).expect("schema should compile")
    }

    fn verdict(schema_text: &str, document: &str) -> Verdict {
        schema(schema_text)
            .validate(document)
            .expect("document should be well-formed")
    }

    fn rejects(schema_text: &str, document: &str) -> Mismatch {
        match verdict(schema_text, document) {
            Verdict::NoMatch(m) => m,
            Verdict::Match => panic!("expected {document} to be rejected"),
        }
    }

    #[test]
    fn test_type_mismatch() {
        let m = rejects(r#"{"type":"string"}"#, "12");
        assert_eq!(m.keyword, "type");
        assert_eq!(m.path, "");
    }

    #[test]
    fn test_number_bounds() {
        let s = r#"{"type":"number","exclusiveMinimum":0,"exclusiveMaximum":1}"#;
        assert!(verdict(s, "0.5").is_match());
        assert_eq!(rejects(s, "0").keyword, "exclusiveMinimum");
        assert_eq!(rejects(s, "1").keyword, "exclusiveMaximum");
    }

    #[test]
    fn test_fractional_bounds_not_truncated() {
        let s = r#"{"type":"number","minimum":0.5}"#;
        assert_eq!(rejects(s, "0.25").keyword, "minimum");
        assert!(verdict(s, "0.5").is_match());
    }

    #[test]
    fn test_multiple_of() {
        let s = r#"{"type":"number","multipleOf":3}"#;
        assert!(verdict(s, "9").is_match());
        assert_eq!(rejects(s, "10").keyword, "multipleOf");
    }

    #[test]
    fn test_string_length_counts_raw_bytes() {
        let s = r#"{"type":"string","minLength":2,"maxLength":3}"#;
        assert!(verdict(s, r#""ab""#).is_match());
        assert_eq!(rejects(s, r#""a""#).keyword, "minLength");
        assert_eq!(rejects(s, r#""abcd""#).keyword, "maxLength");
    }

    #[test]
    fn test_pattern_search() {
        let s = r#"{"type":"string","pattern":"[0-9]{3}"}"#;
        assert!(verdict(s, r#""ab123""#).is_match());
        assert_eq!(rejects(s, r#""ab12""#).keyword, "pattern");
    }

    #[test]
    fn test_pattern_shared_across_calls() {
        let compiled = schema(r#"{"type":"string","pattern":"^a+$"}"#);
        for _ in 0..3 {
            assert!(compiled.is_valid(r#""aaa""#).unwrap());
            assert!(!compiled.is_valid(r#""aab""#).unwrap());
        }
    }

    #[test]
    fn test_enum_membership() {
        let s = r#"{"type":"string","enum":["red","green",1]}"#;
        assert!(verdict(s, r#""green""#).is_match());
        assert_eq!(rejects(s, r#""blue""#).keyword, "enum");
        assert_eq!(rejects(s, "1").keyword, "enum");
    }

    #[test]
    fn test_enum_composite_member_order() {
        let s = r#"{"type":"object","enum":[{"a":1,"b":[1,2]}]}"#;
        assert!(verdict(s, r#"{"b":[1.0,2],"a":1}"#).is_match());
        assert_eq!(rejects(s, r#"{"b":[2,1],"a":1}"#).keyword, "enum");
    }

    #[test]
    fn test_const_then_type_specific() {
        let s = r#"{"type":"object","const":{"a":1},"required":["b"]}"#;
        assert_eq!(rejects(s, r#"{"a":1}"#).keyword, "required");
        assert_eq!(rejects(s, r#"{"a":2}"#).keyword, "const");
    }

    #[test]
    fn test_const_of_other_kind_never_matches() {
        let s = r#"{"type":"number","const":"1"}"#;
        assert_eq!(rejects(s, r#""1""#).keyword, "type");
        assert_eq!(rejects(s, "1").keyword, "const");
    }

    #[test]
    fn test_boolean_literals() {
        assert!(verdict(r#"{"type":"true"}"#, "true").is_match());
        assert_eq!(rejects(r#"{"type":"true"}"#, "false").keyword, "type");
        let s = r#"{"type":["true","false"],"const":false}"#;
        assert!(verdict(s, "false").is_match());
        assert_eq!(rejects(s, "true").keyword, "const");
    }

    #[test]
    fn test_null_enum() {
        assert!(verdict(r#"{"type":"null","enum":[null]}"#, "null").is_match());
        assert_eq!(rejects(r#"{"type":"null","enum":[1]}"#, "null").keyword, "enum");
    }

    #[test]
    fn test_prefix_items_and_path() {
        let s = r#"{"type":"array","prefixItems":[{"type":"string"},{"type":"number","maximum":5}]}"#;
        assert!(verdict(s, r#"["a",3,{"extra":true}]"#).is_match());
        let m = rejects(s, r#"["a",9]"#);
        assert_eq!(m.keyword, "maximum");
        assert_eq!(m.path, "/1");
    }

    #[test]
    fn test_items_false_after_prefix() {
        let s = r#"{"type":"array","prefixItems":[{"type":"number"}],"items":false}"#;
        assert!(verdict(s, "[1]").is_match());
        let m = rejects(s, "[1,2]");
        assert_eq!(m.keyword, "items");
        assert_eq!(m.path, "/1");
    }

    #[test]
    fn test_items_kind() {
        let s = r#"{"type":"array","items":{"type":"number"}}"#;
        assert!(verdict(s, "[1,2,3]").is_match());
        assert_eq!(rejects(s, r#"[1,"2"]"#).path, "/1");
    }

    #[test]
    fn test_contains_counts() {
        let s = r#"{"type":"array","contains":{"type":"string"},"minContains":1,"maxContains":2}"#;
        assert!(verdict(s, r#"[1,"a"]"#).is_match());
        assert_eq!(rejects(s, "[1,2]").keyword, "minContains");
        assert_eq!(rejects(s, r#"["a","b","c"]"#).keyword, "maxContains");
    }

    #[test]
    fn test_contains_bounds_ignored_without_contains() {
        assert!(verdict(r#"{"type":"array","minContains":3}"#, "[]").is_match());
    }

    #[test]
    fn test_unique_items_partitioned_by_kind() {
        let s = r#"{"type":"array","uniqueItems":true}"#;
        assert!(verdict(s, r#"[1,"1",[1],{"1":1},true,false,null]"#).is_match());
        assert_eq!(rejects(s, "[1,2,1.0]").path, "/2");
        assert_eq!(rejects(s, "[null,null]").keyword, "uniqueItems");
        assert_eq!(rejects(s, "[[1,[2]],[1,[2.0]]]").keyword, "uniqueItems");
    }

    #[test]
    fn test_unique_items_with_prefix() {
        let s = r#"{"type":"array","uniqueItems":true,"prefixItems":[{"type":"object","required":["a"]}]}"#;
        assert!(verdict(s, r#"[{"a":1},{"a":2}]"#).is_match());
        assert_eq!(rejects(s, r#"[{"a":1},{"a":1}]"#).keyword, "uniqueItems");
        assert_eq!(rejects(s, r#"[{"b":1}]"#).keyword, "required");
    }

    #[test]
    fn test_nested_property_path() {
        let s = r#"{"type":"object","properties":{"a/b":{"type":"object","properties":{"c~":{"type":"number"}}}}}"#;
        let m = rejects(s, r#"{"a/b":{"c~":"x"}}"#);
        assert_eq!(m.path, "/a~1b/c~0");
        assert_eq!(m.to_string(), "type at #/a~1b/c~0");
    }

    #[test]
    fn test_members_walked_without_properties() {
        let s = r#"{"type":"object","maxProperties":1,"required":["z"]}"#;
        assert_eq!(rejects(s, r#"{"a":1,"b":2}"#).keyword, "maxProperties");
        assert_eq!(rejects(s, r#"{"a":1}"#).keyword, "required");
        assert!(verdict(s, r#"{"z":[1,{"q":2}]}"#).is_match());
    }

    #[test]
    fn test_min_properties() {
        let s = r#"{"type":"object","minProperties":2}"#;
        assert_eq!(rejects(s, r#"{"a":1}"#).keyword, "minProperties");
    }

    #[test]
    fn test_additional_properties_path() {
        let s = r#"{"type":"object","properties":{"a":{"type":"number"}},"additionalProperties":false}"#;
        let m = rejects(s, r#"{"a":1,"b":2}"#);
        assert_eq!(m.keyword, "additionalProperties");
        assert_eq!(m.path, "/b");
    }

    #[test]
    fn test_escaped_member_names_decoded() {
        let s = r#"{"type":"object","required":["ab"]}"#;
        assert!(verdict(s, r#"{"a\u0062":1}"#).is_match());
    }

    #[test]
    fn test_integer_extension() {
        let config = ValidatorConfig {
            type_vocabulary: VocabularyChoice::Extended,
            ..ValidatorConfig::default()
        };
        let compiled = compile(r#"{"type":"integer"}"#, &config).unwrap();
        assert!(compiled.is_valid("4").unwrap());
        assert!(compiled.is_valid("4.0").unwrap());
        assert!(!compiled.is_valid("4.5").unwrap());

        let compiled = compile(r#"{"type":"boolean"}"#, &config).unwrap();
        assert!(compiled.is_valid("true").unwrap());
        assert!(compiled.is_valid("false").unwrap());
        assert!(!compiled.is_valid("null").unwrap());
    }

    #[test]
    fn test_malformed_document() {
        let compiled = schema(r#"{"type":"array"}"#);
        assert!(matches!(compiled.validate("[1,"), Err(ValidateError::Parse(_))));
        assert!(matches!(compiled.validate("[1] 2"), Err(ValidateError::Parse(_))));
    }

    #[test]
    fn test_mismatch_stops_reading() {
        let compiled = schema(r#"{"type":"object","additionalProperties":false}"#);
        let verdict = compiled.validate(r#"{"a":1, this is never read"#).unwrap();
        assert_eq!(verdict.mismatch().unwrap().keyword, "additionalProperties");
    }

    #[test]
    fn test_document_depth_guard() {
        let config = ValidatorConfig {
            max_depth: 2,
            ..ValidatorConfig::default()
        };
        let compiled = compile(r#"{"type":"array","uniqueItems":true}"#, &config).unwrap();
        assert!(compiled.is_valid("[[1]]").unwrap());
        assert!(matches!(
            compiled.validate("[[[1]]]"),
            Err(ValidateError::StackOverflowGuard { limit: 2 })
        ));
    }

    #[test]
    fn test_validate_bytes() {
        let compiled = schema(r#"{"type":"string"}"#);
        assert!(compiled.validate_bytes(br#""ok""#).unwrap().is_match());
        assert!(compiled.validate_bytes(b"\"\xff\"").is_err());
    }
}
