//! # Canonical Forms — Structural Equality Without a Document Tree
//!
//! `const`, `enum` and `uniqueItems` all need structural equality between
//! JSON values that may be spelled differently (`1` vs `1.0`, members in a
//! different order, `"\u0041"` vs `"A"`). Rather than building a value tree,
//! the canonicalizer consumes one value from a [`TokenSource`] and writes a
//! canonical string; two values are equal exactly when their canonical
//! strings are equal.
//!
//! ## Canonicalization Rules
//!
//! 1. **Numbers** — parsed to `f64` and formatted through `serde_jcs`
//!    (ECMAScript shortest round-trip form), so `1`, `1.0` and `1e0` coincide.
//!    Values beyond the `f64` range saturate and are written `1e999` or
//!    `-1e999`.
//! 2. **Strings** — escapes decoded, then re-encoded through `serde_jcs`.
//! 3. **Literals** — `true`, `false`, `null` as written.
//! 4. **Arrays** — elements canonicalized in order, comma separated.
//! 5. **Objects** — members canonicalized, then sorted by canonical key
//!    (ties broken by canonical value), so member order never matters.
//!
//! The output is itself compact JSON, which makes the encoding unambiguous:
//! structurally distinct values cannot produce the same text.

use std::fmt;

use crate::depth::DepthGuard;
use crate::error::{CanonicalError, ParseError};
use crate::kind::Kind;
use crate::token::{decode_string, parse_number, Token, TokenKind, TokenSource};

/// Canonical text of one JSON value.
///
/// # Invariants
///
/// - The only constructor is [`CanonicalForm::from_tokens`].
/// - Equal forms mean structurally equal values, and vice versa.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalForm(String);

impl CanonicalForm {
    /// Canonicalize the value started by `first`, consuming the rest of it
    /// from `tokens`.
    ///
    /// # Errors
    ///
    /// Returns [`CanonicalError`] if the value is malformed or nests deeper
    /// than `guard` allows.
    pub fn from_tokens<'a, T: TokenSource<'a>>(
        tokens: &mut T,
        first: Token<'a>,
        guard: &DepthGuard,
        level: usize,
    ) -> Result<Self, CanonicalError> {
        let mut out = String::new();
        write_canonical(&mut out, tokens, first, guard, level)?;
        Ok(Self(out))
    }

    /// The canonical text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Append the canonical text of the value started by `first` to `out`.
///
/// Scalars never touch `tokens`; containers consume through their end token.
///
/// # Errors
///
/// Returns [`CanonicalError`] if the value is malformed or nests deeper
/// than `guard` allows.
pub fn write_canonical<'a, T: TokenSource<'a>>(
    out: &mut String,
    tokens: &mut T,
    first: Token<'a>,
    guard: &DepthGuard,
    level: usize,
) -> Result<(), CanonicalError> {
    let kind = first
        .value_kind
        .ok_or_else(|| ParseError::new(first.offset, "expected a value"))?;
    match kind {
        Kind::Number => out.push_str(&number_canonical(first.raw, first.offset)?),
        Kind::String => {
            let decoded = decode_string(first.raw)?;
            out.push_str(&encode(&*decoded, first.offset)?);
        }
        Kind::True => out.push_str("true"),
        Kind::False => out.push_str("false"),
        Kind::Null => out.push_str("null"),
        Kind::Array => {
            let level = guard.enter(level)?;
            out.push('[');
            let mut first_element = true;
            loop {
                let token = tokens.expect_token()?;
                if token.closes(&first) {
                    break;
                }
                if !first_element {
                    out.push(',');
                }
                first_element = false;
                write_canonical(out, tokens, token, guard, level)?;
            }
            out.push(']');
        }
        Kind::Object => {
            let level = guard.enter(level)?;
            let mut members: Vec<(String, String)> = Vec::new();
            loop {
                let token = tokens.expect_token()?;
                if token.closes(&first) {
                    break;
                }
                if token.kind != TokenKind::Key {
                    return Err(ParseError::new(token.offset, "expected a member name").into());
                }
                let key = encode(&*decode_string(token.raw)?, token.offset)?;
                let value_start = tokens.expect_value()?;
                let mut value = String::new();
                write_canonical(&mut value, tokens, value_start, guard, level)?;
                members.push((key, value));
            }
            members.sort_unstable();
            out.push('{');
            for (i, (key, value)) in members.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(key);
                out.push(':');
                out.push_str(value);
            }
            out.push('}');
        }
    }
    Ok(())
}

fn number_canonical(raw: &[u8], offset: usize) -> Result<String, ParseError> {
    let value = parse_number(raw, offset)?;
    if value.is_infinite() {
        // No finite f64 prints with this exponent.
        return Ok(if value > 0.0 { "1e999" } else { "-1e999" }.to_owned());
    }
    // -0 and 0 are the same number.
    let value = if value == 0.0 { 0.0 } else { value };
    encode(&value, offset)
}

fn encode<S: serde::Serialize + ?Sized>(value: &S, offset: usize) -> Result<String, ParseError> {
    serde_jcs::to_string(&value).map_err(|_| ParseError::new(offset, "value has no canonical form"))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::scanner::Scanner;
    use proptest::prelude::*;
    use serde_json::Value;

    fn canon(input: &str) -> String {
        let mut scanner = Scanner::new(input);
        let first = scanner.expect_value().unwrap();
        CanonicalForm::from_tokens(&mut scanner, first, &DepthGuard::default(), 0)
            .unwrap()
            .as_str()
            .to_owned()
    }

    /// Strategy for JSON values whose numbers are integers (exact in `f64`).
    fn json_value() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            (-1_000_000i64..1_000_000).prop_map(|n| serde_json::json!(n)),
            "[a-zA-Z0-9_ ]{0,20}".prop_map(Value::String),
        ];
        leaf.prop_recursive(4, 48, 6, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
                prop::collection::btree_map("[a-z]{1,6}", inner, 0..6)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    /// Re-serialize with object members in reverse order.
    fn reversed(value: &Value) -> String {
        match value {
            Value::Object(map) => {
                let members: Vec<String> = map
                    .iter()
                    .rev()
                    .map(|(k, v)| format!("{}:{}", Value::String(k.clone()), reversed(v)))
                    .collect();
                format!("{{{}}}", members.join(","))
            }
            Value::Array(items) => {
                let items: Vec<String> = items.iter().map(reversed).collect();
                format!("[{}]", items.join(","))
            }
            other => other.to_string(),
        }
    }

    proptest! {
        /// Canonicalization is deterministic.
        #[test]
        fn canonical_form_deterministic(value in json_value()) {
            let text = value.to_string();
            prop_assert_eq!(canon(&text), canon(&text));
        }

        /// Member order never affects the canonical form.
        #[test]
        fn canonical_form_member_order_independent(value in json_value()) {
            prop_assert_eq!(canon(&value.to_string()), canon(&reversed(&value)));
        }

        /// Canonical output is valid JSON that denotes the same value.
        #[test]
        fn canonical_form_round_trips(value in json_value()) {
            let parsed: Value = serde_json::from_str(&canon(&value.to_string())).unwrap();
            prop_assert_eq!(parsed, value);
        }

        /// An integer and its `.0` spelling are the same canonical value.
        #[test]
        fn integer_spelling_independent(n in -1_000_000i64..1_000_000) {
            prop_assert_eq!(canon(&n.to_string()), canon(&format!("{n}.0")));
        }
    }
}
