//! # Type-Info Extraction
//!
//! A look-ahead pass over one schema object that records its declared type
//! and, through `properties`, the declared types of its members. The
//! compiler uses the result to choose a node variant before it walks the
//! node's keywords.
//!
//! Every key other than `type` and `properties` is skipped whole, so the
//! pass stays aligned with the token stream however the schema nests.

use std::borrow::Cow;
use std::collections::HashMap;

use sjv_core::{decode_string, Kind, ParseError, Token, TokenKind, TokenSource};

use crate::compile::Ctx;
use crate::error::SchemaError;
use crate::vocabulary::DeclaredType;

/// Declared types of one schema node and its named members.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeInfo {
    /// The resolved `type`, always present after a successful extraction.
    pub declared: Option<DeclaredType>,
    /// Member name this node was declared under.
    pub key_name: Option<String>,
    /// Type info per member of `properties`.
    pub properties: HashMap<String, TypeInfo>,
    /// Offset of the `properties` value in effect. When the keyword is
    /// repeated, the last occurrence wins.
    pub properties_at: Option<usize>,
}

/// Extract type info from the schema object started by `first`.
///
/// Consumes the object through its end token.
pub(crate) fn extract_type_info<'a, T: TokenSource<'a>>(
    tokens: &mut T,
    first: Token<'a>,
    ctx: &mut Ctx<'_>,
    level: usize,
) -> Result<TypeInfo, SchemaError> {
    if first.value_kind != Some(Kind::Object) {
        return Err(SchemaError::MissingType);
    }
    let level = ctx.guard.enter(level)?;

    let mut info = TypeInfo::default();
    loop {
        let token = tokens.expect_token()?;
        if token.closes(&first) {
            break;
        }
        let key = member_name(&token)?;
        let value = tokens.expect_value()?;
        match &*key {
            "type" => {
                let declared = parse_type_names(tokens, value, ctx, "type")?;
                if declared.variant().is_none() {
                    return Err(ctx.invalid("type"));
                }
                info.declared = Some(declared);
            }
            "properties" => {
                if value.value_kind != Some(Kind::Object) {
                    return Err(ctx.invalid("properties"));
                }
                let mut properties = HashMap::new();
                loop {
                    let member = tokens.expect_token()?;
                    if member.closes(&value) {
                        break;
                    }
                    let name = member_name(&member)?.into_owned();
                    if properties.contains_key(&name) {
                        return Err(ctx.invalid("properties"));
                    }
                    let schema = tokens.expect_value()?;
                    let mut nested = extract_type_info(tokens, schema, ctx, level)?;
                    nested.key_name = Some(name.clone());
                    properties.insert(name, nested);
                }
                info.properties = properties;
                info.properties_at = Some(value.offset);
            }
            _ => tokens.skip_opened(&value)?,
        }
    }

    if info.declared.is_none() {
        return Err(SchemaError::MissingType);
    }
    Ok(info)
}

/// Resolve a type declaration: one name or a non-empty array of names.
///
/// Consumes the value. Failures are reported against `keyword`.
pub(crate) fn parse_type_names<'a, T: TokenSource<'a>>(
    tokens: &mut T,
    value: Token<'a>,
    ctx: &mut Ctx<'_>,
    keyword: &str,
) -> Result<DeclaredType, SchemaError> {
    match value.value_kind {
        Some(Kind::String) => resolve_name(&value, ctx, keyword),
        Some(Kind::Array) => {
            let mut declared: Option<DeclaredType> = None;
            loop {
                let token = tokens.expect_token()?;
                if token.closes(&value) {
                    break;
                }
                if token.value_kind != Some(Kind::String) {
                    return Err(ctx.invalid(keyword));
                }
                let entry = resolve_name(&token, ctx, keyword)?;
                declared = Some(match declared {
                    Some(d) => d.merge(entry),
                    None => entry,
                });
            }
            declared.ok_or_else(|| ctx.invalid(keyword))
        }
        _ => Err(ctx.invalid(keyword)),
    }
}

fn resolve_name(
    token: &Token<'_>,
    ctx: &mut Ctx<'_>,
    keyword: &str,
) -> Result<DeclaredType, SchemaError> {
    let name = decode_string(token.raw)?;
    ctx.vocabulary
        .resolve(&name)
        .ok_or_else(|| ctx.invalid(keyword))
}

/// Decode an object member name.
pub(crate) fn member_name<'a>(token: &Token<'a>) -> Result<Cow<'a, str>, ParseError> {
    if token.kind != TokenKind::Key {
        return Err(ParseError::new(token.offset, "expected a member name"));
    }
    decode_string(token.raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::{TypeVocabulary, Variant};
    use sjv_core::{DepthGuard, Scanner};

    fn extract_with(
        text: &str,
        vocabulary: &TypeVocabulary,
        guard: DepthGuard,
        sink: &mut Vec<String>,
    ) -> Result<TypeInfo, SchemaError> {
        let mut ctx = Ctx::new(vocabulary, guard, sink);
        let mut scanner = Scanner::new(text);
        let first = scanner.expect_value()?;
        let info = extract_type_info(&mut scanner, first, &mut ctx, 0)?;
        scanner.finish()?;
        Ok(info)
    }

    fn extract(text: &str) -> Result<TypeInfo, SchemaError> {
        extract_with(text, &TypeVocabulary::strict(), DepthGuard::default(), &mut Vec::new())
    }

    fn variant(info: &TypeInfo) -> Option<Variant> {
        info.declared.and_then(|d| d.variant())
    }

    #[test]
    fn test_single_type() {
        let info = extract(r#"{"type":"number","minimum":1}"#).unwrap();
        assert_eq!(variant(&info), Some(Variant::Number));
        assert!(info.properties.is_empty());
    }

    #[test]
    fn test_nested_properties() {
        let info = extract(
            r#"{"type":"object","properties":{"a":{"type":"string"},"b":{"type":"object","properties":{"c":{"type":"null"}}}}}"#,
        )
        .unwrap();
        let a = &info.properties["a"];
        assert_eq!(variant(a), Some(Variant::String));
        assert_eq!(a.key_name.as_deref(), Some("a"));
        let c = &info.properties["b"].properties["c"];
        assert_eq!(variant(c), Some(Variant::Null));
    }

    #[test]
    fn test_other_keys_skipped_whole() {
        let info = extract(
            r#"{"title":"t","enum":[{"type":"string"}],"prefixItems":[[{"x":[1,2]}]],"type":"array"}"#,
        )
        .unwrap();
        assert_eq!(variant(&info), Some(Variant::Array));
    }

    #[test]
    fn test_missing_type() {
        assert!(matches!(
            extract(r#"{"minimum":1}"#),
            Err(SchemaError::MissingType)
        ));
        assert!(matches!(extract("[]"), Err(SchemaError::MissingType)));
    }

    #[test]
    fn test_nested_missing_type() {
        let err = extract(r#"{"type":"object","properties":{"a":{}}}"#).unwrap_err();
        assert!(matches!(err, SchemaError::MissingType));
    }

    #[test]
    fn test_unknown_type_name_reported_once() {
        let mut sink = Vec::new();
        let err = extract_with(
            r#"{"type":"boolean"}"#,
            &TypeVocabulary::strict(),
            DepthGuard::default(),
            &mut sink,
        )
        .unwrap_err();
        assert_eq!(err.keyword(), Some("type"));
        assert_eq!(sink, vec!["type".to_owned()]);
    }

    #[test]
    fn test_literal_pair_accepted() {
        let info = extract(r#"{"type":["true","false"]}"#).unwrap();
        assert_eq!(variant(&info), Some(Variant::Boolean));
        assert_eq!(info.declared.unwrap().kinds.len(), 2);
    }

    #[test]
    fn test_mixed_variants_rejected() {
        let err = extract(r#"{"type":["number","string"]}"#).unwrap_err();
        assert_eq!(err.keyword(), Some("type"));
    }

    #[test]
    fn test_empty_type_array_rejected() {
        assert_eq!(extract(r#"{"type":[]}"#).unwrap_err().keyword(), Some("type"));
    }

    #[test]
    fn test_non_string_type_rejected() {
        assert_eq!(extract(r#"{"type":7}"#).unwrap_err().keyword(), Some("type"));
        assert_eq!(extract(r#"{"type":[1]}"#).unwrap_err().keyword(), Some("type"));
    }

    #[test]
    fn test_properties_must_be_object() {
        let err = extract(r#"{"type":"object","properties":[]}"#).unwrap_err();
        assert_eq!(err.keyword(), Some("properties"));
    }

    #[test]
    fn test_last_properties_wins() {
        let text = r#"{"type":"object","properties":{"a":{"type":"string"}},"properties":{"b":{"type":"number"}}}"#;
        let info = extract(text).unwrap();
        assert!(!info.properties.contains_key("a"));
        assert!(info.properties.contains_key("b"));
        assert_eq!(info.properties_at, text.rfind(r#"{"b""#));
    }

    #[test]
    fn test_duplicate_property_name_rejected() {
        let mut sink = Vec::new();
        let err = extract_with(
            r#"{"type":"object","properties":{"a":{"type":"number","default":1},"a":{"type":"string"}}}"#,
            &TypeVocabulary::strict(),
            DepthGuard::default(),
            &mut sink,
        )
        .unwrap_err();
        assert_eq!(err.keyword(), Some("properties"));
        assert_eq!(sink, vec!["properties".to_owned()]);
    }

    #[test]
    fn test_same_name_in_sibling_objects_allowed() {
        let info = extract(
            r#"{"type":"object","properties":{"a":{"type":"object","properties":{"a":{"type":"null"}}}}}"#,
        )
        .unwrap();
        assert!(info.properties["a"].properties.contains_key("a"));
    }

    #[test]
    fn test_extended_vocabulary() {
        let info = extract_with(
            r#"{"type":"integer"}"#,
            &TypeVocabulary::extended(),
            DepthGuard::default(),
            &mut Vec::new(),
        )
        .unwrap();
        assert!(info.declared.unwrap().integral);
    }

    #[test]
    fn test_depth_guard() {
        let err = extract_with(
            r#"{"type":"object","properties":{"a":{"type":"object","properties":{"b":{"type":"null"}}}}}"#,
            &TypeVocabulary::strict(),
            DepthGuard::new(2),
            &mut Vec::new(),
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::StackOverflowGuard { limit: 2 }));
    }
}
