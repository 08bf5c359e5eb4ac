//! # Schema Compilation
//!
//! Turns schema text into a [`CompiledSchema`]. Each schema node is compiled
//! in two passes over the same tokens: a look-ahead clone of the token
//! source runs the type-info extractor, then the primary cursor walks the
//! node's keywords once and fills in the variant the extractor chose.
//!
//! ## Keyword Handling
//!
//! - Annotations (`title`, `description`, `$comment`, `$schema`,
//!   `deprecated`, `readOnly`, `writeOnly`, `example`, `default`) are
//!   checked for kind and not stored.
//! - `const` and `enum` are canonicalized and stored on the node.
//! - Type-specific keywords go to the variant's handler.
//! - Unrecognized keywords are skipped whole.
//!
//! The first error anywhere aborts compilation. Nodes compiled so far live
//! in the builder's arena and are dropped with it, so a failed compile
//! leaves nothing behind.

use std::collections::HashSet;
use std::path::Path;

use regex::Regex;
use sjv_core::{
    decode_string, parse_number, CanonicalForm, DepthGuard, Kind, KindSet, ParseError, Scanner,
    Token, TokenSource,
};

use crate::config::ValidatorConfig;
use crate::error::SchemaError;
use crate::sink::{DiagnosticSink, TracingSink};
use crate::tree::{
    ArrayRules, BooleanRules, CompiledSchema, ConstraintNode, NodeBody, NodeId, NullRules,
    NumberRules, ObjectRules, StringRules,
};
use crate::type_info::{extract_type_info, member_name, parse_type_names, TypeInfo};
use crate::vocabulary::{TypeVocabulary, Variant};

/// Values `format` may take. All are annotations only.
const FORMATS: &[&str] = &[
    "date-time",
    "date",
    "time",
    "duration",
    "email",
    "idn-email",
    "hostname",
    "idn-hostname",
    "ipv4",
    "ipv6",
    "uri",
    "uri-reference",
    "iri",
    "iri-reference",
    "uuid",
    "json-pointer",
    "relative-json-pointer",
    "regex",
];

/// Values `contentEncoding` may take.
const CONTENT_ENCODINGS: &[&str] = &["Base16", "Base32", "Base64"];

/// State shared by the extractor and the compiler during one compile.
pub(crate) struct Ctx<'s> {
    pub(crate) vocabulary: &'s TypeVocabulary,
    pub(crate) guard: DepthGuard,
    sink: &'s mut dyn DiagnosticSink,
}

impl<'s> Ctx<'s> {
    pub(crate) fn new(
        vocabulary: &'s TypeVocabulary,
        guard: DepthGuard,
        sink: &'s mut dyn DiagnosticSink,
    ) -> Self {
        Self {
            vocabulary,
            guard,
            sink,
        }
    }

    /// Report `keyword` to the sink and build the matching error.
    pub(crate) fn invalid(&mut self, keyword: &str) -> SchemaError {
        self.sink.report_keyword_error(keyword);
        SchemaError::invalid(keyword)
    }
}

/// Compile schema text, reporting invalid keywords through `tracing`.
pub fn compile(text: &str, config: &ValidatorConfig) -> Result<CompiledSchema, SchemaError> {
    compile_with_sink(text, config, &mut TracingSink)
}

/// Compile schema text, reporting each invalid keyword to `sink`.
pub fn compile_with_sink(
    text: &str,
    config: &ValidatorConfig,
    sink: &mut dyn DiagnosticSink,
) -> Result<CompiledSchema, SchemaError> {
    let _span = tracing::debug_span!("compile", bytes = text.len()).entered();
    let vocabulary = config.vocabulary();
    let guard = config.depth_guard();
    let mut builder = Builder {
        nodes: Vec::new(),
        ctx: Ctx::new(&vocabulary, guard, sink),
    };

    let mut tokens = Scanner::new(text);
    let first = tokens.expect_value()?;
    let root = builder.compile_schema(&mut tokens, first, 0)?;
    tokens.finish()?;

    let schema = CompiledSchema::new(builder.nodes, root, guard);
    tracing::debug!(nodes = schema.node_count(), "schema compiled");
    Ok(schema)
}

/// Read and compile a schema file.
pub fn compile_file(path: &Path, config: &ValidatorConfig) -> Result<CompiledSchema, SchemaError> {
    let text = std::fs::read_to_string(path)?;
    compile(&text, config)
}

struct Builder<'s> {
    nodes: Vec<ConstraintNode>,
    ctx: Ctx<'s>,
}

impl<'s> Builder<'s> {
    /// Extract type info on a look-ahead cursor, then compile the node.
    fn compile_schema<'a, T: TokenSource<'a>>(
        &mut self,
        tokens: &mut T,
        first: Token<'a>,
        level: usize,
    ) -> Result<NodeId, SchemaError> {
        let mut probe = tokens.clone();
        let info = extract_type_info(&mut probe, first, &mut self.ctx, level)?;
        self.compile_node(tokens, first, &info, level)
    }

    fn compile_node<'a, T: TokenSource<'a>>(
        &mut self,
        tokens: &mut T,
        first: Token<'a>,
        info: &TypeInfo,
        level: usize,
    ) -> Result<NodeId, SchemaError> {
        if first.value_kind != Some(Kind::Object) {
            return Err(SchemaError::MissingType);
        }
        let declared = info.declared.ok_or(SchemaError::MissingType)?;
        let variant = declared.variant().ok_or_else(|| self.ctx.invalid("type"))?;
        let level = self.ctx.guard.enter(level)?;

        let body = match variant {
            Variant::Number => NodeBody::Number(NumberRules {
                integral: declared.integral,
                ..NumberRules::default()
            }),
            Variant::String => NodeBody::String(StringRules::default()),
            Variant::Array => NodeBody::Array(ArrayRules::default()),
            Variant::Object => NodeBody::Object(ObjectRules::default()),
            Variant::Boolean => NodeBody::Boolean(BooleanRules::default()),
            Variant::Null => NodeBody::Null(NullRules::default()),
        };
        let mut node = ConstraintNode::new(declared, info.key_name.clone(), body);

        loop {
            let token = tokens.expect_token()?;
            if token.closes(&first) {
                break;
            }
            let key = member_name(&token)?;
            let value = tokens.expect_value()?;
            self.keyword(tokens, &mut node, &key, value, info, level)?;
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        Ok(id)
    }

    /// Handle one keyword. Consumes `value` on every success path.
    fn keyword<'a, T: TokenSource<'a>>(
        &mut self,
        tokens: &mut T,
        node: &mut ConstraintNode,
        key: &str,
        value: Token<'a>,
        info: &TypeInfo,
        level: usize,
    ) -> Result<(), SchemaError> {
        let kind = value_kind(&value)?;
        match key {
            // Resolved by the extractor.
            "type" => tokens.skip_opened(&value)?,
            "title" | "description" | "$comment" | "$schema" => {
                if kind != Kind::String {
                    return Err(self.ctx.invalid(key));
                }
            }
            "deprecated" | "readOnly" | "writeOnly" => {
                if !kind.is_boolean() {
                    return Err(self.ctx.invalid(key));
                }
            }
            "example" => {
                if kind != Kind::Array {
                    return Err(self.ctx.invalid(key));
                }
                tokens.skip_opened(&value)?;
            }
            "default" => {
                if !node.declares(kind) {
                    return Err(self.ctx.invalid(key));
                }
                tokens.skip_opened(&value)?;
            }
            "const" | "enum" if node.body.is_literal() => {
                self.literal_keyword(tokens, node, key, value)?;
            }
            "const" => {
                let form = CanonicalForm::from_tokens(tokens, value, &self.ctx.guard, level)?;
                node.common.constant = Some(form);
            }
            "enum" => {
                if kind != Kind::Array {
                    return Err(self.ctx.invalid(key));
                }
                let mut members = HashSet::new();
                loop {
                    let element = tokens.expect_token()?;
                    if element.closes(&value) {
                        break;
                    }
                    if node.declares(value_kind(&element)?) {
                        members.insert(CanonicalForm::from_tokens(
                            tokens,
                            element,
                            &self.ctx.guard,
                            level,
                        )?);
                    } else {
                        tokens.skip_opened(&element)?;
                    }
                }
                node.common.enumeration = Some(members);
            }
            _ => match &mut node.body {
                NodeBody::Number(rules) => self.number_keyword(tokens, rules, key, value)?,
                NodeBody::String(rules) => self.string_keyword(tokens, rules, key, value)?,
                NodeBody::Array(rules) => self.array_keyword(tokens, rules, key, value, level)?,
                NodeBody::Object(rules) => {
                    self.object_keyword(tokens, rules, key, value, info, level)?
                }
                NodeBody::Boolean(_) | NodeBody::Null(_) => tokens.skip_opened(&value)?,
            },
        }
        Ok(())
    }

    /// `enum` and `const` on boolean and null nodes.
    fn literal_keyword<'a, T: TokenSource<'a>>(
        &mut self,
        tokens: &mut T,
        node: &mut ConstraintNode,
        key: &str,
        value: Token<'a>,
    ) -> Result<(), SchemaError> {
        let declared = node.common.kinds;
        let accepted = if key == "enum" {
            if value_kind(&value)? != Kind::Array {
                return Err(self.ctx.invalid(key));
            }
            let mut accepted = KindSet::empty();
            loop {
                let element = tokens.expect_token()?;
                if element.closes(&value) {
                    break;
                }
                let kind = value_kind(&element)?;
                if declared.contains(kind) {
                    accepted.insert(kind);
                }
                tokens.skip_opened(&element)?;
            }
            accepted
        } else {
            tokens.skip_opened(&value)?;
            let kind = value_kind(&value)?;
            if declared.contains(kind) {
                KindSet::single(kind)
            } else {
                KindSet::empty()
            }
        };

        match (&mut node.body, key) {
            (NodeBody::Boolean(rules), "enum") => rules.enum_literals = Some(accepted),
            (NodeBody::Boolean(rules), _) => rules.const_literals = Some(accepted),
            (NodeBody::Null(rules), "enum") => {
                rules.enum_allows_null = Some(accepted.contains(Kind::Null))
            }
            (NodeBody::Null(rules), _) => {
                rules.const_allows_null = Some(accepted.contains(Kind::Null))
            }
            _ => {}
        }
        Ok(())
    }

    fn number_keyword<'a, T: TokenSource<'a>>(
        &mut self,
        tokens: &mut T,
        rules: &mut NumberRules,
        key: &str,
        value: Token<'a>,
    ) -> Result<(), SchemaError> {
        match key {
            "minimum" => rules.minimum = Some(self.number(key, &value)?),
            "maximum" => rules.maximum = Some(self.number(key, &value)?),
            "exclusiveMinimum" => rules.exclusive_minimum = Some(self.number(key, &value)?),
            "exclusiveMaximum" => rules.exclusive_maximum = Some(self.number(key, &value)?),
            "multipleOf" => {
                let divisor = self.number(key, &value)?;
                if divisor <= 0.0 {
                    return Err(self.ctx.invalid(key));
                }
                rules.multiple_of = Some(divisor);
            }
            _ => tokens.skip_opened(&value)?,
        }
        Ok(())
    }

    fn string_keyword<'a, T: TokenSource<'a>>(
        &mut self,
        tokens: &mut T,
        rules: &mut StringRules,
        key: &str,
        value: Token<'a>,
    ) -> Result<(), SchemaError> {
        match key {
            "minLength" => rules.min_length = Some(self.count(key, &value)?),
            "maxLength" => rules.max_length = Some(self.count(key, &value)?),
            "pattern" => {
                let source = self.string(key, &value)?;
                let regex = Regex::new(&source).map_err(|_| self.ctx.invalid(key))?;
                rules.pattern = Some(regex);
            }
            "format" => {
                let format = self.string(key, &value)?;
                if !FORMATS.contains(&format.as_str()) {
                    return Err(self.ctx.invalid(key));
                }
            }
            "contentEncoding" => {
                let encoding = self.string(key, &value)?;
                if !CONTENT_ENCODINGS.contains(&encoding.as_str()) {
                    return Err(self.ctx.invalid(key));
                }
            }
            "contentMediaType" => {
                self.string(key, &value)?;
            }
            "contentSchema" => {
                if value_kind(&value)? != Kind::Object {
                    return Err(self.ctx.invalid(key));
                }
                tokens.skip_opened(&value)?;
            }
            _ => tokens.skip_opened(&value)?,
        }
        Ok(())
    }

    fn array_keyword<'a, T: TokenSource<'a>>(
        &mut self,
        tokens: &mut T,
        rules: &mut ArrayRules,
        key: &str,
        value: Token<'a>,
        level: usize,
    ) -> Result<(), SchemaError> {
        match key {
            "minItems" => rules.min_items = Some(self.count(key, &value)?),
            "maxItems" => rules.max_items = Some(self.count(key, &value)?),
            "minContains" => rules.min_contains = Some(self.count(key, &value)?),
            "maxContains" => rules.max_contains = Some(self.count(key, &value)?),
            "items" => match value_kind(&value)? {
                Kind::Object => loop {
                    let token = tokens.expect_token()?;
                    if token.closes(&value) {
                        break;
                    }
                    let member = member_name(&token)?;
                    let member_value = tokens.expect_value()?;
                    if member == "type" {
                        rules.item_kinds =
                            Some(parse_type_names(tokens, member_value, &mut self.ctx, key)?);
                    } else {
                        tokens.skip_opened(&member_value)?;
                    }
                },
                Kind::True => {}
                Kind::False => rules.allow_additional_items = false,
                _ => return Err(self.ctx.invalid(key)),
            },
            "contains" => {
                if value_kind(&value)? != Kind::Object {
                    return Err(self.ctx.invalid(key));
                }
                loop {
                    let token = tokens.expect_token()?;
                    if token.closes(&value) {
                        break;
                    }
                    if member_name(&token)? != "type" {
                        return Err(self.ctx.invalid(key));
                    }
                    let member_value = tokens.expect_value()?;
                    rules.contains_kinds =
                        Some(parse_type_names(tokens, member_value, &mut self.ctx, key)?);
                }
            }
            "uniqueItems" => rules.unique_items = self.boolean(key, &value)?,
            "prefixItems" => {
                if value_kind(&value)? != Kind::Array {
                    return Err(self.ctx.invalid(key));
                }
                let mut prefix = Vec::new();
                loop {
                    let element = tokens.expect_token()?;
                    if element.closes(&value) {
                        break;
                    }
                    prefix.push(self.compile_schema(tokens, element, level)?);
                }
                rules.prefix_items = prefix;
            }
            _ => tokens.skip_opened(&value)?,
        }
        Ok(())
    }

    fn object_keyword<'a, T: TokenSource<'a>>(
        &mut self,
        tokens: &mut T,
        rules: &mut ObjectRules,
        key: &str,
        value: Token<'a>,
        info: &TypeInfo,
        level: usize,
    ) -> Result<(), SchemaError> {
        match key {
            "properties" => {
                if value_kind(&value)? != Kind::Object {
                    return Err(self.ctx.invalid(key));
                }
                // A repeated `properties` is superseded by the last one.
                if info.properties_at != Some(value.offset) {
                    tokens.skip_opened(&value)?;
                    return Ok(());
                }
                loop {
                    let token = tokens.expect_token()?;
                    if token.closes(&value) {
                        break;
                    }
                    let name = member_name(&token)?.into_owned();
                    let schema = tokens.expect_value()?;
                    let id = match info.properties.get(&name) {
                        Some(nested) => self.compile_node(tokens, schema, nested, level)?,
                        None => self.compile_schema(tokens, schema, level)?,
                    };
                    rules.properties.insert(name, id);
                }
            }
            "required" => rules.required = self.string_array(tokens, key, value)?,
            "minProperties" => rules.min_properties = Some(self.count(key, &value)?),
            "maxProperties" => rules.max_properties = Some(self.count(key, &value)?),
            "additionalProperties" => rules.additional_properties = self.boolean(key, &value)?,
            "dependentRequired" => {
                if value_kind(&value)? != Kind::Object {
                    return Err(self.ctx.invalid(key));
                }
                let mut dependents = Vec::new();
                loop {
                    let token = tokens.expect_token()?;
                    if token.closes(&value) {
                        break;
                    }
                    let trigger = member_name(&token)?.into_owned();
                    let names = tokens.expect_value()?;
                    dependents.push((trigger, self.string_array(tokens, key, names)?));
                }
                rules.dependent_required = dependents;
            }
            _ => tokens.skip_opened(&value)?,
        }
        Ok(())
    }

    /// A numeric keyword value.
    fn number(&mut self, key: &str, value: &Token<'_>) -> Result<f64, SchemaError> {
        if value_kind(value)? != Kind::Number {
            return Err(self.ctx.invalid(key));
        }
        Ok(parse_number(value.raw, value.offset)?)
    }

    /// A non-negative count, truncated toward zero.
    fn count(&mut self, key: &str, value: &Token<'_>) -> Result<usize, SchemaError> {
        let number = self.number(key, value)?;
        if number < 0.0 {
            return Err(self.ctx.invalid(key));
        }
        // Saturates for counts beyond usize.
        Ok(number as usize)
    }

    fn boolean(&mut self, key: &str, value: &Token<'_>) -> Result<bool, SchemaError> {
        match value_kind(value)? {
            Kind::True => Ok(true),
            Kind::False => Ok(false),
            _ => Err(self.ctx.invalid(key)),
        }
    }

    fn string(&mut self, key: &str, value: &Token<'_>) -> Result<String, SchemaError> {
        if value_kind(value)? != Kind::String {
            return Err(self.ctx.invalid(key));
        }
        Ok(decode_string(value.raw)?.into_owned())
    }

    /// An array of strings. Consumes the array.
    fn string_array<'a, T: TokenSource<'a>>(
        &mut self,
        tokens: &mut T,
        key: &str,
        value: Token<'a>,
    ) -> Result<Vec<String>, SchemaError> {
        if value_kind(&value)? != Kind::Array {
            return Err(self.ctx.invalid(key));
        }
        let mut names = Vec::new();
        loop {
            let element = tokens.expect_token()?;
            if element.closes(&value) {
                break;
            }
            names.push(self.string(key, &element)?);
        }
        Ok(names)
    }
}

/// Kind of a token that must start a value.
fn value_kind(token: &Token<'_>) -> Result<Kind, ParseError> {
    token
        .value_kind
        .ok_or_else(|| ParseError::new(token.offset, "expected a value"))
}
