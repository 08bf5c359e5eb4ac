//! # Constraint Tree
//!
//! The compiled form of a schema: a closed set of node variants stored in
//! one arena owned by [`CompiledSchema`]. Children are referenced by
//! [`NodeId`], so dropping the schema frees the whole tree at once.
//!
//! A compiled schema is immutable. Compiled patterns are `regex::Regex`
//! values, which keep their search state per caller, so a schema can be
//! shared across threads and validated against concurrently.

use std::collections::{HashMap, HashSet};

use regex::Regex;
use sjv_core::{CanonicalForm, DepthGuard, Kind, KindSet};

use crate::vocabulary::DeclaredType;

/// Index of a node in its schema's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// A compiled schema.
#[derive(Debug)]
pub struct CompiledSchema {
    pub(crate) nodes: Vec<ConstraintNode>,
    pub(crate) root: NodeId,
    pub(crate) guard: DepthGuard,
}

impl CompiledSchema {
    pub(crate) fn new(nodes: Vec<ConstraintNode>, root: NodeId, guard: DepthGuard) -> Self {
        Self { nodes, root, guard }
    }

    /// The root node.
    pub fn root(&self) -> &ConstraintNode {
        self.node(self.root)
    }

    /// Look up a node by id.
    ///
    /// Ids handed out by a schema always index that schema's arena.
    pub fn node(&self, id: NodeId) -> &ConstraintNode {
        &self.nodes[id.0]
    }

    /// Number of compiled nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

/// One compiled schema node.
#[derive(Debug)]
pub struct ConstraintNode {
    pub common: Common,
    pub body: NodeBody,
}

impl ConstraintNode {
    pub(crate) fn new(declared: DeclaredType, key_name: Option<String>, body: NodeBody) -> Self {
        Self {
            common: Common {
                kinds: declared.kinds,
                key_name,
                constant: None,
                enumeration: None,
            },
            body,
        }
    }

    /// Returns true if documents of `kind` can match this node.
    pub fn declares(&self, kind: Kind) -> bool {
        self.common.kinds.contains(kind)
    }
}

/// Constraints every variant carries.
#[derive(Debug)]
pub struct Common {
    /// Declared kinds, fixed at creation.
    pub kinds: KindSet,
    /// Member name, for nodes compiled from `properties`.
    pub key_name: Option<String>,
    /// `const`, canonicalized.
    pub constant: Option<CanonicalForm>,
    /// `enum`, canonicalized. Holds only values of a declared kind.
    pub enumeration: Option<HashSet<CanonicalForm>>,
}

/// Type-specific constraints.
#[derive(Debug)]
pub enum NodeBody {
    Number(NumberRules),
    String(StringRules),
    Array(ArrayRules),
    Object(ObjectRules),
    Boolean(BooleanRules),
    Null(NullRules),
}

impl NodeBody {
    /// Returns true for the variants whose `enum` and `const` are literal flags.
    pub fn is_literal(&self) -> bool {
        matches!(self, NodeBody::Boolean(_) | NodeBody::Null(_))
    }
}

#[derive(Debug, Default)]
pub struct NumberRules {
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub exclusive_minimum: Option<f64>,
    pub exclusive_maximum: Option<f64>,
    /// Always strictly positive.
    pub multiple_of: Option<f64>,
    /// Set by the `integer` type name.
    pub integral: bool,
}

#[derive(Debug, Default)]
pub struct StringRules {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<Regex>,
}

#[derive(Debug)]
pub struct ArrayRules {
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
    pub min_contains: Option<usize>,
    pub max_contains: Option<usize>,
    /// Kinds every element must have, from `items`.
    pub item_kinds: Option<DeclaredType>,
    /// Kinds counted by `minContains`/`maxContains`, from `contains`.
    pub contains_kinds: Option<DeclaredType>,
    pub unique_items: bool,
    /// Cleared by `items: false`.
    pub allow_additional_items: bool,
    pub prefix_items: Vec<NodeId>,
}

impl Default for ArrayRules {
    fn default() -> Self {
        Self {
            min_items: None,
            max_items: None,
            min_contains: None,
            max_contains: None,
            item_kinds: None,
            contains_kinds: None,
            unique_items: false,
            allow_additional_items: true,
            prefix_items: Vec::new(),
        }
    }
}

#[derive(Debug)]
pub struct ObjectRules {
    pub properties: HashMap<String, NodeId>,
    pub required: Vec<String>,
    pub dependent_required: Vec<(String, Vec<String>)>,
    pub min_properties: Option<usize>,
    pub max_properties: Option<usize>,
    pub additional_properties: bool,
}

impl ObjectRules {
    /// Returns true if validation has to remember member names.
    pub fn tracks_presence(&self) -> bool {
        !self.required.is_empty() || !self.dependent_required.is_empty()
    }
}

impl Default for ObjectRules {
    fn default() -> Self {
        Self {
            properties: HashMap::new(),
            required: Vec::new(),
            dependent_required: Vec::new(),
            min_properties: None,
            max_properties: None,
            additional_properties: true,
        }
    }
}

/// `enum` and `const` for a boolean node, as the literals they accept.
#[derive(Debug, Default)]
pub struct BooleanRules {
    pub enum_literals: Option<KindSet>,
    pub const_literals: Option<KindSet>,
}

/// `enum` and `const` for a null node: whether `null` is accepted.
#[derive(Debug, Default)]
pub struct NullRules {
    pub enum_allows_null: Option<bool>,
    pub const_allows_null: Option<bool>,
}
