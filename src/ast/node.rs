use serde::{Deserialize, Serialize};
use std::fmt;

use super::Char;
use crate::flags::Flags;

/// A node of the pattern tree. Serialized with a `type` discriminator
/// naming the variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Node {
    RegExp(RegExp),
    Alternative(Alternative),
    Disjunction(Disjunction),
    Group(Group),
    Backreference(Backreference),
    Assertion(Assertion),
    Char(Char),
    CharacterClass(CharacterClass),
    ClassRange(ClassRange),
    Repetition(Repetition),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeType {
    RegExp,
    Alternative,
    Disjunction,
    Group,
    Backreference,
    Assertion,
    Char,
    CharacterClass,
    ClassRange,
    Repetition,
}

impl NodeType {
    pub const ALL: [NodeType; 10] = [
        NodeType::RegExp,
        NodeType::Alternative,
        NodeType::Disjunction,
        NodeType::Group,
        NodeType::Backreference,
        NodeType::Assertion,
        NodeType::Char,
        NodeType::CharacterClass,
        NodeType::ClassRange,
        NodeType::Repetition,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::RegExp => "RegExp",
            NodeType::Alternative => "Alternative",
            NodeType::Disjunction => "Disjunction",
            NodeType::Group => "Group",
            NodeType::Backreference => "Backreference",
            NodeType::Assertion => "Assertion",
            NodeType::Char => "Char",
            NodeType::CharacterClass => "CharacterClass",
            NodeType::ClassRange => "ClassRange",
            NodeType::Repetition => "Repetition",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegExp {
    pub body: Box<Node>,
    pub flags: Flags,
}

impl RegExp {
    pub fn new(body: Node, flags: Flags) -> Self {
        Self {
            body: Box::new(body),
            flags,
        }
    }

    /// Capturing groups in numbering order as `(number, name)` pairs.
    pub fn capture_groups(&self) -> Vec<(usize, Option<String>)> {
        let mut out = Vec::new();
        self.body.collect_capture_groups(&mut out);
        out.sort_by_key(|(number, _)| *number);
        out
    }
}

/// Ordered concatenation. An empty alternative matches the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alternative {
    pub expressions: Vec<Node>,
}

impl Alternative {
    pub fn new(expressions: Vec<Node>) -> Self {
        Self { expressions }
    }

    pub fn is_empty(&self) -> bool {
        self.expressions.is_empty()
    }
}

/// Ordered choice. Branch order decides match priority and is never
/// changed by any rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disjunction {
    pub branches: Vec<Node>,
}

impl Disjunction {
    pub fn new(branches: Vec<Node>) -> Self {
        Self { branches }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    #[serde(flatten)]
    pub kind: GroupKind,
    pub expression: Box<Node>,
}

impl Group {
    pub fn new(kind: GroupKind, expression: Node) -> Self {
        Self {
            kind,
            expression: Box::new(expression),
        }
    }

    pub fn is_capturing(&self) -> bool {
        matches!(self.kind, GroupKind::Capturing { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum GroupKind {
    Capturing {
        number: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    NonCapturing,
    Lookahead,
    NegativeLookahead,
    Lookbehind,
    NegativeLookbehind,
}

impl GroupKind {
    pub fn is_lookaround(&self) -> bool {
        matches!(
            self,
            Self::Lookahead | Self::NegativeLookahead | Self::Lookbehind | Self::NegativeLookbehind
        )
    }

    pub fn is_lookbehind(&self) -> bool {
        matches!(self, Self::Lookbehind | Self::NegativeLookbehind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Backreference {
    pub target: BackrefTarget,
    /// Capturing-group number the reference resolves to.
    pub number: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackrefTarget {
    Number(usize),
    Name(String),
}

impl fmt::Display for BackrefTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackrefTarget::Number(n) => write!(f, "{n}"),
            BackrefTarget::Name(name) => write!(f, "k<{name}>"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assertion {
    pub kind: AssertionKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssertionKind {
    Start,
    End,
    WordBoundary,
    NonWordBoundary,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterClass {
    #[serde(default)]
    pub negated: bool,
    /// `Char` and `ClassRange` nodes only.
    pub members: Vec<Node>,
}

/// Inclusive range between two class members. Both endpoints denote a code
/// point and `from` never exceeds `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassRange {
    pub from: Char,
    pub to: Char,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repetition {
    pub expression: Box<Node>,
    pub min: u32,
    /// `None` is unbounded.
    pub max: Option<u32>,
    pub greedy: bool,
}

impl Repetition {
    pub fn new(expression: Node, min: u32, max: Option<u32>, greedy: bool) -> Self {
        Self {
            expression: Box::new(expression),
            min,
            max,
            greedy,
        }
    }
}

impl Node {
    /// The empty alternative.
    pub fn empty() -> Self {
        Node::Alternative(Alternative::default())
    }

    pub fn node_type(&self) -> NodeType {
        match self {
            Node::RegExp(_) => NodeType::RegExp,
            Node::Alternative(_) => NodeType::Alternative,
            Node::Disjunction(_) => NodeType::Disjunction,
            Node::Group(_) => NodeType::Group,
            Node::Backreference(_) => NodeType::Backreference,
            Node::Assertion(_) => NodeType::Assertion,
            Node::Char(_) => NodeType::Char,
            Node::CharacterClass(_) => NodeType::CharacterClass,
            Node::ClassRange(_) => NodeType::ClassRange,
            Node::Repetition(_) => NodeType::Repetition,
        }
    }

    pub fn is_empty_alternative(&self) -> bool {
        matches!(self, Node::Alternative(alt) if alt.is_empty())
    }

    pub fn as_regexp(&self) -> Option<&RegExp> {
        match self {
            Node::RegExp(re) => Some(re),
            _ => None,
        }
    }

    pub fn as_regexp_mut(&mut self) -> Option<&mut RegExp> {
        match self {
            Node::RegExp(re) => Some(re),
            _ => None,
        }
    }

    /// Direct children in semantic order. `ClassRange` endpoints are part
    /// of the range and are not children.
    pub fn children(&self) -> Vec<&Node> {
        match self {
            Node::RegExp(re) => vec![re.body.as_ref()],
            Node::Alternative(alt) => alt.expressions.iter().collect(),
            Node::Disjunction(dis) => dis.branches.iter().collect(),
            Node::Group(group) => vec![group.expression.as_ref()],
            Node::Repetition(rep) => vec![rep.expression.as_ref()],
            Node::CharacterClass(class) => class.members.iter().collect(),
            Node::Backreference(_) | Node::Assertion(_) | Node::Char(_) | Node::ClassRange(_) => {
                Vec::new()
            }
        }
    }

    /// Number of nodes in this subtree, the node itself included.
    pub fn node_count(&self) -> usize {
        1 + self
            .children()
            .into_iter()
            .map(Node::node_count)
            .sum::<usize>()
    }

    pub fn contains_capturing_group(&self) -> bool {
        if let Node::Group(group) = self
            && group.is_capturing()
        {
            return true;
        }
        self.children()
            .into_iter()
            .any(Node::contains_capturing_group)
    }

    fn collect_capture_groups(&self, out: &mut Vec<(usize, Option<String>)>) {
        if let Node::Group(Group {
            kind: GroupKind::Capturing { number, name },
            ..
        }) = self
        {
            out.push((*number, name.clone()));
        }
        for child in self.children() {
            child.collect_capture_groups(out);
        }
    }
}

impl From<Char> for Node {
    fn from(ch: Char) -> Self {
        Node::Char(ch)
    }
}

impl From<Repetition> for Node {
    fn from(rep: Repetition) -> Self {
        Node::Repetition(rep)
    }
}

impl From<Group> for Node {
    fn from(group: Group) -> Self {
        Node::Group(group)
    }
}

impl From<CharacterClass> for Node {
    fn from(class: CharacterClass) -> Self {
        Node::CharacterClass(class)
    }
}
