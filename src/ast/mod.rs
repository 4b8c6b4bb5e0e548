mod chars;
mod node;

pub use chars::{Char, CharKind};
pub use node::{
    Alternative, Assertion, AssertionKind, BackrefTarget, Backreference, CharacterClass,
    ClassRange, Disjunction, Group, GroupKind, Node, NodeType, RegExp, Repetition,
};
