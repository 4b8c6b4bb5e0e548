use hashbrown::HashMap as FastHashMap;
use smallvec::SmallVec;

use crate::ast::{
    Alternative, Assertion, BackrefTarget, Backreference, CharacterClass, ClassRange, Disjunction,
    Group, GroupKind, Node, NodeType, RegExp, Repetition,
};
use crate::errors::RegexpTreeResult;
use crate::flags::Flags;
use crate::traverse::{Handlers, traverse};

use super::token::{GroupOpen, Token, TokenKind};
use super::{ParseError, ParseResult, tokenize};

/// Deepest group nesting the recursive descent accepts.
pub const MAX_NESTING_DEPTH: usize = 256;

const END_OF_INPUT: &str = "end of input";

/// Parses a pattern body (no delimiters) into a `RegExp` root.
#[tracing::instrument(level = "trace", skip(body), fields(body_len = body.len() as u64, flags = %flags))]
pub fn parse_body(body: &str, flags: Flags) -> RegexpTreeResult<Node> {
    let tokens = tokenize(body)?;
    let mut parser = Parser::new(&tokens);
    let pattern = parser.parse_disjunction()?;
    if let Some(token) = parser.peek() {
        return Err(ParseError::UnmatchedClosingParen {
            offset: token.offset,
        }
        .into());
    }

    let mut root = Node::RegExp(RegExp::new(pattern, flags));
    parser.resolve_references(&mut root)?;
    Ok(root)
}

struct Parser<'t, 'a> {
    tokens: &'t [Token<'a>],
    index: usize,
    capture_count: usize,
    group_names: FastHashMap<String, usize>,
    // (target, offset) in source order, checked once every group is known
    references: SmallVec<[(BackrefTarget, usize); 4]>,
    depth: usize,
}

impl<'t, 'a> Parser<'t, 'a> {
    fn new(tokens: &'t [Token<'a>]) -> Self {
        Self {
            tokens,
            index: 0,
            capture_count: 0,
            group_names: FastHashMap::new(),
            references: SmallVec::new(),
            depth: 0,
        }
    }

    fn parse_disjunction(&mut self) -> ParseResult<Node> {
        let mut branches = vec![self.parse_alternative()?];
        while self.peek().is_some_and(|token| token.kind == TokenKind::Bar) {
            self.index += 1;
            branches.push(self.parse_alternative()?);
        }

        if branches.len() == 1 {
            Ok(branches.swap_remove(0))
        } else {
            Ok(Node::Disjunction(Disjunction::new(branches)))
        }
    }

    fn parse_alternative(&mut self) -> ParseResult<Node> {
        let mut expressions = Vec::new();
        while let Some(token) = self.peek() {
            if matches!(token.kind, TokenKind::Bar | TokenKind::GroupClose) {
                break;
            }
            expressions.push(self.parse_term()?);
        }

        if expressions.len() == 1 {
            Ok(expressions.swap_remove(0))
        } else {
            Ok(Node::Alternative(Alternative::new(expressions)))
        }
    }

    fn parse_term(&mut self) -> ParseResult<Node> {
        let (atom, quantifiable) = self.parse_atom()?;

        let Some(token) = self.peek() else {
            return Ok(atom);
        };
        let TokenKind::Quantifier { min, max, greedy } = token.kind else {
            return Ok(atom);
        };
        if !quantifiable {
            return Err(ParseError::NothingToRepeat {
                offset: token.offset,
            });
        }
        if let Some(max) = max
            && max < min
        {
            return Err(ParseError::RepetitionOutOfOrder {
                offset: token.offset,
                min,
                max,
            });
        }
        self.index += 1;

        if let Some(next) = self.peek()
            && next.kind.is_quantifier()
        {
            return Err(ParseError::NothingToRepeat {
                offset: next.offset,
            });
        }
        Ok(Node::Repetition(Repetition::new(atom, min, max, greedy)))
    }

    /// Returns the atom and whether a quantifier may follow it.
    fn parse_atom(&mut self) -> ParseResult<(Node, bool)> {
        let tokens = self.tokens;
        let token = &tokens[self.index];
        self.index += 1;

        match &token.kind {
            TokenKind::Char(ch) => Ok((Node::Char(ch.clone()), true)),
            TokenKind::Assertion(kind) => Ok((Node::Assertion(Assertion { kind: *kind }), false)),
            TokenKind::Backreference(target) => {
                self.references.push((target.clone(), token.offset));
                let node = Node::Backreference(Backreference {
                    target: target.clone(),
                    number: 0,
                });
                Ok((node, true))
            }
            TokenKind::ClassOpen { negated } => Ok((self.parse_class(*negated, token.offset)?, true)),
            TokenKind::GroupOpen(open) => {
                let group = self.parse_group(open, token.offset)?;
                let quantifiable = !group.kind.is_lookbehind();
                Ok((Node::Group(group), quantifiable))
            }
            TokenKind::Quantifier { .. } => Err(ParseError::NothingToRepeat {
                offset: token.offset,
            }),
            TokenKind::ClassClose | TokenKind::GroupClose | TokenKind::Bar => {
                Err(ParseError::UnexpectedToken {
                    offset: token.offset,
                    found: token.raw.to_string(),
                })
            }
        }
    }

    fn parse_group(&mut self, open: &GroupOpen, offset: usize) -> ParseResult<Group> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(ParseError::NestingTooDeep {
                offset,
                limit: MAX_NESTING_DEPTH,
            });
        }

        let kind = match open {
            GroupOpen::Capturing => GroupKind::Capturing {
                number: self.next_capture_number(),
                name: None,
            },
            GroupOpen::Named(name) => {
                if self.group_names.contains_key(name) {
                    return Err(ParseError::DuplicateGroupName {
                        name: name.clone(),
                        offset,
                    });
                }
                let number = self.next_capture_number();
                self.group_names.insert(name.clone(), number);
                GroupKind::Capturing {
                    number,
                    name: Some(name.clone()),
                }
            }
            GroupOpen::NonCapturing => GroupKind::NonCapturing,
            GroupOpen::Lookahead => GroupKind::Lookahead,
            GroupOpen::NegativeLookahead => GroupKind::NegativeLookahead,
            GroupOpen::Lookbehind => GroupKind::Lookbehind,
            GroupOpen::NegativeLookbehind => GroupKind::NegativeLookbehind,
        };

        self.depth += 1;
        let expression = self.parse_disjunction()?;
        self.depth -= 1;

        match self.peek() {
            Some(token) if token.kind == TokenKind::GroupClose => {
                self.index += 1;
                Ok(Group::new(kind, expression))
            }
            Some(token) => Err(ParseError::UnterminatedGroup {
                offset,
                found: token.raw.to_string(),
            }),
            None => Err(ParseError::UnterminatedGroup {
                offset,
                found: END_OF_INPUT.to_string(),
            }),
        }
    }

    fn parse_class(&mut self, negated: bool, offset: usize) -> ParseResult<Node> {
        let tokens = self.tokens;
        let mut members = Vec::new();
        loop {
            let Some(token) = tokens.get(self.index) else {
                return Err(ParseError::UnterminatedClass { offset });
            };
            self.index += 1;

            let from = match &token.kind {
                TokenKind::ClassClose => break,
                TokenKind::Char(ch) => ch,
                _ => {
                    return Err(ParseError::UnexpectedToken {
                        offset: token.offset,
                        found: token.raw.to_string(),
                    });
                }
            };

            let range_end = match (tokens.get(self.index), tokens.get(self.index + 1)) {
                (Some(dash), Some(Token { kind: TokenKind::Char(to), .. }))
                    if dash.kind.is_range_dash() =>
                {
                    Some(to)
                }
                _ => None,
            };

            // endpoints without a code point (`[\d-z]`) read as plain members
            if let Some(to) = range_end
                && let (Some(low), Some(high)) = (from.code_point(), to.code_point())
            {
                if low > high {
                    return Err(ParseError::RangeOutOfOrder {
                        offset: token.offset,
                        from: from.value.clone(),
                        to: to.value.clone(),
                    });
                }
                self.index += 2;
                members.push(Node::ClassRange(ClassRange {
                    from: from.clone(),
                    to: to.clone(),
                }));
                continue;
            }

            members.push(Node::Char(from.clone()));
        }

        Ok(Node::CharacterClass(CharacterClass { negated, members }))
    }

    /// Checks every backreference against the complete group table, then
    /// records the group number each one resolves to.
    fn resolve_references(&self, root: &mut Node) -> ParseResult<()> {
        for (target, offset) in &self.references {
            let resolved = match target {
                BackrefTarget::Number(number) => (1..=self.capture_count).contains(number),
                BackrefTarget::Name(name) => self.group_names.contains_key(name),
            };
            if !resolved {
                return Err(ParseError::UnresolvedBackreference {
                    reference: target.to_string(),
                    offset: *offset,
                });
            }
        }
        if self.references.is_empty() {
            return Ok(());
        }

        let names = &self.group_names;
        let mut handlers = Handlers::new().on_enter(NodeType::Backreference, |path| {
            if let Node::Backreference(reference) = path.node_mut() {
                reference.number = match &reference.target {
                    BackrefTarget::Number(number) => *number,
                    BackrefTarget::Name(name) => names.get(name).copied().unwrap_or_default(),
                };
            }
        });
        traverse(root, &mut handlers);
        Ok(())
    }

    fn next_capture_number(&mut self) -> usize {
        self.capture_count += 1;
        self.capture_count
    }

    fn peek(&self) -> Option<&'t Token<'a>> {
        let tokens = self.tokens;
        tokens.get(self.index)
    }
}
