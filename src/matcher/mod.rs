mod dialect;
mod error;

pub use error::MatcherError;

use std::fmt;

use regex::{Match, Regex, RegexBuilder};

use crate::ast::Node;
use crate::errors::RegexpTreeResult;
use crate::flags::Flags;
use crate::generator::generate_parts;
use crate::input::PatternSource;
use crate::transform::Pass;
use crate::traverse::Handlers;

/// A compiled pattern backed by the `regex` crate. `g` and `y` are kept
/// as flags: `y` anchors every search at its start position.
#[derive(Debug, Clone)]
pub struct Matcher {
    regex: Regex,
    source: String,
    flags: Flags,
}

impl Matcher {
    pub fn is_match(&self, haystack: &str) -> bool {
        if self.is_sticky() {
            return self.find_at(haystack, 0).is_some();
        }
        self.regex.is_match(haystack)
    }

    pub fn find<'h>(&self, haystack: &'h str) -> Option<Match<'h>> {
        self.find_at(haystack, 0)
    }

    pub fn find_at<'h>(&self, haystack: &'h str, start: usize) -> Option<Match<'h>> {
        let found = self.regex.find_at(haystack, start)?;
        if self.is_sticky() && found.start() != start {
            return None;
        }
        Some(found)
    }

    /// Pattern text as written by the generator, before host translation.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }

    pub fn is_global(&self) -> bool {
        self.flags.contains(Flags::GLOBAL)
    }

    pub fn is_sticky(&self) -> bool {
        self.flags.contains(Flags::STICKY)
    }

    /// The host regex, compiled from the translated pattern.
    pub fn regex(&self) -> &Regex {
        &self.regex
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.source, self.flags)
    }
}

/// Parses `source` and compiles it.
pub fn to_matcher<'a>(source: impl Into<PatternSource<'a>>) -> RegexpTreeResult<Matcher> {
    let ast = crate::parse(source)?;
    compile(ast)
}

/// Compiles a `RegExp` tree. Lookaround and backreferences have no
/// counterpart in the host engine and are rejected.
#[tracing::instrument(level = "debug", skip_all, fields(nodes = ast.node_count()))]
pub fn compile(mut ast: Node) -> RegexpTreeResult<Matcher> {
    let Some(regexp) = ast.as_regexp() else {
        return Err(MatcherError::NotARoot {
            found: ast.node_type().to_string(),
        }
        .into());
    };
    let (source, _) = generate_parts(regexp);
    let flags = regexp.flags;

    if let Some((construct, node_index)) = first_unsupported(&mut ast) {
        tracing::debug!(construct, node_index, "pattern rejected by the host engine");
        return Err(MatcherError::Unsupported {
            construct,
            node_index,
        }
        .into());
    }

    dialect::pass(flags).run(&mut ast);
    let Some(translated) = ast.as_regexp() else {
        return Err(MatcherError::NotARoot {
            found: ast.node_type().to_string(),
        }
        .into());
    };
    let (pattern, _) = generate_parts(translated);
    tracing::trace!(%pattern, "host pattern");

    let regex = RegexBuilder::new(&pattern)
        .case_insensitive(flags.contains(Flags::IGNORE_CASE))
        .multi_line(flags.contains(Flags::MULTILINE))
        .dot_matches_new_line(flags.contains(Flags::DOT_ALL))
        .unicode(true)
        .build()
        .map_err(MatcherError::from)?;

    Ok(Matcher {
        regex,
        source,
        flags,
    })
}

fn first_unsupported(ast: &mut Node) -> Option<(&'static str, usize)> {
    let mut found = None;
    let mut position = 0;
    let mut scan = Pass::new(
        "host-support",
        Handlers::new().on_any_enter(|path| {
            let construct = match path.node() {
                Node::Group(group) if group.kind.is_lookaround() => Some("lookaround"),
                Node::Backreference(_) => Some("backreference"),
                _ => None,
            };
            if let Some(construct) = construct {
                found = Some((construct, position));
                path.stop();
            }
            position += 1;
        }),
    );
    scan.run(ast);
    drop(scan);
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::NodeType;

    #[test]
    fn rejects_fragments() {
        let err = compile(Node::empty()).expect_err("fragment is not a root");
        assert!(err.to_string().contains(NodeType::Alternative.as_str()));
    }
}
