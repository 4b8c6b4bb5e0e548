use crate::ast::{AssertionKind, BackrefTarget, Char, CharKind};

use super::token::{GroupOpen, Token, TokenKind};
use super::{LexError, LexResult};

/// Splits a pattern body into tokens. Characters inside a class are lexed
/// with class rules (`(`, `|`, `*` are plain chars there, `\b` is backspace).
#[tracing::instrument(level = "trace", skip(body), fields(body_len = body.len() as u64))]
pub fn tokenize(body: &str) -> LexResult<Vec<Token<'_>>> {
    Lexer::new(body).run()
}

struct Lexer<'a> {
    pattern: &'a str,
    chars: Vec<(usize, char)>,
    index: usize,
    class_start: Option<usize>,
}

impl<'a> Lexer<'a> {
    fn new(pattern: &'a str) -> Self {
        let chars: Vec<(usize, char)> = pattern.char_indices().collect();
        Self {
            pattern,
            chars,
            index: 0,
            class_start: None,
        }
    }

    fn run(mut self) -> LexResult<Vec<Token<'a>>> {
        let mut tokens = Vec::with_capacity(self.chars.len());
        while let Some(ch) = self.peek() {
            let start = self.current_byte_index();
            let kind = if self.class_start.is_some() {
                self.lex_in_class(ch, start)?
            } else {
                self.lex_pattern(ch, start)?
            };
            let end = self.current_byte_index();
            tokens.push(Token {
                kind,
                raw: &self.pattern[start..end],
                offset: start,
            });
        }

        if let Some(offset) = self.class_start {
            return Err(LexError::UnterminatedClass { offset });
        }
        Ok(tokens)
    }

    fn lex_pattern(&mut self, ch: char, start: usize) -> LexResult<TokenKind> {
        match ch {
            '\\' => self.lex_escape(start, false),
            '[' => {
                self.next();
                let negated = self.eat('^');
                self.class_start = Some(start);
                Ok(TokenKind::ClassOpen { negated })
            }
            '(' => self.lex_group_open(start),
            ')' => {
                self.next();
                Ok(TokenKind::GroupClose)
            }
            '|' => {
                self.next();
                Ok(TokenKind::Bar)
            }
            '^' => {
                self.next();
                Ok(TokenKind::Assertion(AssertionKind::Start))
            }
            '$' => {
                self.next();
                Ok(TokenKind::Assertion(AssertionKind::End))
            }
            '.' => {
                self.next();
                Ok(TokenKind::Char(Char::meta(".")))
            }
            '*' | '+' | '?' => {
                self.next();
                let (min, max) = match ch {
                    '*' => (0, None),
                    '+' => (1, None),
                    _ => (0, Some(1)),
                };
                Ok(self.finish_quantifier(min, max))
            }
            '{' => match self.scan_brace_quantifier(start)? {
                Some((min, max)) => Ok(self.finish_quantifier(min, max)),
                None => {
                    self.next();
                    Ok(TokenKind::Char(Char::simple('{')))
                }
            },
            _ => {
                self.next();
                Ok(TokenKind::Char(Char::simple(ch)))
            }
        }
    }

    fn lex_in_class(&mut self, ch: char, start: usize) -> LexResult<TokenKind> {
        match ch {
            ']' => {
                self.next();
                self.class_start = None;
                Ok(TokenKind::ClassClose)
            }
            '\\' => self.lex_escape(start, true),
            _ => {
                self.next();
                Ok(TokenKind::Char(Char::simple(ch)))
            }
        }
    }

    fn finish_quantifier(&mut self, min: u32, max: Option<u32>) -> TokenKind {
        let greedy = !self.eat('?');
        TokenKind::Quantifier { min, max, greedy }
    }

    /// Reads `{n}`, `{n,}` or `{n,m}` starting at the current `{`. Leaves the
    /// cursor untouched and returns `None` when the braces are not a
    /// quantifier.
    fn scan_brace_quantifier(&mut self, start: usize) -> LexResult<Option<(u32, Option<u32>)>> {
        let mut cursor = self.index + 1;
        let min_digits = self.digits_from(cursor);
        if min_digits.is_empty() {
            return Ok(None);
        }
        cursor += min_digits.len();

        let max = match self.char_at(cursor) {
            Some('}') => Some(Some(min_digits.clone())),
            Some(',') => {
                cursor += 1;
                let max_digits = self.digits_from(cursor);
                cursor += max_digits.len();
                if self.char_at(cursor) != Some('}') {
                    return Ok(None);
                }
                Some((!max_digits.is_empty()).then_some(max_digits))
            }
            _ => None,
        };
        let Some(max) = max else {
            return Ok(None);
        };

        let overflow = || LexError::QuantifierOverflow { offset: start };
        let min: u32 = min_digits.parse().map_err(|_| overflow())?;
        let max: Option<u32> = match max {
            Some(digits) => Some(digits.parse().map_err(|_| overflow())?),
            None => None,
        };

        // closing brace
        self.index = cursor + 1;
        Ok(Some((min, max)))
    }

    fn lex_group_open(&mut self, start: usize) -> LexResult<TokenKind> {
        self.expect('(');
        if !self.eat('?') {
            return Ok(TokenKind::GroupOpen(GroupOpen::Capturing));
        }

        let open = match self.next() {
            Some(':') => GroupOpen::NonCapturing,
            Some('=') => GroupOpen::Lookahead,
            Some('!') => GroupOpen::NegativeLookahead,
            Some('<') if self.eat('=') => GroupOpen::Lookbehind,
            Some('<') if self.eat('!') => GroupOpen::NegativeLookbehind,
            Some('<') => GroupOpen::Named(self.read_group_name(start)?),
            _ => return Err(LexError::InvalidGroupSyntax { offset: start }),
        };
        Ok(TokenKind::GroupOpen(open))
    }

    /// Reads an identifier terminated by `>`; the `<` is already consumed.
    fn read_group_name(&mut self, start: usize) -> LexResult<String> {
        let mut name = String::new();
        loop {
            match self.next() {
                Some('>') => break,
                Some(ch) => name.push(ch),
                None => return Err(LexError::UnterminatedGroupName { offset: start }),
            }
        }

        if !is_identifier(&name) {
            return Err(LexError::InvalidGroupName {
                offset: start,
                name,
            });
        }
        Ok(name)
    }

    fn lex_escape(&mut self, start: usize, in_class: bool) -> LexResult<TokenKind> {
        self.expect('\\');
        let Some(ch) = self.next() else {
            return Err(LexError::DanglingBackslash { offset: start });
        };

        let kind = match ch {
            'd' | 'D' | 'w' | 'W' | 's' | 'S' | 'n' | 'r' | 't' | 'v' | 'f' => {
                TokenKind::Char(Char::meta(self.slice_from(start)))
            }
            'b' if in_class => TokenKind::Char(Char::meta("\\b")),
            'b' => TokenKind::Assertion(AssertionKind::WordBoundary),
            'B' if !in_class => TokenKind::Assertion(AssertionKind::NonWordBoundary),
            '0' => {
                self.eat_octal_digits(2);
                TokenKind::Char(Char::new(self.slice_from(start), CharKind::Oct))
            }
            '1'..='7' if in_class => {
                self.eat_octal_digits(2);
                TokenKind::Char(Char::new(self.slice_from(start), CharKind::Oct))
            }
            '1'..='9' if !in_class => {
                let digits = self.digits_from(self.index);
                self.index += digits.len();
                let number = self.slice_from(start)[1..]
                    .parse::<usize>()
                    .unwrap_or(usize::MAX);
                TokenKind::Backreference(BackrefTarget::Number(number))
            }
            'x' => {
                if !self.eat_hex_digits(2) {
                    return Err(LexError::InvalidHexEscape { offset: start });
                }
                TokenKind::Char(Char::new(self.slice_from(start), CharKind::Hex))
            }
            'u' => {
                self.lex_unicode_escape(start)?;
                TokenKind::Char(Char::new(self.slice_from(start), CharKind::Unicode))
            }
            'c' => match self.peek() {
                Some(letter) if letter.is_ascii_alphabetic() => {
                    self.next();
                    TokenKind::Char(Char::new(self.slice_from(start), CharKind::Control))
                }
                _ => return Err(LexError::InvalidControlEscape { offset: start }),
            },
            'p' | 'P' => {
                self.lex_property_name(start)?;
                TokenKind::Char(Char::meta(self.slice_from(start)))
            }
            'k' if !in_class => {
                if !self.eat('<') {
                    return Err(LexError::InvalidNamedReference { offset: start });
                }
                let name = self
                    .read_group_name(start)
                    .map_err(|_| LexError::InvalidNamedReference { offset: start })?;
                TokenKind::Backreference(BackrefTarget::Name(name))
            }
            other => TokenKind::Char(Char::escaped(other)),
        };
        Ok(kind)
    }

    fn lex_unicode_escape(&mut self, start: usize) -> LexResult<()> {
        let invalid = LexError::InvalidUnicodeEscape { offset: start };
        if !self.eat('{') {
            return if self.eat_hex_digits(4) {
                Ok(())
            } else {
                Err(invalid)
            };
        }

        let digits_start = self.index;
        while self.peek().is_some_and(|ch| ch.is_ascii_hexdigit()) {
            self.next();
        }
        let count = self.index - digits_start;
        let digits: String = self.chars[digits_start..self.index]
            .iter()
            .map(|(_, ch)| *ch)
            .collect();
        let in_range = u32::from_str_radix(&digits, 16).is_ok_and(|cp| cp <= 0x10FFFF);
        if count == 0 || !in_range || !self.eat('}') {
            return Err(invalid);
        }
        Ok(())
    }

    fn lex_property_name(&mut self, start: usize) -> LexResult<()> {
        let invalid = LexError::InvalidPropertyEscape { offset: start };
        if !self.eat('{') {
            return Err(invalid);
        }
        let name_start = self.index;
        while self
            .peek()
            .is_some_and(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '=')
        {
            self.next();
        }
        if self.index == name_start || !self.eat('}') {
            return Err(invalid);
        }
        Ok(())
    }

    fn eat_octal_digits(&mut self, limit: usize) {
        for _ in 0..limit {
            if !self.peek().is_some_and(|ch| ('0'..='7').contains(&ch)) {
                break;
            }
            self.next();
        }
    }

    /// Consumes exactly `count` hex digits, or nothing.
    fn eat_hex_digits(&mut self, count: usize) -> bool {
        let all_hex = (0..count).all(|offset| {
            self.char_at(self.index + offset)
                .is_some_and(|ch| ch.is_ascii_hexdigit())
        });
        if all_hex {
            self.index += count;
        }
        all_hex
    }

    fn digits_from(&self, from: usize) -> String {
        self.chars
            .iter()
            .skip(from)
            .map(|(_, ch)| *ch)
            .take_while(char::is_ascii_digit)
            .collect()
    }

    fn slice_from(&self, start: usize) -> &'a str {
        &self.pattern[start..self.current_byte_index()]
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.next();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char) {
        let actual = self.next();
        debug_assert_eq!(Some(expected), actual);
    }

    fn char_at(&self, index: usize) -> Option<char> {
        self.chars.get(index).map(|(_, ch)| *ch)
    }

    fn peek(&self) -> Option<char> {
        self.char_at(self.index)
    }

    fn next(&mut self) -> Option<char> {
        let ch = self.peek();
        if ch.is_some() {
            self.index += 1;
        }
        ch
    }

    fn current_byte_index(&self) -> usize {
        self.chars
            .get(self.index)
            .map(|(idx, _)| *idx)
            .unwrap_or_else(|| self.pattern.len())
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_' || first == '$')
        && chars.all(|ch| ch.is_alphanumeric() || ch == '_' || ch == '$')
}
