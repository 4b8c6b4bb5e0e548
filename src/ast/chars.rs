use serde::{Deserialize, Serialize};

/// How a character was written. Affects generation, not matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharKind {
    /// A literal character, possibly written as an identity escape.
    Simple,
    /// `.`, class escapes (`\d`, `\p{L}`) and control escapes (`\n`).
    Meta,
    /// `\uHHHH` or `\u{H..}`.
    Unicode,
    /// `\xHH`.
    Hex,
    /// `\cX`.
    Control,
    /// `\0`, `\07`, and numeric escapes inside a class.
    Oct,
}

/// A single pattern character. For `Simple` chars `value` holds the
/// character itself; every other kind keeps its escape text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Char {
    pub value: String,
    pub kind: CharKind,
    #[serde(default, skip_serializing_if = "is_false")]
    pub escaped: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Char {
    pub fn new(value: impl Into<String>, kind: CharKind) -> Self {
        Self {
            value: value.into(),
            kind,
            escaped: false,
        }
    }

    pub fn simple(ch: char) -> Self {
        Self::new(ch.to_string(), CharKind::Simple)
    }

    pub fn escaped(ch: char) -> Self {
        Self {
            escaped: true,
            ..Self::simple(ch)
        }
    }

    pub fn meta(value: impl Into<String>) -> Self {
        Self::new(value, CharKind::Meta)
    }

    /// Builds the char used to print `code_point`: printable characters
    /// stay literal, controls become `\xHH`, lone surrogates `\uHHHH`.
    pub fn from_code_point(code_point: u32) -> Self {
        match char::from_u32(code_point) {
            Some(ch) if !ch.is_control() => Self::simple(ch),
            Some(_) if code_point <= 0xFF => {
                Self::new(format!("\\x{code_point:02X}"), CharKind::Hex)
            }
            _ if code_point <= 0xFFFF => {
                Self::new(format!("\\u{code_point:04X}"), CharKind::Unicode)
            }
            _ => Self::new(format!("\\u{{{code_point:X}}}"), CharKind::Unicode),
        }
    }

    /// The code point this char denotes, or `None` for class escapes and `.`.
    pub fn code_point(&self) -> Option<u32> {
        match self.kind {
            CharKind::Simple => {
                let mut chars = self.value.chars();
                let ch = chars.next()?;
                chars.next().is_none().then_some(ch as u32)
            }
            CharKind::Meta => match self.value.as_str() {
                "\\t" => Some(0x09),
                "\\n" => Some(0x0A),
                "\\v" => Some(0x0B),
                "\\f" => Some(0x0C),
                "\\r" => Some(0x0D),
                "\\b" => Some(0x08),
                _ => None,
            },
            CharKind::Hex => u32::from_str_radix(self.value.get(2..)?, 16).ok(),
            CharKind::Unicode => {
                let digits = self.value.get(2..)?;
                let digits = digits
                    .strip_prefix('{')
                    .and_then(|d| d.strip_suffix('}'))
                    .unwrap_or(digits);
                u32::from_str_radix(digits, 16).ok()
            }
            CharKind::Control => {
                let letter = self.value.get(2..)?.chars().next()?;
                Some(letter as u32 % 32)
            }
            CharKind::Oct => u32::from_str_radix(self.value.get(1..)?, 8).ok(),
        }
    }
}
