use bitflags::bitflags;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlagError {
    #[error("unknown flag '{flag}' at offset {offset}")]
    Unknown { flag: char, offset: usize },
    #[error("duplicate flag '{flag}' at offset {offset}")]
    Duplicate { flag: char, offset: usize },
}

impl FlagError {
    pub fn offset(&self) -> usize {
        match self {
            Self::Unknown { offset, .. } | Self::Duplicate { offset, .. } => *offset,
        }
    }
}

bitflags! {
    /// Recognized pattern flags. Iteration and display follow the
    /// canonical `gimsuy` order.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Flags: u8 {
        const GLOBAL = 0b0000_0001;
        const IGNORE_CASE = 0b0000_0010;
        const MULTILINE = 0b0000_0100;
        const DOT_ALL = 0b0000_1000;
        const UNICODE = 0b0001_0000;
        const STICKY = 0b0010_0000;
    }
}

const FLAG_CHARS: [(char, Flags); 6] = [
    ('g', Flags::GLOBAL),
    ('i', Flags::IGNORE_CASE),
    ('m', Flags::MULTILINE),
    ('s', Flags::DOT_ALL),
    ('u', Flags::UNICODE),
    ('y', Flags::STICKY),
];

impl Flags {
    pub fn from_char(ch: char) -> Option<Self> {
        FLAG_CHARS
            .iter()
            .find(|(c, _)| *c == ch)
            .map(|(_, flag)| *flag)
    }

    /// Parses a flag string, rejecting unknown and repeated characters.
    pub fn parse(input: &str) -> Result<Self, FlagError> {
        let mut flags = Flags::empty();
        for (offset, ch) in input.char_indices() {
            let flag = Self::from_char(ch).ok_or(FlagError::Unknown { flag: ch, offset })?;
            if flags.contains(flag) {
                return Err(FlagError::Duplicate { flag: ch, offset });
            }
            flags |= flag;
        }
        Ok(flags)
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (ch, flag) in FLAG_CHARS {
            if self.contains(flag) {
                write!(f, "{ch}")?;
            }
        }
        Ok(())
    }
}

impl FromStr for Flags {
    type Err = FlagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Flags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Flags {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FlagsVisitor;

        impl Visitor<'_> for FlagsVisitor {
            type Value = Flags;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string of regular expression flags")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Flags, E> {
                Flags::parse(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(FlagsVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_in_canonical_order() {
        let flags = Flags::parse("yumi").expect("flags should parse");
        assert_eq!(flags.to_string(), "imuy");
    }

    #[test]
    fn rejects_duplicate_flag() {
        let err = Flags::parse("gig").expect_err("duplicate should fail");
        assert_eq!(err, FlagError::Duplicate { flag: 'g', offset: 2 });
    }

    #[test]
    fn rejects_unknown_flag() {
        let err = Flags::parse("ix").expect_err("unknown should fail");
        assert_eq!(err, FlagError::Unknown { flag: 'x', offset: 1 });
        assert_eq!(err.offset(), 1);
    }

    #[test]
    fn empty_string_is_empty_set() {
        assert_eq!(Flags::parse("").expect("empty flags"), Flags::empty());
    }
}
