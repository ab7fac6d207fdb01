// src/lexer/tables/tokens.rs

use serde::{Deserialize, Serialize};

/// Token categories. Discriminants are the ids written to the token stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u32)]
pub enum Category {
    Constant = 10,
    Str = 20,
    Symbol = 30,
    Comment = 40,
    Identifier = 50,
    Keyword = 60,
    Illegal = 70,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Constant,
        Category::Str,
        Category::Symbol,
        Category::Comment,
        Category::Identifier,
        Category::Keyword,
        Category::Illegal,
    ];

    #[inline]
    pub fn id(self) -> u32 {
        self as u32
    }

    /// Position in `ALL`; used to index per-category tables.
    #[inline]
    pub fn slot(self) -> usize {
        (self.id() / 10 - 1) as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Category::Constant => "constant_end",
            Category::Str => "str_end",
            Category::Symbol => "symbol_end",
            Category::Comment => "comment_end",
            Category::Identifier => "identifier_end",
            Category::Keyword => "keyword_end",
            Category::Illegal => "illegal",
        }
    }
}

impl TryFrom<u32> for Category {
    type Error = u32;
    fn try_from(v: u32) -> Result<Self, u32> {
        Category::ALL.into_iter().find(|c| c.id() == v).ok_or(v)
    }
}

/// The final states of the lexical table. Reaching one of these ends a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Terminal {
    IdentifierEnd,
    ConstantEnd,
    StrEnd,
    SymbolEnd,
    CommentEnd,
    Illegal,
}

impl Terminal {
    /// Category before keyword reclassification.
    pub fn category(self) -> Category {
        match self {
            Terminal::IdentifierEnd => Category::Identifier,
            Terminal::ConstantEnd => Category::Constant,
            Terminal::StrEnd => Category::Str,
            Terminal::SymbolEnd => Category::Symbol,
            Terminal::CommentEnd => Category::Comment,
            Terminal::Illegal => Category::Illegal,
        }
    }
}

/// A canonical token: category plus index into that category's interned table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub category: Category,
    pub index: usize,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{},{}>", self.category.id(), self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_follow_ids() {
        for (i, c) in Category::ALL.iter().enumerate() {
            assert_eq!(c.slot(), i);
            assert_eq!(Category::try_from(c.id()), Ok(*c));
        }
        assert_eq!(Category::try_from(15), Err(15));
    }

    #[test]
    fn token_display_is_stream_record() {
        let t = Token {
            category: Category::Keyword,
            index: 2,
        };
        assert_eq!(t.to_string(), "<60,2>");
    }
}
