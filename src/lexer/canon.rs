// src/lexer/canon.rs
// Keyword reclassification and per-category interning of finished lexemes.

use hashbrown::HashMap;

use super::tables::tokens::{Category, Terminal, Token};

/// Keyword order used when no external list is given; indices of the keyword
/// table follow this order.
pub const DEFAULT_RESERVED_WORDS: &[&str] = &[
    "and", "array", "begin", "bool", "call", "case", "char", "constant", "do", "else", "end",
    "false", "for", "if", "input", "integer", "not", "of", "or", "output", "procedure",
    "program", "read", "real", "repeat", "set", "then", "to", "true", "until", "var", "while",
    "write",
];

/// Append-only table of lexemes for one category; index = first-seen order.
#[derive(Debug, Clone, Default)]
pub struct Interned {
    entries: Vec<String>,
    index: HashMap<String, usize>,
}

impl Interned {
    /// Index of `lexeme`, appending it if unseen.
    pub fn intern(&mut self, lexeme: &str) -> usize {
        if let Some(&i) = self.index.get(lexeme) {
            return i;
        }
        let i = self.entries.len();
        self.entries.push(lexeme.to_string());
        self.index.insert(lexeme.to_string(), i);
        i
    }

    pub fn get(&self, lexeme: &str) -> Option<usize> {
        self.index.get(lexeme).copied()
    }

    pub fn lexeme(&self, i: usize) -> Option<&str> {
        self.entries.get(i).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.entries.iter().map(String::as_str).enumerate()
    }
}

pub struct TokenCanonicalizer {
    tables: [Interned; Category::ALL.len()],
    tokens: Vec<Token>,
}

impl TokenCanonicalizer {
    /// Seeds the keyword table from `reserved`, in order. A repeated word keeps
    /// its first position.
    pub fn new<I, W>(reserved: I) -> Self
    where
        I: IntoIterator<Item = W>,
        W: AsRef<str>,
    {
        let mut tables: [Interned; Category::ALL.len()] = Default::default();
        let keywords = &mut tables[Category::Keyword.slot()];
        for w in reserved {
            let w = w.as_ref();
            if keywords.get(w).is_some() {
                log::warn!("[canon] reserved word {w:?} listed twice; keeping first index");
                continue;
            }
            keywords.intern(w);
        }
        Self {
            tables,
            tokens: Vec::new(),
        }
    }

    /// Rebuilds a canonicalizer from previously dumped tables and history.
    pub(crate) fn from_parts(
        tables: Vec<(Category, Vec<String>)>,
        tokens: Vec<Token>,
    ) -> Result<Self, String> {
        let mut out: [Interned; Category::ALL.len()] = Default::default();
        for (category, entries) in tables {
            let table = &mut out[category.slot()];
            for e in entries {
                if table.get(&e).is_some() {
                    return Err(format!("{:?} interned twice in {}", e, category.name()));
                }
                table.intern(&e);
            }
        }
        if let Some(t) = tokens
            .iter()
            .find(|t| out[t.category.slot()].lexeme(t.index).is_none())
        {
            return Err(format!("token {t} points past its table"));
        }
        Ok(Self {
            tables: out,
            tokens,
        })
    }

    pub fn with_default_keywords() -> Self {
        Self::new(DEFAULT_RESERVED_WORDS.iter().copied())
    }

    /// Final category for a lexeme that ended in `terminal`.
    pub fn category_of(&self, lexeme: &str, terminal: Terminal) -> Category {
        match terminal {
            Terminal::IdentifierEnd if self.is_reserved(lexeme) => Category::Keyword,
            t => t.category(),
        }
    }

    pub fn is_reserved(&self, lexeme: &str) -> bool {
        self.table(Category::Keyword).get(lexeme).is_some()
    }

    /// Classifies, interns and records one finished lexeme.
    pub fn classify(&mut self, lexeme: &str, terminal: Terminal) -> Token {
        let category = self.category_of(lexeme, terminal);
        let index = self.tables[category.slot()].intern(lexeme);
        let token = Token { category, index };
        log::debug!("[canon] {lexeme:?} -> {token}");
        self.tokens.push(token);
        token
    }

    pub fn table(&self, category: Category) -> &Interned {
        &self.tables[category.slot()]
    }

    /// The interned table of `category` as (index, lexeme) pairs.
    pub fn dump(&self, category: Category) -> Vec<(usize, &str)> {
        self.table(category).iter().collect()
    }

    /// Every token recorded so far, in recognition order.
    pub fn emit(&self) -> &[Token] {
        &self.tokens
    }

    /// Source text a token was interned from.
    pub fn lexeme(&self, token: Token) -> Option<&str> {
        self.table(token.category).lexeme(token.index)
    }
}

impl Default for TokenCanonicalizer {
    fn default() -> Self {
        Self::with_default_keywords()
    }
}
