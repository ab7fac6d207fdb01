// src/lexer/alphabet.rs

/// Every symbol the automaton is allowed to see. Anything else is rejected by
/// the driver before it reaches a transition lookup.
pub const SIGMA: &str = concat!(
    "abcdefghijklmnopqrstuvwxyz",
    "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
    "0123456789.",
    "+-*/,;:=_\"'\\<>{}()[]!?@#$%^& \t",
);

#[inline]
pub fn is_alpha(c: char) -> bool {
    c.is_ascii_alphabetic()
}
#[inline]
pub fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}
#[inline]
pub fn is_word(c: char) -> bool {
    is_alpha(c) || is_digit(c) || c == '_'
}
#[inline]
pub fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t')
}

/// The fixed input alphabet, kept in declaration order so that table dumps and
/// totality reports are deterministic.
#[derive(Debug, Clone)]
pub struct Alphabet {
    symbols: Vec<char>,
    /// Membership by code point for ASCII input.
    ascii: [bool; 128],
}

impl Alphabet {
    pub fn new() -> Self {
        Self::from_symbols(SIGMA.chars())
    }

    pub fn from_symbols(symbols: impl IntoIterator<Item = char>) -> Self {
        let mut out: Vec<char> = Vec::new();
        let mut ascii = [false; 128];
        for c in symbols {
            if c.is_ascii() {
                if ascii[c as usize] {
                    continue;
                }
                ascii[c as usize] = true;
            } else if out.contains(&c) {
                continue;
            }
            out.push(c);
        }
        Self {
            symbols: out,
            ascii,
        }
    }

    #[inline]
    pub fn contains(&self, c: char) -> bool {
        if c.is_ascii() {
            self.ascii[c as usize]
        } else {
            self.symbols.contains(&c)
        }
    }

    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbols of the alphabet matching `pred`.
    pub fn select(&self, pred: impl Fn(char) -> bool) -> Vec<char> {
        self.symbols.iter().copied().filter(|&c| pred(c)).collect()
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::new()
    }
}
