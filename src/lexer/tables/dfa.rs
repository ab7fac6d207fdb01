// src/lexer/tables/dfa.rs
// Transition table for the language's token classes, declared on top of the
// generic automaton and verified total over the alphabet before use.

use std::collections::VecDeque;

use super::tokens::Terminal;
use crate::lexer::{
    alphabet::{Alphabet, is_alpha, is_blank, is_digit, is_word},
    automaton::{Automaton, AutomatonError, RuleSet, Shadowed, StateId, Step},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum S {
    Initial,

    Identifier,
    ConstantNoDot,
    ConstantWithDot,
    Dot,

    // string literals
    QuoteOpen,
    StringBody,
    QuoteClose,

    // operators that may extend to a compound
    Lt,
    Gt,
    Eq,
    Colon,
    Slash,
    Star,

    // single-char punctuation
    Comma,
    Semi,
    Plus,
    Minus,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,

    // two-char compounds
    Le,
    Ne,
    Ge,
    EqEq,
    Assign,
    BlockOpen,
    LineOpen,
    Power,

    // final, absorbing
    Illegal,
    IdentifierEnd,
    ConstantEnd,
    StrEnd,
    SymbolEnd,
    CommentEnd,
}

pub const N_STATES: usize = 38;

/// Declaration order; a state's position here is its `StateId`.
pub const ALL_STATES: [S; N_STATES] = [
    S::Initial,
    S::Identifier,
    S::ConstantNoDot,
    S::ConstantWithDot,
    S::Dot,
    S::QuoteOpen,
    S::StringBody,
    S::QuoteClose,
    S::Lt,
    S::Gt,
    S::Eq,
    S::Colon,
    S::Slash,
    S::Star,
    S::Comma,
    S::Semi,
    S::Plus,
    S::Minus,
    S::LParen,
    S::RParen,
    S::LBracket,
    S::RBracket,
    S::LBrace,
    S::RBrace,
    S::Le,
    S::Ne,
    S::Ge,
    S::EqEq,
    S::Assign,
    S::BlockOpen,
    S::LineOpen,
    S::Power,
    S::Illegal,
    S::IdentifierEnd,
    S::ConstantEnd,
    S::StrEnd,
    S::SymbolEnd,
    S::CommentEnd,
];

/// First characters that start an operator or punctuation token.
const SYMBOL_STARTS: &[(char, S)] = &[
    ('<', S::Lt),
    ('>', S::Gt),
    ('=', S::Eq),
    (':', S::Colon),
    ('/', S::Slash),
    ('*', S::Star),
    (',', S::Comma),
    (';', S::Semi),
    ('+', S::Plus),
    ('-', S::Minus),
    ('(', S::LParen),
    (')', S::RParen),
    ('[', S::LBracket),
    (']', S::RBracket),
    ('{', S::LBrace),
    ('}', S::RBrace),
];

/// (first, second char, compound). Any other second char ends the symbol.
const COMPOUNDS: &[(S, char, S)] = &[
    (S::Lt, '=', S::Le),
    (S::Lt, '>', S::Ne),
    (S::Gt, '=', S::Ge),
    (S::Eq, '=', S::EqEq),
    (S::Colon, '=', S::Assign),
    (S::Slash, '*', S::BlockOpen),
    (S::Slash, '/', S::LineOpen),
    (S::Star, '*', S::Power),
];

impl S {
    #[inline]
    pub fn idx(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        use S::*;
        match self {
            Initial => "initial",
            Identifier => "identifier",
            ConstantNoDot => "constant_no_dot",
            ConstantWithDot => "constant_with_dot",
            Dot => "dot",
            QuoteOpen => "quote_open",
            StringBody => "string_body",
            QuoteClose => "quote_close",
            Lt => "<",
            Gt => ">",
            Eq => "=",
            Colon => ":",
            Slash => "/",
            Star => "*",
            Comma => ",",
            Semi => ";",
            Plus => "+",
            Minus => "-",
            LParen => "(",
            RParen => ")",
            LBracket => "[",
            RBracket => "]",
            LBrace => "{",
            RBrace => "}",
            Le => "<=",
            Ne => "<>",
            Ge => ">=",
            EqEq => "==",
            Assign => ":=",
            BlockOpen => "/*",
            LineOpen => "//",
            Power => "**",
            Illegal => "illegal",
            IdentifierEnd => "identifier_end",
            ConstantEnd => "constant_end",
            StrEnd => "str_end",
            SymbolEnd => "symbol_end",
            CommentEnd => "comment_end",
        }
    }

    pub fn terminal(self) -> Option<Terminal> {
        match self {
            S::Illegal => Some(Terminal::Illegal),
            S::IdentifierEnd => Some(Terminal::IdentifierEnd),
            S::ConstantEnd => Some(Terminal::ConstantEnd),
            S::StrEnd => Some(Terminal::StrEnd),
            S::SymbolEnd => Some(Terminal::SymbolEnd),
            S::CommentEnd => Some(Terminal::CommentEnd),
            _ => None,
        }
    }

    #[inline]
    pub fn is_final(self) -> bool {
        self.terminal().is_some()
    }

    #[inline]
    pub fn from_id(id: StateId) -> Option<S> {
        ALL_STATES.get(id.idx()).copied()
    }
}

/// The layered rule set describing the whole table over `alphabet`.
pub fn lexical_rules(alphabet: &Alphabet) -> RuleSet {
    let sigma = alphabet.symbols().to_vec();
    let digits = alphabet.select(is_digit);
    let word = alphabet.select(is_word);
    let word_start = alphabet.select(|c| is_alpha(c) || c == '_');
    let mut r = RuleSet::new();

    // ---------- initial ----------
    r.default_rule(S::Initial.name(), S::Illegal.name(), sigma.iter().copied())
        .override_rule(S::Initial.name(), S::Initial.name(), alphabet.select(is_blank))
        .override_rule(S::Initial.name(), S::Identifier.name(), word_start.iter().copied())
        .override_rule(S::Initial.name(), S::ConstantNoDot.name(), digits.iter().copied())
        .override_rule(S::Initial.name(), S::Dot.name(), ['.'])
        .override_rule(S::Initial.name(), S::QuoteOpen.name(), ['\'']);
    for &(c, s) in SYMBOL_STARTS {
        r.override_rule(S::Initial.name(), s.name(), [c]);
    }

    // ---------- identifiers ----------
    r.default_rule(S::Identifier.name(), S::IdentifierEnd.name(), sigma.iter().copied())
        .override_rule(S::Identifier.name(), S::Identifier.name(), word);

    // ---------- numeric constants ----------
    // A letter or underscore inside a number is never truncated away.
    r.default_rule(S::ConstantNoDot.name(), S::ConstantEnd.name(), sigma.iter().copied())
        .override_rule(S::ConstantNoDot.name(), S::ConstantNoDot.name(), digits.iter().copied())
        .override_rule(S::ConstantNoDot.name(), S::ConstantWithDot.name(), ['.'])
        .override_rule(S::ConstantNoDot.name(), S::Illegal.name(), word_start.iter().copied());
    r.default_rule(S::ConstantWithDot.name(), S::ConstantEnd.name(), sigma.iter().copied())
        .override_rule(S::ConstantWithDot.name(), S::ConstantWithDot.name(), digits.iter().copied())
        .override_rule(
            S::ConstantWithDot.name(),
            S::Illegal.name(),
            word_start.iter().copied().chain(['.']),
        );
    r.default_rule(S::Dot.name(), S::SymbolEnd.name(), sigma.iter().copied())
        .override_rule(S::Dot.name(), S::ConstantWithDot.name(), digits.iter().copied());

    // ---------- strings ----------
    r.default_rule(S::QuoteOpen.name(), S::StringBody.name(), sigma.iter().copied())
        .override_rule(S::QuoteOpen.name(), S::QuoteClose.name(), ['\'']);
    r.default_rule(S::StringBody.name(), S::StringBody.name(), sigma.iter().copied())
        .override_rule(S::StringBody.name(), S::QuoteClose.name(), ['\'']);
    r.default_rule(S::QuoteClose.name(), S::StrEnd.name(), sigma.iter().copied());

    // ---------- operators / punctuation ----------
    for &(_, s) in SYMBOL_STARTS {
        r.default_rule(s.name(), S::SymbolEnd.name(), sigma.iter().copied());
    }
    for &(first, c, compound) in COMPOUNDS {
        r.override_rule(first.name(), compound.name(), [c]);
        r.default_rule(compound.name(), S::SymbolEnd.name(), sigma.iter().copied());
    }

    // ---------- absorbing finals ----------
    for s in ALL_STATES.into_iter().filter(|s| s.is_final()) {
        r.default_rule(s.name(), s.name(), sigma.iter().copied());
    }

    r
}

/// The language's automaton: fixed alphabet, verified-total transitions, and
/// the scan session used by the driver.
pub struct LexicalTable {
    automaton: Automaton,
    alphabet: Alphabet,
    shadowed: Vec<Shadowed>,
}

impl LexicalTable {
    pub fn new() -> Result<Self, AutomatonError> {
        let alphabet = Alphabet::new();
        let mut automaton = Automaton::new();
        for s in ALL_STATES.into_iter().skip(1) {
            let id = automaton.declare_state(s.name(), s.is_final())?;
            debug_assert_eq!(id.idx(), s.idx());
        }

        let shadowed = lexical_rules(&alphabet).apply(&mut automaton)?;

        let missing = automaton.missing_transitions(&alphabet);
        if !missing.is_empty() {
            automaton.verify_totality(&alphabet);
            return Err(AutomatonError::Incomplete {
                missing: missing
                    .into_iter()
                    .map(|(s, c)| (automaton.name(s).to_string(), c))
                    .collect(),
            });
        }
        log::debug!(
            "[tables] lexical table ready: {} states x {} symbols, {} overrides applied",
            automaton.state_count(),
            alphabet.len(),
            shadowed.len()
        );

        Ok(Self {
            automaton,
            alphabet,
            shadowed,
        })
    }

    #[inline]
    pub fn process(&mut self, c: char) -> Result<bool, AutomatonError> {
        self.automaton.process(c)
    }

    #[inline]
    pub fn reset(&mut self) {
        self.automaton.reset();
    }

    pub fn state(&self) -> S {
        ALL_STATES[self.automaton.current().idx()]
    }

    /// The terminal reached by the current token, if any.
    pub fn terminal(&self) -> Option<Terminal> {
        self.state().terminal()
    }

    pub fn lexeme(&self) -> &str {
        self.automaton.lexeme()
    }

    pub fn steps(&self) -> &[Step] {
        self.automaton.steps()
    }

    pub fn next_state(&self, from: S, c: char) -> Option<S> {
        self.automaton
            .target(StateId(from.idx() as u16), c)
            .and_then(S::from_id)
    }

    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Default transitions replaced by a more specific rule while building.
    pub fn shadowed(&self) -> &[Shadowed] {
        &self.shadowed
    }

    /// Declared states no input can reach from `initial`.
    pub fn unreachable_states(&self) -> Vec<S> {
        let mut seen = [false; N_STATES];
        let mut queue = VecDeque::from([S::Initial]);
        seen[S::Initial.idx()] = true;
        while let Some(s) = queue.pop_front() {
            for &c in self.alphabet.symbols() {
                if let Some(n) = self.next_state(s, c) {
                    if !seen[n.idx()] {
                        seen[n.idx()] = true;
                        queue.push_back(n);
                    }
                }
            }
        }
        ALL_STATES
            .into_iter()
            .filter(|s| !seen[s.idx()])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Feeds `input` until a final state; returns (lexeme, final state).
    fn scan_one(t: &mut LexicalTable, input: &str) -> (String, S) {
        t.reset();
        for c in input.chars() {
            if t.process(c).unwrap() {
                return (t.lexeme().to_string(), t.state());
            }
        }
        panic!("no final state reached for {input:?}");
    }

    #[test]
    fn states_are_declared_in_order() {
        let t = LexicalTable::new().unwrap();
        assert_eq!(t.automaton().state_count(), N_STATES);
        for s in ALL_STATES {
            assert_eq!(t.automaton().state_id(s.name()), Some(StateId(s.idx() as u16)));
            assert_eq!(t.automaton().is_final(StateId(s.idx() as u16)), s.is_final());
        }
    }

    #[test]
    fn table_is_total() {
        let t = LexicalTable::new().unwrap();
        assert!(t.automaton().verify_totality(t.alphabet()));
        for s in ALL_STATES {
            for &c in t.alphabet().symbols() {
                assert!(t.next_state(s, c).is_some(), "({}, {c:?})", s.name());
            }
        }
    }

    #[test]
    fn finals_absorb() {
        let t = LexicalTable::new().unwrap();
        for s in ALL_STATES.into_iter().filter(|s| s.is_final()) {
            for &c in t.alphabet().symbols() {
                assert_eq!(t.next_state(s, c), Some(s));
            }
        }
    }

    #[test]
    fn scenarios() {
        let mut t = LexicalTable::new().unwrap();
        assert_eq!(scan_one(&mut t, "abc123 "), ("abc123".into(), S::IdentifierEnd));
        assert_eq!(scan_one(&mut t, "a_b;"), ("a_b".into(), S::IdentifierEnd));
        assert_eq!(scan_one(&mut t, "123.45 "), ("123.45".into(), S::ConstantEnd));
        assert_eq!(scan_one(&mut t, ".5 "), (".5".into(), S::ConstantEnd));
        assert_eq!(scan_one(&mut t, "7;"), ("7".into(), S::ConstantEnd));
        assert_eq!(scan_one(&mut t, "<= "), ("<=".into(), S::SymbolEnd));
        assert_eq!(scan_one(&mut t, "< "), ("<".into(), S::SymbolEnd));
        assert_eq!(scan_one(&mut t, "<>x"), ("<>".into(), S::SymbolEnd));
        assert_eq!(scan_one(&mut t, ">= "), (">=".into(), S::SymbolEnd));
        assert_eq!(scan_one(&mut t, ">>"), (">".into(), S::SymbolEnd));
        assert_eq!(scan_one(&mut t, ":=1"), (":=".into(), S::SymbolEnd));
        assert_eq!(scan_one(&mut t, "** "), ("**".into(), S::SymbolEnd));
        assert_eq!(scan_one(&mut t, "(("), ("(".into(), S::SymbolEnd));
        assert_eq!(scan_one(&mut t, ". "), (".".into(), S::SymbolEnd));
        assert_eq!(scan_one(&mut t, "'hi' "), ("'hi'".into(), S::StrEnd));
        assert_eq!(scan_one(&mut t, "'' "), ("''".into(), S::StrEnd));
        assert_eq!(scan_one(&mut t, "'a b;' "), ("'a b;'".into(), S::StrEnd));
    }

    #[test]
    fn malformed_numbers_are_illegal() {
        let mut t = LexicalTable::new().unwrap();
        let (lex, s) = scan_one(&mut t, "123abc ");
        assert_eq!(s, S::Illegal);
        assert_eq!(lex, "123");
        let last = t.steps().last().unwrap();
        assert_eq!(last.symbol, 'a');

        assert_eq!(scan_one(&mut t, "12_ ").1, S::Illegal);
        assert_eq!(scan_one(&mut t, "1.2.3 ").1, S::Illegal);
        assert_eq!(scan_one(&mut t, "1.x ").1, S::Illegal);
        assert_eq!(scan_one(&mut t, "$").1, S::Illegal);
        assert_eq!(scan_one(&mut t, "\"").1, S::Illegal);
    }

    #[test]
    fn comment_openers_are_symbols_and_comment_end_is_unreachable() {
        let mut t = LexicalTable::new().unwrap();
        assert_eq!(scan_one(&mut t, "/* x */"), ("/*".into(), S::SymbolEnd));
        assert_eq!(scan_one(&mut t, "// x"), ("//".into(), S::SymbolEnd));
        assert_eq!(t.unreachable_states(), vec![S::CommentEnd]);
    }

    #[test]
    fn overrides_are_visible() {
        let t = LexicalTable::new().unwrap();
        assert!(t.shadowed().contains(&Shadowed {
            state: "initial",
            symbol: '.',
            default_target: "illegal",
            override_target: "dot",
        }));
        assert!(t.shadowed().contains(&Shadowed {
            state: "dot",
            symbol: '5',
            default_target: "symbol_end",
            override_target: "constant_with_dot",
        }));
        // '"' starts no token
        assert!(!t.shadowed().iter().any(|s| s.state == "initial" && s.symbol == '"'));
    }
}
