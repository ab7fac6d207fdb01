// src/lexer/automaton.rs
// Generic named-state automaton with a lexeme buffer and a per-token step log.
// The concrete table for the language lives in `tables::dfa`.

use hashbrown::{HashMap, HashSet};
use thiserror::Error;

use super::alphabet::Alphabet;

/// Construction-time contract violations. None of these are caused by user
/// input; they mean the transition table itself is defective.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AutomatonError {
    #[error("state `{0}` already declared")]
    DuplicateState(String),
    #[error("state `{0}` is not declared")]
    UnknownState(String),
    #[error("no transition from `{state}` on {symbol:?}")]
    UndefinedTransition { state: String, symbol: char },
    #[error("conflicting rules for (`{state}`, {symbol:?}): `{first}` vs `{second}`")]
    ConflictingRule {
        state: String,
        symbol: char,
        first: String,
        second: String,
    },
    #[error("transition function is not total: {} missing entries", .missing.len())]
    Incomplete { missing: Vec<(String, char)> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(pub u16);

impl StateId {
    #[inline]
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

pub const INITIAL_NAME: &str = "initial";
pub const INITIAL: StateId = StateId(0);

#[derive(Debug, Clone)]
struct StateInfo {
    name: String,
    is_final: bool,
}

/// One processed symbol, as recorded in the step log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub from: StateId,
    pub symbol: char,
    pub to: StateId,
    /// Lexeme buffer after this step.
    pub lexeme: String,
}

pub struct Automaton {
    states: Vec<StateInfo>,
    by_name: HashMap<String, StateId>,
    transitions: HashMap<(StateId, char), StateId>,

    // scan session
    current: StateId,
    lexeme: String,
    steps: Vec<Step>,
}

impl Automaton {
    /// An automaton holding only the non-final `initial` state.
    pub fn new() -> Self {
        let mut by_name = HashMap::new();
        by_name.insert(INITIAL_NAME.to_string(), INITIAL);
        Self {
            states: vec![StateInfo {
                name: INITIAL_NAME.to_string(),
                is_final: false,
            }],
            by_name,
            transitions: HashMap::new(),
            current: INITIAL,
            lexeme: String::new(),
            steps: Vec::new(),
        }
    }

    pub fn declare_state(&mut self, name: &str, is_final: bool) -> Result<StateId, AutomatonError> {
        if self.by_name.contains_key(name) {
            return Err(AutomatonError::DuplicateState(name.to_string()));
        }
        let id = StateId(self.states.len() as u16);
        self.states.push(StateInfo {
            name: name.to_string(),
            is_final,
        });
        self.by_name.insert(name.to_string(), id);
        Ok(id)
    }

    /// Records `(from, c) -> to` for every `c` in `symbols`. An existing entry
    /// for the same pair is replaced.
    pub fn declare_transition(
        &mut self,
        from: &str,
        to: &str,
        symbols: impl IntoIterator<Item = char>,
    ) -> Result<(), AutomatonError> {
        let from = self.lookup(from)?;
        let to = self.lookup(to)?;
        for c in symbols {
            self.transitions.insert((from, c), to);
        }
        Ok(())
    }

    fn lookup(&self, name: &str) -> Result<StateId, AutomatonError> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| AutomatonError::UnknownState(name.to_string()))
    }

    /// Feeds one symbol; returns whether the automaton is now in a final state.
    pub fn process(&mut self, c: char) -> Result<bool, AutomatonError> {
        let from = self.current;
        let to = self.target(from, c).ok_or_else(|| AutomatonError::UndefinedTransition {
            state: self.name(from).to_string(),
            symbol: c,
        })?;

        // Only intermediate states accumulate; the terminating symbol is not
        // part of the lexeme.
        let is_final = self.is_final(to);
        if !is_final && to != INITIAL {
            self.lexeme.push(c);
        }
        self.current = to;
        self.steps.push(Step {
            from,
            symbol: c,
            to,
            lexeme: self.lexeme.clone(),
        });
        Ok(is_final)
    }

    pub fn reset(&mut self) {
        self.current = INITIAL;
        self.lexeme.clear();
        self.steps.clear();
    }

    /// Every (state, symbol) pair over `alphabet` without a successor.
    pub fn missing_transitions(&self, alphabet: &Alphabet) -> Vec<(StateId, char)> {
        let mut out = Vec::new();
        for s in 0..self.states.len() {
            let s = StateId(s as u16);
            for &c in alphabet.symbols() {
                if !self.transitions.contains_key(&(s, c)) {
                    out.push((s, c));
                }
            }
        }
        out
    }

    pub fn verify_totality(&self, alphabet: &Alphabet) -> bool {
        let missing = self.missing_transitions(alphabet);
        for &(s, c) in &missing {
            log::error!(
                "transition mapping: ({}, {c:?}) |--> new_state does not exist",
                self.name(s)
            );
        }
        missing.is_empty()
    }

    #[inline]
    pub fn target(&self, from: StateId, c: char) -> Option<StateId> {
        self.transitions.get(&(from, c)).copied()
    }

    #[inline]
    pub fn is_final(&self, s: StateId) -> bool {
        self.states.get(s.idx()).is_some_and(|i| i.is_final)
    }

    pub fn name(&self, s: StateId) -> &str {
        self.states.get(s.idx()).map_or("<invalid>", |i| i.name.as_str())
    }

    pub fn state_id(&self, name: &str) -> Option<StateId> {
        self.by_name.get(name).copied()
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn states(&self) -> impl Iterator<Item = StateId> + '_ {
        (0..self.states.len()).map(|s| StateId(s as u16))
    }

    pub fn final_states(&self) -> impl Iterator<Item = StateId> + '_ {
        self.states().filter(|&s| self.is_final(s))
    }

    pub fn current(&self) -> StateId {
        self.current
    }

    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

impl Default for Automaton {
    fn default() -> Self {
        Self::new()
    }
}

// -------------------- layered rules --------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    /// General rule for a state; yields to any override on the same symbol.
    Default,
    /// Specific rule; wins over defaults regardless of declaration order.
    Override,
}

#[derive(Debug, Clone)]
pub struct Rule {
    pub layer: Layer,
    pub from: &'static str,
    pub to: &'static str,
    pub symbols: Vec<char>,
}

/// A default entry replaced by an override during resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shadowed {
    pub state: &'static str,
    pub symbol: char,
    pub default_target: &'static str,
    pub override_target: &'static str,
}

#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// Resolved `(from, symbol, to)` entries in first-declaration order.
    pub entries: Vec<(&'static str, char, &'static str)>,
    pub shadowed: Vec<Shadowed>,
}

/// Ordered transition rules with explicit default/override precedence.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn default_rule(
        &mut self,
        from: &'static str,
        to: &'static str,
        symbols: impl IntoIterator<Item = char>,
    ) -> &mut Self {
        self.push(Layer::Default, from, to, symbols)
    }

    pub fn override_rule(
        &mut self,
        from: &'static str,
        to: &'static str,
        symbols: impl IntoIterator<Item = char>,
    ) -> &mut Self {
        self.push(Layer::Override, from, to, symbols)
    }

    fn push(
        &mut self,
        layer: Layer,
        from: &'static str,
        to: &'static str,
        symbols: impl IntoIterator<Item = char>,
    ) -> &mut Self {
        self.rules.push(Rule {
            layer,
            from,
            to,
            symbols: symbols.into_iter().collect(),
        });
        self
    }

    pub fn resolve(&self) -> Result<Resolution, AutomatonError> {
        type Key = (&'static str, char);
        let mut defaults: HashMap<Key, &'static str> = HashMap::new();
        let mut overrides: HashMap<Key, &'static str> = HashMap::new();
        let mut order: Vec<Key> = Vec::new();
        let mut seen: HashSet<Key> = HashSet::new();

        for rule in &self.rules {
            let layer = match rule.layer {
                Layer::Default => &mut defaults,
                Layer::Override => &mut overrides,
            };
            for &c in &rule.symbols {
                let key = (rule.from, c);
                if let Some(&prev) = layer.get(&key) {
                    if prev != rule.to {
                        return Err(AutomatonError::ConflictingRule {
                            state: rule.from.to_string(),
                            symbol: c,
                            first: prev.to_string(),
                            second: rule.to.to_string(),
                        });
                    }
                }
                layer.insert(key, rule.to);
                if seen.insert(key) {
                    order.push(key);
                }
            }
        }

        let mut out = Resolution::default();
        for key in order {
            let (state, symbol) = key;
            let target = match (defaults.get(&key), overrides.get(&key)) {
                (Some(&d), Some(&o)) => {
                    if d != o {
                        out.shadowed.push(Shadowed {
                            state,
                            symbol,
                            default_target: d,
                            override_target: o,
                        });
                    }
                    o
                }
                (_, Some(&o)) => o,
                (Some(&d), None) => d,
                (None, None) => continue,
            };
            out.entries.push((state, symbol, target));
        }
        Ok(out)
    }

    /// Resolves the rules and declares every entry on `automaton`.
    pub fn apply(&self, automaton: &mut Automaton) -> Result<Vec<Shadowed>, AutomatonError> {
        let res = self.resolve()?;
        for &(from, c, to) in &res.entries {
            automaton.declare_transition(from, to, [c])?;
        }
        log::debug!(
            "[automaton] applied {} rules: {} entries, {} shadowed defaults",
            self.rules.len(),
            res.entries.len(),
            res.shadowed.len()
        );
        Ok(res.shadowed)
    }
}
