// src/lexer/cpu.rs
// Character-at-a-time driver: feeds the lexical table, hands finished lexemes
// to the canonicalizer and replays the lookahead that ended each token.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    automaton::{AutomatonError, Step},
    canon::TokenCanonicalizer,
    tables::{
        dfa::{LexicalTable, S},
        tokens::{Terminal, Token},
    },
};

/// What the driver does with illegal input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IllegalPolicy {
    /// Abort the scan at the first illegal input.
    #[default]
    FailFast,
    /// Record an illegal token and a diagnostic, then keep scanning.
    Recover,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LexOptions {
    pub policy: IllegalPolicy,
    /// Keep the step log of every token in the report.
    pub trace: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("illegal input {lexeme:?} at {line}:{column}")]
    Illegal {
        line: usize,
        column: usize,
        lexeme: String,
    },
    #[error("character {ch:?} at {line}:{column} is outside the alphabet")]
    OutsideAlphabet { line: usize, column: usize, ch: char },
    #[error("input ended inside a token {lexeme:?} (state `{state}`) started at {line}:{column}")]
    UnterminatedToken {
        line: usize,
        column: usize,
        lexeme: String,
        state: &'static str,
    },
    #[error(transparent)]
    Automaton(#[from] AutomatonError),
}

/// Recovered illegal input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub line: usize,
    pub column: usize,
    pub lexeme: String,
    pub message: String,
    pub token: Token,
}

/// Step log of a single token, captured before the automaton is reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenTrace {
    pub lexeme: String,
    pub terminal: Terminal,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// Tokens recognized by this scan, in order.
    pub tokens: Vec<Token>,
    pub diagnostics: Vec<Diagnostic>,
    pub traces: Vec<TokenTrace>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pos {
    line: usize,
    column: usize,
}

pub struct Scanner {
    table: LexicalTable,
    options: LexOptions,
    token_start: Pos,
}

impl Scanner {
    pub fn new(options: LexOptions) -> Result<Self, AutomatonError> {
        Ok(Self {
            table: LexicalTable::new()?,
            options,
            token_start: Pos { line: 1, column: 1 },
        })
    }

    pub fn table(&self) -> &LexicalTable {
        &self.table
    }

    pub fn options(&self) -> LexOptions {
        self.options
    }

    /// Scans `src` line by line. Each line break becomes one space, so every
    /// line ends on a delimiter while tokens may still run across lines.
    pub fn scan(
        &mut self,
        src: &str,
        canon: &mut TokenCanonicalizer,
    ) -> Result<ScanReport, LexError> {
        let mut report = ScanReport::default();
        self.scan_into(src, canon, &mut report, &mut |_| {})?;
        Ok(report)
    }

    /// Like [`Scanner::scan`], but fills a caller-owned report and hands every
    /// token to `on_token` as soon as it is recognized. On error `report`
    /// keeps the tokens and traces gathered up to the failure, including the
    /// trace of the illegal token.
    pub fn scan_into(
        &mut self,
        src: &str,
        canon: &mut TokenCanonicalizer,
        report: &mut ScanReport,
        on_token: &mut dyn FnMut(Token),
    ) -> Result<(), LexError> {
        self.table.reset();

        for (l, line) in src.lines().enumerate() {
            for (col, c) in line.chars().chain(std::iter::once(' ')).enumerate() {
                let pos = Pos {
                    line: l + 1,
                    column: col + 1,
                };
                self.feed(c, pos, canon, report, on_token)?;
            }
        }

        if self.table.state() != S::Initial {
            let lexeme = self.table.lexeme().to_string();
            let state = self.table.state().name();
            let start = self.token_start;
            match self.options.policy {
                IllegalPolicy::FailFast => {
                    return Err(LexError::UnterminatedToken {
                        line: start.line,
                        column: start.column,
                        lexeme,
                        state,
                    });
                }
                IllegalPolicy::Recover => {
                    let message = format!("input ended inside a token (state `{state}`)");
                    self.recover(lexeme, start, message, canon, report, on_token);
                }
            }
        }

        log::debug!(
            "[lex] scanned {} tokens, {} diagnostics",
            report.tokens.len(),
            report.diagnostics.len()
        );
        Ok(())
    }

    fn feed(
        &mut self,
        c: char,
        pos: Pos,
        canon: &mut TokenCanonicalizer,
        report: &mut ScanReport,
        on_token: &mut dyn FnMut(Token),
    ) -> Result<(), LexError> {
        if self.table.state() == S::Initial {
            self.token_start = pos;
        }

        if !self.table.alphabet().contains(c) {
            return match self.options.policy {
                IllegalPolicy::FailFast => Err(LexError::OutsideAlphabet {
                    line: pos.line,
                    column: pos.column,
                    ch: c,
                }),
                IllegalPolicy::Recover => {
                    // Outside a string the pending token ends as if a blank
                    // had arrived; the character is reported alone.
                    if !matches!(
                        self.table.state(),
                        S::Initial | S::QuoteOpen | S::StringBody
                    ) {
                        self.feed(' ', pos, canon, report, on_token)?;
                    }
                    let lexeme = format!("{}{c}", self.table.lexeme());
                    let message = "character outside the alphabet".to_string();
                    self.recover(lexeme, pos, message, canon, report, on_token);
                    Ok(())
                }
            };
        }

        self.table.process(c)?;
        let Some(terminal) = self.table.terminal() else {
            return Ok(());
        };

        if self.options.trace {
            report.traces.push(TokenTrace {
                lexeme: self.table.lexeme().to_string(),
                terminal,
                steps: self.table.steps().to_vec(),
            });
        }

        if terminal == Terminal::Illegal {
            // The offending symbol is reported with the text before it and is
            // not replayed.
            let lexeme = format!("{}{c}", self.table.lexeme());
            return match self.options.policy {
                IllegalPolicy::FailFast => Err(LexError::Illegal {
                    line: pos.line,
                    column: pos.column,
                    lexeme,
                }),
                IllegalPolicy::Recover => {
                    self.recover(lexeme, pos, "illegal input".into(), canon, report, on_token);
                    Ok(())
                }
            };
        }

        let token = canon.classify(self.table.lexeme(), terminal);
        report.tokens.push(token);
        on_token(token);
        self.table.reset();

        // `c` terminated the previous token and starts the next one.
        self.feed(c, pos, canon, report, on_token)
    }

    fn recover(
        &mut self,
        lexeme: String,
        pos: Pos,
        message: String,
        canon: &mut TokenCanonicalizer,
        report: &mut ScanReport,
        on_token: &mut dyn FnMut(Token),
    ) {
        let token = canon.classify(&lexeme, Terminal::Illegal);
        log::warn!(
            "[lex] {message}: {lexeme:?} at {}:{}; resuming",
            pos.line,
            pos.column
        );
        report.tokens.push(token);
        on_token(token);
        report.diagnostics.push(Diagnostic {
            line: pos.line,
            column: pos.column,
            lexeme,
            message,
            token,
        });
        self.table.reset();
    }
}

/// One-shot scan with a fresh table.
pub fn lex_on_cpu(
    src: &str,
    canon: &mut TokenCanonicalizer,
    options: LexOptions,
) -> Result<ScanReport, LexError> {
    Scanner::new(options)?.scan(src, canon)
}
