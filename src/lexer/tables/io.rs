// src/lexer/tables/io.rs
use std::{
    io::{BufWriter, Write},
    path::Path,
    time::{Instant, SystemTime, UNIX_EPOCH},
};

use serde::{Deserialize, Serialize};

use super::{
    dfa::LexicalTable,
    tokens::{Category, Token},
};
use crate::lexer::{automaton::Automaton, canon::TokenCanonicalizer, cpu::TokenTrace};

// -------------------- line-oriented records --------------------

/// One `<category,index>` line per token.
pub fn write_token_stream<W: Write>(mut w: W, tokens: &[Token]) -> std::io::Result<()> {
    for t in tokens {
        writeln!(w, "{t}")?;
    }
    Ok(())
}

/// One `<category,index>` line prefixed with the wall-clock time it was
/// written, as `seconds.micros` since the Unix epoch.
pub fn write_stamped_token<W: Write>(mut w: W, token: Token) -> std::io::Result<()> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    writeln!(w, "{}.{:06} {token}", now.as_secs(), now.subsec_micros())
}

/// Every category header followed by its indented `(index, lexeme)` entries.
pub fn write_interned_tables<W: Write>(
    mut w: W,
    canon: &TokenCanonicalizer,
) -> std::io::Result<()> {
    for c in Category::ALL {
        writeln!(w, "{}: {}", c.id(), c.name())?;
        for (i, lexeme) in canon.dump(c) {
            writeln!(w, "    {i}: {lexeme}")?;
        }
    }
    Ok(())
}

/// The step log of one token, closed by a separator naming the lexeme.
pub fn write_transcript<W: Write>(
    mut w: W,
    automaton: &Automaton,
    trace: &TokenTrace,
) -> std::io::Result<()> {
    for s in &trace.steps {
        writeln!(
            w,
            "({},{})-->{}, current-lex={}",
            automaton.name(s.from),
            s.symbol,
            automaton.name(s.to),
            s.lexeme
        )?;
    }
    writeln!(w, "----------------------{}----------------------", trace.lexeme)?;
    writeln!(w)
}

// -------------------- JSON (de)serialization --------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternedDisk {
    pub category: Category,
    pub name: String,
    pub entries: Vec<String>,
}

/// Token history plus every interned table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanDisk {
    pub tokens: Vec<Token>,
    pub tables: Vec<InternedDisk>,
}

impl From<&TokenCanonicalizer> for ScanDisk {
    fn from(c: &TokenCanonicalizer) -> Self {
        Self {
            tokens: c.emit().to_vec(),
            tables: Category::ALL
                .into_iter()
                .map(|cat| InternedDisk {
                    category: cat,
                    name: cat.name().to_string(),
                    entries: c.dump(cat).into_iter().map(|(_, l)| l.to_string()).collect(),
                })
                .collect(),
        }
    }
}

impl ScanDisk {
    /// Rebuilds a canonicalizer so that a later scan keeps extending the same
    /// tables and indices.
    pub fn restore(self) -> Result<TokenCanonicalizer, String> {
        let mut tables: Vec<(Category, Vec<String>)> = Vec::with_capacity(self.tables.len());
        for t in self.tables {
            if tables.iter().any(|(c, _)| *c == t.category) {
                return Err(format!("category {} listed twice", t.category.name()));
            }
            tables.push((t.category, t.entries));
        }
        TokenCanonicalizer::from_parts(tables, self.tokens)
    }
}

pub fn save_scan_json(path: &Path, canon: &TokenCanonicalizer) -> std::io::Result<()> {
    let f = std::fs::File::create(path)?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer_pretty(&mut w, &ScanDisk::from(canon))?;
    w.flush()
}

pub fn load_scan_json_bytes(data: &[u8]) -> Result<ScanDisk, String> {
    serde_json::from_slice::<ScanDisk>(data).map_err(|e| format!("bad scan json: {e}"))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDisk {
    pub name: String,
    pub is_final: bool,
}

/// The resolved transition table, one entry per (state, symbol).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDisk {
    pub alphabet: String,
    pub states: Vec<StateDisk>,
    pub transitions: Vec<(String, char, String)>,
}

impl From<&LexicalTable> for TableDisk {
    fn from(t: &LexicalTable) -> Self {
        let m = t.automaton();
        let mut transitions = Vec::with_capacity(m.state_count() * t.alphabet().len());
        for s in m.states() {
            for &c in t.alphabet().symbols() {
                if let Some(n) = m.target(s, c) {
                    transitions.push((m.name(s).to_string(), c, m.name(n).to_string()));
                }
            }
        }
        Self {
            alphabet: t.alphabet().symbols().iter().collect(),
            states: m
                .states()
                .map(|s| StateDisk {
                    name: m.name(s).to_string(),
                    is_final: m.is_final(s),
                })
                .collect(),
            transitions,
        }
    }
}

pub fn save_table_json(path: &Path, t: &LexicalTable) -> std::io::Result<()> {
    let instant = Instant::now();
    let f = std::fs::File::create(path)?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer_pretty(&mut w, &TableDisk::from(t))?;
    let flush = w.flush();
    log::debug!(
        "[tables] saved {} in {} ms",
        path.display(),
        instant.elapsed().as_millis()
    );
    flush
}

pub fn load_table_json_bytes(data: &[u8]) -> Result<TableDisk, String> {
    serde_json::from_slice::<TableDisk>(data).map_err(|e| format!("bad table json: {e}"))
}
