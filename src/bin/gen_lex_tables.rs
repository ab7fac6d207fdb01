// src/bin/gen_lex_tables.rs
// Build the lexical table, verify it, and write the resolved transitions to JSON.
// Usage:
//   cargo run --bin gen_lex_tables                # writes tables/lexer_tables.json
//   cargo run --bin gen_lex_tables -- /path/out.json

use std::{env, fs, path::Path};

use simplelex::lexer::tables::{LexicalTable, save_table_json};

fn main() {
    let out = env::args()
        .nth(1)
        .unwrap_or_else(|| "tables/lexer_tables.json".to_string());
    let out_path = Path::new(&out);

    if let Some(parent) = out_path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            eprintln!("error: failed to create {}: {e}", parent.display());
            std::process::exit(1);
        }
    }

    println!("[gen_lex_tables] building lexical table…");
    let table = match LexicalTable::new() {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    let states = table.automaton().state_count();
    let finals = table.automaton().final_states().count();
    println!(
        "[gen_lex_tables] {} states ({} final) x {} symbols, {} defaults overridden",
        states,
        finals,
        table.alphabet().len(),
        table.shadowed().len()
    );
    for s in table.unreachable_states() {
        println!("[gen_lex_tables] note: state `{}` is unreachable", s.name());
    }

    if let Err(e) = save_table_json(out_path, &table) {
        eprintln!("error: failed to write {}: {e}", out_path.display());
        std::process::exit(1);
    }
    println!("[gen_lex_tables] wrote {}", out_path.display());
}
