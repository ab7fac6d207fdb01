// src/lexer/tables/mod.rs
pub mod dfa;
pub mod io;
pub mod tokens;

pub use dfa::{LexicalTable, S};
pub use io::{
    load_scan_json_bytes, load_table_json_bytes, save_scan_json, save_table_json,
    write_interned_tables, write_stamped_token, write_token_stream, write_transcript,
};
pub use tokens::{Category, Terminal, Token};
