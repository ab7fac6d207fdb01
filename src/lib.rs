// src/lib.rs
//! Lexical front end for the `simple` language: a verified transition table
//! drives a named-state automaton, and finished lexemes are interned into
//! per-category tables that yield `<category,index>` tokens.

pub mod config;
pub mod dev;
pub mod lexer;
pub mod parser;
