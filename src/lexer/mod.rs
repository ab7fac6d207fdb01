// src/lexer/mod.rs
pub mod alphabet;
pub mod automaton;
pub mod canon;
pub mod cpu;
pub mod tables;
