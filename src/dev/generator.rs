// src/dev/generator.rs
// Random-but-valid source generator shared by the tests and `fuzz_lex`.
// Every case comes with the (category, lexeme) sequence a correct scan yields.

use rand::Rng;

use crate::lexer::{canon::DEFAULT_RESERVED_WORDS, tables::tokens::Category};

const SYMBOLS: &[&str] = &[
    "<", ">", "=", ":", "/", "*", ",", ";", "+", "-", "(", ")", "[", "]", "{", "}", "<=", "<>",
    ">=", "==", ":=", "**", ".",
];
const SEPARATORS: &[&str] = &[" ", " ", " ", "  ", "\t", "\n", " \n "];
const STRING_CHARS: &str = "abcdefXYZ0123456789 .,;:=+-*/<>()[]{}!?@#$%^&_\"";

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, items: &[&'a str]) -> &'a str {
    items[rng.random_range(0..items.len())]
}

fn ident<R: Rng + ?Sized>(rng: &mut R) -> String {
    const HEAD: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ_";
    const TAIL: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ_0123456789";
    let mut s = String::new();
    s.push(HEAD[rng.random_range(0..HEAD.len())] as char);
    for _ in 0..rng.random_range(0..8) {
        s.push(TAIL[rng.random_range(0..TAIL.len())] as char);
    }
    if DEFAULT_RESERVED_WORDS.contains(&s.as_str()) {
        s.insert_str(0, "v_");
    }
    s
}

fn number<R: Rng + ?Sized>(rng: &mut R) -> String {
    let int = rng.random_range(0..100_000u32);
    match rng.random_range(0..3) {
        0 => int.to_string(),
        1 => format!("{int}.{}", rng.random_range(0..1000u32)),
        _ => format!(".{}", rng.random_range(0..1000u32)),
    }
}

fn string<R: Rng + ?Sized>(rng: &mut R) -> String {
    let chars: Vec<char> = STRING_CHARS.chars().collect();
    let mut s = String::from("'");
    for _ in 0..rng.random_range(0..12) {
        s.push(chars[rng.random_range(0..chars.len())]);
    }
    s.push('\'');
    s
}

fn glue_ok(prev: Category, prev_text: &str, next: Category) -> bool {
    match (prev, next) {
        // a word-like token followed by punctuation that cannot extend it
        (
            Category::Identifier | Category::Keyword | Category::Constant | Category::Str,
            Category::Symbol,
        ) => true,
        // an operator followed by a word; `.` would turn into a number
        (Category::Symbol, Category::Identifier | Category::Keyword) => prev_text != ".",
        _ => false,
    }
}

/// A source of at least `target_len` bytes and the tokens it must scan to.
pub fn gen_case<R: Rng + ?Sized>(
    rng: &mut R,
    target_len: usize,
) -> (String, Vec<(Category, String)>) {
    let mut src = String::new();
    let mut expected: Vec<(Category, String)> = Vec::new();

    while src.len() < target_len {
        let (cat, text) = match rng.random_range(0..10) {
            0..=2 => (Category::Identifier, ident(rng)),
            3 => (Category::Keyword, pick(rng, DEFAULT_RESERVED_WORDS).to_string()),
            4 | 5 => (Category::Constant, number(rng)),
            6 => (Category::Str, string(rng)),
            _ => (Category::Symbol, pick(rng, SYMBOLS).to_string()),
        };
        // symbols only glue to punctuation that is never the start of a compound
        let sym_glue =
            cat != Category::Symbol || (text.len() == 1 && ",;+-()[]{}".contains(text.as_str()));
        if let Some((pc, pt)) = expected.last() {
            if !(glue_ok(*pc, pt, cat) && sym_glue && rng.random_bool(0.5)) {
                src.push_str(pick(rng, SEPARATORS));
            }
        }
        src.push_str(&text);
        expected.push((cat, text));
    }
    // safe trailer
    src.push('\n');
    (src, expected)
}
