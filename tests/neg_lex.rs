//! Inputs that must abort a fail-fast scan.

use simplelex::lexer::{
    canon::TokenCanonicalizer,
    cpu::{LexError, LexOptions, lex_on_cpu},
};

fn lex(src: &str) -> Result<(), LexError> {
    let mut canon = TokenCanonicalizer::with_default_keywords();
    lex_on_cpu(src, &mut canon, LexOptions::default()).map(|_| ())
}

#[test]
fn unterminated_string_eof() {
    let err = lex("s := 'hello").unwrap_err();
    assert!(matches!(err, LexError::UnterminatedToken { .. }), "{err}");
}

#[test]
fn letters_inside_a_number() {
    assert!(matches!(lex("x := 12x").unwrap_err(), LexError::Illegal { .. }));
    assert!(matches!(lex("x := 1.5e3").unwrap_err(), LexError::Illegal { .. }));
    assert!(matches!(lex("x := 3_000").unwrap_err(), LexError::Illegal { .. }));
}

#[test]
fn two_dots_in_a_number() {
    let err = lex("1.2.3").unwrap_err();
    assert_eq!(
        err,
        LexError::Illegal {
            line: 1,
            column: 4,
            lexeme: "1.2.".into()
        }
    );
}

#[test]
fn characters_that_start_no_token() {
    for src in ["a ! b", "x := \"s\"", "a # b", "c & d", "p \\ q"] {
        assert!(matches!(lex(src).unwrap_err(), LexError::Illegal { .. }), "{src}");
    }
}

#[test]
fn characters_outside_the_alphabet() {
    for src in ["a ~ b", "x := 'ü'", "`"] {
        assert!(
            matches!(lex(src).unwrap_err(), LexError::OutsideAlphabet { .. }),
            "{src}"
        );
    }
}
