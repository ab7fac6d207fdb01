//! Size sweep over generated sources:
//!  - all target lengths < 64 (0..=63), runs by default
//!  - powers of two from 64 up to ~1,000,000, opt-in (ignored by default)
//!
//! Sources come from the shared generator (same as fuzz_lex), which also
//! reports the tokens each source must scan to.

use rand::{SeedableRng, rngs::StdRng};
use simplelex::{
    dev::generator::gen_case,
    lexer::{
        automaton::INITIAL,
        canon::TokenCanonicalizer,
        cpu::{LexOptions, lex_on_cpu},
        tables::{Category, LexicalTable},
    },
};

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_usize(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(default)
}

fn run_one(target_len: usize, seed: u64) {
    // Derive a per-length seed for reproducibility across iterations.
    let mut rng =
        StdRng::seed_from_u64(seed ^ (target_len as u64).wrapping_mul(0x9E3779B97F4A7C15));
    let (src, expected) = gen_case(&mut rng, target_len);

    let mut canon = TokenCanonicalizer::with_default_keywords();
    let opts = LexOptions {
        trace: true,
        ..LexOptions::default()
    };
    let report = lex_on_cpu(&src, &mut canon, opts)
        .unwrap_or_else(|e| panic!("target_len={target_len} seed={seed}: {e}\n{src:?}"));

    let got: Vec<(Category, String)> = report
        .tokens
        .iter()
        .map(|&t| (t.category, canon.lexeme(t).unwrap().to_string()))
        .collect();
    assert_eq!(got, expected, "target_len={target_len} seed={seed}\n{src:?}");

    // Lexeme = symbols consumed while moving into intermediate states.
    let m = LexicalTable::new().unwrap();
    for trace in &report.traces {
        let rebuilt: String = trace
            .steps
            .iter()
            .filter(|s| s.to != INITIAL && !m.automaton().is_final(s.to))
            .map(|s| s.symbol)
            .collect();
        assert_eq!(rebuilt, trace.lexeme);
        let last = trace.steps.last().unwrap();
        assert!(m.automaton().is_final(last.to));
        assert!(
            trace.steps[..trace.steps.len() - 1]
                .iter()
                .all(|s| !m.automaton().is_final(s.to))
        );
    }

    // Interning: the same text in a category always maps to one index.
    for (tok, (_, text)) in report.tokens.iter().zip(&expected) {
        assert_eq!(canon.table(tok.category).get(text), Some(tok.index));
    }
}

/// Sweep 0..=63 target lengths. (Fast; runs by default.)
#[test]
fn size_sweep_small_targets() {
    let seed = env_u64("SIZE_SWEEP_SEED", 42);
    for len in 0..=63 {
        run_one(len, seed);
    }
}

#[test]
fn several_seeds() {
    for seed in 0..16 {
        run_one(512, seed);
    }
}

/// Powers of two from 64 up to ~1,000,000 (capped by SIZE_SWEEP_MAX).
#[test]
#[ignore]
fn size_sweep_powers_of_two() {
    let seed = env_u64("SIZE_SWEEP_SEED", 42);
    let max_len = env_usize("SIZE_SWEEP_MAX", 1_000_000);

    let mut n = 64usize;
    while n <= max_len {
        run_one(n, seed);
        eprintln!("[size_sweep] ok: target_len={n}");
        n = n.saturating_mul(2);
    }
}
