// src/bin/fuzz_lex.rs
// Generate random-but-valid sources, scan them, and compare with the tokens the
// generator intended.
//   - FUZZ_LEN / FUZZ_ITERS / FUZZ_SEED   size, iteration count, rng seed
//   - FUZZ_SAVE=1 and FUZZ_DIR=...        save generated cases
//   - FUZZ_INPUT=path                     replay a saved case; if a sidecar
//                                         <case>.tokens.json exists it is checked too

use std::{
    fs,
    path::{Path, PathBuf},
    time::Instant,
};

use rand::{SeedableRng, rngs::StdRng};
use simplelex::{
    dev::generator::gen_case,
    lexer::{
        canon::TokenCanonicalizer,
        cpu::{LexOptions, lex_on_cpu},
        tables::Category,
    },
};

// ------------------ goldens ------------------

#[derive(serde::Serialize, serde::Deserialize)]
struct Golden {
    tokens: Vec<GoldenTok>,
}
#[derive(serde::Serialize, serde::Deserialize)]
struct GoldenTok {
    kind: String,
    text: String,
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn load_golden_for(case: &Path) -> Option<Golden> {
    let p = case.with_extension("tokens.json");
    let s = fs::read_to_string(&p).ok()?;
    match serde_json::from_str::<Golden>(&s) {
        Ok(g) => Some(g),
        Err(e) => {
            eprintln!("[golden] failed to parse {}: {e}", p.display());
            None
        }
    }
}

fn save_case(
    dir: &str,
    seed: u64,
    iter: usize,
    src: &str,
    expected: &[(Category, String)],
) -> PathBuf {
    let name = format!("fuzz_seed{seed}_iter{iter}_n{}.simple", src.len());
    let path = Path::new(dir).join(name);
    fs::write(&path, src).ok();
    let golden = Golden {
        tokens: expected
            .iter()
            .map(|(c, t)| GoldenTok {
                kind: c.name().to_string(),
                text: t.clone(),
            })
            .collect(),
    };
    if let Ok(json) = serde_json::to_string_pretty(&golden) {
        fs::write(path.with_extension("tokens.json"), json).ok();
    }
    path
}

/// Scans `src`; returns (category name, lexeme) per token or the scan error.
fn scan(src: &str) -> Result<Vec<(String, String)>, String> {
    let mut canon = TokenCanonicalizer::with_default_keywords();
    let t0 = Instant::now();
    let report =
        lex_on_cpu(src, &mut canon, LexOptions::default()).map_err(|e| e.to_string())?;
    eprintln!(
        "[fuzz] {} bytes -> {} tokens in {:.3} ms",
        src.len(),
        report.tokens.len(),
        t0.elapsed().as_secs_f64() * 1e3
    );

    // interning must be stable: equal text in a category <=> equal index
    for c in Category::ALL {
        for (i, lexeme) in canon.dump(c) {
            if canon.table(c).get(lexeme) != Some(i) {
                return Err(format!("{} table: {lexeme:?} not at index {i}", c.name()));
            }
        }
    }

    Ok(report
        .tokens
        .iter()
        .map(|&t| {
            (
                t.category.name().to_string(),
                canon.lexeme(t).unwrap_or_default().to_string(),
            )
        })
        .collect())
}

fn compare(label: &str, got: &[(String, String)], want: &[(String, String)]) -> bool {
    if let Some(i) = (0..got.len().max(want.len())).find(|&i| got.get(i) != want.get(i)) {
        eprintln!(
            "[{label}] mismatch at token {i} (got {} tokens, want {})",
            got.len(),
            want.len()
        );
        let lo = i.saturating_sub(2);
        for j in lo..(i + 3).min(got.len().max(want.len())) {
            let mark = if got.get(j) == want.get(j) { "ok " } else { "ERR" };
            eprintln!("{mark} #{j:06} got={:?} want={:?}", got.get(j), want.get(j));
        }
        return false;
    }
    true
}

fn main() {
    // --- REPLAY A SINGLE CASE ---
    if let Ok(path) = std::env::var("FUZZ_INPUT") {
        eprintln!("[replay] reading {path}");
        let src = match fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("error: failed to read {path}: {e}");
                std::process::exit(1);
            }
        };
        let got = match scan(&src) {
            Ok(g) => g,
            Err(e) => {
                eprintln!("[replay] {e}");
                std::process::exit(1);
            }
        };
        if let Some(golden) = load_golden_for(Path::new(&path)) {
            let want: Vec<(String, String)> =
                golden.tokens.into_iter().map(|t| (t.kind, t.text)).collect();
            if !compare("golden", &got, &want) {
                std::process::exit(1);
            }
            eprintln!("[replay] matches golden");
        }
        return;
    }

    // --- FUZZ MODE ---
    let save_cases = std::env::var("FUZZ_SAVE").ok().as_deref() == Some("1");
    let out_dir = std::env::var("FUZZ_DIR").unwrap_or_else(|_| "fuzz-cases".to_string());
    let len: usize = env_or("FUZZ_LEN", 100_000);
    let iters: usize = env_or("FUZZ_ITERS", 3);
    let seed: u64 = env_or("FUZZ_SEED", 42);

    eprintln!("[fuzz] len={len} iters={iters} seed={seed}");
    let mut rng = StdRng::seed_from_u64(seed);

    if save_cases {
        if let Err(e) = fs::create_dir_all(&out_dir) {
            eprintln!("error: failed to create {out_dir}: {e}");
            std::process::exit(1);
        }
    }

    for i in 0..iters {
        let (src, expected) = gen_case(&mut rng, len);
        if save_cases {
            let p = save_case(&out_dir, seed, i, &src, &expected);
            eprintln!("[save] wrote {}", p.display());
        }
        let want: Vec<(String, String)> = expected
            .into_iter()
            .map(|(c, t)| (c.name().to_string(), t))
            .collect();
        let ok = match scan(&src) {
            Ok(got) => compare(&format!("iter {i}"), &got, &want),
            Err(e) => {
                eprintln!("[fuzz] iter {i}: {e}");
                false
            }
        };
        if !ok {
            std::process::exit(1);
        }
    }
    eprintln!("[fuzz] all iterations matched");
}
