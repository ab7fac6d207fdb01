// src/main.rs
// Usage:
//   cargo run -- script.simple            # writes script.lex / .stream / .set / .json (+ .log with SIMPLELEX_TRACE=1)
//   cargo run -- script.simple out/       # same, into out/

use std::{
    env, fs,
    io::{BufWriter, LineWriter, Write},
    path::{Path, PathBuf},
    time::Instant,
};

use anyhow::{Context, Result, anyhow};
use simplelex::{
    config::LexConfig,
    lexer::{
        canon::TokenCanonicalizer,
        cpu::{ScanReport, Scanner},
        tables::{
            save_scan_json, write_interned_tables, write_stamped_token, write_token_stream,
            write_transcript,
        },
    },
    parser::{CategoryHistogram, feed_all},
};

fn create(path: &Path) -> Result<BufWriter<fs::File>> {
    let f = fs::File::create(path).with_context(|| format!("create {}", path.display()))?;
    Ok(BufWriter::new(f))
}

fn main() -> Result<()> {
    let src_path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("usage: simplelex <source> [out_dir]"))?;
    let out_dir = env::args()
        .nth(2)
        .map(PathBuf::from)
        .or_else(|| src_path.parent().map(Path::to_path_buf))
        .unwrap_or_default();
    let stem = src_path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| anyhow!("invalid source filename: {src_path:?}"))?;
    if !out_dir.as_os_str().is_empty() {
        fs::create_dir_all(&out_dir).with_context(|| format!("create {}", out_dir.display()))?;
    }

    let cfg = LexConfig::from_env()?;
    let reserved = cfg.reserved_words()?;
    let src =
        fs::read_to_string(&src_path).with_context(|| format!("read {}", src_path.display()))?;

    // Timestamped tokens, one line each as soon as it is recognized.
    let stream_path = out_dir.join(format!("{stem}.stream"));
    let stream = fs::File::create(&stream_path)
        .with_context(|| format!("create {}", stream_path.display()))?;
    let mut stream = LineWriter::new(stream);
    let mut stream_err = None;

    let t0 = Instant::now();
    let mut canon = TokenCanonicalizer::new(&reserved);
    let mut scanner = Scanner::new(cfg.options()).context("lexical table is defective")?;
    let mut report = ScanReport::default();
    let result = scanner.scan_into(&src, &mut canon, &mut report, &mut |t| {
        if stream_err.is_none() {
            stream_err = write_stamped_token(&mut stream, t).err();
        }
    });
    println!(
        "[simplelex] {} ({} bytes) scanned in {:.3} ms",
        src_path.display(),
        src.len(),
        t0.elapsed().as_secs_f64() * 1e3
    );
    if let Some(e) = stream_err {
        return Err(e).with_context(|| format!("write {}", stream_path.display()));
    }
    stream.flush()?;

    // Whatever was recognized before a failure is still written out,
    // including the transcript of the token that failed.
    if cfg.trace {
        let log_path = out_dir.join(format!("{stem}.log"));
        let mut w = create(&log_path)?;
        for trace in &report.traces {
            write_transcript(&mut w, scanner.table().automaton(), trace)?;
        }
        w.flush()?;
    }

    let lex_path = out_dir.join(format!("{stem}.lex"));
    let mut w = create(&lex_path)?;
    write_token_stream(&mut w, canon.emit())?;
    w.flush()?;

    let set_path = out_dir.join(format!("{stem}.set"));
    let mut w = create(&set_path)?;
    write_interned_tables(&mut w, &canon)?;
    w.flush()?;

    save_scan_json(&out_dir.join(format!("{stem}.json")), &canon)?;

    result.with_context(|| format!("lexing {}", src_path.display()))?;

    for d in &report.diagnostics {
        eprintln!(
            "[simplelex] {}:{}:{}: {} {:?}",
            src_path.display(),
            d.line,
            d.column,
            d.message,
            d.lexeme
        );
    }

    let h = feed_all(&canon, CategoryHistogram::default());
    println!(
        "[simplelex] {} tokens ({} diagnostics) -> {}",
        h.total(),
        report.diagnostics.len(),
        lex_path.display()
    );
    Ok(())
}
