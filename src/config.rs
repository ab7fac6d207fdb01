// src/config.rs
// Scan settings read from the environment.
//
//   SIMPLELEX_POLICY    fail-fast | recover      (default: fail-fast)
//   SIMPLELEX_TRACE     0 | 1                    (default: 0)
//   SIMPLELEX_KEYWORDS  path to a whitespace-separated reserved-word list

use std::path::PathBuf;

use thiserror::Error;

use crate::lexer::{
    canon::DEFAULT_RESERVED_WORDS,
    cpu::{IllegalPolicy, LexOptions},
};

pub const ENV_POLICY: &str = "SIMPLELEX_POLICY";
pub const ENV_TRACE: &str = "SIMPLELEX_TRACE";
pub const ENV_KEYWORDS: &str = "SIMPLELEX_KEYWORDS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {var}")]
    InvalidValue { var: &'static str, value: String },
    #[error("failed to read keywords from {}: {source}", .path.display())]
    Keywords {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LexConfig {
    pub policy: IllegalPolicy,
    pub trace: bool,
    pub keywords: Option<PathBuf>,
}

impl LexConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut cfg = Self::default();
        if let Some(v) = get(ENV_POLICY) {
            cfg.policy = match v.trim() {
                "fail-fast" | "" => IllegalPolicy::FailFast,
                "recover" => IllegalPolicy::Recover,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        var: ENV_POLICY,
                        value: v,
                    });
                }
            };
        }
        if let Some(v) = get(ENV_TRACE) {
            cfg.trace = match v.trim() {
                "1" | "true" => true,
                "0" | "false" | "" => false,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        var: ENV_TRACE,
                        value: v,
                    });
                }
            };
        }
        cfg.keywords = get(ENV_KEYWORDS).filter(|p| !p.is_empty()).map(PathBuf::from);
        Ok(cfg)
    }

    pub fn options(&self) -> LexOptions {
        LexOptions {
            policy: self.policy,
            trace: self.trace,
        }
    }

    /// The configured reserved-word list, or the built-in one.
    pub fn reserved_words(&self) -> Result<Vec<String>, ConfigError> {
        match &self.keywords {
            Some(path) => std::fs::read_to_string(path)
                .map(|s| parse_reserved_words(&s))
                .map_err(|source| ConfigError::Keywords {
                    path: path.clone(),
                    source,
                }),
            None => Ok(DEFAULT_RESERVED_WORDS.iter().map(|w| w.to_string()).collect()),
        }
    }
}

pub fn parse_reserved_words(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |k| {
            pairs
                .iter()
                .find(|(name, _)| *name == k)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn defaults() {
        let cfg = LexConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, LexConfig::default());
        assert_eq!(cfg.options().policy, IllegalPolicy::FailFast);
        assert_eq!(cfg.reserved_words().unwrap().len(), DEFAULT_RESERVED_WORDS.len());
    }

    #[test]
    fn reads_values() {
        let cfg = LexConfig::from_lookup(lookup(&[
            (ENV_POLICY, "recover"),
            (ENV_TRACE, "1"),
            (ENV_KEYWORDS, "kw.txt"),
        ]))
        .unwrap();
        assert_eq!(cfg.policy, IllegalPolicy::Recover);
        assert!(cfg.trace);
        assert_eq!(cfg.keywords, Some(PathBuf::from("kw.txt")));
    }

    #[test]
    fn rejects_bad_values() {
        let err = LexConfig::from_lookup(lookup(&[(ENV_POLICY, "sometimes")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { var: ENV_POLICY, .. }));
        let err = LexConfig::from_lookup(lookup(&[(ENV_TRACE, "yes")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { var: ENV_TRACE, .. }));
    }

    #[test]
    fn missing_keywords_file() {
        let cfg = LexConfig {
            keywords: Some(PathBuf::from("/nonexistent/keywords.txt")),
            ..LexConfig::default()
        };
        assert!(matches!(cfg.reserved_words(), Err(ConfigError::Keywords { .. })));
    }

    #[test]
    fn reserved_word_file_format() {
        assert_eq!(
            parse_reserved_words("begin end\n  if\tthen\n"),
            vec!["begin", "end", "if", "then"]
        );
    }
}
