// src/parser/mod.rs
// Boundary to the grammar layer: it receives canonical tokens in emission
// order and builds whatever it needs from them.

use crate::lexer::{
    canon::TokenCanonicalizer,
    tables::tokens::{Category, Token},
};

pub trait TokenConsumer {
    type Output;

    /// Called once per token, in emission order. `lexeme` is the interned text.
    fn consume(&mut self, token: Token, lexeme: &str);

    fn finish(self) -> Self::Output;
}

/// Feeds the whole token history of `canon` to `consumer`.
pub fn feed_all<C: TokenConsumer>(canon: &TokenCanonicalizer, mut consumer: C) -> C::Output {
    for &t in canon.emit() {
        consumer.consume(t, canon.lexeme(t).unwrap_or_default());
    }
    consumer.finish()
}

/// Token counts per category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryHistogram {
    counts: [usize; Category::ALL.len()],
}

impl CategoryHistogram {
    pub fn count(&self, c: Category) -> usize {
        self.counts[c.slot()]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

impl TokenConsumer for CategoryHistogram {
    type Output = CategoryHistogram;

    fn consume(&mut self, token: Token, _lexeme: &str) {
        self.counts[token.category.slot()] += 1;
    }

    fn finish(self) -> Self::Output {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::cpu::{LexOptions, lex_on_cpu};

    struct Collect(Vec<String>);

    impl TokenConsumer for Collect {
        type Output = Vec<String>;
        fn consume(&mut self, _token: Token, lexeme: &str) {
            self.0.push(lexeme.to_string());
        }
        fn finish(self) -> Vec<String> {
            self.0
        }
    }

    #[test]
    fn consumers_see_emission_order() {
        let mut canon = TokenCanonicalizer::with_default_keywords();
        lex_on_cpu("if a<>b then c := 'x'", &mut canon, LexOptions::default()).unwrap();
        assert_eq!(
            feed_all(&canon, Collect(Vec::new())),
            vec!["if", "a", "<>", "b", "then", "c", ":=", "'x'"]
        );

        let h = feed_all(&canon, CategoryHistogram::default());
        assert_eq!(h.count(Category::Keyword), 2);
        assert_eq!(h.count(Category::Identifier), 3);
        assert_eq!(h.count(Category::Symbol), 2);
        assert_eq!(h.count(Category::Str), 1);
        assert_eq!(h.total(), 8);
    }
}
