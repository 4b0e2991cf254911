use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const DEFAULT_TOKEN_LEN: usize = 10;

/// A search query of the form `filetype:<TYPE> <token>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Query(String);

impl Query {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The randomized part of the query, after the type filter.
    pub fn token(&self) -> &str {
        self.0.rsplit(' ').next().unwrap_or_default()
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Query {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Draws `len` characters uniformly from `a..=z`.
pub fn random_token<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| char::from(rng.gen_range(b'a'..=b'z')))
        .collect()
}

/// Unbounded source of randomized queries scoped to one file type.
///
/// Consecutive queries may collide; that only costs search diversity.
#[derive(Debug)]
pub struct QueryGenerator<R = StdRng> {
    file_type: String,
    token_len: usize,
    rng: R,
}

impl QueryGenerator<StdRng> {
    pub fn new(file_type: impl Into<String>, token_len: usize) -> Self {
        Self::with_rng(file_type, token_len, StdRng::from_entropy())
    }
}

impl<R: Rng> QueryGenerator<R> {
    pub fn with_rng(file_type: impl Into<String>, token_len: usize, rng: R) -> Self {
        Self {
            file_type: file_type.into(),
            token_len,
            rng,
        }
    }

    pub fn next_query(&mut self) -> Query {
        let token = random_token(&mut self.rng, self.token_len);
        Query(format!("filetype:{} {}", self.file_type, token))
    }
}

impl<R: Rng> Iterator for QueryGenerator<R> {
    type Item = Query;

    fn next(&mut self) -> Option<Query> {
        Some(self.next_query())
    }
}
