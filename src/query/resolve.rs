//! Song name resolution.
//!
//! A [`SongResolver`] maps user-written song names to stable catalog ids.
//! Matching precedence: exact name, case-insensitive name, alias,
//! trimmed-suffix (trailing ` -` stripped, case-insensitive). Two
//! implementations: a static in-memory map for tests and embedded catalogs,
//! and a store-backed resolver that delegates to the data source.

use std::collections::HashMap;
use std::sync::Arc;

use crate::cancel::CancelToken;
use crate::data::{DataError, DataSource};

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("song not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Data(#[from] DataError),
}

pub trait SongResolver: Send + Sync {
    /// Resolve a song name to its id.
    fn resolve(&self, ctx: &CancelToken, name: &str) -> Result<i64, ResolveError>;

    /// Candidate names for "did you mean" hints. Empty when nothing is
    /// plausible.
    fn suggest(&self, ctx: &CancelToken, name: &str) -> Vec<String>;
}

/// Strip the trailing-dash noise some sources append to segued songs
/// ("Scarlet Begonias -") and lowercase for comparison. Trailing only: a
/// leading dash is part of the name.
fn trim_key(name: &str) -> String {
    let name = name.strip_suffix(" -").unwrap_or(name);
    let name = name.strip_suffix('-').unwrap_or(name);
    name.to_lowercase()
}

/// Resolver over a fixed name→id map plus an optional alias table.
pub struct StaticResolver {
    by_name: HashMap<String, i64>,
    aliases: HashMap<String, i64>,
}

impl StaticResolver {
    pub fn new(by_name: HashMap<String, i64>) -> Self {
        Self {
            by_name,
            aliases: HashMap::new(),
        }
    }

    pub fn with_aliases(mut self, aliases: HashMap<String, i64>) -> Self {
        self.aliases = aliases;
        self
    }
}

impl SongResolver for StaticResolver {
    fn resolve(&self, _ctx: &CancelToken, name: &str) -> Result<i64, ResolveError> {
        if let Some(&id) = self.by_name.get(name) {
            return Ok(id);
        }
        let lower = name.to_lowercase();
        if let Some(&id) = self
            .by_name
            .iter()
            .find(|(n, _)| n.to_lowercase() == lower)
            .map(|(_, id)| id)
        {
            return Ok(id);
        }
        if let Some(&id) = self.aliases.get(name) {
            return Ok(id);
        }
        if let Some(&id) = self
            .aliases
            .iter()
            .find(|(a, _)| a.to_lowercase() == lower)
            .map(|(_, id)| id)
        {
            return Ok(id);
        }
        let trimmed = trim_key(name);
        if let Some(&id) = self
            .by_name
            .iter()
            .find(|(n, _)| trim_key(n) == trimmed)
            .map(|(_, id)| id)
        {
            return Ok(id);
        }
        Err(ResolveError::NotFound(name.to_string()))
    }

    fn suggest(&self, _ctx: &CancelToken, name: &str) -> Vec<String> {
        let lower = name.to_lowercase();
        let mut out: Vec<String> = self
            .by_name
            .keys()
            .filter(|n| {
                let nl = n.to_lowercase();
                nl.contains(&lower) || lower.contains(&nl)
            })
            .cloned()
            .collect();
        out.sort();
        out.dedup();
        out
    }
}

/// Resolver backed by the data source's song lookup and fuzzy search.
pub struct StoreResolver {
    store: Arc<dyn DataSource>,
}

impl StoreResolver {
    pub fn new(store: Arc<dyn DataSource>) -> Self {
        Self { store }
    }
}

impl SongResolver for StoreResolver {
    fn resolve(&self, ctx: &CancelToken, name: &str) -> Result<i64, ResolveError> {
        if ctx.is_cancelled() {
            return Err(ResolveError::Data(DataError::Cancelled));
        }
        match self.store.get_song(ctx, name)? {
            Some(song) => Ok(song.id),
            None => Err(ResolveError::NotFound(name.to_string())),
        }
    }

    fn suggest(&self, ctx: &CancelToken, name: &str) -> Vec<String> {
        let songs = self.store.search_songs(ctx, name).unwrap_or_default();
        let mut out: Vec<String> = songs.into_iter().map(|s| s.name).collect();
        out.dedup();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> StaticResolver {
        let names = HashMap::from([
            ("Scarlet Begonias".to_string(), 1_i64),
            ("Fire on the Mountain".to_string(), 2),
            ("Dark Star".to_string(), 10),
            ("dark star jam".to_string(), 11),
        ]);
        let aliases = HashMap::from([
            ("Scarlet".to_string(), 1_i64),
            ("Fire".to_string(), 2),
        ]);
        StaticResolver::new(names).with_aliases(aliases)
    }

    #[test]
    fn exact_match() {
        let ctx = CancelToken::new();
        assert_eq!(resolver().resolve(&ctx, "Dark Star").expect("resolve"), 10);
    }

    #[test]
    fn case_insensitive_match() {
        let ctx = CancelToken::new();
        assert_eq!(resolver().resolve(&ctx, "dark STAR").expect("resolve"), 10);
    }

    #[test]
    fn alias_match() {
        let ctx = CancelToken::new();
        assert_eq!(resolver().resolve(&ctx, "Scarlet").expect("resolve"), 1);
        assert_eq!(resolver().resolve(&ctx, "fire").expect("resolve"), 2);
    }

    #[test]
    fn trimmed_suffix_match() {
        let ctx = CancelToken::new();
        assert_eq!(
            resolver().resolve(&ctx, "Dark Star -").expect("resolve"),
            10
        );
        assert_eq!(
            resolver().resolve(&ctx, "dark star-").expect("resolve"),
            10
        );
    }

    #[test]
    fn leading_dash_is_not_trimmed() {
        let ctx = CancelToken::new();
        let names = HashMap::from([("- Packard Suite".to_string(), 3_i64)]);
        let r = StaticResolver::new(names);
        // Trailing noise comes off; the leading dash stays significant.
        assert_eq!(r.resolve(&ctx, "- Packard Suite -").expect("resolve"), 3);
        assert!(r.resolve(&ctx, "Packard Suite").is_err());
    }

    #[test]
    fn exact_beats_case_insensitive() {
        // "dark star jam" exists verbatim; exact match must win over any
        // case-insensitive or trimmed candidate.
        let ctx = CancelToken::new();
        assert_eq!(
            resolver().resolve(&ctx, "dark star jam").expect("resolve"),
            11
        );
    }

    #[test]
    fn alias_beats_trimmed_suffix() {
        let ctx = CancelToken::new();
        let names = HashMap::from([("Fire -".to_string(), 7_i64)]);
        let aliases = HashMap::from([("Fire".to_string(), 2_i64)]);
        let r = StaticResolver::new(names).with_aliases(aliases);
        assert_eq!(r.resolve(&ctx, "Fire").expect("resolve"), 2);
    }

    #[test]
    fn unknown_name_is_not_found() {
        let ctx = CancelToken::new();
        let err = resolver().resolve(&ctx, "Terrapin").expect_err("miss");
        assert!(matches!(err, ResolveError::NotFound(n) if n == "Terrapin"));
    }

    #[test]
    fn suggestions_by_containment() {
        let ctx = CancelToken::new();
        let out = resolver().suggest(&ctx, "Scarlet Begonia");
        assert_eq!(out, vec!["Scarlet Begonias".to_string()]);
    }

    #[test]
    fn suggestions_empty_when_implausible() {
        let ctx = CancelToken::new();
        assert!(resolver().suggest(&ctx, "Sugar Magnolia").is_empty());
    }
}
