//! Crypto glossary over a [`JsonStore`].

use crate::error::{Error, Result};
use crate::store::JsonStore;
use metrics::counter;
use std::path::PathBuf;
use tracing::{debug, info};

/// Returned by [`Glossary::lookup`] for unknown terms.
pub const NO_DEFINITION: &str = "No definition found.";

/// Entries written on first run.
pub const SEED_TERMS: &[(&str, &str)] = &[
    ("bitcoin", "Bitcoin is a decentralized digital currency."),
    ("wallet", "A crypto wallet stores your private keys securely."),
    (
        "blockchain",
        "A distributed ledger technology for recording transactions.",
    ),
    (
        "defi",
        "Decentralized finance — financial systems built on blockchain.",
    ),
    (
        "nft",
        "Non-fungible token — unique digital asset verified on a blockchain.",
    ),
];

/// Case-insensitive term -> definition lookup.
#[derive(Debug)]
pub struct Glossary {
    store: JsonStore,
}

impl Glossary {
    pub fn new(store: JsonStore) -> Self {
        Self { store }
    }

    /// Open the glossary file, seeding it on first run.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self::new(JsonStore::open(path, SEED_TERMS)?))
    }

    /// Definition of `term`, or `NotFound`.
    pub fn definition(&self, term: &str) -> Result<String> {
        let key = term.to_lowercase();
        self.store.get(&key).ok_or(Error::NotFound(key))
    }

    /// Definition of `term`, or [`NO_DEFINITION`]. Never fails.
    pub fn lookup(&self, term: &str) -> String {
        match self.definition(term) {
            Ok(definition) => {
                counter!("karios_term_lookups_total", "hit" => "true").increment(1);
                definition
            }
            Err(_) => {
                counter!("karios_term_lookups_total", "hit" => "false").increment(1);
                debug!("No definition for '{}'", term);
                NO_DEFINITION.to_string()
            }
        }
    }

    /// Insert or overwrite a term. Returns the stored (lowercased) key.
    pub async fn add(&self, term: &str, definition: &str) -> Result<String> {
        let key = term.to_lowercase();
        if key.is_empty() || definition.is_empty() {
            return Err(Error::MissingField);
        }

        self.store.insert(&key, definition).await?;
        counter!("karios_terms_added_total").increment(1);
        info!("Added term '{}'", key);

        Ok(key)
    }

    /// All terms, sorted.
    pub fn list_terms(&self) -> Vec<String> {
        self.store.keys()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn glossary(dir: &TempDir) -> Glossary {
        Glossary::open(dir.path().join("karios_brain.json")).unwrap()
    }

    #[test]
    fn test_seeded_on_first_run() {
        let dir = TempDir::new().unwrap();
        let glossary = glossary(&dir);
        assert_eq!(
            glossary.list_terms(),
            vec!["bitcoin", "blockchain", "defi", "nft", "wallet"]
        );
    }

    #[test]
    fn test_lookup_case_insensitive() {
        let dir = TempDir::new().unwrap();
        let glossary = glossary(&dir);
        assert_eq!(glossary.lookup("Bitcoin"), glossary.lookup("bitcoin"));
        assert_eq!(
            glossary.lookup("BITCOIN"),
            "Bitcoin is a decentralized digital currency."
        );
    }

    #[test]
    fn test_lookup_miss_returns_sentinel() {
        let dir = TempDir::new().unwrap();
        let glossary = glossary(&dir);
        assert_eq!(glossary.lookup("staking"), NO_DEFINITION);
        assert!(matches!(
            glossary.definition("Staking"),
            Err(Error::NotFound(key)) if key == "staking"
        ));
    }

    #[tokio::test]
    async fn test_add_then_lookup() {
        let dir = TempDir::new().unwrap();
        let glossary = glossary(&dir);

        assert_eq!(glossary.add("foo", "bar").await.unwrap(), "foo");
        assert_eq!(glossary.lookup("foo"), "bar");
        assert!(glossary.list_terms().contains(&"foo".to_string()));
    }

    #[tokio::test]
    async fn test_add_lowercases_and_overwrites() {
        let dir = TempDir::new().unwrap();
        let glossary = glossary(&dir);

        assert_eq!(glossary.add("Wallet", "Holds keys.").await.unwrap(), "wallet");
        assert_eq!(glossary.lookup("wallet"), "Holds keys.");
        assert_eq!(glossary.len(), SEED_TERMS.len());
    }

    #[tokio::test]
    async fn test_add_missing_field() {
        let dir = TempDir::new().unwrap();
        let glossary = glossary(&dir);

        assert!(matches!(glossary.add("", "bar").await, Err(Error::MissingField)));
        assert!(matches!(glossary.add("foo", "").await, Err(Error::MissingField)));
        assert_eq!(glossary.len(), SEED_TERMS.len());
        assert_eq!(glossary.lookup("foo"), NO_DEFINITION);
    }

    #[tokio::test]
    async fn test_add_survives_reopen() {
        let dir = TempDir::new().unwrap();
        glossary(&dir).add("gas", "Fee paid to execute a transaction.").await.unwrap();

        let reopened = glossary(&dir);
        assert_eq!(reopened.lookup("gas"), "Fee paid to execute a transaction.");
    }
}
