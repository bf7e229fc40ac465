//! Static ranked-domain table, the offline fallback for rank lookups.
//!
//! Loaded once at startup from a `rank,domain` CSV (Tranco-style top-list
//! export) and immutable afterwards, so it is shared freely across
//! concurrent analyses. Failing to load it is fatal: without the fallback
//! the resolver contract cannot be honored.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::info;

use crate::domain::normalize_domain;

pub struct RankTable {
    ranks: HashMap<String, u64>,
}

impl RankTable {
    /// Loads the table from a CSV file with `rank,domain` rows. A leading
    /// header row is tolerated (any row whose rank column does not parse
    /// is skipped). Duplicate domains keep the lowest (best) rank.
    pub fn load(path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("opening rank table {}", path.display()))?;

        let mut ranks: HashMap<String, u64> = HashMap::new();
        for record in reader.records() {
            let record = record.with_context(|| format!("reading {}", path.display()))?;
            let (Some(rank_field), Some(domain_field)) = (record.get(0), record.get(1)) else {
                continue;
            };
            let Ok(rank) = rank_field.trim().parse::<u64>() else {
                continue;
            };
            let Ok(domain) = normalize_domain(domain_field) else {
                continue;
            };

            ranks
                .entry(domain)
                .and_modify(|existing| *existing = (*existing).min(rank))
                .or_insert(rank);
        }

        if ranks.is_empty() {
            bail!("rank table {} contains no usable rows", path.display());
        }

        info!(entries = ranks.len(), path = %path.display(), "Rank table loaded");
        Ok(Self { ranks })
    }

    /// Exact lookup by normalized domain.
    pub fn lookup(&self, domain: &str) -> Option<u64> {
        self.ranks.get(domain).copied()
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_table(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_and_lookup() {
        let file = write_table("1,google.com\n2,youtube.com\n3,facebook.com\n");
        let table = RankTable::load(file.path()).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.lookup("youtube.com"), Some(2));
        assert_eq!(table.lookup("missing.example"), None);
    }

    #[test]
    fn test_header_row_is_skipped() {
        let file = write_table("rank,domain\n1,google.com\n");
        let table = RankTable::load(file.path()).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_duplicate_domain_keeps_best_rank() {
        let file = write_table("500,example.com\n40,example.com\n700,example.com\n");
        let table = RankTable::load(file.path()).unwrap();
        assert_eq!(table.lookup("example.com"), Some(40));
    }

    #[test]
    fn test_domains_are_normalized_on_load() {
        let file = write_table("7,WWW.Example.COM\n");
        let table = RankTable::load(file.path()).unwrap();
        assert_eq!(table.lookup("example.com"), Some(7));
    }

    #[test]
    fn test_missing_file_is_fatal() {
        assert!(RankTable::load(Path::new("/nonexistent/ranks.csv")).is_err());
    }

    #[test]
    fn test_empty_table_is_fatal() {
        let file = write_table("rank,domain\n");
        assert!(RankTable::load(file.path()).is_err());
    }
}
