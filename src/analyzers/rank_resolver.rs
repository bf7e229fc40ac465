//! Canonical rank resolution: live lookup first, static table fallback.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::analyzers::rank_table::RankTable;
use crate::services::providers::{LiveRank, RankProvider};

/// Where a resolved rank came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankSource {
    Live,
    Static,
    None,
}

#[derive(Debug, Clone)]
pub struct RankResolution {
    pub rank: Option<u64>,
    pub source: RankSource,
    pub last_updated: Option<String>,
}

pub struct DomainRankResolver {
    provider: Arc<dyn RankProvider>,
    table: Arc<RankTable>,
}

impl DomainRankResolver {
    pub fn new(provider: Arc<dyn RankProvider>, table: Arc<RankTable>) -> Self {
        Self { provider, table }
    }

    /// Resolves a rank for an already-normalized domain. A live-provider
    /// failure degrades to the static table, never to an error.
    pub async fn resolve(&self, domain: &str) -> RankResolution {
        match self.provider.lookup_live_rank(domain).await {
            Ok(LiveRank {
                rank: Some(rank),
                last_updated,
            }) => RankResolution {
                rank: Some(rank),
                source: RankSource::Live,
                last_updated,
            },
            Ok(LiveRank { rank: None, .. }) => self.fallback(domain),
            Err(e) => {
                warn!(domain, error = %e, "Live rank lookup failed, using static table");
                self.fallback(domain)
            }
        }
    }

    fn fallback(&self, domain: &str) -> RankResolution {
        match self.table.lookup(domain) {
            Some(rank) => RankResolution {
                rank: Some(rank),
                source: RankSource::Static,
                last_updated: None,
            },
            None => RankResolution {
                rank: None,
                source: RankSource::None,
                last_updated: None,
            },
        }
    }
}
