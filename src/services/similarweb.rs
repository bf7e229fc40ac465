//! SimilarWeb-style live traffic-rank client.

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::fetch::auth::UrlParam;
use crate::fetch::{BasicClient, HttpClient, fetch_json};
use crate::services::providers::{LiveRank, RankProvider};

const ENDPOINT: &str = "https://api.similarweb.com/v1/similar-rank";

pub struct SimilarWebClient<C = BasicClient> {
    endpoint: String,
    client: UrlParam<C>,
}

impl<C: HttpClient> SimilarWebClient<C> {
    pub fn new(api_key: String, inner: C) -> Self {
        Self {
            endpoint: ENDPOINT.to_string(),
            client: UrlParam {
                inner,
                param_name: "api_key".to_string(),
                key: api_key,
            },
        }
    }
}

#[async_trait]
impl<C: HttpClient> RankProvider for SimilarWebClient<C> {
    async fn lookup_live_rank(&self, domain: &str) -> Result<LiveRank, ProviderError> {
        let url = format!("{}/{domain}/rank", self.endpoint);
        let data = fetch_json(&self.client, &url, "similarweb").await?;

        Ok(LiveRank {
            rank: data["similar_rank"]["rank"]
                .as_u64()
                .or_else(|| data["similar_rank"].as_u64()),
            last_updated: data["last_updated"].as_str().map(str::to_string),
        })
    }
}
