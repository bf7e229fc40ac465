//! Knowledge-graph firmographics client (Diffbot-style DQL).
//!
//! The raw entity payload is shape-shifting: the same logical field can
//! arrive as a string, an object with a name, or an object with a value.
//! Every field therefore goes through the category decoders in
//! [`crate::services::decode`].

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ProviderError;
use crate::fetch::auth::UrlParam;
use crate::fetch::{BasicClient, HttpClient, fetch_json};
use crate::services::decode::{date_like, money_like, numeric_like, string_like};
use crate::services::providers::{Firmographics, FirmographicsProvider, Location, SocialProfiles};

const ENDPOINT: &str = "https://kg.diffbot.com/kg/v3/dql";

pub struct DiffbotClient<C = BasicClient> {
    endpoint: String,
    client: UrlParam<C>,
}

impl<C: HttpClient> DiffbotClient<C> {
    pub fn new(token: String, inner: C) -> Self {
        Self {
            endpoint: ENDPOINT.to_string(),
            client: UrlParam {
                inner,
                param_name: "token".to_string(),
                key: token,
            },
        }
    }
}

#[async_trait]
impl<C: HttpClient> FirmographicsProvider for DiffbotClient<C> {
    async fn lookup_firmographics(
        &self,
        url: &str,
    ) -> Result<Option<Firmographics>, ProviderError> {
        let query = format!("type:Organization allUris:\"{url}\"");
        let request_url = format!(
            "{}?type=query&query={}&col=all&size=1&format=json",
            self.endpoint,
            query.replace(' ', "%20").replace('"', "%22")
        );

        let data = fetch_json(&self.client, &request_url, "diffbot").await?;
        Ok(clean_entity(&data["data"][0]))
    }
}

/// Reduces a raw organization entity to the firmographic fields the report
/// carries. Returns `None` when the provider matched nothing.
fn clean_entity(entity: &Value) -> Option<Firmographics> {
    if entity.is_null() {
        return None;
    }
    // Some deployments nest the entity under an `entity` key.
    let entity = entity.get("entity").unwrap_or(entity);

    Some(Firmographics {
        name: string_like(&entity["name"]),
        description: string_like(&entity["description"]),
        employee_count: numeric_like(&entity["nbEmployees"]).map(|n| n.max(0.0) as u64),
        revenue: money_like(&entity["revenue"]),
        industry: string_like(&entity["industries"][0]),
        location: clean_location(&entity["locations"][0]),
        founded_year: date_like(&entity["foundedDate"]),
        social_profiles: SocialProfiles {
            linkedin: string_like(&entity["linkedInProfile"]),
            twitter: string_like(&entity["twitterProfile"]),
        },
    })
}

fn clean_location(location: &Value) -> Option<Location> {
    if location.is_null() {
        return None;
    }
    Some(Location {
        city: string_like(&location["city"]),
        country: string_like(&location["country"]),
        latitude: numeric_like(&location["latitude"]),
        longitude: numeric_like(&location["longitude"]),
    })
}
