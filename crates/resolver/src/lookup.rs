use crate::cache::LookupKey;
use crate::classifier::IdentifierKind;
use crate::config::ResolverConfig;
use crate::error::{LookupError, ResolverError};
use crate::label::format_flight_date;
use async_trait::async_trait;
use crumbtrail_protocol::{FlightRecord, PayloadRecord};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;

/// Remote collaborator that turns identifiers into entity records.
#[async_trait]
pub trait EntityLookup: Send + Sync {
    async fn payload(&self, id: &str) -> Result<PayloadRecord, LookupError>;

    async fn flight(&self, id: &str) -> Result<FlightRecord, LookupError>;
}

/// Fetches the entity behind `key` and derives its display label.
pub async fn fetch_label(
    lookup: &dyn EntityLookup,
    key: &LookupKey,
) -> Result<String, LookupError> {
    match key.kind {
        IdentifierKind::Payload => Ok(lookup.payload(&key.id).await?.name),
        IdentifierKind::Flight => {
            let flight = lookup.flight(&key.id).await?;
            format_flight_date(&flight.flight_date)
        }
    }
}

/// `EntityLookup` over the flights REST API.
#[derive(Clone, Debug)]
pub struct HttpLookup {
    client: Client,
    base: Url,
}

impl HttpLookup {
    pub fn new(cfg: &ResolverConfig) -> Result<Self, ResolverError> {
        let base = Url::parse(&cfg.api_base_url).map_err(|err| {
            ResolverError::Config(format!("Invalid API URL {:?}: {err}", cfg.api_base_url))
        })?;
        if base.cannot_be_a_base() {
            return Err(ResolverError::Config(format!(
                "API URL {:?} cannot carry a path",
                cfg.api_base_url
            )));
        }
        let client = Client::builder()
            .timeout(cfg.request_timeout)
            .build()
            .map_err(|err| ResolverError::Config(format!("Failed to build HTTP client: {err}")))?;
        Ok(Self { client, base })
    }

    /// `{base}/api/{collection}/{id}` with `id` encoded as one path segment.
    pub fn entity_url(&self, collection: &str, id: &str) -> Result<Url, LookupError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| LookupError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(["api", collection, id]);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<T, LookupError> {
        let url = self.entity_url(collection, id)?;
        let shown = url.to_string();
        log::debug!("GET {shown}");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| LookupError::Transport {
                url: shown.clone(),
                source,
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(LookupError::NotFound(format!("{collection}/{id}")));
        }
        if !status.is_success() {
            return Err(LookupError::Status {
                url: shown,
                status: status.as_u16(),
            });
        }

        response.json::<T>().await.map_err(|err| LookupError::Decode {
            url: shown,
            message: err.to_string(),
        })
    }
}

#[async_trait]
impl EntityLookup for HttpLookup {
    async fn payload(&self, id: &str) -> Result<PayloadRecord, LookupError> {
        self.get_json("payloads", id).await
    }

    async fn flight(&self, id: &str) -> Result<FlightRecord, LookupError> {
        self.get_json("flights", id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(base: &str) -> HttpLookup {
        HttpLookup::new(&ResolverConfig::default().with_api_base_url(base)).expect("lookup")
    }

    #[test]
    fn builds_entity_urls() {
        let http = lookup("http://localhost:8000");
        assert_eq!(
            http.entity_url("payloads", "p1").expect("url").as_str(),
            "http://localhost:8000/api/payloads/p1"
        );
    }

    #[test]
    fn keeps_base_path_prefix() {
        let http = lookup("https://example.org/flight-manager/");
        assert_eq!(
            http.entity_url("flights", "f1").expect("url").as_str(),
            "https://example.org/flight-manager/api/flights/f1"
        );
    }

    #[test]
    fn encodes_identifier_as_single_segment() {
        let http = lookup("http://localhost:8000");
        assert_eq!(
            http.entity_url("payloads", "a/b c").expect("url").as_str(),
            "http://localhost:8000/api/payloads/a%2Fb%20c"
        );
    }

    #[test]
    fn rejects_unusable_base_url() {
        let cfg = ResolverConfig::default().with_api_base_url("mailto:ops@example.org");
        assert!(matches!(HttpLookup::new(&cfg), Err(ResolverError::Config(_))));
        let cfg = ResolverConfig::default().with_api_base_url("not a url");
        assert!(matches!(HttpLookup::new(&cfg), Err(ResolverError::Config(_))));
    }
}
