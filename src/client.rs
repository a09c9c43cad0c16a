use crate::credentials::CredentialProvider;
use crate::error::FetchError;
use crate::request::SearchRequest;
use reqwest::Client;
use reqwest::header::HeaderMap;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

pub const SEARCH_ENDPOINT: &str = "https://meta-ad-library.p.rapidapi.com/search/ads";
pub const API_HOST: &str = "meta-ad-library.p.rapidapi.com";

/// One page of search results as returned by the API.
#[derive(Debug, Deserialize, Default)]
pub struct RawAdPage {
    #[serde(default)]
    pub results: Option<Vec<Vec<Value>>>,
    #[serde(default)]
    pub continuation_token: Option<String>,
}

impl RawAdPage {
    /// Token for the following page. An empty token counts as absent.
    pub fn next_token(&self) -> Option<&str> {
        self.continuation_token.as_deref().filter(|t| !t.is_empty())
    }

    /// Unpack the ad-set groups into individual ads in encounter order,
    /// each tagged with this page's continuation token.
    pub fn into_ads(self) -> Vec<RawAd> {
        let token = self.next_token().map(str::to_string);
        self.results
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .map(|ad| RawAd {
                ad,
                continuation_token: token.clone(),
            })
            .collect()
    }
}

/// An ad object exactly as received, tagged with the continuation token of
/// the page it arrived on.
#[derive(Debug, Clone, PartialEq)]
pub struct RawAd {
    pub ad: Value,
    pub continuation_token: Option<String>,
}

#[derive(Debug)]
pub enum StopReason {
    /// The last page carried no continuation token.
    Exhausted,
    /// The page limit was reached with more pages available.
    PageLimit,
    /// A page request failed; earlier pages are kept.
    Failed(FetchError),
}

#[derive(Debug)]
pub struct FetchOutcome {
    pub ads: Vec<RawAd>,
    pub pages_fetched: u32,
    pub stop: StopReason,
}

impl FetchOutcome {
    pub fn error(&self) -> Option<&FetchError> {
        match &self.stop {
            StopReason::Failed(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PageProgress {
    pub page: u32,
    pub ads_on_page: usize,
    pub total_ads: usize,
}

/// Client for the ad library search endpoint.
#[derive(Clone)]
pub struct AdLibraryClient {
    client: Client,
    endpoint: String,
    host: String,
    credentials: Arc<dyn CredentialProvider>,
}

impl AdLibraryClient {
    pub fn new(credentials: impl CredentialProvider + 'static) -> Self {
        Self::with_client(Client::new(), Arc::new(credentials))
    }

    pub fn with_client(client: Client, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            client,
            endpoint: SEARCH_ENDPOINT.to_string(),
            host: API_HOST.to_string(),
            credentials,
        }
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Fetch pages until the results run out or `request.page_limit` pages
    /// have been read. A failed page ends the loop but keeps what was
    /// already collected.
    pub async fn fetch_ads(&self, request: &SearchRequest) -> FetchOutcome {
        self.fetch_ads_with_progress(request, |_| {}).await
    }

    pub async fn fetch_ads_with_progress<F>(&self, request: &SearchRequest, mut on_page: F) -> FetchOutcome
    where
        F: FnMut(&PageProgress),
    {
        let mut ads = Vec::new();
        let mut token: Option<String> = None;
        let mut pages_fetched = 0;

        loop {
            let page = match self.fetch_page(request, token.as_deref()).await {
                Ok(page) => page,
                Err(err) => {
                    tracing::debug!(error = %err, pages_fetched, "Page request failed, stopping pagination");
                    return FetchOutcome {
                        ads,
                        pages_fetched,
                        stop: StopReason::Failed(err),
                    };
                }
            };
            pages_fetched += 1;

            let next = page.next_token().map(str::to_string);
            let before = ads.len();
            ads.extend(page.into_ads());

            let progress = PageProgress {
                page: pages_fetched,
                ads_on_page: ads.len() - before,
                total_ads: ads.len(),
            };
            tracing::info!(page = progress.page, ads = progress.ads_on_page, total = progress.total_ads, "Fetched page");
            on_page(&progress);

            match next {
                None => {
                    return FetchOutcome {
                        ads,
                        pages_fetched,
                        stop: StopReason::Exhausted,
                    };
                }
                Some(_) if pages_fetched >= request.page_limit => {
                    tracing::debug!(page_limit = request.page_limit, "Page limit reached");
                    return FetchOutcome {
                        ads,
                        pages_fetched,
                        stop: StopReason::PageLimit,
                    };
                }
                Some(next) => token = Some(next),
            }
        }
    }

    /// Issue one GET for a single page.
    pub async fn fetch_page(
        &self,
        request: &SearchRequest,
        continuation_token: Option<&str>,
    ) -> Result<RawAdPage, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert("x-rapidapi-key", self.credentials.api_key()?.parse()?);
        headers.insert("x-rapidapi-host", self.host.parse()?);

        let params = request.query_params(continuation_token);
        tracing::debug!(endpoint = %self.endpoint, query = %request.query, continuation_token, "Requesting page");

        let response = self
            .client
            .get(&self.endpoint)
            .headers(headers)
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Upstream {
                status: status.as_u16(),
            });
        }

        let text = response.text().await?;
        parse_ads_page(&text)
    }
}

pub fn parse_ads_page(text: &str) -> Result<RawAdPage, FetchError> {
    Ok(serde_json::from_str(text)?)
}
