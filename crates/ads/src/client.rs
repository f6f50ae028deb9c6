//! Graph API HTTP client.
//!
//! One [`AdsClient`] is shared across the whole process; the underlying
//! [`reqwest::Client`] pools connections. Every method takes the
//! tenant's access token so the client itself stays credential-free.

use chrono::NaiveDate;
use serde_json::Value;

use crate::error::AdsApiError;
use crate::types::{AdSetRow, CampaignDetails, InsightsRow};

const GRAPH_API_BASE: &str = "https://graph.facebook.com";
const GRAPH_API_VERSION: &str = "v19.0";

/// Fields requested for campaign detail lookups.
const CAMPAIGN_DETAIL_FIELDS: &str = "status,effective_status,issues_info";

/// Fields requested for insights rows.
const INSIGHTS_FIELDS: &str = "date_start,spend,impressions,clicks,actions";

/// Fields requested for ad set budget lookups.
const AD_SET_FIELDS: &str = "status,daily_budget,lifetime_budget,budget_remaining";

/// Safety cap on pagination depth when draining insights pages.
const MAX_INSIGHTS_PAGES: usize = 50;

/// HTTP client for the Meta Marketing API.
pub struct AdsClient {
    http: reqwest::Client,
    base_url: String,
}

impl Default for AdsClient {
    fn default() -> Self {
        Self::new()
    }
}

impl AdsClient {
    /// Create a client against the production Graph API.
    pub fn new() -> Self {
        Self::with_base_url(format!("{GRAPH_API_BASE}/{GRAPH_API_VERSION}"))
    }

    /// Create a client against an alternate base URL (test servers).
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// `GET /{campaign_id}` -- live status, effective status, and issue
    /// info for one campaign.
    pub async fn fetch_campaign_details(
        &self,
        token: &str,
        campaign_id: &str,
    ) -> Result<CampaignDetails, AdsApiError> {
        let url = format!("{}/{campaign_id}", self.base_url);
        let payload = self
            .get_json(&url, &[("fields", CAMPAIGN_DETAIL_FIELDS)], token)
            .await?;

        serde_json::from_value(payload).map_err(|e| AdsApiError::InvalidResponse(e.to_string()))
    }

    /// `GET /{campaign_id}/insights` -- daily rows over a date window.
    pub async fn fetch_campaign_insights(
        &self,
        token: &str,
        campaign_id: &str,
        since: NaiveDate,
        until: NaiveDate,
    ) -> Result<Vec<InsightsRow>, AdsApiError> {
        let url = format!("{}/{campaign_id}/insights", self.base_url);
        let time_range = time_range_param(since, until);
        let payload = self
            .get_json(
                &url,
                &[
                    ("fields", INSIGHTS_FIELDS),
                    ("time_range", &time_range),
                    ("time_increment", "1"),
                ],
                token,
            )
            .await?;

        parse_data_rows(payload)
    }

    /// `GET /{campaign_id}/adsets` -- budget rows for a campaign's ad
    /// sets.
    pub async fn fetch_campaign_ad_sets(
        &self,
        token: &str,
        campaign_id: &str,
    ) -> Result<Vec<AdSetRow>, AdsApiError> {
        let url = format!("{}/{campaign_id}/adsets", self.base_url);
        let payload = self
            .get_json(&url, &[("fields", AD_SET_FIELDS)], token)
            .await?;

        parse_data_rows(payload)
    }

    /// `GET /act_{account_id}/insights` -- daily rows for a whole ad
    /// account, draining every page.
    pub async fn fetch_account_insights(
        &self,
        token: &str,
        account_external_id: &str,
        since: NaiveDate,
        until: NaiveDate,
    ) -> Result<Vec<InsightsRow>, AdsApiError> {
        let url = format!("{}/act_{account_external_id}/insights", self.base_url);
        let time_range = time_range_param(since, until);
        let mut payload = self
            .get_json(
                &url,
                &[
                    ("fields", INSIGHTS_FIELDS),
                    ("time_range", &time_range),
                    ("time_increment", "1"),
                    ("level", "account"),
                ],
                token,
            )
            .await?;

        // Drain paging.next until exhausted. The next URL already
        // carries the access token and all query parameters.
        let mut rows: Vec<InsightsRow> = Vec::new();
        let mut pages = 0;
        loop {
            let next = next_page_url(&payload);
            rows.extend(parse_data_rows::<InsightsRow>(payload)?);
            pages += 1;

            match next {
                None => break,
                Some(_) if pages >= MAX_INSIGHTS_PAGES => {
                    tracing::warn!(
                        account = account_external_id,
                        pages,
                        "Insights pagination cap reached, truncating"
                    );
                    break;
                }
                Some(url) => {
                    let response = self.http.get(&url).send().await?;
                    payload = Self::parse_response(response).await?;
                }
            }
        }

        Ok(rows)
    }

    async fn get_json(
        &self,
        url: &str,
        params: &[(&str, &str)],
        token: &str,
    ) -> Result<Value, AdsApiError> {
        let response = self
            .http
            .get(url)
            .query(params)
            .query(&[("access_token", token)])
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Turn a Graph API response into JSON, mapping non-2xx statuses to
    /// [`AdsApiError::Api`] with the provider's code and message.
    async fn parse_response(response: reqwest::Response) -> Result<Value, AdsApiError> {
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            return serde_json::from_str(&body)
                .map_err(|e| AdsApiError::InvalidResponse(e.to_string()));
        }

        // Error envelope: { "error": { "message": ..., "code": ... } }.
        let parsed: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
        let code = parsed["error"]["code"].as_i64();
        let message = parsed["error"]["message"]
            .as_str()
            .map(str::to_string)
            .unwrap_or(body);

        Err(AdsApiError::Api {
            status: status.as_u16(),
            code,
            message,
        })
    }
}

fn time_range_param(since: NaiveDate, until: NaiveDate) -> String {
    format!("{{\"since\":\"{since}\",\"until\":\"{until}\"}}")
}

fn next_page_url(payload: &Value) -> Option<String> {
    payload["paging"]["next"].as_str().map(str::to_string)
}

fn parse_data_rows<T: serde::de::DeserializeOwned>(mut payload: Value) -> Result<Vec<T>, AdsApiError> {
    let data = payload["data"].take();
    if data.is_null() {
        return Ok(Vec::new());
    }
    serde_json::from_value(data).map_err(|e| AdsApiError::InvalidResponse(e.to_string()))
}
