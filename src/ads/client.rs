use std::fmt;

use reqwest::{
    Client, RequestBuilder,
    header::{AUTHORIZATION, CONTENT_TYPE},
};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::{
    ads::token::TokenSupplier,
    error::{Error, Result},
    types::{
        AccessibleCustomersResponse, ErrorEnvelope, MutateResponse, SearchRequest, SearchResponse,
    },
    utils,
};

pub const DEFAULT_API_BASE_URL: &str = "https://googleads.googleapis.com";
pub const DEFAULT_API_VERSION: &str = "v19";

const DEVELOPER_TOKEN_HEADER: &str = "developer-token";
const LOGIN_CUSTOMER_ID_HEADER: &str = "login-customer-id";

/// Resource kinds that accept mutation batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Campaign,
    CampaignBudget,
    AdGroup,
    AdGroupCriterion,
    AdGroupAd,
}

impl ResourceKind {
    /// Collection segment used in resource names and mutate endpoints.
    pub fn collection(&self) -> &'static str {
        match self {
            ResourceKind::Campaign => "campaigns",
            ResourceKind::CampaignBudget => "campaignBudgets",
            ResourceKind::AdGroup => "adGroups",
            ResourceKind::AdGroupCriterion => "adGroupCriteria",
            ResourceKind::AdGroupAd => "adGroupAds",
        }
    }

    /// `customers/<customer>/<collection>/<id>`
    pub fn resource_name(&self, customer_id: &str, id: &str) -> String {
        format!(
            "customers/{}/{}/{}",
            utils::clean_customer_id(customer_id),
            self.collection(),
            id
        )
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection())
    }
}

/// One entry of a mutation batch.
#[derive(Debug, Clone, PartialEq)]
pub enum MutateOperation {
    Create(Value),
    Update { resource: Value, update_mask: String },
    Remove(String),
}

impl MutateOperation {
    pub fn create(resource: Value) -> Self {
        MutateOperation::Create(resource)
    }

    /// `resource` must carry its `resourceName`; `fields` become the update mask.
    pub fn update(resource: Value, fields: &[&str]) -> Self {
        MutateOperation::Update {
            resource,
            update_mask: fields.join(","),
        }
    }

    pub fn remove(resource_name: impl Into<String>) -> Self {
        MutateOperation::Remove(resource_name.into())
    }

    pub fn to_json(&self) -> Value {
        match self {
            MutateOperation::Create(resource) => json!({ "create": resource }),
            MutateOperation::Update {
                resource,
                update_mask,
            } => json!({ "update": resource, "updateMask": update_mask }),
            MutateOperation::Remove(name) => json!({ "remove": name }),
        }
    }
}

/// Authenticated client for the Google Ads REST API.
///
/// Holds no per-call state. Every request carries a bearer token from the
/// supplier, the developer token and, when configured, the manager account as
/// `login-customer-id`. Failures are reported once, without retries.
pub struct AdsClient<S> {
    http: Client,
    base_url: String,
    developer_token: String,
    login_customer_id: Option<String>,
    tokens: S,
}

impl<S: TokenSupplier> AdsClient<S> {
    pub fn new(
        http: Client,
        tokens: S,
        developer_token: impl Into<String>,
        login_customer_id: Option<&str>,
    ) -> Self {
        Self {
            http,
            base_url: format!("{}/{}", DEFAULT_API_BASE_URL, DEFAULT_API_VERSION),
            developer_token: developer_token.into(),
            login_customer_id: login_customer_id
                .map(utils::clean_customer_id)
                .filter(|id| !id.is_empty()),
            tokens,
        }
    }

    /// Points the client at another host and API version.
    pub fn with_endpoint(mut self, base_url: &str, version: &str) -> Self {
        self.base_url = format!("{}/{}", base_url.trim_end_matches('/'), version);
        self
    }

    /// Resource names (`customers/<id>`) directly accessible to the caller.
    pub async fn list_accessible_customers(&self) -> Result<Vec<String>> {
        let url = format!("{}/customers:listAccessibleCustomers", self.base_url);
        let body = self.execute(self.http.get(&url)).await?;
        let resp: AccessibleCustomersResponse = decode(&body, "list accessible customers")?;
        Ok(resp.resource_names)
    }

    /// Runs a GAQL query and returns every row across all pages.
    ///
    /// Rows keep server order. Any failing page fails the whole call.
    pub async fn search(&self, customer_id: &str, query: &str) -> Result<Vec<Value>> {
        let url = format!(
            "{}/customers/{}/googleAds:search",
            self.base_url,
            utils::clean_customer_id(customer_id)
        );

        let mut rows = Vec::new();
        let mut page_token: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let request = SearchRequest {
                query,
                page_token: page_token.as_deref(),
            };
            let body = self.execute(self.http.post(&url).json(&request)).await?;
            let page: SearchResponse = decode(&body, "search")?;
            pages += 1;
            tracing::debug!(page = pages, rows = page.results.len(), "search page");

            rows.extend(page.results);
            match page.next_page_token {
                Some(next) if !next.is_empty() => page_token = Some(next),
                _ => break,
            }
        }

        Ok(rows)
    }

    /// Sends one mutation batch and returns the resulting resource names in
    /// request order.
    pub async fn mutate(
        &self,
        kind: ResourceKind,
        customer_id: &str,
        operations: &[MutateOperation],
    ) -> Result<Vec<String>> {
        let url = format!(
            "{}/customers/{}/{}:mutate",
            self.base_url,
            utils::clean_customer_id(customer_id),
            kind.collection()
        );
        let payload = json!({
            "operations": operations.iter().map(MutateOperation::to_json).collect::<Vec<_>>(),
        });

        tracing::debug!(%kind, operations = operations.len(), "mutate");
        let body = self.execute(self.http.post(&url).json(&payload)).await?;
        let resp: MutateResponse = decode(&body, "mutate")?;
        Ok(resp
            .results
            .into_iter()
            .map(|r| r.resource_name)
            .collect())
    }

    pub async fn mutate_campaigns(
        &self,
        customer_id: &str,
        operations: &[MutateOperation],
    ) -> Result<Vec<String>> {
        self.mutate(ResourceKind::Campaign, customer_id, operations)
            .await
    }

    pub async fn mutate_campaign_budgets(
        &self,
        customer_id: &str,
        operations: &[MutateOperation],
    ) -> Result<Vec<String>> {
        self.mutate(ResourceKind::CampaignBudget, customer_id, operations)
            .await
    }

    pub async fn mutate_ad_groups(
        &self,
        customer_id: &str,
        operations: &[MutateOperation],
    ) -> Result<Vec<String>> {
        self.mutate(ResourceKind::AdGroup, customer_id, operations)
            .await
    }

    pub async fn mutate_ad_group_criteria(
        &self,
        customer_id: &str,
        operations: &[MutateOperation],
    ) -> Result<Vec<String>> {
        self.mutate(ResourceKind::AdGroupCriterion, customer_id, operations)
            .await
    }

    pub async fn mutate_ad_group_ads(
        &self,
        customer_id: &str,
        operations: &[MutateOperation],
    ) -> Result<Vec<String>> {
        self.mutate(ResourceKind::AdGroupAd, customer_id, operations)
            .await
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Vec<u8>> {
        let token = self.tokens.current_token().await?;

        let mut request = request
            .header(AUTHORIZATION, token.authorization_value())
            .header(DEVELOPER_TOKEN_HEADER, &self.developer_token)
            .header(CONTENT_TYPE, "application/json");
        if let Some(id) = &self.login_customer_id {
            request = request.header(LOGIN_CUSTOMER_ID_HEADER, id);
        }

        let response = request.send().await.map_err(Error::Transport)?;
        let status = response.status();
        let body = response.bytes().await.map_err(Error::Transport)?;

        if !status.is_success() {
            let mut message = extract_error_message(&String::from_utf8_lossy(&body));
            if message.is_empty() {
                message = format!("HTTP {}", status.as_u16());
            }
            tracing::debug!(status = status.as_u16(), "request rejected");
            return Err(Error::Remote {
                status: status.as_u16(),
                message,
            });
        }

        Ok(body.to_vec())
    }
}

fn decode<T: DeserializeOwned>(body: &[u8], what: &str) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| Error::Parse(format!("{} response: {}", what, e)))
}

/// Best human-readable message from a Google Ads error body.
///
/// The first non-empty per-operation message inside `error.details[].errors[]`
/// wins, then `error.message`, then the raw body.
pub fn extract_error_message(body: &str) -> String {
    let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) else {
        return body.to_string();
    };

    envelope
        .error
        .details
        .iter()
        .flat_map(|detail| detail.errors.iter())
        .map(|e| e.message.as_str())
        .find(|m| !m.is_empty())
        .or_else(|| Some(envelope.error.message.as_str()).filter(|m| !m.is_empty()))
        .map(str::to_string)
        .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_prefers_inner_message() {
        let body = r#"{"error":{"message":"outer","details":[{"errors":[{"message":"inner"}]}]}}"#;
        assert_eq!(extract_error_message(body), "inner");
    }

    #[test]
    fn test_extract_skips_empty_inner_messages() {
        let body = r#"{"error":{"message":"outer","details":[{"errors":[{"message":""}]},{"errors":[{"message":"second"}]}]}}"#;
        assert_eq!(extract_error_message(body), "second");
    }

    #[test]
    fn test_extract_falls_back_to_outer() {
        assert_eq!(
            extract_error_message(r#"{"error":{"message":"outer"}}"#),
            "outer"
        );
    }

    #[test]
    fn test_extract_non_json_is_raw() {
        assert_eq!(extract_error_message("Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn test_extract_envelope_without_messages_is_raw() {
        let body = r#"{"error":{"code":500}}"#;
        assert_eq!(extract_error_message(body), body);
    }

    #[test]
    fn test_operation_shapes() {
        let update = MutateOperation::update(
            json!({"resourceName": "customers/1/campaigns/2", "status": "PAUSED"}),
            &["status"],
        );
        assert_eq!(
            update.to_json(),
            json!({"update": {"resourceName": "customers/1/campaigns/2", "status": "PAUSED"}, "updateMask": "status"})
        );
        assert_eq!(
            MutateOperation::remove("customers/1/adGroupCriteria/3~4").to_json(),
            json!({"remove": "customers/1/adGroupCriteria/3~4"})
        );
        assert_eq!(
            MutateOperation::create(json!({"name": "x"})).to_json(),
            json!({"create": {"name": "x"}})
        );
    }

    #[test]
    fn test_resource_name_normalizes_customer() {
        assert_eq!(
            ResourceKind::AdGroup.resource_name("123-456-7890", "55"),
            "customers/1234567890/adGroups/55"
        );
    }
}
