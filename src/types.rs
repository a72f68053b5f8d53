use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tabled::Tabled;

/// Persisted authentication record for one installation.
///
/// An empty `refresh_token` means "not authenticated". The access token
/// fields are short-lived and regenerated on demand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub developer_token: String,
    pub manager_customer_id: String,
    pub refresh_token: String,
    pub access_token: String,
    pub token_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_expiry: Option<DateTime<Utc>>,
}

impl Credentials {
    pub fn is_authenticated(&self) -> bool {
        !self.refresh_token.is_empty()
    }

    /// Access token currently on record.
    pub fn token(&self) -> Token {
        Token {
            access_token: self.access_token.clone(),
            token_type: self.token_type.clone(),
            expiry: self.token_expiry,
        }
    }

    /// Records a freshly issued access token.
    pub fn apply_token(&mut self, token: &Token) {
        self.access_token = token.access_token.clone();
        self.token_expiry = token.expiry;
        if !token.token_type.is_empty() {
            self.token_type = token.token_type.clone();
        }
    }
}

/// Short-lived bearer credential.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
    pub expiry: Option<DateTime<Utc>>,
}

impl Token {
    /// Seconds before the recorded expiry at which a token counts as stale.
    pub const EXPIRY_LEEWAY_SECS: i64 = 60;

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        if self.access_token.is_empty() {
            return false;
        }
        match self.expiry {
            Some(expiry) => now + Duration::seconds(Self::EXPIRY_LEEWAY_SECS) < expiry,
            None => true,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    pub fn authorization_value(&self) -> String {
        let kind = if self.token_type.is_empty() || self.token_type.eq_ignore_ascii_case("bearer")
        {
            "Bearer"
        } else {
            self.token_type.as_str()
        };
        format!("{} {}", kind, self.access_token)
    }
}

/// Body of a token endpoint answer (code exchange and refresh).
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl TokenResponse {
    pub fn into_token(self, issued_at: DateTime<Utc>) -> Token {
        Token {
            access_token: self.access_token,
            token_type: self.token_type,
            expiry: self
                .expires_in
                .map(|secs| issued_at + Duration::seconds(secs)),
        }
    }
}

/// Client JSON downloaded from the Google Cloud Console.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleCredentialsFile {
    pub installed: Option<ClientSecretEntry>,
    pub web: Option<ClientSecretEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientSecretEntry {
    pub client_id: String,
    pub client_secret: String,
}

/// Outcome carried from the callback handler to the waiting login flow.
#[derive(Debug, Clone, PartialEq)]
pub enum CallbackOutcome {
    Code(String),
    Denied(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessibleCustomersResponse {
    #[serde(default)]
    pub resource_names: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest<'a> {
    pub query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<&'a str>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<Value>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutateResponse {
    #[serde(default)]
    pub results: Vec<MutateResult>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutateResult {
    #[serde(default)]
    pub resource_name: String,
}

/// `{"error": {"message": .., "details": [{"errors": [{"message": ..}]}]}}`
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ErrorBody {
    pub message: String,
    pub details: Vec<ErrorDetail>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ErrorDetail {
    pub errors: Vec<ErrorEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ErrorEntry {
    pub message: String,
}

// Typed row shapes used by the resource commands. Integer metrics come back
// from the API as strings.

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CustomerClientRow {
    pub customer_client: CustomerClient,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CustomerClient {
    pub id: String,
    pub descriptive_name: String,
    pub currency_code: String,
    pub time_zone: String,
    pub manager: bool,
    pub level: String,
    pub hidden: bool,
    pub test_account: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CampaignRow {
    pub campaign: Campaign,
    pub campaign_budget: CampaignBudget,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Campaign {
    pub resource_name: String,
    pub id: String,
    pub name: String,
    pub status: String,
    pub advertising_channel_type: String,
    pub bidding_strategy_type: String,
    pub start_date: String,
    pub end_date: String,
    pub campaign_budget: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CampaignBudget {
    pub resource_name: String,
    pub id: String,
    pub amount_micros: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdGroupRow {
    pub ad_group: AdGroup,
    pub campaign: Campaign,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdGroup {
    pub resource_name: String,
    pub id: String,
    pub name: String,
    pub status: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub cpc_bid_micros: String,
    pub campaign: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KeywordRow {
    pub ad_group_criterion: AdGroupCriterion,
    pub ad_group: AdGroup,
    pub campaign: Campaign,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdGroupCriterion {
    pub resource_name: String,
    pub criterion_id: String,
    pub status: String,
    pub negative: bool,
    pub keyword: KeywordInfo,
    pub quality_info: QualityInfo,
    pub cpc_bid_micros: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KeywordInfo {
    pub text: String,
    pub match_type: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QualityInfo {
    pub quality_score: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdRow {
    pub ad_group_ad: AdGroupAd,
    pub ad_group: AdGroup,
    pub campaign: Campaign,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdGroupAd {
    pub resource_name: String,
    pub status: String,
    pub ad: Ad,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Ad {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub final_urls: Vec<String>,
    pub responsive_search_ad: ResponsiveSearchAd,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResponsiveSearchAd {
    pub headlines: Vec<AdTextAsset>,
    pub descriptions: Vec<AdTextAsset>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdTextAsset {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pinned_field: Option<String>,
}

/// Performance metrics of a report row. Int64 values arrive as strings,
/// doubles as numbers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Metrics {
    pub impressions: String,
    pub clicks: String,
    pub cost_micros: String,
    pub ctr: f64,
    pub average_cpc: f64,
    pub conversions: f64,
    pub conversions_value: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CampaignInsightRow {
    pub campaign: Campaign,
    pub metrics: Metrics,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdGroupInsightRow {
    pub ad_group: AdGroup,
    pub campaign: Campaign,
    pub metrics: Metrics,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KeywordInsightRow {
    pub ad_group_criterion: AdGroupCriterion,
    pub ad_group: AdGroup,
    pub campaign: Campaign,
    pub metrics: Metrics,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchTermRow {
    pub search_term_view: SearchTermView,
    pub ad_group: AdGroup,
    pub campaign: Campaign,
    pub metrics: Metrics,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchTermView {
    pub resource_name: String,
    pub search_term: String,
    pub status: String,
}

#[derive(Tabled)]
pub struct AccountTableRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "NAME")]
    pub name: String,
    #[tabled(rename = "CURRENCY")]
    pub currency: String,
    #[tabled(rename = "TIMEZONE")]
    pub time_zone: String,
    #[tabled(rename = "MANAGER")]
    pub manager: String,
    #[tabled(rename = "TEST")]
    pub test: String,
}

#[derive(Tabled)]
pub struct CampaignTableRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "NAME")]
    pub name: String,
    #[tabled(rename = "STATUS")]
    pub status: String,
    #[tabled(rename = "TYPE")]
    pub channel: String,
    #[tabled(rename = "DAILY BUDGET")]
    pub budget: String,
    #[tabled(rename = "START")]
    pub start: String,
    #[tabled(rename = "END")]
    pub end: String,
}

#[derive(Tabled)]
pub struct AdGroupTableRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "NAME")]
    pub name: String,
    #[tabled(rename = "STATUS")]
    pub status: String,
    #[tabled(rename = "TYPE")]
    pub kind: String,
    #[tabled(rename = "DEFAULT BID")]
    pub bid: String,
}

#[derive(Tabled)]
pub struct KeywordTableRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "KEYWORD")]
    pub keyword: String,
    #[tabled(rename = "MATCH")]
    pub match_type: String,
    #[tabled(rename = "STATUS")]
    pub status: String,
    #[tabled(rename = "QS")]
    pub quality_score: String,
    #[tabled(rename = "BID")]
    pub bid: String,
    #[tabled(rename = "AD GROUP")]
    pub ad_group: String,
}

#[derive(Tabled)]
pub struct AdTableRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "STATUS")]
    pub status: String,
    #[tabled(rename = "HEADLINES")]
    pub headlines: String,
    #[tabled(rename = "FINAL URL")]
    pub final_url: String,
}

#[derive(Tabled)]
pub struct CampaignInsightTableRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "NAME")]
    pub name: String,
    #[tabled(rename = "IMPRESSIONS")]
    pub impressions: String,
    #[tabled(rename = "CLICKS")]
    pub clicks: String,
    #[tabled(rename = "COST")]
    pub cost: String,
    #[tabled(rename = "CTR")]
    pub ctr: String,
    #[tabled(rename = "CPC")]
    pub cpc: String,
    #[tabled(rename = "CONV")]
    pub conversions: String,
    #[tabled(rename = "ROAS")]
    pub roas: String,
}

#[derive(Tabled)]
pub struct AdGroupInsightTableRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "NAME")]
    pub name: String,
    #[tabled(rename = "IMPRESSIONS")]
    pub impressions: String,
    #[tabled(rename = "CLICKS")]
    pub clicks: String,
    #[tabled(rename = "COST")]
    pub cost: String,
    #[tabled(rename = "CTR")]
    pub ctr: String,
    #[tabled(rename = "CPC")]
    pub cpc: String,
    #[tabled(rename = "CONV")]
    pub conversions: String,
}

#[derive(Tabled)]
pub struct KeywordInsightTableRow {
    #[tabled(rename = "KEYWORD")]
    pub keyword: String,
    #[tabled(rename = "MATCH")]
    pub match_type: String,
    #[tabled(rename = "IMPRESSIONS")]
    pub impressions: String,
    #[tabled(rename = "CLICKS")]
    pub clicks: String,
    #[tabled(rename = "COST")]
    pub cost: String,
    #[tabled(rename = "CTR")]
    pub ctr: String,
    #[tabled(rename = "CPC")]
    pub cpc: String,
    #[tabled(rename = "CONV")]
    pub conversions: String,
}

#[derive(Tabled)]
pub struct SearchTermTableRow {
    #[tabled(rename = "SEARCH TERM")]
    pub search_term: String,
    #[tabled(rename = "STATUS")]
    pub status: String,
    #[tabled(rename = "IMPRESSIONS")]
    pub impressions: String,
    #[tabled(rename = "CLICKS")]
    pub clicks: String,
    #[tabled(rename = "COST")]
    pub cost: String,
    #[tabled(rename = "CTR")]
    pub ctr: String,
    #[tabled(rename = "AD GROUP")]
    pub ad_group: String,
}
