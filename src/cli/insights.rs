use chrono::{Days, Local, NaiveDate};

use crate::{
    Res,
    ads::decode_rows,
    cli::{Output, report_decode_failures, require_id, search, session},
    types::{
        AdGroupInsightRow, AdGroupInsightTableRow, CampaignInsightRow, CampaignInsightTableRow,
        KeywordInsightRow, KeywordInsightTableRow, SearchTermRow, SearchTermTableRow,
    },
    utils::{format_ctr, format_metric_int, format_micros, format_roas, micros_to_currency, truncate},
};

pub const DEFAULT_DAYS: u32 = 30;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive reporting window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Explicit `start`/`end` win over `days`. Otherwise the window is the
    /// `days` days up to and including yesterday, 0 meaning the default.
    pub fn resolve(
        days: u32,
        start: Option<&str>,
        end: Option<&str>,
        today: NaiveDate,
    ) -> Res<Self> {
        match (start, end) {
            (Some(start), Some(end)) => {
                let start = parse_date("--start", start)?;
                let end = parse_date("--end", end)?;
                if start > end {
                    return Err(format!("--start {} is after --end {}", start, end).into());
                }
                Ok(Self { start, end })
            }
            (Some(_), None) | (None, Some(_)) => {
                Err("--start and --end must be given together".into())
            }
            (None, None) => {
                let days = if days == 0 { DEFAULT_DAYS } else { days };
                let out_of_range = || format!("--days {} reaches outside the calendar", days);
                let end = today
                    .checked_sub_days(Days::new(1))
                    .ok_or_else(out_of_range)?;
                let start = today
                    .checked_sub_days(Days::new(u64::from(days)))
                    .ok_or_else(out_of_range)?;
                Ok(Self { start, end })
            }
        }
    }

    /// Window relative to the local calendar day.
    pub fn from_args(days: u32, start: Option<&str>, end: Option<&str>) -> Res<Self> {
        Self::resolve(days, start, end, Local::now().date_naive())
    }

    pub fn to_gaql(&self) -> String {
        format!(
            "segments.date BETWEEN '{}' AND '{}'",
            self.start.format(DATE_FORMAT),
            self.end.format(DATE_FORMAT)
        )
    }
}

fn parse_date(flag: &str, value: &str) -> Res<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| format!("{} must be YYYY-MM-DD, got {:?}", flag, value).into())
}

const METRIC_FIELDS: &str = "metrics.impressions, metrics.clicks, metrics.cost_micros, \
     metrics.ctr, metrics.average_cpc, metrics.conversions, metrics.conversions_value";

fn campaign_query(range: &DateRange) -> String {
    format!(
        "SELECT campaign.id, campaign.name, {} \
         FROM campaign \
         WHERE {} AND campaign.status != 'REMOVED' \
         ORDER BY metrics.cost_micros DESC",
        METRIC_FIELDS,
        range.to_gaql()
    )
}

fn ad_group_query(range: &DateRange, campaign_id: &str) -> String {
    format!(
        "SELECT campaign.id, ad_group.id, ad_group.name, {} \
         FROM ad_group \
         WHERE {} AND campaign.id = '{}' AND ad_group.status != 'REMOVED' \
         ORDER BY metrics.cost_micros DESC",
        METRIC_FIELDS,
        range.to_gaql(),
        campaign_id
    )
}

fn keyword_query(range: &DateRange, campaign_id: &str) -> String {
    format!(
        "SELECT ad_group_criterion.keyword.text, ad_group_criterion.keyword.match_type, \
         ad_group.id, ad_group.name, campaign.id, {} \
         FROM keyword_view \
         WHERE {} AND campaign.id = '{}' AND ad_group_criterion.status != 'REMOVED' \
         ORDER BY metrics.cost_micros DESC",
        METRIC_FIELDS,
        range.to_gaql(),
        campaign_id
    )
}

fn search_term_query(range: &DateRange, campaign_id: &str) -> String {
    format!(
        "SELECT search_term_view.search_term, search_term_view.status, \
         campaign.id, campaign.name, ad_group.id, ad_group.name, \
         metrics.impressions, metrics.clicks, metrics.cost_micros, metrics.ctr \
         FROM search_term_view \
         WHERE {} AND campaign.id = '{}' \
         ORDER BY metrics.impressions DESC",
        range.to_gaql(),
        campaign_id
    )
}

/// Campaign performance over `range`, most expensive first.
pub async fn campaigns(output: Output, account: &str, range: DateRange) -> Res<()> {
    let client = session().await?;
    let decoded =
        decode_rows::<CampaignInsightRow>(search(&client, account, &campaign_query(&range)).await?);
    report_decode_failures(&decoded);

    output.render(
        &decoded.rows,
        "No campaign data found for the specified period.",
        |r| CampaignInsightTableRow {
            id: r.campaign.id.clone(),
            name: truncate(&r.campaign.name, 30),
            impressions: format_metric_int(&r.metrics.impressions),
            clicks: format_metric_int(&r.metrics.clicks),
            cost: micros_to_currency(&r.metrics.cost_micros),
            ctr: format_ctr(r.metrics.ctr),
            cpc: format_micros(r.metrics.average_cpc),
            conversions: format!("{:.1}", r.metrics.conversions),
            roas: format_roas(r.metrics.conversions_value, &r.metrics.cost_micros),
        },
    )
}

pub async fn ad_groups(output: Output, account: &str, campaign_id: &str, range: DateRange) -> Res<()> {
    let campaign_id = require_id("campaign", campaign_id)?;
    let client = session().await?;
    let query = ad_group_query(&range, campaign_id);
    let decoded = decode_rows::<AdGroupInsightRow>(search(&client, account, &query).await?);
    report_decode_failures(&decoded);

    output.render(
        &decoded.rows,
        "No ad group data found for the specified period.",
        |r| AdGroupInsightTableRow {
            id: r.ad_group.id.clone(),
            name: truncate(&r.ad_group.name, 36),
            impressions: format_metric_int(&r.metrics.impressions),
            clicks: format_metric_int(&r.metrics.clicks),
            cost: micros_to_currency(&r.metrics.cost_micros),
            ctr: format_ctr(r.metrics.ctr),
            cpc: format_micros(r.metrics.average_cpc),
            conversions: format!("{:.1}", r.metrics.conversions),
        },
    )
}

pub async fn keywords(output: Output, account: &str, campaign_id: &str, range: DateRange) -> Res<()> {
    let campaign_id = require_id("campaign", campaign_id)?;
    let client = session().await?;
    let query = keyword_query(&range, campaign_id);
    let decoded = decode_rows::<KeywordInsightRow>(search(&client, account, &query).await?);
    report_decode_failures(&decoded);

    output.render(
        &decoded.rows,
        "No keyword data found for the specified period.",
        |r| KeywordInsightTableRow {
            keyword: truncate(&r.ad_group_criterion.keyword.text, 30),
            match_type: r.ad_group_criterion.keyword.match_type.clone(),
            impressions: format_metric_int(&r.metrics.impressions),
            clicks: format_metric_int(&r.metrics.clicks),
            cost: micros_to_currency(&r.metrics.cost_micros),
            ctr: format_ctr(r.metrics.ctr),
            cpc: format_micros(r.metrics.average_cpc),
            conversions: format!("{:.1}", r.metrics.conversions),
        },
    )
}

/// Search terms that triggered ads of a campaign, by impressions.
pub async fn search_terms(
    output: Output,
    account: &str,
    campaign_id: &str,
    range: DateRange,
) -> Res<()> {
    let campaign_id = require_id("campaign", campaign_id)?;
    let client = session().await?;
    let query = search_term_query(&range, campaign_id);
    let decoded = decode_rows::<SearchTermRow>(search(&client, account, &query).await?);
    report_decode_failures(&decoded);

    output.render(
        &decoded.rows,
        "No search term data found for the specified period.",
        |r| SearchTermTableRow {
            search_term: truncate(&r.search_term_view.search_term, 40),
            status: r.search_term_view.status.to_lowercase(),
            impressions: format_metric_int(&r.metrics.impressions),
            clicks: format_metric_int(&r.metrics.clicks),
            cost: micros_to_currency(&r.metrics.cost_micros),
            ctr: format_ctr(r.metrics.ctr),
            ad_group: truncate(&r.ad_group.name, 24),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn test_days_window_ends_yesterday() {
        let range = DateRange::resolve(7, None, None, day("2024-03-10")).unwrap();
        assert_eq!(range.start, day("2024-03-03"));
        assert_eq!(range.end, day("2024-03-09"));
        assert_eq!(
            range.to_gaql(),
            "segments.date BETWEEN '2024-03-03' AND '2024-03-09'"
        );
    }

    #[test]
    fn test_zero_days_uses_default_window() {
        let range = DateRange::resolve(0, None, None, day("2024-03-31")).unwrap();
        assert_eq!(range.start, day("2024-03-01"));
        assert_eq!(range.end, day("2024-03-30"));
    }

    #[test]
    fn test_explicit_dates_override_days() {
        let range =
            DateRange::resolve(7, Some("2024-01-01"), Some("2024-01-31"), day("2024-06-01"))
                .unwrap();
        assert_eq!(range.start, day("2024-01-01"));
        assert_eq!(range.end, day("2024-01-31"));
    }

    #[test]
    fn test_single_date_is_rejected() {
        let today = day("2024-06-01");
        assert!(DateRange::resolve(7, Some("2024-01-01"), None, today).is_err());
        assert!(DateRange::resolve(7, None, Some("2024-01-31"), today).is_err());
    }

    #[test]
    fn test_malformed_or_reversed_dates_are_rejected() {
        let today = day("2024-06-01");
        assert!(DateRange::resolve(7, Some("2024-01-01' OR 1=1"), Some("2024-01-31"), today).is_err());
        assert!(DateRange::resolve(7, Some("01/01/2024"), Some("2024-01-31"), today).is_err());
        assert!(DateRange::resolve(7, Some("2024-02-01"), Some("2024-01-31"), today).is_err());
    }

    #[test]
    fn test_queries_carry_window_and_campaign() {
        let range = DateRange::resolve(7, None, None, day("2024-03-10")).unwrap();
        let query = keyword_query(&range, "111222333");
        assert!(query.contains("FROM keyword_view"));
        assert!(query.contains("segments.date BETWEEN '2024-03-03' AND '2024-03-09'"));
        assert!(query.contains("campaign.id = '111222333'"));

        assert!(campaign_query(&range).contains("metrics.conversions_value"));
        assert!(search_term_query(&range, "1").contains("ORDER BY metrics.impressions DESC"));
        assert!(ad_group_query(&range, "1").contains("FROM ad_group"));
    }

    #[test]
    fn test_campaign_insight_row_decodes_api_shape() {
        let row = json!({
            "campaign": { "resourceName": "customers/1/campaigns/2", "id": "2", "name": "Brand" },
            "metrics": {
                "impressions": "1200",
                "clicks": "60",
                "costMicros": "20000000",
                "ctr": 0.05,
                "averageCpc": 333333.33,
                "conversions": 4.0,
                "conversionsValue": 50.0
            }
        });
        let decoded = decode_rows::<CampaignInsightRow>(vec![row]);
        assert!(decoded.is_clean());

        let m = &decoded.rows[0].metrics;
        assert_eq!(format_metric_int(&m.impressions), "1200");
        assert_eq!(format_ctr(m.ctr), "5.00%");
        assert_eq!(format_micros(m.average_cpc), "0.33");
        assert_eq!(format_roas(m.conversions_value, &m.cost_micros), "2.50");
    }

    #[test]
    fn test_row_without_cost_has_no_roas() {
        let row = json!({ "campaign": { "id": "2" }, "metrics": { "conversionsValue": 10.0 } });
        let decoded = decode_rows::<CampaignInsightRow>(vec![row]);
        let m = &decoded.rows[0].metrics;
        assert_eq!(format_roas(m.conversions_value, &m.cost_micros), "-");
    }
}
