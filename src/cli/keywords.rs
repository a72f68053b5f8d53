use clap::ValueEnum;
use serde_json::json;

use crate::{
    Res,
    ads::{MutateOperation, ResourceKind, decode_rows},
    cli::{
        Output, Status, report_decode_failures, require_compound_id, require_id, search, session,
        set_status,
    },
    info, success,
    types::{KeywordRow, KeywordTableRow},
    utils::{micros_to_currency, truncate},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MatchType {
    Broad,
    Phrase,
    Exact,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::Broad => "BROAD",
            MatchType::Phrase => "PHRASE",
            MatchType::Exact => "EXACT",
        }
    }
}

pub async fn list(output: Output, account: &str, campaign_id: &str) -> Res<()> {
    let campaign_id = require_id("campaign", campaign_id)?;
    let query = format!(
        "SELECT ad_group_criterion.criterion_id, \
         ad_group_criterion.keyword.text, ad_group_criterion.keyword.match_type, \
         ad_group_criterion.status, ad_group_criterion.negative, \
         ad_group_criterion.quality_info.quality_score, \
         ad_group_criterion.cpc_bid_micros, \
         ad_group.id, ad_group.name, campaign.id \
         FROM keyword_view \
         WHERE ad_group_criterion.status != 'REMOVED' AND campaign.id = '{}' \
         ORDER BY ad_group_criterion.criterion_id",
        campaign_id
    );

    let client = session().await?;
    let decoded = decode_rows::<KeywordRow>(search(&client, account, &query).await?);
    report_decode_failures(&decoded);

    output.render(&decoded.rows, "No keywords found.", |r| {
        let criterion = &r.ad_group_criterion;
        let mut text = criterion.keyword.text.clone();
        if criterion.negative {
            text.push_str(" [neg]");
        }
        let quality_score = match criterion.quality_info.quality_score {
            0 => "-".to_string(),
            qs => qs.to_string(),
        };
        KeywordTableRow {
            id: format!("{}~{}", r.ad_group.id, criterion.criterion_id),
            keyword: truncate(&text, 40),
            match_type: criterion.keyword.match_type.clone(),
            status: criterion.status.clone(),
            quality_score,
            bid: micros_to_currency(&criterion.cpc_bid_micros),
            ad_group: truncate(&r.ad_group.name, 24),
        }
    })
}

pub async fn add(account: &str, ad_group_id: &str, text: &str, match_type: MatchType) -> Res<()> {
    let ad_group_id = require_id("ad group", ad_group_id)?;
    let text = text.trim();
    if text.is_empty() {
        return Err("keyword text must not be empty".into());
    }

    let client = session().await?;
    let op = MutateOperation::create(json!({
        "adGroup": ResourceKind::AdGroup.resource_name(account, ad_group_id),
        "status": Status::Enabled.as_str(),
        "keyword": {
            "text": text,
            "matchType": match_type.as_str(),
        },
    }));
    let results = client.mutate_ad_group_criteria(account, &[op]).await?;

    success!("Keyword added: \"{}\" [{}]", text, match_type.as_str());
    if let Some(resource_name) = results.first() {
        info!("Resource: {}", resource_name);
    }
    Ok(())
}

/// `keyword_id` is `<adGroupId>~<criterionId>`, as shown by `keywords list`.
pub async fn set_keyword_status(account: &str, keyword_id: &str, status: Status) -> Res<()> {
    let keyword_id = require_compound_id("keyword", keyword_id)?;
    set_status(ResourceKind::AdGroupCriterion, account, keyword_id, status).await?;
    success!("Keyword {} status set to {}.", keyword_id, status.as_str());
    Ok(())
}

pub async fn remove(account: &str, keyword_id: &str) -> Res<()> {
    let keyword_id = require_compound_id("keyword", keyword_id)?;
    let client = session().await?;
    let op = MutateOperation::remove(
        ResourceKind::AdGroupCriterion.resource_name(account, keyword_id),
    );
    client.mutate_ad_group_criteria(account, &[op]).await?;
    success!("Keyword {} removed.", keyword_id);
    Ok(())
}
