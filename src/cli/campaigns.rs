use serde_json::json;

use crate::{
    Res,
    ads::{MutateOperation, ResourceKind, Session, decode_rows},
    cli::{Output, Status, report_decode_failures, require_id, search, session, set_status},
    success,
    types::{CampaignRow, CampaignTableRow},
    utils::{dash_if_empty, humanize_enum, micros_to_currency, truncate},
};

const CAMPAIGN_FIELDS: &str = "campaign.id, campaign.name, campaign.status, \
     campaign.advertising_channel_type, campaign.bidding_strategy_type, \
     campaign.start_date, campaign.end_date, \
     campaign_budget.id, campaign_budget.amount_micros";

pub async fn list(output: Output, account: &str) -> Res<()> {
    let client = session().await?;
    let query = format!(
        "SELECT {} FROM campaign WHERE campaign.status != 'REMOVED' ORDER BY campaign.id",
        CAMPAIGN_FIELDS
    );

    let decoded = decode_rows::<CampaignRow>(search(&client, account, &query).await?);
    report_decode_failures(&decoded);

    output.render(&decoded.rows, "No campaigns found.", |r| CampaignTableRow {
        id: r.campaign.id.clone(),
        name: truncate(&r.campaign.name, 36),
        status: r.campaign.status.clone(),
        channel: humanize_enum(&r.campaign.advertising_channel_type),
        budget: micros_to_currency(&r.campaign_budget.amount_micros),
        start: r.campaign.start_date.clone(),
        end: dash_if_empty(&r.campaign.end_date),
    })
}

pub async fn get(output: Output, account: &str, campaign_id: &str) -> Res<()> {
    let client = session().await?;
    let row = find_campaign(&client, account, campaign_id).await?;

    if output.is_json() {
        return output.print_json(&row);
    }

    let c = &row.campaign;
    let fields = [
        ("ID", c.id.clone()),
        ("Name", c.name.clone()),
        ("Status", c.status.clone()),
        ("Type", humanize_enum(&c.advertising_channel_type)),
        ("Bidding", c.bidding_strategy_type.clone()),
        (
            "Daily Budget",
            micros_to_currency(&row.campaign_budget.amount_micros),
        ),
        ("Budget ID", row.campaign_budget.id.clone()),
        ("Start Date", c.start_date.clone()),
        ("End Date", dash_if_empty(&c.end_date)),
        ("Resource", c.resource_name.clone()),
    ];
    for (key, value) in fields {
        println!("{:<14}{}", format!("{}:", key), value);
    }
    Ok(())
}

pub async fn set_campaign_status(account: &str, campaign_id: &str, status: Status) -> Res<()> {
    set_status(ResourceKind::Campaign, account, campaign_id, status).await?;
    success!("Campaign {} status set to {}.", campaign_id, status.as_str());
    Ok(())
}

/// Sets the daily budget of a campaign, `amount_micros` in currency micros.
pub async fn budget(account: &str, campaign_id: &str, amount_micros: i64) -> Res<()> {
    if amount_micros <= 0 {
        return Err("--amount must be positive (in micros)".into());
    }

    let client = session().await?;
    let row = find_campaign(&client, account, campaign_id).await?;
    let budget_id = row.campaign_budget.id;
    if budget_id.is_empty() {
        return Err(format!("could not find budget for campaign {}", campaign_id).into());
    }

    let amount = amount_micros.to_string();
    let op = MutateOperation::update(
        json!({
            "resourceName": ResourceKind::CampaignBudget.resource_name(account, &budget_id),
            "amountMicros": amount,
        }),
        &["amountMicros"],
    );
    client.mutate_campaign_budgets(account, &[op]).await?;

    success!(
        "Campaign {} budget updated to {} (budget ID: {}).",
        campaign_id,
        micros_to_currency(&amount),
        budget_id
    );
    Ok(())
}

async fn find_campaign(client: &Session, account: &str, campaign_id: &str) -> Res<CampaignRow> {
    let campaign_id = require_id("campaign", campaign_id)?;
    let query = format!(
        "SELECT {} FROM campaign WHERE campaign.id = '{}'",
        CAMPAIGN_FIELDS, campaign_id
    );
    let rows = search(client, account, &query).await?;
    let first = rows
        .into_iter()
        .next()
        .ok_or_else(|| format!("campaign {} not found", campaign_id))?;

    Ok(serde_json::from_value(first)?)
}
