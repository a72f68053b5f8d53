use crate::{
    Res,
    ads::{ResourceKind, decode_rows},
    cli::{Output, Status, report_decode_failures, require_id, search, session, set_status},
    success,
    types::{AdGroupRow, AdGroupTableRow},
    utils::{humanize_enum, micros_to_currency, truncate},
};

pub async fn list(output: Output, account: &str, campaign_id: &str) -> Res<()> {
    let campaign_id = require_id("campaign", campaign_id)?;
    let query = format!(
        "SELECT ad_group.id, ad_group.name, ad_group.status, ad_group.type, \
         ad_group.cpc_bid_micros, campaign.id \
         FROM ad_group \
         WHERE ad_group.status != 'REMOVED' AND campaign.id = '{}' \
         ORDER BY ad_group.id",
        campaign_id
    );

    let client = session().await?;
    let decoded = decode_rows::<AdGroupRow>(search(&client, account, &query).await?);
    report_decode_failures(&decoded);

    output.render(&decoded.rows, "No ad groups found.", |r| AdGroupTableRow {
        id: r.ad_group.id.clone(),
        name: truncate(&r.ad_group.name, 40),
        status: r.ad_group.status.clone(),
        kind: humanize_enum(&r.ad_group.kind),
        bid: micros_to_currency(&r.ad_group.cpc_bid_micros),
    })
}

pub async fn set_ad_group_status(account: &str, ad_group_id: &str, status: Status) -> Res<()> {
    let ad_group_id = require_id("ad group", ad_group_id)?;
    set_status(ResourceKind::AdGroup, account, ad_group_id, status).await?;
    success!("Ad group {} status set to {}.", ad_group_id, status.as_str());
    Ok(())
}
