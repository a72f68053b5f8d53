use crate::{
    Res,
    ads::{ResourceKind, decode_rows},
    cli::{
        Output, Status, report_decode_failures, require_compound_id, require_id, search, session,
        set_status,
    },
    success,
    types::{AdRow, AdTableRow, AdTextAsset},
    utils::{dash_if_empty, truncate},
};

const HEADLINES_SHOWN: usize = 3;

/// Lists the responsive search ads of one ad group.
pub async fn list(output: Output, account: &str, ad_group_id: &str) -> Res<()> {
    let ad_group_id = require_id("ad group", ad_group_id)?;
    let query = format!(
        "SELECT ad_group_ad.ad.id, ad_group_ad.ad.type, \
         ad_group_ad.ad.responsive_search_ad.headlines, \
         ad_group_ad.ad.responsive_search_ad.descriptions, \
         ad_group_ad.ad.final_urls, ad_group_ad.status, \
         ad_group.id, campaign.id \
         FROM ad_group_ad \
         WHERE ad_group_ad.ad.type = 'RESPONSIVE_SEARCH_AD' \
         AND ad_group_ad.status != 'REMOVED' \
         AND ad_group.id = '{}' \
         ORDER BY ad_group_ad.ad.id",
        ad_group_id
    );

    let client = session().await?;
    let decoded = decode_rows::<AdRow>(search(&client, account, &query).await?);
    report_decode_failures(&decoded);

    output.render(&decoded.rows, "No responsive search ads found.", |r| {
        let ad = &r.ad_group_ad.ad;
        AdTableRow {
            id: format!("{}~{}", r.ad_group.id, ad.id),
            status: r.ad_group_ad.status.clone(),
            headlines: summarize_headlines(&ad.responsive_search_ad.headlines),
            final_url: dash_if_empty(ad.final_urls.first().map_or("", String::as_str)),
        }
    })
}

/// `ad_id` is `<adGroupId>~<adId>`, as shown by `ads list`.
pub async fn set_ad_status(account: &str, ad_id: &str, status: Status) -> Res<()> {
    let ad_id = require_compound_id("ad", ad_id)?;
    set_status(ResourceKind::AdGroupAd, account, ad_id, status).await?;
    success!("Ad {} status set to {}.", ad_id, status.as_str());
    Ok(())
}

fn summarize_headlines(headlines: &[AdTextAsset]) -> String {
    if headlines.is_empty() {
        return "-".to_string();
    }
    let shown: Vec<String> = headlines
        .iter()
        .take(HEADLINES_SHOWN)
        .map(|h| truncate(&h.text, 30))
        .collect();
    let mut summary = shown.join(" | ");
    if headlines.len() > HEADLINES_SHOWN {
        summary.push_str(&format!(" (+{} more)", headlines.len() - HEADLINES_SHOWN));
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(text: &str) -> AdTextAsset {
        AdTextAsset {
            text: text.to_string(),
            pinned_field: None,
        }
    }

    #[test]
    fn test_summarize_headlines_caps_and_counts() {
        let headlines: Vec<AdTextAsset> = ["A", "B", "C", "D", "E"].into_iter().map(asset).collect();
        assert_eq!(summarize_headlines(&headlines), "A | B | C (+2 more)");
        assert_eq!(summarize_headlines(&headlines[..2]), "A | B");
        assert_eq!(summarize_headlines(&[]), "-");
    }
}
