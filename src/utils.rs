use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

pub fn generate_code_verifier() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(128)
        .map(char::from)
        .collect()
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Opaque value echoed back by the authorization redirect.
pub fn generate_state() -> String {
    let bytes: [u8; 24] = rand::rng().random();
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Strips separators from a customer id: `"123-456-7890"` -> `"1234567890"`.
pub fn clean_customer_id(id: &str) -> String {
    id.chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .collect()
}

/// Trailing id segment of a resource name.
///
/// `"customers/123/campaigns/456"` -> `"456"`
pub fn resource_id(resource_name: &str) -> &str {
    resource_name.rsplit('/').next().unwrap_or(resource_name)
}

/// Formats an int64-as-string micros amount as currency units.
///
/// `"5000000"` -> `"5.00"`. Empty input is zero; unparsable input is returned unchanged.
pub fn micros_to_currency(micros: &str) -> String {
    if micros.is_empty() {
        return "0.00".to_string();
    }
    match micros.parse::<i64>() {
        Ok(n) => format!("{:.2}", n as f64 / 1_000_000.0),
        Err(_) => micros.to_string(),
    }
}

/// Currency units of a micros amount the API reports as a double.
pub fn format_micros(micros: f64) -> String {
    format!("{:.2}", micros / 1_000_000.0)
}

/// Int64 metrics arrive as strings; empty means zero.
pub fn format_metric_int(value: &str) -> String {
    if value.is_empty() {
        return "0".to_string();
    }
    match value.parse::<i64>() {
        Ok(n) => n.to_string(),
        Err(_) => value.to_string(),
    }
}

/// `0.0512` -> `"5.12%"`
pub fn format_ctr(ctr: f64) -> String {
    format!("{:.2}%", ctr * 100.0)
}

/// Conversion value per unit of cost, or `-` when there was no cost.
pub fn format_roas(conversions_value: f64, cost_micros: &str) -> String {
    match cost_micros.parse::<i64>() {
        Ok(n) if n != 0 => format!("{:.2}", conversions_value / (n as f64 / 1_000_000.0)),
        _ => "-".to_string(),
    }
}

/// Keeps the first and last four characters of a secret.
pub fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.is_empty() {
        return "(not set)".to_string();
    }
    if chars.len() <= 8 {
        return "***".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

pub fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    let cut: String = value.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", cut)
}

/// `"SEARCH_PARTNERS"` -> `"search partners"`
pub fn humanize_enum(value: &str) -> String {
    value.replace('_', " ").to_lowercase()
}

pub fn dash_if_empty(value: &str) -> String {
    if value.is_empty() {
        "-".to_string()
    } else {
        value.to_string()
    }
}
