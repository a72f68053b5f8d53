use gads_cli::utils::*;

#[test]
fn test_generate_code_verifier() {
    let verifier = generate_code_verifier();

    // Should be exactly 128 characters
    assert_eq!(verifier.len(), 128);

    // Should contain only alphanumeric characters
    assert!(verifier.chars().all(|c| c.is_ascii_alphanumeric()));

    // Two generated verifiers should be different
    let verifier2 = generate_code_verifier();
    assert_ne!(verifier, verifier2);
}

#[test]
fn test_generate_code_challenge() {
    let verifier = "test_verifier_123";
    let challenge = generate_code_challenge(verifier);

    assert!(!challenge.is_empty());
    assert_eq!(challenge, generate_code_challenge(verifier));
    assert_ne!(challenge, generate_code_challenge("different_verifier"));

    // base64url without padding
    assert!(!challenge.contains('='));
    assert!(!challenge.contains('+'));
    assert!(!challenge.contains('/'));
}

#[test]
fn test_generate_code_challenge_known_vector() {
    // RFC 7636, appendix B
    let verifier = "dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk";
    assert_eq!(
        generate_code_challenge(verifier),
        "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM"
    );
}

#[test]
fn test_generate_state_is_random_and_url_safe() {
    let a = generate_state();
    let b = generate_state();
    assert_ne!(a, b);
    assert_eq!(a.len(), 32);
    assert!(
        a.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    );
}

#[test]
fn test_clean_customer_id() {
    assert_eq!(clean_customer_id("123-456-7890"), "1234567890");
    assert_eq!(clean_customer_id(" 1234567890 "), "1234567890");
    assert_eq!(clean_customer_id("1234567890"), "1234567890");
    assert_eq!(clean_customer_id(""), "");
}

#[test]
fn test_resource_id() {
    assert_eq!(resource_id("customers/1/campaigns/2"), "2");
    assert_eq!(resource_id("customers/1/adGroupCriteria/44~55"), "44~55");
    assert_eq!(resource_id("customers/1234567890"), "1234567890");
    assert_eq!(resource_id("plain"), "plain");
}

#[test]
fn test_micros_to_currency() {
    assert_eq!(micros_to_currency("5000000"), "5.00");
    assert_eq!(micros_to_currency("1234567"), "1.23");
    assert_eq!(micros_to_currency("0"), "0.00");
    assert_eq!(micros_to_currency(""), "0.00");
    assert_eq!(micros_to_currency("n/a"), "n/a");
}

#[test]
fn test_mask_secret() {
    assert_eq!(mask_secret(""), "(not set)");
    assert_eq!(mask_secret("short"), "***");
    assert_eq!(mask_secret("12345678"), "***");
    assert_eq!(mask_secret("ya29.a0AfH6SMBexample"), "ya29...mple");
}

#[test]
fn test_truncate() {
    assert_eq!(truncate("Brand Campaign", 40), "Brand Campaign");
    assert_eq!(truncate("abcdefghij", 5), "abcd…");
    assert_eq!(truncate("ääääää", 3), "ää…");
}

#[test]
fn test_humanize_enum() {
    assert_eq!(humanize_enum("SEARCH"), "search");
    assert_eq!(humanize_enum("PERFORMANCE_MAX"), "performance max");
}

#[test]
fn test_dash_if_empty() {
    assert_eq!(dash_if_empty(""), "-");
    assert_eq!(dash_if_empty("2025-12-31"), "2025-12-31");
}

#[test]
fn test_format_metric_int() {
    assert_eq!(format_metric_int("1234"), "1234");
    assert_eq!(format_metric_int(""), "0");
    assert_eq!(format_metric_int("n/a"), "n/a");
}

#[test]
fn test_format_ctr() {
    assert_eq!(format_ctr(0.0512), "5.12%");
    assert_eq!(format_ctr(0.0), "0.00%");
}

#[test]
fn test_format_micros() {
    assert_eq!(format_micros(1_234_567.0), "1.23");
    assert_eq!(format_micros(0.0), "0.00");
}

#[test]
fn test_format_roas() {
    // 50.00 in value over 20.00 in cost
    assert_eq!(format_roas(50.0, "20000000"), "2.50");
    assert_eq!(format_roas(0.0, "20000000"), "0.00");
}

#[test]
fn test_format_roas_without_cost() {
    assert_eq!(format_roas(50.0, "0"), "-");
    assert_eq!(format_roas(50.0, ""), "-");
    assert_eq!(format_roas(50.0, "n/a"), "-");
}
