use std::collections::HashMap;

use super::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key: &str| map.get(key).cloned()
}

const REQUIRED: [(&str, &str); 3] = [
    ("WAFER_API_URL", "https://api.fab.test/prod/"),
    ("COGNITO_USER_POOL_ID", "us-east-1_AbCdEf"),
    ("COGNITO_APP_CLIENT_ID", "client-123"),
];

fn with_required(extra: &[(&'static str, &'static str)]) -> Vec<(&'static str, &'static str)> {
    let mut pairs = REQUIRED.to_vec();
    pairs.extend_from_slice(extra);
    pairs
}

#[test]
fn defaults_fill_optional_values() {
    let cfg = AppConfig::from_lookup(lookup_from(&REQUIRED)).unwrap();
    assert_eq!(cfg.port, DEFAULT_PORT);
    assert_eq!(cfg.region, DEFAULT_REGION);
    assert_eq!(cfg.api_url, "https://api.fab.test/prod");
    assert_eq!(cfg.cognito.user_pool_id, "us-east-1_AbCdEf");
    assert_eq!(cfg.cognito.app_client_id, "client-123");
    assert_eq!(cfg.cognito.endpoint, "https://cognito-idp.us-east-1.amazonaws.com/");
    assert_eq!(cfg.client, ClientConfig { region: DEFAULT_REGION.to_owned(), bucket: DEFAULT_IMAGE_BUCKET.to_owned() });
    assert!(!cfg.cookie_secure);
    assert_eq!(
        cfg.timeouts,
        UpstreamTimeouts {
            request_secs: DEFAULT_UPSTREAM_REQUEST_TIMEOUT_SECS,
            connect_secs: DEFAULT_UPSTREAM_CONNECT_TIMEOUT_SECS
        }
    );
}

#[test]
fn overrides_are_applied() {
    let pairs = with_required(&[
        ("PORT", "8080"),
        ("WAFER_REGION", "eu-west-1"),
        ("COGNITO_ENDPOINT", "http://localhost:9229/"),
        ("WAFER_IMAGE_BUCKET", "wafer-bucket"),
        ("WAFER_STORAGE_REGION", "eu-central-1"),
        ("COOKIE_SECURE", "yes"),
        ("UPSTREAM_REQUEST_TIMEOUT_SECS", "5"),
        ("UPSTREAM_CONNECT_TIMEOUT_SECS", "2"),
    ]);
    let cfg = AppConfig::from_lookup(lookup_from(&pairs)).unwrap();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.region, "eu-west-1");
    assert_eq!(cfg.cognito.endpoint, "http://localhost:9229/");
    assert_eq!(cfg.client, ClientConfig { region: "eu-central-1".to_owned(), bucket: "wafer-bucket".to_owned() });
    assert!(cfg.cookie_secure);
    assert_eq!(cfg.timeouts, UpstreamTimeouts { request_secs: 5, connect_secs: 2 });
}

#[test]
fn storage_region_follows_api_region() {
    let pairs = with_required(&[("WAFER_REGION", "ap-south-1")]);
    let cfg = AppConfig::from_lookup(lookup_from(&pairs)).unwrap();
    assert_eq!(cfg.client.region, "ap-south-1");
}

#[test]
fn missing_required_values_are_reported() {
    for var in ["WAFER_API_URL", "COGNITO_USER_POOL_ID", "COGNITO_APP_CLIENT_ID"] {
        let pairs: Vec<_> = REQUIRED.iter().copied().filter(|(k, _)| *k != var).collect();
        let err = AppConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert_eq!(err, ConfigError::Missing { var });
    }
}

#[test]
fn blank_required_value_counts_as_missing() {
    // Later pairs win, so this blanks the required client id.
    let pairs = with_required(&[("COGNITO_APP_CLIENT_ID", "   ")]);
    let err = AppConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
    assert_eq!(err, ConfigError::Missing { var: "COGNITO_APP_CLIENT_ID" });
}

#[test]
fn malformed_pool_id_is_invalid() {
    let pairs = [
        ("WAFER_API_URL", "https://api.fab.test"),
        ("COGNITO_USER_POOL_ID", "nounderscore"),
        ("COGNITO_APP_CLIENT_ID", "client-123"),
    ];
    let err = AppConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
    assert_eq!(err, ConfigError::Invalid { var: "COGNITO_USER_POOL_ID", value: "nounderscore".to_owned() });
}

#[test]
fn unparseable_port_is_invalid() {
    let pairs = with_required(&[("PORT", "eighty")]);
    let err = AppConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
    assert_eq!(err, ConfigError::Invalid { var: "PORT", value: "eighty".to_owned() });
}

#[test]
fn unrecognized_cookie_flag_is_invalid() {
    let pairs = with_required(&[("COOKIE_SECURE", "maybe")]);
    let err = AppConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
    assert_eq!(err, ConfigError::Invalid { var: "COOKIE_SECURE", value: "maybe".to_owned() });
}

#[test]
fn parse_bool_true_variants() {
    for val in ["1", "true", "yes", "on", "TRUE", "On", "  true  "] {
        assert_eq!(parse_bool(val), Some(true), "expected true for {val:?}");
    }
}

#[test]
fn parse_bool_false_variants() {
    for val in ["0", "false", "no", "off", "FALSE", "No"] {
        assert_eq!(parse_bool(val), Some(false), "expected false for {val:?}");
    }
}

#[test]
fn parse_bool_rejects_other_values() {
    assert_eq!(parse_bool("maybe"), None);
    assert_eq!(parse_bool(""), None);
}

#[test]
fn pool_region_requires_both_halves() {
    assert_eq!(pool_region("us-west-2_XXX"), Some("us-west-2"));
    assert_eq!(pool_region("_XXX"), None);
    assert_eq!(pool_region("us-west-2_"), None);
}
