use chrono::{Duration, Utc};
use gads_cli::{
    ads::{self, AdsClient, MutateOperation, OAuthConfig, ResourceKind, TokenSupplier},
    error::{Error, Result},
    management::CredentialStore,
    types::{Credentials, Token},
};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path},
};

struct StaticToken(&'static str);

impl TokenSupplier for StaticToken {
    async fn current_token(&self) -> Result<Token> {
        Ok(Token {
            access_token: self.0.to_string(),
            token_type: "Bearer".to_string(),
            expiry: None,
        })
    }
}

fn client_for(server: &MockServer, manager: Option<&str>) -> AdsClient<StaticToken> {
    AdsClient::new(reqwest::Client::new(), StaticToken("ya29.test"), "dev-token", manager)
        .with_endpoint(&server.uri(), "v19")
}

const QUERY: &str = "SELECT campaign.id FROM campaign";

#[tokio::test]
async fn test_search_drains_all_pages_in_order() {
    let server = MockServer::start().await;
    let url = "/v19/customers/1234567890/googleAds:search";

    Mock::given(method("POST"))
        .and(path(url))
        .and(body_json(json!({ "query": QUERY })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"campaign": {"id": "1"}}, {"campaign": {"id": "2"}}],
            "nextPageToken": "p2"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(url))
        .and(body_json(json!({ "query": QUERY, "pageToken": "p2" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"campaign": {"id": "3"}}],
            "nextPageToken": "p3"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(url))
        .and(body_json(json!({ "query": QUERY, "pageToken": "p3" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"campaign": {"id": "4"}}],
            "nextPageToken": ""
        })))
        .expect(1)
        .mount(&server)
        .await;

    let rows = client_for(&server, None)
        .search("123-456-7890", QUERY)
        .await
        .unwrap();

    let ids: Vec<&str> = rows
        .iter()
        .map(|r| r["campaign"]["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["1", "2", "3", "4"]);
}

#[tokio::test]
async fn test_search_without_results_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let rows = client_for(&server, None).search("1", QUERY).await.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_requests_carry_auth_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v19/customers:listAccessibleCustomers"))
        .and(header("authorization", "Bearer ya29.test"))
        .and(header("developer-token", "dev-token"))
        .and(header("login-customer-id", "1112223333"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resourceNames": ["customers/1234567890", "customers/9876543210"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let names = client_for(&server, Some("111-222-3333"))
        .list_accessible_customers()
        .await
        .unwrap();
    assert_eq!(names, vec!["customers/1234567890", "customers/9876543210"]);
}

#[tokio::test]
async fn test_login_customer_id_omitted_when_not_configured() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"resourceNames": []})))
        .mount(&server)
        .await;

    client_for(&server, Some(""))
        .list_accessible_customers()
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("login-customer-id").is_none());
    assert!(requests[0].headers.get("developer-token").is_some());
}

#[tokio::test]
async fn test_error_prefers_operation_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "code": 400,
                "message": "Request contains an invalid argument.",
                "details": [{"errors": [{"message": "Invalid GAQL: unexpected token FROM"}]}]
            }
        })))
        .mount(&server)
        .await;

    match client_for(&server, None).search("1", QUERY).await {
        Err(Error::Remote { status, message }) => {
            assert_eq!(status, 400);
            assert_eq!(message, "Invalid GAQL: unexpected token FROM");
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_error_falls_back_to_outer_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {"code": 403, "message": "The caller does not have permission"}
        })))
        .mount(&server)
        .await;

    let err = client_for(&server, None).search("1", QUERY).await.unwrap_err();
    assert_eq!(err.status(), Some(403));
    assert_eq!(err.to_string(), "The caller does not have permission");
}

#[tokio::test]
async fn test_error_with_unparsable_body_keeps_raw_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let err = client_for(&server, None).search("1", QUERY).await.unwrap_err();
    assert!(err.is_remote());
    assert_eq!(err.status(), Some(502));
    assert_eq!(err.to_string(), "upstream unavailable");
}

#[tokio::test]
async fn test_failing_later_page_fails_whole_search() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_json(json!({ "query": QUERY })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"campaign": {"id": "1"}}],
            "nextPageToken": "p2"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_json(json!({ "query": QUERY, "pageToken": "p2" })))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": {"message": "Internal error encountered."}
        })))
        .mount(&server)
        .await;

    let err = client_for(&server, None).search("1", QUERY).await.unwrap_err();
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn test_malformed_success_body_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server, None).search("1", QUERY).await.unwrap_err();
    assert!(matches!(err, Error::Parse(_)));
}

#[tokio::test]
async fn test_unreachable_host_is_transport_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = AdsClient::new(reqwest::Client::new(), StaticToken("t"), "dev", None)
        .with_endpoint(&format!("http://127.0.0.1:{}", port), "v19");

    let err = client.list_accessible_customers().await.unwrap_err();
    assert!(err.is_transport());
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_mutate_sends_operations_and_returns_names_in_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v19/customers/1234567890/adGroupCriteria:mutate"))
        .and(body_json(json!({
            "operations": [
                {"update": {"resourceName": "customers/1234567890/adGroupCriteria/7~8", "status": "PAUSED"},
                 "updateMask": "status"},
                {"remove": "customers/1234567890/adGroupCriteria/7~9"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"resourceName": "customers/1234567890/adGroupCriteria/7~8"},
                {"resourceName": "customers/1234567890/adGroupCriteria/7~9"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let kind = ResourceKind::AdGroupCriterion;
    let ops = [
        MutateOperation::update(
            json!({"resourceName": kind.resource_name("123-456-7890", "7~8"), "status": "PAUSED"}),
            &["status"],
        ),
        MutateOperation::remove(kind.resource_name("123-456-7890", "7~9")),
    ];

    let names = client_for(&server, None)
        .mutate_ad_group_criteria("123-456-7890", &ops)
        .await
        .unwrap();
    assert_eq!(
        names,
        vec![
            "customers/1234567890/adGroupCriteria/7~8",
            "customers/1234567890/adGroupCriteria/7~9"
        ]
    );
}

#[tokio::test]
async fn test_mutate_targets_each_collection() {
    let server = MockServer::start().await;
    for collection in ["campaigns", "campaignBudgets", "adGroups", "adGroupAds"] {
        Mock::given(method("POST"))
            .and(path(format!("/v19/customers/1/{}:mutate", collection)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = client_for(&server, None);
    let op = [MutateOperation::remove("customers/1/x/1")];
    client.mutate_campaigns("1", &op).await.unwrap();
    client.mutate_campaign_budgets("1", &op).await.unwrap();
    client.mutate_ad_groups("1", &op).await.unwrap();
    client.mutate_ad_group_ads("1", &op).await.unwrap();
}

fn credentials(refresh_token: &str) -> Credentials {
    Credentials {
        client_id: "client".to_string(),
        client_secret: "secret".to_string(),
        developer_token: "dev-token".to_string(),
        manager_customer_id: "111-222-3333".to_string(),
        refresh_token: refresh_token.to_string(),
        access_token: "expired".to_string(),
        token_type: "Bearer".to_string(),
        token_expiry: Some(Utc::now() - Duration::minutes(5)),
    }
}

#[tokio::test]
async fn test_connect_without_refresh_token_makes_no_calls() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = CredentialStore::new(dir.path().join("credentials.json"));
    let oauth = OAuthConfig::new("client", "secret").with_token_url(server.uri());

    let result = ads::connect(credentials(""), store, reqwest::Client::new(), oauth);
    assert!(matches!(result, Err(Error::NotAuthenticated)));
}

#[tokio::test]
async fn test_connect_without_developer_token_is_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = CredentialStore::new(dir.path().join("credentials.json"));
    let mut creds = credentials("1//refresh");
    creds.developer_token.clear();

    let result = ads::connect(
        creds,
        store,
        reqwest::Client::new(),
        OAuthConfig::new("client", "secret"),
    );
    assert!(matches!(result, Err(Error::Configuration(_))));
}

#[tokio::test]
async fn test_session_refreshes_persists_and_searches() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "ya29.fresh",
            "token_type": "Bearer",
            "expires_in": 3599
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v19/customers/1234567890/googleAds:search"))
        .and(header("authorization", "Bearer ya29.fresh"))
        .and(header("login-customer-id", "1112223333"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"campaign": {"id": "1"}}]
        })))
        .expect(2)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = CredentialStore::new(dir.path().join("credentials.json"));
    let oauth =
        OAuthConfig::new("client", "secret").with_token_url(format!("{}/token", server.uri()));

    let http = reqwest::Client::new();
    let client = ads::connect(credentials("1//refresh"), store.clone(), http, oauth)
        .unwrap()
        .with_endpoint(&server.uri(), "v19");

    client.search("123-456-7890", QUERY).await.unwrap();
    client.search("123-456-7890", QUERY).await.unwrap();

    let on_disk = store.load().await.unwrap();
    assert_eq!(on_disk.access_token, "ya29.fresh");
    assert_eq!(on_disk.refresh_token, "1//refresh");
    assert_eq!(on_disk.manager_customer_id, "111-222-3333");
}
