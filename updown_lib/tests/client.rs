//! Integration tests for the updown.io client against a wiremock server.

use serde_json::json;
use updown_lib::{CheckItem, Client, Error, MetricGroup, Recipient, RecipientType, Webhook};
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const KEY: &str = "test-api-key";

fn client_for(server: &MockServer) -> Client {
    let base = Url::parse(&format!("{}/api/", server.uri())).unwrap();
    Client::with_http_client(KEY, reqwest::Client::new())
        .unwrap()
        .with_base_url(base)
}

fn checks_listing() -> serde_json::Value {
    json!([
        {"token": "s7su", "url": "https://teen-quotes.com", "alias": "Teen Quotes", "enabled": true},
        {"token": "ab12", "url": "https://blog.example.com", "alias": "Blog", "enabled": false},
        {"token": "zz99", "url": "https://example.com", "alias": null}
    ])
}

mod transport {
    use super::*;

    #[tokio::test]
    async fn list_sends_credential_and_decodes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/checks"))
            .and(header("X-API-KEY", KEY))
            .and(header("Accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(checks_listing()))
            .expect(1)
            .mount(&server)
            .await;

        let res = client_for(&server).checks().list().await.unwrap();
        assert_eq!(res.status(), 200);
        assert_eq!(res.data.len(), 3);
        assert_eq!(res.data[0].alias.as_deref(), Some("Teen Quotes"));
        assert!(!res.data[1].enabled);
    }

    #[tokio::test]
    async fn not_found_reports_method_url_and_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/checks/nope"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = client_for(&server).checks().get("nope").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("GET {}/api/checks/nope: 404 Not Found", server.uri())
        );
        assert_eq!(err.status().map(|s| s.as_u16()), Some(404));
        match err {
            Error::Api(api) => assert_eq!(api.status_code(), 404),
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn rejection_keeps_reason_phrase() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/checks"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"error": "URL is invalid"})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .checks()
            .add(&CheckItem::new("not a url"))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("POST {}/api/checks: 400 Bad Request", server.uri())
        );
        let Error::Api(api) = err else {
            panic!("expected Api error");
        };
        assert_eq!(api.service_message(), Some("URL is invalid"));
        assert_eq!(api.response_data, Some(json!({"error": "URL is invalid"})));
    }

    #[tokio::test]
    async fn not_found_with_error_body_keeps_status_line() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/checks/nope"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"error": "Check not found"})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).checks().get("nope").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("GET {}/api/checks/nope: 404 Not Found", server.uri())
        );
    }

    #[tokio::test]
    async fn created_body_round_trips() {
        let server = MockServer::start().await;
        let item = CheckItem {
            alias: Some("Google".into()),
            period: Some(60),
            enabled: Some(true),
            ..CheckItem::new("https://google.fr")
        };
        Mock::given(method("POST"))
            .and(path("/api/checks"))
            .and(header("Content-Type", "application/json"))
            .and(body_json(&item))
            .respond_with(ResponseTemplate::new(201).set_body_json(&item))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let req = client
            .new_request(reqwest::Method::POST, "checks", Some(&item))
            .unwrap();
        let res = client.send::<CheckItem>(req).await.unwrap();
        assert_eq!(res.status(), 201);
        assert_eq!(res.data, item);
    }

    #[tokio::test]
    async fn malformed_success_body_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/nodes"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).nodes().list().await.unwrap_err();
        assert!(matches!(err, Error::Decode { .. }), "got {err:?}");
        assert_eq!(err.status().map(|s| s.as_u16()), Some(200));
    }

    #[tokio::test]
    async fn connection_failure_has_no_response() {
        let client = Client::with_http_client(KEY, reqwest::Client::new())
            .unwrap()
            .with_base_url(Url::parse("http://127.0.0.1:1/api/").unwrap());
        let err = client.nodes().list_ipv4().await.unwrap_err();
        assert!(matches!(err, Error::Transport { .. }), "got {err:?}");
        assert!(err.status().is_none());
        assert!(err.to_string().starts_with("GET http://127.0.0.1:1/api/nodes/ipv4: "));
    }

    #[tokio::test]
    async fn execute_skips_decoding() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/nodes/ipv6"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let req = client
            .new_request(reqwest::Method::GET, "nodes/ipv6", updown_lib::NO_BODY)
            .unwrap();
        let info = client.execute(req).await.unwrap();
        assert_eq!(info.status, 200);
    }
}

mod aliases {
    use super::*;

    #[tokio::test]
    async fn second_lookup_hits_cache() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/checks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(checks_listing()))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let checks = client.checks();
        assert_eq!(checks.token_for_alias("Teen Quotes").await.unwrap(), "s7su");
        assert_eq!(checks.token_for_alias("Teen Quotes").await.unwrap(), "s7su");
        // backfilled by the first listing
        assert_eq!(checks.token_for_alias("Blog").await.unwrap(), "ab12");
    }

    #[tokio::test]
    async fn unknown_alias_lists_every_time() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/checks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(checks_listing()))
            .expect(2)
            .mount(&server)
            .await;

        let client = client_for(&server);
        for _ in 0..2 {
            let err = client
                .checks()
                .token_for_alias("nonexistent")
                .await
                .unwrap_err();
            assert!(err.is_token_not_found());
        }
    }

    #[tokio::test]
    async fn empty_alias_never_matches_unnamed_checks() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/checks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(checks_listing()))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let checks = client.checks();
        assert_eq!(checks.token_for_alias("Blog").await.unwrap(), "ab12");
        // the listing cached zz99 under ""
        assert!(client.cache().has(""));
        let err = checks.token_for_alias("").await.unwrap_err();
        assert!(err.is_token_not_found());
    }

    #[tokio::test]
    async fn empty_listing_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/checks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .checks()
            .token_for_alias("nonexistent")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::TokenNotFound));
    }

    #[tokio::test]
    async fn listing_failure_is_returned_unchanged() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/checks"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "Invalid API key"})))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.checks().token_for_alias("Blog").await.unwrap_err();
        assert_eq!(err.status().map(|s| s.as_u16()), Some(401));
        assert!(err.to_string().ends_with("401 Unauthorized"));
        assert!(!client.cache().has("Blog"));
    }

    #[tokio::test]
    async fn injected_cache_is_consulted_first() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/checks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(checks_listing()))
            .expect(0)
            .mount(&server)
            .await;

        let cache = std::sync::Arc::new(updown_lib::MemoryCache::new());
        updown_lib::Cache::put(cache.as_ref(), "Blog", "cached-token");
        let client = client_for(&server).with_cache(cache);
        assert_eq!(
            client.checks().token_for_alias("Blog").await.unwrap(),
            "cached-token"
        );
    }
}

mod services {
    use super::*;

    #[tokio::test]
    async fn update_and_remove_check() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/checks/s7su"))
            .and(body_json(json!({"url": "https://google.com"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"token": "s7su", "url": "https://google.com"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/checks/s7su"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"deleted": true})))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let updated = client
            .checks()
            .update("s7su", &CheckItem::new("https://google.com"))
            .await
            .unwrap();
        assert_eq!(updated.data.url, "https://google.com");
        let removed = client.checks().remove("s7su").await.unwrap();
        assert!(removed.data);
    }

    #[tokio::test]
    async fn downtimes_page_defaults_to_one() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/checks/s7su/downtimes"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"error": "500", "started_at": "2024-01-01T00:00:00Z", "ended_at": "2024-01-01T00:05:00Z", "duration": 300},
                {"error": "timeout", "started_at": "2024-01-02T00:00:00Z", "ended_at": null, "duration": null}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let res = client_for(&server).downtimes().list("s7su", 0).await.unwrap();
        assert_eq!(res.data.len(), 2);
        assert_eq!(res.data[0].duration, Some(300));
        assert!(res.data[1].ended_at.is_none());
    }

    #[tokio::test]
    async fn metrics_pass_group_and_bounds() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/checks/s7su/metrics"))
            .and(query_param("group", "host"))
            .and(query_param("from", "2024-01-01T00:00:00Z"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "gra": {"apdex": 0.98, "requests": {"samples": 10}},
                "sfo": {"apdex": 0.95, "requests": {"samples": 12}}
            })))
            .mount(&server)
            .await;

        let res = client_for(&server)
            .metrics()
            .list("s7su", MetricGroup::Host, Some("2024-01-01T00:00:00Z"), None)
            .await
            .unwrap();
        assert!(res.data.contains_key("gra"));
        assert_eq!(res.data["sfo"].requests.samples, 12);
    }

    #[tokio::test]
    async fn nodes_and_ip_lists() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/nodes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "lan": {"ip": "45.90.4.201", "city": "Lancaster", "country": "USA", "country_code": "US"}
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/nodes/ipv4"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(["45.90.4.201"])))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let nodes = client.nodes().list().await.unwrap();
        assert_eq!(nodes.data["lan"].city.as_deref(), Some("Lancaster"));
        let ips = client.nodes().list_ipv4().await.unwrap();
        assert_eq!(ips.data, vec!["45.90.4.201".to_string()]);
    }

    #[tokio::test]
    async fn recipients_add_list_remove() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/recipients"))
            .and(body_json(json!({"type": "email", "value": "ops@example.com", "immutable": false})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "rcp1", "type": "email", "name": "ops@example.com", "value": "ops@example.com"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/recipients"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "rcp1", "type": "email", "name": "ops@example.com", "immutable": true}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/recipients/rcp1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"deleted": true})))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let added = client
            .recipients()
            .add(&Recipient::new(RecipientType::Email, "ops@example.com"))
            .await
            .unwrap();
        assert_eq!(added.status(), 201);
        assert_eq!(added.data.id, "rcp1");

        let listed = client.recipients().list().await.unwrap();
        assert!(listed.data[0].immutable);

        assert!(client.recipients().remove("rcp1").await.unwrap().data);
    }

    #[tokio::test]
    async fn webhooks_add_and_remove() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/webhooks"))
            .and(body_json(json!({"url": "https://hooks.example.com/updown"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "wh1", "url": "https://hooks.example.com/updown"
            })))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/webhooks/wh1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"deleted": false})))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let hook = client
            .webhooks()
            .add(&Webhook {
                id: String::new(),
                url: "https://hooks.example.com/updown".into(),
            })
            .await
            .unwrap();
        assert_eq!(hook.data.id, "wh1");
        assert!(!client.webhooks().remove("wh1").await.unwrap().data);
    }
}
