// File: storefront-api/tests/language_route.rs
// Purpose: Route tests for POST /store-api/language

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;
use storefront_api::sales_channel::generate_access_key;
use storefront_api::{router, AppState, Config, SalesChannel, SalesChannelDomain, SalesChannelRegistry};
use storefront_dal::defaults::LANGUAGE_SYSTEM;
use storefront_dal::{
    install_defaults, Context, Criteria, DataStore, DefinitionRegistry, EntityRepository, FieldSorting,
    IdCollection,
};
use tower::ServiceExt;

struct TestApp {
    app: Router,
    access_key: String,
    ids: IdCollection,
}

/// Two extra languages on the first and last locale, one language outside the
/// channel, and a channel with three languages and two domains
async fn create_test_app(config: Config) -> TestApp {
    let registry = Arc::new(DefinitionRegistry::with_defaults());
    let store = DataStore::new();
    install_defaults(registry.clone(), &store).await.unwrap();

    let mut ids = IdCollection::new();
    let ctx = Context::default_context();

    let locales = EntityRepository::for_entity("locale", registry.clone(), store.clone()).unwrap();
    let mut criteria = Criteria::new();
    criteria.add_sorting(FieldSorting::ascending("code"));
    let locale_ids = locales.search_ids(&criteria, &ctx).await.unwrap().ids;
    let first = locale_ids.first().unwrap();
    let last = locale_ids.last().unwrap();

    let languages = EntityRepository::for_entity("language", registry.clone(), store.clone()).unwrap();
    languages
        .create(
            vec![
                json!({"id": ids.create("language"), "name": "match", "localeId": first, "translationCodeId": first}),
                json!({"id": ids.create("language2"), "name": "match2", "localeId": last, "translationCodeId": last}),
                json!({"id": ids.create("hidden"), "name": "hidden", "localeId": first}),
            ],
            &ctx,
        )
        .await
        .unwrap();

    let access_key = generate_access_key();
    let channel = SalesChannel::new("Storefront", access_key.clone(), LANGUAGE_SYSTEM)
        .with_language(ids.get("language").unwrap())
        .with_domain(SalesChannelDomain::new("http://localhost", LANGUAGE_SYSTEM))
        .with_domain(SalesChannelDomain::new("http://localhost/second", ids.get("language2").unwrap()));
    let sales_channels = SalesChannelRegistry::new();
    sales_channels.register(channel).await;

    let state = AppState::new(config, registry, store, sales_channels).unwrap();
    TestApp {
        app: router(state),
        access_key,
        ids,
    }
}

async fn post(app: &Router, headers: &[(&str, &str)], body: Value) -> (StatusCode, Value) {
    let mut request = Request::builder()
        .method("POST")
        .uri("/store-api/language")
        .header("content-type", "application/json");
    for (name, value) in headers {
        request = request.header(*name, *value);
    }
    let request = request.body(Body::from(body.to_string())).unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn names(response: &Value) -> Vec<&str> {
    response["elements"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["name"].as_str())
        .collect()
}

#[tokio::test]
async fn test_load_all_channel_languages() {
    let test = create_test_app(Config::default()).await;
    let (status, response) = post(&test.app, &[("sw-access-key", test.access_key.as_str())], json!({})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["total"], json!(3));
    assert_eq!(response["apiAlias"], json!("language_route_response"));
    assert_eq!(response["aggregations"], json!({}));
    for element in response["elements"].as_array().unwrap() {
        assert_eq!(element["apiAlias"], json!("language"));
        assert_eq!(element["locale"], Value::Null);
    }
    assert!(!names(&response).contains(&"hidden"));
}

#[tokio::test]
async fn test_empty_body() {
    let test = create_test_app(Config::default()).await;
    let request = Request::builder()
        .method("POST")
        .uri("/store-api/language")
        .header("sw-access-key", test.access_key.as_str())
        .body(Body::empty())
        .unwrap();

    let response = test.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_includes() {
    let test = create_test_app(Config::default()).await;
    let (status, response) = post(
        &test.app,
        &[("sw-access-key", test.access_key.as_str())],
        json!({"includes": {"language": ["name"]}}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["total"], json!(3));
    for element in response["elements"].as_array().unwrap() {
        assert!(element["name"].is_string());
        assert!(element.get("id").is_none());
        assert!(element.get("locale").is_none());
    }
}

#[tokio::test]
async fn test_locale_association() {
    let test = create_test_app(Config::default()).await;
    let (status, response) = post(
        &test.app,
        &[("sw-access-key", test.access_key.as_str())],
        json!({"associations": {"locale": []}}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    for element in response["elements"].as_array().unwrap() {
        let locale_id = element["locale"]["id"].as_str().unwrap();
        assert!(!locale_id.is_empty());
        assert_eq!(element["locale"]["apiAlias"], json!("locale"));
    }
}

#[tokio::test]
async fn test_filter_sort_and_paginate_within_channel() {
    let test = create_test_app(Config::default()).await;
    let headers = [("sw-access-key", test.access_key.as_str())];

    let (_, response) = post(
        &test.app,
        &headers,
        json!({"filter": [{"type": "prefix", "field": "name", "value": "match"}], "sort": [{"field": "name", "order": "DESC"}]}),
    )
    .await;
    assert_eq!(names(&response), vec!["match2", "match"]);

    let (_, response) = post(
        &test.app,
        &headers,
        json!({"ids": [test.ids.get("hidden").unwrap()]}),
    )
    .await;
    assert_eq!(response["total"], json!(0));

    let (_, response) = post(
        &test.app,
        &headers,
        json!({"limit": 1, "page": 2, "sort": [{"field": "name"}]}),
    )
    .await;
    assert_eq!(response["total"], json!(3));
    assert_eq!(response["page"], json!(2));
    assert_eq!(response["limit"], json!(1));
    assert_eq!(names(&response), vec!["match"]);
}

#[tokio::test]
async fn test_missing_and_invalid_access_key() {
    let test = create_test_app(Config::default()).await;

    let (status, response) = post(&test.app, &[], json!({})).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(response["errors"][0]["code"], json!("API_MISSING_ACCESS_KEY"));

    let (status, response) = post(&test.app, &[("sw-access-key", "SWSCUNKNOWN")], json!({})).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(response["errors"][0]["code"], json!("API_INVALID_ACCESS_KEY"));
}

#[tokio::test]
async fn test_language_header() {
    let test = create_test_app(Config::default()).await;
    let language2 = test.ids.get("language2").unwrap();

    let (status, _) = post(
        &test.app,
        &[("sw-access-key", test.access_key.as_str()), ("sw-language-id", language2)],
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let hidden = test.ids.get("hidden").unwrap();
    let (status, response) = post(
        &test.app,
        &[("sw-access-key", test.access_key.as_str()), ("sw-language-id", hidden)],
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::PRECONDITION_FAILED);
    assert_eq!(
        response["errors"][0]["code"],
        json!("SALES_CHANNEL_LANGUAGE_NOT_AVAILABLE")
    );
}

#[tokio::test]
async fn test_invalid_criteria() {
    let mut config = Config::default();
    config.store_api.max_limit = Some(2);
    let test = create_test_app(config).await;
    let headers = [("sw-access-key", test.access_key.as_str())];

    let (status, response) = post(&test.app, &headers, json!({"limit": 5})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["errors"][0]["code"], json!("DAL__INVALID_LIMIT"));
    assert_eq!(response["errors"][0]["source"]["pointer"], json!("/limit"));

    let (status, response) = post(&test.app, &headers, json!({"associations": {"salesChannels": {}}})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["errors"][0]["code"], json!("DAL__ASSOCIATION_NOT_FOUND"));

    let (status, response) = post(&test.app, &headers, json!({"filter": [{"type": "equals", "field": "nope", "value": 1}]})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["errors"][0]["code"], json!("DAL__UNRESOLVABLE_FIELD"));

    let (status, response) = post(&test.app, &headers, json!({"page": 0})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["errors"][0]["code"], json!("DAL__INVALID_PAGE"));
    assert_eq!(response["errors"][0]["source"]["pointer"], json!("/page"));

    let request = Request::builder()
        .method("POST")
        .uri("/store-api/language")
        .header("sw-access-key", test.access_key.as_str())
        .body(Body::from("{\"limit\":"))
        .unwrap();
    let response = test.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_page_far_beyond_the_end() {
    let test = create_test_app(Config::default()).await;
    let (status, response) = post(
        &test.app,
        &[("sw-access-key", test.access_key.as_str())],
        json!({"page": 18446744073709551615u64, "limit": 2}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["total"], json!(3));
    assert_eq!(response["elements"], json!([]));
}
