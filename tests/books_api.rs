use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use shelf_kernel::{InitCtx, Settings};
use tower::ServiceExt;

async fn app() -> Router {
    let settings = Settings::default();
    let registry = shelf_app::bootstrap::registry().unwrap();
    registry
        .init_all(&InitCtx {
            settings: &settings,
        })
        .await
        .unwrap();
    shelf_http::build_router(&registry, &settings)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

fn book(title: &str, rating: i64, published_date: i64) -> Value {
    json!({
        "title": title,
        "author": "Herbert",
        "description": "Classic sci-fi",
        "rating": rating,
        "publishedDate": published_date
    })
}

#[tokio::test]
async fn dune_scenario_over_http() {
    let app = app().await;

    let (status, body) = send(&app, Method::POST, "/api/books", Some(book("Dune", 5, 1965))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "validation_error");
    assert_eq!(body["error"]["details"][0]["field"], "publishedDate");
    assert_eq!(body["error"]["details"][0]["value"], 1965);

    let (status, body) = send(&app, Method::POST, "/api/books", Some(book("Dune", 5, 2000))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 1);
    assert_eq!(body["publishedDate"], 2000);

    let (_, body) = send(&app, Method::POST, "/api/books", Some(book("Foundation", 4, 2001))).await;
    assert_eq!(body["id"], 2);

    let (status, body) = send(&app, Method::DELETE, "/api/books/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (_, body) = send(&app, Method::POST, "/api/books", Some(book("Hyperion", 4, 2002))).await;
    assert_eq!(body["id"], 3);

    let (status, body) = send(&app, Method::GET, "/api/books", None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<_> = body.as_array().unwrap().iter().map(|b| b["id"].clone()).collect();
    assert_eq!(ids, vec![json!(2), json!(3)]);
}

#[tokio::test]
async fn every_violation_is_reported() {
    let app = app().await;

    let (status, body) = send(&app, Method::POST, "/api/books", Some(json!({}))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let fields: Vec<_> = body["error"]["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|detail| detail["field"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(fields, ["title", "author", "description", "rating", "publishedDate"]);

    let (_, body) = send(&app, Method::GET, "/api/books", None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn get_unknown_book_is_not_found() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/api/books/41", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");
    assert_eq!(body["error"]["message"], "book 41 not found");
}

#[tokio::test]
async fn negative_ids_are_ignored_on_create_and_unknown_on_lookup() {
    let app = app().await;

    let mut dune = book("Dune", 5, 2000);
    dune["id"] = json!(-7);
    let (status, body) = send(&app, Method::POST, "/api/books", Some(dune)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 1);

    for method in [Method::GET, Method::DELETE] {
        let (status, body) = send(&app, method, "/api/books/-1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "not_found");
        assert_eq!(body["error"]["message"], "book -1 not found");
    }

    let (status, _) = send(&app, Method::PUT, "/api/books/-1", Some(book("Dune", 5, 2000))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, Method::GET, "/api/books", None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn get_returns_created_book() {
    let app = app().await;
    let (_, created) = send(&app, Method::POST, "/api/books", Some(book("Dune", 5, 2000))).await;

    let (status, fetched) = send(&app, Method::GET, "/api/books/1", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn listing_filters_by_rating_and_title() {
    let app = app().await;
    for (title, rating) in [("Dune", 5), ("Ubik", 3), ("Solaris", 5)] {
        send(&app, Method::POST, "/api/books", Some(book(title, rating, 2010))).await;
    }

    let (status, body) = send(&app, Method::GET, "/api/books?rating=5", None).await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<_> = body.as_array().unwrap().iter().map(|b| b["title"].clone()).collect();
    assert_eq!(titles, vec![json!("Dune"), json!("Solaris")]);

    let (_, body) = send(&app, Method::GET, "/api/books?rating=9", None).await;
    assert_eq!(body, json!([]));

    let (_, body) = send(&app, Method::GET, "/api/books?title=UBIK", None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"], 2);

    let (_, body) = send(&app, Method::GET, "/api/books?title=ubik&rating=5", None).await;
    assert_eq!(body, json!([]));

    let (status, body) = send(&app, Method::GET, "/api/books?rating=high", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn update_replaces_book() {
    let app = app().await;
    send(&app, Method::POST, "/api/books", Some(book("Dune", 5, 2000))).await;

    let messiah = book("Dune Messiah", 3, 2001);
    let (status, body) = send(&app, Method::PUT, "/api/books/1", Some(messiah)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);
    assert_eq!(body["title"], "Dune Messiah");
    assert_eq!(body["rating"], 3);

    let (_, body) = send(&app, Method::GET, "/api/books", None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn update_failures_leave_catalog_untouched() {
    let app = app().await;
    let (_, original) = send(&app, Method::POST, "/api/books", Some(book("Dune", 5, 2000))).await;

    let (status, body) = send(&app, Method::PUT, "/api/books/9", Some(book("Dune", 5, 2000))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "book 9 not found");

    let (status, body) = send(&app, Method::PUT, "/api/books/9", Some(book("Du", 5, 2000))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["details"][0]["field"], "title");

    let mut mismatched = book("Dune", 4, 2000);
    mismatched["id"] = json!(2);
    let (status, _) = send(&app, Method::PUT, "/api/books/1", Some(mismatched)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, current) = send(&app, Method::GET, "/api/books/1", None).await;
    assert_eq!(current, original);
}

#[tokio::test]
async fn delete_unknown_book_is_not_found() {
    let app = app().await;

    let (status, body) = send(&app, Method::DELETE, "/api/books/5", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn malformed_requests_use_error_envelope() {
    let app = app().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/books")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"title\": "))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, Method::GET, "/api/books/not-a-number", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn health_and_docs_are_served() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/healthz", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("ok"));

    let (status, body) = send(&app, Method::GET, "/api/books/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("books module is healthy"));

    let (status, body) = send(&app, Method::GET, "/docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/books/{id}"]["put"].is_object());
    assert!(body["paths"]["/api/books"]["post"].is_object());
}

#[tokio::test]
async fn responses_carry_request_id() {
    let app = app().await;

    let request = Request::builder()
        .uri("/api/books")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert!(response.headers().contains_key("x-request-id"));
}
