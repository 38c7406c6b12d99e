//! Content-type resolution and body views.

use axum::http::header;
use axum::response::Response;
use axum::Json;
use mock_ws::RouteTable;
use serde::Deserialize;
use serde_json::json;

mod common;

#[derive(Debug, Deserialize, PartialEq)]
struct User {
    id: u32,
    name: String,
}

fn table() -> RouteTable {
    RouteTable::builder()
        .route("GET", "/text", |_req| async { "plain text" })
        .route("GET", "/json", |_req| async { Json(json!({"id": 1, "name": "ada"})) })
        .route("GET", "/custom", |_req| async {
            ([(header::CONTENT_TYPE, "hello/world")], "custom body")
        })
        .route("GET", "/xml", |_req| async {
            ([(header::CONTENT_TYPE, "application/xml")], "<user id=\"1\">ada</user>")
        })
        .route("GET", "/untyped", |_req| async {
            Response::new(axum::body::Body::from(r#"{"id": 2, "name": "bob"}"#))
        })
        .build()
}

#[tokio::test]
async fn test_default_text_content_type() {
    let client = common::client(table());
    let res = client.url("/text").get().await.unwrap();
    assert_eq!(res.content_type(), "text/plain; charset=utf-8");
    assert_eq!(res.text(), "plain text");
    client.close();
}

#[tokio::test]
async fn test_default_json_content_type() {
    let client = common::client(table());
    let res = client.url("/json").get().await.unwrap();
    assert_eq!(res.content_type(), "application/json");
    assert_eq!(res.json::<User>().unwrap(), User { id: 1, name: "ada".into() });
    client.close();
}

#[tokio::test]
async fn test_explicit_content_type_preserved() {
    let client = common::client(table());
    let res = client.url("/custom").get().await.unwrap();
    assert_eq!(res.content_type(), "hello/world");
    assert_eq!(res.header("Content-Type"), Some("hello/world"));
    assert_eq!(res.text(), "custom body");
    client.close();
}

#[tokio::test]
async fn test_xml_body_handed_through() {
    let client = common::client(table());
    let res = client.url("/xml").get().await.unwrap();
    assert_eq!(res.content_type(), "application/xml");
    assert_eq!(res.xml(), "<user id=\"1\">ada</user>");
    client.close();
}

#[tokio::test]
async fn test_untyped_body_is_inferred() {
    let client = common::client(table());
    let res = client.url("/untyped").get().await.unwrap();
    assert!(res.header("content-type").is_none());
    assert_eq!(res.content_type(), "application/json");
    assert_eq!(res.json::<User>().unwrap().name, "bob");
    client.close();
}
