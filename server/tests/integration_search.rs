use axum::body::{Body, Bytes};
use axum::http::{Request, StatusCode};
use axum::routing::get;
use axum::Router;
use http_body_util::BodyExt;
use lexcode_core::config::EngineConfig;
use serde_json::Value;
use std::fs;
use tempfile::tempdir;
use tower::ServiceExt;

const DATASET: &str = r#"article_id,article_num,date_deb,texte,path_title
A1,L3231-2,1209600000000,"<p>Le salaire minimum, le salaire de croissance.</p>","[""Partie législative"", ""Livre II""]"
A2,L3231-3,1209600000000,<p>Le salaire est versé.</p>,"[""Partie législative""]"
A3,L3141-1,not-a-date,<p>Les congés payés.</p>,"[""Partie législative""]"
A4,R3141-2,1209600000000,<p>La durée du repos.</p>,"[""Partie réglementaire""]"
A5,L3141-9,1209600000000,<p>Les dispositions de l'article L. 3141-9 sont applicables.</p>,"[""Partie législative""]"
"#;

fn build_tiny_app(dir: &std::path::Path) -> Router {
    let dataset = dir.join("code.csv");
    fs::write(&dataset, DATASET).unwrap();
    let config = EngineConfig {
        dataset_path: dataset,
        index_path: dir.join("index.bin"),
        ..EngineConfig::default()
    };
    lexcode_server::build_app(&config).unwrap()
}

async fn call(app: Router, uri: &str) -> (StatusCode, Bytes) {
    let req = Request::get(uri).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    (status, body)
}

#[tokio::test]
async fn search_returns_ranked_results() {
    let dir = tempdir().unwrap();
    let app = build_tiny_app(dir.path());
    assert!(dir.path().join("index.bin").is_file());

    let (status, body) = call(app, "/search?q=salaire&k=2").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["total_hits"].as_u64().unwrap(), 2);
    let arr = json["results"].as_array().unwrap();
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["article_id"], "A1");
    assert_eq!(arr[1]["article_id"], "A2");
    assert!(arr[0]["score"].as_f64().unwrap() > arr[1]["score"].as_f64().unwrap());
}

#[tokio::test]
async fn results_put_citation_hits_first() {
    let dir = tempdir().unwrap();
    let app = build_tiny_app(dir.path());

    let (status, body) = call(app, "/results/R3141-2").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["number"], 1);
    let first = &json["results"][0];
    assert_eq!(first["article_id"], "A4");
    assert_eq!(first["reference"], true);
    assert_eq!(first["date"], "1 mai 2008");
    assert_eq!(first["titles"][0], "Partie réglementaire");
    assert_eq!(first["paragraphs"][0], "La durée du repos.");
}

#[tokio::test]
async fn article_lookup_and_malformed_date() {
    let dir = tempdir().unwrap();
    let app = build_tiny_app(dir.path());

    let (status, body) = call(app.clone(), "/article/A3").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["article_num"], "L3141-1");
    assert!(json["date"].is_null());

    let (status, _) = call(app, "/article/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn self_citing_article_is_counted_once() {
    let dir = tempdir().unwrap();
    let app = build_tiny_app(dir.path());

    let (status, body) = call(app, "/results/L3141-9").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["number"], 1);
    let results = json["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["article_id"], "A5");
    assert_eq!(results[0]["reference"], true);
}

async fn allowed_origin(layer: tower_http::cors::CorsLayer, origin: &str) -> Option<String> {
    let app = Router::new().route("/health", get(|| async { "ok" })).layer(layer);
    let req = Request::get("/health").header("origin", origin).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    resp.headers()
        .get("access-control-allow-origin")
        .map(|v| v.to_str().unwrap().to_string())
}

#[tokio::test]
async fn cors_follows_configured_origins() {
    let listed = lexcode_server::cors_layer(Some("https://a.example, https://b.example"));
    assert_eq!(allowed_origin(listed, "https://b.example").await.as_deref(), Some("https://b.example"));

    let listed = lexcode_server::cors_layer(Some("https://a.example"));
    assert_eq!(allowed_origin(listed, "https://evil.example").await, None);

    let open = lexcode_server::cors_layer(None);
    assert_eq!(allowed_origin(open, "https://evil.example").await.as_deref(), Some("*"));

    let blank = lexcode_server::cors_layer(Some(" , "));
    assert_eq!(allowed_origin(blank, "https://evil.example").await.as_deref(), Some("*"));
}
