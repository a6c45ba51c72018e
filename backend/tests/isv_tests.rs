//! Stale inventory (ISV) endpoint tests

mod common;

use axum::http::{header, Method, StatusCode};
use common::*;

// ============================================================================
// Query
// ============================================================================

#[tokio::test]
async fn test_query_defaults_to_three_days() {
    let (status, body) = get_json(app(), "/api/controle-isv").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["total"], 2);
    assert!(body.get("error").is_none());

    let descriptions: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["DESCRICAO"].as_str().unwrap())
        .collect();
    assert_eq!(descriptions, vec!["ARROZ 5KG", "FEIJAO 1KG"]);
}

#[tokio::test]
async fn test_query_joins_supplier_names() {
    let (_, body) = get_json(app(), "/controle-isv?search=beta&dias=0").await;
    assert_eq!(body["total"], 1);
    let row = &body["data"][0];
    assert_eq!(row["CODIGO"], "54321");
    assert_eq!(row["FORNECEDOR"], "BETA BEBIDAS");
    assert_eq!(row["ESTOQUE EMB9"], 2);
}

#[tokio::test]
async fn test_query_ignores_unparseable_days() {
    let (_, body) = get_json(app(), "/api/controle-isv?dias=muitos").await;
    assert_eq!(body["total"], 4);
}

// ============================================================================
// Export
// ============================================================================

#[tokio::test]
async fn test_export_is_delimited_attachment() {
    let (status, headers, body) = get(app(), "/controle-isv/export?dias=0").await;
    assert_eq!(status, StatusCode::OK);
    assert!(headers[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/csv"));
    let disposition = headers[header::CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.contains("controle_isv_"));

    let text = String::from_utf8(body).unwrap();
    assert_eq!(
        text.lines().next().unwrap(),
        "CODIGO;DESCRICAO;EMBALAGEM;FORNECEDOR;ESTOQUE EMB1;ESTOQUE EMB9;IDADE;DIAS S/VND"
    );
    assert_eq!(text.lines().count(), 5);
}

// ============================================================================
// Health and reload
// ============================================================================

#[tokio::test]
async fn test_health() {
    let (status, body) = get_json(app(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_reload_swaps_snapshots() {
    let app = app();

    let (status, _, body) = send(app.clone(), Method::POST, "/admin/reload").await;
    assert_eq!(status, StatusCode::OK);
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["isv_rows"], 0);

    // Unreadable snapshot files degrade to empty reports
    let (_, body) = get_json(app, "/api/controle-isv?dias=0").await;
    assert_eq!(body["success"], true);
    assert_eq!(body["total"], 0);
}
