//! Integration tests for the pjv-dash API
//!
//! Covers the login gate, the filtered view and its KPIs, the CSV
//! export, the absence report, explicit cache reload, and the
//! missing-data condition.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use pjv_common::config::Config;
use pjv_common::model::{CaseRecord, CaseRow};
use pjv_common::{normalize, store};
use pjv_dash::{build_router, AppState};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot`

fn sample_rows() -> Vec<CaseRow> {
    let mut rows = vec![
        CaseRecord {
            case_number: Some("0001".into()),
            matter: Some("Execução Fiscal".into()),
            class: Some("Execução".into()),
            venue: Some("TJGO".into()),
            filing_date: Some("10/05/2023".into()),
            claim_value: Some("1.234,56".into()),
            opposing_party: Some("Estado de Goiás".into()),
        }
        .into_row(Some("111".into()), Some("2026-01-01T00:00:00".into())),
        CaseRecord {
            case_number: Some("0002".into()),
            matter: Some("Consumidor".into()),
            class: Some("Procedimento Comum".into()),
            venue: Some("TJSP".into()),
            filing_date: Some("01/02/2019".into()),
            claim_value: Some("100,00".into()),
            opposing_party: Some("Banco Alfa SA".into()),
        }
        .into_row(Some("222".into()), None),
        CaseRecord {
            case_number: Some("0003".into()),
            venue: Some("TJGO".into()),
            filing_date: Some("31/02/2024".into()),
            ..Default::default()
        }
        .into_row(Some("111".into()), None),
    ];
    normalize::normalize(&mut rows);
    rows
}

/// Test helper: write the two artifacts and build an app over them
fn setup_app() -> (TempDir, axum::Router, AppState) {
    let dir = tempfile::tempdir().unwrap();
    let table_path = dir.path().join("processos_consolidados.csv");
    let registry_path = dir.path().join("servico-busca-cpf.json");

    store::write_table(&table_path, &sample_rows()).unwrap();
    store::write_registry(
        &registry_path,
        &["111".to_string(), "222".to_string(), "333".to_string()],
    )
    .unwrap();

    let config = Config {
        table_path,
        registry_path,
        ..Config::default()
    };
    let state = AppState::new(config);
    (dir, build_router(state.clone()), state)
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("should read body");
    serde_json::from_slice(&bytes).expect("should parse JSON")
}

/// Test helper: perform a login and return the session cookie pair
async fn login(app: &axum::Router) -> String {
    let request = post_json(
        "/api/login",
        json!({"username": "admin", "password": "pedro2026"}),
        None,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login should set a cookie")
        .to_str()
        .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

// =============================================================================
// Health and authentication gate
// =============================================================================

#[tokio::test]
async fn health_requires_no_auth() {
    let (_dir, app, _) = setup_app();

    let response = app.oneshot(get("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "pjv-dash");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn data_routes_require_a_session() {
    let (_dir, app, _) = setup_app();

    for uri in ["/api/view", "/api/options", "/api/absence", "/api/export"] {
        let response = app.clone().oneshot(get(uri, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", uri);
    }
}

#[tokio::test]
async fn wrong_credentials_are_rejected() {
    let (_dir, app, _) = setup_app();

    let request = post_json(
        "/api/login",
        json!({"username": "admin", "password": "wrong"}),
        None,
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = extract_json(response.into_body()).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Incorrect username or password"));
}

#[tokio::test]
async fn logout_invalidates_the_session() {
    let (_dir, app, _) = setup_app();
    let cookie = login(&app).await;

    let response = app
        .clone()
        .oneshot(get("/api/view", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(post_json("/api/logout", json!({}), Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get("/api/view", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Options and defaults
// =============================================================================

#[tokio::test]
async fn options_list_values_and_defaults() {
    let (_dir, app, _) = setup_app();
    let cookie = login(&app).await;

    let response = app.oneshot(get("/api/options", Some(&cookie))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["venues"], json!(["TJGO", "TJSP"]));
    // Most recent year first; the bad-date row contributes no year
    assert_eq!(body["years"], json!(["2023", "2019"]));
    assert_eq!(body["default_venues"], json!(["TJGO"]));
    // 2019 is outside the recent-year window
    assert_eq!(body["default_years"], json!(["2023"]));
    assert_eq!(body["classes"], json!(["Execução", "Procedimento Comum"]));
}

// =============================================================================
// Filtered view
// =============================================================================

#[tokio::test]
async fn unfiltered_view_covers_the_whole_table() {
    let (_dir, app, _) = setup_app();
    let cookie = login(&app).await;

    let response = app.oneshot(get("/api/view", Some(&cookie))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["kpis"]["case_count"], 3);
    assert_eq!(body["kpis"]["distinct_subjects"], 2);
    assert_eq!(body["kpis"]["distinct_venues"], 2);
    let total = body["kpis"]["total_claim_value"].as_f64().unwrap();
    assert!((total - 1334.56).abs() < 1e-6);

    // Detail rows sorted by claim value descending
    let rows = body["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["valor_causa"].as_f64().unwrap(), 1234.56);
    assert_eq!(rows[2]["valor_causa"].as_f64().unwrap(), 0.0);
}

#[tokio::test]
async fn venue_filter_alone_keeps_all_years() {
    let (_dir, app, _) = setup_app();
    let cookie = login(&app).await;

    let response = app
        .oneshot(get("/api/view?venues=TJGO", Some(&cookie)))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;

    let rows = body["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    for row in rows {
        assert_eq!(row["tribunal"], "TJGO");
    }
    assert_eq!(body["venue_share"], json!([{"label": "TJGO", "count": 2}]));
}

#[tokio::test]
async fn substring_and_multi_filters_combine() {
    let (_dir, app, _) = setup_app();
    let cookie = login(&app).await;

    let response = app
        .oneshot(get(
            "/api/view?subject=11&venues=TJGO&matters=Execu%C3%A7%C3%A3o%20Fiscal",
            Some(&cookie),
        ))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    let rows = body["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["numero_processo"], "0001");
}

#[tokio::test]
async fn empty_filter_result_is_an_empty_state_not_an_error() {
    let (_dir, app, _) = setup_app();
    let cookie = login(&app).await;

    let response = app
        .oneshot(get("/api/view?subject=nope", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["kpis"]["case_count"], 0);
    assert_eq!(body["rows"], json!([]));
    assert_eq!(body["venue_share"], json!([]));
}

// =============================================================================
// Export
// =============================================================================

#[tokio::test]
async fn export_downloads_exactly_the_filtered_rows() {
    let (_dir, app, _) = setup_app();
    let cookie = login(&app).await;

    let response = app
        .oneshot(get("/api/export?venues=TJSP", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/csv"));
    assert!(response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .contains("dados_filtrados.csv"));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let content = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(content.starts_with("cpf_consulta,"));
    assert!(content.contains("TJSP"));
    assert!(!content.contains("TJGO"));
    // One header line plus one data line
    assert_eq!(content.lines().count(), 2);
}

// =============================================================================
// Absence report
// =============================================================================

#[tokio::test]
async fn absence_report_lists_both_complements() {
    let (_dir, app, _) = setup_app();
    let cookie = login(&app).await;

    let response = app.oneshot(get("/api/absence", Some(&cookie))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["searched_total"], 3);
    assert_eq!(body["preferred_venue"], "TJGO");
    assert_eq!(body["missing_overall"], json!(["333"]));
    // Subject 222 only has a TJSP case
    assert_eq!(body["missing_in_preferred"], json!(["222", "333"]));
}

// =============================================================================
// Cache reload and missing data
// =============================================================================

#[tokio::test]
async fn reload_picks_up_a_rewritten_table() {
    let (_dir, app, state) = setup_app();
    let cookie = login(&app).await;

    let response = app
        .clone()
        .oneshot(get("/api/view", Some(&cookie)))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["kpis"]["case_count"], 3);

    // Rewrite the table with a single row and invalidate explicitly
    let mut rows = sample_rows();
    rows.truncate(1);
    store::write_table(&state.config.table_path, &rows).unwrap();

    let response = app
        .clone()
        .oneshot(post_json("/api/reload", json!({}), Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get("/api/view", Some(&cookie)))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["kpis"]["case_count"], 1);
}

#[tokio::test]
async fn missing_table_reports_missing_data() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        table_path: dir.path().join("absent.csv"),
        registry_path: dir.path().join("absent.json"),
        ..Config::default()
    };
    let app = build_router(AppState::new(config));
    let cookie = login(&app).await;

    let response = app.oneshot(get("/api/view", Some(&cookie))).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = extract_json(response.into_body()).await;
    assert!(body["error"].as_str().unwrap().contains("pjv-report"));
}

#[tokio::test]
async fn missing_registry_only_breaks_the_absence_report() {
    let dir = tempfile::tempdir().unwrap();
    let table_path = dir.path().join("processos_consolidados.csv");
    store::write_table(&table_path, &sample_rows()).unwrap();

    let config = Config {
        table_path,
        registry_path: dir.path().join("absent.json"),
        ..Config::default()
    };
    let app = build_router(AppState::new(config));
    let cookie = login(&app).await;

    let response = app
        .clone()
        .oneshot(get("/api/view", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/api/absence", Some(&cookie))).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
