//! Integration tests for the REST API.
//! Boots a real server on a free port backed by a temp database and a
//! scripted model client, then drives it over HTTP.

use advisord::ai::client::{GenerateRequest, ModelClient, ModelError};
use advisord::config::AppConfig;
use advisord::storage::{seed::seed_demo_data, Storage};
use advisord::{rest, AppContext};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Replays a fixed list of replies, one per generate call.
enum Reply {
    Text(String),
    Outage,
}

struct ScriptedModel {
    replies: Mutex<VecDeque<Reply>>,
}

impl ScriptedModel {
    fn new(replies: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
        })
    }

    fn empty() -> Arc<Self> {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl ModelClient for ScriptedModel {
    async fn generate(&self, _req: &GenerateRequest) -> Result<String, ModelError> {
        match self.replies.lock().unwrap().pop_front() {
            Some(Reply::Text(text)) => Ok(text),
            Some(Reply::Outage) => Err(ModelError::Status {
                status: 503,
                detail: "scripted outage".into(),
            }),
            None => panic!("model called more often than scripted"),
        }
    }
}

/// Start a server on a random port and return its /api/v1 base URL.
async fn start_test_server(model: Arc<dyn ModelClient>) -> (String, Arc<AppContext>) {
    let data_dir = tempfile::tempdir().unwrap().keep();
    let config = Arc::new(AppConfig::new(
        None,
        Some(data_dir),
        Some("warn".to_string()),
        None,
    ));
    let storage = Arc::new(Storage::open(&config.data_dir).await.unwrap());
    let ctx = Arc::new(AppContext::new(config, storage, model));

    let router = rest::build_router(ctx.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });

    (format!("http://{addr}/api/v1"), ctx)
}

fn client_payload() -> Value {
    json!({
        "name": "Meridian Retail Group",
        "industry": "Retail",
        "contactName": "Dana Whitfield",
        "contactEmail": "dana@meridian.example",
        "country": "Germany",
        "status": "active",
    })
}

#[tokio::test]
async fn health_reports_ok_and_version() {
    let (base, _ctx) = start_test_server(ScriptedModel::empty()).await;
    let body: Value = reqwest::get(format!("{base}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn client_crud_over_http() {
    let (base, _ctx) = start_test_server(ScriptedModel::empty()).await;
    let http = reqwest::Client::new();

    // Create
    let created: Value = http
        .post(format!("{base}/clients"))
        .json(&client_payload())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["status"], "active");

    // List
    let listed: Value = http
        .get(format!("{base}/clients"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed["clients"].as_array().unwrap().len(), 1);

    // Update
    let mut payload = client_payload();
    payload["status"] = json!("archived");
    let updated: Value = http
        .put(format!("{base}/clients/{id}"))
        .json(&payload)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(updated["status"], "archived");

    // Delete, then 404
    let deleted = http
        .delete(format!("{base}/clients/{id}"))
        .send()
        .await
        .unwrap();
    assert!(deleted.status().is_success());
    let gone = http
        .get(format!("{base}/clients/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(gone.status().as_u16(), 404);
}

#[tokio::test]
async fn invalid_client_payload_is_a_422_with_details() {
    let (base, _ctx) = start_test_server(ScriptedModel::empty()).await;
    let mut payload = client_payload();
    payload["name"] = json!("   ");
    payload["contactEmail"] = json!("not-an-email");

    let resp = reqwest::Client::new()
        .post(format!("{base}/clients"))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 422);

    let body: Value = resp.json().await.unwrap();
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.contains("name is required"), "{detail}");
    assert!(detail.contains("contactEmail"), "{detail}");
}

#[tokio::test]
async fn error_headline_is_localized_by_accept_language() {
    let (base, _ctx) = start_test_server(ScriptedModel::empty()).await;
    let resp = reqwest::Client::new()
        .get(format!("{base}/clients/no-such-id"))
        .header("Accept-Language", "es-ES,es;q=0.9")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "No se encontró el registro solicitado");
}

#[tokio::test]
async fn project_caches_the_client_name_at_create_time() {
    let (base, _ctx) = start_test_server(ScriptedModel::empty()).await;
    let http = reqwest::Client::new();

    let client: Value = http
        .post(format!("{base}/clients"))
        .json(&client_payload())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let project: Value = http
        .post(format!("{base}/projects"))
        .json(&json!({
            "name": "Warehouse Automation Rollout",
            "clientId": client["id"],
            "startDate": "2026-05-01",
            "budgetUsd": 250000.0,
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(project["clientName"], "Meridian Retail Group");
    assert_eq!(project["status"], "draft");
}

#[tokio::test]
async fn invoice_resolves_tax_rate_and_rejects_dangling_reference() {
    let (base, _ctx) = start_test_server(ScriptedModel::empty()).await;
    let http = reqwest::Client::new();

    let rate: Value = http
        .post(format!("{base}/tax-rates"))
        .json(&json!({"name": "VAT (DE)", "country": "Germany", "ratePercent": 19.0}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let invoice: Value = http
        .post(format!("{base}/invoices"))
        .json(&json!({
            "number": "INV-2026-0001",
            "projectId": "p-1",
            "amountUsd": 1000.0,
            "taxRateId": rate["id"],
            "issuedOn": "2026-07-01",
            "dueOn": "2026-07-31",
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(invoice["taxUsd"], 190.0);
    assert_eq!(invoice["totalUsd"], 1190.0);

    let dangling = http
        .post(format!("{base}/invoices"))
        .json(&json!({
            "number": "INV-2026-0002",
            "projectId": "p-1",
            "amountUsd": 500.0,
            "taxRateId": "no-such-rate",
            "issuedOn": "2026-07-01",
            "dueOn": "2026-07-31",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(dangling.status().as_u16(), 422);
}

#[tokio::test]
async fn reports_reflect_the_seeded_dataset() {
    let (base, ctx) = start_test_server(ScriptedModel::empty()).await;
    seed_demo_data(&ctx.storage).await.unwrap();
    let http = reqwest::Client::new();

    let revenue: Value = http
        .get(format!("{base}/reports/revenue"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let invoiced = revenue["totalInvoicedUsd"].as_f64().unwrap();
    let paid = revenue["totalPaidUsd"].as_f64().unwrap();
    assert!(invoiced > paid, "{invoiced} vs {paid}");
    let collected = revenue["collectedPercent"].as_f64().unwrap();
    assert!((0.0..=100.0).contains(&collected));

    let budgets: Value = http
        .get(format!("{base}/reports/budget-utilization"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let lines = budgets["budgets"].as_array().unwrap();
    assert_eq!(lines.len(), 3);
    for line in lines {
        assert!(line["utilizationPercent"].as_f64().unwrap() >= 0.0);
    }

    let breakdown: Value = http
        .get(format!("{base}/reports/expenses"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let shares: f64 = breakdown["categories"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["sharePercent"].as_f64().unwrap())
        .sum();
    assert!((shares - 100.0).abs() < 0.1, "{shares}");
}

#[tokio::test]
async fn risk_flow_end_to_end_returns_score_or_error_never_both() {
    let (base, _ctx) = start_test_server(ScriptedModel::new(vec![Reply::Text(
        r#"{"riskScore": 78, "riskFactors": "New client, scarce staffing, high complexity."}"#
            .into(),
    )]))
    .await;

    let body: Value = reqwest::Client::new()
        .post(format!("{base}/ai/project-risk"))
        .json(&json!({
            "technicalComplexity": "high",
            "resourceNeeds": "scarce",
            "clientHistory": "new",
            "clientCountryPoliticalExposure": "stable",
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let score = body["riskScore"].as_i64().unwrap();
    assert!((0..=100).contains(&score));
    assert!(!body["riskFactors"].as_str().unwrap().is_empty());
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn risk_flow_outage_surfaces_as_502_error_payload() {
    let (base, _ctx) = start_test_server(ScriptedModel::new(vec![Reply::Outage])).await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/ai/project-risk"))
        .json(&json!({
            "technicalComplexity": "high",
            "resourceNeeds": "scarce",
            "clientHistory": "new",
            "clientCountryPoliticalExposure": "stable",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 502);

    let body: Value = resp.json().await.unwrap();
    assert!(!body["error"].as_str().unwrap().is_empty());
    assert!(body.get("riskScore").is_none());
}

#[tokio::test]
async fn insight_flow_end_to_end_enforces_the_output_shape() {
    let (base, _ctx) = start_test_server(ScriptedModel::new(vec![Reply::Text(
        r#"{"insight": "Margins concentrate in two accounts.",
            "recommendations": ["Renegotiate the Harbrook retainer", "Sunset fixed-fee work"],
            "confidence": 0.65, "topics": ["pricing", "portfolio"]}"#
            .into(),
    )]))
    .await;

    let body: Value = reqwest::Client::new()
        .post(format!("{base}/ai/business-insight"))
        .json(&json!({
            "businessContext": "Mid-size consultancy, margins shrinking for three quarters",
            "focusArea": "pricing",
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let recs = body["recommendations"].as_array().unwrap();
    assert!((2..=4).contains(&recs.len()));
    let confidence = body["confidence"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&confidence));
}
