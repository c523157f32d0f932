use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use engine::{Engine, SeedRng};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use server::{ServerState, router};
use tower::ServiceExt;

const DX: &str = "DX전략 Core Group";
const SERVICE: &str = "서비스혁신 Core";
const COMMUNICATION: &str = "통신비";
const FEES: &str = "지급수수료";

fn empty_app() -> Router {
    router(ServerState::new(Engine::builder().build().unwrap(), None))
}

fn seeded_app() -> Router {
    let engine = Engine::builder()
        .seed(2025)
        .seed_rng(SeedRng::new(11))
        .build()
        .unwrap();
    router(ServerState::new(engine, None))
}

/// Percent-encode a query value.
fn encode(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (b as char).to_string()
            }
            _ => format!("%{b:02X}"),
        })
        .collect()
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let (status, bytes) = send(app, method, uri, body).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn entry_body(department: &str, category: &str, month: i64, budget: f64, actual: f64) -> Value {
    json!({
        "department": department,
        "accountCategory": category,
        "month": month,
        "year": 2025,
        "budgetAmount": budget,
        "actualAmount": actual,
    })
}

fn fields(body: &Value) -> Vec<String> {
    body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn empty_store_lists_nothing() {
    let app = empty_app();
    let (status, body) = send_json(&app, "GET", "/budget", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn create_then_get() {
    let app = empty_app();
    let (status, created) = send_json(
        &app,
        "POST",
        "/budget",
        Some(entry_body(DX, COMMUNICATION, 3, 1000.0, 250.0)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["executionRate"], 25.0);
    let id = created["id"].as_str().unwrap();

    let (status, fetched) = send_json(&app, "GET", &format!("/budget/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn invalid_department_is_reported() {
    let app = empty_app();
    let (status, body) = send_json(
        &app,
        "POST",
        "/budget",
        Some(entry_body(COMMUNICATION, COMMUNICATION, 10, 1000.0, 800.0)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid budget entry data");
    assert_eq!(fields(&body), vec!["department"]);
}

#[tokio::test]
async fn every_bad_field_is_reported() {
    let app = empty_app();
    let (status, body) = send_json(
        &app,
        "POST",
        "/budget",
        Some(json!({
            "department": DX,
            "accountCategory": "식비",
            "month": 13,
            "budgetAmount": -1,
            "actualAmount": 0,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields = fields(&body);
    for field in ["accountCategory", "month", "year", "budgetAmount"] {
        assert!(fields.contains(&field.to_string()), "missing {field}");
    }
}

#[tokio::test]
async fn wrong_json_types_are_reported_per_field() {
    let app = empty_app();
    let mut body = entry_body(DX, FEES, 5, 1000.0, 0.0);
    body["month"] = json!("5");
    let (status, response) = send_json(&app, "POST", "/budget", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "Invalid budget entry data");
    assert_eq!(response["details"][0]["field"], "month");

    let mut body = entry_body(DX, FEES, 5, 1000.0, 0.0);
    body["budgetAmount"] = json!("lots");
    body["month"] = json!(13);
    let (status, response) = send_json(&app, "POST", "/budget", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(fields(&response), vec!["budgetAmount", "month"]);

    let (_, listed) = send_json(&app, "GET", "/budget", None).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn whole_floats_are_accepted() {
    let app = empty_app();
    let mut body = entry_body(DX, FEES, 5, 1000.0, 100.0);
    body["month"] = json!(5.0);
    body["year"] = json!(2025.0);
    let (status, created) = send_json(&app, "POST", "/budget", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["month"], 5);
    assert_eq!(created["year"], 2025);

    let mut body = entry_body(DX, FEES, 5, 1000.0, 100.0);
    body["month"] = json!(5.5);
    let (status, response) = send_json(&app, "POST", "/budget", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(fields(&response), vec!["month"]);
}

#[tokio::test]
async fn patch_with_wrong_type_keeps_entry() {
    let app = empty_app();
    let (_, created) = send_json(
        &app,
        "POST",
        "/budget",
        Some(entry_body(DX, FEES, 5, 1000.0, 100.0)),
    )
    .await;
    let uri = format!("/budget/{}", created["id"].as_str().unwrap());

    let (status, response) = send_json(
        &app,
        "PATCH",
        &uri,
        Some(json!({ "actualAmount": true, "month": 6 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(fields(&response), vec!["actualAmount"]);

    let (_, fetched) = send_json(&app, "GET", &uri, None).await;
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn non_object_body_is_bad_request() {
    let app = empty_app();
    let (status, body) = send_json(&app, "POST", "/budget", Some(json!([1, 2]))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Request body must be a JSON object");
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let app = empty_app();
    let request = Request::builder()
        .method("POST")
        .uri("/budget")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unsettled_month_zeroes_actual() {
    let app = empty_app();
    let (status, created) = send_json(
        &app,
        "POST",
        "/budget",
        Some(entry_body(SERVICE, COMMUNICATION, 10, 1000.0, 800.0)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["actualAmount"], 0.0);
    assert_eq!(created["executionRate"], 0.0);
}

#[tokio::test]
async fn patch_rederives_rate() {
    let app = empty_app();
    let (_, created) = send_json(
        &app,
        "POST",
        "/budget",
        Some(entry_body(DX, FEES, 5, 1000.0, 0.0)),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let (status, updated) = send_json(
        &app,
        "PATCH",
        &format!("/budget/{id}"),
        Some(json!({ "actualAmount": 500 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["executionRate"], 50.0);
    assert_eq!(updated["budgetAmount"], 1000.0);
    assert_eq!(updated["month"], 5);
}

#[tokio::test]
async fn unknown_ids_are_404() {
    let app = empty_app();
    let (status, body) = send_json(&app, "GET", "/budget/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Budget entry not found");

    let (status, _) = send_json(
        &app,
        "PATCH",
        "/budget/missing",
        Some(json!({ "actualAmount": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_json(&app, "DELETE", "/budget/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_then_gone() {
    let app = empty_app();
    let (_, created) = send_json(
        &app,
        "POST",
        "/budget",
        Some(entry_body(DX, FEES, 1, 10.0, 5.0)),
    )
    .await;
    let uri = format!("/budget/{}", created["id"].as_str().unwrap());

    let (status, body) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());

    let (status, _) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn filters_narrow_the_listing() {
    let app = seeded_app();
    let (_, all) = send_json(&app, "GET", "/budget", None).await;
    assert_eq!(all.as_array().unwrap().len(), 384);

    let uri = format!(
        "/budget?departments={}&departments={}",
        encode(DX),
        encode(SERVICE)
    );
    let (_, two) = send_json(&app, "GET", &uri, None).await;
    assert_eq!(two.as_array().unwrap().len(), 192);

    let uri = format!(
        "/budget?departments={}&startMonth=1&endMonth=6&accountCategories={}",
        encode(DX),
        encode(FEES)
    );
    let (_, narrow) = send_json(&app, "GET", &uri, None).await;
    let narrow = narrow.as_array().unwrap();
    assert_eq!(narrow.len(), 6);
    assert!(narrow.iter().all(|e| e["department"] == DX));
}

#[tokio::test]
async fn blank_filter_values_are_ignored() {
    let app = seeded_app();
    let (status, all) = send_json(&app, "GET", "/budget?year=&startMonth=", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 384);
}

#[tokio::test]
async fn repeated_single_filter_key_is_rejected() {
    let app = seeded_app();
    let (status, body) = send_json(&app, "GET", "/budget?startMonth=1&startMonth=2", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid budget entry data");
    assert_eq!(fields(&body), vec!["startMonth"]);
}

#[tokio::test]
async fn unknown_filter_label_is_rejected() {
    let app = seeded_app();
    let uri = format!("/budget?departments={}", encode("영업본부"));
    let (status, body) = send_json(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(fields(&body), vec!["departments"]);
}

#[tokio::test]
async fn summary_figures() {
    let app = empty_app();
    for body in [
        entry_body(DX, FEES, 3, 60.0, 30.0),
        entry_body(DX, FEES, 12, 40.0, 40.0),
    ] {
        send_json(&app, "POST", "/budget", Some(body)).await;
    }

    let (status, summary) = send_json(&app, "GET", "/budget/summary/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["totalBudget"], 100.0);
    assert_eq!(summary["settledBudget"], 60.0);
    assert_eq!(summary["totalActual"], 30.0);
    assert_eq!(summary["executionRate"], 50.0);
    assert_eq!(summary["projectedAnnual"], 40.0);
    assert_eq!(summary["remainingBudget"], 70.0);
    assert_eq!(summary["settlementMonth"], 9);
    assert_eq!(summary["trend"], "low");
    assert_eq!(summary["budgetStatus"], "within_budget");
}

#[tokio::test]
async fn filtered_summary() {
    let app = empty_app();
    for body in [
        entry_body(DX, FEES, 3, 60.0, 30.0),
        entry_body(SERVICE, FEES, 3, 100.0, 90.0),
    ] {
        send_json(&app, "POST", "/budget", Some(body)).await;
    }

    let uri = format!("/budget/summary/filtered?departments={}", encode(DX));
    let (status, dx) = send_json(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dx["totalBudget"], 60.0);
    assert_eq!(dx["totalActual"], 30.0);
    assert_eq!(dx["budgetStatus"], "within_budget");

    let uri = format!("/budget/summary/filtered?departments={}", encode(SERVICE));
    let (_, service) = send_json(&app, "GET", &uri, None).await;
    assert_eq!(service["totalBudget"], 100.0);
    assert_eq!(service["projectedAnnual"], 120.0);
    assert_eq!(service["budgetStatus"], "overrun_expected");

    // The headline endpoint ignores filter parameters.
    let uri = format!("/budget/summary/stats?departments={}", encode(DX));
    let (_, stats) = send_json(&app, "GET", &uri, None).await;
    assert_eq!(stats["totalBudget"], 160.0);

    let (status, body) =
        send_json(&app, "GET", "/budget/summary/filtered?endMonth=13", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(fields(&body), vec!["endMonth"]);
}

#[tokio::test]
async fn chart_series() {
    let app = seeded_app();

    let (status, departments) =
        send_json(&app, "GET", "/budget/summary/departments", None).await;
    assert_eq!(status, StatusCode::OK);
    let departments = departments.as_array().unwrap();
    assert_eq!(departments.len(), 4);
    assert_eq!(departments[0]["department"], DX);

    let uri = format!("/budget/summary/categories?departments={}", encode(DX));
    let (_, categories) = send_json(&app, "GET", &uri, None).await;
    assert_eq!(categories.as_array().unwrap().len(), 8);

    let (_, monthly) = send_json(&app, "GET", "/budget/summary/monthly", None).await;
    let monthly = monthly.as_array().unwrap();
    assert_eq!(monthly.len(), 12);
    assert!(monthly[8]["executionRate"].is_number());
    assert!(monthly[9]["executionRate"].is_null());
    assert_eq!(monthly[9]["isProjected"], true);
    assert_eq!(monthly[11]["targetRate"], 100.0);
}

#[tokio::test]
async fn labels_are_listed_in_order() {
    let app = empty_app();
    let (_, labels) = send_json(&app, "GET", "/budget/labels", None).await;
    assert_eq!(labels["departments"].as_array().unwrap().len(), 4);
    assert_eq!(labels["departments"][0], DX);
    assert_eq!(labels["accountCategories"].as_array().unwrap().len(), 8);
}

#[tokio::test]
async fn json_export_envelope() {
    let app = seeded_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/budget/export/json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("budget_data_"));
    assert!(disposition.ends_with(".json\""));

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 384);
    assert_eq!(body["settlementMonth"], 9);
    assert!(body["exportDate"].is_string());
    assert_eq!(body["departments"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn csv_exports() {
    let app = seeded_app();
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/budget/export/csv")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/csv; charset=utf-8"
    );
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.starts_with('\u{feff}'));
    assert_eq!(text.lines().count(), 385);

    let uri = format!("/budget/export/filtered/csv?departments={}", encode(DX));
    let (status, bytes) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let text = String::from_utf8(bytes).unwrap();
    assert_eq!(text.lines().count(), 97);
    assert!(!text.lines().next().unwrap().contains("ID"));

    let (status, bytes) = send(&app, "GET", "/budget/template/csv", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8(bytes).unwrap().lines().count(), 3);
}

#[tokio::test]
async fn github_requires_repository_name() {
    let app = empty_app();
    let (status, body) = send_json(
        &app,
        "POST",
        "/github/repos",
        Some(json!({ "name": "  " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Repository name is required");
}

#[tokio::test]
async fn github_without_token_is_bad_gateway() {
    let app = empty_app();
    let (status, body) = send_json(&app, "GET", "/github/user", None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["message"], "GitHub integration is not configured");

    let (status, _) = send_json(&app, "GET", "/github/repos", None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}
