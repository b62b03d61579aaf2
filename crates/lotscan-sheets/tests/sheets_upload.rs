//! Integration tests for `SheetsClient::upload` against mocked token and
//! Sheets endpoints.

use serde_json::{json, Value};
use wiremock::matchers::{body_string_contains, header, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use lotscan_core::VehicleRecord;
use lotscan_sheets::{SheetsClient, SheetsError};

const PRIVATE_PEM: &str = include_str!("fixtures/test_service_account_key.pem");
const SERVICE_EMAIL: &str = "uploader@lotscan-test.iam.gserviceaccount.com";
const SHEET: &str = "/v4/spreadsheets/sheet-123";

fn credentials(server: &MockServer) -> String {
    json!({
        "type": "service_account",
        "client_email": SERVICE_EMAIL,
        "private_key": PRIVATE_PEM,
        "private_key_id": "key-1",
        "token_uri": format!("{}/token", server.uri()),
    })
    .to_string()
}

fn test_client(server: &MockServer) -> SheetsClient {
    SheetsClient::with_base_url(
        &credentials(server),
        "sheet-123",
        "Vehicle Inventory",
        5,
        &format!("{}/v4/", server.uri()),
    )
    .expect("client construction should not fail")
}

fn record(stock: &str) -> VehicleRecord {
    let mut record = VehicleRecord::for_url(&format!("https://dealer.example/inventory/{stock}"));
    record.title = format!("2024 Toyota Camry LE {stock}");
    record.stock_number = stock.to_owned();
    record.price = "31500".to_owned();
    record
}

async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant-type%3Ajwt-bearer"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "test-token",
            "expires_in": 3600,
            "token_type": "Bearer",
        })))
        .mount(server)
        .await;
}

async fn mount_metadata(server: &MockServer, titles: &[(&str, i64)]) {
    let sheets: Vec<Value> = titles
        .iter()
        .map(|(title, id)| json!({ "properties": { "sheetId": id, "title": title } }))
        .collect();
    Mock::given(method("GET"))
        .and(path(SHEET))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "sheets": sheets })))
        .mount(server)
        .await;
}

async fn mount_ok(server: &MockServer, verb: &str, route: &str) {
    Mock::given(method(verb))
        .and(path_regex(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(server)
        .await;
}

async fn mount_verify(server: &MockServer, rows: usize) {
    let values: Vec<Value> = (0..rows).map(|i| json!([format!("row {i}")])).collect();
    Mock::given(method("GET"))
        .and(path_regex(r"/values/.*A:A$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "values": values })))
        .mount(server)
        .await;
}

/// Token, existing worksheet, clear, write, format and a verify read of `verify_rows`.
async fn mount_happy_path(server: &MockServer, verify_rows: usize) {
    mount_token(server).await;
    mount_metadata(server, &[("Vehicle Inventory", 7)]).await;
    mount_ok(server, "POST", r":clear$").await;
    mount_ok(server, "PUT", r"/values/").await;
    mount_ok(server, "POST", r":batchUpdate$").await;
    mount_verify(server, verify_rows).await;
}

async fn put_bodies(server: &MockServer) -> Vec<(String, Value)> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.method.as_str() == "PUT")
        .map(|r| {
            let body: Value = serde_json::from_slice(&r.body).expect("PUT body is JSON");
            (r.url.path().to_owned(), body)
        })
        .collect()
}

async fn batch_update_bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.url.path().ends_with(":batchUpdate"))
        .map(|r| serde_json::from_slice(&r.body).expect("batchUpdate body is JSON"))
        .collect()
}

#[tokio::test]
async fn upload_writes_header_then_rows_in_one_write() {
    let server = MockServer::start().await;
    mount_happy_path(&server, 3).await;

    let written = test_client(&server)
        .upload(&[record("C1001"), record("C1002")])
        .await
        .expect("upload should succeed");
    assert_eq!(written, 2);

    let puts = put_bodies(&server).await;
    assert_eq!(puts.len(), 1);
    let (put_path, body) = &puts[0];
    assert!(put_path.ends_with("!A1"), "unexpected range: {put_path}");

    let values = body["values"].as_array().expect("values array");
    assert_eq!(values.len(), 3);
    assert_eq!(values[0][0], "title");
    assert_eq!(values[0][20], "year");
    assert_eq!(values[1][1], "C1001");
    assert_eq!(values[2][1], "C1002");
    assert_eq!(values[1].as_array().map(Vec::len), Some(21));
}

#[tokio::test]
async fn write_uses_raw_value_input() {
    let server = MockServer::start().await;
    mount_happy_path(&server, 2).await;

    test_client(&server)
        .upload(&[record("C1001")])
        .await
        .expect("upload should succeed");

    let requests = server.received_requests().await.unwrap_or_default();
    let put = requests
        .iter()
        .find(|r| r.method.as_str() == "PUT")
        .expect("one PUT");
    assert!(put
        .url
        .query_pairs()
        .any(|(k, v)| k == "valueInputOption" && v == "RAW"));
}

#[tokio::test]
async fn header_row_is_formatted_on_existing_sheet() {
    let server = MockServer::start().await;
    mount_happy_path(&server, 2).await;

    test_client(&server)
        .upload(&[record("C1001")])
        .await
        .expect("upload should succeed");

    let updates = batch_update_bodies(&server).await;
    assert_eq!(updates.len(), 1, "only the formatting request");
    let repeat = &updates[0]["requests"][0]["repeatCell"];
    assert_eq!(repeat["range"]["sheetId"], 7);
    assert_eq!(repeat["range"]["endColumnIndex"], 21);
    let format = &repeat["cell"]["userEnteredFormat"];
    assert_eq!(format["textFormat"]["bold"], true);
    assert_eq!(format["horizontalAlignment"], "CENTER");
    assert_eq!(format["backgroundColor"]["blue"], 0.9);
}

#[tokio::test]
async fn missing_worksheet_is_created() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    mount_metadata(&server, &[("Sheet1", 0)]).await;
    mount_ok(&server, "POST", r":clear$").await;
    mount_ok(&server, "PUT", r"/values/").await;
    Mock::given(method("POST"))
        .and(path_regex(r":batchUpdate$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "replies": [{ "addSheet": { "properties": { "sheetId": 42, "title": "Vehicle Inventory" } } }]
        })))
        .mount(&server)
        .await;
    mount_verify(&server, 2).await;

    test_client(&server)
        .upload(&[record("C1001")])
        .await
        .expect("upload should succeed");

    let updates = batch_update_bodies(&server).await;
    let add = &updates[0]["requests"][0]["addSheet"]["properties"];
    assert_eq!(add["title"], "Vehicle Inventory");
    assert_eq!(add["gridProperties"]["rowCount"], 1000);
    assert_eq!(add["gridProperties"]["columnCount"], 21);
    assert_eq!(updates[1]["requests"][0]["repeatCell"]["range"]["sheetId"], 42);
}

#[tokio::test]
async fn large_uploads_are_written_in_batches() {
    let server = MockServer::start().await;
    mount_happy_path(&server, 1201).await;

    let records: Vec<VehicleRecord> = (0..1200).map(|i| record(&format!("S{i:04}"))).collect();
    let written = test_client(&server)
        .upload(&records)
        .await
        .expect("upload should succeed");
    assert_eq!(written, 1200);

    let puts = put_bodies(&server).await;
    let ranges: Vec<&str> = puts
        .iter()
        .map(|(p, _)| p.rsplit('!').next().unwrap_or_default())
        .collect();
    assert_eq!(ranges, vec!["A1", "A501", "A1001"]);
    let sizes: Vec<usize> = puts
        .iter()
        .map(|(_, b)| b["values"].as_array().map_or(0, Vec::len))
        .collect();
    assert_eq!(sizes, vec![500, 500, 201]);
}

#[tokio::test]
async fn formatting_failure_does_not_fail_upload() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    mount_metadata(&server, &[("Vehicle Inventory", 7)]).await;
    mount_ok(&server, "POST", r":clear$").await;
    mount_ok(&server, "PUT", r"/values/").await;
    Mock::given(method("POST"))
        .and(path_regex(r":batchUpdate$"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend error"))
        .mount(&server)
        .await;
    mount_verify(&server, 2).await;

    let client = test_client(&server);
    assert!(client.upload_vehicles(&[record("C1001")]).await);
}

#[tokio::test]
async fn forbidden_spreadsheet_is_permission_denied() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path(SHEET))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let result = client.upload(&[record("C1001")]).await;
    match result {
        Err(SheetsError::PermissionDenied { service_email }) => {
            assert_eq!(service_email, SERVICE_EMAIL);
        }
        other => panic!("expected PermissionDenied, got: {other:?}"),
    }
    assert!(!client.upload_vehicles(&[record("C1001")]).await);
}

#[tokio::test]
async fn short_read_back_fails_verification() {
    let server = MockServer::start().await;
    mount_happy_path(&server, 1).await;

    let result = test_client(&server).upload(&[record("C1001")]).await;
    assert!(
        matches!(
            result,
            Err(SheetsError::VerificationFailed { expected: 2, found: 1, .. })
        ),
        "got: {result:?}"
    );
}

#[tokio::test]
async fn rejected_assertion_is_token_exchange_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_string("invalid_grant"))
        .mount(&server)
        .await;

    let result = test_client(&server).upload(&[record("C1001")]).await;
    match result {
        Err(SheetsError::TokenExchange { status, message }) => {
            assert_eq!(status, 400);
            assert_eq!(message, "invalid_grant");
        }
        other => panic!("expected TokenExchange, got: {other:?}"),
    }
}
