//! Google Sheets v4 client that replaces a worksheet with vehicle rows.
//!
//! One upload is a fixed sequence: obtain a token, find or create the
//! worksheet, clear it, write header plus rows, format the header row, then
//! read column A back to confirm the rows landed.

use std::time::Duration;

use lotscan_core::{VehicleRecord, COLUMN_HEADERS};
use reqwest::{Client, Response, StatusCode, Url};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{fetch_access_token, SPREADSHEETS_SCOPE};
use crate::credentials::ServiceAccountKey;
use crate::error::SheetsError;

const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com/v4/";

const NEW_SHEET_ROWS: usize = 1000;

/// Uploads with more rows than this are written in batches.
const SINGLE_WRITE_MAX_ROWS: usize = 1000;
const BATCH_ROWS: usize = 500;

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    sheet_id: i64,
    title: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// Client for one spreadsheet and worksheet.
///
/// Use [`SheetsClient::new`] for production or [`SheetsClient::with_base_url`]
/// to point at a mock server in tests. The token endpoint always comes from
/// the service-account key's `token_uri`.
pub struct SheetsClient {
    client: Client,
    key: ServiceAccountKey,
    spreadsheet_id: String,
    worksheet_title: String,
    base_url: Url,
}

impl SheetsClient {
    /// # Errors
    ///
    /// Returns [`SheetsError::InvalidCredentials`] if the credential blob does
    /// not parse, or [`SheetsError::Http`] if the HTTP client cannot be built.
    pub fn new(
        credentials_json: &str,
        spreadsheet_id: &str,
        worksheet_title: &str,
        timeout_secs: u64,
    ) -> Result<Self, SheetsError> {
        Self::with_base_url(
            credentials_json,
            spreadsheet_id,
            worksheet_title,
            timeout_secs,
            DEFAULT_BASE_URL,
        )
    }

    /// Creates a client with a custom Sheets API base URL (for wiremock).
    ///
    /// # Errors
    ///
    /// Same as [`SheetsClient::new`], plus [`SheetsError::InvalidBaseUrl`].
    pub fn with_base_url(
        credentials_json: &str,
        spreadsheet_id: &str,
        worksheet_title: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, SheetsError> {
        let key = ServiceAccountKey::from_json(credentials_json)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("lotscan/0.1 (inventory-sync)")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| SheetsError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(SheetsError::InvalidBaseUrl {
                url: normalised,
                reason: "URL cannot be a base".to_owned(),
            });
        }

        Ok(Self {
            client,
            key,
            spreadsheet_id: spreadsheet_id.to_owned(),
            worksheet_title: worksheet_title.to_owned(),
            base_url,
        })
    }

    /// The identity that must be granted editor access to the spreadsheet.
    #[must_use]
    pub fn service_email(&self) -> &str {
        &self.key.client_email
    }

    /// Uploads `records` and reports only success or failure.
    ///
    /// Errors are logged with the service-account email so a permission
    /// problem can be fixed by sharing the sheet.
    pub async fn upload_vehicles(&self, records: &[VehicleRecord]) -> bool {
        match self.upload(records).await {
            Ok(written) => {
                tracing::info!(
                    records = written,
                    worksheet = %self.worksheet_title,
                    "uploaded vehicles to Google Sheets"
                );
                true
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    service_email = %self.key.client_email,
                    spreadsheet_id = %self.spreadsheet_id,
                    "Google Sheets upload failed"
                );
                false
            }
        }
    }

    /// Replaces the worksheet contents with a header row plus one row per
    /// record, returning the number of records written.
    ///
    /// # Errors
    ///
    /// - [`SheetsError::PermissionDenied`] on HTTP 403.
    /// - [`SheetsError::Api`] on any other non-2xx status.
    /// - [`SheetsError::VerificationFailed`] if the read-back comes up short.
    /// - Token, network and deserialization errors as they occur.
    pub async fn upload(&self, records: &[VehicleRecord]) -> Result<usize, SheetsError> {
        let token = fetch_access_token(&self.client, &self.key, SPREADSHEETS_SCOPE).await?;

        let sheet_id = self.ensure_worksheet(&token).await?;
        self.clear_worksheet(&token).await?;

        let mut rows: Vec<Vec<String>> = Vec::with_capacity(records.len() + 1);
        rows.push(COLUMN_HEADERS.iter().map(|h| (*h).to_owned()).collect());
        rows.extend(records.iter().map(VehicleRecord::to_row));
        self.write_rows(&token, &rows).await?;

        if let Err(e) = self.format_header(&token, sheet_id).await {
            tracing::warn!(error = %e, "header formatting failed; data was written");
        }

        self.verify_rows(&token, rows.len().min(2)).await?;
        Ok(records.len())
    }

    /// Returns the numeric id of the target worksheet, creating it if absent.
    async fn ensure_worksheet(&self, token: &str) -> Result<i64, SheetsError> {
        let mut url = self.endpoint(&["spreadsheets", &self.spreadsheet_id])?;
        url.query_pairs_mut()
            .append_pair("fields", "sheets.properties(sheetId,title)");
        let response = self.client.get(url).bearer_auth(token).send().await?;
        let meta: SpreadsheetMeta = self.json(response, "spreadsheet lookup").await?;

        if let Some(entry) = meta
            .sheets
            .into_iter()
            .find(|s| s.properties.title == self.worksheet_title)
        {
            return Ok(entry.properties.sheet_id);
        }

        tracing::info!(worksheet = %self.worksheet_title, "creating worksheet");
        let body = json!({
            "requests": [{
                "addSheet": {
                    "properties": {
                        "title": self.worksheet_title,
                        "gridProperties": {
                            "rowCount": NEW_SHEET_ROWS,
                            "columnCount": COLUMN_HEADERS.len(),
                        }
                    }
                }
            }]
        });
        let reply: Value = self.batch_update(token, &body, "add worksheet").await?;
        reply
            .pointer("/replies/0/addSheet/properties/sheetId")
            .and_then(Value::as_i64)
            .ok_or_else(|| SheetsError::Api {
                context: "add worksheet".to_owned(),
                status: StatusCode::OK.as_u16(),
                message: "reply did not include the new sheetId".to_owned(),
            })
    }

    async fn clear_worksheet(&self, token: &str) -> Result<(), SheetsError> {
        let range = format!("{}:clear", self.a1_range(&format!("A:{}", last_column())));
        let url = self.endpoint(&["spreadsheets", &self.spreadsheet_id, "values", &range])?;
        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(&json!({}))
            .send()
            .await?;
        self.check(response, "clear worksheet").await?;
        Ok(())
    }

    async fn write_rows(&self, token: &str, rows: &[Vec<String>]) -> Result<(), SheetsError> {
        if rows.len() <= SINGLE_WRITE_MAX_ROWS {
            return self.put_values(token, 1, rows).await;
        }
        for (i, batch) in rows.chunks(BATCH_ROWS).enumerate() {
            let start_row = i * BATCH_ROWS + 1;
            tracing::debug!(start_row, rows = batch.len(), "writing batch");
            self.put_values(token, start_row, batch).await?;
        }
        Ok(())
    }

    async fn put_values(
        &self,
        token: &str,
        start_row: usize,
        rows: &[Vec<String>],
    ) -> Result<(), SheetsError> {
        let range = self.a1_range(&format!("A{start_row}"));
        let mut url = self.endpoint(&["spreadsheets", &self.spreadsheet_id, "values", &range])?;
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");
        let response = self
            .client
            .put(url)
            .bearer_auth(token)
            .json(&json!({ "majorDimension": "ROWS", "values": rows }))
            .send()
            .await?;
        self.check(response, "write values").await?;
        Ok(())
    }

    async fn format_header(&self, token: &str, sheet_id: i64) -> Result<(), SheetsError> {
        let body = json!({
            "requests": [{
                "repeatCell": {
                    "range": {
                        "sheetId": sheet_id,
                        "startRowIndex": 0,
                        "endRowIndex": 1,
                        "startColumnIndex": 0,
                        "endColumnIndex": COLUMN_HEADERS.len(),
                    },
                    "cell": {
                        "userEnteredFormat": {
                            "textFormat": { "bold": true },
                            "backgroundColor": { "red": 0.2, "green": 0.6, "blue": 0.9 },
                            "horizontalAlignment": "CENTER",
                        }
                    },
                    "fields": "userEnteredFormat(textFormat,backgroundColor,horizontalAlignment)",
                }
            }]
        });
        let _: Value = self.batch_update(token, &body, "format header").await?;
        Ok(())
    }

    /// Reads column A back and fails if fewer than `expected` rows exist.
    async fn verify_rows(&self, token: &str, expected: usize) -> Result<(), SheetsError> {
        let range = self.a1_range("A:A");
        let url = self.endpoint(&["spreadsheets", &self.spreadsheet_id, "values", &range])?;
        let response = self.client.get(url).bearer_auth(token).send().await?;
        let landed: ValueRange = self.json(response, "verify upload").await?;

        let found = landed.values.len();
        if found < expected {
            return Err(SheetsError::VerificationFailed {
                expected,
                found,
                service_email: self.key.client_email.clone(),
            });
        }
        tracing::debug!(rows = found, "upload verified");
        Ok(())
    }

    async fn batch_update(
        &self,
        token: &str,
        body: &Value,
        context: &str,
    ) -> Result<Value, SheetsError> {
        let batch = format!("{}:batchUpdate", self.spreadsheet_id);
        let url = self.endpoint(&["spreadsheets", &batch])?;
        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;
        self.json(response, context).await
    }

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, SheetsError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| SheetsError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: "URL cannot be a base".to_owned(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// `'Sheet Title'!{cells}` with embedded quotes doubled.
    fn a1_range(&self, cells: &str) -> String {
        format!("'{}'!{cells}", self.worksheet_title.replace('\'', "''"))
    }

    /// Maps 403 to [`SheetsError::PermissionDenied`] and other non-2xx
    /// statuses to [`SheetsError::Api`].
    async fn check(&self, response: Response, context: &str) -> Result<Response, SheetsError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::FORBIDDEN {
            return Err(SheetsError::PermissionDenied {
                service_email: self.key.client_email.clone(),
            });
        }
        let message = response.text().await.unwrap_or_default();
        Err(SheetsError::Api {
            context: context.to_owned(),
            status: status.as_u16(),
            message,
        })
    }

    async fn json<T: serde::de::DeserializeOwned>(
        &self,
        response: Response,
        context: &str,
    ) -> Result<T, SheetsError> {
        let body = self.check(response, context).await?.text().await?;
        serde_json::from_str(&body).map_err(|e| SheetsError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}

/// Spreadsheet column letter for a 1-based column index (`1 -> A`, `27 -> AA`).
#[must_use]
pub fn column_letter(mut index: usize) -> String {
    let mut letters = Vec::new();
    while index > 0 {
        let rem = (index - 1) % 26;
        letters.push(char::from(b'A' + u8::try_from(rem).unwrap_or(0)));
        index = (index - 1) / 26;
    }
    letters.iter().rev().collect()
}

fn last_column() -> String {
    column_letter(COLUMN_HEADERS.len())
}
