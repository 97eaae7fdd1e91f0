//! Transport-agnostic router for the HTTP surface
//!
//! Every JSON reply carries a `success` flag; failures add an `error`
//! message and take their status from [`OutrightError::status_code`].

use log::{info, warn};
use serde::Serialize;
use serde_json::{json, Value};

use crate::cases::CaseStore;
use crate::config::AppConfig;
use crate::error::{OutrightError, Result};
use crate::export::{csv_bytes, render_workbook, workbook_available, NamedResults};
use crate::input::ComputeRequest;
use crate::simulation::MonthlySummary;

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const CSV_CONTENT_TYPE: &str = "text/csv";
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub const CORS_HEADERS: [(&str, &str); 3] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "GET, POST, OPTIONS"),
    ("Access-Control-Allow-Headers", "Content-Type"),
];

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
    /// Download file name, for attachments
    pub attachment: Option<String>,
}

impl ApiResponse {
    pub fn json<T: Serialize>(status: u16, value: &T) -> Self {
        let body = serde_json::to_vec(value).unwrap_or_else(|_| b"{}".to_vec());
        Self { status, content_type: JSON_CONTENT_TYPE, body, attachment: None }
    }

    pub fn error(err: &OutrightError) -> Self {
        Self::json(err.status_code(), &json!({"success": false, "error": err.to_string()}))
    }

    fn not_found() -> Self {
        Self::json(404, &json!({"success": false, "error": "Not found"}))
    }

    fn file(content_type: &'static str, body: Vec<u8>, name: String) -> Self {
        Self { status: 200, content_type, body, attachment: Some(name) }
    }

    pub fn is_json(&self) -> bool {
        self.content_type == JSON_CONTENT_TYPE
    }

    /// Parsed JSON body, if this is a JSON reply
    pub fn json_body(&self) -> Option<Value> {
        serde_json::from_slice(&self.body).ok()
    }
}

/// Application state shared by every request: configuration and the case store
#[derive(Debug)]
pub struct Api {
    config: AppConfig,
    store: CaseStore,
}

impl Api {
    /// Open the case store named by `config`
    pub fn new(config: AppConfig) -> Self {
        let store = CaseStore::open(config.cases_path.clone());
        Self::with_store(config, store)
    }

    pub fn with_store(config: AppConfig, store: CaseStore) -> Self {
        Self { config, store }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn store(&self) -> &CaseStore {
        &self.store
    }

    /// Dispatch one request
    pub fn handle(&self, method: &str, path: &str, body: &str) -> ApiResponse {
        if method.eq_ignore_ascii_case("OPTIONS") {
            return ApiResponse::json(200, &json!({}));
        }

        match self.route(method, path, body) {
            Ok(response) => response,
            Err(e) => {
                warn!("{} {} failed: {}", method, path, e);
                ApiResponse::error(&e)
            }
        }
    }

    fn route(&self, method: &str, path: &str, body: &str) -> Result<ApiResponse> {
        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
        let method = method.to_ascii_uppercase();

        match (method.as_str(), segments.as_slice()) {
            ("POST", ["api", "compute"]) => {
                let results = self.compute_value(&parse_body(body)?)?;
                Ok(ApiResponse::json(200, &json!({"success": true, "data": results})))
            }
            ("POST", ["api", "download-csv"]) => {
                let results = self.compute_value(&parse_body(body)?)?;
                Ok(ApiResponse::file(CSV_CONTENT_TYPE, csv_bytes(&results)?, self.config.export_file_name("csv")))
            }
            ("POST", ["api", "download-excel"]) => {
                if !workbook_available() {
                    return Err(OutrightError::WorkbookUnavailable);
                }
                let cases = self.workbook_cases(|| parse_body(body))?;
                let bytes = render_workbook(&cases)?;
                Ok(ApiResponse::file(XLSX_CONTENT_TYPE, bytes, self.config.export_file_name("xlsx")))
            }
            ("POST", ["api", "save-case"]) => {
                let payload = parse_body(body)?;
                let request = ComputeRequest::from_value(payload.clone())?;
                let results = request.to_input(&self.config)?.run();
                let case = self.store.append(request.name, payload, results)?;
                Ok(ApiResponse::json(200, &json!({"success": true, "case": case})))
            }
            ("POST", ["api", "update-case", id]) => {
                let Some(id) = parse_id(id) else { return Ok(ApiResponse::not_found()) };
                let payload = parse_body(body)?;
                let results = self.compute_value(&payload)?;
                let case = self.store.update(id, payload, results)?;
                Ok(ApiResponse::json(200, &json!({"success": true, "results": case.results})))
            }
            ("GET", ["api", "list-cases"]) => {
                Ok(ApiResponse::json(200, &json!({"success": true, "cases": self.store.list()})))
            }
            ("GET", ["api", "get-case", id]) => {
                let Some(id) = parse_id(id) else { return Ok(ApiResponse::not_found()) };
                let case = self.store.get(id)?;
                Ok(ApiResponse::json(200, &json!({"success": true, "case": case})))
            }
            ("POST", ["api", "delete-case", id]) => {
                let Some(id) = parse_id(id) else { return Ok(ApiResponse::not_found()) };
                self.store.delete(id)?;
                Ok(ApiResponse::json(200, &json!({"success": true})))
            }
            ("POST", ["api", "clear-cases"]) => {
                self.store.clear()?;
                Ok(ApiResponse::json(200, &json!({"success": true})))
            }
            _ => Ok(ApiResponse::not_found()),
        }
    }

    /// Run the simulation described by a raw request payload
    pub fn compute_value(&self, payload: &Value) -> Result<Vec<MonthlySummary>> {
        let request = ComputeRequest::from_value(payload.clone())?;
        let input = request.to_input(&self.config)?;
        info!(
            "Computing {} from base {:.4}% with {} events",
            input.year,
            input.base_rate_pct,
            input.events.len()
        );
        Ok(input.run())
    }

    /// Saved cases for a workbook, or the request as "Current" when none are saved.
    ///
    /// `payload` is only evaluated for the fallback.
    pub fn workbook_cases<F>(&self, payload: F) -> Result<Vec<NamedResults>>
    where
        F: FnOnce() -> Result<Value>,
    {
        let cases = self.store.named_results();
        if !cases.is_empty() {
            return Ok(cases);
        }
        Ok(vec![NamedResults::new("Current", self.compute_value(&payload()?)?)])
    }
}

fn parse_body(body: &str) -> Result<Value> {
    if body.trim().is_empty() {
        return Ok(json!({}));
    }
    Ok(serde_json::from_str(body)?)
}

fn parse_id(segment: &str) -> Option<usize> {
    segment.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_api() -> (tempfile::TempDir, Api) {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::default().with_cases_path(dir.path().join("cases.json"));
        (dir, Api::new(config))
    }

    fn body(response: &ApiResponse) -> Value {
        response.json_body().expect("json body")
    }

    #[test]
    fn test_compute_route() {
        let (_dir, api) = temp_api();
        let response = api.handle(
            "POST",
            "/api/compute",
            r#"{"effr": "5.25%", "meetings": {"2026-01-28": "-25bps"}}"#,
        );

        assert_eq!(response.status, 200);
        let json = body(&response);
        assert_eq!(json["success"], true);
        assert_eq!(json["data"].as_array().unwrap().len(), 12);
        assert_eq!(json["data"][0]["month"], "Jan 2026");
        assert_eq!(json["data"][0]["avg_rate"], 5.2258);
        assert_eq!(json["data"][1]["outright"], 95.0);
    }

    #[test]
    fn test_input_errors_are_400() {
        let (_dir, api) = temp_api();

        let bad_rate = api.handle("POST", "/api/compute", r#"{"effr": "abc"}"#);
        assert_eq!(bad_rate.status, 400);
        assert_eq!(body(&bad_rate)["error"], "Invalid numeric value: abc");

        let bad_json = api.handle("POST", "/api/compute", "{");
        assert_eq!(bad_json.status, 400);
        assert_eq!(body(&bad_json)["success"], false);
    }

    #[test]
    fn test_options_and_unknown_routes() {
        let (_dir, api) = temp_api();
        assert_eq!(api.handle("OPTIONS", "/api/compute", "").status, 200);
        assert_eq!(api.handle("GET", "/api/nope", "").status, 404);
        assert_eq!(api.handle("GET", "/api/get-case/abc", "").status, 404);
    }

    #[test]
    fn test_csv_download() {
        let (_dir, api) = temp_api();
        let response = api.handle("POST", "/api/download-csv", r#"{"effr": "5.25%"}"#);

        assert_eq!(response.status, 200);
        assert_eq!(response.content_type, CSV_CONTENT_TYPE);
        assert_eq!(response.attachment.as_deref(), Some("outrights_2026.csv"));
        let text = String::from_utf8(response.body).unwrap();
        assert!(text.starts_with("Month,Avg Rate (%),Outright"));
    }

    #[test]
    fn test_case_lifecycle() {
        let (_dir, api) = temp_api();

        let saved = api.handle("POST", "/api/save-case", r#"{"name": "Hold", "effr": "5%"}"#);
        assert_eq!(saved.status, 200);
        assert_eq!(body(&saved)["case"]["id"], 0);
        assert_eq!(body(&saved)["case"]["inputs"]["effr"], "5%");
        api.handle("POST", "/api/save-case", r#"{"name": "Cut", "effr": "4.75%"}"#);

        let listed = body(&api.handle("GET", "/api/list-cases", ""));
        assert_eq!(listed["cases"].as_array().unwrap().len(), 2);
        assert!(listed["cases"][0].get("results").is_none());

        let updated = api.handle("POST", "/api/update-case/1", r#"{"name": "Cut", "effr": "4.5%"}"#);
        assert_eq!(body(&updated)["results"][0]["avg_rate"], 4.5);

        let fetched = body(&api.handle("GET", "/api/get-case/1", ""));
        assert_eq!(fetched["case"]["name"], "Cut");
        assert!(fetched["case"]["updated"].is_string());

        assert_eq!(api.handle("POST", "/api/delete-case/0", "").status, 200);
        let after = body(&api.handle("GET", "/api/get-case/0", ""));
        assert_eq!(after["case"]["name"], "Cut");

        let missing = api.handle("POST", "/api/delete-case/9", "");
        assert_eq!(missing.status, 404);

        assert_eq!(api.handle("POST", "/api/clear-cases", "").status, 200);
        let cleared = body(&api.handle("GET", "/api/list-cases", ""));
        assert!(cleared["cases"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_workbook_falls_back_to_current_request() {
        let (_dir, api) = temp_api();
        let cases = api.workbook_cases(|| Ok(json!({"effr": "5%"}))).unwrap();
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].name, "Current");

        api.handle("POST", "/api/save-case", r#"{"name": "Saved", "effr": "4%"}"#);
        let cases = api.workbook_cases(|| Ok(json!({"effr": "5%"}))).unwrap();
        assert_eq!(cases[0].name, "Saved");
    }

    #[test]
    fn test_workbook_ignores_body_when_cases_are_saved() {
        let (_dir, api) = temp_api();
        assert!(api.workbook_cases(|| parse_body("{")).is_err());

        api.handle("POST", "/api/save-case", r#"{"name": "Saved", "effr": "4%"}"#);
        let cases = api.workbook_cases(|| parse_body("{")).unwrap();
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].name, "Saved");
    }

    #[cfg(not(feature = "xlsx"))]
    #[test]
    fn test_excel_download_without_feature_is_400() {
        let (_dir, api) = temp_api();
        let response = api.handle("POST", "/api/download-excel", "{}");
        assert_eq!(response.status, 400);
        assert_eq!(body(&response)["success"], false);
    }
}
