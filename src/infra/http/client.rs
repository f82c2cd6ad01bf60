//! REST backend.
//!
//! List responses come either wrapped as
//! `{"result": {"content": [..], "totalElements": n, "size": .., "number": ..}}`
//! or bare as `{"content": [..], "totalElements": n}`. Single records may be
//! wrapped in `result` as well.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::StatusCode;
use serde_json::{json, Value};

use crate::domain::entities::record::{value_as_i64, RecordId, RowData};
use crate::domain::entities::resource::Resource;
use crate::usecase::ports::api::{AdminApi, ApiError, ListPage, ListRequest};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct HttpApi {
    base_url: String,
    token: Option<String>,
    client: Client,
}

impl HttpApi {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| ApiError::Network(format!("failed to create HTTP client: {err}")))?;
        Ok(Self::with_client(base_url, token, client))
    }

    pub fn with_client(base_url: &str, token: Option<String>, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|token| !token.trim().is_empty()),
            client,
        }
    }

    pub fn resource_url(&self, resource: Resource) -> String {
        format!("{}/{}", self.base_url, resource.path())
    }

    pub fn record_url(&self, resource: Resource, id: RecordId) -> String {
        format!("{}/{}/{id}", self.base_url, resource.path())
    }

    fn send(&self, request: RequestBuilder) -> Result<Value, ApiError> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let response = request
            .send()
            .map_err(|err| ApiError::Network(err.to_string()))?;
        read_body(response)
    }
}

fn read_body(response: Response) -> Result<Value, ApiError> {
    let status = response.status();
    let text = response
        .text()
        .map_err(|err| ApiError::Network(err.to_string()))?;
    if !status.is_success() {
        tracing::debug!(%status, body = %text, "request rejected");
        return Err(status_error(status, &text));
    }
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&text).map_err(|err| ApiError::Decode(err.to_string()))
}

/// Prefers the server's `message` (top level or under `error`).
pub fn status_error(status: StatusCode, body: &str) -> ApiError {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let message = parsed
        .as_ref()
        .and_then(|value| {
            value
                .get("message")
                .or_else(|| value.get("error").and_then(|error| error.get("message")))
        })
        .and_then(Value::as_str)
        .filter(|message| !message.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| match status.canonical_reason() {
            Some(reason) => format!("{} {reason}", status.as_u16()),
            None => format!("HTTP {}", status.as_u16()),
        });
    ApiError::Status {
        code: status.as_u16(),
        message,
    }
}

fn unwrap_result(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.contains_key("result") => {
            map.remove("result").unwrap_or(Value::Null)
        }
        other => other,
    }
}

pub fn parse_list_page(body: Value) -> Result<ListPage, ApiError> {
    let page = unwrap_result(body);
    let content = match page.get("content") {
        Some(Value::Array(items)) => items.clone(),
        _ => return Err(ApiError::Decode("missing \"content\" array".to_string())),
    };
    let rows = content
        .into_iter()
        .map(|item| {
            RowData::from_json(item)
                .ok_or_else(|| ApiError::Decode("list item without an id".to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let total_count = page
        .get("totalElements")
        .and_then(value_as_i64)
        .map(|total| total.max(0) as u64)
        .unwrap_or(rows.len() as u64);
    Ok(ListPage { rows, total_count })
}

pub fn parse_row(body: Value) -> Result<RowData, ApiError> {
    RowData::from_json(unwrap_result(body))
        .ok_or_else(|| ApiError::Decode("record without an id".to_string()))
}

impl AdminApi for HttpApi {
    fn list(&self, resource: Resource, request: &ListRequest) -> Result<ListPage, ApiError> {
        let url = self.resource_url(resource);
        tracing::debug!(%url, page = request.page, limit = request.limit, "GET list");
        let body = self.send(self.client.get(url).query(&request.query_pairs()))?;
        parse_list_page(body)
    }

    fn get(&self, resource: Resource, id: RecordId) -> Result<RowData, ApiError> {
        match self.send(self.client.get(self.record_url(resource, id))) {
            Err(ApiError::Status { code: 404, .. }) => Err(ApiError::NotFound { resource, id }),
            other => parse_row(other?),
        }
    }

    fn create(&self, resource: Resource, payload: Value) -> Result<RowData, ApiError> {
        let body = self.send(self.client.post(self.resource_url(resource)).json(&payload))?;
        parse_row(body)
    }

    fn update(&self, resource: Resource, id: RecordId, payload: Value) -> Result<RowData, ApiError> {
        let body = self.send(self.client.put(self.record_url(resource, id)).json(&payload))?;
        parse_row(body)
    }

    fn delete(&self, resource: Resource, id: RecordId) -> Result<(), ApiError> {
        self.send(self.client.delete(self.record_url(resource, id)))?;
        Ok(())
    }

    fn bulk_delete(&self, resource: Resource, ids: &[RecordId]) -> Result<(), ApiError> {
        let url = format!("{}/bulk-delete", self.resource_url(resource));
        let ids: Vec<i64> = ids.iter().map(|id| id.0).collect();
        self.send(self.client.post(url).json(&json!({ "ids": ids })))?;
        Ok(())
    }

    fn toggle_status(&self, resource: Resource, id: RecordId) -> Result<RowData, ApiError> {
        let url = format!("{}/toggle-status", self.record_url(resource, id));
        let body = self.send(self.client.patch(url))?;
        parse_row(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn enveloped_page_is_unwrapped() {
        let body = json!({
            "result": {
                "content": [{"id": 1, "code": "USER_VIEW"}, {"id": "2", "code": "USER_EDIT"}],
                "totalElements": 42,
                "size": 2,
                "number": 0
            }
        });
        let page = parse_list_page(body).expect("page");
        assert_eq!(page.total_count, 42);
        assert_eq!(page.rows[1].id, RecordId(2));
    }

    #[test]
    fn bare_page_without_total_counts_rows() {
        let page = parse_list_page(json!({"content": [{"id": 7}]})).expect("page");
        assert_eq!(page.total_count, 1);
    }

    #[rstest]
    #[case(json!({"items": []}))]
    #[case(json!({"content": [{"name": "no id"}]}))]
    fn malformed_pages_are_decode_errors(#[case] body: Value) {
        assert!(matches!(parse_list_page(body), Err(ApiError::Decode(_))));
    }

    #[test]
    fn single_record_may_be_wrapped() {
        let row = parse_row(json!({"result": {"id": 3, "name": "ADMIN"}})).expect("row");
        assert_eq!(row.text("name"), "ADMIN");
    }

    #[rstest]
    #[case(r#"{"message":"Role is assigned to users"}"#, "Role is assigned to users")]
    #[case(r#"{"error":{"message":"Code already exists"}}"#, "Code already exists")]
    #[case("<html>oops</html>", "409 Conflict")]
    fn status_errors_prefer_server_message(#[case] body: &str, #[case] expected: &str) {
        assert_eq!(
            status_error(StatusCode::CONFLICT, body),
            ApiError::Status {
                code: 409,
                message: expected.to_string()
            }
        );
    }

    #[test]
    fn urls_ignore_trailing_slash() {
        let api = HttpApi::with_client("http://localhost:8080/api/", None, Client::new());
        assert_eq!(
            api.record_url(Resource::QuestionGroups, RecordId(5)),
            "http://localhost:8080/api/question-groups/5"
        );
    }
}
