//! Remote row stored in a Supabase table, reached through its PostgREST API.
//!
//! The table needs `id text primary key`, `data jsonb` and
//! `updated_at timestamptz` columns.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use serde_json::{json, Value};

use super::{RemoteError, RemoteStore};
use crate::config::SupabaseSettings;
use crate::domain::dates::now_utc_rfc3339;

pub struct SupabaseRemote {
    client: Client,
    base_url: String,
    anon_key: String,
    table: String,
    record_id: String,
}

impl SupabaseRemote {
    pub fn new(settings: &SupabaseSettings) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: settings.url.trim_end_matches('/').to_string(),
            anon_key: settings.anon_key.clone(),
            table: settings.table.clone(),
            record_id: settings.record_id.clone(),
        })
    }

    fn table_url(&self) -> String {
        table_url(&self.base_url, &self.table)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", self.anon_key))
    }
}

impl RemoteStore for SupabaseRemote {
    fn read(&self) -> Result<Option<Value>, RemoteError> {
        let filter = format!("eq.{}", self.record_id);
        let response = self
            .authorized(self.client.get(self.table_url()))
            .query(&[("id", filter.as_str()), ("select", "data")])
            .send()?;
        let body = checked_body(response)?;
        decode_row(&body)
    }

    fn write(&self, document: &Value) -> Result<(), RemoteError> {
        let row = json!({
            "id": self.record_id,
            "data": document,
            "updated_at": now_utc_rfc3339(),
        });
        let response = self
            .authorized(self.client.post(self.table_url()))
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&row)
            .send()?;
        checked_body(response)?;
        Ok(())
    }

    fn ping(&self) -> bool {
        self.authorized(self.client.get(self.table_url()))
            .query(&[("select", "id"), ("limit", "1")])
            .send()
            .map(|response| response.status().is_success())
            .unwrap_or(false)
    }

    fn describe(&self) -> String {
        format!(
            "supabase {} (table '{}', row '{}')",
            self.base_url, self.table, self.record_id
        )
    }
}

fn table_url(base_url: &str, table: &str) -> String {
    format!("{}/rest/v1/{}", base_url.trim_end_matches('/'), table)
}

fn checked_body(response: reqwest::blocking::Response) -> Result<String, RemoteError> {
    let status = response.status();
    let body = response.text()?;
    if status.is_success() {
        Ok(body)
    } else {
        Err(RemoteError::Status {
            code: status.as_u16(),
            body,
        })
    }
}

/// PostgREST answers point selects with an array. No rows, or a row whose
/// `data` is null, means the document was never initialized.
fn decode_row(body: &str) -> Result<Option<Value>, RemoteError> {
    let rows: Vec<Value> = serde_json::from_str(body)?;
    let Some(mut row) = rows.into_iter().next() else {
        return Ok(None);
    };
    match row.get_mut("data").map(Value::take) {
        Some(Value::Null) | None => Ok(None),
        Some(data) => Ok(Some(data)),
    }
}
