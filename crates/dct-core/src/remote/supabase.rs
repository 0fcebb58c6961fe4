//! Supabase (PostgREST) implementation of [`RemoteStore`].

use reqwest::header::{HeaderValue, ACCEPT, CONTENT_RANGE};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;

use super::RemoteStore;
use crate::config::RemoteConfig;
use crate::error::{Error, Result};
use crate::models::{Booking, BookingId};
use crate::util::compact_text;

const PREFER_REPRESENTATION: &str = "return=representation";
const PREFER_EXACT_COUNT: &str = "count=exact";

/// Bookings table client speaking the Supabase REST dialect.
#[derive(Clone)]
pub struct SupabaseBookingStore {
    table_url: Option<String>,
    anon_key: Option<String>,
    client: Client,
}

impl std::fmt::Debug for SupabaseBookingStore {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("SupabaseBookingStore")
            .field("table_url", &self.table_url)
            .field("anon_key", &self.anon_key.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

impl SupabaseBookingStore {
    /// Build a client from config. An unconfigured config still yields a
    /// client; its calls fail with `RemoteUnavailable` without network I/O.
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        let (table_url, anon_key) = match (config.endpoint(), config.anon_key()) {
            (Some(endpoint), Some(anon_key)) => (
                Some(format!("{endpoint}/rest/v1/{}", config.table_name())),
                Some(anon_key),
            ),
            _ => (None, None),
        };

        Ok(Self {
            table_url,
            anon_key,
            client: Client::builder().timeout(config.timeout()).build()?,
        })
    }

    pub fn table_url(&self) -> Option<&str> {
        self.table_url.as_deref()
    }

    /// Exact row count of the bookings table (connection check).
    pub async fn count(&self) -> Result<u64> {
        let request = self
            .authorized(self.client.head(self.require_table_url()?))
            .query(&[("select", "*")])
            .header("Prefer", PREFER_EXACT_COUNT);
        let response = self.send(request, "count").await?;
        response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_content_range_total)
            .ok_or_else(|| {
                Error::RemoteUnavailable("count response did not include a total".to_string())
            })
    }

    fn require_table_url(&self) -> Result<&str> {
        self.table_url
            .as_deref()
            .ok_or_else(|| Error::RemoteUnavailable("remote store is not configured".to_string()))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let anon_key = self.anon_key.as_deref().unwrap_or_default();
        request
            .header("apikey", anon_key)
            .bearer_auth(anon_key)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
    }

    async fn send(&self, request: RequestBuilder, operation: &'static str) -> Result<Response> {
        let response = request.send().await.map_err(|error| {
            Error::RemoteUnavailable(format!("{operation} request failed: {error}"))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::RemoteUnavailable(format!(
                "{operation} rejected: {}",
                parse_api_error(status, &body)
            )));
        }
        Ok(response)
    }

    async fn decode_rows(response: Response, operation: &'static str) -> Result<Vec<Booking>> {
        response.json::<Vec<Booking>>().await.map_err(|error| {
            Error::RemoteUnavailable(format!("invalid {operation} payload: {error}"))
        })
    }

    async fn single_row(response: Response, operation: &'static str) -> Result<Booking> {
        Self::decode_rows(response, operation)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                Error::RemoteUnavailable(format!("{operation} returned no matching row"))
            })
    }
}

impl RemoteStore for SupabaseBookingStore {
    fn is_configured(&self) -> bool {
        self.table_url.is_some() && self.anon_key.is_some()
    }

    async fn list(&self) -> Result<Vec<Booking>> {
        tracing::debug!("Fetching bookings from remote store");
        let request = self
            .authorized(self.client.get(self.require_table_url()?))
            .query(&[("select", "*"), ("order", "created_at.desc")]);
        let response = self.send(request, "list").await?;
        let bookings = Self::decode_rows(response, "list").await?;
        tracing::debug!("Remote store returned {} bookings", bookings.len());
        Ok(bookings)
    }

    async fn create(&self, booking: &Booking) -> Result<Booking> {
        tracing::debug!("Creating booking {} in remote store", booking.id);
        let request = self
            .authorized(self.client.post(self.require_table_url()?))
            .header("Prefer", PREFER_REPRESENTATION)
            .json(&[booking]);
        let response = self.send(request, "create").await?;
        Self::single_row(response, "create").await
    }

    async fn update(&self, booking: &Booking) -> Result<Booking> {
        tracing::debug!("Updating booking {} in remote store", booking.id);
        let request = self
            .authorized(self.client.patch(self.require_table_url()?))
            .query(&[("id", id_filter(&booking.id))])
            .header("Prefer", PREFER_REPRESENTATION)
            .json(booking);
        let response = self.send(request, "update").await?;
        Self::single_row(response, "update").await
    }

    async fn delete(&self, id: &BookingId) -> Result<()> {
        tracing::debug!("Deleting booking {} from remote store", id);
        let request = self
            .authorized(self.client.delete(self.require_table_url()?))
            .query(&[("id", id_filter(id))]);
        self.send(request, "delete").await?;
        Ok(())
    }
}

fn id_filter(id: &BookingId) -> String {
    format!("eq.{id}")
}

#[derive(Debug, Deserialize)]
struct PostgrestErrorBody {
    message: Option<String>,
    error: Option<String>,
    details: Option<String>,
    hint: Option<String>,
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<PostgrestErrorBody>(body) {
        if let Some(message) = payload
            .message
            .or(payload.error)
            .or(payload.details)
            .or(payload.hint)
        {
            return format!("{} ({})", message.trim(), status.as_u16());
        }
    }

    let trimmed = compact_text(body);
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", trimmed, status.as_u16())
    }
}

/// Total from a `Content-Range` header such as `0-24/3573` or `*/0`.
fn parse_content_range_total(value: &str) -> Option<u64> {
    value.rsplit_once('/')?.1.trim().parse().ok()
}
