//! HTTP data provider for a remote booking backend.

use crate::error::{ApiError, BookingError};
use crate::provider::{ApiFuture, ApiResult, SeatBookingApi};
use crate::types::{BookingReceipt, BookingRequest, ManagerId, Seat, TokenBalance};
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Body returned by `POST /api/book-seat/`
#[derive(Debug, Deserialize)]
struct BookingResponse {
    success: bool,
    #[serde(default)]
    message: String,
    #[serde(default)]
    seat: Option<Seat>,
}

/// Booking backend reached over HTTP
///
/// Endpoints (relative to the base URL):
/// - `GET /api/seats/`
/// - `GET /api/manager-tokens/{manager_id}/`
/// - `POST /api/book-seat/` with `{ "seat_id", "employee_id" }`
#[derive(Clone)]
pub struct HttpBookingApi {
    client: Client,
    base_url: String,
    api_token: Option<String>,
}

impl HttpBookingApi {
    /// Create a client for `base_url` with a per-request timeout
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token: None,
        })
    }

    /// Send `Authorization: Bearer <token>` with every request
    #[must_use]
    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Base URL without trailing slash
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{path}", self.base_url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(request: RequestBuilder) -> ApiResult<Response> {
        request
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let url = self.url(path);
        tracing::debug!(%url, "GET");
        let response = Self::send(self.authorize(self.client.get(&url))).await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn book(&self, request: BookingRequest) -> ApiResult<BookingReceipt> {
        let url = self.url("book-seat/");
        tracing::debug!(%url, seat = %request.seat_id, "POST");
        let response = Self::send(self.authorize(self.client.post(&url).json(&request))).await?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let parsed = match serde_json::from_str::<BookingResponse>(&body) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => {
                return Err(ApiError::Status {
                    status: status.as_u16(),
                    message: body,
                });
            },
            Err(e) => return Err(ApiError::Decode(e.to_string())),
        };

        if !parsed.success || !status.is_success() {
            tracing::info!(status = status.as_u16(), message = %parsed.message, "Booking rejected by server");
            return Err(BookingError::from_server_message(&parsed.message, &request.seat_id).into());
        }

        let Some(seat) = parsed.seat else {
            return Err(ApiError::Decode("successful booking without seat".to_string()));
        };
        if seat.id() != &request.seat_id {
            return Err(ApiError::Decode(format!(
                "requested seat {} but server booked {}",
                request.seat_id,
                seat.id()
            )));
        }
        if !seat.is_owned_by(&request.employee_id) {
            return Err(ApiError::Decode(format!(
                "server booked seat {} for someone else",
                seat.id()
            )));
        }

        Ok(BookingReceipt {
            message: parsed.message,
            seat,
        })
    }
}

impl std::fmt::Debug for HttpBookingApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpBookingApi")
            .field("base_url", &self.base_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "***"))
            .finish_non_exhaustive()
    }
}

impl SeatBookingApi for HttpBookingApi {
    fn load_seats(&self) -> ApiFuture<Vec<Seat>> {
        let api = self.clone();
        Box::pin(async move { api.get_json("seats/").await })
    }

    fn load_token_balance(&self, manager_id: ManagerId) -> ApiFuture<TokenBalance> {
        let api = self.clone();
        Box::pin(async move {
            api.get_json(&format!("manager-tokens/{manager_id}/"))
                .await
        })
    }

    fn submit_booking(&self, request: BookingRequest) -> ApiFuture<BookingReceipt> {
        let api = self.clone();
        Box::pin(async move { api.book(request).await })
    }
}
