#[allow(clippy::module_inception)]
mod client;
mod error;

pub mod login;
pub mod metadata;
pub mod packages;

pub use client::{ApiClient, Endpoints};
pub use error::ApiError;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

/// A typed call against the registry.
///
/// Requests build their own URL from the endpoint pair and decode the body
/// of a successful (2xx) response. Non-2xx statuses never reach `decode`.
pub trait ApiRequest {
    type Response;

    fn build_request(self, endpoints: &Endpoints, client: &Client)
        -> Result<RequestBuilder, ApiError>;

    fn decode(status: StatusCode, body: &[u8]) -> Result<Self::Response, ApiError>;
}

pub(crate) fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    Ok(serde_json::from_slice(body)?)
}
