use common::session::{BearerToken, HandshakeStatus, LoginTicket};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;

use super::{decode_json, ApiError, ApiRequest, Endpoints};

/// `POST /-/v1/login`: start a browser handshake.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoginTicketRequest;

impl ApiRequest for LoginTicketRequest {
    type Response = LoginTicket;

    fn build_request(self, endpoints: &Endpoints, client: &Client) -> Result<RequestBuilder, ApiError> {
        Ok(client.post(endpoints.api_url("-/v1/login")?))
    }

    fn decode(_status: StatusCode, body: &[u8]) -> Result<Self::Response, ApiError> {
        decode_json(body)
    }
}

/// Poll of a ticket's `doneUrl`. The server answers 202 while the operator
/// has not signed in yet and 200 with the token once they have.
#[derive(Debug, Clone)]
pub struct CheckDoneRequest {
    pub done_url: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
}

impl ApiRequest for CheckDoneRequest {
    type Response = HandshakeStatus;

    fn build_request(self, endpoints: &Endpoints, client: &Client) -> Result<RequestBuilder, ApiError> {
        Ok(client.get(endpoints.api_url(&self.done_url)?))
    }

    fn decode(status: StatusCode, body: &[u8]) -> Result<Self::Response, ApiError> {
        if status != StatusCode::OK {
            return Ok(HandshakeStatus::Pending);
        }
        let response: TokenResponse = decode_json(body)?;
        Ok(HandshakeStatus::Complete(BearerToken::new(response.token)))
    }
}
