use common::name::PackageName;
use reqwest::{Client, RequestBuilder, StatusCode};

use super::{decode_json, ApiError, ApiRequest, Endpoints};

/// `GET /-/api/all`: every package the proxy knows, percent-encoded.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllPackagesRequest;

impl ApiRequest for AllPackagesRequest {
    type Response = Vec<PackageName>;

    fn build_request(self, endpoints: &Endpoints, client: &Client) -> Result<RequestBuilder, ApiError> {
        Ok(client.get(endpoints.api_url("-/api/all")?))
    }

    fn decode(_status: StatusCode, body: &[u8]) -> Result<Self::Response, ApiError> {
        decode_json(body)
    }
}

/// `DELETE /-/api/delete/{name}`. The response body carries nothing we use.
#[derive(Debug, Clone)]
pub struct DeletePackageRequest {
    pub name: PackageName,
}

impl ApiRequest for DeletePackageRequest {
    type Response = ();

    fn build_request(self, endpoints: &Endpoints, client: &Client) -> Result<RequestBuilder, ApiError> {
        let path = format!("-/api/delete/{}", self.name.encoded());
        Ok(client.delete(endpoints.api_url(&path)?))
    }

    fn decode(_status: StatusCode, _body: &[u8]) -> Result<Self::Response, ApiError> {
        Ok(())
    }
}
