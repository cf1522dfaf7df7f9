use std::collections::BTreeMap;

use common::metadata::PackageMetadata;
use common::name::PackageName;
use reqwest::{Client, RequestBuilder, StatusCode};

use super::{decode_json, ApiError, ApiRequest, Endpoints};

/// `GET {registry}/{name}`: the full package document.
#[derive(Debug, Clone)]
pub struct PackageMetadataRequest {
    pub name: PackageName,
}

impl ApiRequest for PackageMetadataRequest {
    type Response = PackageMetadata;

    fn build_request(self, endpoints: &Endpoints, client: &Client) -> Result<RequestBuilder, ApiError> {
        Ok(client.get(endpoints.registry_url(self.name.encoded())?))
    }

    fn decode(_status: StatusCode, body: &[u8]) -> Result<Self::Response, ApiError> {
        decode_json(body)
    }
}

/// `GET {registry}/-/package/{name}/dist-tags`
#[derive(Debug, Clone)]
pub struct DistTagsRequest {
    pub name: PackageName,
}

impl ApiRequest for DistTagsRequest {
    type Response = BTreeMap<String, String>;

    fn build_request(self, endpoints: &Endpoints, client: &Client) -> Result<RequestBuilder, ApiError> {
        let path = format!("-/package/{}/dist-tags", self.name.encoded());
        Ok(client.get(endpoints.registry_url(&path)?))
    }

    fn decode(_status: StatusCode, body: &[u8]) -> Result<Self::Response, ApiError> {
        decode_json(body)
    }
}
