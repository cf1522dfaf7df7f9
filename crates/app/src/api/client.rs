use std::collections::BTreeMap;
use std::time::Duration;

use common::metadata::PackageMetadata;
use common::name::PackageName;
use common::registry::Registry;
use common::session::{BearerToken, HandshakeStatus, LoginEndpoint, LoginTicket};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, RequestBuilder};
use url::Url;

use super::error::ApiError;
use super::login::{CheckDoneRequest, LoginTicketRequest};
use super::metadata::{DistTagsRequest, PackageMetadataRequest};
use super::packages::{AllPackagesRequest, DeletePackageRequest};
use super::ApiRequest;

/// The two bases requests are resolved against: the admin API and the
/// registry that serves package documents. Usually the same host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    api: Url,
    registry: Url,
}

impl Endpoints {
    pub fn new(api: Url, registry: Option<Url>) -> Self {
        let api = with_trailing_slash(api);
        let registry = registry.map(with_trailing_slash).unwrap_or_else(|| api.clone());
        Self { api, registry }
    }

    pub fn api(&self) -> &Url {
        &self.api
    }

    pub fn registry(&self) -> &Url {
        &self.registry
    }

    /// Resolve a path (or an absolute URL) against the admin API.
    pub fn api_url(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.api.join(path)?)
    }

    pub fn registry_url(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.registry.join(path)?)
    }
}

// Url::join drops the last segment of a base without a trailing slash.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    endpoints: Endpoints,
    client: Client,
    credential: Option<BearerToken>,
}

impl ApiClient {
    pub fn new(endpoints: Endpoints, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = Client::builder()
            .default_headers(default_headers)
            .user_agent(concat!("registry-admin/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            endpoints,
            client: builder.build()?,
            credential: None,
        })
    }

    /// A copy of this client that authenticates every request with `token`.
    pub fn with_credential(&self, token: BearerToken) -> Self {
        Self {
            credential: Some(token),
            ..self.clone()
        }
    }

    pub fn credential(&self) -> Option<&BearerToken> {
        self.credential.as_ref()
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Build `request` with this client's credential attached.
    pub fn prepare<T: ApiRequest>(&self, request: T) -> Result<RequestBuilder, ApiError> {
        let request_builder = request.build_request(&self.endpoints, &self.client)?;
        Ok(match &self.credential {
            Some(token) => request_builder.bearer_auth(token.secret()),
            None => request_builder,
        })
    }

    pub async fn call<T: ApiRequest>(&self, request: T) -> Result<T::Response, ApiError> {
        let response = self.prepare(request)?.send().await?;
        let status = response.status();
        tracing::debug!(%status, url = %response.url(), "registry response");

        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(ApiError::HttpStatus(
                status,
                String::from_utf8_lossy(&body).trim().to_string(),
            ));
        }

        T::decode(status, &body)
    }

    pub async fn dist_tags(&self, name: &PackageName) -> Result<BTreeMap<String, String>, ApiError> {
        self.call(DistTagsRequest { name: name.clone() }).await
    }
}

#[async_trait::async_trait]
impl Registry for ApiClient {
    type Error = ApiError;

    async fn all_packages(&self) -> Result<Vec<PackageName>, Self::Error> {
        self.call(AllPackagesRequest).await
    }

    async fn package_metadata(&self, name: &PackageName) -> Result<PackageMetadata, Self::Error> {
        self.call(PackageMetadataRequest { name: name.clone() }).await
    }

    async fn delete_package(&self, name: &PackageName) -> Result<(), Self::Error> {
        self.call(DeletePackageRequest { name: name.clone() }).await
    }
}

#[async_trait::async_trait]
impl LoginEndpoint for ApiClient {
    type Error = ApiError;

    async fn request_ticket(&self) -> Result<LoginTicket, Self::Error> {
        self.call(LoginTicketRequest).await
    }

    async fn check_done(&self, ticket: &LoginTicket) -> Result<HandshakeStatus, Self::Error> {
        self.call(CheckDoneRequest {
            done_url: ticket.done_url.clone(),
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::AUTHORIZATION;
    use reqwest::StatusCode;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    fn endpoints(api: &str) -> Endpoints {
        Endpoints::new(Url::parse(api).unwrap(), None)
    }

    #[test]
    fn test_registry_defaults_to_api() {
        let endpoints = endpoints("http://localhost:5000");
        assert_eq!(endpoints.registry(), endpoints.api());
        assert_eq!(endpoints.api().as_str(), "http://localhost:5000/");
    }

    #[test]
    fn test_base_path_is_kept_when_joining() {
        let endpoints = endpoints("http://example.com/registry");
        assert_eq!(
            endpoints.api_url("-/api/all").unwrap().as_str(),
            "http://example.com/registry/-/api/all"
        );
    }

    #[test]
    fn test_absolute_urls_pass_through() {
        let endpoints = endpoints("http://localhost:5000/");
        assert_eq!(
            endpoints
                .api_url("https://auth.example.com/check_done?id=1")
                .unwrap()
                .as_str(),
            "https://auth.example.com/check_done?id=1"
        );
    }

    #[test]
    fn test_credential_is_per_client() {
        let client = ApiClient::new(endpoints("http://localhost:5000/"), None).unwrap();
        let authed = client.with_credential(BearerToken::new("np_abc"));

        assert!(client.credential().is_none());
        assert_eq!(authed.credential().map(|t| t.secret()), Some("np_abc"));
    }

    #[test]
    fn test_bearer_header_only_on_authenticated_client() {
        let client = ApiClient::new(endpoints("http://localhost:5000/"), None).unwrap();
        let authed = client.with_credential(BearerToken::new("np_abc"));

        let anonymous = client.prepare(AllPackagesRequest).unwrap().build().unwrap();
        assert!(anonymous.headers().get(AUTHORIZATION).is_none());

        let request = authed
            .prepare(DeletePackageRequest {
                name: PackageName::from_display("lodash"),
            })
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(request.headers()[AUTHORIZATION], "Bearer np_abc");
    }

    /// Answer one HTTP request with `status` and `body` on a loopback port.
    /// The handle yields the raw request head.
    async fn serve_once(status: &'static str, body: &'static str) -> (Url, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = Url::parse(&format!("http://{}/", listener.local_addr().unwrap())).unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut head = Vec::new();
            let mut buf = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&head).into_owned()
        });

        (url, handle)
    }

    #[tokio::test]
    async fn test_non_success_status_is_http_status_error() {
        let (url, server) = serve_once("401 Unauthorized", "token rejected").await;
        let client = ApiClient::new(Endpoints::new(url, None), None)
            .unwrap()
            .with_credential(BearerToken::new("np_stale"));

        let err = client.all_packages().await.unwrap_err();
        let head = server.await.unwrap();

        match &err {
            ApiError::HttpStatus(status, body) => {
                assert_eq!(*status, StatusCode::UNAUTHORIZED);
                assert_eq!(body, "token rejected");
            }
            other => panic!("unexpected error: {}", other),
        }
        assert!(err.is_unauthorized());
        assert!(head.starts_with("GET /-/api/all "));
        assert!(head.to_lowercase().contains("authorization: bearer np_stale"));
    }

    #[tokio::test]
    async fn test_accepted_done_url_is_pending() {
        let (url, server) = serve_once("202 Accepted", "\"{}\"").await;
        let client = ApiClient::new(Endpoints::new(url.clone(), None), None).unwrap();
        let ticket = LoginTicket {
            login_url: url.join("login?id=7").unwrap().to_string(),
            done_url: url.join("check_done?id=7").unwrap().to_string(),
        };

        let status = client.check_done(&ticket).await.unwrap();
        let head = server.await.unwrap();

        assert_eq!(status, HandshakeStatus::Pending);
        assert!(head.starts_with("GET /check_done?id=7 "));
    }

    #[tokio::test]
    async fn test_ok_done_url_completes() {
        let (url, server) = serve_once("200 OK", r#"{"token":"veto-np_abc"}"#).await;
        let client = ApiClient::new(Endpoints::new(url.clone(), None), None).unwrap();
        let ticket = LoginTicket {
            login_url: url.join("login?id=8").unwrap().to_string(),
            done_url: url.join("check_done?id=8").unwrap().to_string(),
        };

        let status = client.check_done(&ticket).await.unwrap();
        server.await.unwrap();

        assert_eq!(status, HandshakeStatus::Complete(BearerToken::new("veto-np_abc")));
    }
}
