use std::{str::FromStr, time::Duration};

use common_utils::{
    errors::CustomResult,
    log_utils::{error_log, info_log, warn_log, Tag},
};
use domain_types::{
    errors::ApiClientError,
    types::{HttpClientSettings, Proxy},
};
use error_stack::{report, ResultExt};
use reqwest::Client;
use serde_json::json;
use tracing::{field::Empty, Instrument};

pub type Headers = Vec<(String, String)>;

/// A fully built SOAP call: always a POST with an XML body.
#[derive(Debug, Clone)]
pub struct Request {
    pub url: String,
    pub headers: Headers,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status_code: u16,
    pub body: String,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// Sends `request` once and hands back whatever body the server produced.
///
/// Non-2xx answers are not errors here: SOAP faults travel as HTTP 500 and the
/// caller decides what the body means.
pub async fn call_gateway_api(
    client: &Client,
    request: Request,
    flow_name: &str,
) -> CustomResult<Response, ApiClientError> {
    let span = tracing::info_span!(
        "gestpay_outgoing_api",
        flow = flow_name,
        url = Empty,
        status_code = Empty,
        latency = Empty,
    );

    async move {
        let start = tokio::time::Instant::now();
        let url =
            reqwest::Url::parse(&request.url).change_context(ApiClientError::UrlEncodingFailed)?;
        tracing::Span::current().record("url", tracing::field::display(&url));

        let headers = request.headers.construct_header_map()?;
        tracing::info!(tag = ?Tag::InitiatedToConnector, "sending request to gateway");

        let response = client
            .post(url)
            .add_headers(headers)
            .body(request.body)
            .send()
            .await
            .map_err(|error| {
                let api_error = if error.is_timeout() {
                    ApiClientError::RequestTimeoutReceived
                } else {
                    ApiClientError::RequestNotSent(error.to_string())
                };
                error_log(
                    "REQUEST_FAILURE",
                    &json!({ "flow": flow_name, "error": error.to_string() }),
                );
                report!(api_error)
            });

        let result = handle_response(response).await;

        let elapsed = start.elapsed().as_millis();
        tracing::Span::current().record("latency", elapsed);
        if let Ok(response) = &result {
            tracing::Span::current().record("status_code", response.status_code);
        }
        tracing::info!(tag = ?Tag::OutgoingApi, log_type = "api", "Outgoing Request completed");
        result
    }
    .instrument(span)
    .await
}

async fn handle_response(
    response: CustomResult<reqwest::Response, ApiClientError>,
) -> CustomResult<Response, ApiClientError> {
    let response = response?;
    let status_code = response.status().as_u16();
    let body = response.text().await.map_err(|error| {
        report!(ApiClientError::ResponseDecodingFailed)
            .attach_printable(format!("Unable to read response body: {error}"))
    })?;

    if !(200..300).contains(&status_code) {
        warn_log(
            "UNEXPECTED_STATUS",
            &json!({ "status_code": status_code, "body_length": body.len() }),
        );
    }
    tracing::info!(tag = ?Tag::IncomingApi, status_code, "response from gateway");

    Ok(Response { status_code, body })
}

/// Builds the HTTP client used for every call of one connector instance.
pub fn create_client(
    proxy_config: &Proxy,
    settings: &HttpClientSettings,
    should_bypass_proxy: bool,
) -> CustomResult<Client, ApiClientError> {
    get_client_builder(proxy_config, settings, should_bypass_proxy)?
        .build()
        .change_context(ApiClientError::ClientConstructionFailed)
        .inspect_err(|err| {
            info_log(
                "ERROR",
                &json!(format!("Failed to construct base client. Error: {:?}", err)),
            );
        })
}

fn get_client_builder(
    proxy_config: &Proxy,
    settings: &HttpClientSettings,
    should_bypass_proxy: bool,
) -> CustomResult<reqwest::ClientBuilder, ApiClientError> {
    let mut client_builder = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
        .timeout(Duration::from_secs(settings.request_timeout_secs))
        .pool_idle_timeout(Duration::from_secs(
            proxy_config
                .idle_pool_connection_timeout
                .unwrap_or_default(),
        ));

    if should_bypass_proxy {
        return Ok(client_builder);
    }

    // Proxy all HTTPS traffic through the configured HTTPS proxy
    if let Some(url) = proxy_config.https_url.as_ref() {
        client_builder = client_builder.proxy(
            reqwest::Proxy::https(url)
                .change_context(ApiClientError::InvalidProxyConfiguration)
                .inspect_err(|err| {
                    info_log(
                        "PROXY_ERROR",
                        &json!(format!("HTTPS proxy configuration error. Error: {:?}", err)),
                    );
                })?,
        );
    }

    // Proxy all HTTP traffic through the configured HTTP proxy
    if let Some(url) = proxy_config.http_url.as_ref() {
        client_builder = client_builder.proxy(
            reqwest::Proxy::http(url)
                .change_context(ApiClientError::InvalidProxyConfiguration)
                .inspect_err(|err| {
                    info_log(
                        "PROXY_ERROR",
                        &json!(format!("HTTP proxy configuration error. Error: {:?}", err)),
                    );
                })?,
        );
    }

    Ok(client_builder)
}

pub(super) trait HeaderExt {
    fn construct_header_map(self) -> CustomResult<reqwest::header::HeaderMap, ApiClientError>;
}

impl HeaderExt for Headers {
    fn construct_header_map(self) -> CustomResult<reqwest::header::HeaderMap, ApiClientError> {
        use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

        self.into_iter().try_fold(
            HeaderMap::new(),
            |mut header_map, (header_name, header_value)| {
                let header_name = HeaderName::from_str(&header_name)
                    .change_context(ApiClientError::HeaderMapConstructionFailed)?;
                let header_value = HeaderValue::from_str(&header_value)
                    .change_context(ApiClientError::HeaderMapConstructionFailed)?;
                header_map.append(header_name, header_value);
                Ok(header_map)
            },
        )
    }
}

pub(super) trait RequestBuilderExt {
    fn add_headers(self, headers: reqwest::header::HeaderMap) -> Self;
}

impl RequestBuilderExt for reqwest::RequestBuilder {
    fn add_headers(mut self, headers: reqwest::header::HeaderMap) -> Self {
        self = self.headers(headers);
        self
    }
}
