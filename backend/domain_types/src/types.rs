use common_utils::consts;

pub const GESTPAY_API_TEST_URL: &str =
    "https://sandbox.gestpay.net/gestpay/GestPayWS/WsCryptDecrypt.asmx?wsdl";
pub const GESTPAY_API_PROD_URL: &str =
    "https://ecommS2S.sella.it/gestpay/GestPayWS/WsCryptDecrypt.asmx?wsdl";
pub const GESTPAY_PAYMENT_PAGE_TEST_URL: &str = "https://sandbox.gestpay.net/pagam/pagam.aspx";
pub const GESTPAY_PAYMENT_PAGE_PROD_URL: &str = "https://ecomm.sella.it/pagam/pagam.aspx";

/// Everything the connector needs besides credentials.
#[derive(Clone, serde::Deserialize, Debug, Default)]
#[serde(default)]
pub struct ConnectorSettings {
    pub endpoints: GatewayEndpoints,
    pub http_client: HttpClientSettings,
    pub proxy: Proxy,
}

#[derive(Clone, serde::Deserialize, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct GatewayEndpoints {
    /// SOAP endpoint used in test mode
    pub api_test_url: String,
    /// SOAP endpoint used in production mode
    pub api_prod_url: String,
    /// hosted payment page used in test mode
    pub payment_page_test_url: String,
    /// hosted payment page used in production mode
    pub payment_page_prod_url: String,
}

impl Default for GatewayEndpoints {
    fn default() -> Self {
        Self {
            api_test_url: GESTPAY_API_TEST_URL.to_string(),
            api_prod_url: GESTPAY_API_PROD_URL.to_string(),
            payment_page_test_url: GESTPAY_PAYMENT_PAGE_TEST_URL.to_string(),
            payment_page_prod_url: GESTPAY_PAYMENT_PAGE_PROD_URL.to_string(),
        }
    }
}

#[derive(Clone, Copy, serde::Deserialize, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct HttpClientSettings {
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for HttpClientSettings {
    fn default() -> Self {
        Self {
            connect_timeout_secs: consts::DEFAULT_CONNECT_TIMEOUT_SECS,
            request_timeout_secs: consts::DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, serde::Deserialize, Clone, Default)]
#[serde(default)]
pub struct Proxy {
    pub http_url: Option<String>,
    pub https_url: Option<String>,
    pub idle_pool_connection_timeout: Option<u64>,
    pub bypass_proxy_urls: Vec<String>,
}
