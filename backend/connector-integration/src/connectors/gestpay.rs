mod constants;
#[cfg(test)]
mod test;
pub mod transformers;

use common_utils::{
    consts::{ACCEPT, CONTENT_LENGTH, CONTENT_TYPE, SOAP_ACTION, TEXT_XML, TEXT_XML_UTF8},
    errors::CustomResult,
    log_utils::info_log,
};
use domain_types::{
    connector_types::{
        GatewayCredentials, GatewayMode, PaymentRedirect, PaymentRequest, RequestFields,
        SoapOperation, TransactionOutcome,
    },
    errors::ConnectorError,
    types::{ConnectorSettings, GatewayEndpoints},
};
use error_stack::ResultExt;
use external_services::service::{self, Headers, Request};
use serde_json::json;

/// Client of the Gestpay crypt/decrypt web service.
///
/// Holds the merchant credentials and the HTTP client used for every call,
/// plus the outcome of the last [`GestpayClient::pay`].
#[derive(Debug, Clone)]
pub struct GestpayClient {
    credentials: GatewayCredentials,
    mode: GatewayMode,
    endpoints: GatewayEndpoints,
    client: reqwest::Client,
    payment_types: Vec<String>,
    encrypted_string: Option<String>,
    payment_redirect_url: Option<String>,
}

impl GestpayClient {
    pub fn new(
        credentials: GatewayCredentials,
        mode: GatewayMode,
        settings: &ConnectorSettings,
    ) -> CustomResult<Self, ConnectorError> {
        let endpoints = settings.endpoints.clone();
        let api_url = match mode {
            GatewayMode::Test => &endpoints.api_test_url,
            GatewayMode::Production => &endpoints.api_prod_url,
        };
        let should_bypass_proxy = settings
            .proxy
            .bypass_proxy_urls
            .iter()
            .any(|url| url == api_url);

        let client = service::create_client(
            &settings.proxy,
            &settings.http_client,
            should_bypass_proxy,
        )
        .change_context(ConnectorError::ProcessingStepFailed)?;

        Ok(Self {
            credentials,
            mode,
            endpoints,
            client,
            payment_types: Vec::new(),
            encrypted_string: None,
            payment_redirect_url: None,
        })
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.set_api_key(api_key);
        self
    }

    pub fn with_shop_login(mut self, shop_login: impl Into<String>) -> Self {
        self.credentials.shop_login = shop_login.into();
        self
    }

    pub fn set_api_key(&mut self, api_key: impl Into<String>) {
        self.credentials.set_api_key(api_key);
    }

    /// Restricts the payment page to the given method, e.g. `CREDITCARD`.
    pub fn add_payment_type(mut self, payment_type: impl Into<String>) -> Self {
        self.payment_types.push(payment_type.into());
        self
    }

    pub fn credentials(&self) -> &GatewayCredentials {
        &self.credentials
    }

    pub fn mode(&self) -> GatewayMode {
        self.mode
    }

    pub fn payment_types(&self) -> &[String] {
        &self.payment_types
    }

    /// Crypted string returned by the last successful `pay`.
    pub fn encrypted_string(&self) -> Option<&str> {
        self.encrypted_string.as_deref()
    }

    /// Redirect URL built by the last successful `pay`.
    pub fn payment_redirect_url(&self) -> Option<&str> {
        self.payment_redirect_url.as_deref()
    }

    fn api_url(&self) -> &str {
        match self.mode {
            GatewayMode::Test => &self.endpoints.api_test_url,
            GatewayMode::Production => &self.endpoints.api_prod_url,
        }
    }

    fn payment_page_url(&self) -> &str {
        match self.mode {
            GatewayMode::Test => &self.endpoints.payment_page_test_url,
            GatewayMode::Production => &self.endpoints.payment_page_prod_url,
        }
    }

    fn get_headers(operation: SoapOperation, content_length: usize) -> Headers {
        vec![
            (CONTENT_TYPE.to_string(), TEXT_XML_UTF8.to_string()),
            (ACCEPT.to_string(), TEXT_XML.to_string()),
            (CONTENT_LENGTH.to_string(), content_length.to_string()),
            (
                SOAP_ACTION.to_string(),
                format!("\"{}{operation}\"", constants::SOAP_ACTION_NAMESPACE),
            ),
        ]
    }

    async fn call(
        &self,
        operation: SoapOperation,
        envelope: String,
    ) -> CustomResult<String, ConnectorError> {
        let request = Request {
            url: self.api_url().to_string(),
            headers: Self::get_headers(operation, envelope.len()),
            body: envelope,
        };

        let response = service::call_gateway_api(&self.client, request, operation.into())
            .await
            .change_context(ConnectorError::ProcessingStepFailed)
            .attach_printable_lazy(|| format!("{operation} call to the gateway failed"))?;

        Ok(response.body)
    }

    /// Sends an Encrypt call with `fields` merged over the credentials and
    /// returns the raw response body.
    ///
    /// `amount` and `shopTransactionId` are checked before anything is sent.
    pub async fn encrypt(&self, fields: RequestFields) -> CustomResult<String, ConnectorError> {
        let envelope = transformers::build_encrypt_envelope(&self.credentials, fields)?;
        self.call(SoapOperation::Encrypt, envelope).await
    }

    /// Sends a Decrypt call for `crypted_string` and returns the raw response body.
    pub async fn decrypt(&self, crypted_string: &str) -> CustomResult<String, ConnectorError> {
        let envelope = transformers::build_decrypt_envelope(&self.credentials, crypted_string)?;
        self.call(SoapOperation::Decrypt, envelope).await
    }

    /// Encrypts the payment and builds the payment page redirect.
    ///
    /// A `shop_login` override replaces the configured one for this and every
    /// later call on the client.
    pub async fn pay(
        &mut self,
        request: PaymentRequest,
        shop_login: Option<&str>,
    ) -> CustomResult<PaymentRedirect, ConnectorError> {
        self.override_shop_login(shop_login);

        let fields = transformers::build_payment_fields(&request, &self.payment_types);
        let raw = self.encrypt(fields).await?;
        let redirect = transformers::resolve_encrypt_response(
            &raw,
            &self.credentials.shop_login,
            self.payment_page_url(),
        )?;

        info_log(
            "GESTPAY_PAYMENT_READY",
            &json!({
                "shop_transaction_id": request.shop_transaction_id,
                "mode": self.mode.to_string(),
            }),
        );

        self.encrypted_string = Some(redirect.encrypted_string.clone());
        self.payment_redirect_url = Some(redirect.url.clone());
        Ok(redirect)
    }

    /// Decrypts the `b` parameter of the query string the gateway sends the
    /// buyer back with.
    pub async fn check_response(
        &mut self,
        query: &str,
        shop_login: Option<&str>,
    ) -> CustomResult<TransactionOutcome, ConnectorError> {
        let crypted_string = transformers::crypted_string_from_query(query)?;
        self.check_crypted_string(&crypted_string, shop_login).await
    }

    pub async fn check_crypted_string(
        &mut self,
        crypted_string: &str,
        shop_login: Option<&str>,
    ) -> CustomResult<TransactionOutcome, ConnectorError> {
        self.override_shop_login(shop_login);

        let raw = self.decrypt(crypted_string).await?;
        let outcome = transformers::resolve_decrypt_response(&raw)?;

        info_log(
            "GESTPAY_TRANSACTION_CHECKED",
            &json!({
                "shop_transaction_id": outcome.shop_transaction_id,
                "transaction_result": outcome.transaction_result,
                "error_code": outcome.error_code,
            }),
        );

        Ok(outcome)
    }

    fn override_shop_login(&mut self, shop_login: Option<&str>) {
        if let Some(shop_login) = shop_login.filter(|login| !login.is_empty()) {
            self.credentials.shop_login = shop_login.to_string();
        }
    }
}
