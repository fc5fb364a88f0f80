use std::{borrow::Cow, collections::HashMap};

use common_utils::{
    consts::{NO_ERROR_CODE, NO_ERROR_MESSAGE},
    errors::CustomResult,
    fp_utils::when,
    log_utils::{debug_log, warn_log},
};
use domain_types::{
    connector_types::{
        FieldValue, GatewayCredentials, PaymentRedirect, PaymentRequest, RequestFields,
        SoapOperation, TransactionOutcome,
    },
    errors::ConnectorError,
};
use error_stack::{report, ResultExt};
use hyperswitch_masking::PeekInterface;
use once_cell::sync::Lazy;
use quick_xml::{events::BytesText, Writer};
use regex::Regex;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::constants::{self, request_fields, response_fields, CUSTOM_INFO_SEPARATOR};
use crate::utils::{self, leading_integer, missing_field_err, XmlNode};

#[allow(clippy::expect_used)]
static CRYPT_DECRYPT_STRING: Lazy<Regex> = Lazy::new(|| {
    Regex::new("<CryptDecryptString>([^<]+)</CryptDecryptString>")
        .expect("CryptDecryptString pattern is valid")
});

const TRANSACTION_OK_MARKER: &str = "<TransactionResult>OK</TransactionResult>";

// =============================================================================
// Request side
// =============================================================================

/// Fields of an Encrypt call, credentials first.
///
/// `amount` and `shopTransactionId` must be present; caller fields named like
/// a credential field replace its value in place.
pub fn build_encrypt_fields(
    credentials: &GatewayCredentials,
    fields: RequestFields,
) -> CustomResult<RequestFields, ConnectorError> {
    when(!fields.contains(request_fields::AMOUNT), || {
        Err(missing_field_err(request_fields::AMOUNT)())
    })?;
    when(!fields.contains(request_fields::SHOP_TRANSACTION_ID), || {
        Err(missing_field_err(request_fields::SHOP_TRANSACTION_ID)())
    })?;

    let mut merged = RequestFields::new()
        .with(request_fields::SHOP_LOGIN, credentials.shop_login.as_str())
        .with(request_fields::UIC_CODE, credentials.currency_code.as_str());
    merged.extend(fields);

    if let Some(api_key) = credentials.api_key() {
        merged.insert(request_fields::API_KEY, api_key.peek().as_str());
    }

    Ok(merged)
}

/// Fields of a Decrypt call: shop login, crypted string and the API key if any.
pub fn build_decrypt_fields(credentials: &GatewayCredentials, crypted_string: &str) -> RequestFields {
    let mut fields = RequestFields::new()
        .with(request_fields::SHOP_LOGIN, credentials.shop_login.as_str())
        .with(request_fields::CRYPTED_STRING, crypted_string);

    if let Some(api_key) = credentials.api_key() {
        fields.insert(request_fields::API_KEY, api_key.peek().as_str());
    }

    fields
}

/// Fields `pay` sends, before credentials are merged in.
pub fn build_payment_fields(request: &PaymentRequest, payment_types: &[String]) -> RequestFields {
    let mut fields = RequestFields::new()
        .with(request_fields::AMOUNT, request.amount.as_str())
        .with(
            request_fields::SHOP_TRANSACTION_ID,
            request.shop_transaction_id.as_str(),
        )
        .with(
            request_fields::CUSTOM_INFO,
            encode_custom_info(&request.custom_parameters),
        );

    if let Some(language_id) = &request.language_id {
        fields.insert(request_fields::LANGUAGE_ID, language_id.as_str());
    }

    if !payment_types.is_empty() {
        fields.insert(
            request_fields::PAYMENT_TYPES,
            FieldValue::List {
                item_tag: request_fields::PAYMENT_TYPE.to_string(),
                items: payment_types.to_vec(),
            },
        );
    }

    fields
}

/// Serializes `fields` as flat `<name>value</name>` tags in insertion order.
/// Text is XML-escaped by the writer.
pub fn serialize_fields(fields: &RequestFields) -> CustomResult<String, ConnectorError> {
    let mut writer = Writer::new(Vec::new());

    for (name, value) in fields.iter() {
        validate_tag_name(name)?;
        let written = match value {
            FieldValue::Text(text) => writer
                .create_element(name)
                .write_text_content(BytesText::new(text)),
            FieldValue::List { item_tag, items } => {
                validate_tag_name(item_tag)?;
                writer.create_element(name).write_inner_content(|writer| {
                    items.iter().try_for_each(|item| {
                        writer
                            .create_element(item_tag)
                            .write_text_content(BytesText::new(item))
                            .map(|_| ())
                    })
                })
            }
        };
        written
            .change_context(ConnectorError::RequestEncodingFailed)
            .attach_printable_lazy(|| format!("failed to write field {name:?}"))?;
    }

    String::from_utf8(writer.into_inner()).change_context(ConnectorError::RequestEncodingFailed)
}

/// `Writer` takes element names as given, so they are checked here.
fn validate_tag_name(name: &str) -> CustomResult<(), ConnectorError> {
    let mut chars = name.chars();
    let valid = chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));

    when(!valid, || {
        Err(report!(ConnectorError::RequestEncodingFailed)
            .attach_printable(format!("invalid field name {name:?}")))
    })
}

/// Substitutes the serialized fields into the operation's SOAP template.
pub fn build_envelope(
    operation: SoapOperation,
    fields: &RequestFields,
) -> CustomResult<String, ConnectorError> {
    let template = match operation {
        SoapOperation::Encrypt => constants::ENCRYPT_TEMPLATE,
        SoapOperation::Decrypt => constants::DECRYPT_TEMPLATE,
    };
    let request = serialize_fields(fields)?;

    debug_log(
        "GESTPAY_ENVELOPE_BUILT",
        &json!({
            "operation": operation.to_string(),
            "fields": fields.iter().map(|(name, _)| name).collect::<Vec<_>>(),
        }),
    );

    Ok(template.replacen(constants::REQUEST_PLACEHOLDER, &request, 1))
}

pub fn build_encrypt_envelope(
    credentials: &GatewayCredentials,
    fields: RequestFields,
) -> CustomResult<String, ConnectorError> {
    let fields = build_encrypt_fields(credentials, fields)?;
    build_envelope(SoapOperation::Encrypt, &fields)
}

pub fn build_decrypt_envelope(
    credentials: &GatewayCredentials,
    crypted_string: &str,
) -> CustomResult<String, ConnectorError> {
    build_envelope(
        SoapOperation::Decrypt,
        &build_decrypt_fields(credentials, crypted_string),
    )
}

// =============================================================================
// CustomInfo
// =============================================================================

/// Joins `key=value` pairs with the `*P1*` separator.
///
/// Pairs are sent unencoded: the gateway refuses `%` in parameter values.
pub fn encode_custom_info<'a, I>(parameters: I) -> String
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    parameters
        .into_iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join(CUSTOM_INFO_SEPARATOR)
}

/// Rebuilds the key/value map carried in a `CustomInfo` blob.
///
/// The blob is percent-decoded once as a whole, then split on `*P1*` and each
/// pair split at its first `=`. `+` is kept literally. Pairs without a key are
/// dropped and the last duplicate wins.
pub fn decode_custom_info(blob: &str) -> HashMap<String, String> {
    let blob = blob.trim();
    let decoded = urlencoding::decode(blob).unwrap_or(Cow::Borrowed(blob));

    decoded
        .split(CUSTOM_INFO_SEPARATOR)
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

// =============================================================================
// Response side
// =============================================================================

/// The `GestPayCryptDecrypt` node of an Encrypt or Decrypt response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GestpayCryptDecryptResponse {
    node: XmlNode,
}

impl GestpayCryptDecryptResponse {
    /// Parses `raw` and walks
    /// `Body → {op}Response → {op}Result → GestPayCryptDecrypt`.
    pub fn from_soap(raw: &str, operation: SoapOperation) -> CustomResult<Self, ConnectorError> {
        let envelope = utils::parse_soap_response(raw)?;
        let response_node = format!("{operation}Response");
        let result_node = format!("{operation}Result");

        envelope
            .path(&[
                response_fields::BODY,
                response_node.as_str(),
                result_node.as_str(),
                response_fields::RESULT_NODE,
            ])
            .cloned()
            .map(|node| Self { node })
            .ok_or_else(|| {
                report!(ConnectorError::MissingResultNode {
                    operation: operation.into(),
                })
            })
    }

    fn text(&self, field: &str) -> &str {
        self.node.child_text(field).unwrap_or_default()
    }

    pub fn transaction_result(&self) -> &str {
        self.text(response_fields::TRANSACTION_RESULT)
    }

    pub fn is_ok(&self) -> bool {
        is_transaction_ok(self.transaction_result())
    }

    pub fn crypt_decrypt_string(&self) -> Option<&str> {
        Some(self.text(response_fields::CRYPT_DECRYPT_STRING)).filter(|value| !value.is_empty())
    }

    pub fn shop_transaction_id(&self) -> &str {
        self.text(response_fields::SHOP_TRANSACTION_ID)
    }

    pub fn error_code(&self) -> &str {
        self.text(response_fields::ERROR_CODE)
    }

    pub fn error_description(&self) -> &str {
        self.text(response_fields::ERROR_DESCRIPTION)
    }

    pub fn custom_info(&self) -> HashMap<String, String> {
        decode_custom_info(self.text(response_fields::CUSTOM_INFO))
    }

    pub fn fields(&self) -> Map<String, Value> {
        self.node.fields()
    }

    fn payment_error(&self) -> ConnectorError {
        let code = Some(self.error_code())
            .filter(|code| !code.is_empty())
            .unwrap_or(NO_ERROR_CODE);
        let description = Some(self.error_description())
            .filter(|description| !description.is_empty())
            .unwrap_or(NO_ERROR_MESSAGE);

        ConnectorError::PaymentFailed {
            description: description.to_string(),
            code: code.to_string(),
            numeric_code: leading_integer(code),
        }
    }
}

/// `TransactionResult` is compared with `ok` ignoring case.
pub fn is_transaction_ok(transaction_result: &str) -> bool {
    transaction_result.eq_ignore_ascii_case("ok")
}

pub fn compose_redirect_url(payment_page_url: &str, shop_login: &str, encrypted: &str) -> String {
    format!("{payment_page_url}?a={shop_login}&b={encrypted}")
}

/// Textual match of the success marker and the crypted string, done before
/// any parsing.
fn encrypted_string_fast_path(raw: &str) -> Option<&str> {
    if !raw.contains(TRANSACTION_OK_MARKER) {
        return None;
    }
    CRYPT_DECRYPT_STRING
        .captures(raw)
        .and_then(|captures| captures.get(1))
        .map(|capture| capture.as_str())
}

/// Turns a raw Encrypt response into a redirect or a payment error.
///
/// The textual fast path is tried first. When it misses, the response is
/// parsed in full: an OK result with a crypted string is still a success,
/// anything else becomes [`ConnectorError::PaymentFailed`].
pub fn resolve_encrypt_response(
    raw: &str,
    shop_login: &str,
    payment_page_url: &str,
) -> CustomResult<PaymentRedirect, ConnectorError> {
    if let Some(encrypted) = encrypted_string_fast_path(raw) {
        return Ok(PaymentRedirect {
            url: compose_redirect_url(payment_page_url, shop_login, encrypted),
            encrypted_string: encrypted.to_string(),
        });
    }

    let result = GestpayCryptDecryptResponse::from_soap(raw, SoapOperation::Encrypt)?;

    match result.crypt_decrypt_string() {
        Some(encrypted) if result.is_ok() => {
            warn_log(
                "ENCRYPT_FAST_PATH_MISS",
                &json!("Success marker not matched textually, recovered from parsed response"),
            );
            Ok(PaymentRedirect {
                url: compose_redirect_url(payment_page_url, shop_login, encrypted),
                encrypted_string: encrypted.to_string(),
            })
        }
        _ => {
            let error = result.payment_error();
            warn_log(
                "PAYMENT_FAILED",
                &json!({
                    "transaction_result": result.transaction_result(),
                    "error_code": result.error_code(),
                    "error_description": result.error_description(),
                }),
            );
            Err(report!(error))
        }
    }
}

/// Turns a raw Decrypt response into a [`TransactionOutcome`].
pub fn resolve_decrypt_response(raw: &str) -> CustomResult<TransactionOutcome, ConnectorError> {
    let result = GestpayCryptDecryptResponse::from_soap(raw, SoapOperation::Decrypt)?;

    Ok(TransactionOutcome {
        transaction_result: result.is_ok(),
        shop_transaction_id: result.shop_transaction_id().to_string(),
        error_code: result.error_code().to_string(),
        error_description: result.error_description().to_string(),
        custom_info: result.custom_info(),
        full_response: result.fields(),
    })
}

// =============================================================================
// Callback
// =============================================================================

/// Query string the gateway appends when sending the buyer back.
#[derive(Debug, Default, Deserialize)]
pub struct GestpayCallbackQuery {
    /// Shop login.
    pub a: Option<String>,
    /// Crypted string to decrypt.
    pub b: Option<String>,
}

/// Extracts the crypted string (`b`) from a callback query string.
pub fn crypted_string_from_query(query: &str) -> CustomResult<String, ConnectorError> {
    let query = query.strip_prefix('?').unwrap_or(query);
    let callback: GestpayCallbackQuery = serde_urlencoded::from_str(query)
        .change_context(ConnectorError::RequestEncodingFailed)
        .attach_printable("callback query string is not form encoded")?;

    callback
        .b
        .filter(|crypted| !crypted.is_empty())
        .ok_or_else(missing_field_err(constants::CALLBACK_CRYPTED_STRING_PARAM))
}
