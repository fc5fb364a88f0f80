use std::collections::HashMap;

use hyperswitch_masking::{PeekInterface, Secret};
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Merchant identity presented to the gateway on every call.
#[derive(Clone, Debug)]
pub struct GatewayCredentials {
    pub shop_login: String,
    /// Gestpay "uicCode", e.g. `242` for EUR.
    pub currency_code: String,
    api_key: Option<Secret<String>>,
}

impl GatewayCredentials {
    pub fn new(shop_login: impl Into<String>, currency_code: impl Into<String>) -> Self {
        Self {
            shop_login: shop_login.into(),
            currency_code: currency_code.into(),
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.set_api_key(api_key);
        self
    }

    pub fn set_api_key(&mut self, api_key: impl Into<String>) {
        self.api_key = Some(Secret::new(api_key.into()));
    }

    /// The configured API key, ignoring an empty one.
    pub fn api_key(&self) -> Option<&Secret<String>> {
        self.api_key
            .as_ref()
            .filter(|api_key| !api_key.peek().is_empty())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, serde::Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GatewayMode {
    #[default]
    Test,
    Production,
}

impl GatewayMode {
    pub fn from_test_flag(test: bool) -> Self {
        if test {
            Self::Test
        } else {
            Self::Production
        }
    }
}

/// The two remote operations exposed by the crypt/decrypt web service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::IntoStaticStr)]
pub enum SoapOperation {
    Encrypt,
    Decrypt,
}

/// Value of a single request field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    /// Rendered as one `<item_tag>` child per item inside the field's own tag.
    List { item_tag: String, items: Vec<String> },
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Ordered field name → value mapping serialized into the request envelope.
///
/// Re-inserting an existing name replaces its value without moving it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestFields(IndexMap<String, FieldValue>);

impl RequestFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> &mut Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Appends every field of `other`; names already present keep their position.
    pub fn extend(&mut self, other: Self) {
        self.0.extend(other.0);
    }
}

/// Input of a hosted-page payment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PaymentRequest {
    /// No thousands separator, at most two decimals separated by a point.
    pub amount: String,
    pub shop_transaction_id: String,
    pub custom_parameters: IndexMap<String, String>,
    pub language_id: Option<String>,
}

impl PaymentRequest {
    pub fn new(amount: impl Into<String>, shop_transaction_id: impl Into<String>) -> Self {
        Self {
            amount: amount.into(),
            shop_transaction_id: shop_transaction_id.into(),
            ..Default::default()
        }
    }

    pub fn with_custom_parameter(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.custom_parameters.insert(name.into(), value.into());
        self
    }

    pub fn with_language_id(mut self, language_id: impl Into<String>) -> Self {
        self.language_id = Some(language_id.into());
        self
    }
}

/// Where to send the buyer after a successful Encrypt call.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct PaymentRedirect {
    pub url: String,
    pub encrypted_string: String,
}

/// Interpreted result of a Decrypt call.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TransactionOutcome {
    pub transaction_result: bool,
    pub shop_transaction_id: String,
    pub error_code: String,
    pub error_description: String,
    pub custom_info: HashMap<String, String>,
    /// Every field of the gateway result node, for values not interpreted above.
    pub full_response: Map<String, Value>,
}

impl TransactionOutcome {
    pub fn is_success(&self) -> bool {
        self.transaction_result
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.full_response.get(name)
    }
}
