pub(crate) const ENCRYPT_TEMPLATE: &str = include_str!("xml/encrypt.xml");
pub(crate) const DECRYPT_TEMPLATE: &str = include_str!("xml/decrypt.xml");
/// Token replaced by the serialized fields in both templates.
pub(crate) const REQUEST_PLACEHOLDER: &str = "{request}";

/// Namespace the SOAPAction header is built from.
pub(crate) const SOAP_ACTION_NAMESPACE: &str = "https://ecomm.sella.it/";

pub(crate) const CUSTOM_INFO_SEPARATOR: &str = "*P1*";

/// Query parameter carrying the crypted string on the buyer's way back.
pub(crate) const CALLBACK_CRYPTED_STRING_PARAM: &str = "b";

pub(crate) mod request_fields {
    pub(crate) const SHOP_LOGIN: &str = "shopLogin";
    pub(crate) const UIC_CODE: &str = "uicCode";
    pub(crate) const API_KEY: &str = "apikey";
    pub(crate) const AMOUNT: &str = "amount";
    pub(crate) const SHOP_TRANSACTION_ID: &str = "shopTransactionId";
    pub(crate) const CUSTOM_INFO: &str = "customInfo";
    pub(crate) const LANGUAGE_ID: &str = "languageId";
    pub(crate) const PAYMENT_TYPES: &str = "paymentTypes";
    pub(crate) const PAYMENT_TYPE: &str = "paymentType";
    pub(crate) const CRYPTED_STRING: &str = "CryptedString";
}

pub(crate) mod response_fields {
    pub(crate) const BODY: &str = "Body";
    pub(crate) const RESULT_NODE: &str = "GestPayCryptDecrypt";
    pub(crate) const TRANSACTION_RESULT: &str = "TransactionResult";
    pub(crate) const CRYPT_DECRYPT_STRING: &str = "CryptDecryptString";
    pub(crate) const SHOP_TRANSACTION_ID: &str = "ShopTransactionID";
    pub(crate) const ERROR_CODE: &str = "ErrorCode";
    pub(crate) const ERROR_DESCRIPTION: &str = "ErrorDescription";
    pub(crate) const CUSTOM_INFO: &str = "CustomInfo";
}
