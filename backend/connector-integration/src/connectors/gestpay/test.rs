#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use domain_types::{
        connector_types::{FieldValue, GatewayCredentials, PaymentRequest, RequestFields},
        errors::{ConnectorError, ErrorKind},
    };

    use crate::connectors::gestpay::transformers;

    const PAYMENT_PAGE: &str = "https://sandbox.gestpay.net/pagam/pagam.aspx";

    fn credentials() -> GatewayCredentials {
        GatewayCredentials::new("GESPAY12345", "242")
    }

    fn payment_fields() -> RequestFields {
        RequestFields::new()
            .with("amount", "10.00")
            .with("shopTransactionId", "ORDER-1")
    }

    fn field_names(fields: &RequestFields) -> Vec<&str> {
        fields.iter().map(|(name, _)| name).collect()
    }

    fn crypt_decrypt_envelope(operation: &str, prefix: &str, result_fields: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="utf-8"?>
<{prefix}Envelope xmlns:{ns}="http://schemas.xmlsoap.org/soap/envelope/">
  <{prefix}Body>
    <{operation}Response xmlns="https://ecomm.sella.it/">
      <{operation}Result>
        <GestPayCryptDecrypt xmlns="">
          {result_fields}
        </GestPayCryptDecrypt>
      </{operation}Result>
    </{operation}Response>
  </{prefix}Body>
</{prefix}Envelope>"#,
            ns = prefix.trim_end_matches(':'),
        )
    }

    mod encrypt_request {
        use super::*;

        #[test]
        fn amount_and_transaction_id_present_is_valid() {
            let fields = transformers::build_encrypt_fields(&credentials(), payment_fields());
            assert!(fields.is_ok());
        }

        #[test]
        fn missing_amount_is_a_validation_error() {
            let fields = RequestFields::new().with("shopTransactionId", "ORDER-1");
            let err = transformers::build_encrypt_fields(&credentials(), fields).unwrap_err();

            assert_eq!(
                err.current_context(),
                &ConnectorError::MissingRequiredField {
                    field_name: "amount"
                }
            );
            assert_eq!(err.current_context().kind(), ErrorKind::Validation);
        }

        #[test]
        fn missing_transaction_id_is_a_validation_error() {
            let fields = RequestFields::new().with("amount", "10.00");
            let err = transformers::build_encrypt_envelope(&credentials(), fields).unwrap_err();

            assert_eq!(
                err.current_context(),
                &ConnectorError::MissingRequiredField {
                    field_name: "shopTransactionId"
                }
            );
        }

        #[test]
        fn credentials_come_first_and_api_key_last() {
            let credentials = credentials().with_api_key("secret-key");
            let fields =
                transformers::build_encrypt_fields(&credentials, payment_fields()).unwrap();

            assert_eq!(
                field_names(&fields),
                vec!["shopLogin", "uicCode", "amount", "shopTransactionId", "apikey"]
            );
            assert_eq!(
                fields.get("apikey"),
                Some(&FieldValue::Text("secret-key".to_string()))
            );
        }

        #[test]
        fn empty_api_key_is_not_sent() {
            let credentials = credentials().with_api_key("");
            let fields =
                transformers::build_encrypt_fields(&credentials, payment_fields()).unwrap();

            assert!(!fields.contains("apikey"));
        }

        #[test]
        fn caller_field_replaces_credential_in_place() {
            let fields = payment_fields().with("uicCode", "1");
            let fields = transformers::build_encrypt_fields(&credentials(), fields).unwrap();

            assert_eq!(
                field_names(&fields),
                vec!["shopLogin", "uicCode", "amount", "shopTransactionId"]
            );
            assert_eq!(fields.get("uicCode"), Some(&FieldValue::from("1")));
        }

        #[test]
        fn envelope_contains_escaped_fields_in_order() {
            let fields = RequestFields::new()
                .with("amount", "10.00")
                .with("shopTransactionId", "A&B <1>");
            let envelope = transformers::build_encrypt_envelope(&credentials(), fields).unwrap();

            assert!(envelope.contains(
                "<shopLogin>GESPAY12345</shopLogin><uicCode>242</uicCode>\
                 <amount>10.00</amount><shopTransactionId>A&amp;B &lt;1&gt;</shopTransactionId>"
            ));
            assert!(envelope.contains(r#"<Encrypt xmlns="https://ecomm.sella.it/">"#));
            assert!(!envelope.contains("{request}"));
        }

        #[test]
        fn invalid_field_name_is_rejected() {
            let fields = payment_fields().with("bad name", "x");
            let err = transformers::build_encrypt_envelope(&credentials(), fields).unwrap_err();

            assert_eq!(err.current_context(), &ConnectorError::RequestEncodingFailed);
        }

        #[test]
        fn payment_fields_carry_custom_info_language_and_payment_types() {
            let request = PaymentRequest::new("25.50", "ORDER-2")
                .with_custom_parameter("shop", "mine")
                .with_custom_parameter("note", "hello world")
                .with_language_id("1");
            let payment_types = vec!["CREDITCARD".to_string(), "MYBANK".to_string()];

            let fields = transformers::build_payment_fields(&request, &payment_types);
            let xml = transformers::serialize_fields(&fields).unwrap();

            assert_eq!(
                xml,
                "<amount>25.50</amount><shopTransactionId>ORDER-2</shopTransactionId>\
                 <customInfo>shop=mine*P1*note=hello world</customInfo>\
                 <languageId>1</languageId>\
                 <paymentTypes><paymentType>CREDITCARD</paymentType>\
                 <paymentType>MYBANK</paymentType></paymentTypes>"
            );
        }

        #[test]
        fn list_items_are_escaped_inside_their_parent() {
            let fields = RequestFields::new().with(
                "paymentTypes",
                FieldValue::List {
                    item_tag: "paymentType".to_string(),
                    items: vec!["A&B".to_string(), "<C>".to_string()],
                },
            );

            assert_eq!(
                transformers::serialize_fields(&fields).unwrap(),
                "<paymentTypes><paymentType>A&amp;B</paymentType>\
                 <paymentType>&lt;C&gt;</paymentType></paymentTypes>"
            );
        }

        #[test]
        fn invalid_list_item_tag_is_rejected() {
            let fields = RequestFields::new().with(
                "paymentTypes",
                FieldValue::List {
                    item_tag: "payment type".to_string(),
                    items: vec!["CREDITCARD".to_string()],
                },
            );

            let err = transformers::serialize_fields(&fields).unwrap_err();
            assert_eq!(err.current_context(), &ConnectorError::RequestEncodingFailed);
        }

        #[test]
        fn payment_fields_always_include_custom_info() {
            let fields =
                transformers::build_payment_fields(&PaymentRequest::new("1.00", "ORDER-3"), &[]);

            assert_eq!(
                field_names(&fields),
                vec!["amount", "shopTransactionId", "customInfo"]
            );
            assert_eq!(fields.get("customInfo"), Some(&FieldValue::from("")));
        }
    }

    mod decrypt_request {
        use super::*;

        #[test]
        fn decrypt_fields_skip_currency_code() {
            let credentials = credentials().with_api_key("secret-key");
            let fields = transformers::build_decrypt_fields(&credentials, "CRYPTED");

            assert_eq!(
                field_names(&fields),
                vec!["shopLogin", "CryptedString", "apikey"]
            );
        }

        #[test]
        fn decrypt_envelope_uses_the_decrypt_template() {
            let envelope = transformers::build_decrypt_envelope(&credentials(), "CRYPTED").unwrap();

            assert!(envelope.contains(r#"<Decrypt xmlns="https://ecomm.sella.it/">"#));
            assert!(envelope.contains(
                "<shopLogin>GESPAY12345</shopLogin><CryptedString>CRYPTED</CryptedString>"
            ));
        }
    }

    mod custom_info {
        use std::collections::HashMap;

        use super::*;

        #[test]
        fn round_trips_plain_pairs() {
            let request = PaymentRequest::new("1.00", "ORDER-1")
                .with_custom_parameter("shop", "mine")
                .with_custom_parameter("customer", "42");

            let blob = transformers::encode_custom_info(&request.custom_parameters);
            let decoded = transformers::decode_custom_info(&blob);

            let expected: HashMap<String, String> = request.custom_parameters.into_iter().collect();
            assert_eq!(blob, "shop=mine*P1*customer=42");
            assert_eq!(decoded, expected);
        }

        #[test]
        fn round_trips_values_with_reserved_characters() {
            let request = PaymentRequest::new("1.00", "ORDER-1")
                .with_custom_parameter("email", "a+b@x.com")
                .with_custom_parameter("query", "x&y=z")
                .with_custom_parameter("ref", "v1.2-rc=3")
                .with_custom_parameter("rate", "100%");

            let blob = transformers::encode_custom_info(&request.custom_parameters);
            let decoded = transformers::decode_custom_info(&blob);

            let expected: HashMap<String, String> = request.custom_parameters.into_iter().collect();
            assert_eq!(decoded, expected);
        }

        #[test]
        fn decodes_a_blob_the_gateway_url_encoded_once() {
            let request = PaymentRequest::new("1.00", "ORDER-1")
                .with_custom_parameter("email", "a+b@x.com")
                .with_custom_parameter("note", "hello world");

            let blob = transformers::encode_custom_info(&request.custom_parameters);
            let echoed = urlencoding::encode(&blob);
            let decoded = transformers::decode_custom_info(&echoed);

            assert_eq!(decoded.get("email").map(String::as_str), Some("a+b@x.com"));
            assert_eq!(decoded.get("note").map(String::as_str), Some("hello world"));
        }

        #[test]
        fn decodes_encoded_blobs() {
            let decoded =
                transformers::decode_custom_info("shop%3Dmine%2aP1%2Anote=hello%20world*P1*x=1");

            assert_eq!(decoded.len(), 3);
            assert_eq!(decoded.get("shop").map(String::as_str), Some("mine"));
            assert_eq!(decoded.get("note").map(String::as_str), Some("hello world"));
            assert_eq!(decoded.get("x").map(String::as_str), Some("1"));
        }

        #[test]
        fn last_duplicate_wins() {
            let decoded = transformers::decode_custom_info("k=1*P1*k=2");
            assert_eq!(decoded.get("k").map(String::as_str), Some("2"));
        }

        #[test]
        fn empty_blob_decodes_to_empty_map() {
            assert!(transformers::decode_custom_info("").is_empty());
            assert!(transformers::decode_custom_info("*P1*=orphan").is_empty());
        }
    }

    mod encrypt_response {
        use super::*;

        #[test]
        fn transaction_result_is_case_insensitive() {
            assert!(transformers::is_transaction_ok("OK"));
            assert!(transformers::is_transaction_ok("ok"));
            assert!(transformers::is_transaction_ok("Ok"));
            assert!(!transformers::is_transaction_ok("KO"));
            assert!(!transformers::is_transaction_ok("XX"));
            assert!(!transformers::is_transaction_ok(""));
        }

        #[test]
        fn fast_path_builds_the_redirect() {
            let raw = crypt_decrypt_envelope(
                "Encrypt",
                "soap:",
                "<TransactionResult>OK</TransactionResult>\
                 <CryptDecryptString>ABC123</CryptDecryptString>",
            );

            let redirect =
                transformers::resolve_encrypt_response(&raw, "GESPAY12345", PAYMENT_PAGE).unwrap();

            assert_eq!(
                redirect.url,
                "https://sandbox.gestpay.net/pagam/pagam.aspx?a=GESPAY12345&b=ABC123"
            );
            assert_eq!(redirect.encrypted_string, "ABC123");
        }

        #[test]
        fn parsed_response_recovers_a_lowercase_ok() {
            let raw = crypt_decrypt_envelope(
                "Encrypt",
                "soap:",
                "<TransactionResult>ok</TransactionResult>\
                 <CryptDecryptString>XYZ</CryptDecryptString>",
            );

            let redirect =
                transformers::resolve_encrypt_response(&raw, "GESPAY12345", PAYMENT_PAGE).unwrap();

            assert_eq!(redirect.encrypted_string, "XYZ");
        }

        #[test]
        fn gateway_error_becomes_a_payment_error() {
            let raw = crypt_decrypt_envelope(
                "Encrypt",
                "soap:",
                "<TransactionType>ENCRYPT</TransactionType>\
                 <TransactionResult>KO</TransactionResult>\
                 <CryptDecryptString />\
                 <ErrorCode>201</ErrorCode>\
                 <ErrorDescription>Invalid Shop Login</ErrorDescription>",
            );

            let err = transformers::resolve_encrypt_response(&raw, "BAD", PAYMENT_PAGE).unwrap_err();

            assert_eq!(
                err.current_context(),
                &ConnectorError::PaymentFailed {
                    description: "Invalid Shop Login".to_string(),
                    code: "201".to_string(),
                    numeric_code: 201,
                }
            );
            assert_eq!(err.current_context().kind(), ErrorKind::Payment);
            assert_eq!(
                err.current_context().to_string(),
                "Invalid Shop Login (Code: 201)"
            );
        }

        #[test]
        fn ok_without_crypted_string_is_a_payment_error() {
            let raw = crypt_decrypt_envelope(
                "Encrypt",
                "soap:",
                "<TransactionResult>OK</TransactionResult>",
            );

            let err = transformers::resolve_encrypt_response(&raw, "GESPAY12345", PAYMENT_PAGE)
                .unwrap_err();

            assert_eq!(
                err.current_context(),
                &ConnectorError::PaymentFailed {
                    description: "No error message".to_string(),
                    code: "No error code".to_string(),
                    numeric_code: 0,
                }
            );
        }

        #[test]
        fn malformed_body_is_a_parse_error() {
            let err =
                transformers::resolve_encrypt_response("<html>oops", "GESPAY12345", PAYMENT_PAGE)
                    .unwrap_err();

            assert_eq!(err.current_context().kind(), ErrorKind::Parse);
        }

        #[test]
        fn well_formed_body_without_result_node_is_a_parse_error() {
            let raw = "<soap:Envelope><soap:Body><Fault>boom</Fault></soap:Body></soap:Envelope>";
            let err =
                transformers::resolve_encrypt_response(raw, "GESPAY12345", PAYMENT_PAGE).unwrap_err();

            assert_eq!(
                err.current_context(),
                &ConnectorError::MissingResultNode {
                    operation: "Encrypt"
                }
            );
            assert_eq!(err.current_context().kind(), ErrorKind::Parse);
        }
    }

    mod decrypt_response {
        use serde_json::json;

        use super::*;

        const DECRYPT_RESULT: &str = "<TransactionType>DECRYPT</TransactionType>\
             <TransactionResult>OK</TransactionResult>\
             <ShopTransactionID>ORDER-1</ShopTransactionID>\
             <BankTransactionID>987</BankTransactionID>\
             <AuthorizationCode>A1B2</AuthorizationCode>\
             <Currency>242</Currency>\
             <Amount>10.00</Amount>\
             <CustomInfo>shop%3Dmine%2AP1%2Anote%3Dhello+world</CustomInfo>\
             <Buyer><BuyerName>Ann</BuyerName><BuyerEmail /></Buyer>\
             <ErrorCode>0</ErrorCode>\
             <ErrorDescription>Transaction correctly processed</ErrorDescription>";

        #[test]
        fn prefixed_and_plain_responses_resolve_the_same() {
            let prefixed = crypt_decrypt_envelope("Decrypt", "SOAP-ENV:", DECRYPT_RESULT);
            let plain = crypt_decrypt_envelope("Decrypt", "soap:", DECRYPT_RESULT);

            let prefixed = transformers::resolve_decrypt_response(&prefixed).unwrap();
            let plain = transformers::resolve_decrypt_response(&plain).unwrap();

            assert_eq!(prefixed, plain);
        }

        #[test]
        fn outcome_exposes_result_fields_and_custom_info() {
            let raw = crypt_decrypt_envelope("Decrypt", "SOAP-ENV:", DECRYPT_RESULT);
            let outcome = transformers::resolve_decrypt_response(&raw).unwrap();

            assert!(outcome.is_success());
            assert_eq!(outcome.shop_transaction_id, "ORDER-1");
            assert_eq!(outcome.error_code, "0");
            assert_eq!(
                outcome.custom_info.get("shop").map(String::as_str),
                Some("mine")
            );
            assert_eq!(
                outcome.custom_info.get("note").map(String::as_str),
                Some("hello world")
            );
            assert_eq!(outcome.field("BankTransactionID"), Some(&json!("987")));
            assert_eq!(
                outcome.field("Buyer"),
                Some(&json!({ "BuyerName": "Ann", "BuyerEmail": "" }))
            );
        }

        #[test]
        fn ko_result_is_a_failed_transaction_not_an_error() {
            let raw = crypt_decrypt_envelope(
                "Decrypt",
                "soap:",
                "<TransactionResult>KO</TransactionResult>\
                 <ShopTransactionID>ORDER-1</ShopTransactionID>\
                 <ErrorCode>1142</ErrorCode>\
                 <ErrorDescription>Call not accepted</ErrorDescription>",
            );

            let outcome = transformers::resolve_decrypt_response(&raw).unwrap();

            assert!(!outcome.is_success());
            assert_eq!(outcome.error_code, "1142");
            assert_eq!(outcome.error_description, "Call not accepted");
            assert!(outcome.custom_info.is_empty());
        }

        #[test]
        fn encrypt_shaped_response_lacks_the_decrypt_node() {
            let raw = crypt_decrypt_envelope("Encrypt", "soap:", DECRYPT_RESULT);
            let err = transformers::resolve_decrypt_response(&raw).unwrap_err();

            assert_eq!(
                err.current_context(),
                &ConnectorError::MissingResultNode {
                    operation: "Decrypt"
                }
            );
        }
    }

    mod callback {
        use super::*;

        #[test]
        fn reads_b_from_the_query_string() {
            assert_eq!(
                transformers::crypted_string_from_query("?a=GESPAY12345&b=AB%2BC").unwrap(),
                "AB+C"
            );
            assert_eq!(
                transformers::crypted_string_from_query("b=XYZ").unwrap(),
                "XYZ"
            );
        }

        #[test]
        fn missing_or_empty_b_is_a_validation_error() {
            for query in ["a=GESPAY12345", "a=GESPAY12345&b=", ""] {
                let err = transformers::crypted_string_from_query(query).unwrap_err();
                assert_eq!(
                    err.current_context(),
                    &ConnectorError::MissingRequiredField { field_name: "b" },
                    "query: {query:?}"
                );
            }
        }
    }

    mod headers {
        use domain_types::connector_types::SoapOperation;

        use crate::connectors::GestpayClient;

        #[test]
        fn soap_action_names_the_operation() {
            let headers = GestpayClient::get_headers(SoapOperation::Decrypt, 120);

            assert!(headers.contains(&(
                "SOAPAction".to_string(),
                "\"https://ecomm.sella.it/Decrypt\"".to_string()
            )));
            assert!(headers.contains(&("Content-Length".to_string(), "120".to_string())));
            assert!(headers.contains(&(
                "Content-Type".to_string(),
                "text/xml; charset=utf-8".to_string()
            )));
        }
    }
}
