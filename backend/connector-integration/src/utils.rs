use domain_types::errors;

pub mod xml_utils;
pub use xml_utils::{parse_soap_response, strip_soap_prefixes, XmlNode};

pub fn missing_field_err(
    message: &'static str,
) -> Box<dyn Fn() -> error_stack::Report<errors::ConnectorError> + 'static> {
    Box::new(move || {
        errors::ConnectorError::MissingRequiredField {
            field_name: message,
        }
        .into()
    })
}

/// Reads the integer a string starts with, the way loosely typed gateways
/// emit codes such as `"201"` or `" 12 (retry)"`. Anything else reads as zero.
pub fn leading_integer(value: &str) -> i64 {
    let trimmed = value.trim_start();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());

    digits
        .get(..end)
        .and_then(|number| number.parse::<i64>().ok())
        .map(|number| sign * number)
        .unwrap_or(0)
}
