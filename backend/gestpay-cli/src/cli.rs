use std::path::PathBuf;

use common_utils::errors::CustomResult;
use connector_integration::connectors::GestpayClient;
use domain_types::connector_types::PaymentRequest;
use error_stack::ResultExt;

use crate::{configs::Config, error::CommandError};

/// Starts hosted-page payments with Gestpay and checks their outcome.
#[derive(clap::Parser, Debug)]
#[command(name = "gestpay", version, arg_required_else_help = true)]
pub struct Args {
    /// Configuration file to use instead of the environment default.
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Encrypt a payment and print the payment page URL.
    Pay(PayArgs),
    /// Decrypt the query string the gateway redirected back with and print the outcome.
    Check(CheckArgs),
}

#[derive(clap::Args, Debug)]
pub struct PayArgs {
    /// Amount with a point as decimal separator, e.g. `10.00`.
    #[arg(long)]
    pub amount: String,

    /// Merchant-side identifier of the transaction.
    #[arg(long)]
    pub transaction_id: String,

    /// Custom parameter echoed back in `CustomInfo`, as `key=value`. Repeatable.
    #[arg(long = "custom", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub custom_parameters: Vec<(String, String)>,

    /// Language of the payment page.
    #[arg(long)]
    pub language_id: Option<String>,

    /// Payment method offered on the payment page, e.g. `CREDITCARD`. Repeatable.
    #[arg(long = "payment-type", value_name = "TYPE")]
    pub payment_types: Vec<String>,

    /// Shop login overriding the configured one.
    #[arg(long)]
    pub shop_login: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct CheckArgs {
    /// Query string received on the return URL, e.g. `a=SHOP&b=...`.
    #[arg(long)]
    pub query: String,

    /// Shop login overriding the configured one.
    #[arg(long)]
    pub shop_login: Option<String>,
}

fn parse_key_value(value: &str) -> Result<(String, String), String> {
    value
        .split_once('=')
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got `{value}`"))
}

impl PayArgs {
    fn payment_request(&self) -> PaymentRequest {
        let request = self.custom_parameters.iter().fold(
            PaymentRequest::new(self.amount.as_str(), self.transaction_id.as_str()),
            |request, (key, value)| request.with_custom_parameter(key.as_str(), value.as_str()),
        );

        match &self.language_id {
            Some(language_id) => request.with_language_id(language_id.as_str()),
            None => request,
        }
    }
}

/// Runs `command` against the configured gateway and returns what should be
/// printed: the redirect URL for `pay`, the outcome as JSON for `check`.
pub async fn run(command: Command, config: &Config) -> CustomResult<String, CommandError> {
    let client = GestpayClient::new(
        config.gestpay.credentials(),
        config.gestpay.mode(),
        &config.connector,
    )
    .change_context(CommandError::ClientSetupFailed)?;

    match command {
        Command::Pay(args) => {
            let mut client = args
                .payment_types
                .iter()
                .fold(client, |client, payment_type| {
                    client.add_payment_type(payment_type.as_str())
                });

            let redirect = client
                .pay(args.payment_request(), args.shop_login.as_deref())
                .await
                .change_context(CommandError::GatewayRequestFailed)?;

            Ok(redirect.url)
        }
        Command::Check(args) => {
            let mut client = client;
            let outcome = client
                .check_response(&args.query, args.shop_login.as_deref())
                .await
                .change_context(CommandError::GatewayRequestFailed)?;

            serde_json::to_string_pretty(&outcome)
                .change_context(CommandError::OutputRenderingFailed)
        }
    }
}
