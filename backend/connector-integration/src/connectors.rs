pub mod gestpay;

pub use self::gestpay::GestpayClient;
