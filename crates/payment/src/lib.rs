//! Client for the hosted payment gateway.
//!
//! Books are paid for on FedaPay's hosted checkout page: the server creates a
//! gateway transaction, asks for a payment token (which carries the checkout
//! URL) and later retrieves the transaction when the gateway calls back.
//!
//! - [`PaymentGateway`]: the seam the HTTP layer talks to.
//! - [`FedaPayClient`]: the [`reqwest`]-based implementation.

pub mod config;
pub mod fedapay;
pub mod gateway;

pub use config::{FedaPayConfig, FedaPayEnvironment};
pub use fedapay::FedaPayClient;
pub use gateway::{
    Customer, DisabledGateway, GatewayTransaction, NewPayment, PaymentError, PaymentGateway,
    PaymentLink,
};
