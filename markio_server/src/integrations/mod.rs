//! Payment processor gateways for the engine's [`markio_engine::traits::PaymentProcessor`] and
//! [`markio_engine::traits::CheckoutProcessor`] contracts.
pub mod stripe;
