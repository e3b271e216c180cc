//! # Markio server
//! This crate hosts the HTTP front end of the Markio marketplace payments backend. It is responsible for:
//! * Authenticating requests with bearer access tokens and enforcing role-based access.
//! * Translating requests into calls on the engine's APIs, with SQLite as the backend and Stripe as the payment
//!   processor.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/api/withdraw`: Vendors withdraw their earnings to their bank account.
//! * `/api/basket/add`: Customers add a product to their basket and receive a checkout session.
//! * `/api/balance`: Vendors fetch a summary of their earnings and payouts.
pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod integrations;
pub mod middleware;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
