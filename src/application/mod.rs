//! Application layer orchestrating a payment through the connection pool.
//!
//! `PaymentService` is the request handler: it validates the request, waits
//! for a pooled connection, runs the simulated query and always gives the
//! connection back before answering.

pub mod payment;
