//! Quotation Service - solar system pricing, bill-of-materials generation and
//! versioned quotations.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod startup;
