//! Aurema Admin - staff session gating and authenticated admin API access
//!
//! This crate keeps track of whether the signed-in identity is a staff member
//! and gives the dashboard an authenticated client for the admin backend,
//! including a persisted choice between the production and staging deployments.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
