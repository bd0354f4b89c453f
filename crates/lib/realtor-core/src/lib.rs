//! Core types and services for realtor-mcp.
//!
//! This crate validates property search arguments into [`SearchParameters`]
//! and forwards them to the remote property API through
//! [`PropertySearchClient`].

pub mod client;
pub mod params;

pub use client::{PropertySearchClient, SearchClientConfig, SearchError};
pub use params::{MaxPrice, SearchArgs, SearchCenter, SearchParameters, ValidationError};
