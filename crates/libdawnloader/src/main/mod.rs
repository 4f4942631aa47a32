//! Module for all the main functionality in the library (to keep everything sorted)
pub mod download;
pub mod query;
pub mod request;
pub mod resolve;
pub mod service;
pub mod worker;
