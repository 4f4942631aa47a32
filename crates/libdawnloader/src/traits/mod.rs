//! Module for the traits at the seams between the workflow and its collaborators

pub mod media_service;
pub mod output_sink;
pub mod progress;
