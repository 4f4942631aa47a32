//! Module for all data structures that get passed between the workflow steps

pub mod metadata;
pub mod mode;
pub mod resolved_media;
pub mod save_directory;
