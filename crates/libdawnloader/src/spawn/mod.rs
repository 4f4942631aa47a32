//! Module for spawning the external programs the library depends on

pub mod ffmpeg;
pub mod group;
pub mod ytdl;
