//! Photo picker grid
//!
//! A recyclable grid cell that shows library thumbnails, a selection badge,
//! a video duration badge and a camera tile, together with the thumbnail
//! cache and media library it draws from.

pub mod config;
pub mod error;
pub mod media;
pub mod state;
pub mod ui;
