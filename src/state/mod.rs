/// State management module
///
/// This module handles the picker's data source:
/// - What a grid cell can display (item.rs)
/// - Catalog records (data.rs)
/// - The SQLite media library (library.rs)

pub mod data;
pub mod item;
pub mod library;
