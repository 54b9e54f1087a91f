/// Media access module
///
/// This module handles:
/// - The shared thumbnail cache (memory, disk and decode tiers)
/// - Reading video durations from container headers

pub mod cache;
pub mod probe;
