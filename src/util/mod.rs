//! Shared helpers
//!
//! - `text`: case-aware comparison and hashing over character sequences

pub mod text;
