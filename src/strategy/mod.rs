//! Parsing Strategy Module
//!
//! - Single document: [`MarkupParser`](crate::parser::MarkupParser) directly
//! - Many documents: [`parallel`], one shared parser on the Rayon pool

pub mod parallel;

pub use parallel::{parse_all, parse_all_with_logic, parse_each, Document};
