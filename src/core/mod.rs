//! Core markup scanning primitives
//!
//! This module contains the fundamental building blocks for markup parsing:
//! - Scanner: SIMD-accelerated delimiter detection using memchr
//! - Position: lazy line/column tracking and nested-region offsets
//! - Attributes: attribute and inner-whitespace parts of start tags
//! - Tokenizer: pull tokenizer producing borrowed tokens

pub mod attributes;
pub mod position;
pub mod scanner;
pub mod tokenizer;

pub use attributes::{QuoteStyle, TagAttribute, TagPart};
pub use position::{Position, PositionOffset};
pub use tokenizer::{ParseError, Token, Tokenizer};
