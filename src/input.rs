//! Resource tree input and key normalization.

pub mod normalizer;
pub mod tree;
