//! Data models for polishing recipes
//!
//! This module provides:
//! - Head control modes and cylinder surface sides
//! - Path styles and their family predicates
//! - The [`Craft`] recipe with defaults and validation

pub mod craft;

pub use craft::{Craft, PathStyle, PolishMode, Surface};
