//! Type system utilities and aliases.
//!
//! ## Modules
//!
//! - [`aliases`]: The `Arc<Mutex<T>>` alias.

pub mod aliases;

pub use aliases::*;
