//! Contains implementations of the `Board` trait.

/// A `Board` implementation for 9x9 NoGo.
pub mod nogo;
