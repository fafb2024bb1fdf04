//! Infrastructure Layer
//!
//! Account repository implementations.

pub mod memory;
