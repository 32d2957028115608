//! Runtime values and per-evaluation bindings.
//!
//! Values are plain data with no callable variant: a value
//! can be pushed, compared and indexed, never invoked.

mod bindings;
mod value;

#[cfg(test)]
mod value_test;

pub use bindings::Bindings;
pub use value::Value;
