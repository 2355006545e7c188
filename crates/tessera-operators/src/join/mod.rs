//! Join operators.

pub mod nested_loop;

pub use nested_loop::Join;
