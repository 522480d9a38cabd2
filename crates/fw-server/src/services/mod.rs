//! Filename rewriting pipeline: validate, normalise, resolve.

pub mod artifact;
pub mod boards;
pub mod naming;
pub mod release;
