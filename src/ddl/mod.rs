pub mod generator;
pub mod validator;

pub use validator::{validate, Diagnostic};
