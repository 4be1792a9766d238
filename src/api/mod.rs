pub mod captures;
pub mod handlers;
pub mod rest;
pub mod types;

pub use rest::{ApiState, RestApi};
