//! Localassist - client for a local AI assistant backend

pub mod api;
pub mod cli;
pub mod config;
pub mod controller;
pub mod error;

pub use error::{ClientError, ClientResult};
