//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Registration, login and token decoding live here so that the HTTP layer
//! only deals with transport concerns.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::{decode_token, hash_password, AuthService};
