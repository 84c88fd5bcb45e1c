//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Credential checks live here so handlers never compare passwords themselves.
//! The stored password format is decided by the injected `PasswordScheme`.

pub mod domain;
pub mod errors;
pub mod password;
pub mod repository;
pub mod service;
pub mod repo;

pub use password::{PasswordScheme, Plaintext};
pub use service::AuthService;
