//! Platform Crate - Technical Infrastructure
//!
//! This crate provides the security primitives of the request gateway:
//! - Byte-level crypto helpers (Base64, constant-time comparison, OS entropy)
//! - Password hashing (Argon2id with fixed parameters, `salt.hash` encoding)
//! - Signed, expiring identity tokens (HS256)
//! - Fixed-window rate limiting with a background reset task
//! - Cookie management and client identification
//! - The ordered request policy pipeline and its generic policies

pub mod client;
pub mod cookie;
pub mod crypto;
pub mod middleware;
pub mod password;
pub mod rate_limit;
pub mod token;
