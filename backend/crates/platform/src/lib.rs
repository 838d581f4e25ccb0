//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (SHA-256, HMAC, constant-time compare)
//! - Password codec (salted SHA-256, `"<hex>|<salt>"`)
//! - Signed token codec (`"<value>|<hmac>"`) for tamper-evident cookies
//! - Cookie management

pub mod cookie;
pub mod crypto;
pub mod password;
pub mod signed;
