//! Authgate Library
//!
//! Cookie-session access gate with pluggable credential backends: a fixed
//! environment credential pair, or a Firebase identity provider.

pub mod api;
pub mod auth;
pub mod identity;
