// src/utils/mod.rs

pub mod admin;
pub mod fingerprint;
pub mod pdf;
