// src/handlers/mod.rs

pub mod admin;
pub mod generate;
pub mod quiz;
pub mod submission;
