//! Core business logic for Tripsplit.
//!
//! This crate contains pure business logic with ZERO web dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `settlement` - Balances and debt simplification for shared expenses
//! - `split` - Dividing an expense into per-member shares

pub mod settlement;
pub mod split;
