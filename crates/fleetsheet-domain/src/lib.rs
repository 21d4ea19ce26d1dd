//! Fleetsheet domain layer
//!
//! Pure reconciliation and report logic. Network and file access live behind
//! the traits in [`repository`].

pub mod model;
pub mod repository;
pub mod service;
