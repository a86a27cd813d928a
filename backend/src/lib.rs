//! Meal Planner Backend Library
//!
//! This library exposes the backend modules for use in tests and the binary.

pub mod config;
pub mod error;
pub mod planner;
pub mod recipes;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;
pub mod store;
