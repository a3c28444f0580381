//! Onboarding daemon library - exposes modules for testing.

pub mod config;
pub mod delivery;
pub mod routes;
pub mod server;
pub mod service;
pub mod store;

pub use server::{router, AppState};
pub use store::Store;
