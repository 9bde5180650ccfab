//! Core type definitions for the Review Engine.

pub mod review;

pub use review::*;
