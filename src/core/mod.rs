//! Core: shared constants

pub mod chain;
