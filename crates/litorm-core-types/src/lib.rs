//! Core types shared across litorm facilities
//!
//! This crate provides the canonical field keys and event names used by the
//! logging facility and by anything asserting on captured log events.

pub mod schema;
