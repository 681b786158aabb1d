//! Unit tests module
//!
//! Contains unit tests for individual components driven by the fake host.

mod cache; // eviction order under realistic capture times
mod engine; // fetch coordination without the controller
mod markup; // the fake host's own markup round trip
