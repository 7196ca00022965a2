//! # integration-tests
//!
//! End-to-end coverage for the campus feed client. The crate body holds an
//! in-process stub of the backend speaking the real envelope contract over
//! HTTP; the tests in `tests/` drive the reqwest adapter and the feed
//! controller against it.

pub mod stub_backend;
