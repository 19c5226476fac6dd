//! Asynchronous lookup plumbing between the controller and the dictionary store.

pub mod protocol;
pub mod worker;

pub use protocol::{Generation, LookupCommand, LookupResponse};
pub use worker::lookup_worker_loop;
