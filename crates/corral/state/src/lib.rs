//! Corral State - Desired-state repository boundary
//!
//! The reconciliation core reads environments and revisions through the
//! [`EnvironmentRepository`] trait and never writes them.
//!
//! ## In-Memory vs Persistent
//!
//! [`InMemoryEnvironmentRepository`] is suitable for development and testing.
//! It also implements the writer side of the optimistic concurrency contract
//! (compare-and-swap on the record version) that a persistent backend must
//! honour.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod error;
pub mod memory;
pub mod repository;

pub use error::{RepositoryError, Result};
pub use memory::InMemoryEnvironmentRepository;
pub use repository::EnvironmentRepository;
