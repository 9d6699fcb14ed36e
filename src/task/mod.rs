//! Task review lifecycle.
//!
//! Admins assign tasks to workers, workers submit completed work, and admins
//! approve or reject it. A rejected task goes back to the worker, who may
//! resubmit; an approved task is final. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
