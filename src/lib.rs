//! TaskPilot: task assignment and review.
//!
//! Administrators assign tasks with deadlines to workers, workers submit
//! completed work, and administrators approve it or send it back with
//! feedback. This crate holds the rules of that cycle and a client for the
//! HTTP API that stores the authoritative task state.
//!
//! # Architecture
//!
//! TaskPilot follows hexagonal architecture principles:
//!
//! - **Domain**: the task status machine, role-scoped boards and the
//!   deadline urgency classifier, with no infrastructure dependencies
//! - **Ports**: trait interfaces for task storage and HTTP transport
//! - **Adapters**: an in-memory task repository and a `reqwest` transport
//!
//! # Modules
//!
//! - [`task`]: task lifecycle domain, ports, adapters and services
//! - [`api`]: remote API client, session handling and dashboards
//! - [`config`]: layered client configuration

pub mod api;
pub mod config;
pub mod task;
