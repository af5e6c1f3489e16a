//! Task assignment and lifecycle workflow.
//!
//! Tasks are created by an authorized assigner with a mandatory assignee,
//! due date, and priority, then move through a constrained lifecycle:
//! `Pending → {InProgress | Rejected}`, `InProgress → Completed`. Overdue
//! pending tasks can re-enter work through an assignee-initiated retry
//! request approved by an assigner. The module follows hexagonal
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
