//! Foreman: task assignment and lifecycle workflow engine.
//!
//! This crate implements the core workflow of a staff task-assignment
//! system: the status state machine, the assignment/reassignment protocol,
//! the retry-request escalation path for overdue tasks, and the role-scoped
//! query model. Identity, notification delivery, and presentation are
//! external collaborators behind narrow port interfaces.
//!
//! # Architecture
//!
//! Foreman follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, test
//!   doubles)

pub mod task;
