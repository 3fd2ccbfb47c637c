//! Actor-based runtime
//!
//! Each actor runs as an independent async task controlled through a handle
//! that wraps its command channel.
//!
//! ```text
//!            ┌──────────────────┐        ┌──────────────────┐
//!   tick ──→ │  SchedulerActor  │        │  HTTP GET /sfp   │
//!            └────────┬─────────┘        └────────┬─────────┘
//!                     └───────────┬───────────────┘
//!                                 ▼
//!                       Poller::poll_cycle
//!                     (fan-out per switch)
//!                      │                 │
//!              AlertEvent           SnapshotStore
//!                      ▼
//!            ┌──────────────────┐
//!            │    AlertActor    │ → Telegram / Discord / Webhook
//!            └──────────────────┘
//! ```
//!
//! ## Actor Types
//!
//! - **SchedulerActor**: runs a poll cycle on a fixed period
//! - **AlertActor**: delivers alert events to notification channels
//!
//! ## Communication Patterns
//!
//! 1. **Commands**: each actor has an mpsc command channel for control messages
//! 2. **Events**: evaluators push alert events into an unbounded channel
//! 3. **Request/Response**: oneshot channels for synchronous queries

pub mod alert;
pub mod messages;
pub mod scheduler;
