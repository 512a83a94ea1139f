// # ddns-core
//
// Core library for the interval-driven DDNS system.
//
// ## Architecture Overview
//
// This library keeps one DNS address record pointed at the caller's public IP:
// - **IpLocator**: Trait for discovering the current public IP
// - **DnsProvider**: Trait for reading and conditionally rewriting the record
// - **Scheduler**: Restartable periodic trigger with idempotent start/stop
// - **DdnsEngine**: Runs observe → compare → update cycles on the scheduler
//   and owns the service lifecycle
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core logic is separate from backend implementations
// 2. **Idempotency**: The record is written only when its value differs
// 3. **Library-First**: All core functionality can be used as a library
// 4. **Owned lifecycle**: No process-wide timers; each engine owns its scheduler

pub mod traits;
pub mod engine;
pub mod scheduler;
pub mod config;
pub mod error;

// Re-export core types for convenience
pub use traits::{DnsProvider, IpLocator, UpdateResult};
pub use engine::{CycleOutcome, DdnsEngine};
pub use scheduler::Scheduler;
pub use config::{EngineConfig, RecordConfig};
pub use error::{Error, Result};
