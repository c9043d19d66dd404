//! Mailbox actors, shutdown bookkeeping, and cancellable timers.
//!
//! Every piece of UI state in Folio is owned by exactly one actor and only
//! mutated while that actor handles a message, so messages from input
//! readers and timers never interleave mid-update.
pub mod actor;
pub mod builder;
pub mod system;
pub mod timer;
