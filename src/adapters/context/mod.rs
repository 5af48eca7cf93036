//! Context Adapters
//!
//! Host-driven implementations of the `ApplicationContext` and
//! `CellularDataMonitor` ports.

mod static_context;

pub use static_context::{StaticApplicationContext, StaticCellularDataMonitor};
