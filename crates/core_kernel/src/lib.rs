//! Core Kernel - Foundational types shared by every portfolio crate
//!
//! This crate provides the fundamental building blocks used across the workspace:
//! - Typed identifiers for folios, securities, and the composite holding key
//! - Trade date parsing for statement-style dates (`15-Jan-2024`)
//! - Port error types and the marker traits adapters implement

pub mod identifiers;
pub mod temporal;
pub mod ports;

pub use identifiers::{Folio, Isin, HoldingKey, IdentifierError};
pub use temporal::{parse_trade_date, format_trade_date, TemporalError, TRADE_DATE_FORMAT};
pub use ports::{PortError, DomainPort, AdapterHealth, HealthCheckResult, HealthCheckable};
