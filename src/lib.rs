//! Survey Engagement - rider feedback surveys for a transit app.
//!
//! This crate decides whether to show a survey, drives the hero-question and
//! remaining-questions flow, submits answers to the survey backend, and turns
//! transport failures into messages a rider can act on.
//!
//! # Layout
//!
//! - `domain` - survey values, the error classifier, the external survey URL
//!   builder, the prioritizer and the flow vocabulary
//! - `ports` - traits for the backend, state storage and host context
//! - `adapters` - HTTP, file and in-memory implementations of the ports
//! - `application` - state manager facade and flow controller
//! - `config` - environment-driven configuration
//! - `telemetry` - tracing subscriber setup

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
