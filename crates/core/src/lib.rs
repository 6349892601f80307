//! Core types for driving FMI 2.0 models from Rust.
//!
//! This crate defines the contracts that the stepping engine builds on:
//!
//! - [`Instance`] and [`ModelExchange`]: the primitive native operations a
//!   loaded model exposes, each reporting a [`Status`]
//! - [`EventInfo`] and [`CompletedIntegratorStep`]: the records exchanged
//!   with the model during event handling
//! - [`Observer`]: receives driver events and optionally returns control actions
//! - [`model`]: the immutable model description with typed variables, dependency
//!   metadata, and capability flags
//!
//! Loading the native library and reading the model description from disk are
//! left to the caller. Anything that implements [`ModelExchange`] can be driven.

mod event_info;
mod instance;
pub mod model;
mod observer;
mod status;

pub use event_info::{CompletedIntegratorStep, EventInfo};
pub use instance::{Instance, ModelExchange, ValueReference};
pub use observer::Observer;
pub use status::Status;
