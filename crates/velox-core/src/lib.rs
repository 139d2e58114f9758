//! Core types for the velox routing and dispatch framework.
//!
//! This crate provides the fundamental building blocks:
//! - [`Request`], [`Method`], [`Headers`] and the [`ResponseTransport`] seam
//! - [`ResponseHandle`] — the finalize-once response wrapper with send helpers
//! - [`RouteContext`] — per-request params, query and typed extensions
//! - [`HandlerChain`] and the continuation-passing dispatch executor
//!
//! # Design Principles
//!
//! - The core never parses or formats wire bytes; the transport collaborator
//!   owns the socket and hands in a [`ResponseTransport`]
//! - Dispatch is runtime-agnostic: every async seam is `std::future` behind
//!   [`BoxFuture`]
//! - All shared state is request-scoped; nothing global is touched during
//!   matching or dispatch

#![forbid(unsafe_code)]

mod context;
mod dispatch;
mod error;
mod handler;
pub mod logging;
mod query;
mod request;
mod response;
pub mod testing;

pub use context::RouteContext;
pub use dispatch::{Next, dispatch};
pub use error::HandlerError;
pub use handler::{
    BoxFuture, BoxHandler, BoxMiddleware, HandlerChain, HandlerResult, handler_fn, middleware_fn,
};
pub use logging::{LogEntry, LogLevel};
pub use query::{QueryParams, percent_decode};
pub use request::{Body, Headers, Method, Request};
pub use response::{ResponseHandle, ResponseTransport, StatusCode};
