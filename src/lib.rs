//! # EcoTrack client
//!
//! `ecotrack` is a native client for the EcoTrack environmental-monitoring
//! API. The interesting part is not the data plumbing but the session and
//! access-control core every call runs through:
//!
//! - [`session`] — the single source of truth for authentication state.
//!   A [`session::Session`] is either anonymous or authenticated; the
//!   authenticated arm carries the bearer credential together with the
//!   principal it belongs to, so the two can never diverge. The
//!   [`session::SessionStore`] serializes every mutation, persists the
//!   record to one well-known file, and publishes each transition to
//!   subscribers in order.
//! - [`api`] — the request authorizer. Every outbound call is stamped with
//!   the current credential and every response status is classified into
//!   one [`api::error::ApiError`] variant. A `401` forces a logout through
//!   the store before the error reaches the caller; a `403` never does
//!   (being authenticated with too little privilege is not an expired
//!   credential).
//! - [`router`] — pure guard predicates over `(Session, Route)` plus a
//!   router that waits for session bootstrap before evaluating them, so a
//!   guard never sees a mid-restoration session.
//! - [`cli`] — the thin command-line surface over the core.
//!
//! ## Session lifecycle
//!
//! A persisted session is restored once at startup and is presumptive: it
//! is not re-validated eagerly, but the first authenticated request that
//! comes back `401` clears it, removes the record, and the next guarded
//! navigation redirects to login. Logout is a one-way transition; in-flight
//! requests finishing afterwards cannot resurrect the old session.

pub mod api;
pub mod cli;
pub mod router;
pub mod session;
