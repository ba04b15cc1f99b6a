// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 SignalHub

//! SignalHub Web Gateway - Customer-Facing Trading-Signal Web Service
//!
//! This crate fronts the SignalHub backend API for browsers: it serves the
//! routing surface (marketing root, login, dashboard), owns the cookie-based
//! session lifecycle, and proxies dashboard data with the bearer attached.
//!
//! ## Modules
//!
//! - `api` - HTTP handlers (Axum): auth flows, dashboard passthrough, pages
//! - `gate` - edge request gate middleware on the gated routes
//! - `session` - session cookies, validity predicate, resolution, expiry guard
//! - `backend` - client for the remote SignalHub backend API

pub mod api;
pub mod backend;
pub mod config;
pub mod error;
pub mod gate;
pub mod models;
pub mod session;
pub mod state;
