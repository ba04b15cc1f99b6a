// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 SignalHub

//! Page shell handlers.
//!
//! The gateway serves minimal HTML shells for the routing surface the gate
//! operates on; the page content itself is rendered client-side and is out
//! of scope here.

use axum::response::Html;

pub async fn index() -> Html<&'static str> {
    Html(
        "<!doctype html><html><head><title>SignalHub</title></head>\
         <body><main id=\"app\" data-page=\"index\"></main></body></html>",
    )
}

pub async fn login() -> Html<&'static str> {
    Html(
        "<!doctype html><html><head><title>Sign in - SignalHub</title></head>\
         <body><main id=\"app\" data-page=\"login\"></main></body></html>",
    )
}

pub async fn dashboard() -> Html<&'static str> {
    Html(
        "<!doctype html><html><head><title>Dashboard - SignalHub</title></head>\
         <body><main id=\"app\" data-page=\"dashboard\"></main></body></html>",
    )
}
