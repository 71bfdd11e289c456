// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Browser runtime.
//!
//! The controller knows nothing about the DOM. This is where timers become
//! `setTimeout`, requests become `fetch`, and view calls become element
//! mutations.

pub mod wasm;
