// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! Terminal output helpers for the nodeflow CLI

pub mod colors;
pub mod spinner;

pub use colors::*;
pub use spinner::*;
