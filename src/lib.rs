// File: lib.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

#![allow(clippy::uninlined_format_args)]

pub mod campaign;
pub mod catalog;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod confirm;
pub mod error;
pub mod report;
pub mod request;
pub mod stats;
pub mod target;
pub mod transport;
