// Copyright 2026 Reelstat Contributors
// SPDX-License-Identifier: Apache-2.0

//! Reelstat library — box-office analytics over the highest-grossing
//! films table.
//!
//! Fetches one Wikipedia page, cleans the target wikitable into typed
//! film records, answers four fixed analytical questions, and serves
//! the result over a single HTTP endpoint.

pub mod acquisition;
pub mod analysis;
pub mod chart;
pub mod cli;
pub mod dataset;
pub mod rest;
