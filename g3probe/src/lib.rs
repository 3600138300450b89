/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

mod opts;

pub mod batch;
pub mod build;
pub mod command;
pub mod config;
pub mod log;
pub mod probe;
pub mod report;
pub mod target;

pub use opts::{ProcArgs, add_global_args, parse_global_args};
