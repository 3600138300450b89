/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

mod net;
mod primary;

pub use net::{as_upstream_addr, as_url};
pub use primary::{as_nonzero_usize, as_string, as_usize};
