/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use thiserror::Error;

use crate::HttpLineParseError;

#[derive(Debug, Error)]
pub enum HttpResponseParseError {
    #[error("empty response")]
    Empty,
    #[error("invalid status line: {0}")]
    InvalidStatusLine(#[from] HttpLineParseError),
    #[error("incomplete response header")]
    IncompleteHeader,
}
