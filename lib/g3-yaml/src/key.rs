/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

/// Keys are case insensitive, and '-' is the same as '_'
pub fn normalize(raw: &str) -> String {
    raw.to_lowercase().replace('-', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t() {
        assert_eq!(normalize("Trace-Path"), "trace_path");
        assert_eq!(normalize("IP_LOCATE"), "ip_locate");
        assert_eq!(normalize("max-response_size"), "max_response_size");
    }
}
