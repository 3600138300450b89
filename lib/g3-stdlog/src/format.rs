/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::fmt::{self, Write};

use slog::{KV, Key, OwnedKVList, Record, Serializer};

use super::StdLogValue;

#[derive(Default)]
struct KvCollector {
    kv_pairs: Vec<(String, String)>,
}

impl Serializer for KvCollector {
    fn emit_arguments(&mut self, key: Key, val: &fmt::Arguments) -> slog::Result {
        self.kv_pairs.push((key.to_string(), val.to_string()));
        Ok(())
    }
}

pub(crate) struct StdLogFormatter {
    append_code_position: bool,
}

impl StdLogFormatter {
    pub(crate) fn new(append_code_position: bool) -> Self {
        StdLogFormatter {
            append_code_position,
        }
    }

    pub(crate) fn format(&self, record: &Record, logger_values: &OwnedKVList) -> StdLogValue {
        let mut collector = KvCollector::default();
        // errors from the serializer are never returned by the collector
        let _ = logger_values.serialize(record, &mut collector);
        let _ = record.kv().serialize(record, &mut collector);

        let mut message = String::new();
        let _ = write!(message, "{}", record.msg());

        let location = if self.append_code_position {
            Some(format!("{}:{}", record.file(), record.line()))
        } else {
            None
        };

        StdLogValue {
            level: record.level(),
            message,
            kv_pairs: collector.kv_pairs,
            location,
        }
    }
}
