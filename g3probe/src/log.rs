/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use slog::{Drain, slog_o};
use slog_scope::GlobalLoggerGuard;

use g3_stdlog::StdLogConfig;

const PROCESS_LOG_THREAD_NAME: &str = "log-process";

pub fn setup(verbose_level: u8) -> Result<GlobalLoggerGuard, log::SetLoggerError> {
    let mut config = StdLogConfig::default();
    config.set_thread_name(PROCESS_LOG_THREAD_NAME.to_string());
    config.set_append_code_position(verbose_level > 2);
    let drain = g3_stdlog::new_async_logger(&config);
    let logger = slog::Logger::root(drain.fuse(), slog_o!());

    let scope_guard = slog_scope::set_global_logger(logger);

    let log_level = match verbose_level {
        0 => log::Level::Warn,
        1 => log::Level::Info,
        2 => log::Level::Debug,
        _ => log::Level::Trace,
    };

    slog_stdlog::init_with_level(log_level)?;
    Ok(scope_guard)
}
