/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::io;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint, value_parser};
use tokio::runtime::Runtime;

use crate::config::ProbeConfig;
use crate::report::ReportFormat;

const GLOBAL_ARG_VERBOSE: &str = "verbose";
const GLOBAL_ARG_CONFIG: &str = "config";
const GLOBAL_ARG_CONCURRENCY: &str = "concurrency";
const GLOBAL_ARG_THREADS: &str = "threads";
const GLOBAL_ARG_JSON: &str = "json";

#[derive(Default)]
pub struct ProcArgs {
    verbose_level: u8,
    probe_config: ProbeConfig,
    threads: Option<NonZeroUsize>,
    pub(crate) report_format: ReportFormat,
}

impl ProcArgs {
    #[inline]
    pub fn verbose_level(&self) -> u8 {
        self.verbose_level
    }

    #[inline]
    pub fn probe_config(&self) -> &ProbeConfig {
        &self.probe_config
    }

    /// A current thread runtime unless more threads are requested
    pub fn main_runtime(&self) -> io::Result<Runtime> {
        match self.threads {
            Some(n) if n.get() > 1 => tokio::runtime::Builder::new_multi_thread()
                .worker_threads(n.get())
                .thread_name("probe-worker")
                .enable_all()
                .build(),
            _ => tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build(),
        }
    }
}

pub fn add_global_args(app: Command) -> Command {
    app.arg(
        Arg::new(GLOBAL_ARG_VERBOSE)
            .help("Show verbose output")
            .short('v')
            .long(GLOBAL_ARG_VERBOSE)
            .global(true)
            .action(ArgAction::Count),
    )
    .arg(
        Arg::new(GLOBAL_ARG_CONFIG)
            .help("Probe config file")
            .value_name("CONFIG FILE")
            .short('c')
            .long(GLOBAL_ARG_CONFIG)
            .global(true)
            .num_args(1)
            .value_hint(ValueHint::FilePath)
            .value_parser(value_parser!(PathBuf)),
    )
    .arg(
        Arg::new(GLOBAL_ARG_CONCURRENCY)
            .help("Number of probes to run at a time")
            .value_name("CONCURRENCY COUNT")
            .long(GLOBAL_ARG_CONCURRENCY)
            .global(true)
            .num_args(1)
            .value_parser(value_parser!(NonZeroUsize)),
    )
    .arg(
        Arg::new(GLOBAL_ARG_THREADS)
            .help("Number of threads")
            .value_name("THREAD NUMBER")
            .long(GLOBAL_ARG_THREADS)
            .global(true)
            .num_args(1)
            .value_parser(value_parser!(NonZeroUsize)),
    )
    .arg(
        Arg::new(GLOBAL_ARG_JSON)
            .help("Output results as json lines")
            .long(GLOBAL_ARG_JSON)
            .global(true)
            .action(ArgAction::SetTrue),
    )
}

pub fn parse_global_args(args: &ArgMatches) -> anyhow::Result<ProcArgs> {
    let mut proc_args = ProcArgs {
        verbose_level: args.get_count(GLOBAL_ARG_VERBOSE),
        ..Default::default()
    };

    if let Some(path) = args.get_one::<PathBuf>(GLOBAL_ARG_CONFIG) {
        proc_args.probe_config = ProbeConfig::load_file(path)
            .context(format!("failed to load config file {}", path.display()))?;
    }
    if let Some(n) = args.get_one::<NonZeroUsize>(GLOBAL_ARG_CONCURRENCY) {
        proc_args.probe_config.set_concurrency(*n);
    }
    if let Some(n) = args.get_one::<NonZeroUsize>(GLOBAL_ARG_THREADS) {
        proc_args.threads = Some(*n);
    }
    if args.get_flag(GLOBAL_ARG_JSON) {
        proc_args.report_format = ReportFormat::Json;
    }

    Ok(proc_args)
}
