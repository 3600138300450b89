/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, anyhow};
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint, value_parser};
use futures_util::StreamExt;
use log::info;

use crate::batch::ProbeKind;
use crate::config::ProbeConfig;
use crate::opts::ProcArgs;
use crate::probe::{Prober, TcpConnector};
use crate::report;
use crate::target::{ProbeTarget, ProbeTargetList};

pub mod identity;
pub mod latency;

const ARG_ADDRESS: &str = "address";
const ARG_FILE: &str = "file";
const ARG_TIMEOUT: &str = "timeout";

fn add_probe_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new(ARG_ADDRESS)
            .help("Proxy address, in the form scheme://[user:pass@]host:port[#remark]")
            .value_name("ADDRESS")
            .num_args(0..)
            .action(ArgAction::Append),
    )
    .arg(
        Arg::new(ARG_FILE)
            .help("File that contains one proxy address per line")
            .value_name("FILE")
            .short('f')
            .long(ARG_FILE)
            .num_args(1)
            .value_hint(ValueHint::FilePath)
            .value_parser(value_parser!(PathBuf)),
    )
    .arg(
        Arg::new(ARG_TIMEOUT)
            .help("Timeout for each probe")
            .value_name("TIMEOUT DURATION")
            .long(ARG_TIMEOUT)
            .num_args(1),
    )
}

fn parse_targets(args: &ArgMatches) -> anyhow::Result<Vec<ProbeTarget>> {
    let mut list = ProbeTargetList::default();
    if let Some(values) = args.get_many::<String>(ARG_ADDRESS) {
        for v in values {
            list.push_line(v);
        }
    }
    if let Some(path) = args.get_one::<PathBuf>(ARG_FILE) {
        list.load_file(path)?;
    }
    if list.is_empty() {
        return Err(anyhow!("no proxy address given"));
    }
    Ok(list.into_inner())
}

async fn run_batch(
    proc_args: &ProcArgs,
    config: ProbeConfig,
    targets: Vec<ProbeTarget>,
    kind: ProbeKind,
) -> anyhow::Result<ExitCode> {
    let locator = config
        .ip_locate()
        .build_locator()
        .context("failed to build ip locate client")?;
    let concurrency = config.concurrency();
    let total = targets.len();
    let prober = Arc::new(Prober::new(Arc::new(config), TcpConnector, locator));

    let mut failed = 0usize;
    let mut results = std::pin::pin!(prober.batch_stream(targets, kind, concurrency));
    while let Some(r) = results.next().await {
        if r.report().error().is_some() {
            failed += 1;
        }
        let mut stdout = io::stdout().lock();
        report::write_result(&mut stdout, proc_args.report_format, &r)
            .and_then(|_| stdout.flush())
            .context("failed to write result to stdout")?;
    }

    info!("{kind} probe finished: {} succeeded, {failed} failed", total - failed);
    Ok(ExitCode::SUCCESS)
}
