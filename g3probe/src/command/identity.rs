/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::process::ExitCode;

use clap::{ArgMatches, Command};

use crate::batch::ProbeKind;
use crate::opts::ProcArgs;

pub const COMMAND: &str = "identity";

pub fn command() -> Command {
    super::add_probe_args(
        Command::new(COMMAND).about("Detect the exit ip and its location through the proxies"),
    )
}

pub async fn run(proc_args: &ProcArgs, args: &ArgMatches) -> anyhow::Result<ExitCode> {
    let targets = super::parse_targets(args)?;

    let mut config = proc_args.probe_config().clone();
    if let Some(timeout) = g3_clap::humanize::get_duration(args, super::ARG_TIMEOUT)? {
        config.set_identity_timeout(timeout);
    }

    super::run_batch(proc_args, config, targets, ProbeKind::Identity).await
}
