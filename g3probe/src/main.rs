/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::io;
use std::process::ExitCode;

use anyhow::{Context, anyhow};
use clap::{Arg, ArgMatches, Command, value_parser};
use clap_complete::Shell;

use g3probe::command::{identity, latency};

const COMMAND_VERSION: &str = "version";
const COMMAND_COMPLETION: &str = "completion";

fn build_cli_args() -> Command {
    g3probe::add_global_args(Command::new(g3probe::build::PKG_NAME))
        .subcommand_required(true)
        .subcommand_value_name("COMMAND")
        .subcommand(Command::new(COMMAND_VERSION).override_help("Show version"))
        .subcommand(
            Command::new(COMMAND_COMPLETION).arg(
                Arg::new("target")
                    .value_name("SHELL")
                    .required(true)
                    .num_args(1)
                    .value_parser(value_parser!(Shell)),
            ),
        )
        .subcommand(latency::command())
        .subcommand(identity::command())
}

fn main() -> anyhow::Result<ExitCode> {
    let args = build_cli_args().get_matches();
    let proc_args = g3probe::parse_global_args(&args)?;

    let (subcommand, sub_args) = args
        .subcommand()
        .ok_or_else(|| anyhow!("no subcommand found"))?;

    match subcommand {
        COMMAND_VERSION => {
            g3probe::build::print_version();
            return Ok(ExitCode::SUCCESS);
        }
        COMMAND_COMPLETION => {
            generate_completion(sub_args);
            return Ok(ExitCode::SUCCESS);
        }
        _ => {}
    }

    let _log_guard = g3probe::log::setup(proc_args.verbose_level())
        .context("failed to setup logger")?;

    let rt = proc_args
        .main_runtime()
        .context("failed to start main runtime")?;
    rt.block_on(async move {
        match subcommand {
            latency::COMMAND => latency::run(&proc_args, sub_args).await,
            identity::COMMAND => identity::run(&proc_args, sub_args).await,
            cmd => Err(anyhow!("invalid subcommand {}", cmd)),
        }
    })
}

fn generate_completion(args: &ArgMatches) {
    if let Some(target) = args.get_one::<Shell>("target") {
        let mut app = build_cli_args();
        let bin_name = app.get_name().to_string();
        clap_complete::generate(*target, &mut app, bin_name, &mut io::stdout());
    }
}
