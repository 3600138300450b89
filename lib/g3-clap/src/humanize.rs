/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::str::FromStr;
use std::time::Duration;

use anyhow::anyhow;
use clap::ArgMatches;
use humanize_rs::ParseError;

/// Get a humanized duration value, plain numbers are taken as seconds
pub fn get_duration(args: &ArgMatches, id: &str) -> anyhow::Result<Option<Duration>> {
    let Some(v) = args.get_one::<String>(id) else {
        return Ok(None);
    };

    match humanize_rs::duration::parse(v) {
        Ok(d) => Ok(Some(d)),
        Err(ParseError::MissingUnit) => {
            let secs = u64::from_str(v).map_err(|_| anyhow!("invalid {id} value {v}"))?;
            Ok(Some(Duration::from_secs(secs)))
        }
        Err(e) => Err(anyhow!("invalid {id} value {v}: {e}")),
    }
}
