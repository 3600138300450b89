/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::io::{self, Write};

use serde_json::{Map, Value};

use crate::batch::{BatchResult, ProbeReport};
use crate::probe::{IdentityRecord, LatencyGrade, ProbeError, ProbeOutcome};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

pub fn write_result<W: Write>(
    w: &mut W,
    format: ReportFormat,
    result: &BatchResult,
) -> io::Result<()> {
    match format {
        ReportFormat::Text => write_text(w, result),
        ReportFormat::Json => {
            let v = to_json(result);
            serde_json::to_writer(&mut *w, &v).map_err(io::Error::other)?;
            writeln!(w)
        }
    }
}

fn write_text<W: Write>(w: &mut W, result: &BatchResult) -> io::Result<()> {
    let target = result.target();
    write!(w, "#{} {}", target.id(), target.address())?;
    if let Some(remark) = target.remark() {
        write!(w, " ({remark})")?;
    }

    match result.report() {
        ProbeReport::Latency(ProbeOutcome::Online { latency }) => {
            let grade = LatencyGrade::from_latency(*latency);
            writeln!(w, ": online {}ms {grade}", latency.as_millis())
        }
        ProbeReport::Latency(ProbeOutcome::Offline { reason }) => {
            writeln!(w, ": offline {}: {reason}", reason.kind())
        }
        ProbeReport::Identity(Ok(record)) => writeln!(
            w,
            ": exit_ip={} country={} city={} org={} asn={}",
            record.exit_ip(),
            record.country(),
            record.city(),
            record.org(),
            record.asn()
        ),
        ProbeReport::Identity(Err(e)) => writeln!(w, ": failed {}: {e}", e.kind()),
    }
}

fn error_value(e: &ProbeError) -> Value {
    let mut map = Map::with_capacity(2);
    map.insert("kind".to_string(), Value::from(e.kind()));
    map.insert("message".to_string(), Value::from(e.to_string()));
    Value::Object(map)
}

fn identity_value(map: &mut Map<String, Value>, record: &IdentityRecord) {
    map.insert(
        "exit_ip".to_string(),
        Value::from(record.exit_ip().to_string()),
    );
    map.insert("country".to_string(), Value::from(record.country()));
    map.insert("city".to_string(), Value::from(record.city()));
    map.insert("org".to_string(), Value::from(record.org()));
    map.insert("asn".to_string(), Value::from(record.asn()));
    map.insert("entry".to_string(), record.entry().raw().clone());
    map.insert("exit".to_string(), record.exit().raw().clone());
}

fn to_json(result: &BatchResult) -> Value {
    let target = result.target();
    let mut map = Map::new();
    map.insert("id".to_string(), Value::from(target.id()));
    map.insert("address".to_string(), Value::from(target.address()));
    if let Some(remark) = target.remark() {
        map.insert("remark".to_string(), Value::from(remark));
    }
    map.insert("kind".to_string(), Value::from(result.kind().as_str()));

    match result.report() {
        ProbeReport::Latency(ProbeOutcome::Online { latency }) => {
            map.insert("online".to_string(), Value::Bool(true));
            map.insert(
                "latency_ms".to_string(),
                Value::from(latency.as_millis() as u64),
            );
            let grade = LatencyGrade::from_latency(*latency);
            map.insert("grade".to_string(), Value::from(grade.as_str()));
        }
        ProbeReport::Latency(ProbeOutcome::Offline { reason }) => {
            map.insert("online".to_string(), Value::Bool(false));
            map.insert("error".to_string(), error_value(reason));
        }
        ProbeReport::Identity(Ok(record)) => identity_value(&mut map, record),
        ProbeReport::Identity(Err(e)) => {
            map.insert("error".to_string(), error_value(e));
        }
    }
    Value::Object(map)
}
