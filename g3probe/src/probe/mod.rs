/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::sync::Arc;

use crate::config::ProbeConfig;

mod error;
pub use error::ProbeError;

mod channel;
pub use channel::{ProbeChannel, ProxyConnector, TcpConnector};

mod trace;
pub use trace::extract_exit_ip;

mod tunnel;

mod latency;
pub use latency::{LatencyGrade, ProbeOutcome};

mod identity;
pub use identity::IdentityRecord;

/// Run probes against proxy endpoints.
///
/// Each probe opens its own channel through `C`, and identity probes enrich the
/// result through `L`. Nothing is shared between probe attempts.
pub struct Prober<C, L> {
    config: Arc<ProbeConfig>,
    connector: C,
    locator: L,
}

impl<C, L> Prober<C, L> {
    pub fn new(config: Arc<ProbeConfig>, connector: C, locator: L) -> Self {
        Prober {
            config,
            connector,
            locator,
        }
    }

    #[inline]
    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }
}
