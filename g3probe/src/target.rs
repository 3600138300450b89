/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::Context;

/// One proxy address to probe, as listed in a catalog line `address[#remark]`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbeTarget {
    id: usize,
    address: String,
    remark: Option<String>,
}

impl ProbeTarget {
    pub fn new(id: usize, address: String, remark: Option<String>) -> Self {
        ProbeTarget {
            id,
            address,
            remark,
        }
    }

    #[inline]
    pub fn id(&self) -> usize {
        self.id
    }

    #[inline]
    pub fn address(&self) -> &str {
        &self.address
    }

    #[inline]
    pub fn remark(&self) -> Option<&str> {
        self.remark.as_deref()
    }
}

/// Collect targets in input order, and assign them 1-based ids.
#[derive(Default)]
pub struct ProbeTargetList {
    targets: Vec<ProbeTarget>,
}

impl ProbeTargetList {
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Add a line, blank lines and `;` comments are skipped
    pub fn push_line(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() || line.starts_with(';') {
            return;
        }

        let (address, remark) = match memchr::memchr(b'#', line.as_bytes()) {
            Some(p) => {
                let remark = line[p + 1..].trim();
                let remark = if remark.is_empty() {
                    None
                } else {
                    Some(remark.to_string())
                };
                (line[..p].trim(), remark)
            }
            None => (line, None),
        };

        let id = self.targets.len() + 1;
        self.targets
            .push(ProbeTarget::new(id, address.to_string(), remark));
    }

    pub fn load_file(&mut self, path: &Path) -> anyhow::Result<()> {
        let file = File::open(path)
            .map_err(|e| anyhow::anyhow!("failed to open file {}: {e}", path.display()))?;
        for (i, line) in BufReader::new(file).lines().enumerate() {
            let line = line.context(format!(
                "failed to read line {} of file {}",
                i + 1,
                path.display()
            ))?;
            self.push_line(&line);
        }
        Ok(())
    }

    pub fn into_inner(self) -> Vec<ProbeTarget> {
        self.targets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn push_lines() {
        let mut list = ProbeTargetList::default();
        list.push_line("socks5://198.51.100.1:1080#hk-01");
        list.push_line("");
        list.push_line("; disabled: http://proxy.example:3128");
        list.push_line("  http://u:p@proxy.example:3128 # office ");
        list.push_line("socks5://198.51.100.2:1080#");
        assert_eq!(list.len(), 3);

        let targets = list.into_inner();
        assert_eq!(
            targets[0],
            ProbeTarget::new(
                1,
                "socks5://198.51.100.1:1080".to_string(),
                Some("hk-01".to_string())
            )
        );
        assert_eq!(targets[1].id(), 2);
        assert_eq!(targets[1].address(), "http://u:p@proxy.example:3128");
        assert_eq!(targets[1].remark(), Some("office"));
        assert_eq!(targets[2].id(), 3);
        assert_eq!(targets[2].remark(), None);
    }

    #[test]
    fn load_file() {
        let path = std::env::temp_dir().join(format!("g3probe-targets-{}.txt", std::process::id()));
        let mut file = File::create(&path).unwrap();
        file.write_all(b"socks5://198.51.100.1:1080\r\n\r\n;comment\nhttp://proxy.example:3128#b\n")
            .unwrap();
        drop(file);

        let mut list = ProbeTargetList::default();
        list.push_line("socks5://198.51.100.9:1080");
        list.load_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        let targets = list.into_inner();
        assert_eq!(targets.len(), 3);
        assert_eq!(targets[1].address(), "socks5://198.51.100.1:1080");
        assert_eq!(targets[2].id(), 3);
        assert_eq!(targets[2].remark(), Some("b"));
    }
}
