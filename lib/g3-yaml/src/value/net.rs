/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::str::FromStr;

use anyhow::anyhow;
use url::Url;
use yaml_rust::Yaml;

use g3_types::net::UpstreamAddr;

pub fn as_upstream_addr(v: &Yaml) -> anyhow::Result<UpstreamAddr> {
    if let Yaml::String(s) = v {
        UpstreamAddr::from_str(s).map_err(|e| anyhow!("invalid upstream address {s}: {e}"))
    } else {
        Err(anyhow!(
            "yaml value type for 'upstream address' should be 'string'"
        ))
    }
}

pub fn as_url(v: &Yaml) -> anyhow::Result<Url> {
    if let Yaml::String(s) = v {
        Url::parse(s).map_err(|e| anyhow!("invalid url {s}: {e}"))
    } else {
        Err(anyhow!("yaml value type for 'url' should be 'string'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use g3_types::net::Host;

    #[test]
    fn t_upstream_addr() {
        let v = Yaml::String("check.socks5.090227.xyz:80".to_string());
        let addr = as_upstream_addr(&v).unwrap();
        assert_eq!(
            addr.host(),
            &Host::Domain("check.socks5.090227.xyz".to_string())
        );
        assert_eq!(addr.port(), 80);

        let v = Yaml::String("1.1.1.1".to_string());
        assert!(as_upstream_addr(&v).is_err());

        let v = Yaml::Integer(80);
        assert!(as_upstream_addr(&v).is_err());
    }

    #[test]
    fn t_url() {
        let v = Yaml::String("https://api.ipapi.is/".to_string());
        assert_eq!(as_url(&v).unwrap().host_str(), Some("api.ipapi.is"));

        let v = Yaml::String("not a url".to_string());
        assert!(as_url(&v).is_err());
    }
}
