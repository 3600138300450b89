/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2024-2025 ByteDance and/or its affiliates.
 */

use anyhow::{Context, anyhow};
use yaml_rust::Yaml;

use crate::IpLocateServiceConfig;

impl IpLocateServiceConfig {
    fn set_service_url_by_yaml(&mut self, value: &Yaml) -> anyhow::Result<()> {
        let url = g3_yaml::value::as_url(value)?;
        self.set_service_url(url)
    }

    pub fn parse_yaml(value: &Yaml) -> anyhow::Result<Self> {
        match value {
            Yaml::Hash(map) => {
                let mut config = IpLocateServiceConfig::default();

                g3_yaml::foreach_kv(map, |k, v| match g3_yaml::key::normalize(k).as_str() {
                    "service_url" | "url" => {
                        config
                            .set_service_url_by_yaml(v)
                            .context(format!("invalid service url value for key {k}"))?;
                        Ok(())
                    }
                    "query_param" => {
                        let name = g3_yaml::value::as_string(v)?;
                        if name.is_empty() {
                            return Err(anyhow!("empty query param name"));
                        }
                        config.set_query_param(name);
                        Ok(())
                    }
                    "request_timeout" => {
                        let time = g3_yaml::humanize::as_duration(v)
                            .context(format!("invalid humanize duration value for key {k}"))?;
                        config.set_request_timeout(time);
                        Ok(())
                    }
                    "max_response_size" => {
                        let size = g3_yaml::humanize::as_usize(v)
                            .context(format!("invalid humanize usize value for key {k}"))?;
                        config.set_max_response_size(size);
                        Ok(())
                    }
                    _ => Err(anyhow!("invalid key {k}")),
                })?;

                Ok(config)
            }
            Yaml::String(_) => {
                let mut config = IpLocateServiceConfig::default();
                config
                    .set_service_url_by_yaml(value)
                    .context("invalid service url value")?;
                Ok(config)
            }
            _ => Err(anyhow!(
                "yaml type for 'ip locate service config' should be 'map' or 'string'"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use g3_yaml::{yaml_doc, yaml_str};
    use yaml_rust::YamlLoader;

    #[test]
    fn parse_map_ok() {
        let yaml = yaml_doc!(
            r#"
                service_url: "http://127.0.0.1:8080/lookup"
                query_param: ip
                request_timeout: "3s"
                max_response_size: 64KiB
            "#
        );
        let config = IpLocateServiceConfig::parse_yaml(&yaml).unwrap();
        assert_eq!(config.service_url.as_str(), "http://127.0.0.1:8080/lookup");
        assert_eq!(config.query_param, "ip");
        assert_eq!(config.request_timeout, Duration::from_secs(3));
        assert_eq!(config.max_response_size, 64 * 1024);
    }

    #[test]
    fn parse_map_err() {
        let yaml = yaml_doc!(
            r#"
                invalid_key: "value"
            "#
        );
        assert!(IpLocateServiceConfig::parse_yaml(&yaml).is_err());

        let yaml = yaml_doc!(
            r#"
                service_url: "ftp://127.0.0.1/"
            "#
        );
        assert!(IpLocateServiceConfig::parse_yaml(&yaml).is_err());

        let yaml = yaml_doc!(
            r#"
                request_timeout: "5x"
            "#
        );
        assert!(IpLocateServiceConfig::parse_yaml(&yaml).is_err());

        let yaml = yaml_doc!(
            r#"
                query_param: ""
            "#
        );
        assert!(IpLocateServiceConfig::parse_yaml(&yaml).is_err());
    }

    #[test]
    fn parse_string() {
        let yaml = yaml_str!("https://geo.example/api");
        let config = IpLocateServiceConfig::parse_yaml(&yaml).unwrap();
        assert_eq!(config.service_url.as_str(), "https://geo.example/api");
        assert_eq!(config.request_timeout, Duration::from_secs(5));

        let yaml = yaml_str!("not a url");
        assert!(IpLocateServiceConfig::parse_yaml(&yaml).is_err());
    }

    #[test]
    fn parse_invalid_yaml_types() {
        let yaml = Yaml::Array(vec![]);
        assert!(IpLocateServiceConfig::parse_yaml(&yaml).is_err());

        let yaml = Yaml::Integer(123);
        assert!(IpLocateServiceConfig::parse_yaml(&yaml).is_err());

        let yaml = Yaml::Null;
        assert!(IpLocateServiceConfig::parse_yaml(&yaml).is_err());
    }
}
