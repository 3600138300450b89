/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2024-2025 ByteDance and/or its affiliates.
 */

use serde_json::Value;

use super::IpLocateError;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct IpLocation {
    country: Option<String>,
    city: Option<String>,
    org: Option<String>,
    asn: Option<String>,
    raw: Value,
}

fn str_field<'a>(v: &'a Value, section: &str, key: &str) -> Option<&'a str> {
    v.get(section)?
        .get(key)?
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn asn_field(v: &Value) -> Option<String> {
    match v.get("asn")?.get("asn")? {
        Value::Number(n) => Some(format!("AS{n}")),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            match s.get(..2) {
                Some(p) if p.eq_ignore_ascii_case("AS") && s.len() > 2 => {
                    Some(format!("AS{}", &s[2..]))
                }
                _ => Some(format!("AS{s}")),
            }
        }
        _ => None,
    }
}

impl IpLocation {
    /// Build from an ipapi.is style json object
    pub fn from_json_value(raw: Value) -> Result<Self, IpLocateError> {
        if !raw.is_object() {
            return Err(IpLocateError::NotJsonObject);
        }

        Ok(IpLocation {
            country: str_field(&raw, "location", "country").map(str::to_string),
            city: str_field(&raw, "location", "city").map(str::to_string),
            org: str_field(&raw, "asn", "org").map(str::to_string),
            asn: asn_field(&raw),
            raw,
        })
    }

    pub fn from_json_slice(data: &[u8]) -> Result<Self, IpLocateError> {
        let raw = serde_json::from_slice::<Value>(data)?;
        IpLocation::from_json_value(raw)
    }

    pub fn set_country(&mut self, country: String) {
        self.country = Some(country);
    }

    pub fn set_city(&mut self, city: String) {
        self.city = Some(city);
    }

    pub fn set_org(&mut self, org: String) {
        self.org = Some(org);
    }

    pub fn set_asn(&mut self, asn: String) {
        self.asn = Some(asn);
    }

    #[inline]
    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    #[inline]
    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    #[inline]
    pub fn org(&self) -> Option<&str> {
        self.org.as_deref()
    }

    /// The network number, in `AS<number>` form
    #[inline]
    pub fn asn(&self) -> Option<&str> {
        self.asn.as_deref()
    }

    #[inline]
    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full() {
        let data = br#"{
            "ip": "198.51.100.9",
            "asn": {"asn": 64500, "org": "ExampleNet", "type": "hosting"},
            "location": {"country": "US", "city": "Ashburn", "timezone": "America/New_York"}
        }"#;
        let loc = IpLocation::from_json_slice(data).unwrap();
        assert_eq!(loc.country(), Some("US"));
        assert_eq!(loc.city(), Some("Ashburn"));
        assert_eq!(loc.org(), Some("ExampleNet"));
        assert_eq!(loc.asn(), Some("AS64500"));
        assert_eq!(loc.raw()["ip"], "198.51.100.9");
    }

    #[test]
    fn parse_partial() {
        let loc = IpLocation::from_json_slice(br#"{"asn": {"asn": "as13335"}}"#).unwrap();
        assert_eq!(loc.country(), None);
        assert_eq!(loc.city(), None);
        assert_eq!(loc.org(), None);
        assert_eq!(loc.asn(), Some("AS13335"));

        let loc = IpLocation::from_json_slice(br#"{"location": {"city": ""}, "asn": {"asn": "13335"}}"#)
            .unwrap();
        assert_eq!(loc.city(), None);
        assert_eq!(loc.asn(), Some("AS13335"));
    }

    #[test]
    fn parse_err() {
        assert!(matches!(
            IpLocation::from_json_slice(b"[1, 2]"),
            Err(IpLocateError::NotJsonObject)
        ));
        assert!(matches!(
            IpLocation::from_json_slice(b"<html>"),
            Err(IpLocateError::InvalidJson(_))
        ));
    }
}
