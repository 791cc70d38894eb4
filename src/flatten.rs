//! Record flattening: lookup result -> named derived attributes.
//!
//! Every attribute is named `<prefix>_whois_<suffix>` with suffixes taken
//! from [`AttributeGroup::suffixes`]. Values missing from the lookup result
//! are skipped, never written as null.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::config::ATTRIBUTE_INFIX;
use crate::selection::{AttributeGroup, FieldSelection};
use crate::whois::LookupResult;

/// Flat attribute set produced for one (record, lookup field) pair.
pub type DerivedAttributes = Map<String, Value>;

/// Human-readable timestamp layout, e.g. `Mon Jan 15 10:30:45 UTC 2024`
const TIMESTAMP_FORMAT: &str = "%a %b %d %H:%M:%S UTC %Y";

/// Builds the output attribute name for a lookup field and suffix.
pub fn attribute_name(prefix: &str, suffix: &str) -> String {
    format!("{prefix}{ATTRIBUTE_INFIX}{suffix}")
}

/// Seconds since the Unix epoch, floored (sub-second precision is dropped).
pub fn to_epoch_seconds(timestamp: &DateTime<Utc>) -> i64 {
    timestamp.timestamp()
}

/// Renders a timestamp for the `*_string` attributes.
pub fn render_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Flattens `result` into the attributes enabled by `selection`.
///
/// `now` is the reference time for the `*_delta` attributes: `created` and
/// `updated` deltas are elapsed seconds (`now - t`), the `expires` delta is
/// remaining seconds (`t - now`).
pub fn flatten(
    result: &LookupResult,
    selection: &FieldSelection,
    prefix: &str,
    now: DateTime<Utc>,
) -> DerivedAttributes {
    let mut out = Attributes {
        prefix,
        map: Map::new(),
    };
    let now_epoch = to_epoch_seconds(&now);

    for group in selection.enabled_groups() {
        match group {
            AttributeGroup::Disclaimer => out.put_opt("disclaimer", result.disclaimer.as_deref()),
            AttributeGroup::Domain => out.put_opt("domain", result.domain.as_deref()),
            AttributeGroup::DomainId => out.put_opt("domain_id", result.domain_id.as_deref()),
            AttributeGroup::Status => out.put_opt("status", result.status.as_deref()),
            AttributeGroup::Registered => out.put("registered", result.registered),
            AttributeGroup::Available => out.put("available", result.available),
            AttributeGroup::Created => out.put_timestamp("created", result.created_on.as_ref()),
            AttributeGroup::CreatedDelta => {
                if let Some(created) = &result.created_on {
                    out.put("created_delta", now_epoch - to_epoch_seconds(created));
                }
            }
            AttributeGroup::Updated => out.put_timestamp("updated", result.updated_on.as_ref()),
            AttributeGroup::UpdatedDelta => {
                if let Some(updated) = &result.updated_on {
                    out.put("updated_delta", now_epoch - to_epoch_seconds(updated));
                }
            }
            AttributeGroup::Expires => out.put_timestamp("expires", result.expires_on.as_ref()),
            AttributeGroup::ExpiresDelta => {
                if let Some(expires) = &result.expires_on {
                    out.put("expires_delta", to_epoch_seconds(expires) - now_epoch);
                }
            }
            AttributeGroup::Registrar => {
                if let Some(registrar) = &result.registrar {
                    out.put_opt("registrar_id", registrar.id.as_deref());
                    out.put_opt("registrar_name", registrar.name.as_deref());
                    out.put_opt("registrar_org", registrar.organization.as_deref());
                    out.put_opt("registrar_url", registrar.url.as_deref());
                }
            }
            AttributeGroup::RegistrantContact => {
                out.put_opt("registrant_contact", result.registrant_email())
            }
            AttributeGroup::AdminContact => out.put_opt("admin_contact", result.admin_email()),
            AttributeGroup::TechnicalContact => {
                out.put_opt("technical_contact", result.technical_email())
            }
            AttributeGroup::Nameservers => {
                for (i, nameserver) in result.nameservers.iter().enumerate() {
                    let base = format!("nameserver{i}");
                    out.put(&base, nameserver.name.as_str());
                    out.put_opt(&format!("{base}_ipv4"), nameserver.ipv4.as_deref());
                    out.put_opt(&format!("{base}_ipv6"), nameserver.ipv6.as_deref());
                }
            }
        }
    }

    out.map
}

struct Attributes<'a> {
    prefix: &'a str,
    map: DerivedAttributes,
}

impl Attributes<'_> {
    fn put(&mut self, suffix: &str, value: impl Into<Value>) {
        self.map
            .insert(attribute_name(self.prefix, suffix), value.into());
    }

    fn put_opt(&mut self, suffix: &str, value: Option<&str>) {
        if let Some(value) = value {
            self.put(suffix, value);
        }
    }

    fn put_timestamp(&mut self, stem: &str, timestamp: Option<&DateTime<Utc>>) {
        if let Some(timestamp) = timestamp {
            self.put(&format!("{stem}_epoch"), to_epoch_seconds(timestamp));
            self.put(&format!("{stem}_string"), render_timestamp(timestamp));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::whois::{Contact, Nameserver, Registrar};
    use chrono::TimeZone;
    use serde_json::json;
    use strum::IntoEnumIterator;

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn full_result() -> LookupResult {
        LookupResult {
            disclaimer: Some("For information purposes only".to_string()),
            domain: Some("example.com".to_string()),
            domain_id: Some("2336799_DOMAIN_COM-VRSN".to_string()),
            status: Some("clientTransferProhibited".to_string()),
            registered: true,
            available: false,
            created_on: Some(ts(808_372_800)),
            updated_on: Some(ts(1_692_000_000)),
            expires_on: Some(ts(1_755_000_000)),
            registrar: Some(Registrar {
                id: Some("376".to_string()),
                name: Some("RESERVED-Internet Assigned Numbers Authority".to_string()),
                organization: Some("IANA".to_string()),
                url: Some("http://res-dom.iana.org".to_string()),
            }),
            registrant_contacts: vec![
                Contact {
                    email: Some("owner@example.com".to_string()),
                },
                Contact {
                    email: Some("second@example.com".to_string()),
                },
            ],
            admin_contacts: vec![Contact {
                email: Some("admin@example.com".to_string()),
            }],
            technical_contacts: vec![],
            nameservers: vec![
                Nameserver {
                    name: "a.iana-servers.net".to_string(),
                    ipv4: Some("199.43.135.53".to_string()),
                    ipv6: Some("2001:500:8f::53".to_string()),
                },
                Nameserver {
                    name: "b.iana-servers.net".to_string(),
                    ipv4: None,
                    ipv6: None,
                },
            ],
        }
    }

    #[test]
    fn test_attribute_name() {
        assert_eq!(
            attribute_name("domain_or_ip01", "created_epoch"),
            "domain_or_ip01_whois_created_epoch"
        );
    }

    #[test]
    fn test_to_epoch_seconds_truncates_subseconds() {
        let t = Utc.timestamp_opt(1_700_000_000, 999_999_999).unwrap();
        assert_eq!(to_epoch_seconds(&t), 1_700_000_000);
    }

    #[test]
    fn test_render_timestamp() {
        let t = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 45).unwrap();
        assert_eq!(render_timestamp(&t), "Mon Jan 15 10:30:45 UTC 2024");
    }

    #[test]
    fn test_default_selection_emits_created_and_updated() {
        let attrs = flatten(
            &full_result(),
            &FieldSelection::default(),
            "host",
            ts(1_800_000_000),
        );
        let mut keys: Vec<&str> = attrs.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec![
                "host_whois_created_epoch",
                "host_whois_created_string",
                "host_whois_updated_epoch",
                "host_whois_updated_string",
            ]
        );
        assert_eq!(attrs["host_whois_created_epoch"], json!(808_372_800));
    }

    #[test]
    fn test_created_delta_with_fixed_clock() {
        let t = Utc.timestamp_opt(1_600_000_000, 500_000_000).unwrap();
        let result = LookupResult {
            created_on: Some(t),
            ..Default::default()
        };
        let selection = FieldSelection::decode("00000011000000000");
        let attrs = flatten(&result, &selection, "f", ts(1_600_000_000 + 3600));

        assert_eq!(attrs["f_whois_created_epoch"], json!(1_600_000_000));
        assert_eq!(attrs["f_whois_created_delta"], json!(3600));
    }

    #[test]
    fn test_delta_sign_conventions() {
        let now = ts(1_000_000);
        let result = LookupResult {
            created_on: Some(ts(1_000_500)), // in the future
            updated_on: Some(ts(999_000)),
            expires_on: Some(ts(1_086_400)),
            ..Default::default()
        };
        let selection = FieldSelection::decode("00000001010100000");
        let attrs = flatten(&result, &selection, "f", now);

        assert_eq!(attrs["f_whois_created_delta"], json!(-500));
        assert_eq!(attrs["f_whois_updated_delta"], json!(1000));
        assert_eq!(attrs["f_whois_expires_delta"], json!(86_400));
        // Delta groups alone do not emit epoch/string attributes
        assert!(!attrs.contains_key("f_whois_created_epoch"));
        assert_eq!(attrs.len(), 3);
    }

    #[test]
    fn test_all_groups_on_full_result() {
        let selection = FieldSelection::decode("11111111111111111");
        let attrs = flatten(&full_result(), &selection, "d", ts(1_700_000_000));

        assert_eq!(attrs["d_whois_disclaimer"], json!("For information purposes only"));
        assert_eq!(attrs["d_whois_domain"], json!("example.com"));
        assert_eq!(attrs["d_whois_domain_id"], json!("2336799_DOMAIN_COM-VRSN"));
        assert_eq!(attrs["d_whois_status"], json!("clientTransferProhibited"));
        assert_eq!(attrs["d_whois_registered"], json!(true));
        assert_eq!(attrs["d_whois_available"], json!(false));
        assert_eq!(attrs["d_whois_expires_delta"], json!(55_000_000));
        assert_eq!(attrs["d_whois_registrar_id"], json!("376"));
        assert_eq!(attrs["d_whois_registrar_org"], json!("IANA"));
        assert_eq!(attrs["d_whois_registrar_url"], json!("http://res-dom.iana.org"));
        assert_eq!(attrs["d_whois_registrant_contact"], json!("owner@example.com"));
        assert_eq!(attrs["d_whois_admin_contact"], json!("admin@example.com"));
        assert!(!attrs.contains_key("d_whois_technical_contact"));
        assert_eq!(attrs["d_whois_nameserver0"], json!("a.iana-servers.net"));
        assert_eq!(attrs["d_whois_nameserver0_ipv4"], json!("199.43.135.53"));
        assert_eq!(attrs["d_whois_nameserver0_ipv6"], json!("2001:500:8f::53"));
        assert_eq!(attrs["d_whois_nameserver1"], json!("b.iana-servers.net"));
        assert!(!attrs.contains_key("d_whois_nameserver1_ipv4"));
        assert!(!attrs.contains_key("d_whois_nameserver2"));
        assert!(attrs.values().all(|v| !v.is_null()));
    }

    #[test]
    fn test_absent_values_are_not_written() {
        let selection = FieldSelection::decode("11111111111111111");
        let attrs = flatten(&LookupResult::default(), &selection, "d", ts(0));
        let mut keys: Vec<&str> = attrs.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["d_whois_available", "d_whois_registered"]);
    }

    #[test]
    fn test_single_group_masks_only_emit_their_suffixes() {
        let mut result = full_result();
        result.technical_contacts.push(Contact {
            email: Some("tech@example.com".to_string()),
        });
        for group in AttributeGroup::iter() {
            let mut mask = vec!['0'; 17];
            mask[group.position()] = '1';
            let mask: String = mask.into_iter().collect();
            let attrs = flatten(&result, &FieldSelection::decode(&mask), "p", ts(1_700_000_000));

            assert!(!attrs.is_empty(), "group {group:?} emitted nothing");
            for key in attrs.keys() {
                let suffix = key.strip_prefix("p_whois_").unwrap();
                assert!(
                    group.suffixes().iter().any(|s| suffix.starts_with(s)),
                    "group {group:?} emitted unexpected {key}"
                );
            }
        }
    }
}
