//! WHOIS date parsing and response conversion.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Date formats seen in WHOIS responses, tried in order after RFC 3339
const WHOIS_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.fZ",
    "%Y-%m-%dT%H:%M:%SZ",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d",
    "%d-%b-%Y",
    "%d/%m/%Y",
];

/// Attempts to parse a WHOIS date string in the common registry formats.
///
/// Dates without a time component are taken as midnight UTC; dates without
/// an offset are taken as UTC.
pub(crate) fn parse_date_string(date_str: &str) -> Option<DateTime<Utc>> {
    let date_str = date_str.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in WHOIS_DATE_FORMATS {
        if let Ok(naive_dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Some(naive_dt.and_utc());
        }
        if let Ok(naive_date) = NaiveDate::parse_from_str(date_str, format) {
            return Some(naive_date.and_hms_opt(0, 0, 0)?.and_utc());
        }
    }

    None
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDate {
    Text(String),
    EpochSeconds(i64),
}

/// Deserializes an optional WHOIS date given as a string or epoch seconds.
///
/// Unparseable strings are treated as absent rather than failing the whole
/// response.
pub(crate) fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawDate>::deserialize(deserializer)?;
    Ok(match raw {
        None => None,
        Some(RawDate::EpochSeconds(secs)) => DateTime::from_timestamp(secs, 0),
        Some(RawDate::Text(text)) => {
            let parsed = parse_date_string(&text);
            if parsed.is_none() && !text.trim().is_empty() {
                log::debug!("Ignoring unparseable WHOIS date '{}'", text);
            }
            parsed
        }
    })
}

/// Converts a whois-service response into a [`LookupResult`].
///
/// whois-service exposes registrar name, registrant name, status list and
/// nameserver names; contact emails, registry ids and the disclaimer are not
/// part of its parsed data and stay absent.
#[cfg(feature = "whois-service")]
pub(crate) fn convert_response(
    query: &str,
    response: &whois_service::WhoisResponse,
) -> super::types::LookupResult {
    use super::types::{LookupResult, Nameserver, Registrar};

    let Some(parsed) = &response.parsed_data else {
        return LookupResult {
            domain: Some(query.to_string()),
            ..Default::default()
        };
    };

    let parse = |value: &Option<String>| value.as_deref().and_then(parse_date_string);
    let created_on = parse(&parsed.creation_date);
    let registered = created_on.is_some() || parsed.registrar.is_some();

    LookupResult {
        disclaimer: None,
        domain: Some(query.to_string()),
        domain_id: None,
        status: (!parsed.status.is_empty()).then(|| parsed.status.join(", ")),
        registered,
        available: !registered,
        created_on,
        updated_on: parse(&parsed.updated_date),
        expires_on: parse(&parsed.expiration_date),
        registrar: parsed.registrar.as_ref().map(|name| Registrar {
            name: Some(name.clone()),
            organization: parsed.registrant_name.clone(),
            ..Default::default()
        }),
        registrant_contacts: Vec::new(),
        admin_contacts: Vec::new(),
        technical_contacts: Vec::new(),
        nameservers: parsed
            .name_servers
            .iter()
            .map(|name| Nameserver {
                name: name.clone(),
                ..Default::default()
            })
            .collect(),
    }
}
