//! WHOIS data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::parse::deserialize_optional_date;

/// Structured response from the directory service for one query.
///
/// Produced fresh for every lookup; never cached or shared across records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupResult {
    /// Registry disclaimer text
    pub disclaimer: Option<String>,
    /// Domain name as reported by the registry
    pub domain: Option<String>,
    /// Registry-assigned domain identifier
    pub domain_id: Option<String>,
    /// Domain status (e.g., "clientTransferProhibited")
    pub status: Option<String>,
    /// Whether the domain is registered
    pub registered: bool,
    /// Whether the domain is available for registration
    pub available: bool,
    /// Domain creation date
    #[serde(deserialize_with = "deserialize_optional_date")]
    pub created_on: Option<DateTime<Utc>>,
    /// Domain updated date
    #[serde(deserialize_with = "deserialize_optional_date")]
    pub updated_on: Option<DateTime<Utc>>,
    /// Domain expiration date
    #[serde(deserialize_with = "deserialize_optional_date")]
    pub expires_on: Option<DateTime<Utc>>,
    /// Sponsoring registrar
    pub registrar: Option<Registrar>,
    /// Registrant contacts; only the first email is used
    pub registrant_contacts: Vec<Contact>,
    /// Administrative contacts
    pub admin_contacts: Vec<Contact>,
    /// Technical contacts
    pub technical_contacts: Vec<Contact>,
    /// Nameservers, in registry order
    pub nameservers: Vec<Nameserver>,
}

/// Registrar information.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Registrar {
    /// Registrar IANA id
    pub id: Option<String>,
    /// Registrar name
    pub name: Option<String>,
    /// Registrar organization
    pub organization: Option<String>,
    /// Registrar website
    pub url: Option<String>,
}

/// A registrant, administrative or technical contact. Only the email is kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    /// Contact email address
    pub email: Option<String>,
}

/// A nameserver and its glue addresses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Nameserver {
    /// Nameserver host name
    pub name: String,
    /// IPv4 glue address
    pub ipv4: Option<String>,
    /// IPv6 glue address
    pub ipv6: Option<String>,
}

impl LookupResult {
    /// Email of the first registrant contact, if any.
    pub fn registrant_email(&self) -> Option<&str> {
        first_email(&self.registrant_contacts)
    }

    /// Email of the first administrative contact, if any.
    pub fn admin_email(&self) -> Option<&str> {
        first_email(&self.admin_contacts)
    }

    /// Email of the first technical contact, if any.
    pub fn technical_email(&self) -> Option<&str> {
        first_email(&self.technical_contacts)
    }
}

fn first_email(contacts: &[Contact]) -> Option<&str> {
    contacts.first().and_then(|c| c.email.as_deref())
}
