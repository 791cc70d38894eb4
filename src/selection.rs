//! Field selection: which derived attribute groups to emit.
//!
//! A field selection mask is a 17-character string of `'0'`/`'1'`. Position
//! `i` enables the [`AttributeGroup`] whose [`AttributeGroup::position`] is `i`.

use std::sync::LazyLock;

use regex::Regex;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

use crate::config::{DEFAULT_FIELD_SELECTION, FIELD_SELECTION_LEN};

static MASK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^[01]{{{FIELD_SELECTION_LEN}}}$")).unwrap_or_else(|e| {
        // The pattern is a compile-time constant; a failure here is a programming error
        panic!("invalid field selection pattern: {e}")
    })
});

/// One group of derived attributes, in mask order.
///
/// The suffix table below is the single source of truth for attribute
/// names: every emitted attribute is `<field>_whois_<suffix>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum AttributeGroup {
    /// Registry disclaimer text
    Disclaimer,
    /// Domain name
    Domain,
    /// Registry domain id
    DomainId,
    /// Domain status
    Status,
    /// Registered flag
    Registered,
    /// Available flag
    Available,
    /// Creation time as epoch and string
    Created,
    /// Seconds elapsed since creation
    CreatedDelta,
    /// Last update time as epoch and string
    Updated,
    /// Seconds elapsed since the last update
    UpdatedDelta,
    /// Expiry time as epoch and string
    Expires,
    /// Seconds remaining until expiry
    ExpiresDelta,
    /// Registrar id, name, organization and url
    Registrar,
    /// First registrant contact email
    RegistrantContact,
    /// First administrative contact email
    AdminContact,
    /// First technical contact email
    TechnicalContact,
    /// Every nameserver with its glue addresses
    Nameservers,
}

impl AttributeGroup {
    /// Zero-based position of this group in a field selection mask.
    pub fn position(self) -> usize {
        self as usize
    }

    /// Attribute suffixes written by this group.
    ///
    /// `Nameservers` expands per nameserver: `nameserverN`,
    /// `nameserverN_ipv4` and `nameserverN_ipv6` for N = 0..count.
    pub fn suffixes(self) -> &'static [&'static str] {
        match self {
            AttributeGroup::Disclaimer => &["disclaimer"],
            AttributeGroup::Domain => &["domain"],
            AttributeGroup::DomainId => &["domain_id"],
            AttributeGroup::Status => &["status"],
            AttributeGroup::Registered => &["registered"],
            AttributeGroup::Available => &["available"],
            AttributeGroup::Created => &["created_epoch", "created_string"],
            AttributeGroup::CreatedDelta => &["created_delta"],
            AttributeGroup::Updated => &["updated_epoch", "updated_string"],
            AttributeGroup::UpdatedDelta => &["updated_delta"],
            AttributeGroup::Expires => &["expires_epoch", "expires_string"],
            AttributeGroup::ExpiresDelta => &["expires_delta"],
            AttributeGroup::Registrar => &[
                "registrar_id",
                "registrar_name",
                "registrar_org",
                "registrar_url",
            ],
            AttributeGroup::RegistrantContact => &["registrant_contact"],
            AttributeGroup::AdminContact => &["admin_contact"],
            AttributeGroup::TechnicalContact => &["technical_contact"],
            AttributeGroup::Nameservers => &["nameserver"],
        }
    }
}

/// Decoded field selection mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSelection {
    flags: [bool; FIELD_SELECTION_LEN],
    valid: bool,
}

impl FieldSelection {
    /// Decodes a field selection mask.
    ///
    /// A mask that is not exactly 17 characters of `'0'`/`'1'` is replaced by
    /// `DEFAULT_FIELD_SELECTION` and a warning naming the offending value is
    /// logged. Never fails.
    pub fn decode(mask: &str) -> Self {
        if MASK_RE.is_match(mask) {
            return Self {
                flags: parse_flags(mask),
                valid: true,
            };
        }

        log::warn!(
            "WHOIS: field selection value should be a {} character string of 0's and 1's - \
             ignoring '{}' and using default value {}",
            FIELD_SELECTION_LEN,
            mask,
            DEFAULT_FIELD_SELECTION
        );
        Self {
            flags: parse_flags(DEFAULT_FIELD_SELECTION),
            valid: false,
        }
    }

    /// Whether `group` is enabled.
    pub fn is_enabled(&self, group: AttributeGroup) -> bool {
        self.flags[group.position()]
    }

    /// The decoded flags, indexed by [`AttributeGroup::position`].
    pub fn flags(&self) -> [bool; FIELD_SELECTION_LEN] {
        self.flags
    }

    /// Enabled groups, in mask order.
    pub fn enabled_groups(&self) -> impl Iterator<Item = AttributeGroup> + '_ {
        AttributeGroup::iter().filter(|g| self.is_enabled(*g))
    }

    /// `false` when the configured mask was malformed and the default was used.
    pub fn was_valid(&self) -> bool {
        self.valid
    }
}

impl Default for FieldSelection {
    fn default() -> Self {
        Self {
            flags: parse_flags(DEFAULT_FIELD_SELECTION),
            valid: true,
        }
    }
}

fn parse_flags(mask: &str) -> [bool; FIELD_SELECTION_LEN] {
    let mut flags = [false; FIELD_SELECTION_LEN];
    for (flag, c) in flags.iter_mut().zip(mask.chars()) {
        *flag = c == '1';
    }
    flags
}
