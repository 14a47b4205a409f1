//! Targeting compilation for panel entries.
//!
//! Compiles an entry's optional targeting sub-records into one boolean JEXL
//! expression. Each dimension is evaluated independently to either a clause
//! fragment or nothing; the surviving fragments are AND-joined in a fixed
//! order so the compiled string is deterministic and diffable downstream.

use crate::entry::{Fields, LocaleFields, RawEntry, RegionFields, VersionFields};

/// The always-true expression emitted when an entry has no effective
/// targeting.
const MATCH_ALL: &str = "true";

const CLAUSE_SEPARATOR: &str = " && ";

/// Compile one entry's targeting into a JEXL filter expression.
///
/// Returns `"true"` when the entry has no targeting record at all, or when
/// every clause evaluates to nothing (all gates off, `other` blank).
pub fn compile_targeting(entry: &RawEntry) -> String {
    let Some(targeting) = entry.targeting.as_ref() else {
        return MATCH_ALL.to_string();
    };

    let raw = &targeting.fields;

    // Clause order is part of the output contract; downstream consumers log
    // and diff the compiled strings.
    let clauses = [
        version_clause(raw.version.as_ref()),
        locale_clause(raw.locale.as_ref()),
        region_clause(raw.region.as_ref()),
        other_clause(raw.other.as_deref()),
    ];

    let compiled = clauses
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(CLAUSE_SEPARATOR);

    if compiled.is_empty() {
        MATCH_ALL.to_string()
    } else {
        compiled
    }
}

/// Version clause: `firefoxVersion == <version>` when the gate is on.
///
/// The version value is a numeric-looking string and is inserted unquoted,
/// without validation.
fn version_clause(version: Option<&Fields<VersionFields>>) -> Option<String> {
    let fields = &version?.fields;
    if !fields.choose_version {
        return None;
    }
    Some(format!("firefoxVersion == {}", fields.version))
}

/// Locale clause: `locale == "<value>"`, or `languageCode == "<value>"` when
/// the widget stored a language-only match.
///
/// The value is interpolated verbatim between double quotes; the editor
/// widget is trusted to never store a value containing a quote.
fn locale_clause(locale: Option<&Fields<LocaleFields>>) -> Option<String> {
    let fields = &locale?.fields;
    if !fields.choose_locale {
        return None;
    }
    let attribute = if fields.locale_type == "language" {
        "languageCode"
    } else {
        "locale"
    };
    Some(format!("{} == \"{}\"", attribute, fields.value))
}

/// Region clause: `region == "<code>"` when the gate is on.
fn region_clause(region: Option<&Fields<RegionFields>>) -> Option<String> {
    let fields = &region?.fields;
    if !fields.choose_region {
        return None;
    }
    Some(format!("region == \"{}\"", fields.region))
}

/// Free-form clause: the trimmed fragment wrapped in parentheses.
///
/// The fragment is passed through without syntax checking; a malformed
/// expression only surfaces when the client evaluates the compiled string.
fn other_clause(other: Option<&str>) -> Option<String> {
    let trimmed = other?.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(format!("({})", trimmed))
}
