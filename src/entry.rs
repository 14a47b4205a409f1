//! Raw Contentful entry model for the What's New Panel content type.
//!
//! Contentful wraps every linked entry in a `{fields: {...}}` envelope, one
//! level per link. The types here mirror that wire shape directly so that
//! deserialization is the only unwrapping step - the transform stages then
//! work on plain structs.

use serde::Deserialize;

/// The `{fields: {...}}` envelope Contentful puts around linked entries.
///
/// Appears once per link depth: the `content` and `targeting` links on the
/// top-level entry, and again around each targeting sub-record.
#[derive(Debug, Clone, Deserialize)]
pub struct Fields<T> {
    pub fields: T,
}

/// One raw What's New Panel entry, as fetched from Contentful.
///
/// `content` is required - an entry without it cannot be transformed and is
/// rejected when the raw JSON is shaped into this type. `targeting` is
/// optional; its absence means the message targets everyone.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEntry {
    pub id: String,
    pub order: i64,
    pub content: Fields<ContentFields>,
    #[serde(default)]
    pub targeting: Option<Fields<TargetingFields>>,
}

/// Content fields of a panel entry.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentFields {
    pub publish_date: String,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub icon_url: Option<Fields<IconFields>>,
    pub icon_alt: String,
    pub cta_type: String,
    #[serde(default)]
    pub cta_url: Option<String>,
    pub cta_where: String,
    pub link_text: String,
}

/// Fields of a linked icon asset. Only the file record matters here; the
/// asset title and other metadata are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct IconFields {
    pub file: IconFile,
}

/// The file record inside an icon asset. Width, size and content type are
/// dropped - only the base file name is carried into the output.
#[derive(Debug, Clone, Deserialize)]
pub struct IconFile {
    #[serde(rename = "fileName")]
    pub file_name: String,
}

/// Targeting sub-records of a panel entry.
///
/// Every dimension is optional: the editor widgets only write a sub-record
/// once opened. `other` is a free-form expression fragment stored without a
/// `fields` envelope or gate.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TargetingFields {
    pub version: Option<Fields<VersionFields>>,
    pub locale: Option<Fields<LocaleFields>>,
    pub region: Option<Fields<RegionFields>>,
    pub other: Option<String>,
}

/// Version targeting as persisted by the version editor widget.
///
/// `choose_version` gates the dimension; when the widget was never opened
/// the gate field is absent, which deserializes to `false` and is treated
/// identically to an explicit `false`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VersionFields {
    #[serde(rename = "chooseVersion")]
    pub choose_version: bool,
    pub version: String,
}

/// Locale targeting as persisted by the locale editor widget.
///
/// `locale_type` selects whether `value` matches the full locale or only
/// the language code.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LocaleFields {
    #[serde(rename = "chooseLocale")]
    pub choose_locale: bool,
    #[serde(rename = "localeType")]
    pub locale_type: String,
    pub value: String,
}

/// Region targeting as persisted by the region editor widget. `region` is a
/// 2-letter country code.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegionFields {
    #[serde(rename = "chooseRegion")]
    pub choose_region: bool,
    pub region: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_minimal_entry() {
        let raw = json!({
            "id": "MSG_1",
            "order": 3,
            "content": {
                "fields": {
                    "publish_date": "2020-11-06",
                    "title": "Title",
                    "body": "Body",
                    "icon_alt": "alt",
                    "cta_type": "OPEN_URL",
                    "cta_where": "tab",
                    "link_text": "Learn more"
                }
            }
        });

        let entry: RawEntry = serde_json::from_value(raw).unwrap();

        assert_eq!(entry.id, "MSG_1");
        assert_eq!(entry.order, 3);
        assert!(entry.targeting.is_none());
        assert!(entry.content.fields.icon_url.is_none());
        assert!(entry.content.fields.cta_url.is_none());
    }

    #[test]
    fn test_deserialize_targeting_sub_records() {
        let raw = json!({
            "version": { "fields": { "chooseVersion": true, "version": "82" } },
            "locale": {
                "fields": { "chooseLocale": true, "localeType": "locale", "value": "en-US" }
            },
            "region": { "fields": { "chooseRegion": true, "region": "US" } },
            "other": "usesFirefoxSync"
        });

        let targeting: TargetingFields = serde_json::from_value(raw).unwrap();

        assert!(targeting.version.unwrap().fields.choose_version);
        assert_eq!(targeting.locale.unwrap().fields.value, "en-US");
        assert_eq!(targeting.region.unwrap().fields.region, "US");
        assert_eq!(targeting.other.as_deref(), Some("usesFirefoxSync"));
    }

    #[test]
    fn test_absent_gate_deserializes_to_false() {
        // A wrapper present without its gate key reads as gate = false,
        // same as a widget that was opened and left disabled.
        let raw = json!({ "fields": { "version": "82" } });

        let version: Fields<VersionFields> = serde_json::from_value(raw).unwrap();

        assert!(!version.fields.choose_version);
        assert_eq!(version.fields.version, "82");
    }

    #[test]
    fn test_entry_without_content_is_rejected() {
        let raw = json!({ "id": "MSG_1", "order": 0 });

        assert!(serde_json::from_value::<RawEntry>(raw).is_err());
    }

    #[test]
    fn test_icon_file_drops_asset_metadata() {
        let raw = json!({
            "fields": {
                "title": "lockwise-mobile",
                "file": {
                    "url": "//images.ctfassets.net/a/b/c/lockwise-mobile.svg",
                    "details": { "size": 6907 },
                    "fileName": "lockwise-mobile.svg",
                    "contentType": "image/svg+xml"
                }
            }
        });

        let icon: Fields<IconFields> = serde_json::from_value(raw).unwrap();

        assert_eq!(icon.fields.file.file_name, "lockwise-mobile.svg");
    }
}
