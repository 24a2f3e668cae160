//! Info.plist reader
//!
//! Accepts both XML and binary property lists. A file that cannot be parsed
//! is reported as `Malformed` and logged; it never stops icon generation.

use crate::read::ResourceRead;
use plist::{Dictionary, Value};
use std::path::Path;
use tracing::warn;

/// Read a property list whose root is a dictionary
pub fn read_property_list(path: &Path) -> ResourceRead<Dictionary> {
    if !path.is_file() {
        return ResourceRead::NotFound;
    }

    match Value::from_file(path) {
        Ok(Value::Dictionary(dict)) => ResourceRead::Loaded(dict),
        Ok(_) => {
            warn!("Ignoring {}: root is not a dictionary", path.display());
            ResourceRead::Malformed("property list root is not a dictionary".to_string())
        }
        Err(e) => {
            warn!("Could not read {}: {}", path.display(), e);
            ResourceRead::Malformed(e.to_string())
        }
    }
}

/// A usable string value for `key`.
///
/// Blank strings and unexpanded build settings such as `$(PRODUCT_NAME)`
/// count as absent.
pub fn string_value(dict: &Dictionary, key: &str) -> Option<String> {
    let value = dict.get(key)?.as_string()?.trim();
    if value.is_empty() || value.starts_with("$(") {
        return None;
    }
    Some(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "iconloom_plist_test_{}",
            uuid::Uuid::new_v4()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    const INFO_PLIST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>CFBundleName</key>
    <string>$(PRODUCT_NAME)</string>
    <key>CFBundleDisplayName</key>
    <string>Sleep Loops</string>
    <key>LSApplicationCategoryType</key>
    <string>public.app-category.healthcare-fitness</string>
</dict>
</plist>
"#;

    #[test]
    fn test_read_xml_plist() {
        let dir = temp_dir();
        let path = dir.join("Info.plist");
        std::fs::write(&path, INFO_PLIST).unwrap();

        let dict = read_property_list(&path).loaded().unwrap();
        assert_eq!(string_value(&dict, "CFBundleDisplayName").as_deref(), Some("Sleep Loops"));
        assert_eq!(
            string_value(&dict, "LSApplicationCategoryType").as_deref(),
            Some("public.app-category.healthcare-fitness")
        );
        assert_eq!(string_value(&dict, "CFBundleName"), None);
        assert_eq!(string_value(&dict, "Missing"), None);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_malformed_plist_degrades() {
        let dir = temp_dir();
        let path = dir.join("Info.plist");
        std::fs::write(&path, "<plist><dict><key>oops").unwrap();

        let read = read_property_list(&path);
        assert!(read.is_malformed());
        assert!(read.into_value_or_default().is_empty());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_plist_is_not_found() {
        let dir = temp_dir();
        assert!(read_property_list(&dir.join("Info.plist")).is_not_found());
        std::fs::remove_dir_all(&dir).ok();
    }
}
