//! Per-locale app context resolution
//!
//! Search order, first readable file wins for each resource:
//! 1. Names: `<locale>.lproj/InfoPlist.strings` > `Base.lproj/...` > `<root>/InfoPlist.strings`
//! 2. Free-form strings: `<locale>.lproj/Localizable.strings` > `Base.lproj/...` > `<root>/...`
//! 3. Category and any name still missing: the first `Info.plist` among
//!    `<root>`, `<root>/Resources`, `<root>/Supporting Files`

use crate::property_list::{read_property_list, string_value};
use crate::read::ResourceRead;
use crate::strings::read_key_value_file;
use iconloom_core::{IconloomError, Result};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::debug;

const BASE_LOCALE: &str = "Base";
const LPROJ_SUFFIX: &str = ".lproj";
const INFO_STRINGS: &str = "InfoPlist.strings";
const LOCALIZABLE_STRINGS: &str = "Localizable.strings";
const DESCRIPTION_KEY: &str = "AppDescription";

/// Which files a context was assembled from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContextSources {
    pub info_strings: Option<PathBuf>,
    pub localizable_strings: Option<PathBuf>,
    pub info_plist: Option<PathBuf>,
    /// Files that existed but could not be parsed
    pub malformed: Vec<PathBuf>,
}

/// App metadata mined from one locale's resources.
///
/// Every field is optional: a project with no resources at all yields a
/// context with nothing set, which is not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LocalizationContext {
    pub locale: String,
    pub app_name: Option<String>,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub localized_strings: BTreeMap<String, String>,
    pub sources: ContextSources,
}

impl LocalizationContext {
    /// An empty context for `locale`
    pub fn empty(locale: &str) -> Self {
        Self {
            locale: locale.to_string(),
            ..Default::default()
        }
    }

    /// The name the app shows to users in this locale, if any
    pub fn preferred_name(&self) -> Option<&str> {
        self.display_name.as_deref().or(self.app_name.as_deref())
    }

    /// True when no metadata was found
    pub fn is_empty(&self) -> bool {
        self.app_name.is_none()
            && self.display_name.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.localized_strings.is_empty()
    }
}

/// Build the localization context for `locale` under `project_root`
pub fn get_context(project_root: &Path, locale: &str) -> LocalizationContext {
    let mut context = LocalizationContext::empty(locale);
    let lproj = project_root.join(format!("{}{}", locale, LPROJ_SUFFIX));
    let base = project_root.join(format!("{}{}", BASE_LOCALE, LPROJ_SUFFIX));

    let info_candidates = [
        lproj.join(INFO_STRINGS),
        base.join(INFO_STRINGS),
        project_root.join(INFO_STRINGS),
    ];
    if let Some((path, table)) = first_loaded(&info_candidates, read_key_value_file, &mut context) {
        context.app_name = non_blank(table.get("CFBundleName"));
        context.display_name = non_blank(table.get("CFBundleDisplayName"));
        context.description = non_blank(table.get(DESCRIPTION_KEY));
        context.sources.info_strings = Some(path);
    }

    let localizable_candidates = [
        lproj.join(LOCALIZABLE_STRINGS),
        base.join(LOCALIZABLE_STRINGS),
        project_root.join(LOCALIZABLE_STRINGS),
    ];
    if let Some((path, table)) =
        first_loaded(&localizable_candidates, read_key_value_file, &mut context)
    {
        context.localized_strings = table;
        context.sources.localizable_strings = Some(path);
    }

    let plist_candidates = [
        project_root.join("Info.plist"),
        project_root.join("Resources").join("Info.plist"),
        project_root.join("Supporting Files").join("Info.plist"),
    ];
    if let Some((path, plist)) = first_loaded(&plist_candidates, read_property_list, &mut context) {
        if context.app_name.is_none() {
            context.app_name = string_value(&plist, "CFBundleName");
        }
        if context.display_name.is_none() {
            context.display_name = string_value(&plist, "CFBundleDisplayName");
        }
        context.category = string_value(&plist, "LSApplicationCategoryType");
        context.sources.info_plist = Some(path);
    }

    debug!(
        "Context for '{}': name={:?} display={:?} strings={}",
        locale,
        context.app_name,
        context.display_name,
        context.localized_strings.len()
    );
    context
}

/// Every `<code>.lproj` directory directly under `project_root`, except `Base`
pub fn find_all_localizations(project_root: &Path) -> Result<BTreeSet<String>> {
    if !project_root.is_dir() {
        return Err(IconloomError::NotFound(format!(
            "Project directory {}",
            project_root.display()
        )));
    }

    let mut locales = BTreeSet::new();
    for entry in std::fs::read_dir(project_root)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if let Some(code) = name.strip_suffix(LPROJ_SUFFIX) {
            if !code.is_empty() && code != BASE_LOCALE {
                locales.insert(code.to_string());
            }
        }
    }

    debug!("Found {} localizations in {}", locales.len(), project_root.display());
    Ok(locales)
}

/// First candidate that parses. Malformed files are recorded and skipped.
fn first_loaded<T>(
    candidates: &[PathBuf],
    reader: fn(&Path) -> ResourceRead<T>,
    context: &mut LocalizationContext,
) -> Option<(PathBuf, T)> {
    for path in candidates {
        match reader(path) {
            ResourceRead::Loaded(value) => return Some((path.clone(), value)),
            ResourceRead::NotFound => {}
            ResourceRead::Malformed(_) => context.sources.malformed.push(path.clone()),
        }
    }
    None
}

fn non_blank(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_project() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "iconloom_context_test_{}",
            uuid::Uuid::new_v4()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    const PLIST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<plist version="1.0">
<dict>
    <key>CFBundleName</key>
    <string>PlistName</string>
    <key>CFBundleDisplayName</key>
    <string>Plist Display</string>
    <key>LSApplicationCategoryType</key>
    <string>public.app-category.productivity</string>
</dict>
</plist>
"#;

    #[test]
    fn test_names_from_strings_without_plist() {
        let root = temp_project();
        write(
            &root,
            "ja.lproj/InfoPlist.strings",
            "\"CFBundleName\" = \"睡眠\";\n\"CFBundleDisplayName\" = \"睡眠ループ\";",
        );
        write(&root, "ja.lproj/Localizable.strings", "\"start\" = \"開始\";");

        let ctx = get_context(&root, "ja");
        assert_eq!(ctx.locale, "ja");
        assert_eq!(ctx.app_name.as_deref(), Some("睡眠"));
        assert_eq!(ctx.display_name.as_deref(), Some("睡眠ループ"));
        assert_eq!(ctx.localized_strings["start"], "開始");
        assert_eq!(ctx.category, None);
        assert!(ctx.sources.info_plist.is_none());

        std::fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_locale_strings_win_over_base() {
        let root = temp_project();
        write(&root, "en.lproj/InfoPlist.strings", "\"CFBundleDisplayName\" = \"English\";");
        write(&root, "Base.lproj/InfoPlist.strings", "\"CFBundleDisplayName\" = \"Base\";");

        let en = get_context(&root, "en");
        assert_eq!(en.display_name.as_deref(), Some("English"));
        assert_eq!(en.sources.info_strings, Some(root.join("en.lproj/InfoPlist.strings")));

        let fr = get_context(&root, "fr");
        assert_eq!(fr.display_name.as_deref(), Some("Base"));

        std::fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_root_level_strings_are_last_resort() {
        let root = temp_project();
        write(&root, "Localizable.strings", "\"greeting\" = \"hello\";");

        let ctx = get_context(&root, "de");
        assert_eq!(ctx.localized_strings["greeting"], "hello");
        assert_eq!(ctx.sources.localizable_strings, Some(root.join("Localizable.strings")));

        std::fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_plist_fills_only_missing_names() {
        let root = temp_project();
        write(&root, "es.lproj/InfoPlist.strings", "\"CFBundleDisplayName\" = \"Ciclos\";");
        write(&root, "Supporting Files/Info.plist", PLIST);

        let ctx = get_context(&root, "es");
        assert_eq!(ctx.display_name.as_deref(), Some("Ciclos"));
        assert_eq!(ctx.app_name.as_deref(), Some("PlistName"));
        assert_eq!(ctx.category.as_deref(), Some("public.app-category.productivity"));
        assert_eq!(
            ctx.sources.info_plist,
            Some(root.join("Supporting Files").join("Info.plist"))
        );

        std::fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_root_plist_wins_over_resources_plist() {
        let root = temp_project();
        write(&root, "Info.plist", PLIST);
        write(
            &root,
            "Resources/Info.plist",
            &PLIST.replace("public.app-category.productivity", "public.app-category.games"),
        );

        let ctx = get_context(&root, "en");
        assert_eq!(ctx.category.as_deref(), Some("public.app-category.productivity"));

        std::fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_malformed_locale_file_falls_back() {
        let root = temp_project();
        std::fs::create_dir_all(root.join("it.lproj")).unwrap();
        std::fs::write(root.join("it.lproj/InfoPlist.strings"), [0xC3, 0x28]).unwrap();
        write(&root, "Base.lproj/InfoPlist.strings", "\"CFBundleName\" = \"Base\";");

        let ctx = get_context(&root, "it");
        assert_eq!(ctx.app_name.as_deref(), Some("Base"));
        assert_eq!(ctx.sources.malformed, vec![root.join("it.lproj/InfoPlist.strings")]);

        std::fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_empty_project_yields_empty_context() {
        let root = temp_project();
        let ctx = get_context(&root, "en");
        assert!(ctx.is_empty());
        assert_eq!(ctx.preferred_name(), None);
        std::fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_find_all_localizations_skips_base_and_files() {
        let root = temp_project();
        for dir in ["en.lproj", "zh-Hant.lproj", "Base.lproj", "Assets.xcassets", ".lproj"] {
            std::fs::create_dir_all(root.join(dir)).unwrap();
        }
        write(&root, "fr.lproj.bak", "not a dir");
        write(&root, "ja.lproj", "a file, not a directory");

        let locales = find_all_localizations(&root).unwrap();
        let found: Vec<&str> = locales.iter().map(String::as_str).collect();
        assert_eq!(found, vec!["en", "zh-Hant"]);

        std::fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_find_all_localizations_missing_root() {
        let root = temp_project().join("does-not-exist");
        assert!(find_all_localizations(&root).is_err());
    }
}
