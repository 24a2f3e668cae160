//! `iconloom locales` - discovered locales and their context

use anyhow::Result;
use iconloom_l10n::{find_all_localizations, get_context};
use std::path::Path;

pub fn run(path: &Path) -> Result<()> {
    let locales = find_all_localizations(path)?;
    if locales.is_empty() {
        println!("No localizations found in {}", path.display());
        return Ok(());
    }

    println!("{} locale(s):\n", locales.len());
    for locale in &locales {
        let context = get_context(path, locale);
        println!("{}", locale);
        if let Some(name) = context.preferred_name() {
            println!("  Name: {}", name);
        }
        if let Some(description) = &context.description {
            println!("  Description: {}", description);
        }
        if let Some(category) = &context.category {
            println!("  Category: {}", category);
        }
        if !context.localized_strings.is_empty() {
            println!("  Strings: {}", context.localized_strings.len());
        }
        for malformed in &context.sources.malformed {
            println!("  Unreadable: {}", malformed.display());
        }
    }
    Ok(())
}
