//! Prompt composition
//!
//! Turns a `PromptSpec` plus an optional localization context into the
//! instruction text sent to the image backend. Output is a pure function of
//! the inputs and the section order is fixed:
//!
//! 1. title, 2. technical specifications, 3. app context, 4. localization,
//! 5. visual elements, 6. text display, 7. additional requirements.
//!
//! Sections whose inputs are empty are left out entirely.

use crate::spec::PromptSpec;
use iconloom_l10n::LocalizationContext;

/// Name used when neither the project nor the caller supplies one
pub const FALLBACK_APP_NAME: &str = "App";

/// Number of localized strings quoted in the localization section
pub const SAMPLED_STRINGS: usize = 5;

/// Default design direction per locale code
pub const CULTURAL_STYLES: &[(&str, &str)] = &[
    ("en", "American/International design aesthetic"),
    ("en-US", "American design with Silicon Valley tech aesthetic"),
    ("en-GB", "British design with elegant minimalism"),
    ("ja", "Japanese design with attention to harmony and minimalism (wa aesthetic)"),
    ("ko", "Korean modern K-design aesthetic with soft gradients"),
    ("zh-Hans", "Simplified Chinese modern style with contemporary elements"),
    ("zh-Hant", "Traditional Chinese elegant style with cultural depth"),
    ("es", "Spanish warm and inviting design"),
    ("es-MX", "Mexican vibrant and colorful style"),
    ("fr", "French elegant and sophisticated design"),
    ("de", "German precise and functional design (Bauhaus influence)"),
    ("it", "Italian stylish and artistic design"),
    ("pt-BR", "Brazilian lively and energetic design"),
    ("ar", "Arabic elegant design with right-to-left consideration"),
    ("ru", "Russian bold and impactful design"),
    ("nl", "Dutch clean and practical design"),
    ("sv", "Swedish minimalist Scandinavian design"),
    ("da", "Danish hygge-inspired cozy design"),
    ("fi", "Finnish functional Nordic design"),
    ("no", "Norwegian nature-inspired minimalism"),
    ("pl", "Polish traditional meets modern design"),
    ("tr", "Turkish blend of Eastern and Western aesthetics"),
    ("he", "Hebrew modern design with right-to-left layout"),
    ("hi", "Hindi vibrant Indian aesthetic"),
    ("th", "Thai ornate and detailed design"),
    ("vi", "Vietnamese balanced and harmonious design"),
];

/// Default cultural style for a locale code.
///
/// Exact code first, then its language subtag (`es-ES` falls back to `es`).
pub fn cultural_style_for(locale: &str) -> Option<&'static str> {
    let lookup = |code: &str| {
        CULTURAL_STYLES
            .iter()
            .find(|(key, _)| *key == code)
            .map(|(_, style)| *style)
    };
    lookup(locale).or_else(|| {
        let language = locale.split(['-', '_']).next()?;
        if language == locale {
            None
        } else {
            lookup(language)
        }
    })
}

/// Resolve the app name: context display name, then context app name,
/// then the caller's name, then `"App"`.
pub fn effective_app_name(spec_name: &str, context: Option<&LocalizationContext>) -> String {
    context
        .and_then(LocalizationContext::preferred_name)
        .or_else(|| present(spec_name))
        .unwrap_or(FALLBACK_APP_NAME)
        .to_string()
}

/// Compose the generation prompt
pub fn build_prompt(spec: &PromptSpec, context: Option<&LocalizationContext>) -> String {
    let app_name = effective_app_name(&spec.app_name, context);
    let style = spec.style.as_str();

    let mut sections: Vec<Vec<String>> = Vec::new();

    sections.push(vec![format!("Create a {} iOS app icon for \"{}\"", style, app_name)]);

    sections.push(vec![
        "TECHNICAL SPECIFICATIONS:".to_string(),
        "- Size: 1024x1024 pixel perfect square".to_string(),
        format!(
            "- Background: Smooth vertical gradient from {} (top) to {} (bottom)",
            spec.colors.top, spec.colors.bottom
        ),
        "- Format: Full bleed to edges, no rounded corners (iOS adds these automatically)"
            .to_string(),
        format!("- Style: {} design with no 3D effects or excessive shadows", style),
        "- Quality: Professional App Store ready icon".to_string(),
    ]);

    let description = opt_present(spec.app_description.as_deref())
        .or_else(|| context.and_then(|c| opt_present(c.description.as_deref())));
    let audience = opt_present(spec.target_audience.as_deref());
    let category = context.and_then(|c| opt_present(c.category.as_deref()));
    let mut app_context = Vec::new();
    if let Some(purpose) = description {
        app_context.push(format!("- Purpose: {}", purpose));
    }
    if let Some(audience) = audience {
        app_context.push(format!("- Target Audience: {}", audience));
    }
    if let Some(category) = category {
        app_context.push(format!("- Category: {}", category));
    }
    push_section(&mut sections, "APP CONTEXT:", app_context);

    let mut localization = Vec::new();
    if let Some(locale) = present(&spec.locale) {
        localization.push(format!("- Locale: {}", locale));
    }
    let cultural = opt_present(spec.cultural_style.as_deref())
        .or_else(|| cultural_style_for(spec.locale.trim()));
    if let Some(cultural) = cultural {
        localization.push(format!("- Cultural Style: {}", cultural));
    }
    if let Some(ctx) = context {
        if !ctx.localized_strings.is_empty() {
            localization.push("- App Context (from localization):".to_string());
            for (key, value) in ctx.localized_strings.iter().take(SAMPLED_STRINGS) {
                localization.push(format!("  • {}: {}", key, value));
            }
        }
    }
    push_section(&mut sections, "LOCALIZATION:", localization);

    let elements: Vec<&str> = spec
        .icon_elements
        .iter()
        .filter_map(|e| present(e))
        .collect();
    if !elements.is_empty() {
        sections.push(vec![
            "VISUAL ELEMENTS:".to_string(),
            format!("Include these elements in the design: {}", elements.join(", ")),
        ]);
    }

    sections.push(vec![
        "TEXT DISPLAY:".to_string(),
        format!("- Primary text: '{}'", app_name),
        "- Include text only if it enhances the design and remains legible at small sizes"
            .to_string(),
        "- For non-Latin scripts, ensure proper character rendering".to_string(),
    ]);

    if let Some(extra) = opt_present(spec.additional_prompt.as_deref()) {
        sections.push(vec!["ADDITIONAL REQUIREMENTS:".to_string(), extra.to_string()]);
    }

    sections
        .iter()
        .map(|lines| lines.join("\n"))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn push_section(sections: &mut Vec<Vec<String>>, heading: &str, lines: Vec<String>) {
    if lines.is_empty() {
        return;
    }
    let mut section = Vec::with_capacity(lines.len() + 1);
    section.push(heading.to_string());
    section.extend(lines);
    sections.push(section);
}

fn present(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn opt_present(value: Option<&str>) -> Option<&str> {
    value.and_then(present)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{ColorPair, IconStyle};

    fn context(locale: &str) -> LocalizationContext {
        LocalizationContext::empty(locale)
    }

    #[test]
    fn test_minimal_prompt_exact_text() {
        let spec = PromptSpec::new("SleepLoops");
        let expected = "\
Create a minimalist iOS app icon for \"SleepLoops\"

TECHNICAL SPECIFICATIONS:
- Size: 1024x1024 pixel perfect square
- Background: Smooth vertical gradient from #1E3A8A (top) to #60A5FA (bottom)
- Format: Full bleed to edges, no rounded corners (iOS adds these automatically)
- Style: minimalist design with no 3D effects or excessive shadows
- Quality: Professional App Store ready icon

LOCALIZATION:
- Locale: en
- Cultural Style: American/International design aesthetic

TEXT DISPLAY:
- Primary text: 'SleepLoops'
- Include text only if it enhances the design and remains legible at small sizes
- For non-Latin scripts, ensure proper character rendering";
        assert_eq!(build_prompt(&spec, None), expected);
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let mut spec = PromptSpec::new("SleepLoops");
        spec.icon_elements = vec!["moon".to_string(), "stars".to_string()];
        let mut ctx = context("ja");
        for i in 0..10 {
            ctx.localized_strings.insert(format!("key{}", i), format!("value{}", i));
        }
        assert_eq!(build_prompt(&spec, Some(&ctx)), build_prompt(&spec, Some(&ctx)));
    }

    #[test]
    fn test_section_order() {
        let mut spec = PromptSpec::new("SleepLoops");
        spec.style = IconStyle::Modern;
        spec.colors = ColorPair::parse("#EA580C", "#FB923C").unwrap();
        spec.app_description = Some("Track sleep cycles".to_string());
        spec.target_audience = Some("Shift workers".to_string());
        spec.icon_elements = vec!["crescent moon".to_string(), " ".to_string(), "wave".to_string()];
        spec.additional_prompt = Some("Warm orange gradient".to_string());
        let mut ctx = context("en");
        ctx.category = Some("public.app-category.healthcare-fitness".to_string());
        ctx.localized_strings.insert("alarm".to_string(), "Alarm".to_string());

        let prompt = build_prompt(&spec, Some(&ctx));
        let headings = [
            "Create a modern iOS app icon",
            "TECHNICAL SPECIFICATIONS:",
            "APP CONTEXT:",
            "LOCALIZATION:",
            "VISUAL ELEMENTS:",
            "TEXT DISPLAY:",
            "ADDITIONAL REQUIREMENTS:",
        ];
        let positions: Vec<usize> = headings.iter().map(|h| prompt.find(h).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{:?}", positions);

        assert!(prompt.contains("- Purpose: Track sleep cycles\n- Target Audience: Shift workers\n- Category: public.app-category.healthcare-fitness"));
        assert!(prompt.contains("Include these elements in the design: crescent moon, wave"));
        assert!(prompt.contains("from #EA580C (top) to #FB923C (bottom)"));
        assert!(prompt.ends_with("ADDITIONAL REQUIREMENTS:\nWarm orange gradient"));
    }

    #[test]
    fn test_name_precedence() {
        let spec = PromptSpec::new("SpecName");
        let mut ctx = context("en");
        assert_eq!(effective_app_name("SpecName", Some(&ctx)), "SpecName");

        ctx.app_name = Some("ContextName".to_string());
        assert_eq!(effective_app_name("SpecName", Some(&ctx)), "ContextName");

        ctx.display_name = Some("Display Name".to_string());
        assert_eq!(effective_app_name("SpecName", Some(&ctx)), "Display Name");
        assert!(build_prompt(&spec, Some(&ctx)).contains("for \"Display Name\""));

        assert_eq!(effective_app_name("  ", None), FALLBACK_APP_NAME);
        assert_eq!(effective_app_name("", Some(&context("en"))), "App");
    }

    #[test]
    fn test_explicit_description_wins() {
        let mut spec = PromptSpec::new("A");
        let mut ctx = context("en");
        ctx.description = Some("From resources".to_string());
        assert!(build_prompt(&spec, Some(&ctx)).contains("- Purpose: From resources"));

        spec.app_description = Some("Explicit".to_string());
        let prompt = build_prompt(&spec, Some(&ctx));
        assert!(prompt.contains("- Purpose: Explicit"));
        assert!(!prompt.contains("From resources"));
    }

    #[test]
    fn test_cultural_style_resolution() {
        let mut spec = PromptSpec::new("A");
        spec.locale = "de".to_string();
        assert!(build_prompt(&spec, None)
            .contains("- Cultural Style: German precise and functional design (Bauhaus influence)"));

        spec.cultural_style = Some("Retro arcade".to_string());
        assert!(build_prompt(&spec, None).contains("- Cultural Style: Retro arcade"));

        spec.cultural_style = None;
        spec.locale = "xx".to_string();
        let prompt = build_prompt(&spec, None);
        assert!(prompt.contains("- Locale: xx"));
        assert!(!prompt.contains("Cultural Style"));
    }

    #[test]
    fn test_cultural_style_language_fallback() {
        assert_eq!(cultural_style_for("es-MX"), Some("Mexican vibrant and colorful style"));
        assert_eq!(cultural_style_for("es-ES"), Some("Spanish warm and inviting design"));
        assert_eq!(cultural_style_for("pt-PT"), None);
        assert_eq!(cultural_style_for("pt-BR"), Some("Brazilian lively and energetic design"));
    }

    #[test]
    fn test_samples_first_five_strings() {
        let spec = PromptSpec::new("A");
        let mut ctx = context("en");
        for key in ["g", "a", "f", "b", "e", "c", "d"] {
            ctx.localized_strings.insert(key.to_string(), key.to_uppercase());
        }
        let prompt = build_prompt(&spec, Some(&ctx));
        assert!(prompt.contains(
            "- App Context (from localization):\n  • a: A\n  • b: B\n  • c: C\n  • d: D\n  • e: E\n\nTEXT DISPLAY:"
        ));
        assert!(!prompt.contains("  • f: F"));
    }

    #[test]
    fn test_empty_sections_are_omitted() {
        let mut spec = PromptSpec::new("A");
        spec.locale = String::new();
        spec.app_description = Some("   ".to_string());
        spec.additional_prompt = Some(String::new());
        let prompt = build_prompt(&spec, None);
        assert!(!prompt.contains("APP CONTEXT:"));
        assert!(!prompt.contains("LOCALIZATION:"));
        assert!(!prompt.contains("VISUAL ELEMENTS:"));
        assert!(!prompt.contains("ADDITIONAL REQUIREMENTS:"));
        assert!(prompt.contains("TEXT DISPLAY:"));
    }
}
