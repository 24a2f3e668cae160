//! `.strings` table reader
//!
//! Parses the `"key" = "value";` format used by `InfoPlist.strings` and
//! `Localizable.strings`. Parsing is best-effort: any line that does not
//! hold a well-formed pair is skipped.

use crate::read::ResourceRead;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, warn};

fn pair_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#""((?:[^"\\]|\\.)+)"\s*=\s*"((?:[^"\\]|\\.)+)"\s*;"#)
            .expect("strings pair pattern is valid")
    })
}

/// Read a `.strings` file into a key/value table.
///
/// Returns `NotFound` when there is no file and `Malformed` when the bytes
/// are neither UTF-8 nor BOM-marked UTF-16.
pub fn read_key_value_file(path: &Path) -> ResourceRead<BTreeMap<String, String>> {
    if !path.is_file() {
        return ResourceRead::NotFound;
    }

    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Could not read {}: {}", path.display(), e);
            return ResourceRead::Malformed(e.to_string());
        }
    };

    match decode_text(&bytes) {
        Some(text) => {
            let table = parse_strings(&text);
            debug!("Read {} entries from {}", table.len(), path.display());
            ResourceRead::Loaded(table)
        }
        None => {
            warn!("Could not decode {} as UTF-8 or UTF-16", path.display());
            ResourceRead::Malformed("not valid UTF-8 or UTF-16 text".to_string())
        }
    }
}

/// Parse the contents of a `.strings` file.
///
/// Later duplicates overwrite earlier ones.
pub fn parse_strings(text: &str) -> BTreeMap<String, String> {
    let mut table = BTreeMap::new();

    for line in strip_comments(text).lines() {
        for caps in pair_pattern().captures_iter(line) {
            table.insert(unescape(&caps[1]), unescape(&caps[2]));
        }
    }

    table
}

/// Remove `/* */` and `//` comments that are outside quoted strings.
///
/// Quote state resets at each newline so one stray quote cannot swallow
/// the rest of the file.
fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut in_quotes = false;

    while let Some(c) = chars.next() {
        if in_quotes {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(&next) = chars.peek() {
                        if next != '\n' {
                            out.push(next);
                            chars.next();
                        }
                    }
                }
                '"' | '\n' => in_quotes = false,
                _ => {}
            }
            continue;
        }

        match (c, chars.peek().copied()) {
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for inner in chars.by_ref() {
                    if prev == '*' && inner == '/' {
                        break;
                    }
                    prev = inner;
                }
            }
            ('/', Some('/')) => {
                for inner in chars.by_ref() {
                    if inner == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            _ => {
                if c == '"' {
                    in_quotes = true;
                }
                out.push(c);
            }
        }
    }
    out
}

/// Decode UTF-8 (optionally BOM-prefixed) or BOM-marked UTF-16
fn decode_text(bytes: &[u8]) -> Option<String> {
    match bytes {
        [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, u16::from_le_bytes),
        [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, u16::from_be_bytes),
        [0xEF, 0xBB, 0xBF, rest @ ..] => String::from_utf8(rest.to_vec()).ok(),
        _ => String::from_utf8(bytes.to_vec()).ok(),
    }
}

fn decode_utf16(bytes: &[u8], to_unit: fn([u8; 2]) -> u16) -> Option<String> {
    if bytes.len() % 2 != 0 {
        return None;
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| to_unit([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).ok()
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "iconloom_strings_test_{}",
            uuid::Uuid::new_v4()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_parse_basic_pairs() {
        let table = parse_strings(
            r#"
"CFBundleName" = "SleepLoops";
"CFBundleDisplayName"   =   "Sleep Loops" ;
"#,
        );
        assert_eq!(table.len(), 2);
        assert_eq!(table["CFBundleName"], "SleepLoops");
        assert_eq!(table["CFBundleDisplayName"], "Sleep Loops");
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let table = parse_strings(
            r#"
"good" = "value";
"missing_semicolon" = "value"
this is not a pair
= "orphan";
"also_good" = "second";
"#,
        );
        assert_eq!(table.len(), 2);
        assert!(table.contains_key("good"));
        assert!(table.contains_key("also_good"));
    }

    #[test]
    fn test_comments_are_ignored() {
        let table = parse_strings(
            r#"
/* Bundle name
   "hidden" = "block";
*/
// "commented" = "out";
"visible" = "yes"; // trailing comment
"#,
        );
        assert_eq!(table.len(), 1);
        assert_eq!(table["visible"], "yes");
    }

    #[test]
    fn test_comment_markers_inside_values_are_kept() {
        let table = parse_strings(
            "\"glob\" = \"src/*\";\n\"title\" = \"Sleep\";\n\"end\" = \"*/ done\";\n\"url\" = \"https://example.com\";\n",
        );
        assert_eq!(table.len(), 4);
        assert_eq!(table["glob"], "src/*");
        assert_eq!(table["title"], "Sleep");
        assert_eq!(table["end"], "*/ done");
        assert_eq!(table["url"], "https://example.com");
    }

    #[test]
    fn test_stray_quote_does_not_hide_later_lines() {
        let table = parse_strings(
            "\"broken = x\n/* \"hidden\" = \"no\"; */\n\"CFBundleDisplayName\" = \"Sleep Loops\";\n",
        );
        assert_eq!(table.len(), 1);
        assert_eq!(table["CFBundleDisplayName"], "Sleep Loops");
    }

    #[test]
    fn test_escapes_are_decoded() {
        let table = parse_strings(r#""quote" = "Say \"hi\"\nthen \\ leave";"#);
        assert_eq!(table["quote"], "Say \"hi\"\nthen \\ leave");
    }

    #[test]
    fn test_later_duplicate_wins() {
        let table = parse_strings("\"k\" = \"first\";\n\"k\" = \"second\";");
        assert_eq!(table["k"], "second");
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = temp_dir();
        let read = read_key_value_file(&dir.join("Localizable.strings"));
        assert!(read.is_not_found());
        assert!(read.into_value_or_default().is_empty());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_utf16_file_is_decoded() {
        let dir = temp_dir();
        let path = dir.join("InfoPlist.strings");
        let text = "\"CFBundleDisplayName\" = \"睡眠ループ\";\n";
        let mut bytes = vec![0xFF, 0xFE];
        for unit in text.encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        std::fs::write(&path, bytes).unwrap();

        let table = read_key_value_file(&path).loaded().unwrap();
        assert_eq!(table["CFBundleDisplayName"], "睡眠ループ");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_undecodable_file_is_malformed() {
        let dir = temp_dir();
        let path = dir.join("Localizable.strings");
        std::fs::write(&path, [0x22, 0xC3, 0x28, 0x22]).unwrap();

        let read = read_key_value_file(&path);
        assert!(read.is_malformed());
        assert!(read.into_value_or_default().is_empty());

        std::fs::remove_dir_all(&dir).ok();
    }
}
