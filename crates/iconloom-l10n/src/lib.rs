//! iconloom L10n - localization context extraction
//!
//! Mines an iOS project's `.lproj` resources and `Info.plist` for the
//! metadata used to steer icon generation: app name, display name,
//! category and a sample of localized strings. Missing or malformed
//! resources never abort a read; they degrade to an empty context.

pub mod context;
pub mod property_list;
pub mod read;
pub mod strings;

pub use context::{find_all_localizations, get_context, ContextSources, LocalizationContext};
pub use property_list::read_property_list;
pub use read::ResourceRead;
pub use strings::{parse_strings, read_key_value_file};
