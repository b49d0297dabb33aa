//! Built-in formatting options understood by formatcheck.
//!
//! The set of options is closed, so the catalogue is a static table rather
//! than something discovered at runtime. Convention keys follow the
//! `.editorconfig` property names.

use std::borrow::Cow;

use once_cell::sync::Lazy;

use crate::descriptor::{OptionDescriptor, OptionValue, ValueType};
use crate::set::ResolvedOptionSet;

pub const INDENT_STYLE: OptionDescriptor = OptionDescriptor {
    name: "indent_style",
    value_type: ValueType::Enum(&["space", "tab"]),
    is_per_language: true,
    convention_key: Some("indent_style"),
    default: OptionValue::Enum("space"),
};

pub const INDENT_SIZE: OptionDescriptor = OptionDescriptor {
    name: "indent_size",
    value_type: ValueType::Int,
    is_per_language: true,
    convention_key: Some("indent_size"),
    default: OptionValue::Int(4),
};

pub const TAB_WIDTH: OptionDescriptor = OptionDescriptor {
    name: "tab_width",
    value_type: ValueType::Int,
    is_per_language: true,
    convention_key: Some("tab_width"),
    default: OptionValue::Int(4),
};

pub const END_OF_LINE: OptionDescriptor = OptionDescriptor {
    name: "end_of_line",
    value_type: ValueType::Enum(&["lf", "crlf", "cr"]),
    is_per_language: true,
    convention_key: Some("end_of_line"),
    default: OptionValue::Enum("lf"),
};

pub const INSERT_FINAL_NEWLINE: OptionDescriptor = OptionDescriptor {
    name: "insert_final_newline",
    value_type: ValueType::Bool,
    is_per_language: true,
    convention_key: Some("insert_final_newline"),
    default: OptionValue::Bool(true),
};

pub const TRIM_TRAILING_WHITESPACE: OptionDescriptor = OptionDescriptor {
    name: "trim_trailing_whitespace",
    value_type: ValueType::Bool,
    is_per_language: true,
    convention_key: Some("trim_trailing_whitespace"),
    default: OptionValue::Bool(true),
};

pub const CHARSET: OptionDescriptor = OptionDescriptor {
    name: "charset",
    value_type: ValueType::String,
    is_per_language: false,
    convention_key: Some("charset"),
    default: OptionValue::String(Cow::Borrowed("utf-8")),
};

/// Editor-side indentation behaviour; carried for hosts but not read from
/// convention files.
pub const SMART_INDENT: OptionDescriptor = OptionDescriptor {
    name: "smart_indent",
    value_type: ValueType::Enum(&["none", "block", "smart"]),
    is_per_language: true,
    convention_key: None,
    default: OptionValue::Enum("smart"),
};

/// Every built-in option, in resolution order.
pub static FORMATTING_OPTIONS: &[OptionDescriptor] = &[
    INDENT_STYLE,
    INDENT_SIZE,
    TAB_WIDTH,
    END_OF_LINE,
    INSERT_FINAL_NEWLINE,
    TRIM_TRAILING_WHITESPACE,
    CHARSET,
    SMART_INDENT,
];

static DEFAULT_OPTIONS: Lazy<ResolvedOptionSet> =
    Lazy::new(|| ResolvedOptionSet::from_defaults(FORMATTING_OPTIONS));

/// Option set holding the built-in defaults, shared process-wide.
pub fn default_options() -> ResolvedOptionSet {
    DEFAULT_OPTIONS.clone()
}

/// Look up a built-in option by its convention key.
pub fn find_by_convention_key(key: &str) -> Option<&'static OptionDescriptor> {
    FORMATTING_OPTIONS
        .iter()
        .find(|descriptor| descriptor.convention_key == Some(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_and_keys_are_unique() {
        let names: HashSet<_> = FORMATTING_OPTIONS.iter().map(|d| d.name).collect();
        assert_eq!(names.len(), FORMATTING_OPTIONS.len());

        let keys: Vec<_> = FORMATTING_OPTIONS
            .iter()
            .filter_map(|d| d.convention_key)
            .collect();
        let unique: HashSet<_> = keys.iter().collect();
        assert_eq!(unique.len(), keys.len());
    }

    #[test]
    fn defaults_match_their_types() {
        for descriptor in FORMATTING_OPTIONS {
            assert!(
                descriptor.default.matches(&descriptor.value_type),
                "{} default does not match its type",
                descriptor.name
            );
        }
    }

    #[test]
    fn lookup_by_key_skips_unconfigurable_options() {
        assert_eq!(find_by_convention_key("tab_width"), Some(&TAB_WIDTH));
        assert_eq!(find_by_convention_key("smart_indent"), None);
    }
}
