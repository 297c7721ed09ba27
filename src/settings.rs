//! Configuration for a [`Console`](crate::Console).
//!
//! [`Settings`] follows the pattern of plain public fields with a `DEFAULT`
//! constant, so partial overrides read naturally:
//!
//! ```
//! use webconsole::Settings;
//!
//! let settings = Settings {
//!     table_max_depth: 3,
//!     max_list_items: 10,
//!     ..Settings::DEFAULT
//! };
//! assert_eq!(settings.table_collapse_depth, 4);
//! ```
//!
//! With the `std` feature, [`Settings::from_env`] applies overrides from the
//! `WEBCONSOLE` environment variable, a comma separated list of options:
//!
//! | option             | effect                                  |
//! |--------------------|-----------------------------------------|
//! | `max_depth=N`      | sets [`Settings::table_max_depth`]      |
//! | `collapse_depth=N` | sets [`Settings::table_collapse_depth`] |
//! | `max_list_items=N` | sets [`Settings::max_list_items`]       |
//! | `null=upper`       | renders null as `NULL`                  |
//! | `debug=off`        | disables [`Settings::debug_mode`]       |
//! | `force_append`     | sets [`Settings::force_append`]         |

use alloc::{borrow::Cow, string::String, vec::Vec};

/// Console configuration. See the [module docs](self) for an example.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Name of the panel targeted by calls that do not name one.
    pub default_panel_name: Cow<'static, str>,
    /// Tab title of the default panel.
    pub default_panel_title: Cow<'static, str>,
    /// CSS classes of the default panel's tab icon.
    pub default_panel_icon: Cow<'static, str>,
    /// Nesting depth at which tables are replaced by a `(...)` placeholder.
    pub table_max_depth: usize,
    /// Nesting depth from which tables are wrapped in a click-to-expand box.
    pub table_collapse_depth: usize,
    /// Pixel width of the key column for maps and objects.
    pub table_property_column_width: u32,
    /// Pixel width of the key column for lists.
    pub table_index_column_width: u32,
    /// Pixel width of the type column.
    pub table_type_column_width: u32,
    /// Whether tables carry a `<colgroup>` with the widths above.
    pub table_use_column_widths: bool,
    /// Maximum number of rows rendered for a list.
    pub max_list_items: usize,
    /// Render null as `NULL` instead of `null`.
    pub uppercase_null: bool,
    /// Crate name prefixes whose stack frames are hidden in the error popup.
    pub library_crates: &'static [&'static str],
    /// Prefix stripped from file paths shown to the developer.
    pub project_root: Option<String>,
    /// Path prefix rewrites applied before shortening, as `(from, to)`.
    pub path_map: Vec<(String, String)>,
    /// Title of the error popup.
    pub app_name: Cow<'static, str>,
    /// Development mode: the console is injected and errors show the popup.
    pub debug_mode: bool,
    /// Append the console even when the body has no closing `</body></html>`.
    pub force_append: bool,
}

impl Settings {
    /// The default settings.
    pub const DEFAULT: Self = Self {
        default_panel_name: Cow::Borrowed("main"),
        default_panel_title: Cow::Borrowed("Inspector"),
        default_panel_icon: Cow::Borrowed("fa fa-search"),
        table_max_depth: 5,
        table_collapse_depth: 4,
        table_property_column_width: 170,
        table_index_column_width: 50,
        table_type_column_width: 100,
        table_use_column_widths: true,
        max_list_items: 30,
        uppercase_null: false,
        library_crates: &["webconsole", "webconsole_backtrace"],
        project_root: None,
        path_map: Vec::new(),
        app_name: Cow::Borrowed("Web Console"),
        debug_mode: true,
        force_append: false,
    };

    /// Returns the default settings with overrides from the `WEBCONSOLE`
    /// environment variable applied.
    ///
    /// The variable is read once per process.
    #[cfg(feature = "std")]
    pub fn from_env() -> Self {
        let mut settings = Self::DEFAULT;
        EnvOptions::get().apply(&mut settings);
        settings
    }

    /// The null marker matching [`Settings::uppercase_null`].
    pub fn null_marker(&self) -> &'static str {
        if self.uppercase_null { "NULL" } else { "null" }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg_attr(not(feature = "std"), allow(dead_code))]
#[derive(Debug, Default, PartialEq, Eq)]
struct EnvOptions {
    max_depth: Option<usize>,
    collapse_depth: Option<usize>,
    max_list_items: Option<usize>,
    uppercase_null: bool,
    debug_off: bool,
    force_append: bool,
}

#[cfg_attr(not(feature = "std"), allow(dead_code))]
impl EnvOptions {
    #[cfg(feature = "std")]
    fn get() -> &'static Self {
        static WEBCONSOLE_FLAGS: std::sync::OnceLock<EnvOptions> = std::sync::OnceLock::new();

        WEBCONSOLE_FLAGS.get_or_init(|| match std::env::var_os("WEBCONSOLE") {
            Some(var) => Self::parse(&var.to_string_lossy()),
            None => Self::default(),
        })
    }

    fn parse(var: &str) -> Self {
        let mut options = Self::default();
        for option in var.split(',').map(str::trim) {
            let (name, value) = option.split_once('=').unwrap_or((option, ""));
            let number = value.trim().parse::<usize>().ok();
            if name.eq_ignore_ascii_case("max_depth") {
                options.max_depth = number;
            } else if name.eq_ignore_ascii_case("collapse_depth") {
                options.collapse_depth = number;
            } else if name.eq_ignore_ascii_case("max_list_items") {
                options.max_list_items = number;
            } else if name.eq_ignore_ascii_case("null") {
                options.uppercase_null = value.eq_ignore_ascii_case("upper");
            } else if name.eq_ignore_ascii_case("debug") {
                options.debug_off = value.eq_ignore_ascii_case("off");
            } else if name.eq_ignore_ascii_case("force_append") {
                options.force_append = true;
            }
        }
        options
    }

    fn apply(&self, settings: &mut Settings) {
        if let Some(max_depth) = self.max_depth {
            settings.table_max_depth = max_depth;
        }
        if let Some(collapse_depth) = self.collapse_depth {
            settings.table_collapse_depth = collapse_depth;
        }
        if let Some(max_list_items) = self.max_list_items {
            settings.max_list_items = max_list_items;
        }
        settings.uppercase_null |= self.uppercase_null;
        settings.debug_mode &= !self.debug_off;
        settings.force_append |= self.force_append;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.default_panel_name, "main");
        assert_eq!(settings.table_max_depth, 5);
        assert_eq!(settings.table_collapse_depth, 4);
        assert_eq!(settings.table_property_column_width, 170);
        assert_eq!(settings.table_index_column_width, 50);
        assert_eq!(settings.table_type_column_width, 100);
        assert_eq!(settings.max_list_items, 30);
        assert_eq!(settings.null_marker(), "null");
    }

    #[test]
    fn test_env_options() {
        let options = EnvOptions::parse("max_depth=3, null=upper,debug=off,bogus,max_list_items=x");
        assert_eq!(options.max_depth, Some(3));
        assert_eq!(options.max_list_items, None);
        assert!(options.uppercase_null);
        assert!(options.debug_off);
        assert!(!options.force_append);

        let mut settings = Settings::DEFAULT;
        options.apply(&mut settings);
        assert_eq!(settings.table_max_depth, 3);
        assert_eq!(settings.max_list_items, 30);
        assert_eq!(settings.null_marker(), "NULL");
        assert!(!settings.debug_mode);
    }
}
