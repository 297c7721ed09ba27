use alloc::string::String;
use core::fmt;

/// Errors raised by misuse of the console.
///
/// Problems with the values being inspected are never reported through this
/// type; they degrade to placeholders in the rendered output instead.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConsoleError {
    /// A panel was requested by a name that was never registered.
    UnknownPanel {
        /// The requested panel name.
        name: String,
    },
    /// The markup expander found a tag outside its vocabulary.
    InvalidMarkupTag {
        /// The offending tag name, without the `<#` prefix.
        tag: String,
    },
    /// An inspection call was made before a console was installed.
    UninitializedConsole,
}

impl fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownPanel { name } => write!(f, "invalid panel id: {name}"),
            Self::InvalidMarkupTag { tag } => write!(f, "invalid log tag <#{tag}>"),
            Self::UninitializedConsole => write!(f, "web console not initialized"),
        }
    }
}

impl core::error::Error for ConsoleError {}
