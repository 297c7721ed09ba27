//! Commonly used items for convenient importing.
//!
//! ```
//! use webconsole::prelude::*;
//!
//! struct Order {
//!     id: u32,
//!     lines: Vec<&'static str>,
//! }
//!
//! impl Inspect for Order {
//!     fn inspect(&self) -> Value<'_> {
//!         ObjectBuilder::new(self)
//!             .field("id", &self.id)
//!             .field("lines", &self.lines)
//!             .finish()
//!     }
//! }
//!
//! let console = Console::new(Settings::default());
//! console.inspector().inspect(&Order { id: 1, lines: vec!["tea"] });
//! ```

pub use crate::{
    Console, ConsoleError, Inspector, Panel, Settings,
    formatter::FilterResult,
    log::Level,
    value::{Inspect, ObjectBuilder, Value},
};
pub use crate::{console_log, inspect, inspect_with_caption, inspect_with_filter};
