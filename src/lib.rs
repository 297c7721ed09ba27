#![cfg_attr(not(feature = "std"), no_std)]
#![deny(
    missing_docs,
    unsafe_code,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
// Make docs.rs generate better docs
#![cfg_attr(docsrs, feature(doc_cfg))]

//! An in-page debugging console for server-rendered web applications.
//!
//! ## Overview
//!
//! While a request is handled, code inspects values into named **panels**.
//! When the response is ready, the [`Console`] renders every panel into a
//! tabbed console and splices it into the HTML page just before
//! `</body></html>`. Responses that are not HTML pages for a browser are
//! left alone, and the console text goes to a [log sink](sink::LogSink)
//! instead. When a request fails, the [`popup`] module renders an error
//! page with the message, source chain and a filtered stack trace.
//!
//! ## Quick Example
//!
//! ```
//! use webconsole::{Console, Settings, log::Level, splice::Exchange};
//!
//! let console = Console::new(Settings::default());
//! let inspector = console.inspector();
//! inspector
//!     .inspect(&vec![1, 2, 3])
//!     .log(Level::Info, "user {id} signed in", &[("id", 7.into())]);
//!
//! let exchange = Exchange::new(Some("text/html"), Some("text/html; charset=utf-8"));
//! let page = console
//!     .output(&exchange, "<html><body><h1>Hi</h1></body></html>")
//!     .unwrap();
//! assert!(page.contains("__console-container"));
//! ```
//!
//! ## Core Concepts
//!
//! Values are turned into a [`Value`] by the [`Inspect`] trait. A value is a
//! scalar, an opaque callable, a raw HTML fragment, or a **composite**: an
//! ordered list of keyed entries, optionally describing an object of some
//! type. Composite entries borrow the inspected data and are only converted
//! when the [formatter] descends into them, so depth limits and filters
//! bound the work done.
//!
//! The formatter renders values as nested tables. Its limits (maximum depth,
//! collapse depth, list truncation) come from [`Settings`] and travel down
//! the recursion in a [`RenderContext`](formatter::RenderContext) passed by
//! value.
//!
//! Panels hold **markup**: HTML interleaved with `<#tag>` structural tags that
//! the [`markup`] module expands when the console is rendered.
//!
//! ## Ecosystem
//!
//! - **[`webconsole-backtrace`]** - Captures the current stack as popup
//!   frames, with the console's own frames and toolchain paths cleaned up.
//!
//! [`webconsole-backtrace`]: https://docs.rs/webconsole-backtrace
//!
//! ## Features
//!
//! - `std` (default): [`Settings::from_env`] and inspection of
//!   `std::collections` hash maps and sets.
//! - `compat-serde_json1`: inspection of `serde_json` documents.

extern crate alloc;

#[macro_use]
mod macros;

mod assets;
pub mod compat;
mod console;
mod error;
pub mod formatter;
pub mod http;
mod lock;
pub mod log;
pub mod markup;
mod panel;
pub mod popup;
pub mod prelude;
mod registry;
pub mod settings;
pub mod sink;
pub mod splice;
mod util;
pub mod value;

pub use self::{
    console::{Console, ConsoleAlreadyInstalledError},
    error::ConsoleError,
    panel::{Inspector, Panel},
    registry::PanelRegistry,
    settings::Settings,
    util::{escape_html, highlight},
    value::{Inspect, Value},
};

#[doc(hidden)]
pub mod __private {
    use crate::{
        Console, ConsoleError,
        formatter::Filter,
        log::Level,
        value::{Inspect, Value},
    };

    fn installed() -> Result<triomphe::Arc<Console>, ConsoleError> {
        Console::installed().ok_or(ConsoleError::UninitializedConsole)
    }

    /// A location inside this crate's `src/lib.rs`, used to recognize its
    /// source paths in captured stack traces.
    #[doc(hidden)]
    pub const WEBCONSOLE_LOCATION: &core::panic::Location<'static> = core::panic::Location::caller();

    #[doc(hidden)]
    #[track_caller]
    pub fn inspect(values: &[&dyn Inspect]) -> Result<(), ConsoleError> {
        let console = installed()?;
        console.inspector().location().inspect_all(values);
        Ok(())
    }

    #[doc(hidden)]
    #[track_caller]
    pub fn inspect_with_filter(
        filter: &Filter<'_>,
        values: &[&dyn Inspect],
    ) -> Result<(), ConsoleError> {
        let console = installed()?;
        console.inspector().location().with_filter(filter, values);
        Ok(())
    }

    #[doc(hidden)]
    #[track_caller]
    pub fn inspect_with_caption(caption: &str, values: &[&dyn Inspect]) -> Result<(), ConsoleError> {
        let console = installed()?;
        console.inspector().location().with_caption(caption, values);
        Ok(())
    }

    #[doc(hidden)]
    pub fn log(level: Level, message: &str, context: &[(&str, Value<'_>)]) -> Result<(), ConsoleError> {
        let console = installed()?;
        console.inspector().log(level, message, context);
        Ok(())
    }
}
