#![deny(
    missing_docs,
    unsafe_code,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]

//! Stack trace capture for the webconsole error popup.
//!
//! This crate walks the current call stack and turns it into the
//! [`StackFrame`]s shown in the popup's stack trace panel. Frames from the
//! console itself, from the standard library and from runtime plumbing are
//! filtered out so the trace starts at application code.
//!
//! # Quick Start
//!
//! ```rust
//! use webconsole::popup::ErrorInfo;
//! use webconsole_backtrace::ErrorInfoExt;
//!
//! fn load() -> Result<String, std::io::Error> {
//!     std::fs::read_to_string("/definitely/not/here")
//! }
//!
//! let error = load().unwrap_err();
//! let info = ErrorInfo::from_error(&error).with_backtrace();
//! println!("{} frame(s), {} omitted", info.frames.len(), info.omitted_frames);
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_BACKTRACE=full` - Disables filtering and shows full paths
//! - `WEBCONSOLE_BACKTRACE` - Comma-separated options:
//!   - `full_paths` - Show full file paths in the trace
//!
//! # Debugging symbols in release builds
//!
//! Frames without symbol names or file names are skipped. To keep useful
//! traces in release builds, enable debug symbols:
//!
//! ```toml
//! [profile.release]
//! debug = "line-tables-only"
//! ```
//!
//! # Filtering
//!
//! ```rust
//! use webconsole_backtrace::BacktraceFilter;
//!
//! let filter = BacktraceFilter {
//!     skipped_middle_crates: &["tokio", "hyper", "tower"],
//!     max_entry_count: 15,
//!     ..BacktraceFilter::DEFAULT
//! };
//! ```

use std::{borrow::Cow, panic::Location, sync::OnceLock};

use backtrace::BytesOrWideString;
use webconsole::popup::{CallDescription, ErrorInfo, StackFrame};

/// A captured stack trace.
///
/// # Examples
///
/// ```rust
/// use webconsole_backtrace::{Backtrace, BacktraceFilter};
///
/// if let Some(bt) = Backtrace::capture(&BacktraceFilter::DEFAULT) {
///     println!("Captured {} frames", bt.frames.len());
/// }
/// ```
#[derive(Debug)]
pub struct Backtrace {
    /// The frames, ordered from most recent to oldest.
    pub frames: Vec<StackFrame>,
    /// Total number of frames that were omitted due to filtering.
    pub total_omitted_frames: usize,
}

/// Configuration for filtering frames from certain crates in a trace.
///
/// Crate names are matched as they appear in paths and symbols, so use
/// underscores: `webconsole_backtrace`, not `webconsole-backtrace`.
#[derive(Copy, Clone, Debug)]
pub struct BacktraceFilter {
    /// Crates whose frames are hidden when they appear at the beginning of
    /// the trace.
    pub skipped_initial_crates: &'static [&'static str],
    /// Crates whose frames are hidden when they appear in the middle of the
    /// trace. A lone frame is kept; runs of two or more are dropped.
    pub skipped_middle_crates: &'static [&'static str],
    /// Crates whose frames are hidden when they appear at the end of the
    /// trace.
    pub skipped_final_crates: &'static [&'static str],
    /// Maximum number of frames to keep.
    pub max_entry_count: usize,
    /// Whether frames carry their full file path instead of the path below
    /// a recognized prefix.
    pub show_full_path: bool,
}

impl BacktraceFilter {
    /// Default filter settings.
    pub const DEFAULT: Self = Self {
        skipped_initial_crates: &[
            "backtrace",
            "webconsole",
            "webconsole_backtrace",
            "core",
            "std",
            "alloc",
        ],
        skipped_middle_crates: &["std", "core", "alloc", "tokio"],
        skipped_final_crates: &["std", "core", "alloc", "tokio"],
        max_entry_count: 20,
        show_full_path: false,
    };

    /// Returns a filter configured from the environment.
    ///
    /// `RUST_BACKTRACE=full` disables all filtering and implies
    /// `full_paths`. `WEBCONSOLE_BACKTRACE=full_paths` only switches to full
    /// paths.
    pub fn from_env() -> Self {
        let env_options = EnvOptions::get();
        if env_options.rust_backtrace_full {
            Self {
                skipped_initial_crates: &[],
                skipped_middle_crates: &[],
                skipped_final_crates: &[],
                max_entry_count: usize::MAX,
                show_full_path: env_options.show_full_path,
            }
        } else {
            Self {
                show_full_path: env_options.show_full_path,
                ..Self::DEFAULT
            }
        }
    }
}

impl Default for BacktraceFilter {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug)]
struct EnvOptions {
    rust_backtrace_full: bool,
    show_full_path: bool,
}

impl EnvOptions {
    fn get() -> &'static Self {
        static FLAGS: OnceLock<EnvOptions> = OnceLock::new();

        FLAGS.get_or_init(|| {
            let rust_backtrace_full =
                std::env::var_os("RUST_BACKTRACE").is_some_and(|var| var == "full");
            let mut show_full_path = rust_backtrace_full;
            if let Some(var) = std::env::var_os("WEBCONSOLE_BACKTRACE") {
                for v in var.to_string_lossy().split(',') {
                    if v.trim().eq_ignore_ascii_case("full_paths") {
                        show_full_path = true;
                    }
                }
            }
            EnvOptions {
                rust_backtrace_full,
                show_full_path,
            }
        })
    }
}

const fn get_crate_matcher(location: &'static Location<'static>) -> Option<(&'static str, usize)> {
    let file = location.file();

    let Some(prefix_len) = file.len().checked_sub("/src/lib.rs".len()) else {
        return None;
    };

    let (prefix, suffix) = file.split_at(prefix_len);
    if std::path::MAIN_SEPARATOR == '/' {
        assert!(suffix.eq_ignore_ascii_case("/src/lib.rs"));
    } else {
        assert!(suffix.eq_ignore_ascii_case(r#"/src\lib.rs"#));
    }

    let (matcher_prefix, _) = file.split_at(prefix_len + 4);

    let mut splitter_prefix = prefix;
    while !splitter_prefix.is_empty() {
        let (new_prefix, last_char) = splitter_prefix.split_at(splitter_prefix.len() - 1);
        splitter_prefix = new_prefix;
        if last_char.eq_ignore_ascii_case(std::path::MAIN_SEPARATOR_STR) {
            break;
        }
    }

    Some((matcher_prefix, splitter_prefix.len()))
}

const BACKTRACE_MATCHER: Option<(&str, usize)> = get_crate_matcher(Location::caller());
const WEBCONSOLE_MATCHER: Option<(&str, usize)> =
    get_crate_matcher(webconsole::__private::WEBCONSOLE_LOCATION);

/// The source file of a frame, split at a recognized prefix when possible.
#[derive(Debug, PartialEq, Eq)]
struct FramePath {
    raw_path: String,
    crate_name: Option<Cow<'static, str>>,
    suffix: Option<String>,
}

impl FramePath {
    fn new(path: BytesOrWideString<'_>) -> Self {
        Self::parse(&path.to_str_lossy())
    }

    fn parse(path: &str) -> Self {
        static REGEXES: OnceLock<[regex::Regex; 2]> = OnceLock::new();
        let [std_regex, registry_regex] = REGEXES.get_or_init(|| {
            [
                // - /lib/rustlib/src/rust/library/{std|core|alloc}/src/...
                // - /rustc/{40-char-hash}/library/{std|core|alloc}/src/...
                regex::Regex::new(
                    r"(?:/lib/rustlib/src/rust|^/rustc/[0-9a-f]{40})/library/(std|core|alloc)/src/.*$",
                )
                .expect("built-in regex pattern for std library paths should be valid"),
                // - /.cargo/registry/src/{index}-{16-char-hash}/{crate}-{version}/src/...
                regex::Regex::new(
                    r"/\.cargo/registry/src/[^/]+-[0-9a-f]{16}/([^./]+)-[0-9]+\.[^/]*/src/.*$",
                )
                .expect("built-in regex pattern for cargo registry paths should be valid"),
            ]
        });

        let raw_path = path.to_string();
        let captures = std_regex
            .captures(path)
            .or_else(|| registry_regex.captures(path))
            .and_then(|captures| captures.get(1));
        if let Some(crate_capture) = captures {
            return Self {
                suffix: Some(path[crate_capture.start()..].to_string()),
                crate_name: Some(crate_capture.as_str().replace('-', "_").into()),
                raw_path,
            };
        }

        for (matcher, crate_name) in [
            (WEBCONSOLE_MATCHER, "webconsole"),
            (BACKTRACE_MATCHER, "webconsole_backtrace"),
        ] {
            if let Some((matcher_prefix, splitter_prefix_len)) = matcher
                && path.starts_with(matcher_prefix)
            {
                return Self {
                    suffix: Some(path[splitter_prefix_len + 1..].to_string()),
                    crate_name: Some(Cow::Borrowed(crate_name)),
                    raw_path,
                };
            }
        }

        Self {
            raw_path,
            crate_name: None,
            suffix: None,
        }
    }

    fn display(&self, show_full_path: bool) -> &str {
        match &self.suffix {
            Some(suffix) if !show_full_path => suffix,
            _ => &self.raw_path,
        }
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c == '_' || unicode_ident::is_xid_start(c))
        && chars.all(unicode_ident::is_xid_continue)
}

struct RawFrame {
    crate_name: Option<String>,
    frame: StackFrame,
}

impl Backtrace {
    /// Captures the current stack, applying `filter`.
    ///
    /// Returns `None` when no frame could be resolved at all.
    pub fn capture(filter: &BacktraceFilter) -> Option<Self> {
        let mut raw_frames = Vec::new();
        backtrace::trace(|frame| {
            backtrace::resolve_frame(frame, |symbol| {
                let (Some(sym), Some(filename_raw)) = (symbol.name(), symbol.filename_raw()) else {
                    return;
                };
                let path = FramePath::new(filename_raw);
                // `{:#}` drops the trailing symbol hash.
                let call = CallDescription::from_symbol(&format!("{sym:#}"));
                let crate_name = path
                    .crate_name
                    .as_deref()
                    .or_else(|| call.crate_name().filter(|name| is_identifier(name)))
                    .map(str::to_owned);
                let mut frame = StackFrame::new(call);
                frame.file = Some(path.display(filter.show_full_path).to_owned());
                frame.line = symbol.lineno();
                raw_frames.push(RawFrame { crate_name, frame });
            });
            true
        });

        if raw_frames.is_empty() {
            None
        } else {
            Some(Self::from_raw_frames(raw_frames, filter))
        }
    }

    fn from_raw_frames(raw_frames: Vec<RawFrame>, filter: &BacktraceFilter) -> Self {
        fn is_in(crates: &[&str], crate_name: Option<&str>) -> bool {
            crate_name.is_some_and(|name| crates.contains(&name))
        }

        let mut frames: Vec<RawFrame> = Vec::new();
        let mut total_omitted_frames = 0;
        let mut initial_filtering = !filter.skipped_initial_crates.is_empty();
        // A run of frames from a middle-skipped crate: its first frame and
        // its length.
        let mut run: Option<(RawFrame, usize)> = None;

        for raw in raw_frames {
            if initial_filtering {
                if is_in(filter.skipped_initial_crates, raw.crate_name.as_deref()) {
                    total_omitted_frames += 1;
                    continue;
                }
                initial_filtering = false;
            }

            if let Some((first, count)) = &mut run
                && first.crate_name.is_some()
                && first.crate_name == raw.crate_name
            {
                *count += 1;
                continue;
            }
            if let Some((first, count)) = run.take() {
                if count == 1 {
                    frames.push(first);
                } else {
                    total_omitted_frames += count;
                }
            }

            if is_in(filter.skipped_middle_crates, raw.crate_name.as_deref()) {
                run = Some((raw, 1));
            } else {
                frames.push(raw);
            }
        }
        if let Some((first, count)) = run.take() {
            if count == 1 {
                frames.push(first);
            } else {
                total_omitted_frames += count;
            }
        }

        while let Some(last) = frames.last() {
            let symbol = last.frame.call.path().unwrap_or_default();
            let skip = is_in(filter.skipped_final_crates, last.crate_name.as_deref())
                || symbol == "__libc_start_call_main"
                || symbol == "__libc_start_main_impl"
                || symbol == "_start";
            if !skip {
                break;
            }
            total_omitted_frames += 1;
            frames.pop();
        }

        if frames.len() > filter.max_entry_count {
            total_omitted_frames += frames.len() - filter.max_entry_count;
            frames.truncate(filter.max_entry_count);
        }

        Self {
            frames: frames.into_iter().map(|raw| raw.frame).collect(),
            total_omitted_frames,
        }
    }
}

/// Extension trait for attaching a captured stack trace to an [`ErrorInfo`].
///
/// ```rust
/// use webconsole::popup::ErrorInfo;
/// use webconsole_backtrace::{BacktraceFilter, ErrorInfoExt};
///
/// let filter = BacktraceFilter {
///     max_entry_count: 5,
///     ..BacktraceFilter::DEFAULT
/// };
/// let info = ErrorInfo::new("Timeout", "upstream took too long").with_backtrace_filter(&filter);
/// assert!(info.frames.len() <= 5);
/// ```
pub trait ErrorInfoExt: Sized {
    /// Attaches the current stack trace, filtered with
    /// [`BacktraceFilter::from_env`].
    fn with_backtrace(self) -> Self {
        self.with_backtrace_filter(&BacktraceFilter::from_env())
    }

    /// Attaches the current stack trace, filtered with `filter`.
    fn with_backtrace_filter(self, filter: &BacktraceFilter) -> Self;
}

impl ErrorInfoExt for ErrorInfo {
    fn with_backtrace_filter(mut self, filter: &BacktraceFilter) -> Self {
        if let Some(backtrace) = Backtrace::capture(filter) {
            self.omitted_frames += backtrace.total_omitted_frames;
            self = self.with_frames(backtrace.frames);
        }
        self
    }
}
