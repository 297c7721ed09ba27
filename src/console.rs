use alloc::{borrow::Cow, format, string::String, vec::Vec};
use core::fmt::Write;

use triomphe::Arc;
use unsize::CoerceUnsize;

use crate::{
    ConsoleError, Inspector, Panel, PanelRegistry, Settings, assets,
    lock::Lock,
    sink::{LogSink, TracingSink},
    splice::{Exchange, splice},
    util::{escape_html, escape_js_attribute, html_to_text},
    value::{Identity, ids::ObjectIds},
};

static CONSOLE: Lock<Option<Arc<Console>>> = Lock::new(None);

/// A debugging console: a set of panels, the settings used to fill them and
/// the identity table used to number inspected objects.
///
/// A console lives for one request. [`reset`](Self::reset) prepares it for
/// the next one when it is reused.
///
/// ```
/// use webconsole::{Console, Settings, splice::Exchange};
///
/// let console = Console::new(Settings::default());
/// console.inspector().inspect(&"hello");
///
/// let page = "<html><body>page</body></html>";
/// let exchange = Exchange::new(Some("text/html"), Some("text/html"));
/// let out = console.output(&exchange, page).unwrap();
/// assert!(out.contains("id=\"__console-container\""));
/// assert!(out.ends_with("</body></html>"));
/// ```
pub struct Console {
    settings: Settings,
    registry: PanelRegistry,
    ids: ObjectIds,
    sink: Arc<dyn LogSink>,
}

/// Returned by [`Console::install`] when a console is already installed.
/// Carries the console that was not installed.
pub struct ConsoleAlreadyInstalledError(pub Console);

impl core::fmt::Debug for ConsoleAlreadyInstalledError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ConsoleAlreadyInstalledError").finish()
    }
}

impl core::fmt::Display for ConsoleAlreadyInstalledError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "a web console is already installed globally")
    }
}

impl core::error::Error for ConsoleAlreadyInstalledError {}

impl Console {
    /// Creates a console with the default panel registered. Output for
    /// non-HTML responses goes to a [`TracingSink`].
    pub fn new(settings: Settings) -> Self {
        let console = Self {
            registry: PanelRegistry::new(),
            ids: ObjectIds::new(),
            sink: Arc::new(TracingSink).unsize(unsize::Coercion!(to dyn LogSink)),
            settings,
        };
        console.default_panel();
        console
    }

    /// Replaces the sink receiving output for non-HTML responses.
    pub fn with_sink<S: LogSink>(mut self, sink: S) -> Self {
        self.sink = Arc::new(sink).unsize(unsize::Coercion!(to dyn LogSink));
        self
    }

    /// The settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The panel registry.
    pub fn registry(&self) -> &PanelRegistry {
        &self.registry
    }

    /// The identity table.
    pub fn ids(&self) -> &ObjectIds {
        &self.ids
    }

    fn default_panel(&self) -> Arc<Panel> {
        self.registry
            .get_or_register(&self.settings.default_panel_name, || {
                Panel::new(
                    self.settings.default_panel_title.clone(),
                    self.settings.default_panel_icon.clone(),
                )
            })
    }

    /// An inspector writing to the default panel.
    pub fn inspector(&self) -> Inspector<'_> {
        Inspector::new(self, self.default_panel())
    }

    /// An inspector writing to the panel registered under `name`.
    ///
    /// # Errors
    ///
    /// Fails with [`ConsoleError::UnknownPanel`] when no panel has that name.
    pub fn inspector_for(&self, name: &str) -> Result<Inspector<'_>, ConsoleError> {
        Ok(Inspector::new(self, self.registry.get(name)?))
    }

    /// Registers `panel` under `name`, replacing any panel of that name, and
    /// returns an inspector writing to it.
    pub fn register_panel(&self, name: impl Into<String>, panel: Panel) -> Inspector<'_> {
        Inspector::new(self, self.registry.register(name, panel))
    }

    /// The identity number of `object`, assigned on first use.
    pub fn object_id<T: ?Sized + 'static>(&self, object: &T) -> u32 {
        self.ids.id_of(Identity::of(object))
    }

    /// Builds the console markup for `panels`: a tab bar with one tab per
    /// panel and one content area per panel. Tabs of empty panels are
    /// disabled.
    ///
    /// # Errors
    ///
    /// Fails with [`ConsoleError::InvalidMarkupTag`] when a panel's content
    /// uses an unknown markup tag.
    pub fn compose_console(&self, panels: &[(String, Arc<Panel>)]) -> Result<String, ConsoleError> {
        let rendered = panels
            .iter()
            .map(|(name, panel)| Ok((name, escape_html(name), panel, panel.render()?)))
            .collect::<Result<Vec<_>, ConsoleError>>()?;

        let mut out = String::from("<div id=\"__console-container\"><div id=\"__debug-bar\">");
        let _ = write!(out, "<span>{}</span>", escape_html(&self.settings.app_name));
        for (name, id, panel, content) in &rendered {
            let title = escape_html(panel.title());
            let _ = write!(
                out,
                "<a id=\"__tab-{id}\" class=\"__tab hint-top{}\" href=\"javascript:void(0)\" \
                 onclick=\"openConsoleTab('{}')\" data-hint=\"{title}\">",
                if content.is_empty() { " disabled" } else { "" },
                escape_js_attribute(name),
            );
            if !panel.icon().is_empty() {
                let _ = write!(out, "<i class=\"{}\"></i>", escape_html(panel.icon()));
            }
            let _ = write!(out, "<span>{title}</span></a>");
        }
        out.push_str(
            "<a class=\"__close fa fa-close\" href=\"javascript:void(0)\" onclick=\"removeConsole()\"></a>\
             <a class=\"__minimize fa fa-chevron-down\" href=\"javascript:void(0)\" onclick=\"closeConsole()\"></a>",
        );
        out.push_str("</div><div id=\"__console\">");
        for (_, id, _, content) in &rendered {
            let _ = write!(out, "<div id=\"__{id}-tab\" class=\"__panel\">{content}</div>");
        }
        out.push_str("</div></div>");
        Ok(out)
    }

    /// The complete console for the visible panels, with its stylesheet and
    /// script.
    ///
    /// # Errors
    ///
    /// See [`compose_console`](Self::compose_console).
    pub fn render(&self) -> Result<String, ConsoleError> {
        let console = self.compose_console(&self.registry.visible_panels())?;
        Ok(format!(
            "{}{}{}",
            assets::CONSOLE_STYLE,
            assets::CONSOLE_SCRIPT,
            console
        ))
    }

    /// The text of every panel with content, one block per panel.
    ///
    /// # Errors
    ///
    /// See [`compose_console`](Self::compose_console).
    pub fn render_text(&self) -> Result<String, ConsoleError> {
        let mut out = String::new();
        for (_, panel) in self.registry.panels() {
            if !panel.has_content() {
                continue;
            }
            let text = html_to_text(&panel.render()?);
            let _ = writeln!(out, "[{}]", panel.title());
            out.push_str(text.trim_end());
            out.push('\n');
        }
        Ok(out)
    }

    /// Delivers the console with a response.
    ///
    /// In debug mode, when the response is an HTML page going to a browser,
    /// the console is spliced into `body`. Otherwise the console text goes
    /// to the log sink and `body` is returned unchanged.
    ///
    /// # Errors
    ///
    /// See [`compose_console`](Self::compose_console).
    pub fn output<'b>(&self, exchange: &Exchange<'_>, body: &'b str) -> Result<Cow<'b, str>, ConsoleError> {
        if self.settings.debug_mode && exchange.is_interactive_html() {
            let console = self.render()?;
            let out = splice(body, &console, self.settings.force_append);
            tracing::debug!(
                injected = matches!(out, Cow::Owned(_)),
                "web console spliced into response body"
            );
            return Ok(out);
        }

        let text = self.render_text()?;
        if !text.is_empty() {
            self.sink.write(&text);
        }
        tracing::debug!(
            accept = exchange.accept,
            content_type = exchange.content_type,
            "web console not injected, written to log sink"
        );
        Ok(Cow::Borrowed(body))
    }

    /// Empties every panel and forgets all identity numbers.
    pub fn reset(&self) {
        self.registry.clear_contents();
        self.ids.reset();
    }

    /// Installs this console process-wide, for use by [`inspect!`] and the
    /// other macros.
    ///
    /// # Errors
    ///
    /// If a console is already installed, nothing changes and this console
    /// is handed back in the error.
    ///
    /// [`inspect!`]: crate::inspect!
    pub fn install(self) -> Result<(), ConsoleAlreadyInstalledError> {
        let mut installed = CONSOLE.write();
        if installed.is_some() {
            return Err(ConsoleAlreadyInstalledError(self));
        }
        *installed = Some(Arc::new(self));
        Ok(())
    }

    /// Installs this console process-wide, returning the console it
    /// replaces.
    pub fn replace(self) -> Option<Arc<Console>> {
        CONSOLE.write().replace(Arc::new(self))
    }

    /// Removes the process-wide console.
    pub fn uninstall() -> Option<Arc<Console>> {
        CONSOLE.write().take()
    }

    /// The process-wide console, if one is installed.
    pub fn installed() -> Option<Arc<Console>> {
        CONSOLE.read().clone()
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl core::fmt::Debug for Console {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Console")
            .field("settings", &self.settings)
            .field("registry", &self.registry)
            .field("ids", &self.ids)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::tests::MemorySink;

    #[test]
    fn test_console_send_sync() {
        static_assertions::assert_impl_all!(Console: Send, Sync);
        static_assertions::assert_impl_all!(ConsoleAlreadyInstalledError: Send, Sync, core::error::Error);
    }

    #[test]
    fn test_default_panel_registered() {
        let console = Console::default();
        let panels = console.registry().panels();
        assert_eq!(panels.len(), 1);
        assert_eq!(panels[0].0, "main");
        assert_eq!(panels[0].1.title(), "Inspector");
        assert!(console.inspector_for("main").is_ok());
        assert!(matches!(
            console.inspector_for("db"),
            Err(ConsoleError::UnknownPanel { .. })
        ));
    }

    #[test]
    fn test_compose_console() {
        let console = Console::default();
        console.register_panel("db", Panel::new("Database", "fa fa-database"));
        console.register_panel("trace", Panel::hidden("Trace")).write("hidden");
        console.inspector().write("<#i>hello</#i>");

        let html = console.compose_console(&console.registry().visible_panels()).unwrap();
        assert!(html.starts_with("<div id=\"__console-container\"><div id=\"__debug-bar\">"));
        assert!(html.contains(
            "<a id=\"__tab-main\" class=\"__tab hint-top\" href=\"javascript:void(0)\" \
             onclick=\"openConsoleTab('main')\" data-hint=\"Inspector\"><i class=\"fa fa-search\"></i>\
             <span>Inspector</span></a>"
        ));
        assert!(html.contains("<a id=\"__tab-db\" class=\"__tab hint-top disabled\""));
        assert!(html.contains(
            "<div id=\"__main-tab\" class=\"__panel\"><div class='__log-item'>hello</div></div>"
        ));
        assert!(html.contains("<div id=\"__db-tab\" class=\"__panel\"></div>"));
        assert!(!html.contains("__trace-tab"));
        let main = html.find("__main-tab").unwrap();
        let db = html.find("__db-tab").unwrap();
        assert!(main < db);
    }

    #[test]
    fn test_panel_name_stays_inside_script_string() {
        let console = Console::default();
        console
            .register_panel("it's');alert('x", Panel::new("Quoted", ""))
            .write("<#i>q</#i>");

        let html = console.compose_console(&console.registry().visible_panels()).unwrap();
        assert!(html.contains("onclick=\"openConsoleTab('it\\&#39;s\\&#39;);alert(\\&#39;x')\""));
        assert!(html.contains("<a id=\"__tab-it&#39;s&#39;);alert(&#39;x\""));
        assert!(html.contains("<div id=\"__it&#39;s&#39;);alert(&#39;x-tab\" class=\"__panel\">"));
        assert!(!html.contains("'it's"));
    }

    #[test]
    fn test_output_splices_html() {
        let console = Console::default();
        console.inspector().inspect(&1);
        let exchange = Exchange::new(Some("text/html"), Some("text/html"));
        let out = console
            .output(&exchange, "<html><body>X</body></html>")
            .unwrap();
        assert!(out.starts_with("<html><body>X<style>"));
        assert!(out.ends_with("</div></div></body></html>"));
    }

    #[test]
    fn test_output_to_sink_for_other_responses() {
        let sink = triomphe::Arc::new(MemorySink::default());
        let shared = sink.clone();
        let console = Console::default().with_sink(move |text: &str| shared.write(text));
        console.inspector().log(crate::log::Level::Info, "saved {n} rows", &[("n", 3.into())]);

        let exchange = Exchange::new(Some("application/json"), Some("application/json"));
        let out = console.output(&exchange, "{}").unwrap();
        assert_eq!(out, "{}");
        assert_eq!(*sink.0.read(), ["[Inspector]\nINFO saved 3 rows\n"]);
    }

    #[test]
    fn test_output_in_production_mode() {
        let settings = Settings {
            debug_mode: false,
            ..Settings::DEFAULT
        };
        let sink = triomphe::Arc::new(MemorySink::default());
        let shared = sink.clone();
        let console = Console::new(settings).with_sink(move |text: &str| shared.write(text));
        let exchange = Exchange::new(Some("text/html"), Some("text/html"));
        assert_eq!(console.output(&exchange, "<html><body></body></html>").unwrap(), "<html><body></body></html>");
        // Nothing was written, so nothing is logged.
        assert!(sink.0.read().is_empty());
    }

    #[test]
    fn test_reset() {
        let console = Console::default();
        let value = 5u8;
        assert_eq!(console.object_id(&value), 1);
        console.inspector().inspect(&value);
        console.reset();
        assert!(!console.inspector().panel().has_content());
        assert!(console.ids().is_empty());
    }
}
