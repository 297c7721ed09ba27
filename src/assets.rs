//! Inline stylesheets and scripts emitted with the console and the error
//! popup. Ids and classes all use the `__` prefix; the script relies on the
//! `__console-container`, `__tab-<name>` and `__<name>-tab` ids.

pub(crate) const CONSOLE_SCRIPT: &str = r#"<script>
(function () {
  function byId(id) { return document.getElementById(id); }
  function all(selector) { return Array.prototype.slice.call(document.querySelectorAll(selector)); }
  function resetTabs(closed) {
    all('.__tab').forEach(function (tab) {
      var disabled = tab.className.indexOf('disabled') >= 0;
      tab.className = '__tab ' + (closed ? 'hint-top' : 'hint-bottom') + (disabled ? ' disabled' : '');
      tab.setAttribute('data-hint', tab.querySelector('span').textContent);
    });
  }
  window.openConsole = function () { byId('__console-container').className = 'Console-show'; };
  window.closeConsole = function () { byId('__console-container').className = ''; resetTabs(true); };
  window.removeConsole = function () {
    byId('__console-container').remove();
    document.documentElement.style.paddingBottom = null;
  };
  window.openConsoleTab = function (name) {
    resetTabs(false);
    all('.__panel').forEach(function (panel) { panel.style.display = 'none'; });
    openConsole();
    byId('__console').className = 'show-console';
    byId('__' + name + '-tab').style.display = 'block';
    var tab = byId('__tab-' + name);
    tab.className = '__tab active hint-bottom';
    tab.removeAttribute('data-hint');
  };
  document.documentElement.style.paddingBottom = '32px';
})();
</script>"#;

pub(crate) const CONSOLE_STYLE: &str = r#"<style>
#__console-container { position: fixed; left: 0; right: 0; bottom: 0; z-index: 100000; font: 12px/1.4 sans-serif; color: #333; }
#__debug-bar { height: 32px; background: #2b2b2b; color: #ddd; white-space: nowrap; overflow: hidden; }
#__debug-bar .__tab { display: inline-block; padding: 0 12px; line-height: 32px; color: #ddd; text-decoration: none; cursor: pointer; }
#__debug-bar .__tab.active { background: #f4f4f4; color: #333; }
#__debug-bar .__tab.disabled { opacity: .4; pointer-events: none; }
#__debug-bar .__tab i { margin-right: 6px; }
#__debug-bar .__close, #__debug-bar .__minimize { float: right; line-height: 32px; padding: 0 10px; color: #ddd; }
#__console { display: none; height: 40vh; overflow: auto; background: #f4f4f4; border-top: 1px solid #ccc; }
#__console.show-console { display: block; }
.Console-show #__console { display: block; }
#__console > .__panel { display: none; padding: 10px 15px; }
#__console i:not([class]) { color: #999; }
#__console sup i { font-size: 9px; color: #6a86b4; }
#__console .__log-section { margin: 10px 0; border: 1px solid #ddd; background: #fff; }
#__console .__log-title { padding: 4px 8px; background: #e8e8e8; font-weight: bold; }
#__console .__log-stripe { border-bottom: 1px solid #e4e4e4; padding: 2px 0; }
#__console .__log-item { padding: 2px 8px; }
#__console .__rowHeader .__row-number { display: inline-block; min-width: 24px; color: #999; }
#__console .__log-data { display: inline-block; margin: 2px 8px 2px 0; }
#__console .__header { margin: 8px 0 4px; font-weight: bold; }
#__console .__footer { text-align: right; color: #999; }
#__console .__alert { padding: 4px 8px; background: #fdd; color: #a33; }
#__console .__type { color: #488; }
#__console .keyword { color: #a0a; font-weight: bold; }
#__console .indent { padding-left: 20px; }
#__console .__debug-location { color: #999; font-size: 11px; margin: 4px 0; }
#__console span[title] { cursor: help; border-bottom: 1px dotted #aaa; }
.__console-table { border-collapse: collapse; width: 100%; table-layout: fixed; margin: 4px 0; background: #fff; }
.__console-table caption { text-align: left; font-weight: bold; padding: 4px 0; }
.__console-table th, .__console-table td { border: 1px solid #e4e4e4; padding: 2px 6px; vertical-align: top; text-align: left; word-wrap: break-word; }
.__console-table > thead > tr > th { background: #eee; }
.__console-table > tbody > tr > th { font-weight: normal; color: #555; }
.__console-table .n { text-align: right; }
.__console-table td.v { font-family: monospace; }
.__expand > .__console-table { display: none; }
.__expand.show > .__console-table { display: table; }
.__expand.show > a { display: none; }
</style>"#;

pub(crate) const POPUP_STYLE: &str = r#"<style>
#__error { margin: 0; background: #f8f8f8; font: 14px/1.5 sans-serif; color: #333; overflow-x: hidden; }
#__error a { text-decoration: none; color: #6a86b4; }
#__panel { max-width: 960px; margin: 40px auto; background: #fff; box-shadow: 0 2px 10px rgba(0, 0, 0, .15); }
#__panel .__title-bar { padding: 10px 20px; background: #c33; color: #fff; font-weight: bold; }
#__panel .__panel-body { padding: 20px; }
#__panel .__message h3 { margin: 0 0 10px; color: #a33; }
#__panel .__message .__info { margin-top: 10px; color: #666; }
#__panel .__causes { margin-top: 10px; color: #666; }
#__error-location { padding: 10px 20px; border-top: 1px solid #eee; color: #666; }
#__error-location .__more { margin-top: 8px; }
#__trace { display: none; padding: 0 20px 20px; }
#__panel.__show #__trace { display: block; }
.stack-frame { border-top: 1px solid #eee; padding: 8px 0; }
.stack-frame .code .rowHeader { display: inline-block; min-width: 24px; color: #999; }
.stack-frame .file { font-weight: bold; }
.stack-frame .line { margin-left: 6px; color: #c33; }
.stack-frame .__call { margin: 4px 0 0 24px; font-family: monospace; }
.stack-frame .__call .class, .stack-frame .__call .type { color: #488; }
.stack-frame .__call .fn { color: #a0a; }
.stack-frame .__call .string { color: #690; }
.stack-frame .__call .info { border-bottom: 1px dotted #aaa; cursor: help; }
.stack-frame .__location { color: #999; font-size: 12px; }
.__btn { display: inline-block; padding: 2px 8px; border: 1px solid #ccc; border-radius: 3px; font-size: 12px; }
</style>"#;
