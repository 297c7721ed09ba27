/// Inspects values into the default panel of the installed console.
///
/// Each argument is borrowed and inspected in order, after a line showing
/// where the macro was invoked. Evaluates to
/// `Result<(), ConsoleError>`.
///
/// # Errors
///
/// Fails with [`ConsoleError::UninitializedConsole`] when no console has
/// been [installed](crate::Console::install).
///
/// [`ConsoleError::UninitializedConsole`]: crate::ConsoleError::UninitializedConsole
///
/// # Examples
///
/// ```
/// use webconsole::{Console, ConsoleError, inspect};
///
/// assert_eq!(inspect!(1), Err(ConsoleError::UninitializedConsole));
///
/// Console::default().install().unwrap();
/// let user = ("ada", 36);
/// inspect!(user, "logged in").unwrap();
/// ```
#[macro_export]
macro_rules! inspect {
    ($($value:expr),+ $(,)?) => {
        $crate::__private::inspect(&[$(&$value as &dyn $crate::value::Inspect),+])
    };
}

/// Like [`inspect!`], with a [filter](crate::formatter::Filter) deciding
/// which entries of composite values are shown.
///
/// ```
/// use webconsole::{Console, formatter::exclude_keys, inspect_with_filter};
///
/// # Console::uninstall();
/// Console::default().replace();
/// let credentials = [("user", "ada"), ("password", "hunter2")];
/// let map: std::collections::BTreeMap<_, _> = credentials.into_iter().collect();
/// inspect_with_filter!(exclude_keys(&["password"]), map).unwrap();
/// ```
#[macro_export]
macro_rules! inspect_with_filter {
    ($filter:expr, $($value:expr),+ $(,)?) => {
        $crate::__private::inspect_with_filter(
            &$filter,
            &[$(&$value as &dyn $crate::value::Inspect),+],
        )
    };
}

/// Like [`inspect!`], with a caption for the first table.
#[macro_export]
macro_rules! inspect_with_caption {
    ($caption:expr, $($value:expr),+ $(,)?) => {
        $crate::__private::inspect_with_caption(
            $caption,
            &[$(&$value as &dyn $crate::value::Inspect),+],
        )
    };
}

/// Writes a log line into the default panel of the installed console.
///
/// Named arguments fill the `{name}` placeholders of the message.
///
/// ```
/// use webconsole::{Console, console_log, log::Level};
///
/// Console::default().replace();
/// console_log!(Level::Notice, "{count} rows imported", count = 12).unwrap();
/// ```
#[macro_export]
macro_rules! console_log {
    ($level:expr, $message:expr $(, $key:ident = $value:expr)* $(,)?) => {
        $crate::__private::log(
            $level,
            $message,
            &[$((::core::stringify!($key), $crate::value::Value::from($value))),*],
        )
    };
}
