/// Domain-aware logging macros.
///
/// Each macro injects a `domain` field so callers never spell the string
/// literal. Domains used in this crate: `parse` (single texts) and `batch`
/// (host entities).
///
/// ```ignore
/// hpl_debug!(parse, start = ?start, "parsing text");
/// hpl_error!(batch, entity = %name, "Error in Node 'x' when parsing property");
/// ```

/// Internal helper. Use `hpl_error!`, `hpl_info!` or `hpl_debug!`.
#[doc(hidden)]
macro_rules! hpl_log {
    ($level:ident, $domain:ident, $($field:tt)*) => {
        tracing::$level!(domain = stringify!($domain), $($field)*)
    };
}

/// Log at ERROR level with an automatic `domain` field.
macro_rules! hpl_error {
    ($domain:ident, $($rest:tt)*) => {
        hpl_log!(error, $domain, $($rest)*)
    };
}

/// Log at INFO level with an automatic `domain` field.
macro_rules! hpl_info {
    ($domain:ident, $($rest:tt)*) => {
        hpl_log!(info, $domain, $($rest)*)
    };
}

/// Log at DEBUG level with an automatic `domain` field.
macro_rules! hpl_debug {
    ($domain:ident, $($rest:tt)*) => {
        hpl_log!(debug, $domain, $($rest)*)
    };
}
