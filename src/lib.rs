//! Ask a SQLite database questions in plain English.
//!
//! Each question runs once through the pipeline: the live schema is
//! introspected, rendered into a prompt, sent to a completion service, the
//! returned text is normalized into a single terminated statement and then
//! executed on a connection owned by the caller's pool.
reexport!(error);
reexport!(config);
reexport!(metadata);
reexport!(prompt);
reexport!(completion);
reexport!(normalize);
reexport!(rows);
reexport!(executor);
reexport!(pipeline);
reexport!(seed);
reexport!(testing, test);
#[allow(unused_imports)]
pub(crate) use tracing::{debug, error, info, span, trace, warn};

#[macro_export]
macro_rules! reexport {
    ($module:ident) => {
        $crate::reexport!($module, false);
    };
    ($module:ident, test) => {
        $crate::reexport!($module, true);
    };
    ($module:ident, $is_test:literal) => {
        #[cfg_attr($is_test, cfg(test))]
        mod $module;
        #[cfg_attr($is_test, cfg(test))]
        #[allow(unused_imports)]
        #[allow(ambiguous_glob_reexports)]
        pub use $module::*;
    };
}
