//! Small shared macros for the Reachup binaries.

#[cfg(feature = "actix")]
#[doc(hidden)]
pub use actix_web;

/// Generate a module-level `routes` function that registers the listed
/// actix handlers on a [`ServiceConfig`].
///
/// ```ignore
/// macros_utils::routes! {
///     route health,
///     route list_hosts,
/// }
/// ```
///
/// [`ServiceConfig`]: actix_web::web::ServiceConfig
#[cfg(feature = "actix")]
#[macro_export]
macro_rules! routes {
    ($(route $name:ident),+ $(,)?) => {
        pub fn routes(cfg: &mut $crate::actix_web::web::ServiceConfig) {
            $(cfg.service($name);)+
        }
    };
}
