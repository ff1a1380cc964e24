//! Abstractions shared by the domain and service crates of the hub.

/// Helps declaring modules and re-exporting their content.
/// ```ignore
/// // code
/// make_re_export!(xxx);
/// // gen
/// pub mod xxx;
/// pub use self::xxx::*;
/// ```
#[macro_export]
macro_rules! make_re_export {
    ($($(#[$meta:meta])*  $mod_name:ident ),*) => {
        $($(#[$meta])* pub mod $mod_name;)*
        $($(#[$meta])* pub use self::$mod_name::*;)*
    };
}

pub mod background_service;
pub mod message_queue;
pub mod model;
pub mod repository;
