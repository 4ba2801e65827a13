//! Configuration macros for single-declaration config sections
//!
//! `config_struct!` declares a section struct with embedded defaults. Each
//! generated struct also exposes `KEYS`, the list of documented keys in
//! declaration order, which the default-file writer and tests rely on.

/// Define a configuration section with embedded defaults
///
/// # Example
/// ```ignore
/// config_struct! {
///     pub struct MonitoringConfig {
///         polling_interval_hours: u64 = 24,
///         entity_id: String = "usg".to_string(),
///     }
/// }
/// ```
///
/// This generates:
/// - A struct with public fields and `#[serde(default)]`
/// - A Default implementation with the specified values
/// - `KEYS: &[&str]` listing every field name
#[macro_export]
macro_rules! config_struct {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_name:ident: $field_type:ty = $default_value:expr
            ),*
            $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
        #[serde(default)]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                pub $field_name: $field_type,
            )*
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    $(
                        $field_name: $default_value,
                    )*
                }
            }
        }

        impl $name {
            /// Documented keys of this section, in declaration order
            pub const KEYS: &'static [&'static str] = &[$(stringify!($field_name)),*];
        }
    };
}
