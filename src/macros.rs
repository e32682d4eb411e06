//! Declarative helpers for error code tables and protocol version enums.

/// Defines `pub const` error codes and a `get_error_message` lookup.
macro_rules! define_error_codes {
    ($($name:ident = $code:expr => $msg:expr),* $(,)?) => {
        $(pub const $name: u32 = $code;)*

        /// Returns the human readable message for a numeric error code.
        pub fn get_error_message(code: u32) -> &'static str {
            match code {
                $($name => $msg,)*
                _ => "Unknown Error",
            }
        }
    };
}

/// Defines the `Version` enum with its string and numeric representations.
macro_rules! define_version {
    ($($variant:ident = ($s:literal, $v:literal)),* $(,)?) => {
        /// Tuya Local API protocol version.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Version {
            $($variant,)*
        }

        impl Version {
            /// Every supported version, oldest first.
            pub const ALL: &'static [Version] = &[$(Version::$variant,)*];

            /// Numeric value of the version (e.g., 3.3).
            pub fn val(&self) -> f32 {
                match self {
                    $(Version::$variant => $v,)*
                }
            }

            /// String form of the version (e.g., "3.3").
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Version::$variant => $s,)*
                }
            }

            fn from_str_opt(s: &str) -> Option<Self> {
                match s.trim() {
                    $($s => Some(Version::$variant),)*
                    _ => None,
                }
            }
        }
    };
}
