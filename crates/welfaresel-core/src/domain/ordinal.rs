//! Ordinal attribute levels.
//!
//! Each dataset column with an ordinal vocabulary maps to a closed enum. The
//! label mapping is total over the vocabulary and fails on anything else, so
//! an unmapped label can never reach the penalty computation as a missing
//! value.

use std::fmt;
use std::str::FromStr;

use crate::error::DataMappingError;

macro_rules! ordinal_level {
    (
        $(#[$meta:meta])*
        $name:ident, $expected:literal {
            $($(#[$vmeta:meta])* $variant:ident = $code:literal => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Every level, lowest code first.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Returns the numeric code of this level.
            #[inline]
            pub const fn code(self) -> u8 {
                match self {
                    $($name::$variant => $code),+
                }
            }

            /// Returns the canonical dataset label.
            pub const fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            /// Maps a dataset label, reporting `column` on failure.
            ///
            /// Surrounding whitespace is ignored and matching is
            /// case-insensitive.
            pub fn from_label(column: &'static str, label: &str) -> Result<Self, DataMappingError> {
                let trimmed = label.trim();
                $(
                    if trimmed.eq_ignore_ascii_case($label) {
                        return Ok($name::$variant);
                    }
                )+
                Err(DataMappingError::UnknownLabel {
                    column,
                    label: label.to_string(),
                    expected: $expected,
                })
            }
        }

        impl FromStr for $name {
            type Err = DataMappingError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_label(stringify!($name), s)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

ordinal_level! {
    /// How easy an indicator is to assess, or a hazard to mitigate.
    EaseLevel, "Easy, Moderate, Difficult" {
        Easy = 1 => "Easy",
        Moderate = 2 => "Moderate",
        Difficult = 3 => "Difficult",
    }
}

ordinal_level! {
    /// Resources an indicator needs to be assessed.
    ResourceLevel, "Low, Medium, High" {
        Low = 1 => "Low",
        Medium = 2 => "Medium",
        High = 3 => "High",
    }
}

ordinal_level! {
    /// Impact of a welfare hazard. Informational; not part of the objective.
    ImpactLevel, "Low, High" {
        Low = 1 => "Low",
        High = 2 => "High",
    }
}
