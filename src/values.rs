use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

/// The literal a flag converts from when it appears without `=value`.
pub(crate) const FLAG_PRESENT: &str = "true";

/// A type that can be bound as an argument destination.
///
/// Implemented for `bool`, `char`, `String`, primitive numbers, `PathBuf`,
/// `OsString` and `Option` of any of them. Other `FromStr + Display` types can
/// opt in with [`from_str_arg_value!`](crate::from_str_arg_value).
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be used as a warg argument destination",
    label = "Unparsable type",
    note = "implement `FromStr` and `Display` for it, then use `warg::from_str_arg_value!`"
)]
pub trait ArgValue: Sized {
    /// Whether the argument is satisfied by its name alone, without `=value`.
    const IS_FLAG: bool = false;

    fn parse_value(v: &OsStr) -> Result<Self, ParseFailure>;

    /// Render the current value for display. Absent values render empty.
    fn render(&self) -> String;
}

/// Why a raw value could not be converted.
#[derive(Debug)]
pub enum ParseFailure {
    InvalidUtf8,
    Invalid(Box<dyn std::error::Error + Send + Sync + 'static>),
}

/// Implement [`ArgValue`] through `FromStr` and `Display`.
///
/// ```
/// #[derive(Debug, PartialEq)]
/// struct Level(u8);
///
/// impl std::str::FromStr for Level {
///     type Err = std::num::ParseIntError;
///     fn from_str(s: &str) -> Result<Self, Self::Err> {
///         s.parse().map(Level)
///     }
/// }
///
/// impl std::fmt::Display for Level {
///     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
///         self.0.fmt(f)
///     }
/// }
///
/// warg::from_str_arg_value!(Level);
/// ```
#[macro_export]
macro_rules! from_str_arg_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::ArgValue for $ty {
                fn parse_value(
                    v: &$crate::__private::OsStr,
                ) -> $crate::__private::Result<Self, $crate::ParseFailure> {
                    $crate::__private::parse_via_from_str(v)
                }

                fn render(&self) -> $crate::__private::String {
                    $crate::__private::ToString::to_string(self)
                }
            }
        )*
    };
}

#[doc(hidden)]
pub fn parse_via_from_str<T>(v: &OsStr) -> Result<T, ParseFailure>
where
    T: std::str::FromStr<Err: Into<Box<dyn std::error::Error + Send + Sync + 'static>>>,
{
    let s = v.to_str().ok_or(ParseFailure::InvalidUtf8)?;
    s.parse::<T>().map_err(|err| ParseFailure::Invalid(err.into()))
}

from_str_arg_value!(
    char, String, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);

impl ArgValue for bool {
    const IS_FLAG: bool = true;

    fn parse_value(v: &OsStr) -> Result<Self, ParseFailure> {
        parse_via_from_str(v)
    }

    fn render(&self) -> String {
        self.to_string()
    }
}

impl ArgValue for OsString {
    fn parse_value(v: &OsStr) -> Result<Self, ParseFailure> {
        Ok(v.to_owned())
    }

    fn render(&self) -> String {
        self.to_string_lossy().into_owned()
    }
}

impl ArgValue for PathBuf {
    fn parse_value(v: &OsStr) -> Result<Self, ParseFailure> {
        Ok(v.into())
    }

    fn render(&self) -> String {
        self.display().to_string()
    }
}

// `None` is the absent value.
impl<T: ArgValue> ArgValue for Option<T> {
    const IS_FLAG: bool = T::IS_FLAG;

    fn parse_value(v: &OsStr) -> Result<Self, ParseFailure> {
        T::parse_value(v).map(Some)
    }

    fn render(&self) -> String {
        self.as_ref().map(T::render).unwrap_or_default()
    }
}
