use std::ffi::OsStr;

use crate::Result;
use crate::error::ErrorKind;
use crate::values::{ArgValue, FLAG_PRESENT, ParseFailure};

/// A typed destination with its place attached as `&mut self`.
pub(crate) trait ArgPlace {
    fn is_flag(&self) -> bool;

    /// Convert `value` and store it. The place is untouched on failure.
    fn feed(&mut self, value: &OsStr) -> Result<(), ParseFailure>;

    fn type_name(&self) -> &'static str;

    fn render(&self) -> String;
}

/// Bind `place` as the destination of an argument.
pub(crate) fn place_for<'a, T: ArgValue>(place: &'a mut T) -> Box<dyn ArgPlace + 'a> {
    struct Place<'a, T>(&'a mut T);

    impl<T: ArgValue> ArgPlace for Place<'_, T> {
        fn is_flag(&self) -> bool {
            T::IS_FLAG
        }

        fn feed(&mut self, value: &OsStr) -> Result<(), ParseFailure> {
            let value = if T::IS_FLAG && value.is_empty() { OsStr::new(FLAG_PRESENT) } else { value };
            *self.0 = T::parse_value(value)?;
            Ok(())
        }

        fn type_name(&self) -> &'static str {
            std::any::type_name::<T>()
        }

        fn render(&self) -> String {
            self.0.render()
        }
    }

    Box::new(Place(place))
}

/// A registered argument: its name, description, whether it got a value, and
/// where the value goes.
pub struct Slot<'a> {
    name: String,
    description: String,
    matched: bool,
    place: Box<dyn ArgPlace + 'a>,
}

impl<'a> Slot<'a> {
    pub(crate) fn new<T: ArgValue>(place: &'a mut T, name: String, description: String) -> Self {
        Self { name, description, matched: false, place: place_for(place) }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Whether a value was applied during parsing.
    #[must_use]
    pub fn is_matched(&self) -> bool {
        self.matched
    }

    /// The current destination value rendered as text, empty if absent.
    #[must_use]
    pub fn value(&self) -> String {
        self.place.render()
    }

    pub(crate) fn is_flag(&self) -> bool {
        self.place.is_flag()
    }

    pub(crate) fn apply_value(&mut self, value: &OsStr) -> Result<()> {
        if self.matched {
            return Err(ErrorKind::DuplicateValue.with_arg(&self.name));
        }
        self.place.feed(value).map_err(|failure| match failure {
            ParseFailure::InvalidUtf8 => ErrorKind::InvalidUtf8.with_input(value).with_arg(&self.name),
            ParseFailure::Invalid(source) => ErrorKind::InvalidValue
                .with_input(value)
                .with_arg(&self.name)
                .with_target_type(self.place.type_name())
                .with_source(source),
        })?;
        self.matched = true;
        Ok(())
    }
}

impl std::fmt::Debug for Slot<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Slot")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("matched", &self.matched)
            .field("value", &self.value())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::expect;

    #[test]
    fn flag_without_value() {
        let mut verbose = false;
        let mut slot = Slot::new(&mut verbose, "-v".into(), "verbose".into());
        assert!(slot.is_flag());
        assert!(!slot.is_matched());
        slot.apply_value(OsStr::new("")).unwrap();
        assert!(slot.is_matched());
        assert_eq!(slot.value(), "true");
        drop(slot);
        assert!(verbose);
    }

    #[test]
    fn second_value_is_rejected() {
        let mut n = 0u32;
        let mut slot = Slot::new(&mut n, "-n".into(), "count".into());
        slot.apply_value(OsStr::new("1")).unwrap();
        let err = slot.apply_value(OsStr::new("2")).unwrap_err();
        expect!["the argument '-n' cannot be used multiple times"].assert_eq(&err.to_string());
        drop(slot);
        assert_eq!(n, 1);
    }

    #[test]
    fn failed_conversion_keeps_destination() {
        let mut n = 7i32;
        let mut slot = Slot::new(&mut n, "-n".into(), "count".into());
        let err = slot.apply_value(OsStr::new("7x")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
        assert_eq!(err.arg(), Some("-n"));
        assert_eq!(err.target_type(), Some("i32"));
        expect!["invalid value '7x' for '-n': expected i32: invalid digit found in string"]
            .assert_eq(&err.to_string());
        assert!(!slot.is_matched());
        drop(slot);
        assert_eq!(n, 7);
    }

    #[test]
    fn absent_value_renders_empty() {
        let mut name = None::<String>;
        let slot = Slot::new(&mut name, "-name".into(), "who".into());
        assert!(!slot.is_flag());
        assert_eq!(slot.value(), "");
    }
}
