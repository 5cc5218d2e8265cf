use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};
use std::ffi::{OsStr, OsString};

use os_str_bytes::OsStrBytesExt;
use tracing::{debug, trace};

use crate::Result;
use crate::error::ErrorKind;
use crate::runtime::Slot;
use crate::values::ArgValue;

/// The registry of declared arguments.
///
/// Every destination is borrowed mutably for `'a`, so read them back after the
/// pack is dropped.
///
/// ```
/// let (mut verbose, mut count, mut file) = (false, 1u32, String::new());
/// let mut pack = warg::ArgPack::new();
/// pack.add(&mut verbose, "-v", "verbose output")?
///     .add(&mut count, "-n", "repeat count")?
///     .add_positional(&mut file, "FILE", "input file")?;
/// pack.parse(["input.txt", "-n=3", "-v"])?;
/// drop(pack);
///
/// assert!(verbose);
/// assert_eq!(count, 3);
/// assert_eq!(file, "input.txt");
/// # Ok::<_, warg::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct ArgPack<'a> {
    args: HashMap<String, Slot<'a>>,
    /// Registration order, for help.
    display_order: Vec<String>,
    /// Names satisfied without `=value`.
    flag_names: BTreeSet<String>,
    /// Names matched by position. Each is also a key of `args`.
    positional_names: Vec<String>,
    parsed: bool,
}

impl<'a> ArgPack<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a named argument writing into `place`.
    ///
    /// Boolean places become flags: a bare `name` sets them to `true`.
    ///
    /// # Errors
    ///
    /// `DuplicateArgument` if `name` is taken, `RegistrationClosed` after [`ArgPack::parse`].
    pub fn add<T: ArgValue>(
        &mut self,
        place: &'a mut T,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<&mut Self> {
        let name = name.into();
        if self.parsed {
            return Err(ErrorKind::RegistrationClosed.with_arg(&name));
        }
        match self.args.entry(name) {
            Entry::Occupied(ent) => return Err(ErrorKind::DuplicateArgument.with_arg(ent.key())),
            Entry::Vacant(ent) => {
                let name = ent.key().clone();
                debug!(name = %name, flag = T::IS_FLAG, "registered argument");
                ent.insert(Slot::new(place, name.clone(), description.into()));
                if T::IS_FLAG {
                    self.flag_names.insert(name.clone());
                }
                self.display_order.push(name);
            }
        }
        Ok(self)
    }

    /// Register an argument matched by its position among unnamed tokens.
    ///
    /// It can still be assigned by name with `name=value`.
    ///
    /// # Errors
    ///
    /// Same as [`ArgPack::add`].
    pub fn add_positional<T: ArgValue>(
        &mut self,
        place: &'a mut T,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<&mut Self> {
        let name = name.into();
        self.add(place, name.clone(), description)?;
        debug!(name = %name, index = self.positional_names.len(), "registered positional argument");
        self.positional_names.push(name);
        Ok(self)
    }

    /// Parse `args`, not including the program name, into the registered places.
    ///
    /// Each token is tried as `name=value`, then as a bare `name`, then as the next
    /// positional argument. Values applied before a failing token are kept.
    ///
    /// # Errors
    ///
    /// The first `UnknownArgument`, `DuplicateValue`, `InvalidValue` or `InvalidUtf8`
    /// aborts parsing. Parsing twice fails with `AlreadyParsed`.
    pub fn parse<I, S>(&mut self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        if self.parsed {
            return Err(ErrorKind::AlreadyParsed.into());
        }
        self.parsed = true;

        let mut positional_idx = 0usize;
        for arg in args {
            let arg: OsString = arg.into();
            let (slot, value) =
                route(&mut self.args, &self.positional_names, &mut positional_idx, &arg)?;
            slot.apply_value(value)?;
        }

        debug!(
            matched = self.args.values().filter(|slot| slot.is_matched()).count(),
            positional = positional_idx,
            "parsed arguments"
        );
        Ok(())
    }

    /// Render the usage and option list.
    #[must_use]
    pub fn show_help(&self, program_name: &str) -> String {
        let mut out = String::new();
        crate::help::render_help_into(&mut out, program_name, self);
        out
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Slot<'a>> {
        self.args.get(name)
    }

    /// All slots in registration order.
    pub fn slots(&self) -> impl Iterator<Item = &Slot<'a>> {
        self.display_order.iter().filter_map(|name| self.args.get(name))
    }

    pub fn positional_names(&self) -> impl Iterator<Item = &str> {
        self.positional_names.iter().map(String::as_str)
    }

    #[must_use]
    pub fn is_flag(&self, name: &str) -> bool {
        self.flag_names.contains(name)
    }

    #[must_use]
    pub fn is_positional(&self, name: &str) -> bool {
        self.positional_names.iter().any(|pos| pos == name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.args.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }
}

/// Find the slot `arg` targets and the text to feed it.
fn route<'s, 'a, 't>(
    args: &'s mut HashMap<String, Slot<'a>>,
    positional_names: &[String],
    positional_idx: &mut usize,
    arg: &'t OsStr,
) -> Result<(&'s mut Slot<'a>, &'t OsStr)> {
    if let Some((key, value)) = arg.split_once('=') {
        let slot = match key.to_str() {
            Some(key) => args.get_mut(key),
            None => None,
        };
        let slot = slot.ok_or_else(|| ErrorKind::UnknownArgument.with_input(arg))?;
        trace!(token = %arg.to_string_lossy(), name = slot.name(), "name with value");
        return Ok((slot, value));
    }

    let (name, value) = match arg.to_str() {
        Some(name) if args.contains_key(name) => (name, OsStr::new("")),
        _ => {
            let name = positional_names
                .get(*positional_idx)
                .ok_or_else(|| ErrorKind::UnknownArgument.with_input(arg))?;
            *positional_idx += 1;
            (name.as_str(), arg)
        }
    };
    trace!(token = %arg.to_string_lossy(), name, "bare token");
    let slot = args.get_mut(name).ok_or_else(|| ErrorKind::UnknownArgument.with_input(arg))?;
    Ok((slot, value))
}
