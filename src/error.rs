use std::ffi::OsString;
use std::fmt;

pub(crate) type DynStdError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The error from registering or parsing arguments.
pub struct Error(Box<Inner>);

#[cfg(test)]
struct _AssertErrorIsSendSync
where
    Error: Send + Sync;

struct Inner {
    kind: ErrorKind,

    /// The registered argument name involved.
    /// For unknown arguments, this is `None`.
    arg: Option<String>,
    /// The unexpected raw input we are parsing, when the error occurs.
    input: Option<OsString>,
    /// The type name a value failed to convert into.
    target_type: Option<&'static str>,
    /// The underlying source error, if there is any.
    source: Option<DynStdError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    // Registration errors.
    DuplicateArgument,
    RegistrationClosed,

    // Input parsing errors.
    MissingArg0,
    AlreadyParsed,
    UnknownArgument,
    DuplicateValue,
    InvalidValue,
    InvalidUtf8,
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source.as_ref().map(|err| &**err as _)
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let e = &*self.0;
        f.debug_struct("Error")
            .field("kind", &e.kind)
            .field("arg", &e.arg)
            .field("input", &e.input)
            .field("target_type", &e.target_type)
            .field("source", &e.source)
            .finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let e = &*self.0;

        let opt_input = |f: &mut fmt::Formatter<'_>| {
            if let Some(input) = &e.input {
                f.write_str(" '")?;
                f.write_str(&input.to_string_lossy())?;
                f.write_str("'")?;
            }
            Ok(())
        };
        let opt_arg = |f: &mut fmt::Formatter<'_>, with_for: bool| {
            if let Some(arg) = &e.arg {
                f.write_str(if with_for { " for '" } else { " '" })?;
                f.write_str(arg)?;
                f.write_str("'")?;
            }
            Ok(())
        };

        match e.kind {
            ErrorKind::DuplicateArgument => {
                f.write_str("argument")?;
                opt_arg(f, false)?;
                f.write_str(" is already registered")
            }
            ErrorKind::RegistrationClosed => {
                f.write_str("argument")?;
                opt_arg(f, false)?;
                f.write_str(" cannot be registered after parsing")
            }
            ErrorKind::MissingArg0 => f.write_str("missing executable argument (argv[0])"),
            ErrorKind::AlreadyParsed => f.write_str("arguments have already been parsed"),
            ErrorKind::UnknownArgument => {
                f.write_str("unexpected argument")?;
                opt_input(f)
            }
            ErrorKind::DuplicateValue => {
                f.write_str("the argument")?;
                opt_arg(f, false)?;
                f.write_str(" cannot be used multiple times")
            }
            ErrorKind::InvalidValue => {
                f.write_str("invalid value")?;
                opt_input(f)?;
                opt_arg(f, true)?;
                if let Some(ty) = e.target_type {
                    f.write_str(": expected ")?;
                    write_short_type_name(f, ty)?;
                }
                if let Some(source) = &e.source {
                    write!(f, ": {source}")?;
                }
                Ok(())
            }
            ErrorKind::InvalidUtf8 => {
                f.write_str("invalid UTF-8")?;
                opt_input(f)?;
                opt_arg(f, true)
            }
        }
    }
}

/// `core::option::Option<alloc::string::String>` => `Option<String>`
fn write_short_type_name(f: &mut fmt::Formatter<'_>, ty: &str) -> fmt::Result {
    for part in ty.split_inclusive(['<', '>', ',', ' ', '&', '(', ')', '[', ']', ';']) {
        f.write_str(part.rsplit("::").next().unwrap_or(part))?;
    }
    Ok(())
}

impl Error {
    fn new(kind: ErrorKind, arg: Option<String>, input: Option<OsString>) -> Self {
        Self(Box::new(Inner { kind, arg, input, target_type: None, source: None }))
    }

    /// What went wrong.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.0.kind
    }

    /// The registered argument name this error is about, if any.
    #[must_use]
    pub fn arg(&self) -> Option<&str> {
        self.0.arg.as_deref()
    }

    /// The raw token or value text that failed, if any.
    #[must_use]
    pub fn input(&self) -> Option<&std::ffi::OsStr> {
        self.0.input.as_deref()
    }

    /// The type name a value failed to convert into, for `InvalidValue`.
    #[must_use]
    pub fn target_type(&self) -> Option<&'static str> {
        self.0.target_type
    }

    pub(crate) fn with_arg(mut self, arg: &str) -> Self {
        self.0.arg = Some(arg.into());
        self
    }

    pub(crate) fn with_target_type(mut self, ty: &'static str) -> Self {
        self.0.target_type = Some(ty);
        self
    }

    pub(crate) fn with_source(mut self, source: DynStdError) -> Self {
        self.0.source = Some(source);
        self
    }
}

impl From<ErrorKind> for Error {
    #[cold]
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind, None, None)
    }
}

impl ErrorKind {
    #[cold]
    pub(crate) fn with_input(self, input: impl Into<OsString>) -> Error {
        Error::new(self, None, Some(input.into()))
    }

    #[cold]
    pub(crate) fn with_arg(self, arg: &str) -> Error {
        Error::new(self, Some(arg.into()), None)
    }
}
