//! Declare command line arguments against your own variables, then parse into them.
//!
//! Named arguments are written `-name=value`, or just `-name` for flags (boolean
//! destinations). Any other token fills the next positional argument.
//!
//! ```no_run
//! fn main() -> warg::Result<()> {
//!     let mut verbose = false;
//!     let mut jobs = 1usize;
//!     let mut target = String::new();
//!
//!     let mut pack = warg::ArgPack::new();
//!     pack.add(&mut verbose, "-v", "verbose output")?
//!         .add(&mut jobs, "-j", "number of jobs")?
//!         .add_positional(&mut target, "TARGET", "what to build")?;
//!     // Prints help and exits on `-h` or invalid usage.
//!     warg::parse(pack);
//!
//!     println!("building {target} with {jobs} jobs, verbose: {verbose}");
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]
use std::ffi::OsString;

use tracing::debug;

mod error;
mod help;
mod pack;
mod runtime;
mod values;

pub use crate::error::{Error, ErrorKind};
pub use crate::pack::ArgPack;
pub use crate::runtime::Slot;
pub use crate::values::{ArgValue, ParseFailure};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Not public API. Only for macro internal use.
#[doc(hidden)]
pub mod __private {
    pub use std::ffi::OsStr;
    pub use std::string::{String, ToString};
    pub use std::result::Result;

    pub use crate::values::parse_via_from_str;
}

/// The flag registered by the entry helpers to request help.
pub const HELP_FLAG: &str = "-h";
/// Description of [`HELP_FLAG`].
pub const HELP_DESCRIPTION: &str = "show usage info";

/// What the entry helper decided after parsing.
#[derive(Debug)]
pub enum Outcome {
    /// Arguments are parsed. The program should go on.
    Proceed,
    /// Help was requested.
    Help { help: String },
    /// Arguments were rejected.
    InvalidUsage { error: Error, help: String },
}

impl Outcome {
    /// The status the process should exit with, or `None` to continue.
    ///
    /// Help and invalid usage both exit successfully.
    #[must_use]
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Outcome::Proceed => None,
            Outcome::Help { .. } | Outcome::InvalidUsage { .. } => Some(0),
        }
    }
}

/// Parse `std::env::args_os()` into `pack`.
///
/// On `-h` or any error, print help and exit the process.
pub fn parse(pack: ArgPack<'_>) {
    parse_from(std::env::args_os(), pack);
}

/// Parse `args` into `pack`. The first item is the program name.
///
/// On `-h` or any error, print help and exit the process.
#[allow(clippy::print_stdout, clippy::print_stderr, reason = "this is the process boundary")]
pub fn parse_from<I, T>(args: I, pack: ArgPack<'_>)
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let outcome = run_from(args, pack);
    let Some(code) = outcome.exit_code() else {
        return;
    };
    match outcome {
        Outcome::Proceed => {}
        Outcome::Help { help } => println!("{help}"),
        Outcome::InvalidUsage { error, help } => {
            eprint!("error parsing command line arguments.\nerror message: {error}\n");
            println!("{help}");
        }
    }
    std::process::exit(code);
}

/// Register [`HELP_FLAG`] on `pack`, parse `args` into it and decide what to do,
/// without printing or exiting. The first item of `args` is the program name.
pub fn run_from<I, T>(args: I, pack: ArgPack<'_>) -> Outcome
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut args = args.into_iter().map(Into::<OsString>::into);
    let program_name = args.next().map(|arg0| arg0.to_string_lossy().into_owned());

    let mut show_help = false;
    // Rebind after `show_help`, so the pack is dropped before it.
    let mut pack = pack;
    let ret = match &program_name {
        None => Err(ErrorKind::MissingArg0.into()),
        Some(_) => pack
            .add(&mut show_help, HELP_FLAG, HELP_DESCRIPTION)
            .and_then(|pack| pack.parse(args)),
    };
    let help = pack.show_help(program_name.as_deref().unwrap_or_default());
    drop(pack);

    match ret {
        Err(error) => {
            debug!(%error, "invalid usage");
            Outcome::InvalidUsage { error, help }
        }
        Ok(()) if show_help => {
            debug!("help requested");
            Outcome::Help { help }
        }
        Ok(()) => Outcome::Proceed,
    }
}
