//! A dead simple program: `simple [-v] [-n=value] [FILE]`.
#![allow(clippy::print_stdout)]
use std::path::PathBuf;

fn main() -> warg::Result<()> {
    let mut verbose = false;
    let mut repeat = 1u32;
    let mut file = None::<PathBuf>;

    let mut pack = warg::ArgPack::new();
    pack.add(&mut verbose, "-v", "print what is going on")?
        .add(&mut repeat, "-n", "how many times to print")?
        .add_positional(&mut file, "FILE", "file to mention")?;
    warg::parse(pack);

    let file = file.as_deref().map_or_else(|| "nothing".into(), |path| path.display().to_string());
    for i in 0..repeat {
        if verbose {
            println!("{}/{repeat}: {file}", i + 1);
        } else {
            println!("{file}");
        }
    }
    Ok(())
}
