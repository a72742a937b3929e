use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use mfstool::{FileDisk, MinixImage};

#[derive(Parser, Debug)]
#[command(
    name = "mfstool",
    about = "Inspect and edit MINIX filesystem images without mounting them"
)]
struct Args {
    /// Disk image to operate on
    image: PathBuf,

    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short = 'v', long = "verbose", global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the root directory
    Ls,
    /// Print a file's content; the path must be DIR/FILE
    Cat { path: String },
    /// Create an empty file in the root directory
    Touch { name: String },
    /// Create a directory in the root directory
    Mkdir { name: String },
    /// Append data to a file; the path must be DIR/FILE
    Append { path: String, data: String },
}

/// The tool only supports paths of exactly two components, a directory
/// under the root and a file inside it.
fn split_path(path: &str) -> Result<(&str, &str)> {
    match path.split_once('/') {
        Some((dir, file)) if !dir.is_empty() && !file.is_empty() && !file.contains('/') => {
            Ok((dir, file))
        }
        _ => bail!("only paths in the format 'directory/filename' are supported"),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(if args.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        })
        .format_timestamp(None)
        .format_target(false)
        .init();

    let disk = FileDisk::open(&args.image)
        .with_context(|| format!("cannot open image {}", args.image.display()))?;
    let mut image = MinixImage::open(disk).context("not a readable MINIX image")?;
    let name_len = image.name_len();

    match &args.command {
        Command::Ls => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            for entry in image.list_root()? {
                out.write_all(&entry.name)?;
                out.write_all(b"\n")?;
            }
        }
        Command::Cat { path } => {
            let (dir, file) = split_path(path)?;
            let content = image.read_file(dir.as_bytes(), file.as_bytes())?;
            std::io::stdout().write_all(&content)?;
        }
        Command::Touch { name } => {
            if name.len() > name_len {
                bail!("file name '{name}' is too long (limit {name_len} bytes)");
            }
            image.create_file(name.as_bytes())?;
            image.flush()?;
        }
        Command::Mkdir { name } => {
            if name.len() > name_len {
                bail!("directory name '{name}' is too long (limit {name_len} bytes)");
            }
            image.create_directory(name.as_bytes())?;
            image.flush()?;
        }
        Command::Append { path, data } => {
            let (dir, file) = split_path(path)?;
            image.append(dir.as_bytes(), file.as_bytes(), data.as_bytes())?;
            image.flush()?;
        }
    }

    Ok(())
}
