//! Command-line tool for inspecting and building directory packages.
//!
//! # Usage
//!
//! Unpack an Office document into a directory package:
//! ```sh
//! cargo run --example dirpkg -- unpack report.docx report/
//! ```
//!
//! List, print and delete parts:
//! ```sh
//! cargo run --example dirpkg -- list report/
//! cargo run --example dirpkg -- cat report/ /word/document.xml
//! cargo run --example dirpkg -- rm report/ /docProps/thumbnail.jpeg
//! ```
//!
//! Set `RUST_LOG=opc_dirpkg=debug` to trace individual part operations.

use clap::{Parser, Subcommand};
use opc_dirpkg::opc::constants::reserved;
use opc_dirpkg::{
    ContentTypesTable, DirPackage, FileAccess, FileMode, PackURI, PackageOptions,
};
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Inspect and build directory-backed OPC packages
#[derive(Parser, Debug)]
#[command(name = "dirpkg", version)]
struct Args {
    /// YAML file with package open options (mode, access, share)
    #[arg(long, global = true, value_name = "FILE")]
    options: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Copy every part of a zip-based package into a new directory package
    Unpack { archive: PathBuf, root: PathBuf },
    /// List parts with their content types
    List { root: PathBuf },
    /// Write a part's content to stdout
    Cat { root: PathBuf, partname: String },
    /// Delete a part
    Rm { root: PathBuf, partname: String },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let configured = match &args.options {
        Some(path) => Some(PackageOptions::from_yaml(&std::fs::read_to_string(path)?)?),
        None => None,
    };

    match args.command {
        Command::Unpack { archive, root } => {
            let options = configured.unwrap_or_else(|| {
                PackageOptions::default().with_mode(FileMode::CreateNew)
            });
            unpack(&archive, &root, options)
        },
        Command::List { root } => {
            let pkg = DirPackage::open(&root, configured.unwrap_or_else(PackageOptions::read_only))?;
            for record in pkg.list_parts()? {
                println!("{:<50} {}", record.partname(), record.content_type());
            }
            Ok(())
        },
        Command::Cat { root, partname } => {
            let mut pkg =
                DirPackage::open(&root, configured.unwrap_or_else(PackageOptions::read_only))?;
            let partname = PackURI::new(partname)?;
            let mut stream = pkg.open_stream(&partname, FileMode::Open, FileAccess::Read)?;
            io::copy(&mut stream, &mut io::stdout().lock())?;
            Ok(())
        },
        Command::Rm { root, partname } => {
            let options = configured
                .unwrap_or_else(|| PackageOptions::default().with_mode(FileMode::Open));
            let mut pkg = DirPackage::open(&root, options)?;
            pkg.delete_part(&PackURI::new(partname)?)?;
            pkg.close()?;
            Ok(())
        },
    }
}

fn unpack(
    archive: &Path,
    root: &Path,
    options: PackageOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut zip = zip::ZipArchive::new(File::open(archive)?)?;

    let mut xml = Vec::new();
    zip.by_name(reserved::CONTENT_TYPES)?.read_to_end(&mut xml)?;
    let content_types = ContentTypesTable::from_xml(&xml)?;

    let mut pkg = DirPackage::open(root, options)?;
    for i in 0..zip.len() {
        let mut entry = zip.by_index(i)?;
        if entry.is_dir() || entry.name() == reserved::CONTENT_TYPES {
            continue;
        }

        let partname = PackURI::new(format!("/{}", entry.name()))?;
        let Some(content_type) = content_types.content_type(&partname) else {
            tracing::warn!(%partname, "no content type, skipping");
            continue;
        };

        pkg.create_part(&partname, content_type)?;
        let mut stream = pkg.open_stream(&partname, FileMode::Create, FileAccess::Write)?;
        io::copy(&mut entry, &mut stream)?;
        stream.flush()?;
        stream.close()?;
    }
    pkg.close()?;

    println!("unpacked {} into {}", archive.display(), root.display());
    Ok(())
}
