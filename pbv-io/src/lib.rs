//! PBV I/O - container orchestration
//!
//! The three entry points consumed by the CLI layer:
//!
//! - [`extract`]: container → decomposed vcs tree
//! - [`compress`]: vcs tree → container
//! - [`textconv`]: container → human-readable text stream
//!
//! All work is sequential, single-threaded file processing; the
//! destination is exclusively owned for the duration of the call and a
//! failure at any stage aborts the whole operation.

#![deny(unsafe_code)]
#![warn(missing_docs)]

use pbv_codec::mashup::deflate_options;
use pbv_format::constants::ORDER_INDEX_NAME;
use pbv_format::Result;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::{debug, info};
use zip::{ZipArchive, ZipWriter};

// Re-export commonly used types
pub use pbv_codec::{Converter, ConverterRegistry};
pub use pbv_format::{OrderIndex, PbvError};

fn zip_err<E: std::fmt::Display>(e: E) -> PbvError {
    PbvError::Zip(e.to_string())
}

/// Convert a container to the decomposed vcs tree at `out_dir`.
///
/// Refuses to proceed if `out_dir` exists unless `overwrite` is set, in
/// which case the destination is fully removed first. Member order is
/// recorded in the order-index sentinel at the tree root.
pub fn extract(input: &Path, out_dir: &Path, overwrite: bool, diffable: bool) -> Result<()> {
    if input == out_dir {
        return Err(PbvError::SamePath);
    }
    if out_dir.exists() {
        if !overwrite {
            return Err(PbvError::AlreadyExists(out_dir.to_path_buf()));
        }
        fs::remove_dir_all(out_dir)?;
    }
    fs::create_dir_all(out_dir)?;

    let registry = ConverterRegistry::standard()?;
    let mut archive = ZipArchive::new(BufReader::new(File::open(input)?)).map_err(zip_err)?;

    let mut order = OrderIndex::new();
    for i in 0..archive.len() {
        let mut member = archive.by_index(i).map_err(zip_err)?;
        let name = member.name().to_string();
        debug!(member = %name, "extracting");
        let mut raw = Vec::new();
        member.read_to_end(&mut raw)?;
        order.push(name.clone());
        registry
            .select(&name)
            .write_raw_to_vcs(&raw, &out_dir.join(&name), diffable)?;
    }

    fs::write(out_dir.join(ORDER_INDEX_NAME), order.to_text())?;
    info!(members = order.len(), "extracted container");
    Ok(())
}

/// Rebuild a container at `output` from the vcs tree at `vcs_dir`.
///
/// Members are written in the order recorded by the index; empty index
/// lines are skipped without producing an archive entry.
pub fn compress(vcs_dir: &Path, output: &Path, overwrite: bool, diffable: bool) -> Result<()> {
    if vcs_dir == output {
        return Err(PbvError::SamePath);
    }
    if output.exists() {
        if !overwrite {
            return Err(PbvError::AlreadyExists(output.to_path_buf()));
        }
        fs::remove_file(output)?;
    }

    let registry = ConverterRegistry::standard()?;
    let order = OrderIndex::parse(&fs::read_to_string(vcs_dir.join(ORDER_INDEX_NAME))?);

    let mut archive = ZipWriter::new(BufWriter::new(File::create(output)?));
    for name in order.iter() {
        debug!(member = %name, "compressing");
        archive
            .start_file(name, deflate_options())
            .map_err(zip_err)?;
        registry
            .select(name)
            .write_vcs_to_raw(&vcs_dir.join(name), &mut archive, diffable)?;
    }
    archive.finish().map_err(zip_err)?;
    info!(members = order.len(), "compressed container");
    Ok(())
}

/// Render a container as human-readable text on `out`.
///
/// Read-only: no filesystem side effects beyond the stream.
pub fn textconv(input: &Path, out: &mut dyn Write) -> Result<()> {
    let registry = ConverterRegistry::standard()?;
    let mut archive = ZipArchive::new(BufReader::new(File::open(input)?)).map_err(zip_err)?;

    for i in 0..archive.len() {
        let mut member = archive.by_index(i).map_err(zip_err)?;
        let name = member.name().to_string();
        let mut raw = Vec::new();
        member.read_to_end(&mut raw)?;
        writeln!(out, "Filename: {name}")?;
        registry.select(&name).write_textconv(&raw, out)?;
    }
    Ok(())
}
