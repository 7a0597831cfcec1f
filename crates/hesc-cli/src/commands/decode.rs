use crate::cli::{DecodeArgs, OutputFormat};
use crate::config;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use hesc::core::io::csv::CsvFile;
use hesc::core::io::pdb::PdbFile;
use hesc::core::io::traits::{ExportError, StructureWriter};
use hesc::core::models::structure::DecodedStructure;
use hesc::engine::progress::ProgressReporter;
use hesc::workflows::decode::decode_path;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub fn run(args: DecodeArgs, show_progress: bool) -> Result<()> {
    let config = config::resolve(&args.options)?;
    debug!("Resolved decoder configuration: {:?}", config);

    let progress_handler = CliProgressHandler::new(show_progress);
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Decoding '{}'.", args.input.display());
    let decoded = decode_path(&args.input, &config, &reporter);
    progress_handler.clear();
    let (structure, summary) = decoded.map_err(|source| CliError::Decode {
        path: args.input.clone(),
        source,
    })?;

    let format = args
        .format
        .unwrap_or_else(|| OutputFormat::infer(args.output.as_deref()));
    info!(
        "Writing {} atoms as {:?} to {}.",
        summary.atom_count,
        format,
        args.output
            .as_deref()
            .map_or_else(|| "stdout".to_string(), |p| p.display().to_string())
    );

    match &args.output {
        Some(path) => write_file(&structure, format, path)?,
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write_stream(&structure, format, &mut handle).map_err(|source| CliError::Export {
                path: PathBuf::from("<stdout>"),
                source,
            })?;
            handle.flush()?;
        }
    }

    if let Some(path) = &args.output {
        eprintln!(
            "Decoded {} atoms in {} model(s) to '{}' ({:.1} ms).",
            summary.atom_count,
            summary.model_count,
            path.display(),
            summary.elapsed.as_secs_f64() * 1000.0
        );
    }
    Ok(())
}

fn write_file(structure: &DecodedStructure, format: OutputFormat, path: &Path) -> Result<()> {
    let written = match format {
        OutputFormat::Pdb => PdbFile::write_to_path(structure, path),
        OutputFormat::Csv => CsvFile::write_to_path(structure, path),
    };
    written.map_err(|source| CliError::Export {
        path: path.to_path_buf(),
        source,
    })
}

fn write_stream(
    structure: &DecodedStructure,
    format: OutputFormat,
    writer: &mut impl Write,
) -> std::result::Result<(), ExportError> {
    match format {
        OutputFormat::Pdb => PdbFile::write_to(structure, writer),
        OutputFormat::Csv => CsvFile::write_to(structure, writer),
    }
}
