use crate::cli::InspectArgs;
use crate::config;
use crate::error::{CliError, Result};
use hesc::core::io::container::MAGIC;
use hesc::core::io::traits::{AtomInfo, GroupInfo, StructureSink};
use hesc::engine::error::DecodeError;
use hesc::engine::progress::ProgressReporter;
use hesc::workflows::decode::{ContainerStream, DecodeSummary};
use std::fmt::Write as _;
use std::fs::File;
use std::path::Path;
use tracing::info;

/// A sink that keeps only the bounding box of the atoms it sees.
#[derive(Debug, Default)]
struct ExtentSink {
    extent: Option<([f64; 3], [f64; 3])>,
}

impl StructureSink for ExtentSink {
    fn model_count(&mut self, _count: usize) {}

    fn model_info(&mut self, _index: usize, _chain_count: usize) {}

    fn chain_info(&mut self, _chain_id: &str, _group_count: usize) {}

    fn group_info(&mut self, _group: &GroupInfo<'_>) {}

    fn atom_info(&mut self, atom: &AtomInfo<'_>) {
        let p = [atom.x, atom.y, atom.z];
        let (min, max) = self.extent.get_or_insert((p, p));
        for i in 0..3 {
            min[i] = min[i].min(p[i]);
            max[i] = max[i].max(p[i]);
        }
    }
}

pub fn run(args: InspectArgs) -> Result<()> {
    let config = config::resolve(&args.options)?;
    let decode_error = |source: DecodeError| CliError::Decode {
        path: args.input.clone(),
        source,
    };
    let file = File::open(&args.input)
        .map_err(|source| decode_error(DecodeError::Io { offset: 0, source }))?;

    info!("Inspecting '{}'.", args.input.display());
    let mut stream = ContainerStream::new(file).map_err(decode_error)?;
    let reporter = ProgressReporter::new();
    let mut index = 0;
    loop {
        let mut sink = ExtentSink::default();
        let Some(summary) = stream
            .decode_next(&mut sink, &config, &reporter)
            .map_err(decode_error)?
        else {
            break;
        };
        if index > 0 {
            println!();
        }
        print!("{}", format_report(&args.input, index, &summary, sink.extent));
        index += 1;
    }

    if index == 0 {
        return Err(decode_error(DecodeError::Truncated {
            offset: 0,
            needed: MAGIC.len() as u64,
        }));
    }
    Ok(())
}

fn format_report(
    path: &Path,
    index: usize,
    summary: &DecodeSummary,
    extent: Option<([f64; 3], [f64; 3])>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "File:       {} [structure {}]", path.display(), index);
    if let Some(header) = &summary.header {
        let _ = writeln!(
            out,
            "Format:     HESC {} (compression method {}{})",
            header.version,
            header.compression_method,
            if summary.compressed { ", gzip" } else { "" }
        );
    }
    let _ = writeln!(
        out,
        "Models:     {}{}",
        summary.model_count,
        if summary.homogeneous { " (homogeneous)" } else { "" }
    );
    let _ = writeln!(out, "Chains:     {}", summary.chain_count);
    let _ = writeln!(out, "Groups:     {}", summary.group_count);
    let _ = writeln!(out, "Templates:  {}", summary.template_count);
    let _ = writeln!(out, "Atoms:      {}", summary.atom_count);
    if summary.compressed {
        let _ = writeln!(
            out,
            "Size:       {} bytes ({} bytes compressed)",
            summary.stream_bytes, summary.source_bytes
        );
    } else {
        let _ = writeln!(out, "Size:       {} bytes", summary.stream_bytes);
    }
    let _ = writeln!(
        out,
        "Read time:  {:.3} ms",
        summary.elapsed.as_secs_f64() * 1000.0
    );
    if let Some((min, max)) = extent {
        let _ = writeln!(
            out,
            "Extent:     ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
            min[0], min[1], min[2], max[0], max[1], max[2]
        );
    }
    let _ = writeln!(out, "Sequences:  {}", summary.sequences.len());
    for (i, sequence) in summary.sequences.iter().enumerate() {
        let _ = writeln!(out, "  [{}] {}", i, sequence);
    }
    out
}
