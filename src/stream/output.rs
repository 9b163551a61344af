//! Final estimate files
//!
//! - `global_count_{ins,del}.out`: the global estimate on one line
//! - `local_counts_{ins,del}.out`: `node<TAB>estimate`, one row per node

use super::config::Mode;
use super::StreamResult;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tristream_sampling::TriangleSampler;

/// Locations of the written files
#[derive(Debug, Clone, PartialEq)]
pub struct OutputPaths {
    pub global: PathBuf,
    pub local: PathBuf,
}

impl OutputPaths {
    pub fn new(dir: impl AsRef<Path>, mode: Mode) -> Self {
        let dir = dir.as_ref();
        let suffix = mode.file_suffix();
        OutputPaths {
            global: dir.join(format!("global_count_{}.out", suffix)),
            local: dir.join(format!("local_counts_{}.out", suffix)),
        }
    }
}

/// Write the sampler's estimates into `dir`, creating it if needed.
///
/// Local rows are sorted by node id.
pub fn write_outputs(
    dir: impl AsRef<Path>,
    mode: Mode,
    sampler: &dyn TriangleSampler,
) -> StreamResult<OutputPaths> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let paths = OutputPaths::new(dir, mode);
    info!("Writing outputs to {:?}", dir);

    let mut global = BufWriter::new(File::create(&paths.global)?);
    writeln!(global, "{:?}", sampler.global_triangle_estimate())?;
    global.flush()?;

    let mut rows: Vec<_> = sampler.local_triangle_estimates().iter().collect();
    rows.sort_unstable_by_key(|(&node, _)| node);

    let mut local = BufWriter::new(File::create(&paths.local)?);
    for (node, count) in rows {
        writeln!(local, "{}\t{:?}", node, count)?;
    }
    local.flush()?;

    Ok(paths)
}
