//! Instance file export.
//!
//! Writes one pretty-printed JSON file per language,
//! `instances_<version>_<lang>.json`, in the layout the game runner loads.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::ExportError;
use crate::generator::InstanceFile;

/// Default benchmark version used in file names.
pub const DEFAULT_VERSION: &str = "v1.5";

/// File name of a language's instance file.
pub fn instance_file_name(version: &str, lang: &str) -> String {
    format!("instances_{}_{}.json", version, lang)
}

/// Writes an instance file into `output_dir`, creating the directory if needed.
///
/// Returns the path of the written file.
pub fn write_instance_file(
    output_dir: &Path,
    version: &str,
    lang: &str,
    instances: &InstanceFile,
) -> Result<PathBuf, ExportError> {
    prepare_output_dir(output_dir)?;

    let path = output_dir.join(instance_file_name(version, lang));
    write_json(&path, lang, instances)?;

    info!(
        path = %path.display(),
        instances = instances.instance_count(),
        "Instance file written"
    );
    Ok(path)
}

/// Writes the instance files of several languages, all or none.
///
/// Each file is staged as `<name>.tmp` in `output_dir`. The staged files are
/// renamed into place only after every one of them was written; on a failed
/// write the staged files are removed and no instance file is touched.
pub fn write_instance_files(
    output_dir: &Path,
    version: &str,
    files: &[(String, InstanceFile)],
) -> Result<Vec<PathBuf>, ExportError> {
    prepare_output_dir(output_dir)?;

    let mut staged: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(files.len());
    for (lang, instances) in files {
        let name = instance_file_name(version, lang);
        let path = output_dir.join(&name);
        let staging = output_dir.join(format!("{}.tmp", name));

        if let Err(e) = write_json(&staging, lang, instances) {
            if staging.is_file() {
                staged.push((staging, path));
            }
            discard_staged(&staged);
            return Err(e);
        }
        staged.push((staging, path));
    }

    let mut paths = Vec::with_capacity(staged.len());
    for (staging, path) in staged {
        fs::rename(&staging, &path)?;
        debug!(path = %path.display(), "Instance file moved into place");
        paths.push(path);
    }

    info!(
        dir = %output_dir.display(),
        files = paths.len(),
        instances = files.iter().map(|(_, f)| f.instance_count()).sum::<usize>(),
        "Instance files written"
    );
    Ok(paths)
}

fn prepare_output_dir(output_dir: &Path) -> Result<(), ExportError> {
    if output_dir.exists() && !output_dir.is_dir() {
        return Err(ExportError::NotADirectory(output_dir.display().to_string()));
    }
    fs::create_dir_all(output_dir)?;
    Ok(())
}

fn write_json(path: &Path, lang: &str, instances: &InstanceFile) -> Result<(), ExportError> {
    if instances.experiments.is_empty() {
        return Err(ExportError::NoExperiments(lang.to_string()));
    }
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, instances)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

fn discard_staged(staged: &[(PathBuf, PathBuf)]) {
    for (staging, _) in staged {
        if let Err(e) = fs::remove_file(staging) {
            warn!(path = %staging.display(), error = %e, "Failed to remove staged instance file");
        }
    }
}

/// Reads an instance file back.
pub fn read_instance_file(path: &Path) -> Result<InstanceFile, ExportError> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}
