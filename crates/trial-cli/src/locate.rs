//! Locate test specification sources and their compiled output

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Resolve the file named on the command line.
///
/// A path that exists relative to `cwd` wins. Otherwise `source_dir` is
/// searched for a file whose path ends with `file` (so both `math.test.ts`
/// and `unit/math.test.ts` work). Matches are sorted, first one wins.
pub fn find_source(file: &str, cwd: &Path, source_dir: &Path) -> Option<PathBuf> {
    let direct = cwd.join(file);
    if direct.is_file() {
        return Some(direct);
    }

    let wanted = Path::new(file);
    let matches = files_under(source_dir)
        .filter(|path| path.ends_with(wanted))
        .collect::<Vec<_>>();

    if matches.len() > 1 {
        tracing::warn!(
            file,
            count = matches.len(),
            "several sources match; using the first"
        );
    }
    matches.into_iter().next()
}

/// Path the compiler is expected to write for `source`
pub fn expected_output(source: &Path, out_dir: &Path, extension: &str) -> PathBuf {
    out_dir.join(output_file_name(source, extension))
}

/// Find the compiled output for `source` under `out_dir`.
///
/// Compilers that mirror the source tree put it in a subdirectory, so the
/// expected path is checked first and the whole output tree after that.
pub fn find_output(source: &Path, out_dir: &Path, extension: &str) -> Option<PathBuf> {
    let expected = expected_output(source, out_dir, extension);
    if expected.is_file() {
        return Some(expected);
    }

    let name = output_file_name(source, extension);
    files_under(out_dir).find(|path| path.file_name() == Some(OsStr::new(&name)))
}

fn output_file_name(source: &Path, extension: &str) -> String {
    let stem = source
        .file_stem()
        .and_then(OsStr::to_str)
        .unwrap_or("index");
    format!("{}.{}", stem, extension)
}

fn files_under(dir: &Path) -> impl Iterator<Item = PathBuf> {
    WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
}
