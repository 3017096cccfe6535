//! Command implementations
//!
//! Install, update, and uninstall share the same calling convention: a
//! package name XOR a requirements file. Requirements mode runs the
//! single-package operation once per non-blank line and stops at the
//! first failure.

pub mod install;
pub mod list;
pub mod query;
pub mod search;
pub mod uninstall;
pub mod update;

pub use install::install;
pub use list::list_packages;
pub use search::search;
pub use uninstall::{uninstall, Prompt, StdinPrompt};
pub use update::update;

use crate::error::{Error, Result};
use std::fs::{self, File};
use std::path::Path;

/// The host runtime pseudo-package. Packages declare it as a dependency by
/// convention, but it is never itself installable from the index, so
/// dependency recursion skips it.
pub(crate) const RUNTIME_PACKAGE: &str = "mathscript";

/// Dispatches a lifecycle operation to its target: exactly one of
/// `package` or `requirements` must be given. In requirements mode each
/// non-blank, trimmed line names a package; the first failure aborts the
/// rest.
pub(crate) fn run_target<F>(
    package: Option<&str>,
    requirements: Option<&Path>,
    mut single: F,
) -> Result<()>
where
    F: FnMut(&str) -> Result<()>,
{
    match (package, requirements) {
        (Some(name), None) => single(name),
        (None, Some(file)) => {
            if !file.is_file() {
                return Err(Error::file_or_directory_not_found(file));
            }
            let contents = fs::read_to_string(file)
                .map_err(|e| Error::io(format!("failed to read \"{}\"", file.display()), &e))?;
            for line in contents.lines() {
                let name = line.trim();
                if name.is_empty() {
                    continue;
                }
                single(name)?;
            }
            Ok(())
        }
        _ => Err(Error::invalid_arguments(&["package", "-r/--requirements"])),
    }
}

/// Unpacks a downloaded `.zip` archive into a package directory.
pub(crate) fn unpack_archive(archive: &Path, dest: &Path) -> Result<()> {
    let file = File::open(archive)
        .map_err(|e| Error::io(format!("failed to open \"{}\"", archive.display()), &e))?;
    let mut zip = zip::ZipArchive::new(file).map_err(|e| {
        Error::internal(format!(
            "corrupt package archive \"{}\": {e}",
            archive.display()
        ))
    })?;
    zip.extract(dest).map_err(|e| {
        Error::internal(format!(
            "failed to extract \"{}\": {e}",
            archive.display()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::kinds;
    use std::io::Write;

    #[test]
    fn test_neither_target_is_invalid_arguments() {
        let err = run_target(None, None, |_| Ok(())).unwrap_err();
        assert!(err.is(&kinds().invalid_arguments));
        assert!(err.message().contains("package"));
        assert!(err.message().contains("-r/--requirements"));
    }

    #[test]
    fn test_both_targets_is_invalid_arguments() {
        let err = run_target(Some("demo"), Some(Path::new("reqs")), |_| Ok(())).unwrap_err();
        assert!(err.is(&kinds().invalid_arguments));
    }

    #[test]
    fn test_missing_requirements_file() {
        let err = run_target(None, Some(Path::new("/no/such/reqs")), |_| Ok(())).unwrap_err();
        assert!(err.is(&kinds().file_or_directory_not_found));
    }

    #[test]
    fn test_requirements_lines_trimmed_and_blank_skipped() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "  algebra  ").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "geometry").unwrap();

        let mut seen = Vec::new();
        run_target(None, Some(file.path()), |name| {
            seen.push(name.to_string());
            Ok(())
        })
        .unwrap();

        assert_eq!(seen, vec!["algebra", "geometry"]);
    }

    #[test]
    fn test_requirements_first_failure_aborts() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "good").unwrap();
        writeln!(file, "bad").unwrap();
        writeln!(file, "never").unwrap();

        let mut seen = Vec::new();
        let result = run_target(None, Some(file.path()), |name| {
            seen.push(name.to_string());
            if name == "bad" {
                Err(Error::package_not_found(name, Some("remote")))
            } else {
                Ok(())
            }
        });

        assert!(result.is_err());
        assert_eq!(seen, vec!["good", "bad"]);
    }
}
