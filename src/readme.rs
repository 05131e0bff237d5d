// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Writes the rendered report to its destination.
use std::{fs, io::ErrorKind, path::Path};

use tracing::{debug, info};

use crate::error::{self, Error};

/// Writes `document` to `readme_path` unless the file already holds it.
///
/// Missing parent directories are created. Returns `true` when the file was
/// written and `false` when the existing content was identical.
///
/// # Errors
///
/// Returns [`Error::Output`](Error::Output) when the destination cannot be
/// read, created, or written.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
///
/// use oscr::write_readme;
///
/// # fn main() -> Result<(), oscr::Error> {
/// let written = write_readme(Path::new("README.md"), "# OSS Contributions\n")?;
/// println!("updated: {written}");
/// # Ok(())
/// # }
/// ```
pub fn write_readme(readme_path: &Path, document: &str) -> Result<bool, Error> {
    match fs::read_to_string(readme_path) {
        Ok(existing) if existing == document => {
            info!("No changes to {}", readme_path.display());
            return Ok(false);
        }
        Ok(_) => debug!("Existing {} differs from rendered report", readme_path.display()),
        Err(source) if source.kind() == ErrorKind::NotFound => {
            debug!("{} does not exist yet", readme_path.display());
        }
        Err(source) => return Err(error::output_io_error(readme_path, source))
    }

    if let Some(parent) = readme_path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|source| error::output_io_error(parent, source))?;
    }

    info!("Writing report to {}", readme_path.display());
    fs::write(readme_path, document)
        .map_err(|source| error::output_io_error(readme_path, source))?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::write_readme;

    #[test]
    fn writes_new_file_with_parent_directories() {
        let temp = tempdir().expect("failed to create tempdir");
        let path = temp.path().join("docs").join("README.md");

        let written = write_readme(&path, "# OSS Contributions\n").expect("write failed");

        assert!(written);
        assert_eq!(fs::read_to_string(&path).unwrap(), "# OSS Contributions\n");
    }

    #[test]
    fn skips_identical_content() {
        let temp = tempdir().expect("failed to create tempdir");
        let path = temp.path().join("README.md");
        fs::write(&path, "same\n").expect("failed to seed README");

        assert!(!write_readme(&path, "same\n").expect("write failed"));
        assert!(write_readme(&path, "different\n").expect("write failed"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "different\n");
    }

    #[test]
    fn reports_unwritable_destination() {
        let temp = tempdir().expect("failed to create tempdir");
        let error = write_readme(temp.path(), "content").expect_err("directory is not writable as file");
        assert!(matches!(error, crate::Error::Output { .. }));
    }
}
