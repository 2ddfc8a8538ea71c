//! Reading of the encoded jobspec.

use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use tracing::warn;

/// The path that denotes standard input.
pub const STDIN_PATH: &str = "-";

/// Reads the first line of `reader` as the encoded jobspec.
///
/// Only one line is consumed; a jobspec spanning several lines must be
/// encoded on a single line (for example as JSON) first.
pub fn read_line(mut reader: impl BufRead) -> Result<String> {
    let mut line = String::new();
    reader.read_line(&mut line)?;

    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        bail!("the jobspec is empty");
    }

    Ok(line.to_string())
}

/// Reads the encoded jobspec from a file, or from standard input when `path`
/// is `-`.
pub fn read_jobspec(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    if path == Path::new(STDIN_PATH) {
        warn!("reading jobspec from stdin");
        return read_line(std::io::stdin().lock()).context("failed to read jobspec from stdin");
    }

    let file = File::open(path)
        .with_context(|| format!("failed to open jobspec `{path}`", path = path.display()))?;
    read_line(BufReader::new(file))
        .with_context(|| format!("failed to read jobspec `{path}`", path = path.display()))
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn first_line_only() {
        let line = read_line("{\"version\": 1}\r\n{\"version\": 2}\n".as_bytes()).unwrap();
        assert_eq!(line, "{\"version\": 1}");

        let line = read_line("{\"version\": 1}".as_bytes()).unwrap();
        assert_eq!(line, "{\"version\": 1}");
    }

    #[test]
    fn empty() {
        assert!(read_line("".as_bytes()).is_err());
        assert!(read_line("  \nversion: 1\n".as_bytes()).is_err());
    }

    #[test]
    fn file() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "{\"tasks\": []}\n").unwrap();
        assert_eq!(read_jobspec(file.path()).unwrap(), "{\"tasks\": []}");

        let e = read_jobspec("/this/jobspec/does/not/exist.json").unwrap_err();
        assert!(e.to_string().contains("failed to open jobspec"));
    }
}
