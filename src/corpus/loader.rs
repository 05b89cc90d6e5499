//! Reading raw documents from disk
//!
//! Files are decoded as UTF-8 with invalid byte sequences dropped, so a
//! corpus with a few badly encoded mails still loads in full.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CorpusError, Result, Stage};
use crate::nlp::tokenizer::{tokenize_document, tokenize_document_lines};
use crate::types::RawDocument;

/// Options for directory loading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Sort entries by file name instead of using listing order
    pub sort_entries: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self { sort_entries: true }
    }
}

/// Decode bytes as UTF-8, silently dropping invalid sequences
pub fn decode_lossy(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        out.push_str(chunk.valid());
    }
    out
}

/// Read a single file as a [`RawDocument`]
pub fn load_file(path: impl AsRef<Path>) -> Result<RawDocument> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| CorpusError::io(Stage::Load, path, e))?;
    Ok(RawDocument::new(path, decode_lossy(&bytes)))
}

/// Read every file of a directory, sorted by file name
pub fn load_directory(path: impl AsRef<Path>) -> Result<Vec<RawDocument>> {
    load_directory_with(path, LoaderConfig::default())
}

/// Read every file of a directory
///
/// Subdirectories and other non-file entries are skipped; the directory is
/// not walked recursively.
pub fn load_directory_with(path: impl AsRef<Path>, config: LoaderConfig) -> Result<Vec<RawDocument>> {
    let dir = path.as_ref();
    let mut files = list_files(dir)?;
    if config.sort_entries {
        files.sort();
    }

    let documents = files
        .iter()
        .map(load_file)
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(dir = %dir.display(), files = documents.len(), "directory loaded");
    Ok(documents)
}

fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let io_err = |e| CorpusError::io(Stage::Load, dir, e);
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let path = entry.path();
        // follows symlinks
        if path.is_file() {
            files.push(path);
        } else {
            tracing::warn!(path = %path.display(), "skipping non-file entry");
        }
    }
    Ok(files)
}

/// Read a file and return every token in it, line by line
pub fn read_tokens(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let doc = load_file(path)?;
    Ok(tokenize_document(&doc.text))
}

/// Read a file and return one token list per non-empty line
pub fn read_line_tokens(path: impl AsRef<Path>) -> Result<Vec<Vec<String>>> {
    let doc = load_file(path)?;
    Ok(tokenize_document_lines(&doc.text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn write(dir: &Path, name: &str, bytes: &[u8]) {
        let mut f = File::create(dir.join(name)).unwrap();
        f.write_all(bytes).unwrap();
    }

    #[test]
    fn test_decode_lossy_drops_invalid_bytes() {
        assert_eq!(decode_lossy(b"hello \xff\xfeworld"), "hello world");
        assert_eq!(decode_lossy("caf\u{e9}".as_bytes()), "café");
        assert_eq!(decode_lossy(b""), "");
        // truncated multi-byte sequence at the end
        assert_eq!(decode_lossy(b"ok\xe2\x82"), "ok");
    }

    #[test]
    fn test_load_directory_sorted_and_lossy() {
        let dir = tempdir().unwrap();
        write(dir.path(), "b.txt", b"second file");
        write(dir.path(), "a.txt", b"first \x80file");
        fs::create_dir(dir.path().join("nested")).unwrap();

        let docs = load_directory(dir.path()).unwrap();

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].text, "first file");
        assert_eq!(docs[1].text, "second file");
        assert!(docs[0].path.ends_with("a.txt"));
    }

    #[test]
    fn test_load_missing_directory_is_load_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");

        let err = load_directory(&missing).unwrap_err();

        assert_eq!(err.stage(), Stage::Load);
        assert_eq!(err.path(), Some(missing.as_path()));
    }

    #[test]
    fn test_load_empty_directory() {
        let dir = tempdir().unwrap();
        assert!(load_directory(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_read_tokens_and_lines() {
        let dir = tempdir().unwrap();
        write(dir.path(), "mail.txt", b"Subject: WIN big\n\nYou\xe2\x80\x99re a winner\n");
        let path = dir.path().join("mail.txt");

        assert_eq!(
            read_tokens(&path).unwrap(),
            vec!["subject", "win", "big", "you", "re", "a", "winner"]
        );
        assert_eq!(
            read_line_tokens(&path).unwrap(),
            vec![
                vec!["subject", "win", "big"],
                vec!["you", "re", "a", "winner"]
            ]
        );
    }
}
