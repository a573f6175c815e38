use std::fs::{self, File};
use std::io;
use std::path::{Component, Path, PathBuf};

use encoding_rs::Encoding;
use tempfile::TempDir;

use crate::error::{ConvertError, Result};

/// Scratch directory for one conversion. Removed on drop, whether or not the run succeeded.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Result<Self> {
        let dir = tempfile::Builder::new().prefix("webclass2qti-").tempdir()?;
        log::debug!("Workspace at {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Where the input archive is unpacked.
    pub fn extract_dir(&self) -> PathBuf {
        self.path().join("input")
    }

    /// Where generated documents are staged before packaging.
    pub fn output_dir(&self) -> PathBuf {
        self.path().join("output")
    }

    /// Unpack `archive` into [`Workspace::extract_dir`]. Returns the number of files written.
    pub fn extract(&self, archive: &Path, names: &'static Encoding) -> Result<usize> {
        let target = self.extract_dir();
        fs::create_dir_all(&target)?;

        let mut zip = zip::ZipArchive::new(File::open(archive)?)?;
        let mut count = 0;
        for i in 0..zip.len() {
            let mut entry = zip.by_index(i)?;
            let name = entry_name(entry.name_raw(), names);
            let relative = sanitize(&name)?;
            let outpath = target.join(&relative);

            if entry.is_dir() || name.ends_with('/') {
                fs::create_dir_all(&outpath)?;
                continue;
            }
            if let Some(parent) = outpath.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut out = File::create(&outpath)?;
            io::copy(&mut entry, &mut out)?;
            count += 1;
        }

        log::info!("Extracted {} files from {}", count, archive.display());
        Ok(count)
    }
}

/// Entry names without the UTF-8 flag usually come from Japanese Windows zippers.
fn entry_name(raw: &[u8], fallback: &'static Encoding) -> String {
    let name = match std::str::from_utf8(raw) {
        Ok(name) => name.to_string(),
        Err(_) => fallback.decode_without_bom_handling(raw).0.into_owned(),
    };
    name.replace('\\', "/")
}

fn sanitize(name: &str) -> Result<PathBuf> {
    let mut out = PathBuf::new();
    for component in Path::new(name).components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(ConvertError::UnsafeEntry(name.to_string()));
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_escaping_entries() {
        assert!(matches!(sanitize("../evil"), Err(ConvertError::UnsafeEntry(_))));
        assert!(matches!(sanitize("/etc/passwd"), Err(ConvertError::UnsafeEntry(_))));
        assert_eq!(sanitize("./a/b.csv").unwrap(), PathBuf::from("a/b.csv"));
    }

    #[test]
    fn shift_jis_entry_names() {
        let (raw, _, _) = encoding_rs::SHIFT_JIS.encode("問題1.docx");
        assert_eq!(entry_name(&raw, encoding_rs::SHIFT_JIS), "問題1.docx");
        assert_eq!(entry_name(b"dir\\a.png", encoding_rs::SHIFT_JIS), "dir/a.png");
    }

    #[test]
    fn workspace_is_removed_on_drop() {
        let ws = Workspace::new().unwrap();
        let path = ws.path().to_path_buf();
        fs::create_dir_all(ws.extract_dir()).unwrap();
        assert!(path.exists());
        drop(ws);
        assert!(!path.exists());
    }
}
