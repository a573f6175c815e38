use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::config::ConvertOptions;
use crate::convert::DocumentConverter;
use crate::error::Result;
use crate::manifest::{find_manifest, read_manifest, resolve_encoding};
use crate::qti::assessment::{assessment_meta, Assembler, META_FILE, QUIZ_FILE};
use crate::qti::image::is_image_file;
use crate::workspace::Workspace;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub manifest: PathBuf,
    pub items: usize,
    pub skipped: usize,
    pub images: usize,
}

/// Convert a WebClass export at `input` into a Canvas QTI archive at `output`.
///
/// Nothing is written to `output` unless the whole conversion succeeds.
pub fn convert_archive(
    input: &Path,
    output: &Path,
    options: &ConvertOptions,
    converter: &dyn DocumentConverter,
) -> Result<Summary> {
    let encoding = resolve_encoding(&options.encoding)?;
    let workspace = Workspace::new()?;
    workspace.extract(input, encoding)?;

    let root = workspace.extract_dir();
    let manifest = find_manifest(&root)?;
    let records = read_manifest(&manifest, encoding)?;
    log::info!("{} rows in {}", records.len(), manifest.display());

    let assembly = Assembler::new(&root, converter, options.label_style).assemble(&records)?;

    let staged = workspace.output_dir();
    fs::create_dir_all(&staged)?;
    fs::write(staged.join(QUIZ_FILE), &assembly.xml)?;
    fs::write(staged.join(META_FILE), assessment_meta(&options.title))?;

    let images = top_level_images(&root)?;
    write_archive(output, &staged, &root, &images)?;

    Ok(Summary {
        manifest: manifest
            .strip_prefix(&root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| manifest.clone()),
        items: assembly.items,
        skipped: assembly.skipped,
        images: images.len(),
    })
}

/// Image files directly under `root`, sorted by name. Subdirectories are not searched.
pub fn top_level_images(root: &Path) -> Result<Vec<String>> {
    let mut images = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if is_image_file(&name) {
            images.push(name);
        }
    }
    images.sort();
    Ok(images)
}

/// Write the archive to a temporary file beside `output` and move it into place once complete.
fn write_archive(output: &Path, staged: &Path, image_root: &Path, images: &[String]) -> Result<()> {
    let parent = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let tmp = NamedTempFile::new_in(parent)?;

    let mut zip = ZipWriter::new(tmp.reopen()?);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for name in [QUIZ_FILE, META_FILE] {
        zip.start_file(name, options)?;
        zip.write_all(&fs::read(staged.join(name))?)?;
    }
    for name in images {
        zip.start_file(format!("images/{}", name), options)?;
        io::copy(&mut File::open(image_root.join(name))?, &mut zip)?;
    }
    zip.finish()?;

    tmp.persist(output).map_err(|e| e.error)?;
    log::info!("Wrote {} ({} images)", output.display(), images.len());
    Ok(())
}
