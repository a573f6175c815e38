use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use encoding_rs::Encoding;
use walkdir::WalkDir;

use crate::error::{ConvertError, Result};
use crate::model::{QuizRecord, Style, MAX_OPTIONS};

const PREFERRED_MANIFEST: &str = "list.csv";

pub fn resolve_encoding(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| ConvertError::UnknownEncoding(label.to_string()))
}

/// UTF-8 wins when the bytes are valid UTF-8; otherwise `fallback` decodes them.
pub fn decode_text(bytes: &[u8], fallback: &'static Encoding) -> (String, &'static Encoding) {
    if let Ok(text) = std::str::from_utf8(bytes) {
        let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);
        return (text.to_string(), encoding_rs::UTF_8);
    }
    let (decoded, used, had_errors) = fallback.decode(bytes);
    if had_errors {
        log::warn!("Manifest contains bytes that are not valid {}", used.name());
    }
    (decoded.into_owned(), used)
}

fn is_csv(name: &str) -> bool {
    name.to_lowercase().ends_with(".csv") && !name.starts_with("._")
}

/// Locate the manifest: `list.csv` (any case) anywhere in the tree, else the first CSV.
pub fn find_manifest(root: &Path) -> Result<PathBuf> {
    let mut found = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() && is_csv(&entry.file_name().to_string_lossy()) {
            found.push(entry.into_path());
        }
    }

    if let Some(path) = found.iter().find(|p| {
        p.file_name()
            .map(|n| n.to_string_lossy().to_lowercase() == PREFERRED_MANIFEST)
            .unwrap_or(false)
    }) {
        return Ok(path.clone());
    }

    found.into_iter().next().ok_or(ConvertError::ManifestNotFound)
}

pub fn read_manifest(path: &Path, encoding: &'static Encoding) -> Result<Vec<QuizRecord>> {
    let bytes = fs::read(path)?;
    let (content, used) = decode_text(&bytes, encoding);
    log::info!("Reading manifest {} ({})", path.display(), used.name());
    parse_manifest(&content)
}

pub fn parse_manifest(content: &str) -> Result<Vec<QuizRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(content.as_bytes());

    let columns: HashMap<String, usize> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().to_string(), i))
        .collect();

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        let field = |name: &str| -> Option<String> {
            columns
                .get(name)
                .and_then(|&i| row.get(i))
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let options = (1..=MAX_OPTIONS)
            .map(|i| field(&format!("option{}", i)))
            .collect();

        records.push(QuizRecord {
            style: Style::parse(&field("style").unwrap_or_default()),
            answer: field("answer").unwrap_or_default(),
            question_file: field("question_file"),
            description_file: field("description_file"),
            question: field("question").unwrap_or_default(),
            description: field("description").unwrap_or_default(),
            image: field("image"),
            options,
        });
    }

    Ok(records)
}
