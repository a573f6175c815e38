use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use pulldown_cmark::{html, Options, Parser};

use crate::error::{ConvertError, Result};

/// Turns a question or description source file into HTML.
///
/// Implementations return an empty string for paths that do not exist or
/// formats they do not understand. A failed conversion is an error.
pub trait DocumentConverter {
    fn to_html(&self, path: &Path) -> Result<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Docx,
    Latex,
    Markdown,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "docx" => Some(SourceFormat::Docx),
            "tex" => Some(SourceFormat::Latex),
            "md" | "markdown" => Some(SourceFormat::Markdown),
            _ => None,
        }
    }

    fn pandoc_reader(&self) -> &'static str {
        match self {
            SourceFormat::Docx => "docx",
            SourceFormat::Latex => "latex",
            SourceFormat::Markdown => "markdown",
        }
    }
}

/// Converts `.docx` and `.tex` with pandoc; Markdown is rendered in-process.
#[derive(Debug, Clone)]
pub struct Pandoc {
    program: PathBuf,
}

impl Pandoc {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn run(&self, path: &Path, format: SourceFormat) -> Result<String> {
        let failed = |reason: String| ConvertError::Converter {
            path: path.to_path_buf(),
            reason,
        };

        log::debug!("pandoc -f {} {}", format.pandoc_reader(), path.display());
        let output = Command::new(&self.program)
            .arg(path)
            .args(["-f", format.pandoc_reader(), "-t", "html", "--mathjax"])
            .output()
            .map_err(|e| failed(format!("cannot run {}: {}", self.program.display(), e)))?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        } else {
            Err(failed(String::from_utf8_lossy(&output.stderr).trim().to_string()))
        }
    }
}

impl Default for Pandoc {
    fn default() -> Self {
        Self::new("pandoc")
    }
}

impl DocumentConverter for Pandoc {
    fn to_html(&self, path: &Path) -> Result<String> {
        if !path.is_file() {
            return Ok(String::new());
        }
        match SourceFormat::from_path(path) {
            Some(SourceFormat::Markdown) => markdown_to_html(path),
            Some(format) => self.run(path, format),
            None => {
                log::warn!("Unsupported document format: {}", path.display());
                Ok(String::new())
            }
        }
    }
}

fn markdown_to_html(path: &Path) -> Result<String> {
    let source = fs::read_to_string(path)?;
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_TABLES);
    opts.insert(Options::ENABLE_STRIKETHROUGH);

    let mut out = String::new();
    html::push_html(&mut out, Parser::new_ext(&source, opts));
    Ok(out)
}
