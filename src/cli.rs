use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::config::FileConfig;

#[derive(Parser, Debug)]
#[command(
    name = "webclass2qti",
    version,
    about = "Convert a WebClass quiz export into a Canvas QTI archive"
)]
pub struct Cli {
    /// WebClass export (.zip)
    pub input: PathBuf,

    /// Output archive
    #[arg(short, long, value_name = "path", default_value = "canvas_qti.zip")]
    pub output: PathBuf,

    /// Quiz title [default: WebClass Import]
    #[arg(long)]
    pub title: Option<String>,

    /// Blank label style: 1, a, A or ア [default: 1]
    #[arg(long, value_name = "key")]
    pub label_style: Option<String>,

    /// Encoding of the manifest and archive entry names [default: shift_jis]
    #[arg(long, value_name = "label")]
    pub encoding: Option<String>,

    /// pandoc executable used for .docx and .tex sources [default: pandoc]
    #[arg(long, value_name = "path")]
    pub pandoc: Option<PathBuf>,

    /// Settings file [default: <config dir>/webclass2qti/config.yaml]
    #[arg(long, value_name = "path")]
    pub config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn overrides(&self) -> FileConfig {
        FileConfig {
            title: self.title.clone(),
            label_style: self.label_style.clone(),
            encoding: self.encoding.clone(),
            pandoc: self.pandoc.clone(),
        }
    }

    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["webclass2qti", "export.zip"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("export.zip"));
        assert_eq!(cli.output, PathBuf::from("canvas_qti.zip"));
        assert_eq!(cli.overrides(), FileConfig::default());
        assert_eq!(cli.log_level(), log::LevelFilter::Info);
    }

    #[test]
    fn flags() {
        let cli = Cli::try_parse_from([
            "webclass2qti",
            "export.zip",
            "-o",
            "out.zip",
            "--title",
            "Week 3",
            "--label-style",
            "A",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.output, PathBuf::from("out.zip"));
        assert_eq!(cli.overrides().title.as_deref(), Some("Week 3"));
        assert_eq!(cli.overrides().label_style.as_deref(), Some("A"));
        assert_eq!(cli.log_level(), log::LevelFilter::Trace);
    }
}
