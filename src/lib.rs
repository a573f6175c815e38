pub mod cli;
pub mod config;
pub mod convert;
pub mod error;
pub mod label;
pub mod manifest;
pub mod model;
pub mod package;
pub mod qti;
pub mod workspace;

pub use config::ConvertOptions;
pub use convert::{DocumentConverter, Pandoc};
pub use error::{ConvertError, Result};
pub use package::{convert_archive, Summary};
