use std::path::Path;

use crate::convert::DocumentConverter;
use crate::error::Result;
use crate::label::LabelStyle;
use crate::model::{Body, QuizRecord, Style};
use crate::qti::image::image_tag;
use crate::qti::items::{self, ItemInput};
use crate::qti::{escape, mattext_content};

pub const QUIZ_FILE: &str = "quiz.xml";
pub const META_FILE: &str = "assessment_meta.xml";

const HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<questestinterop>
  <assessment ident="webclass_assess" title="WebClass Import">
    <section ident="root_section">
"#;

const FOOTER: &str = r#"    </section>
  </assessment>
</questestinterop>
"#;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assembly {
    pub xml: String,
    pub items: usize,
    pub skipped: usize,
}

/// Turns manifest rows into a QTI assessment document.
pub struct Assembler<'a> {
    root: &'a Path,
    converter: &'a dyn DocumentConverter,
    labels: LabelStyle,
}

impl<'a> Assembler<'a> {
    /// `root` is the extracted archive; file references in the manifest are relative to it.
    pub fn new(root: &'a Path, converter: &'a dyn DocumentConverter, labels: LabelStyle) -> Self {
        Self {
            root,
            converter,
            labels,
        }
    }

    pub fn assemble(&self, records: &[QuizRecord]) -> Result<Assembly> {
        let mut assembly = Assembly {
            xml: HEADER.to_string(),
            ..Default::default()
        };

        for (index, record) in records.iter().enumerate() {
            match self.build_item(index, record)? {
                Some(item) => {
                    assembly.xml.push_str(&item);
                    assembly.items += 1;
                }
                None => assembly.skipped += 1,
            }
        }

        assembly.xml.push_str(FOOTER);
        Ok(assembly)
    }

    /// Complete `<item>` for one row, or `None` for styles with no QTI mapping.
    pub fn build_item(&self, index: usize, record: &QuizRecord) -> Result<Option<String>> {
        let ident = format!("q_{}", index + 1);

        if let Style::Other(tag) = &record.style {
            log::warn!("Row {}: skipping unsupported style {:?}", index + 1, tag);
            return Ok(None);
        }

        let question = self.resolve(record.question_file.as_deref(), &record.question)?;
        let description = self.resolve(record.description_file.as_deref(), &record.description)?;
        let image = image_tag(record.image.as_deref());

        let input = ItemInput {
            ident: &ident,
            question: &question,
            image: &image,
            options: &record.options,
            answer: &record.answer,
        };

        log::debug!("Row {}: {:?} -> {}", index + 1, record.style, ident);
        let mut item = match &record.style {
            Style::Radio => items::single_choice(&input),
            Style::Checkbox => items::multiple_choice(&input),
            Style::Dropdown => items::dropdown_cloze(&input, self.labels)?,
            Style::WordInput => items::text_cloze(&input, self.labels)?,
            Style::Other(_) => return Ok(None),
        };
        item.push_str(&feedback(&description));
        Ok(Some(item))
    }

    /// A referenced file that exists is converted to HTML; otherwise the inline column is used as plain text.
    pub fn resolve(&self, file: Option<&str>, inline: &str) -> Result<Body> {
        if let Some(name) = file {
            let path = self.root.join(name);
            if path.is_file() {
                return Ok(Body::html(self.converter.to_html(&path)?));
            }
            log::debug!("{} not found, using inline text", path.display());
        }
        Ok(Body::plain(inline))
    }
}

/// General feedback block carrying the description; closes the item.
pub fn feedback(description: &Body) -> String {
    let mut out = String::new();
    out.push_str("  <itemfeedback ident=\"general_fb\">\n");
    out.push_str("    <flow_mat>\n");
    out.push_str("      <material>\n");
    out.push_str(&format!(
        "        <mattext texttype=\"text/{}\">{}</mattext>\n",
        description.kind.as_str(),
        mattext_content(description)
    ));
    out.push_str("      </material>\n");
    out.push_str("    </flow_mat>\n");
    out.push_str("  </itemfeedback>\n");
    out.push_str("</item>\n");
    out
}

pub fn assessment_meta(title: &str) -> String {
    let title = escape(title);
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<quiz identifier="{0}"
xmlns="http://canvas.instructure.com/xsd/cccv1p0"
xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
xsi:schemaLocation="http://canvas.instructure.com/xsd/cccv1p0 https://canvas.instructure.com/xsd/cccv1p0.xsd">
<title>{0}</title>
<scoring_policy>keep_highest</scoring_policy>
</quiz>
"#,
        title
    )
}
