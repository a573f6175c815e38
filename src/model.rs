/// Separator between blanks (and between checkbox answers) in the `answer` column.
pub const BLANK_DELIMITER: &str = "!#!";

pub const MAX_OPTIONS: usize = 26;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Style {
    Radio,
    Checkbox,
    Dropdown,
    WordInput,
    Other(String),
}

impl Style {
    pub fn parse(tag: &str) -> Self {
        match tag.trim() {
            "radio" => Style::Radio,
            "checkbox" => Style::Checkbox,
            "dropdown" => Style::Dropdown,
            "wordinput" => Style::WordInput,
            other => Style::Other(other.to_string()),
        }
    }
}

/// One row of the WebClass manifest.
#[derive(Debug, Clone)]
pub struct QuizRecord {
    pub style: Style,
    pub answer: String,
    pub question_file: Option<String>,
    pub description_file: Option<String>,
    pub question: String,
    pub description: String,
    pub image: Option<String>,
    pub options: Vec<Option<String>>,
}

pub fn split_blanks(answer: &str) -> Vec<&str> {
    answer.split(BLANK_DELIMITER).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextType {
    Html,
    Plain,
}

impl TextType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextType::Html => "html",
            TextType::Plain => "plain",
        }
    }
}

/// Question or description text, resolved either from a converted file or an inline column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Body {
    pub text: String,
    pub kind: TextType,
}

impl Body {
    pub fn html(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: TextType::Html,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: TextType::Plain,
        }
    }
}

/// A present option with its positional identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice<'a> {
    pub ident: String,
    pub text: &'a str,
}

/// Identifiers are assigned by rank among present options, so gaps in the
/// source columns never leave holes in `opt1..optN`.
pub fn present_choices(options: &[Option<String>]) -> Vec<Choice<'_>> {
    options
        .iter()
        .flatten()
        .enumerate()
        .map(|(i, text)| Choice {
            ident: format!("opt{}", i + 1),
            text: text.as_str(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choice_idents_skip_absent_columns() {
        let options = vec![
            None,
            Some("A".to_string()),
            None,
            Some("B".to_string()),
            Some("C".to_string()),
        ];
        let choices = present_choices(&options);
        let idents: Vec<_> = choices.iter().map(|c| c.ident.as_str()).collect();
        assert_eq!(idents, ["opt1", "opt2", "opt3"]);
        assert_eq!(choices[1].text, "B");
    }

    #[test]
    fn style_tags() {
        assert_eq!(Style::parse(" radio "), Style::Radio);
        assert_eq!(Style::parse("wordinput"), Style::WordInput);
        assert_eq!(Style::parse("line"), Style::Other("line".to_string()));
    }

    #[test]
    fn blanks_split_on_delimiter() {
        assert_eq!(split_blanks("cat!#!dog"), ["cat", "dog"]);
        assert_eq!(split_blanks("1"), ["1"]);
    }
}
