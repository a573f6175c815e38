use crate::error::{ConvertError, Result};

const KATAKANA: [char; 13] = [
    'ア', 'イ', 'ウ', 'エ', 'オ', 'カ', 'キ', 'ク', 'ケ', 'コ', 'サ', 'シ', 'ス',
];

/// How cloze blanks are labelled in the question body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelStyle {
    #[default]
    Numeric,
    Lower,
    Upper,
    Katakana,
}

impl LabelStyle {
    /// Unrecognized keys fall back to numeric labels.
    pub fn from_key(key: &str) -> Self {
        match key.trim() {
            "a" => LabelStyle::Lower,
            "A" => LabelStyle::Upper,
            "ア" => LabelStyle::Katakana,
            _ => LabelStyle::Numeric,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            LabelStyle::Numeric => "1",
            LabelStyle::Lower => "a",
            LabelStyle::Upper => "A",
            LabelStyle::Katakana => "ア",
        }
    }
}

/// Format the label for the 1-based blank `index`.
pub fn format_label(index: usize, style: LabelStyle) -> Result<String> {
    let out_of_range = || ConvertError::LabelOutOfRange {
        index,
        style: style.key(),
    };

    match style {
        LabelStyle::Numeric => Ok(format!("{}.", index)),
        LabelStyle::Lower => offset_char(96, index)
            .map(|c| format!("{}.", c))
            .ok_or_else(out_of_range),
        LabelStyle::Upper => offset_char(64, index)
            .map(|c| format!("{}.", c))
            .ok_or_else(out_of_range),
        LabelStyle::Katakana => index
            .checked_sub(1)
            .and_then(|i| KATAKANA.get(i))
            .map(|c| format!("{}.", c))
            .ok_or_else(out_of_range),
    }
}

fn offset_char(base: u32, index: usize) -> Option<char> {
    u32::try_from(index)
        .ok()
        .and_then(|i| base.checked_add(i))
        .and_then(char::from_u32)
}

/// Placeholder line for cloze bodies: `1. [q1] 2. [q2]`.
pub fn placeholder_line(blanks: usize, style: LabelStyle) -> Result<String> {
    let mut parts = Vec::with_capacity(blanks);
    for j in 1..=blanks {
        parts.push(format!("{} [q{}]", format_label(j, style)?, j));
    }
    Ok(parts.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_is_the_fallback() {
        assert_eq!(LabelStyle::from_key("i"), LabelStyle::Numeric);
        assert_eq!(format_label(3, LabelStyle::from_key("?")).unwrap(), "3.");
    }

    #[test]
    fn letters() {
        assert_eq!(format_label(1, LabelStyle::Lower).unwrap(), "a.");
        assert_eq!(format_label(3, LabelStyle::Lower).unwrap(), "c.");
        assert_eq!(format_label(2, LabelStyle::Upper).unwrap(), "B.");
    }

    #[test]
    fn katakana_sequence() {
        assert_eq!(format_label(1, LabelStyle::Katakana).unwrap(), "ア.");
        assert_eq!(format_label(13, LabelStyle::Katakana).unwrap(), "ス.");
        assert!(matches!(
            format_label(14, LabelStyle::Katakana),
            Err(ConvertError::LabelOutOfRange { index: 14, .. })
        ));
    }

    #[test]
    fn placeholders_are_space_joined() {
        assert_eq!(
            placeholder_line(2, LabelStyle::Upper).unwrap(),
            "A. [q1] B. [q2]"
        );
    }
}
