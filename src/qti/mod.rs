//! QTI 1.2 fragments in the dialect Canvas imports.

pub mod assessment;
pub mod image;
pub mod items;

use std::borrow::Cow;

use crate::model::{Body, Choice, TextType};

pub const SCORE_DECL: &str =
    r#"<decvar maxvalue="100" minvalue="0" varname="SCORE" vartype="Decimal"/>"#;

pub fn escape(text: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(text)
}

/// Wrap markup in a CDATA section, splitting any embedded terminator.
pub fn cdata(text: &str) -> String {
    format!("<![CDATA[{}]]>", text.replace("]]>", "]]]]><![CDATA[>"))
}

/// Score weights keep a trailing `.0` when whole (`50.0`, `33.333333333333336`).
pub fn format_points(points: f64) -> String {
    if points.is_finite() && points.fract() == 0.0 {
        format!("{:.1}", points)
    } else {
        format!("{}", points)
    }
}

/// Body text as it goes inside `<mattext>`: HTML is kept literal, plain text is escaped.
pub fn mattext_content(body: &Body) -> String {
    match body.kind {
        TextType::Html => cdata(&body.text),
        TextType::Plain => escape(&body.text).into_owned(),
    }
}

pub(crate) fn push_item_header(out: &mut String, ident: &str, question_type: &str) {
    out.push_str(&format!("<item title=\"{0}\" ident=\"{0}\">\n", ident));
    out.push_str("  <itemmetadata>\n");
    out.push_str("    <qtimetadata>\n");
    out.push_str("      <qtimetadatafield>\n");
    out.push_str("        <fieldlabel>question_type</fieldlabel>\n");
    out.push_str(&format!("        <fieldentry>{}</fieldentry>\n", question_type));
    out.push_str("      </qtimetadatafield>\n");
    out.push_str("    </qtimetadata>\n");
    out.push_str("  </itemmetadata>\n");
    out.push_str("  <presentation>\n");
}

pub(crate) fn push_choice_labels(out: &mut String, choices: &[Choice<'_>]) {
    for choice in choices {
        out.push_str(&format!("        <response_label ident=\"{}\">\n", choice.ident));
        out.push_str(&format!(
            "          <material><mattext>{}</mattext></material>\n",
            escape(choice.text)
        ));
        out.push_str("        </response_label>\n");
    }
}

pub(crate) fn push_outcomes(out: &mut String) {
    out.push_str("  <resprocessing>\n");
    out.push_str("    <outcomes>\n");
    out.push_str(&format!("      {}\n", SCORE_DECL));
    out.push_str("    </outcomes>\n");
}

pub(crate) struct Condition<'a> {
    pub respident: &'a str,
    pub value: &'a str,
    pub case_insensitive: bool,
    pub action: &'a str,
    pub points: &'a str,
}

pub(crate) fn push_condition(out: &mut String, cond: &Condition<'_>) {
    let case = if cond.case_insensitive { " case=\"no\"" } else { "" };
    out.push_str("    <respcondition>\n");
    out.push_str("      <conditionvar>\n");
    out.push_str(&format!(
        "        <varequal respident=\"{}\"{}>{}</varequal>\n",
        cond.respident,
        case,
        escape(cond.value)
    ));
    out.push_str("      </conditionvar>\n");
    out.push_str(&format!(
        "      <setvar varname=\"SCORE\" action=\"{}\">{}</setvar>\n",
        cond.action, cond.points
    ));
    out.push_str("    </respcondition>\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_render_like_float_repr() {
        assert_eq!(format_points(100.0), "100.0");
        assert_eq!(format_points(50.0), "50.0");
        assert_eq!(format_points(100.0 / 3.0), "33.333333333333336");
    }

    #[test]
    fn cdata_splits_terminator() {
        assert_eq!(cdata("a]]>b"), "<![CDATA[a]]]]><![CDATA[>b]]>");
    }

    #[test]
    fn plain_text_is_escaped() {
        assert_eq!(mattext_content(&Body::plain("x < y & z")), "x &lt; y &amp; z");
        assert_eq!(mattext_content(&Body::html("<p>x</p>")), "<![CDATA[<p>x</p>]]>");
    }
}
