//! Item builders. Each returns an `<item>` opened through `</resprocessing>`;
//! the caller closes it after appending the feedback block.

use crate::error::Result;
use crate::label::{placeholder_line, LabelStyle};
use crate::model::{present_choices, split_blanks, Body, Choice, TextType};
use crate::qti::{
    cdata, escape, format_points, mattext_content, push_choice_labels, push_condition,
    push_item_header, push_outcomes, Condition,
};

pub const FIB_MAX_CHARS: usize = 60;

#[derive(Debug, Clone, Copy)]
pub struct ItemInput<'a> {
    pub ident: &'a str,
    pub question: &'a Body,
    /// Pre-rendered `<material>` fragment for the question image, possibly empty.
    pub image: &'a str,
    pub options: &'a [Option<String>],
    pub answer: &'a str,
}

fn parse_rank(token: &str) -> Option<usize> {
    let token = token.trim();
    if token.is_empty() || !token.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    token.parse::<usize>().ok().filter(|n| *n > 0)
}

fn push_question(out: &mut String, input: &ItemInput<'_>) {
    out.push_str("    <material>\n");
    out.push_str(&format!(
        "      <mattext texttype=\"text/{}\">{}</mattext>\n",
        input.question.kind.as_str(),
        mattext_content(input.question)
    ));
    out.push_str("    </material>\n");
    out.push_str(input.image);
}

/// Cloze bodies are always HTML so the placeholder markers render inline.
fn push_cloze_question(out: &mut String, input: &ItemInput<'_>, placeholders: &str) {
    let body = match input.question.kind {
        TextType::Html => input.question.text.clone(),
        TextType::Plain => escape(&input.question.text).into_owned(),
    };
    out.push_str("    <material>\n");
    out.push_str(&format!(
        "      <mattext texttype=\"text/html\">{}</mattext>\n",
        cdata(&format!("{}<br/>\n{}<br/>", body, placeholders))
    ));
    out.push_str("    </material>\n");
    out.push_str(input.image);
}

fn push_render_choice(out: &mut String, ident: &str, cardinality: Option<&str>, choices: &[Choice<'_>]) {
    match cardinality {
        Some(c) => out.push_str(&format!(
            "    <response_lid ident=\"{}\" rcardinality=\"{}\">\n",
            ident, c
        )),
        None => out.push_str(&format!("    <response_lid ident=\"{}\">\n", ident)),
    }
    out.push_str("      <render_choice>\n");
    push_choice_labels(out, choices);
    out.push_str("      </render_choice>\n");
    out.push_str("    </response_lid>\n");
}

pub fn single_choice(input: &ItemInput<'_>) -> String {
    let choices = present_choices(input.options);
    let mut out = String::new();

    push_item_header(&mut out, input.ident, "multiple_choice_question");
    push_question(&mut out, input);
    push_render_choice(&mut out, "response1", Some("Single"), &choices);
    out.push_str("  </presentation>\n");
    push_outcomes(&mut out);

    if let Some(rank) = parse_rank(input.answer) {
        let value = format!("opt{}", rank);
        push_condition(
            &mut out,
            &Condition {
                respident: "response1",
                value: &value,
                case_insensitive: false,
                action: "Set",
                points: "100",
            },
        );
    }

    out.push_str("  </resprocessing>\n");
    out
}

pub fn multiple_choice(input: &ItemInput<'_>) -> String {
    let choices = present_choices(input.options);
    let corrects: Vec<&str> = split_blanks(input.answer).into_iter().map(str::trim).collect();
    let correct_ids: Vec<&str> = choices
        .iter()
        .filter(|c| corrects.contains(&c.text.trim()))
        .map(|c| c.ident.as_str())
        .collect();

    let mut out = String::new();
    push_item_header(&mut out, input.ident, "multiple_answers_question");
    push_question(&mut out, input);
    push_render_choice(&mut out, "response1", Some("Multiple"), &choices);
    out.push_str("  </presentation>\n");
    push_outcomes(&mut out);

    if !correct_ids.is_empty() {
        let points = format_points(100.0 / correct_ids.len() as f64);
        for id in &correct_ids {
            push_condition(
                &mut out,
                &Condition {
                    respident: "response1",
                    value: id,
                    case_insensitive: false,
                    action: "Add",
                    points: &points,
                },
            );
        }
    }

    out.push_str("  </resprocessing>\n");
    out
}

/// Every blank offers the full option list. Only the first blank is scored;
/// existing Canvas imports depend on that output.
pub fn dropdown_cloze(input: &ItemInput<'_>, labels: LabelStyle) -> Result<String> {
    let answers = split_blanks(input.answer);
    let blanks = answers.len();
    let choices = present_choices(input.options);

    let mut out = String::new();
    push_item_header(&mut out, input.ident, "multiple_dropdowns_question");
    push_cloze_question(&mut out, input, &placeholder_line(blanks, labels)?);
    for j in 1..=blanks {
        push_render_choice(&mut out, &format!("response_q{}", j), None, &choices);
    }
    out.push_str("  </presentation>\n");
    push_outcomes(&mut out);

    let points = format_points(100.0 / blanks as f64);
    if let Some(rank) = answers.first().and_then(|a| parse_rank(a)) {
        let value = format!("opt{}", rank);
        push_condition(
            &mut out,
            &Condition {
                respident: "response_q1",
                value: &value,
                case_insensitive: false,
                action: "Add",
                points: &points,
            },
        );
    }

    out.push_str("  </resprocessing>\n");
    Ok(out)
}

pub fn text_cloze(input: &ItemInput<'_>, labels: LabelStyle) -> Result<String> {
    let answers = split_blanks(input.answer);
    let blanks = answers.len();

    let mut out = String::new();
    push_item_header(&mut out, input.ident, "fill_in_multiple_blanks_question");
    push_cloze_question(&mut out, input, &placeholder_line(blanks, labels)?);
    for j in 1..=blanks {
        out.push_str(&format!(
            "    <response_str ident=\"response_q{}\" rcardinality=\"Single\">\n",
            j
        ));
        out.push_str(&format!(
            "      <render_fib fibtype=\"String\" prompt=\"Box\" maxchars=\"{}\"/>\n",
            FIB_MAX_CHARS
        ));
        out.push_str("    </response_str>\n");
    }
    out.push_str("  </presentation>\n");
    push_outcomes(&mut out);

    let points = format_points(100.0 / blanks as f64);
    for (j, answer) in answers.iter().enumerate() {
        let respident = format!("response_q{}", j + 1);
        push_condition(
            &mut out,
            &Condition {
                respident: &respident,
                value: answer.trim(),
                case_insensitive: true,
                action: "Add",
                points: &points,
            },
        );
    }

    out.push_str("  </resprocessing>\n");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(items: &[&str]) -> Vec<Option<String>> {
        items
            .iter()
            .map(|s| if s.is_empty() { None } else { Some(s.to_string()) })
            .collect()
    }

    fn input<'a>(question: &'a Body, options: &'a [Option<String>], answer: &'a str) -> ItemInput<'a> {
        ItemInput {
            ident: "q_1",
            question,
            image: "",
            options,
            answer,
        }
    }

    #[test]
    fn single_choice_scores_ranked_option() {
        let body = Body::plain("Pick B");
        let options = opts(&["A", "B", "C"]);
        let xml = single_choice(&input(&body, &options, "2"));

        assert_eq!(xml.matches("<respcondition>").count(), 1);
        assert!(xml.contains(r#"<varequal respident="response1">opt2</varequal>"#));
        assert!(xml.contains(r#"<setvar varname="SCORE" action="Set">100</setvar>"#));
        assert!(xml.contains(r#"rcardinality="Single""#));
        assert!(xml.contains(r#"<mattext texttype="text/plain">Pick B</mattext>"#));
        assert!(xml.ends_with("</resprocessing>\n"));
        assert!(!xml.contains("</item>"));
    }

    #[test]
    fn single_choice_without_numeric_answer_has_no_rule() {
        let body = Body::plain("?");
        let options = opts(&["A", "B"]);
        for answer in ["B", "", "0", "-1"] {
            let xml = single_choice(&input(&body, &options, answer));
            assert_eq!(xml.matches("<respcondition>").count(), 0, "answer {:?}", answer);
            assert!(xml.contains("varname=\"SCORE\""));
        }
    }

    #[test]
    fn absent_options_are_skipped_without_holes() {
        let body = Body::plain("?");
        let options = opts(&["A", "", "C"]);
        let xml = single_choice(&input(&body, &options, "2"));
        assert_eq!(xml.matches("<response_label").count(), 2);
        assert!(xml.contains(r#"<response_label ident="opt2">"#));
        assert!(!xml.contains(r#"ident="opt3""#));
        assert!(xml.contains("<mattext>C</mattext>"));
    }

    #[test]
    fn html_question_is_cdata_wrapped() {
        let body = Body::html("<p>x &amp; y</p>");
        let options = opts(&["A"]);
        let xml = single_choice(&input(&body, &options, "1"));
        assert!(xml.contains(r#"<mattext texttype="text/html"><![CDATA[<p>x &amp; y</p>]]></mattext>"#));
    }

    #[test]
    fn multiple_choice_matches_by_value() {
        let body = Body::plain("Pick A and C");
        let options = opts(&["A", "B", " C "]);
        let xml = multiple_choice(&input(&body, &options, "A!#! C"));

        assert_eq!(xml.matches("<respcondition>").count(), 2);
        assert!(xml.contains(r#"<varequal respident="response1">opt1</varequal>"#));
        assert!(xml.contains(r#"<varequal respident="response1">opt3</varequal>"#));
        assert_eq!(xml.matches(r#"action="Add">50.0</setvar>"#).count(), 2);
        assert!(xml.contains(r#"rcardinality="Multiple""#));
    }

    #[test]
    fn multiple_choice_without_matches_has_no_rule() {
        let body = Body::plain("?");
        let options = opts(&["A", "B"]);
        let xml = multiple_choice(&input(&body, &options, "Z"));
        assert_eq!(xml.matches("<respcondition>").count(), 0);
    }

    #[test]
    fn dropdown_scores_only_first_blank() {
        let body = Body::plain("Fill");
        let options = opts(&["red", "green", "blue"]);
        let xml = dropdown_cloze(&input(&body, &options, "1!#!2"), LabelStyle::Numeric).unwrap();

        assert_eq!(xml.matches("<respcondition>").count(), 1);
        assert!(xml.contains(r#"<varequal respident="response_q1">opt1</varequal>"#));
        assert!(xml.contains(r#"action="Add">50.0</setvar>"#));
        assert!(xml.contains(r#"<response_lid ident="response_q2">"#));
        assert_eq!(xml.matches("<response_label").count(), 6);
        assert!(xml.contains("Fill<br/>\n1. [q1] 2. [q2]<br/>"));
    }

    #[test]
    fn text_cloze_scores_every_blank() {
        let body = Body::plain("The ___ chased the ___");
        let xml = text_cloze(&input(&body, &[], "cat!#!dog"), LabelStyle::Lower).unwrap();

        assert_eq!(xml.matches("<respcondition>").count(), 2);
        assert!(xml.contains(r#"<varequal respident="response_q1" case="no">cat</varequal>"#));
        assert!(xml.contains(r#"<varequal respident="response_q2" case="no">dog</varequal>"#));
        assert_eq!(xml.matches(r#"action="Add">50.0</setvar>"#).count(), 2);
        assert_eq!(xml.matches(r#"maxchars="60""#).count(), 2);
        assert!(xml.contains("a. [q1] b. [q2]"));
    }

    #[test]
    fn cloze_label_overflow_is_an_error() {
        let body = Body::plain("?");
        let answer = vec!["x"; 14].join("!#!");
        assert!(text_cloze(&input(&body, &[], &answer), LabelStyle::Katakana).is_err());
    }
}
