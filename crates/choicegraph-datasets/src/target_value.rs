//! Target-value s-expressions
//!
//! Training records carry gold answers in a small s-expression dialect:
//! `(list (description "The Bahamas") (description Nassau))`. Only
//! `description` entries contribute answers; entries with other heads
//! (`date`, ...) are parsed and skipped. A value without any parentheses
//! is a single answer.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char as pchar, multispace0, multispace1},
    combinator::all_consuming,
    multi::many0,
    sequence::{delimited, preceded},
    IResult,
};

use crate::DatasetError;

/// Parse a `targetValue` string into its gold answers.
pub fn parse_target_value(value: &str) -> Result<Vec<String>, DatasetError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    if !trimmed.starts_with('(') {
        return Ok(vec![trimmed.to_string()]);
    }

    all_consuming(target_value)(trimmed)
        .map(|(_, answers)| answers)
        .map_err(|_| DatasetError::TargetValue {
            value: value.to_string(),
            message: "expected `(list (description <answer>) ...)`".to_string(),
        })
}

fn target_value(input: &str) -> IResult<&str, Vec<String>> {
    alt((list_form, lone_entry))(input)
}

fn list_form(input: &str) -> IResult<&str, Vec<String>> {
    let (input, _) = pchar('(')(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = tag("list")(input)?;
    let (input, entries) = many0(preceded(multispace0, entry))(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = pchar(')')(input)?;
    let (input, _) = multispace0(input)?;
    Ok((input, entries.into_iter().flatten().collect()))
}

fn lone_entry(input: &str) -> IResult<&str, Vec<String>> {
    let (input, answer) = entry(input)?;
    let (input, _) = multispace0(input)?;
    Ok((input, answer.into_iter().collect()))
}

/// One `(head value)` pair. Only a `description` head yields an answer.
fn entry(input: &str) -> IResult<&str, Option<String>> {
    let (input, _) = pchar('(')(input)?;
    let (input, _) = multispace0(input)?;
    let (input, head) = take_while1(is_head_char)(input)?;
    let (input, _) = multispace1(input)?;
    let (input, value) = alt((quoted_value, bare_value))(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = pchar(')')(input)?;
    Ok((input, (head == "description").then_some(value)))
}

fn is_head_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

fn quoted_value(input: &str) -> IResult<&str, String> {
    let (input, text) = delimited(pchar('"'), take_while(|c| c != '"'), pchar('"'))(input)?;
    Ok((input, text.to_string()))
}

fn bare_value(input: &str) -> IResult<&str, String> {
    let (input, text) = take_while1(|c: char| c != '(' && c != ')' && c != '"')(input)?;
    Ok((input, text.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::parse_target_value;

    #[test]
    fn quoted_and_bare_descriptions_both_parse() {
        let answers =
            parse_target_value(r#"(list (description "Jazmyn Bieber") (description Jaxon))"#)
                .unwrap();
        assert_eq!(answers, vec!["Jazmyn Bieber".to_string(), "Jaxon".to_string()]);
    }

    #[test]
    fn an_empty_list_has_no_answers() {
        assert!(parse_target_value("(list)").unwrap().is_empty());
    }

    #[test]
    fn a_lone_description_needs_no_list_wrapper() {
        let answers = parse_target_value("(description Natalie)").unwrap();
        assert_eq!(answers, vec!["Natalie".to_string()]);
    }

    #[test]
    fn non_description_entries_are_skipped() {
        let answers =
            parse_target_value(r#"(list (date 2012 12 -1) (description Nassau))"#).unwrap();
        assert_eq!(answers, vec!["Nassau".to_string()]);
    }

    #[test]
    fn a_bare_value_is_a_single_answer() {
        let answers = parse_target_value("  Grand Bahama  ").unwrap();
        assert_eq!(answers, vec!["Grand Bahama".to_string()]);
    }

    #[test]
    fn blank_input_has_no_answers() {
        assert!(parse_target_value("   ").unwrap().is_empty());
    }

    #[test]
    fn unbalanced_input_is_rejected() {
        assert!(parse_target_value("(list (description Nassau)").is_err());
    }
}
