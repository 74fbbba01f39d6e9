use crate::parser::ast::Labels;
use crate::parser::lexer::{string_literal, ws};
use nom::{
    bytes::complete::tag,
    character::complete::char,
    sequence::preceded,
    IResult,
};

/// Parse chart labels
/// Format: labs(title: "Events per venue")
pub fn parse_labs(input: &str) -> IResult<&str, Labels> {
    let (input, _) = ws(tag("labs"))(input)?;
    let (input, _) = ws(char('('))(input)?;
    let (input, title) = preceded(ws(tag("title:")), ws(string_literal))(input)?;
    let (input, _) = ws(char(')'))(input)?;

    Ok((
        input,
        Labels {
            title: Some(title),
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_labs() {
        let (_, labels) = parse_labs(r#"labs(title: "Venue capacities")"#).unwrap();
        assert_eq!(labels.title, Some("Venue capacities".to_string()));
    }

    #[test]
    fn test_parse_labs_requires_title() {
        assert!(parse_labs("labs()").is_err());
    }
}
