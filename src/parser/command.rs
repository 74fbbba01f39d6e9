// Aggregation and configuration command parsers for the ChartPipe DSL

use super::ast::{SplitSpec, Summary};
use super::lexer::{identifier, number_literal, ws};
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::char,
    combinator::{map, opt},
    multi::separated_list0,
    sequence::preceded,
    IResult,
};

/// Parse a group command
/// Format: group(by: file)
pub fn parse_group(input: &str) -> IResult<&str, String> {
    let (input, _) = ws(tag("group"))(input)?;
    let (input, _) = ws(char('('))(input)?;
    let (input, _) = ws(tag("by:"))(input)?;
    let (input, col) = ws(identifier)(input)?;
    let (input, _) = ws(char(')'))(input)?;
    Ok((input, col))
}

/// Parse a count summary
/// Format: count(as: events)
pub fn parse_count(input: &str) -> IResult<&str, Summary> {
    let (input, _) = ws(tag("count"))(input)?;
    let (input, _) = ws(char('('))(input)?;
    let (input, _) = ws(tag("as:"))(input)?;
    let (input, name) = ws(identifier)(input)?;
    let (input, _) = ws(char(')'))(input)?;
    Ok((input, Summary::Count { name }))
}

/// Parse a sum summary
/// Format: sum(field: went, as: attendance)
pub fn parse_sum(input: &str) -> IResult<&str, Summary> {
    let (input, _) = ws(tag("sum"))(input)?;
    let (input, _) = ws(char('('))(input)?;
    let (input, _) = ws(tag("field:"))(input)?;
    let (input, field) = ws(identifier)(input)?;
    let (input, _) = ws(char(','))(input)?;
    let (input, _) = ws(tag("as:"))(input)?;
    let (input, name) = ws(identifier)(input)?;
    let (input, _) = ws(char(')'))(input)?;
    Ok((input, Summary::Sum { field, name }))
}

/// Parse a value (pass-through) summary
/// Format: value(field: Capacity, as: capacity)
pub fn parse_value(input: &str) -> IResult<&str, Summary> {
    let (input, _) = ws(tag("value"))(input)?;
    let (input, _) = ws(char('('))(input)?;
    let (input, _) = ws(tag("field:"))(input)?;
    let (input, field) = ws(identifier)(input)?;
    let (input, _) = ws(char(','))(input)?;
    let (input, _) = ws(tag("as:"))(input)?;
    let (input, name) = ws(identifier)(input)?;
    let (input, _) = ws(char(')'))(input)?;
    Ok((input, Summary::Value { field, name }))
}

/// Parse any summary command
pub fn parse_summary(input: &str) -> IResult<&str, Summary> {
    alt((parse_count, parse_sum, parse_value))(input)
}

/// Parse a quantile split
/// Format: split(metric: capacity) or split(metric: capacity, quantile: 0.9)
pub fn parse_split(input: &str) -> IResult<&str, SplitSpec> {
    let (input, _) = ws(tag("split"))(input)?;
    let (input, _) = ws(char('('))(input)?;
    let (input, _) = ws(tag("metric:"))(input)?;
    let (input, metric) = ws(identifier)(input)?;
    let (input, quantile) = opt(preceded(
        ws(char(',')),
        preceded(ws(tag("quantile:")), ws(number_literal)),
    ))(input)?;
    let (input, _) = ws(char(')'))(input)?;
    Ok((
        input,
        SplitSpec {
            metric,
            quantile: quantile.unwrap_or(0.9),
        },
    ))
}

/// Parse canvas overrides
/// Format: canvas(width: 700, left: 60, ...)
pub fn parse_canvas(input: &str) -> IResult<&str, Vec<(String, f64)>> {
    let (input, _) = ws(tag("canvas"))(input)?;
    let (input, _) = ws(char('('))(input)?;

    let (input, args) = separated_list0(
        ws(char(',')),
        alt((
            map(preceded(ws(tag("top:")), ws(number_literal)), |v| ("top", v)),
            map(preceded(ws(tag("right:")), ws(number_literal)), |v| ("right", v)),
            map(preceded(ws(tag("bottom:")), ws(number_literal)), |v| ("bottom", v)),
            map(preceded(ws(tag("left:")), ws(number_literal)), |v| ("left", v)),
            map(preceded(ws(tag("row_height:")), ws(number_literal)), |v| ("row_height", v)),
            map(preceded(ws(tag("width:")), ws(number_literal)), |v| ("width", v)),
            map(preceded(ws(tag("height:")), ws(number_literal)), |v| ("height", v)),
            map(preceded(ws(tag("panel_gap:")), ws(number_literal)), |v| ("panel_gap", v)),
            map(preceded(ws(tag("band_padding:")), ws(number_literal)), |v| ("band_padding", v)),
        )),
    )(input)?;

    let (input, _) = ws(char(')'))(input)?;

    Ok((
        input,
        args.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_group() {
        let (_, col) = parse_group("group(by: file)").unwrap();
        assert_eq!(col, "file");
    }

    #[test]
    fn test_parse_count() {
        let (_, s) = parse_count("count(as: events)").unwrap();
        assert_eq!(s, Summary::Count { name: "events".to_string() });
    }

    #[test]
    fn test_parse_sum() {
        let (_, s) = parse_sum("sum(field: went, as: attendance)").unwrap();
        assert_eq!(
            s,
            Summary::Sum {
                field: "went".to_string(),
                name: "attendance".to_string()
            }
        );
    }

    #[test]
    fn test_parse_value() {
        let (_, s) = parse_value("value(field: Capacity, as: capacity)").unwrap();
        assert_eq!(
            s,
            Summary::Value {
                field: "Capacity".to_string(),
                name: "capacity".to_string()
            }
        );
    }

    #[test]
    fn test_parse_split_default_quantile() {
        let (_, s) = parse_split("split(metric: capacity)").unwrap();
        assert_eq!(s.metric, "capacity");
        assert_eq!(s.quantile, 0.9);
    }

    #[test]
    fn test_parse_split_explicit_quantile() {
        let (_, s) = parse_split("split(metric: capacity, quantile: 0.75)").unwrap();
        assert_eq!(s.quantile, 0.75);
    }

    #[test]
    fn test_parse_canvas() {
        let (_, c) = parse_canvas("canvas(width: 700, left: 60)").unwrap();
        assert_eq!(c, vec![("width".to_string(), 700.0), ("left".to_string(), 60.0)]);
    }

    #[test]
    fn test_parse_canvas_unknown_key_fails() {
        assert!(parse_canvas("canvas(margin: 10)").is_err());
    }
}
