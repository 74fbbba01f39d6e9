// Geometry (geom) parsers for the ChartPipe DSL

use super::ast::{Geom, MetricArg};
use super::lexer::{identifier, number_literal, string_literal, ws};
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::char,
    combinator::map,
    error::{Error, ErrorKind},
    multi::separated_list0,
    sequence::preceded,
    IResult,
};

enum BandArg {
    Metric(String),
    Color(String),
}

/// Parse the argument list shared by band geoms: repeated `metric:` entries,
/// each optionally followed by a `color:` that applies to it.
/// Format: bars(metric: events) or bars(metric: a, color: "red", metric: b)
fn parse_band_args(input: &str) -> IResult<&str, Vec<MetricArg>> {
    let (input, _) = ws(char('('))(input)?;

    let (input, args) = separated_list0(
        ws(char(',')),
        alt((
            map(preceded(ws(tag("metric:")), ws(identifier)), BandArg::Metric),
            map(preceded(ws(tag("color:")), ws(string_literal)), BandArg::Color),
        )),
    )(input)?;

    let (input, _) = ws(char(')'))(input)?;

    let mut metrics: Vec<MetricArg> = Vec::new();
    for arg in args {
        match arg {
            BandArg::Metric(name) => metrics.push(MetricArg { name, color: None }),
            BandArg::Color(c) => match metrics.last_mut() {
                Some(m) => m.color = Some(c),
                // color before any metric has nothing to attach to
                None => return Err(nom::Err::Error(Error::new(input, ErrorKind::Verify))),
            },
        }
    }

    if metrics.is_empty() {
        return Err(nom::Err::Error(Error::new(input, ErrorKind::Verify)));
    }

    Ok((input, metrics))
}

/// Parse a horizontal bar geom
pub fn parse_bars(input: &str) -> IResult<&str, Geom> {
    let (input, _) = ws(tag("bars"))(input)?;
    let (input, metrics) = parse_band_args(input)?;
    Ok((input, Geom::Bars { metrics }))
}

/// Parse a vertical bar geom
pub fn parse_columns(input: &str) -> IResult<&str, Geom> {
    let (input, _) = ws(tag("columns"))(input)?;
    let (input, metrics) = parse_band_args(input)?;
    Ok((input, Geom::Columns { metrics }))
}

/// Parse a lollipop geom
pub fn parse_lollipop(input: &str) -> IResult<&str, Geom> {
    let (input, _) = ws(tag("lollipop"))(input)?;
    let (input, metrics) = parse_band_args(input)?;
    Ok((input, Geom::Lollipop { metrics }))
}

/// Parse a bubble pack geom
/// Format: pack(metric: count) or pack(metric: count, padding: 20)
pub fn parse_pack(input: &str) -> IResult<&str, Geom> {
    let (input, _) = ws(tag("pack"))(input)?;
    let (input, _) = ws(char('('))(input)?;
    let (input, _) = ws(tag("metric:"))(input)?;
    let (input, metric) = ws(identifier)(input)?;
    let (input, padding) = nom::combinator::opt(preceded(
        ws(char(',')),
        preceded(ws(tag("padding:")), ws(number_literal)),
    ))(input)?;
    let (input, _) = ws(char(')'))(input)?;
    Ok((input, Geom::Pack { metric, padding }))
}

/// Parse any geometry
pub fn parse_geom(input: &str) -> IResult<&str, Geom> {
    alt((parse_bars, parse_columns, parse_lollipop, parse_pack))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bars_single_metric() {
        let (_, geom) = parse_bars("bars(metric: events)").unwrap();
        assert_eq!(
            geom,
            Geom::Bars {
                metrics: vec![MetricArg { name: "events".to_string(), color: None }]
            }
        );
    }

    #[test]
    fn test_parse_bars_metric_colors() {
        let (_, geom) =
            parse_bars(r#"bars(metric: events, color: "steelblue", metric: attendance)"#).unwrap();
        if let Geom::Bars { metrics } = geom {
            assert_eq!(metrics.len(), 2);
            assert_eq!(metrics[0].color.as_deref(), Some("steelblue"));
            assert_eq!(metrics[1].color, None);
        } else {
            panic!("Expected Bars geom");
        }
    }

    #[test]
    fn test_parse_bars_requires_metric() {
        assert!(parse_bars("bars()").is_err());
        assert!(parse_bars(r#"bars(color: "red")"#).is_err());
    }

    #[test]
    fn test_parse_lollipop() {
        let (_, geom) = parse_lollipop("lollipop(metric: capacity)").unwrap();
        assert!(matches!(geom, Geom::Lollipop { .. }));
    }

    #[test]
    fn test_parse_pack() {
        let (_, geom) = parse_pack("pack(metric: count, padding: 20)").unwrap();
        assert_eq!(
            geom,
            Geom::Pack {
                metric: "count".to_string(),
                padding: Some(20.0)
            }
        );
    }

    #[test]
    fn test_parse_pack_default_padding() {
        let (_, geom) = parse_pack("pack(metric: count)").unwrap();
        assert_eq!(
            geom,
            Geom::Pack {
                metric: "count".to_string(),
                padding: None
            }
        );
    }
}
