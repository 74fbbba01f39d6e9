// Pipeline parser for the ChartPipe DSL

use super::ast::{ChartSpec, Geom, Labels, SplitSpec, Summary};
use super::command::{parse_canvas, parse_group, parse_split, parse_summary};
use super::geom::parse_geom;
use super::labels::parse_labs;
use super::lexer::ws;
use nom::{
    branch::alt,
    bytes::complete::tag,
    combinator::{eof, map, opt},
    error::{Error, ErrorKind},
    multi::separated_list0,
    IResult,
};

#[derive(Debug)]
enum PipelineComponent {
    Group(String),
    Summary(Summary),
    Split(SplitSpec),
    Geom(Geom),
    Labels(Labels),
    Canvas(Vec<(String, f64)>),
}

fn parse_pipeline_component(input: &str) -> IResult<&str, PipelineComponent> {
    alt((
        map(parse_group, PipelineComponent::Group),
        map(parse_summary, PipelineComponent::Summary),
        map(parse_split, PipelineComponent::Split),
        map(parse_geom, PipelineComponent::Geom),
        map(parse_labs, PipelineComponent::Labels),
        map(parse_canvas, PipelineComponent::Canvas),
    ))(input)
}

/// Parse a complete chart specification
/// Format: component | component | ...
pub fn parse_chart_spec(input: &str) -> IResult<&str, ChartSpec> {
    // If input starts with "|", consume it
    let (input, _) = opt(ws(tag("|")))(input)?;

    let (input, components) = separated_list0(ws(tag("|")), parse_pipeline_component)(input)?;

    let (input, _) = ws(eof)(input)?;

    let mut group_by = None;
    let mut summaries = Vec::new();
    let mut split = None;
    let mut geoms = Vec::new();
    let mut labels = Labels::default();
    let mut canvas = Vec::new();

    for comp in components {
        match comp {
            PipelineComponent::Group(col) => group_by = Some(col),
            PipelineComponent::Summary(s) => summaries.push(s),
            PipelineComponent::Split(s) => split = Some(s),
            PipelineComponent::Geom(g) => geoms.push(g),
            PipelineComponent::Labels(l) => labels = l,
            PipelineComponent::Canvas(mut c) => canvas.append(&mut c),
        }
    }

    // Validation: exactly one group, at least one summary, exactly one geom
    let group_by = match group_by {
        Some(g) => g,
        None => return Err(nom::Err::Error(Error::new(input, ErrorKind::Verify))),
    };
    if summaries.is_empty() {
        return Err(nom::Err::Error(Error::new(input, ErrorKind::Verify)));
    }
    let geom = match geoms.pop() {
        Some(g) if geoms.is_empty() => g,
        _ => return Err(nom::Err::Error(Error::new(input, ErrorKind::Verify))),
    };

    Ok((
        input,
        ChartSpec {
            group_by,
            summaries,
            split,
            geom,
            labels,
            canvas,
        },
    ))
}
