//! Grammar of a coordinate line of a map file.
//!
//! ```text
//! START DELIM ... '-' PRE_END ... '>' INSERTION_POINT ... 'v' POST_END ...
//! ```
//!
//! `DELIM` is the first upper-case letter of the line.
//! Between a number and the next secondary delimiter (`-`, `>`, `v`) any text is skipped,
//! and whitespace is allowed before each number.

use nom::{
    IResult, Parser,
    bytes::complete::take_till,
    character::complete::{char, digit1, satisfy},
    combinator::map_res,
    sequence::preceded,
};

use crate::io::{nom_error_kind, parse_whitespace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coordinates {
    pub pre_start: usize,
    pub pre_end: usize,
    pub insertion_point: usize,
    pub post_end: usize,
}

pub fn parse_coordinate_line(line: &str) -> Result<Coordinates, nom::error::ErrorKind> {
    parse_coordinates(line)
        .map(|(_, coordinates)| coordinates)
        .map_err(nom_error_kind)
}

fn parse_coordinates(input: &str) -> IResult<&str, Coordinates> {
    let (input, pre_start) = preceded(parse_whitespace, parse_number).parse(input)?;
    let (input, _) = preceded(
        parse_whitespace,
        satisfy(|c: char| c.is_ascii_uppercase()),
    )
    .parse(input)?;
    let (input, pre_end) = parse_delimited_number(input, '-')?;
    let (input, insertion_point) = parse_delimited_number(input, '>')?;
    let (input, post_end) = parse_delimited_number(input, 'v')?;

    Ok((
        input,
        Coordinates {
            pre_start,
            pre_end,
            insertion_point,
            post_end,
        },
    ))
}

fn parse_delimited_number(input: &str, delimiter: char) -> IResult<&str, usize> {
    preceded(
        (
            take_till(|c: char| c == delimiter),
            char(delimiter),
            parse_whitespace,
        ),
        parse_number,
    )
    .parse(input)
}

fn parse_number(input: &str) -> IResult<&str, usize> {
    map_res(digit1, str::parse::<usize>).parse(input)
}
