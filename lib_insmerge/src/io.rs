use nom::{IResult, Parser, character::complete::satisfy, multi::many0};

pub fn parse_whitespace(input: &str) -> IResult<&str, ()> {
    skip_whitespace(input).map(|input| (input, ()))
}

pub fn skip_whitespace(
    input: &str,
) -> std::result::Result<&str, nom::Err<nom::error::Error<&str>>> {
    many0(satisfy(is_whitespace))
        .parse(input)
        .map(|(input, _)| input)
}

pub fn is_whitespace(c: char) -> bool {
    c.is_whitespace() && !is_any_line_break(c)
}

pub fn is_any_line_break(c: char) -> bool {
    c == '\n' || c == '\r'
}

/// Removes trailing tabs and spaces, which some tools append to sequence ids.
pub fn trim_id(id: &str) -> &str {
    id.trim_end_matches(['\t', ' '])
}

/// Extracts the error kind of a failed parse.
///
/// The coordinate grammar only runs on complete lines, so incomplete input is reported as [`nom::error::ErrorKind::Eof`].
pub fn nom_error_kind(error: nom::Err<nom::error::Error<&str>>) -> nom::error::ErrorKind {
    match error {
        nom::Err::Incomplete(_) => nom::error::ErrorKind::Eof,
        nom::Err::Error(error) | nom::Err::Failure(error) => error.code,
    }
}
