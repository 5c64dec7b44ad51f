use lazy_static::lazy_static;
use nom::{
    bytes::complete::{take_till, take_till1, take_while, take_while1},
    character::complete::char,
    combinator::{all_consuming, opt, rest, verify},
    multi::{many0, separated_list1},
    sequence::{pair, preceded},
    IResult,
};
use regex::Regex;
use tracing::{debug, trace};

use crate::config::ParserConfig;
use crate::data::{Message, Tag};
use crate::error::ParseError;
use crate::escape;

lazy_static! {
    static ref TAG_KEY_REGEX: Regex =
        Regex::new(r"^\+?(?:[A-Za-z0-9\-.]+/)?[A-Za-z0-9\-]+$").unwrap();
    static ref COMMAND_REGEX: Regex = Regex::new(r"^(?:[A-Za-z]+|[0-9]{3})$").unwrap();
}

fn spaces(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c == ' ')(input)
}

fn skip_spaces(input: &str) -> &str {
    input.trim_start_matches(' ')
}

fn tag(input: &str) -> IResult<&str, (&str, Option<&str>)> {
    pair(
        take_till1(|c: char| c == '=' || c == ';'),
        opt(preceded(char('='), take_till(|c: char| c == ';'))),
    )(input)
}

fn tags(input: &str) -> IResult<&str, Vec<(&str, Option<&str>)>> {
    all_consuming(separated_list1(char(';'), tag))(input)
}

fn tag_section(input: &str) -> IResult<&str, &str> {
    preceded(char('@'), take_till(|c: char| c == ' '))(input)
}

fn prefix(input: &str) -> IResult<&str, &str> {
    preceded(char(':'), take_till(|c: char| c == ' '))(input)
}

fn command(input: &str) -> IResult<&str, &str> {
    take_till1(|c: char| c == ' ')(input)
}

fn middle(input: &str) -> IResult<&str, &str> {
    verify(take_till1(|c: char| c == ' '), |s: &str| !s.starts_with(':'))(input)
}

fn params(input: &str) -> IResult<&str, Vec<&str>> {
    let (input, mut params) = many0(preceded(spaces, middle))(input)?;
    let (input, trailing) = opt(preceded(pair(spaces, char(':')), rest))(input)?;
    let (input, _) = take_while(|c: char| c == ' ')(input)?;
    params.extend(trailing);
    Ok((input, params))
}

/// Turns single lines into [`Message`]s.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    pub fn new(config: ParserConfig) -> Self {
        Parser { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parses one line. Anything from the first CR or LF on is ignored, so
    /// the terminator is optional.
    ///
    /// Fields are owned `String`s, so the line must be UTF-8. Legacy
    /// encodings such as Latin-1 text fail with [`ParseError::InvalidUtf8`];
    /// callers carrying such traffic have to transcode before parsing.
    ///
    /// Whatever parses successfully also renders: NUL anywhere in the line
    /// and a command starting with `:` or `@` are rejected here.
    pub fn parse(&self, data: &[u8]) -> Result<Message, ParseError> {
        let result = self.parse_line(data);
        match &result {
            Ok(message) => trace!(command = %message.command, args = message.args.len(), "parsed message"),
            Err(err) => debug!(error = %err, "failed to parse message"),
        }
        result
    }

    fn parse_line(&self, data: &[u8]) -> Result<Message, ParseError> {
        let end = data
            .iter()
            .position(|&b| b == b'\r' || b == b'\n')
            .unwrap_or(data.len());
        let data = &data[..end];
        if let Some(max) = self.config.max_line_len {
            if data.len() > max {
                return Err(ParseError::LineTooLong { len: data.len(), max });
            }
        }
        let line = std::str::from_utf8(data)?;
        let mut input = line;
        let mut message = Message::new();

        if let Ok((left, section)) = tag_section(input) {
            message.tags = Some(self.parse_tags(section)?);
            input = left;
        }

        if let Some(pos) = input.find('\0') {
            return Err(ParseError::NulByte(line.len() - input.len() + pos));
        }

        input = skip_spaces(input);
        if let Ok((left, source)) = prefix(input) {
            message.prefix = Some(source.to_owned());
            input = skip_spaces(left);
        }

        let (left, name) = command(input).map_err(|_| ParseError::MissingCommand)?;
        if name.starts_with(|c: char| c == ':' || c == '@') {
            return Err(ParseError::MissingCommand);
        }
        if self.config.strict && !COMMAND_REGEX.is_match(name) {
            return Err(ParseError::InvalidCommand(name.to_owned()));
        }
        message.command = name.to_owned();

        let (left, args) = params(left).map_err(|err| ParseError::Internal(err.to_string()))?;
        if !left.is_empty() {
            return Err(ParseError::Internal(format!("unconsumed input {:?}", left)));
        }
        message.args = args.into_iter().map(str::to_owned).collect();

        Ok(message)
    }

    fn parse_tags(&self, section: &str) -> Result<Vec<Tag>, ParseError> {
        if section.contains('\0') {
            return Err(ParseError::MalformedTags(format!("NUL in {:?}", section)));
        }
        let (_, entries) = tags(section)
            .map_err(|_| ParseError::MalformedTags(format!("empty key in {:?}", section)))?;

        entries
            .into_iter()
            .map(|(key, value)| {
                if self.config.strict && !TAG_KEY_REGEX.is_match(key) {
                    return Err(ParseError::MalformedTags(format!("invalid key {:?}", key)));
                }
                Ok(Tag {
                    key: key.to_owned(),
                    value: value.map(|x| escape::unescape(x).into_owned()),
                })
            })
            .collect()
    }
}

/// Parses one line with the default configuration.
pub fn parse(data: &[u8]) -> Result<Message, ParseError> {
    Parser::default().parse(data)
}
