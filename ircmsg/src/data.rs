use std::io::Write;
use std::str::FromStr;
use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ParseError, SerializeError};
use crate::escape;
use crate::wire::Parser;

/// A message handed to several consumers at once.
pub type SharedMessage = Arc<Message>;

#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Tag {
    pub key: String,
    pub value: Option<String>,
}

impl Tag {
    pub fn new<K, V>(key: K, value: Option<V>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Tag {
            key: key.into(),
            value: value.map(Into::into),
        }
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<(), SerializeError> {
        let reserved = |c: char| matches!(c, '=' | ';' | ' ') || is_line_break(c);
        if self.key.is_empty() || self.key.contains(reserved) {
            return Err(SerializeError::InvalidTagKey(self.key.clone()));
        }
        if self.value.as_deref().map_or(false, |value| value.contains('\0')) {
            return Err(SerializeError::InvalidTagValue(self.key.clone()));
        }
        writer.write_all(self.key.as_bytes())?;
        if let Some(value) = &self.value {
            writer.write_all(b"=")?;
            writer.write_all(escape::escape(value).as_bytes())?;
        }
        Ok(())
    }
}

/// Borrowed view of a `nick!user@host` prefix.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Prefix<'a> {
    pub nickname: &'a str,
    pub user: Option<&'a str>,
    pub host: Option<&'a str>,
}

impl<'a> Prefix<'a> {
    /// Splits a prefix. Server names come back as a bare `nickname`.
    pub fn parse(prefix: &'a str) -> Option<Self> {
        lazy_static! {
            static ref PREFIX_REGEX: Regex =
                Regex::new(r"^(?P<nickname>[^!@ ]+)(?:(?:!(?P<user>[^@ ]+))?@(?P<host>[^ ]+))?$")
                    .unwrap();
        }

        let capture = PREFIX_REGEX.captures(prefix)?;
        Some(Prefix {
            nickname: capture.name("nickname")?.as_str(),
            user: capture.name("user").map(|x| x.as_str()),
            host: capture.name("host").map(|x| x.as_str()),
        })
    }
}

/// One IRC line in structured form.
///
/// `tags` is `None` when the line carried no tag section at all, which is
/// distinct from `Some(vec![])`.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Message {
    pub tags: Option<Vec<Tag>>,
    pub prefix: Option<String>,
    pub command: String,
    pub args: Vec<String>,
}

impl Message {
    /// An empty message, to be populated by [`Message::parse_into`] or the
    /// builder methods.
    pub fn new() -> Self {
        Message::default()
    }

    pub fn parse(data: &[u8]) -> Result<Self, ParseError> {
        Parser::default().parse(data)
    }

    /// Resets `self` and fills it from `data`.
    ///
    /// On error the message holds no useful content and should be dropped.
    pub fn parse_into(&mut self, data: &[u8]) -> Result<(), ParseError> {
        *self = Message::default();
        *self = Message::parse(data)?;
        Ok(())
    }

    pub fn into_shared(self) -> SharedMessage {
        Arc::new(self)
    }

    pub fn with_tag<K, V>(mut self, key: K, value: Option<V>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.tags.get_or_insert_with(Vec::new).push(Tag::new(key, value));
        self
    }

    pub fn with_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_command<S: Into<String>>(mut self, command: S) -> Self {
        self.command = command.into();
        self
    }

    pub fn with_arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn has_tags(&self) -> bool {
        self.tags.is_some()
    }

    pub fn tags_len(&self) -> usize {
        self.tags.as_ref().map_or(0, Vec::len)
    }

    pub fn args_len(&self) -> usize {
        self.args.len()
    }

    /// First tag with the given key. Duplicate keys are kept in wire order.
    pub fn tag(&self, key: &str) -> Option<&Tag> {
        self.tags.as_ref()?.iter().find(|tag| tag.key == key)
    }

    pub fn source(&self) -> Option<Prefix<'_>> {
        self.prefix.as_deref().and_then(Prefix::parse)
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<(), SerializeError> {
        if let Some(tags) = self.tags.as_ref().filter(|tags| !tags.is_empty()) {
            let mut first = true;
            for tag in tags {
                writer.write_all(if first { b"@" } else { b";" })?;
                tag.write_to(&mut writer)?;
                first = false;
            }
            writer.write_all(b" ")?;
        }
        if let Some(prefix) = &self.prefix {
            if prefix.contains(|c: char| c == ' ' || is_line_break(c)) {
                return Err(SerializeError::InvalidPrefix(prefix.clone()));
            }
            writer.write_all(b":")?;
            writer.write_all(prefix.as_bytes())?;
            writer.write_all(b" ")?;
        }

        if self.command.is_empty() {
            return Err(SerializeError::MissingCommand);
        }
        if self.command.starts_with(|c: char| c == ':' || c == '@')
            || self.command.contains(|c: char| c == ' ' || is_line_break(c))
        {
            return Err(SerializeError::InvalidCommand(self.command.clone()));
        }
        writer.write_all(self.command.as_bytes())?;

        let last = self.args.len().saturating_sub(1);
        for (index, arg) in self.args.iter().enumerate() {
            let invalid = || SerializeError::InvalidArgument {
                index,
                value: arg.clone(),
            };
            if arg.contains(is_line_break) {
                return Err(invalid());
            }
            let spaced = arg.is_empty() || arg.contains(' ') || arg.starts_with(':');
            if spaced && index != last {
                return Err(invalid());
            }
            let trailing = index == last && (spaced || arg.starts_with('@'));
            writer.write_all(if trailing { &b" :"[..] } else { &b" "[..] })?;
            writer.write_all(arg.as_bytes())?;
        }
        writer.write_all(b"\r\n")?;
        Ok(())
    }

    /// The canonical wire form, CR LF included.
    pub fn render(&self) -> Result<Vec<u8>, SerializeError> {
        let mut ret = vec![];
        self.write_to(&mut ret).map_err(|err| {
            debug!(command = %self.command, error = %err, "failed to render message");
            err
        })?;
        Ok(ret)
    }

    pub fn to_line(&self) -> Result<String, SerializeError> {
        Ok(String::from_utf8(self.render()?)?)
    }
}

fn is_line_break(c: char) -> bool {
    matches!(c, '\r' | '\n' | '\0')
}

impl FromStr for Message {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Message::parse(s.as_bytes())
    }
}

impl TryFrom<&Message> for Vec<u8> {
    type Error = SerializeError;

    fn try_from(value: &Message) -> Result<Self, Self::Error> {
        value.render()
    }
}
