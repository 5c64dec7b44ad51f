//! Parsing and serialization of single IRC protocol lines, IRCv3 message tags
//! included.
//!
//! ```
//! use ircmsg::Message;
//!
//! let message = ircmsg::parse(b"@time=0000 :prefix COMMAND Arg\r\n").unwrap();
//! assert_eq!(message.prefix.as_deref(), Some("prefix"));
//! assert_eq!(message.tag("time").and_then(|t| t.value.as_deref()), Some("0000"));
//!
//! let reply = Message::new().with_command("PRIVMSG").with_arg("#chan").with_arg("hello there");
//! assert_eq!(reply.render().unwrap(), b"PRIVMSG #chan :hello there\r\n");
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod escape;
pub mod wire;

pub use crate::config::ParserConfig;
pub use crate::data::{Message, Prefix, SharedMessage, Tag};
pub use crate::error::{ErrorKind, ParseError, SerializeError};
pub use crate::wire::{parse, Parser};
