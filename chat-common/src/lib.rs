//! Wire protocol shared by the chat server and client.
//!
//! Every frame is one newline-terminated line of the form
//! `CHAT/1.0 <KEYWORD>[ <field> ...]`.

mod codec;
mod command;
mod decode;
mod error;

pub use codec::{ChatCodec, DEFAULT_MAX_LINE_LENGTH};
pub use command::{ClientName, Command, GroupName, PROTOCOL_NAME, PROTOCOL_VERSION};
pub use error::{CodecError, DecodeError};
