use std::io;

use bytes::{BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder, LinesCodec, LinesCodecError};

use crate::{Command, CodecError, DecodeError};

pub const DEFAULT_MAX_LINE_LENGTH: usize = 4096;

/// Frames [`Command`]s as newline-terminated lines.
///
/// Decoding yields `Result<Command, DecodeError>` items so a bad line is
/// reported in-band and the stream keeps going. Only I/O failures surface
/// through the codec's error type. Over-long and non-UTF-8 lines are
/// reported as [`DecodeError::MalformedFrame`] and reading resumes after the
/// next newline.
#[derive(Debug)]
pub struct ChatCodec {
    lines: LinesCodec,
}

impl ChatCodec {
    pub fn new() -> Self {
        Self::with_max_length(DEFAULT_MAX_LINE_LENGTH)
    }

    pub fn with_max_length(max_length: usize) -> Self {
        Self {
            lines: LinesCodec::new_with_max_length(max_length),
        }
    }

    fn lift(
        result: Result<Option<String>, LinesCodecError>,
    ) -> Result<Option<Result<Command, DecodeError>>, CodecError> {
        match result {
            Ok(Some(line)) => Ok(Some(line.parse())),
            Ok(None) => Ok(None),
            Err(LinesCodecError::MaxLineLengthExceeded) => Ok(Some(Err(
                DecodeError::MalformedFrame("line exceeds maximum length"),
            ))),
            Err(LinesCodecError::Io(e)) if e.kind() == io::ErrorKind::InvalidData => Ok(Some(
                Err(DecodeError::MalformedFrame("line is not valid UTF-8")),
            )),
            Err(LinesCodecError::Io(e)) => Err(CodecError::Io(e)),
        }
    }
}

impl Default for ChatCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for ChatCodec {
    type Item = Result<Command, DecodeError>;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        Self::lift(self.lines.decode(src))
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        Self::lift(self.lines.decode_eof(src))
    }
}

impl<'a> Encoder<&'a Command> for ChatCodec {
    type Error = CodecError;

    fn encode(&mut self, command: &'a Command, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let line = command.encode();
        dst.reserve(line.len());
        dst.put_slice(line.as_bytes());
        Ok(())
    }
}

impl Encoder<Command> for ChatCodec {
    type Error = CodecError;

    fn encode(&mut self, command: Command, dst: &mut BytesMut) -> Result<(), Self::Error> {
        <Self as Encoder<&Command>>::encode(self, &command, dst)
    }
}
