//! Line framing for the chat stream.
//!
//! Chat arrives from the game client as raw bytes. A garbled or oversized
//! line must never end the stream, so this codec never returns a decode
//! error: invalid UTF-8 is replaced and over-long lines are dropped.

use std::io;

use bytes::BytesMut;
use tokio_util::codec::Decoder;
use tracing::{debug, warn};

/// Newline-delimited chat lines, decoded lossily.
#[derive(Debug, Clone)]
pub struct ChatLineCodec {
    max_length: usize,
    discarding: bool,
}

impl ChatLineCodec {
    pub fn new(max_length: usize) -> Self {
        Self {
            max_length,
            discarding: false,
        }
    }
}

impl Decoder for ChatLineCodec {
    type Item = String;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            let Some(newline) = src.iter().position(|b| *b == b'\n') else {
                if src.len() > self.max_length {
                    if !self.discarding {
                        warn!("Discarding input line longer than {} bytes", self.max_length);
                    }
                    self.discarding = true;
                    src.clear();
                }
                return Ok(None);
            };

            let line = src.split_to(newline + 1);
            if self.discarding {
                // Tail of a line that was already reported
                self.discarding = false;
                continue;
            }
            if newline > self.max_length {
                warn!("Discarding input line longer than {} bytes", self.max_length);
                continue;
            }
            return Ok(Some(decode_line(&line)));
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(line) = self.decode(src)? {
            return Ok(Some(line));
        }
        if src.is_empty() || self.discarding {
            src.clear();
            self.discarding = false;
            return Ok(None);
        }
        let line = src.split();
        Ok(Some(decode_line(&line)))
    }
}

fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    let line = String::from_utf8_lossy(raw);
    if line.contains(char::REPLACEMENT_CHARACTER) {
        debug!("Replaced invalid UTF-8 in input line");
    }
    line.into_owned()
}
