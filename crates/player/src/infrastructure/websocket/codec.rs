//! Frame codec for the session socket.
//!
//! Inbound frames are either UTF-8 JSON text or gzip-compressed JSON bytes;
//! both decode to the same [`ServerMessage`]. Outbound frames are always JSON
//! text.

use std::io::Read;

use flate2::read::GzDecoder;

use tiandao_shared::{ClientMessage, ServerMessage};

/// A data frame as it arrived on the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Text(String),
    Binary(Vec<u8>),
}

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("gzip decompression failed: {0}")]
    Decompress(#[source] std::io::Error),
    #[error("decompressed payload is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("invalid message JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn decode_frame(frame: &Frame) -> Result<ServerMessage, CodecError> {
    match frame {
        Frame::Text(text) => Ok(serde_json::from_str(text)?),
        Frame::Binary(bytes) => {
            let text = gunzip_to_string(bytes)?;
            Ok(serde_json::from_str(&text)?)
        }
    }
}

fn gunzip_to_string(bytes: &[u8]) -> Result<String, CodecError> {
    let mut decoder = GzDecoder::new(bytes);
    let mut raw = Vec::new();
    decoder
        .read_to_end(&mut raw)
        .map_err(CodecError::Decompress)?;
    Ok(String::from_utf8(raw)?)
}

pub fn encode_client_message(message: &ClientMessage) -> Result<String, CodecError> {
    Ok(serde_json::to_string(message)?)
}
