#![forbid(unsafe_code)]

use crate::json_rpc_error;
use serde_json::Value;
use std::io::{BufRead, Write};

// Frames larger than this are treated as a protocol error rather than read.
const FRAME_CAP_BYTES: usize = 16 * 1024 * 1024;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TransportMode {
    NewlineJson,
    ContentLength,
}

/// Sniff the framing from the first nonempty line of the session. A JSON
/// value means newline-delimited JSON; a Content-Length or Content-Type
/// header means MCP spec framing (headers, blank line, body).
pub(crate) fn detect_mode_from_first_line(line: &str) -> Option<TransportMode> {
    let lead = line.trim_start();
    match lead.bytes().next() {
        None => None,
        Some(b'{') | Some(b'[') => Some(TransportMode::NewlineJson),
        Some(_) if is_frame_header(lead) => Some(TransportMode::ContentLength),
        Some(_) => None,
    }
}

fn is_frame_header(line: &str) -> bool {
    let lower = line.to_ascii_lowercase();
    lower.starts_with("content-length:") || lower.starts_with("content-type:")
}

fn declared_length(header_line: &str) -> Option<usize> {
    let (name, value) = header_line.trim().split_once(':')?;
    if !name.trim().eq_ignore_ascii_case("content-length") {
        return None;
    }
    value.trim().parse().ok()
}

/// Read one header-framed message body. `first_header` carries a header line
/// the caller already consumed while sniffing the transport. `Ok(None)` means
/// the peer closed the stream.
pub(crate) fn read_content_length_frame<R: BufRead>(
    reader: &mut R,
    first_header: Option<String>,
) -> std::io::Result<Option<Vec<u8>>> {
    let mut line = match first_header {
        Some(seed) => seed,
        None => {
            let mut fresh = String::new();
            if reader.read_line(&mut fresh)? == 0 {
                return Ok(None);
            }
            fresh
        }
    };

    // Headers end at the first blank line. Anything other than
    // Content-Length is read and ignored.
    let mut declared: Option<usize> = None;
    while !line.trim_end().is_empty() {
        if declared.is_none() {
            declared = declared_length(&line);
        }
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
    }

    let Some(len) = declared else {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "Missing Content-Length header",
        ));
    };
    if len > FRAME_CAP_BYTES {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "Content-Length exceeds frame cap",
        ));
    }

    let mut body = vec![0u8; len];
    reader.read_exact(&mut body)?;
    Ok(Some(body))
}

pub(crate) fn write_newline_json<W: Write>(
    writer: &mut W,
    resp: &Value,
) -> Result<(), Box<dyn std::error::Error>> {
    writeln!(writer, "{}", serde_json::to_string(resp)?)?;
    writer.flush()?;
    Ok(())
}

pub(crate) fn write_content_length_json<W: Write>(
    writer: &mut W,
    resp: &Value,
) -> Result<(), Box<dyn std::error::Error>> {
    let body = serde_json::to_vec(resp)?;
    let mut frame = format!("Content-Length: {}\r\n\r\n", body.len()).into_bytes();
    frame.extend_from_slice(&body);
    writer.write_all(&frame)?;
    writer.flush()?;
    Ok(())
}

/// Decode a request body, mapping failures onto the JSON-RPC error responses
/// the caller should send back (-32700 for bad JSON, -32600 for a JSON value
/// that is not a request).
pub(crate) fn parse_request(body: &[u8]) -> Result<crate::JsonRpcRequest, Value> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| json_rpc_error(None, -32700, &format!("Parse error: {e}")))?;

    let Some(fields) = value.as_object() else {
        return Err(json_rpc_error(None, -32600, "Invalid Request"));
    };
    let id = fields.get("id").cloned();
    if !fields.contains_key("method") {
        return Err(json_rpc_error(id, -32600, "Invalid Request"));
    }

    serde_json::from_value::<crate::JsonRpcRequest>(value)
        .map_err(|e| json_rpc_error(id, -32600, &format!("Invalid Request: {e}")))
}
