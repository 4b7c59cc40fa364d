#![forbid(unsafe_code)]

use crate::McpServer;
use crate::SessionLog;
use crate::entry::framing::{self, TransportMode};
use serde_json::Value;
use std::io::{BufRead, BufReader};

pub(crate) fn run_stdio(
    server: &mut McpServer,
    session_log: &mut SessionLog,
) -> Result<(), Box<dyn std::error::Error>> {
    let stdin = std::io::stdin();
    let mut reader = BufReader::new(stdin.lock());
    let mut stdout = std::io::stdout().lock();

    // Framing is detected once from the first nonempty line and kept for the whole
    // session, so responses never interleave styles on the same transport.
    let mut mode: Option<TransportMode> = None;

    loop {
        let mut line = String::new();
        let read = reader.read_line(&mut line)?;
        if read == 0 {
            break;
        }

        let effective = match mode {
            Some(mode) => mode,
            None => {
                let Some(detected) = framing::detect_mode_from_first_line(&line) else {
                    continue;
                };
                session_log.note_mode(
                    match detected {
                        TransportMode::NewlineJson => "newline-json",
                        TransportMode::ContentLength => "content-length",
                    },
                    &line,
                );
                mode = Some(detected);
                detected
            }
        };

        match effective {
            TransportMode::NewlineJson => {
                let raw = line.trim();
                if raw.is_empty() {
                    continue;
                }
                if let Some(resp) = respond(server, session_log, raw.as_bytes()) {
                    framing::write_newline_json(&mut stdout, &resp)?;
                }
            }
            TransportMode::ContentLength => {
                if line.trim().is_empty() {
                    continue;
                }
                let Some(body) = framing::read_content_length_frame(&mut reader, Some(line))?
                else {
                    break;
                };
                if let Some(resp) = respond(server, session_log, &body) {
                    framing::write_content_length_json(&mut stdout, &resp)?;
                }
            }
        }
    }

    session_log.note_exit("eof");
    Ok(())
}

fn respond(server: &mut McpServer, session_log: &mut SessionLog, body: &[u8]) -> Option<Value> {
    let request = match framing::parse_request(body) {
        Ok(request) => request,
        Err(resp) => return Some(resp),
    };
    session_log.note_method(&request.method);
    server.handle(request)
}
