//! Numeric reply line formatting (spec §4.3 "Reply framing"), grounded on
//! `original_source/source/connected_client.py::reply`.
//!
//! The reference implementation hardcodes a one-letter server-name
//! placeholder in this method; the specification is explicit that the
//! real server name belongs in the prefix, so that's what we emit here.

/// Build `:<server> <NNN> <param1> <param2> … :<trailing>`.
///
/// Each parameter is trimmed of trailing whitespace; `None` renders as
/// `*`. `trailing` is omitted entirely when empty.
pub fn format_reply(server_name: &str, code: u16, params: &[Option<&str>], trailing: Option<&str>) -> String {
    let mut message = format!(":{server_name} {code:03}");
    for parameter in params {
        match parameter {
            Some(value) => message.push_str(&format!(" {}", value.trim_end())),
            None => message.push_str(" *"),
        }
    }
    if let Some(trailing) = trailing {
        let trimmed = trailing.trim_end();
        if !trimmed.is_empty() {
            message.push_str(&format!(" :{trimmed}"));
        }
    }
    message
}

/// Strip embedded CR/LF and append the line terminator (spec §4.3).
pub fn normalize_outbound_line(line: &str) -> String {
    let mut sanitized: String = line.chars().filter(|c| *c != '\r' && *c != '\n').collect();
    sanitized.push_str("\r\n");
    sanitized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_basic_reply() {
        let line = format_reply("plaza", 1, &[Some("bob")], Some("Welcome"));
        assert_eq!(line, ":plaza 001 bob :Welcome");
    }

    #[test]
    fn zero_pads_code() {
        let line = format_reply("plaza", 4, &[], None);
        assert_eq!(line, ":plaza 004");
    }

    #[test]
    fn renders_none_param_as_star() {
        let line = format_reply("plaza", 433, &[None, Some("bob")], Some("Nickname already in use"));
        assert_eq!(line, ":plaza 433 * bob :Nickname already in use");
    }

    #[test]
    fn omits_empty_trailing() {
        let line = format_reply("plaza", 221, &[Some("bob")], Some(""));
        assert_eq!(line, ":plaza 221 bob");
    }

    #[test]
    fn normalize_strips_embedded_crlf_and_appends_one() {
        let line = normalize_outbound_line("hello\r\nworld\n");
        assert_eq!(line, "helloworld\r\n");
    }
}
