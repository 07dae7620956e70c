//! `--ports` parsing: a comma- or whitespace-separated port list
//! (spec §6), grounded on `original_source/source/miniircd.py`'s
//! `re.split(r"[,\s]+", options.ports)`.

use anyhow::{bail, Result};

pub fn parse_ports(spec: &str) -> Result<Vec<u16>> {
    let mut ports = Vec::new();
    for token in spec.split(|c: char| c == ',' || c.is_whitespace()) {
        if token.is_empty() {
            continue;
        }
        let port: u16 = token.parse().map_err(|_| anyhow::anyhow!("bad port: {token:?}"))?;
        ports.push(port);
    }
    if ports.is_empty() {
        bail!("no ports specified");
    }
    Ok(ports)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_separated() {
        assert_eq!(parse_ports("6667,6668").unwrap(), vec![6667, 6668]);
    }

    #[test]
    fn parses_whitespace_separated() {
        assert_eq!(parse_ports("6667 6668  6669").unwrap(), vec![6667, 6668, 6669]);
    }

    #[test]
    fn rejects_bad_port() {
        assert!(parse_ports("not-a-port").is_err());
    }

    #[test]
    fn rejects_empty_spec() {
        assert!(parse_ports("   ").is_err());
    }
}
