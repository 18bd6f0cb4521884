//! Response header collection and parsing.

/// Headers of the final response in a redirect chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHead {
    pub content_length: Option<u64>,
    pub content_type: Option<String>,
    /// Raw `Content-Disposition` value (filename hint).
    pub content_disposition: Option<String>,
}

/// Header callback body: stores one raw header line. A status line starts a
/// new response, so headers of earlier redirect hops are dropped.
pub(crate) fn collect_header_line(lines: &mut Vec<String>, data: &[u8]) {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    let line = s.trim_end();
    if line.starts_with("HTTP/") {
        lines.clear();
    }
    if !line.is_empty() {
        lines.push(line.to_string());
    }
}

pub(crate) fn parse_headers(lines: &[String]) -> ResponseHead {
    let mut head = ResponseHead::default();
    for line in lines {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let name = name.trim();
        let value = value.trim();
        if name.eq_ignore_ascii_case("content-length") {
            head.content_length = value.parse().ok();
        } else if name.eq_ignore_ascii_case("content-type") {
            head.content_type = Some(value.to_string());
        } else if name.eq_ignore_ascii_case("content-disposition") {
            head.content_disposition = Some(value.to_string());
        }
    }
    head
}
