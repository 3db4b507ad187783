use crate::Credentials;

pub(crate) fn truncate_utf8(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes.min(s.len());
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

pub(crate) fn redact_text(mut text: String, credentials: Option<&Credentials>) -> String {
    let Some(credentials) = credentials else {
        return text;
    };

    for secret in credentials.secrets() {
        if !secret.is_empty() {
            text = text.replace(secret, "<redacted>");
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_utf8_respects_char_boundaries() {
        assert_eq!(truncate_utf8("héllo", 2), "h");
        assert_eq!(truncate_utf8("hello", 10), "hello");
    }

    #[test]
    fn redact_text_hides_api_key() {
        let creds = Credentials::basic("ci-bot", "s3cret");
        let text = redact_text("token s3cret rejected".to_owned(), Some(&creds));
        assert_eq!(text, "token <redacted> rejected");
    }
}
