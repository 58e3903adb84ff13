//! Key-value list with message
//!
//! The text encoding shared by commit and tag objects:
//!
//! ```text
//! tree 29ff16c9c14e2652b22f8b78bb08a5a07930c147
//! parent 206941306e8a8af65b66eaaaea388a7ae24d49a0
//! author Thibault Polge <thibault@thb.lt> 1527025023 +0200
//! gpgsig -----BEGIN PGP SIGNATURE-----
//!  continuation lines start with a single space
//!  -----END PGP SIGNATURE-----
//!
//! Commit message
//! ```
//!
//! Headers keep the order in which their key first appeared; repeated keys (e.g. the
//! `parent` lines of a merge) collect their values in order. The message is stored
//! under the empty key.
//!
//! Values and the message are kept as raw bytes, so bodies in a non-UTF-8 `encoding`
//! survive a read/write cycle. Only keys must be UTF-8.

use crate::errors::GitError;
use bytes::Bytes;
use std::borrow::Cow;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Kvlm {
    headers: Vec<(String, Vec<Vec<u8>>)>,
    message: Vec<u8>,
}

impl Kvlm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value to `key`, keeping any value already stored there
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<Vec<u8>>) {
        let key = key.into();
        let value = value.into();

        if key.is_empty() {
            self.message = value;
            return;
        }

        match self.headers.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => self.headers.push((key, vec![value])),
        }
    }

    pub fn set_message(&mut self, message: impl Into<Vec<u8>>) {
        self.message = message.into();
    }

    /// The message, with invalid UTF-8 replaced
    pub fn message(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.message)
    }

    /// Every value stored under `key`, empty when the key is absent
    ///
    /// The empty key yields the message. Invalid UTF-8 is replaced.
    pub fn get_value(&self, key: &str) -> Vec<String> {
        if key.is_empty() {
            return vec![self.message().into_owned()];
        }

        self.headers
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, values)| {
                values
                    .iter()
                    .map(|value| String::from_utf8_lossy(value).into_owned())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn headers(&self) -> impl Iterator<Item = (&str, &[Vec<u8>])> {
        self.headers.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn parse(raw: &[u8]) -> anyhow::Result<Self> {
        let mut kvlm = Kvlm::new();
        Self::parse_from(raw, 0, &mut kvlm)?;
        Ok(kvlm)
    }

    fn parse_from(raw: &[u8], start: usize, kvlm: &mut Kvlm) -> anyhow::Result<()> {
        let space = find_from(raw, start, b' ');
        let newline = find_from(raw, start, b'\n');

        let (space, newline) = match (space, newline) {
            (Some(space), Some(newline)) if space < newline => (space, newline),
            // a blank line (or no header left): the rest is the message
            _ => {
                let message = raw.get(start + 1..).unwrap_or_default();
                kvlm.set_message(message);
                return Ok(());
            }
        };

        let key = std::str::from_utf8(&raw[start..space])
            .map_err(|_| GitError::malformed("kvlm", "header key is not UTF-8"))?
            .to_string();

        // the value ends at the first newline not followed by a space
        let mut end = newline;
        while raw.get(end + 1) == Some(&b' ') {
            end = find_from(raw, end + 1, b'\n').ok_or_else(|| {
                GitError::malformed("kvlm", format!("unterminated value for key {key:?}"))
            })?;
        }

        kvlm.push(key, unescape(&raw[space + 1..end]));

        Self::parse_from(raw, end + 1, kvlm)
    }

    pub fn serialize(&self) -> Bytes {
        let mut out = Vec::new();

        for (key, values) in &self.headers {
            for value in values {
                out.extend_from_slice(key.as_bytes());
                out.push(b' ');
                escape_into(value, &mut out);
                out.push(b'\n');
            }
        }

        out.push(b'\n');
        out.extend_from_slice(&self.message);

        Bytes::from(out)
    }
}

fn find_from(raw: &[u8], start: usize, needle: u8) -> Option<usize> {
    raw.get(start..)?
        .iter()
        .position(|&b| b == needle)
        .map(|offset| start + offset)
}

/// Drop the space that starts every continuation line
fn unescape(value: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(value.len());
    let mut bytes = value.iter().copied().peekable();

    while let Some(byte) = bytes.next() {
        out.push(byte);
        if byte == b'\n' && bytes.peek() == Some(&b' ') {
            bytes.next();
        }
    }

    out
}

fn escape_into(value: &[u8], out: &mut Vec<u8>) {
    for &byte in value {
        out.push(byte);
        if byte == b'\n' {
            out.push(b' ');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    const SAMPLE: &[u8] = b"tree deadbeef\nparent cafebabe\nauthor A <a@x> 0 +0000\ncommitter A <a@x> 0 +0000\n\nInitial commit\n";

    #[test]
    fn parses_headers_and_message() {
        let kvlm = Kvlm::parse(SAMPLE).unwrap();

        assert_eq!(kvlm.get_value("tree"), vec!["deadbeef"]);
        assert_eq!(kvlm.get_value("parent"), vec!["cafebabe"]);
        assert_eq!(kvlm.get_value("author"), vec!["A <a@x> 0 +0000"]);
        assert_eq!(kvlm.get_value("committer"), vec!["A <a@x> 0 +0000"]);
        assert_eq!(kvlm.get_value(""), vec!["Initial commit\n"]);
        assert!(kvlm.get_value("missing").is_empty());
    }

    #[test]
    fn reserializes_sample_byte_for_byte() {
        let kvlm = Kvlm::parse(SAMPLE).unwrap();
        assert_eq!(kvlm.serialize().as_ref(), SAMPLE);
    }

    #[test]
    fn keeps_header_insertion_order() {
        let kvlm = Kvlm::parse(SAMPLE).unwrap();
        let keys = kvlm.headers().map(|(k, _)| k).collect::<Vec<_>>();
        assert_eq!(keys, vec!["tree", "parent", "author", "committer"]);
    }

    #[test]
    fn repeated_keys_append_values() {
        let raw = b"tree t\nparent p1\nparent p2\n\nmerge\n";
        let kvlm = Kvlm::parse(raw).unwrap();

        assert_eq!(kvlm.get_value("parent"), vec!["p1", "p2"]);
        assert_eq!(kvlm.serialize().as_ref(), raw);
    }

    #[test]
    fn unescapes_continuation_lines() {
        let raw = b"tree t\ngpgsig -----BEGIN-----\n line one\n -----END-----\n\nsigned\n";
        let kvlm = Kvlm::parse(raw).unwrap();

        assert_eq!(
            kvlm.get_value("gpgsig"),
            vec!["-----BEGIN-----\nline one\n-----END-----"]
        );
        assert_eq!(kvlm.serialize().as_ref(), raw);
    }

    #[test]
    fn rejects_unterminated_continuation() {
        let err = Kvlm::parse(b"key value\n more").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GitError>(),
            Some(GitError::MalformedObject { kind: "kvlm", .. })
        ));
    }

    #[test]
    fn keeps_non_utf8_bodies_byte_for_byte() {
        let raw = b"tree t\nencoding ISO-8859-1\nauthor Jos\xe9 <j@x> 0 +0000\n\ncaf\xe9\n";
        let kvlm = Kvlm::parse(raw).unwrap();

        assert_eq!(kvlm.get_value("encoding"), vec!["ISO-8859-1"]);
        assert_eq!(kvlm.message(), "caf\u{fffd}\n");
        assert_eq!(kvlm.serialize().as_ref(), raw);
    }

    #[test]
    fn builds_from_scratch() {
        let mut kvlm = Kvlm::new();
        kvlm.push("object", "abc");
        kvlm.push("type", "commit");
        kvlm.set_message("hello\n");

        assert_eq!(kvlm.serialize().as_ref(), b"object abc\ntype commit\n\nhello\n");
    }

    proptest! {
        #[test]
        fn round_trips_well_formed_input(
            headers in proptest::collection::vec(("[a-z]{1,8}", "[ -~]{0,20}(\n[ -~]{1,20}){0,2}"), 0..6),
            message in "[ -~\n]{0,40}",
        ) {
            let mut kvlm = Kvlm::new();
            for (key, value) in &headers {
                kvlm.push(key.clone(), value.clone());
            }
            kvlm.set_message(message);

            let parsed = Kvlm::parse(&kvlm.serialize()).unwrap();
            prop_assert_eq!(parsed, kvlm);
        }
    }
}
