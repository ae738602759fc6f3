//! `multipart/form-data` bodies (RFC 7578), built in memory.
//!
//! # Design
//! A `FormWriter` accumulates parts into a buffer. The only way to get
//! something sendable out of it is `close`, which consumes the writer,
//! appends the terminating boundary and returns a `FormBody` carrying the
//! matching `Content-Type`. A body missing its terminator therefore cannot
//! reach the wire.

use std::io::{self, Write};

use tracing::trace;
use uuid::Uuid;

/// Builder for a multipart body. See the module docs.
#[derive(Debug)]
pub struct FormWriter {
    boundary: String,
    buf: Vec<u8>,
}

/// A finalized multipart body and its `Content-Type` header value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormBody {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Writes the content of one file part. Obtained from
/// [`FormWriter::create_form_file`].
#[derive(Debug)]
pub struct PartWriter<'a> {
    buf: &'a mut Vec<u8>,
}

impl Write for PartWriter<'_> {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Default for FormWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl FormWriter {
    /// A writer with a freshly generated boundary.
    pub fn new() -> Self {
        Self::with_boundary(Uuid::new_v4().simple().to_string())
    }

    /// A writer using `boundary` verbatim. The caller must make sure it does
    /// not occur in any part content.
    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            buf: Vec::new(),
        }
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// `multipart/form-data; boundary=...` for this writer.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Start a file part and return a writer for its content.
    pub fn create_form_file(&mut self, field: &str, filename: &str) -> PartWriter<'_> {
        trace!(field, filename, "multipart file part");
        self.begin_part(&format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
             Content-Type: application/octet-stream\r\n",
            escape_quotes(field),
            escape_quotes(filename)
        ));
        PartWriter { buf: &mut self.buf }
    }

    /// Add a plain text field.
    pub fn write_field(&mut self, name: &str, value: &str) {
        trace!(name, "multipart text part");
        self.begin_part(&format!(
            "Content-Disposition: form-data; name=\"{}\"\r\n",
            escape_quotes(name)
        ));
        self.buf.extend_from_slice(value.as_bytes());
    }

    /// Finish the body with the closing boundary.
    pub fn close(mut self) -> FormBody {
        let content_type = self.content_type();
        if !self.buf.is_empty() {
            self.buf.extend_from_slice(b"\r\n");
        }
        self.buf.extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        FormBody {
            content_type,
            bytes: self.buf,
        }
    }

    fn begin_part(&mut self, headers: &str) {
        if !self.buf.is_empty() {
            self.buf.extend_from_slice(b"\r\n");
        }
        self.buf.extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
        self.buf.extend_from_slice(headers.as_bytes());
        self.buf.extend_from_slice(b"\r\n");
    }
}

fn escape_quotes(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_file_part_layout() {
        let mut form = FormWriter::with_boundary("XyZ");
        form.create_form_file("media", "a.txt")
            .write_all(b"hello")
            .unwrap();
        let body = form.close();

        assert_eq!(body.content_type, "multipart/form-data; boundary=XyZ");
        let expected = "--XyZ\r\n\
            Content-Disposition: form-data; name=\"media\"; filename=\"a.txt\"\r\n\
            Content-Type: application/octet-stream\r\n\
            \r\n\
            hello\r\n\
            --XyZ--\r\n";
        assert_eq!(String::from_utf8(body.bytes).unwrap(), expected);
    }

    #[test]
    fn text_field_and_file() {
        let mut form = FormWriter::with_boundary("b");
        form.write_field("kind", "image");
        form.create_form_file("f", "x.bin").write_all(&[0, 1, 2]).unwrap();
        let body = form.close();
        let text = String::from_utf8_lossy(&body.bytes);
        assert!(text.starts_with("--b\r\nContent-Disposition: form-data; name=\"kind\"\r\n\r\nimage\r\n--b\r\n"));
        assert!(body.bytes.ends_with(b"\x00\x01\x02\r\n--b--\r\n"));
    }

    #[test]
    fn empty_form_is_just_terminator() {
        let body = FormWriter::with_boundary("b").close();
        assert_eq!(body.bytes, b"--b--\r\n");
    }

    #[test]
    fn quotes_are_escaped() {
        let mut form = FormWriter::with_boundary("b");
        form.create_form_file("we\"ird", "C:\\dir\\\"q\".txt");
        let text = String::from_utf8(form.close().bytes).unwrap();
        assert!(text.contains(r#"name="we\"ird"; filename="C:\\dir\\\"q\".txt""#), "{text}");
    }

    #[test]
    fn generated_boundaries_are_unique() {
        let a = FormWriter::new();
        let b = FormWriter::new();
        assert_ne!(a.boundary(), b.boundary());
        assert_eq!(a.boundary().len(), 32);
        assert_eq!(a.content_type(), format!("multipart/form-data; boundary={}", a.boundary()));
    }
}
