//! Multipart form extraction
//!
//! Buffers the request body (bounded by `http.max_body_size`), splits it into
//! named parts and exposes the two uploads and the text fields.

use std::borrow::Cow;
use std::collections::HashMap;
use std::io::Cursor;

use http_body_util::{BodyExt, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderMap, CONTENT_TYPE};

use crate::error::{ProcessError, Result};

pub const TILES_FIELD: &str = "tiles";
pub const REQS_FIELD: &str = "reqs";

/// The two uploaded documents, fully buffered
#[derive(Debug, Clone)]
pub struct Uploads {
    pub tiles: Bytes,
    pub reqs: Bytes,
}

#[derive(Debug)]
struct Part {
    file_name: Option<String>,
    data: Bytes,
}

/// Parsed multipart form; the first part wins when a name repeats
#[derive(Debug, Default)]
pub struct FormData {
    parts: HashMap<String, Part>,
}

impl FormData {
    /// Both uploads, or `MissingFiles` if either is absent
    pub fn uploads(&self) -> Result<Uploads> {
        match (self.upload(TILES_FIELD), self.upload(REQS_FIELD)) {
            (Some(tiles), Some(reqs)) => Ok(Uploads { tiles, reqs }),
            _ => Err(ProcessError::MissingFiles),
        }
    }

    /// Text value of a field; `None` when the field was not sent
    pub fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        self.parts
            .get(name)
            .map(|part| String::from_utf8_lossy(&part.data))
    }

    /// A part counts as an upload if it is a file or carries any content
    fn upload(&self, name: &str) -> Option<Bytes> {
        self.parts
            .get(name)
            .filter(|part| part.file_name.is_some() || !part.data.is_empty())
            .map(|part| part.data.clone())
    }

    fn insert(&mut self, name: String, file_name: Option<String>, data: Bytes) {
        self.parts.entry(name).or_insert(Part { file_name, data });
    }

    #[cfg(test)]
    pub fn with_field(mut self, name: &str, value: &str) -> Self {
        self.insert(name.to_string(), None, Bytes::copy_from_slice(value.as_bytes()));
        self
    }
}

/// Read a `multipart/form-data` body into memory and split it into parts
pub async fn read_form<B>(headers: &HeaderMap, body: B, max_body_size: u64) -> Result<FormData>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let boundary = multer::parse_boundary(content_type)?;

    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    let body = Limited::new(body, limit)
        .collect()
        .await
        .map_err(|e| ProcessError::Body(e.to_string()))?
        .to_bytes();

    let mut multipart = multer::Multipart::with_reader(Cursor::new(body), boundary);
    let mut form = FormData::default();
    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(ToString::to_string) else {
            continue;
        };
        let file_name = field.file_name().map(ToString::to_string);
        let data = field.bytes().await?;
        form.insert(name, file_name, data);
    }

    Ok(form)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use http_body_util::Full;
    use hyper::header::HeaderValue;

    pub const BOUNDARY: &str = "----gridsvc-test-boundary";

    pub enum TestPart<'a> {
        File(&'a str, &'a [u8]),
        Text(&'a str, &'a str),
    }

    /// Encode parts as a multipart/form-data body
    pub fn multipart_body(parts: &[TestPart<'_>]) -> Vec<u8> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                TestPart::File(name, data) => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{name}.xlsx\"\r\n\
                             Content-Type: application/octet-stream\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(data);
                }
                TestPart::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                    );
                    body.extend_from_slice(value.as_bytes());
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    pub fn multipart_content_type() -> String {
        format!("multipart/form-data; boundary={BOUNDARY}")
    }

    fn multipart_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_str(&multipart_content_type()).unwrap(),
        );
        headers
    }

    async fn parse(parts: &[TestPart<'_>]) -> Result<FormData> {
        let body = Full::new(Bytes::from(multipart_body(parts)));
        read_form(&multipart_headers(), body, 1024 * 1024).await
    }

    #[tokio::test]
    async fn test_reads_uploads_and_fields() {
        let form = parse(&[
            TestPart::File("tiles", b"tile-bytes"),
            TestPart::File("reqs", b"req-bytes"),
            TestPart::Text("grids", "5"),
        ])
        .await
        .unwrap();

        let uploads = form.uploads().unwrap();
        assert_eq!(&uploads.tiles[..], b"tile-bytes");
        assert_eq!(&uploads.reqs[..], b"req-bytes");
        assert_eq!(form.field("grids").as_deref(), Some("5"));
        assert_eq!(form.field("rows"), None);
    }

    #[tokio::test]
    async fn test_missing_upload() {
        let form = parse(&[TestPart::File("tiles", b"tile-bytes")]).await.unwrap();
        assert!(matches!(form.uploads(), Err(ProcessError::MissingFiles)));

        let form = parse(&[TestPart::File("reqs", b"req-bytes")]).await.unwrap();
        assert!(matches!(form.uploads(), Err(ProcessError::MissingFiles)));
    }

    #[tokio::test]
    async fn test_empty_text_part_is_not_an_upload() {
        let form = parse(&[
            TestPart::Text("tiles", ""),
            TestPart::File("reqs", b"req-bytes"),
        ])
        .await
        .unwrap();
        assert!(matches!(form.uploads(), Err(ProcessError::MissingFiles)));
    }

    #[tokio::test]
    async fn test_empty_file_is_an_upload() {
        let form = parse(&[TestPart::File("tiles", b""), TestPart::File("reqs", b"r")])
            .await
            .unwrap();
        let uploads = form.uploads().unwrap();
        assert!(uploads.tiles.is_empty());
    }

    #[tokio::test]
    async fn test_first_part_wins() {
        let form = parse(&[TestPart::Text("seed", "1"), TestPart::Text("seed", "2")])
            .await
            .unwrap();
        assert_eq!(form.field("seed").as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn test_not_multipart() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let err = read_form(&headers, Full::new(Bytes::from("{}")), 1024)
            .await
            .unwrap_err();
        assert!(matches!(err, ProcessError::Multipart(_)));

        let err = read_form(&HeaderMap::new(), Full::new(Bytes::new()), 1024)
            .await
            .unwrap_err();
        assert!(matches!(err, ProcessError::Multipart(_)));
    }

    #[tokio::test]
    async fn test_body_too_large() {
        let body = Full::new(Bytes::from(multipart_body(&[
            TestPart::File("tiles", &[0u8; 4096]),
            TestPart::File("reqs", b"r"),
        ])));
        let err = read_form(&multipart_headers(), body, 1024).await.unwrap_err();
        assert!(matches!(err, ProcessError::Body(_)));
    }
}
