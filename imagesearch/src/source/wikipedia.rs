//! Wikipedia image source.
//!
//! Queries the MediaWiki `allimages` list starting at the search term and
//! keeps only JPEG entries. The API answers in XML, which is walked with
//! `quick-xml` without building a DOM.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;

use super::types::{ImageSource, SearchError};
use crate::http::AsyncHttpClient;

/// Default MediaWiki API endpoint.
pub const WIKIPEDIA_API_URL: &str = "https://en.wikipedia.org/w/api.php";

/// MIME types accepted as gallery images. Everything else (audio, SVG, PNG
/// logos) is skipped by the parser.
const ACCEPTED_MIME_TYPES: &[&str] = &["image/jpg", "image/jpeg"];

/// Image source backed by the Wikipedia `allimages` API.
pub struct WikipediaSource<C: AsyncHttpClient> {
    http_client: C,
    base_url: String,
}

impl<C: AsyncHttpClient> WikipediaSource<C> {
    /// Creates a source using the public English Wikipedia endpoint.
    pub fn new(http_client: C) -> Self {
        Self::with_base_url(http_client, WIKIPEDIA_API_URL.to_string())
    }

    /// Creates a source against a custom MediaWiki endpoint.
    pub fn with_base_url(http_client: C, base_url: String) -> Self {
        Self {
            http_client,
            base_url,
        }
    }

    /// Constructs the query URL. The term is percent-encoded.
    fn build_url(&self, term: &str, limit: usize) -> String {
        format!(
            "{}?action=query&format=xml&list=allimages&aiprop=url|mime&aifrom={}&ailimit={}",
            self.base_url,
            urlencoding::encode(term),
            limit
        )
    }
}

impl<C: AsyncHttpClient> ImageSource for WikipediaSource<C> {
    async fn search(&self, term: &str, limit: usize) -> Result<Vec<String>, SearchError> {
        let url = self.build_url(term, limit);
        let body = self.http_client.get(&url).await?;
        let xml = std::str::from_utf8(&body)
            .map_err(|e| SearchError::BadResponse(format!("response is not UTF-8: {}", e)))?;

        let urls = parse_allimages(xml, limit)?;
        debug!(term = term, found = urls.len(), "Wikipedia search parsed");
        Ok(urls)
    }

    fn name(&self) -> &str {
        "Wikipedia"
    }
}

/// Extracts JPEG URLs from an `allimages` XML response, at most `limit`.
pub(crate) fn parse_allimages(xml: &str, limit: usize) -> Result<Vec<String>, SearchError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut urls = Vec::new();
    let mut saw_api_root = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Eof) => break,
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"api" => saw_api_root = true,
                b"img" => {
                    if let Some(url) = jpeg_url(e)? {
                        urls.push(url);
                        if urls.len() == limit {
                            break;
                        }
                    }
                }
                _ => {}
            },
            Ok(_) => {}
            Err(e) => {
                return Err(SearchError::BadResponse(format!(
                    "malformed XML at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
        }
        buf.clear();
    }

    if !saw_api_root {
        return Err(SearchError::BadResponse(
            "missing <api> root element".to_string(),
        ));
    }

    Ok(urls)
}

/// Returns the `url` attribute of an `<img>` element if its MIME type is JPEG.
fn jpeg_url(element: &BytesStart<'_>) -> Result<Option<String>, SearchError> {
    let mut url = None;
    let mut mime = None;

    for attr in element.attributes() {
        let attr = attr.map_err(|e| SearchError::BadResponse(e.to_string()))?;
        let value = attr
            .unescape_value()
            .map_err(|e| SearchError::BadResponse(e.to_string()))?;
        match attr.key.as_ref() {
            b"url" => url = Some(value.into_owned()),
            b"mime" => mime = Some(value.into_owned()),
            _ => {}
        }
    }

    let is_jpeg = mime
        .as_deref()
        .is_some_and(|m| ACCEPTED_MIME_TYPES.iter().any(|accepted| m.contains(accepted)));

    Ok(if is_jpeg { url } else { None })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::tests::MockAsyncHttpClient;
    use crate::http::HttpError;
    use crate::source::SearchErrorKind;

    const RESPONSE: &str = r#"<?xml version="1.0"?>
<api batchcomplete="">
  <continue aicontinue="Empire_State_Pride.png" continue="-||" />
  <query>
    <allimages>
      <img name="Empire_State_Building.jpg" url="https://upload.wikimedia.org/a/Empire_State_Building.jpg" mime="image/jpeg" />
      <img name="Empire_State_Human.ogg" url="https://upload.wikimedia.org/b/Empire_State_Human.ogg" mime="application/ogg" />
      <img name="Empire_State_logo.png" url="https://upload.wikimedia.org/c/Empire_State_logo.png" mime="image/png" />
      <img name="Empire_State_top.jpg" url="https://upload.wikimedia.org/d/Empire_State_top.jpg" mime="image/jpeg" />
      <img name="Empire&amp;Co.jpg" url="https://upload.wikimedia.org/e/Empire&amp;Co.jpg" mime="image/jpg" />
    </allimages>
  </query>
</api>"#;

    #[test]
    fn test_parse_keeps_only_jpegs() {
        let urls = parse_allimages(RESPONSE, 10).unwrap();
        assert_eq!(
            urls,
            vec![
                "https://upload.wikimedia.org/a/Empire_State_Building.jpg",
                "https://upload.wikimedia.org/d/Empire_State_top.jpg",
                "https://upload.wikimedia.org/e/Empire&Co.jpg",
            ]
        );
    }

    #[test]
    fn test_parse_respects_limit() {
        let urls = parse_allimages(RESPONSE, 1).unwrap();
        assert_eq!(urls.len(), 1);
    }

    #[test]
    fn test_parse_empty_result() {
        let xml = r#"<api batchcomplete=""><query><allimages /></query></api>"#;
        assert!(parse_allimages(xml, 5).unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_non_api_document() {
        let err = parse_allimages("<html><body>rate limited</body></html>", 5).unwrap_err();
        assert_eq!(err.kind(), SearchErrorKind::BadResponse);
    }

    #[test]
    fn test_build_url_encodes_term() {
        let source = WikipediaSource::new(MockAsyncHttpClient::ok(Vec::new()));
        let url = source.build_url("empire state & co", 26);
        assert!(url.starts_with(WIKIPEDIA_API_URL));
        assert!(url.contains("aifrom=empire%20state%20%26%20co"));
        assert!(url.contains("ailimit=26"));
        assert!(url.contains("format=xml"));
    }

    #[tokio::test]
    async fn test_search_parses_response() {
        let source = WikipediaSource::new(MockAsyncHttpClient::ok(RESPONSE));
        let urls = source.search("Empire", 2).await.unwrap();
        assert_eq!(urls.len(), 2);
        assert_eq!(source.name(), "Wikipedia");
    }

    #[tokio::test]
    async fn test_search_maps_http_failure() {
        let source = WikipediaSource::new(MockAsyncHttpClient::err(HttpError::Status {
            url: WIKIPEDIA_API_URL.to_string(),
            status: 500,
        }));
        let err = source.search("Empire", 2).await.unwrap_err();
        assert_eq!(err.kind(), SearchErrorKind::NetworkFailure);
    }
}
