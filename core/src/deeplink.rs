//! Deep links the app is opened with.
//!
//! Two shapes are recognised, either as a bare path or as a full URL on any
//! host: `/search?term=<term>` and `/venue/<id>`. The venue id is
//! percent-decoded and must be valid UTF-8.

use percent_encoding::percent_decode_str;
use url::Url;

const PARSE_BASE: &str = "https://deeplink.invalid/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeepLink {
    Search { term: String },
    Venue { id: String },
}

impl DeepLink {
    pub fn parse(input: &str) -> Option<Self> {
        let url = match Url::parse(input) {
            Ok(url) => url,
            Err(_) => Url::parse(PARSE_BASE).ok()?.join(input).ok()?,
        };
        let segments: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [first] if first.eq_ignore_ascii_case("search") => {
                let term = url
                    .query_pairs()
                    .find(|(k, _)| k == "term")
                    .map(|(_, v)| v.into_owned())?;
                (!term.is_empty()).then_some(DeepLink::Search { term })
            }
            [first, id] if first.eq_ignore_ascii_case("venue") => {
                let id = percent_decode_str(id).decode_utf8().ok()?;
                (!id.is_empty()).then(|| DeepLink::Venue { id: id.into_owned() })
            }
            _ => None,
        }
    }
}
