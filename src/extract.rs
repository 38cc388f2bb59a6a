use crate::page::Page;
use crate::Result;
use regex::Regex;
use scraper::Selector;
use url::Url;

/// A downloadable resource referenced from a post body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedAsset {
    pub url: Url,
}

impl ExtractedAsset {
    /// Last path segment of the URL, as it appears in the URL.
    pub fn file_name(&self) -> Option<&str> {
        self.url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .filter(|segment| !segment.is_empty())
    }
}

pub struct Extractor {
    image_re: Regex,
    selector_post: Selector,
    selector_body: Selector,
}

impl Extractor {
    /// Builds the `src="..."` matcher for the given provider domains.
    ///
    /// Matching is textual: any http(s) URL that contains a provider domain anywhere
    /// after the scheme qualifies, CDN subdomains included. A match never leaves the
    /// quoted attribute value.
    pub fn new<S: AsRef<str>>(providers: &[S]) -> Result<Self> {
        let alternatives = providers
            .iter()
            .map(|provider| provider.as_ref().trim())
            .filter(|provider| !provider.is_empty())
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join("|");
        let image_re = Regex::new(&format!(r#"src="(https?://[^"]*?({alternatives})[^"]*)""#))?;
        Ok(Self {
            image_re,
            selector_post: Selector::parse(".post").expect("post selector"),
            selector_body: Selector::parse(".post-body-content").expect("post body selector"),
        })
    }

    /// Lazily yields image assets post by post, in document order. Duplicates are kept.
    pub fn extract<'a>(&'a self, page: &'a Page) -> impl Iterator<Item = ExtractedAsset> + 'a {
        page.document()
            .select(&self.selector_post)
            .filter_map(move |post| post.select(&self.selector_body).next())
            .flat_map(move |body| {
                let markup = body.html();
                self.image_re
                    .captures_iter(&markup)
                    .filter_map(|caps| caps.get(1))
                    // Serialized markup escapes `&` inside attribute values.
                    .filter_map(|m| Url::parse(&m.as_str().replace("&amp;", "&")).ok())
                    .map(|url| ExtractedAsset { url })
                    .collect::<Vec<_>>()
            })
    }
}
