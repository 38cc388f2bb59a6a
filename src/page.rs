//! Parsed forum page and the fixed markup schema the crawler relies on.
//!
//! Thread title: `.topic-title`. Login form: `form#login` with hidden `redirect`,
//! `sid` and `login` inputs. Pagination: `ul.pagination > li.pagination-next > a[href]`.

use crate::{CrawlError, Result};
use scraper::{ElementRef, Html, Selector};
use url::Url;

pub struct Page {
    url: String,
    document: Html,
}

/// The login form's submit target plus its hidden anti-CSRF/session fields, verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginForm {
    pub action: String,
    pub redirect: String,
    pub sid: String,
    pub login: String,
}

impl Page {
    pub fn parse(url: impl Into<String>, markup: &str) -> Self {
        Self {
            url: url.into(),
            document: Html::parse_document(markup),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn document(&self) -> &Html {
        &self.document
    }

    pub fn has_login_form(&self) -> bool {
        self.login_form_element().is_some()
    }

    pub fn login_form(&self) -> Result<Option<LoginForm>> {
        let Some(form) = self.login_form_element() else {
            return Ok(None);
        };
        let action = form
            .value()
            .attr("action")
            .ok_or_else(|| CrawlError::structural(&self.url, "form#login[action]"))?;
        Ok(Some(LoginForm {
            action: action.to_string(),
            redirect: self.hidden_input(&form, "redirect")?,
            sid: self.hidden_input(&form, "sid")?,
            login: self.hidden_input(&form, "login")?,
        }))
    }

    pub fn thread_title(&self) -> Result<String> {
        let selector = Selector::parse(".topic-title").expect("topic title selector");
        let title = self
            .document
            .select(&selector)
            .next()
            .ok_or_else(|| CrawlError::structural(&self.url, ".topic-title"))?;
        Ok(element_text(&title))
    }

    /// `Ok(None)` means the thread has no further pages.
    pub fn next_page_href(&self) -> Result<Option<String>> {
        let selector_pagination = Selector::parse("ul.pagination").expect("pagination selector");
        let selector_next = Selector::parse("li.pagination-next").expect("next item selector");
        let selector_anchor = Selector::parse("a[href]").expect("anchor selector");

        let pagination = self
            .document
            .select(&selector_pagination)
            .next()
            .ok_or_else(|| CrawlError::structural(&self.url, "ul.pagination"))?;
        let Some(next_item) = pagination.select(&selector_next).next() else {
            return Ok(None);
        };
        let href = next_item
            .select(&selector_anchor)
            .next()
            .and_then(|a| a.value().attr("href"))
            .ok_or_else(|| CrawlError::structural(&self.url, "li.pagination-next a[href]"))?;
        Ok(Some(href.to_string()))
    }

    fn login_form_element(&self) -> Option<ElementRef<'_>> {
        let selector = Selector::parse("form#login").expect("login form selector");
        self.document.select(&selector).next()
    }

    fn hidden_input(&self, form: &ElementRef<'_>, name: &str) -> Result<String> {
        let selector = Selector::parse(&format!("input[name=\"{name}\"]"))
            .map_err(|_| CrawlError::structural(&self.url, name))?;
        form.select(&selector)
            .next()
            .and_then(|input| input.value().attr("value"))
            .map(str::to_string)
            .ok_or_else(|| CrawlError::structural(&self.url, &format!("form#login input[name={name}]")))
    }
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page").field("url", &self.url).finish_non_exhaustive()
    }
}

pub fn normalize_http_url(value: &str) -> Result<Url> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CrawlError::InvalidUrl("empty URL provided".to_string()));
    }
    let parsed = Url::parse(trimmed)
        .map_err(|e| CrawlError::InvalidUrl(format!("{trimmed} ({e})")))?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(CrawlError::InvalidUrl(format!(
                "unsupported URL scheme {other} for {trimmed}; only http/https are allowed"
            )));
        }
    }
    if parsed.host_str().is_none() {
        return Err(CrawlError::InvalidUrl(format!("URL is missing host: {trimmed}")));
    }
    Ok(parsed)
}

/// Forum hrefs are relative to the site root (`./viewtopic.php?...`), so they are
/// appended to `scheme://host[:port]/` after stripping leading dots and slashes.
/// Hrefs that are already absolute http(s) URLs are kept as they are.
pub fn resolve_against_host(page_url: &str, href: &str) -> Result<String> {
    let href = href.trim();
    if let Ok(absolute) = Url::parse(href) {
        if matches!(absolute.scheme(), "http" | "https") {
            return Ok(absolute.to_string());
        }
    }
    let base = normalize_http_url(page_url)?;
    let origin = base.origin().ascii_serialization();
    let path = href.trim_start_matches(['.', '/']);
    Ok(format!("{origin}/{path}"))
}

fn element_text(el: &ElementRef<'_>) -> String {
    el.text().collect::<Vec<_>>().join(" ").trim().to_string()
}
