use crate::config::CrawlConfig;
use crate::session::Session;
use crate::Result;
use std::io::Read;
use std::time::Duration;

pub struct HttpResponse {
    pub status: u16,
    pub body: Box<dyn Read>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Read + 'static) -> Self {
        Self {
            status,
            body: Box::new(body),
        }
    }

    /// Anything below 400 counts; redirects are followed by the transport.
    pub fn is_success(&self) -> bool {
        self.status < 400
    }

    pub fn into_text(mut self) -> std::io::Result<String> {
        let mut buf = Vec::new();
        self.body.read_to_end(&mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

impl std::fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// Network seam used by the fetcher, the authenticator and the downloader.
///
/// Implementations return error statuses as ordinary responses; only transport-level
/// failures are `Err`.
pub trait Transport {
    fn get(&self, session: &Session, url: &str) -> Result<HttpResponse>;

    /// Submits a form-encoded POST on a fresh cookie-carrying session and hands that
    /// session back together with the response.
    fn post_form(&self, url: &str, fields: &[(&str, &str)]) -> Result<(Session, HttpResponse)>;
}

#[derive(Debug, Clone)]
pub struct UreqTransport {
    user_agent: String,
    timeout: Duration,
}

impl UreqTransport {
    pub fn new(config: &CrawlConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Connecting and waiting for response headers are bounded; streaming the body is
    /// not, so large images are never cut off mid-download.
    fn build_http_agent(&self) -> ureq::Agent {
        let mut config = ureq::Agent::config_builder();
        config = config
            .http_status_as_error(false)
            .timeout_connect(Some(self.timeout))
            .timeout_recv_response(Some(self.timeout))
            .user_agent(self.user_agent.clone());
        config.build().into()
    }
}

impl Transport for UreqTransport {
    fn get(&self, session: &Session, url: &str) -> Result<HttpResponse> {
        // Anonymous requests get a throwaway agent so no cookies carry over.
        let agent = match session {
            Session::Anonymous => self.build_http_agent(),
            Session::Authenticated(agent) => agent.clone(),
        };
        let response = agent.get(url).call()?;
        let status = response.status().as_u16();
        Ok(HttpResponse::new(status, response.into_body().into_reader()))
    }

    fn post_form(&self, url: &str, fields: &[(&str, &str)]) -> Result<(Session, HttpResponse)> {
        let agent = self.build_http_agent();
        let response = agent.post(url).send_form(fields.iter().copied())?;
        let status = response.status().as_u16();
        let body = HttpResponse::new(status, response.into_body().into_reader());
        Ok((Session::Authenticated(agent), body))
    }
}
