use crate::auth::CredentialPrompt;
use crate::config::CrawlConfig;
use crate::extract::Extractor;
use crate::http::Transport;
use crate::session::{AuthState, Credentials, Session};
use crate::Result;

/// Everything one run shares across pages: the network seam, the single session and
/// the cached credentials. Created once and passed by `&mut` through the walk.
pub struct CrawlContext {
    pub config: CrawlConfig,
    pub transport: Box<dyn Transport>,
    pub prompt: Box<dyn CredentialPrompt>,
    pub session: Session,
    pub credentials: Option<Credentials>,
    pub auth_state: AuthState,
    pub extractor: Extractor,
}

impl CrawlContext {
    pub fn new(
        config: CrawlConfig,
        transport: Box<dyn Transport>,
        prompt: Box<dyn CredentialPrompt>,
    ) -> Result<Self> {
        config.validate()?;
        let extractor = Extractor::new(&config.image_providers)?;
        Ok(Self {
            config,
            transport,
            prompt,
            session: Session::Anonymous,
            credentials: None,
            auth_state: AuthState::Anonymous,
            extractor,
        })
    }
}
