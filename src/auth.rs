//! Login handshake for forums that hide content from anonymous visitors.

use crate::context::CrawlContext;
use crate::page::{resolve_against_host, Page};
use crate::session::{AuthState, Credentials};
use crate::{CrawlError, Result};
use dialoguer::{Input, Password};
use tracing::{debug, error, info};

pub trait CredentialPrompt {
    fn prompt(&mut self, url: &str) -> Result<Credentials>;
}

/// Reads a username and a masked password from the controlling terminal.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl CredentialPrompt for TerminalPrompt {
    fn prompt(&mut self, url: &str) -> Result<Credentials> {
        let scheme = url.split("://").next().unwrap_or("http");
        println!("This page requires an account with sufficient access.");
        println!("Enter your credentials (scheme is \"{scheme}\")");
        let username: String = Input::new()
            .with_prompt("Username")
            .interact_text()
            .map_err(|e| CrawlError::Prompt(e.to_string()))?;
        let password = Password::new()
            .with_prompt("Password")
            .interact()
            .map_err(|e| CrawlError::Prompt(e.to_string()))?;
        Ok(Credentials { username, password })
    }
}

/// Logs in when `page` carries the login form, otherwise returns `page` untouched.
///
/// On success the authenticated session replaces `ctx.session` and the post-login page
/// is returned in place of `page`. A failed login is logged and the original page comes
/// back. Each call submits the form at most once. After the first successful login,
/// login forms are ignored for the rest of the run.
pub fn maybe_login(ctx: &mut CrawlContext, page: Page) -> Result<Page> {
    if !page.has_login_form() {
        return Ok(page);
    }
    if ctx.auth_state == AuthState::Authenticated {
        debug!(url = page.url(), "login form present but session already authenticated");
        return Ok(page);
    }
    let Some(form) = page.login_form()? else {
        return Ok(page);
    };

    ctx.auth_state = AuthState::AwaitingCredentials;
    let credentials = match ctx.credentials.clone() {
        Some(cached) => cached,
        None => match ctx.prompt.prompt(page.url()) {
            Ok(entered) => {
                ctx.credentials = Some(entered.clone());
                entered
            }
            Err(err) => {
                error!(url = page.url(), error = %err, "could not log in");
                ctx.auth_state = AuthState::LoginFailed;
                return Ok(page);
            }
        },
    };

    let login_url = resolve_against_host(page.url(), &form.action)?;
    let fields: [(&str, &str); 5] = [
        ("username", credentials.username.as_str()),
        ("password", credentials.password.as_str()),
        ("redirect", form.redirect.as_str()),
        ("sid", form.sid.as_str()),
        ("login", form.login.as_str()),
    ];

    match submit_login(ctx, &login_url, &fields, page.url()) {
        Ok((session, landed)) => {
            info!(url = page.url(), "logged in");
            ctx.session = session;
            ctx.auth_state = AuthState::Authenticated;
            Ok(landed)
        }
        Err(err) => {
            error!(url = page.url(), error = %err, "could not log in");
            ctx.auth_state = AuthState::LoginFailed;
            Ok(page)
        }
    }
}

fn submit_login(
    ctx: &CrawlContext,
    login_url: &str,
    fields: &[(&str, &str)],
    page_url: &str,
) -> Result<(crate::session::Session, Page)> {
    let login_failed = |reason: String| CrawlError::LoginFailed {
        url: login_url.to_string(),
        reason,
    };

    let (session, response) = ctx
        .transport
        .post_form(login_url, fields)
        .map_err(|e| login_failed(e.to_string()))?;
    let markup = response
        .into_text()
        .map_err(|e| login_failed(e.to_string()))?;

    // The login endpoint answers 200 either way; only the form's absence means success.
    let landed = Page::parse(page_url, &markup);
    if landed.has_login_form() {
        return Err(login_failed("login form still present after submission".to_string()));
    }
    Ok((session, landed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CrawlConfig;
    use crate::http::{HttpResponse, Transport};
    use crate::session::Session;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    const LOGIN_PAGE: &str = r#"
      <form id="login" action="./ucp.php?mode=login">
        <input type="hidden" name="redirect" value="./viewtopic.php?t=1" />
        <input type="hidden" name="sid" value="s3ss10n" />
        <input type="submit" name="login" value="Login" />
      </form>
    "#;

    #[derive(Default)]
    struct Recorded {
        posts: RefCell<Vec<(String, Vec<(String, String)>)>>,
        prompts: Cell<u32>,
    }

    struct LoginTransport {
        accept: bool,
        recorded: Rc<Recorded>,
    }

    impl Transport for LoginTransport {
        fn get(&self, _session: &Session, _url: &str) -> Result<HttpResponse> {
            unreachable!("auth only posts")
        }

        fn post_form(&self, url: &str, fields: &[(&str, &str)]) -> Result<(Session, HttpResponse)> {
            self.recorded.posts.borrow_mut().push((
                url.to_string(),
                fields
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            ));
            let body = if self.accept {
                "<div class=\"post\">members only</div>".to_string()
            } else {
                LOGIN_PAGE.to_string()
            };
            Ok((
                Session::Authenticated(ureq::Agent::new_with_defaults()),
                HttpResponse::new(200, std::io::Cursor::new(body.into_bytes())),
            ))
        }
    }

    struct FixedPrompt(Rc<Recorded>);

    impl CredentialPrompt for FixedPrompt {
        fn prompt(&mut self, _url: &str) -> Result<Credentials> {
            self.0.prompts.set(self.0.prompts.get() + 1);
            Ok(Credentials::new("alice", "hunter2"))
        }
    }

    fn context(accept: bool) -> (CrawlContext, Rc<Recorded>) {
        let recorded = Rc::new(Recorded::default());
        let transport = LoginTransport {
            accept,
            recorded: recorded.clone(),
        };
        let ctx = CrawlContext::new(
            CrawlConfig::default(),
            Box::new(transport),
            Box::new(FixedPrompt(recorded.clone())),
        )
        .expect("context");
        (ctx, recorded)
    }

    fn login_page() -> Page {
        Page::parse("https://forum.test/viewtopic.php?t=1", LOGIN_PAGE)
    }

    #[test]
    fn page_without_form_passes_through() {
        let (mut ctx, recorded) = context(true);
        let page = Page::parse("https://forum.test/t", "<p>public</p>");
        let out = maybe_login(&mut ctx, page).expect("login");
        assert_eq!(out.url(), "https://forum.test/t");
        assert!(recorded.posts.borrow().is_empty());
        assert_eq!(ctx.auth_state, AuthState::Anonymous);
        assert!(!ctx.session.is_authenticated());
    }

    #[test]
    fn successful_login_returns_post_login_page_and_upgrades_session() {
        let (mut ctx, recorded) = context(true);
        let out = maybe_login(&mut ctx, login_page()).expect("login");

        assert!(!out.has_login_form());
        assert!(out.document().html().contains("members only"));
        assert_eq!(ctx.auth_state, AuthState::Authenticated);
        assert!(ctx.session.is_authenticated());

        let posts = recorded.posts.borrow();
        assert_eq!(posts.len(), 1);
        let (url, fields) = &posts[0];
        assert_eq!(url, "https://forum.test/ucp.php?mode=login");
        let expected: Vec<(String, String)> = [
            ("username", "alice"),
            ("password", "hunter2"),
            ("redirect", "./viewtopic.php?t=1"),
            ("sid", "s3ss10n"),
            ("login", "Login"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        assert_eq!(fields, &expected);
    }

    #[test]
    fn authenticated_session_ignores_later_login_forms() {
        let (mut ctx, recorded) = context(true);
        maybe_login(&mut ctx, login_page()).expect("first login");
        let again = maybe_login(&mut ctx, login_page()).expect("second call");

        assert!(again.has_login_form());
        assert_eq!(recorded.posts.borrow().len(), 1);
        assert_eq!(recorded.prompts.get(), 1);
    }

    struct UnavailablePrompt;

    impl CredentialPrompt for UnavailablePrompt {
        fn prompt(&mut self, _url: &str) -> Result<Credentials> {
            Err(CrawlError::Prompt("not a terminal".to_string()))
        }
    }

    #[test]
    fn prompt_failure_is_logged_and_walk_keeps_original_page() {
        let recorded = Rc::new(Recorded::default());
        let transport = LoginTransport {
            accept: true,
            recorded: recorded.clone(),
        };
        let mut ctx = CrawlContext::new(
            CrawlConfig::default(),
            Box::new(transport),
            Box::new(UnavailablePrompt),
        )
        .expect("context");

        let out = maybe_login(&mut ctx, login_page()).expect("prompt errors are not fatal");
        assert!(out.has_login_form());
        assert_eq!(ctx.auth_state, AuthState::LoginFailed);
        assert!(ctx.credentials.is_none());
        assert!(!ctx.session.is_authenticated());
        assert!(recorded.posts.borrow().is_empty());
    }

    #[test]
    fn failed_login_falls_back_and_submits_once_per_call() {
        let (mut ctx, recorded) = context(false);

        let first = maybe_login(&mut ctx, login_page()).expect("first call");
        assert!(first.has_login_form());
        assert_eq!(ctx.auth_state, AuthState::LoginFailed);
        assert!(!ctx.session.is_authenticated());

        maybe_login(&mut ctx, login_page()).expect("second call");
        assert_eq!(recorded.posts.borrow().len(), 2);
        // Credentials are cached after the first prompt.
        assert_eq!(recorded.prompts.get(), 1);
    }
}
