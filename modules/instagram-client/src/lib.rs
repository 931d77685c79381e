pub mod error;
pub mod types;

pub use error::{InstagramError, Result};
pub use types::{ClipShare, DirectItem, DirectThread, LoggedInUser, ITEM_TYPE_CLIP};

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use serde::de::DeserializeOwned;
use types::{InboxResponse, LoginPayload, LoginResponse, StatusResponse};
use uuid::Uuid;

const BASE_URL: &str = "https://i.instagram.com/api/v1";

/// Android app identity the private API expects.
const APP_USER_AGENT: &str = "Instagram 269.0.0.18.75 Android (26/8.0.0; 480dpi; 1080x1920; \
     OnePlus; 6T Dev; devitron; qcom; en_US; 314665256)";
const APP_ID: &str = "567067343352427";

/// Threads fetched per inbox page.
const INBOX_PAGE_SIZE: usize = 20;
/// Items included per thread in an inbox page.
const THREAD_MESSAGE_LIMIT: usize = 10;

/// Authenticated Instagram Direct session.
///
/// Built by [`InstagramClient::login`]; every other call reuses the session
/// cookies and the bearer token handed out at login.
pub struct InstagramClient {
    http: reqwest::Client,
    authorization: Option<String>,
    device_uuid: String,
    user: LoggedInUser,
    max_threads: usize,
}

impl InstagramClient {
    /// Log in with username and password.
    pub async fn login(username: &str, password: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .default_headers(app_headers())
            .build()?;

        let device_uuid = Uuid::new_v4().to_string();
        let phone_id = Uuid::new_v4().to_string();
        let device_id = android_device_id(&device_uuid);

        let payload = LoginPayload {
            username,
            enc_password: format!(
                "#PWD_INSTAGRAM:0:{}:{}",
                chrono::Utc::now().timestamp(),
                password
            ),
            device_id: &device_id,
            guid: &device_uuid,
            phone_id: &phone_id,
            login_attempt_count: "0",
        };
        let signed_body = format!("SIGNATURE.{}", serde_json::to_string(&payload)?);

        tracing::info!(username, "Logging into Instagram");

        let url = format!("{}/accounts/login/", BASE_URL);
        let resp = http
            .post(&url)
            .form(&[("signed_body", signed_body.as_str())])
            .send()
            .await?;

        let authorization = resp
            .headers()
            .get("ig-set-authorization")
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        let status = resp.status();
        let body = resp.text().await?;
        let login: LoginResponse = serde_json::from_str(&body).map_err(|_| InstagramError::Api {
            status: status.as_u16(),
            message: body.clone(),
        })?;

        if login.two_factor_required.unwrap_or(false) {
            return Err(InstagramError::LoginFailed(
                "two-factor authentication required".to_string(),
            ));
        }

        let user = match login.logged_in_user {
            Some(user) if status.is_success() && login.status.as_deref() != Some("fail") => user,
            _ => {
                return Err(InstagramError::LoginFailed(
                    login.message.unwrap_or_else(|| format!("status {}", status)),
                ))
            }
        };

        tracing::info!(user_id = %user.pk, username = %user.username, "Logged into Instagram");

        Ok(Self {
            http,
            authorization,
            device_uuid,
            user,
            max_threads: INBOX_PAGE_SIZE,
        })
    }

    /// Cap on how many threads [`direct_threads`](Self::direct_threads) returns.
    pub fn with_max_threads(mut self, max_threads: usize) -> Self {
        self.max_threads = max_threads.max(1);
        self
    }

    /// The logged-in account's numeric id.
    pub fn user_id(&self) -> &str {
        &self.user.pk
    }

    /// List inbox threads, newest activity first, up to the configured cap.
    pub async fn direct_threads(&self) -> Result<Vec<DirectThread>> {
        let mut threads = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut url = format!(
                "{}/direct_v2/inbox/?visual_message_return_type=unseen&persistentBadging=true\
                 &thread_message_limit={}&limit={}",
                BASE_URL, THREAD_MESSAGE_LIMIT, INBOX_PAGE_SIZE
            );
            if let Some(ref c) = cursor {
                url.push_str("&direction=older&cursor=");
                url.push_str(c);
            }

            let page: InboxResponse = self.get_json(&url).await?;
            threads.extend(page.inbox.threads);

            if threads.len() >= self.max_threads || !page.inbox.has_older {
                break;
            }
            match page.inbox.oldest_cursor {
                Some(c) => cursor = Some(c),
                None => break,
            }
        }

        threads.truncate(self.max_threads);
        tracing::debug!(count = threads.len(), "Fetched Direct threads");
        Ok(threads)
    }

    /// Send `text` into a thread, quoting `reply_to` when given.
    pub async fn direct_send(
        &self,
        thread_id: &str,
        text: &str,
        reply_to: Option<&DirectItem>,
    ) -> Result<()> {
        let client_context = Uuid::new_v4().to_string();
        let thread_ids = format!("[{}]", thread_id);

        let mut form: Vec<(&str, &str)> = vec![
            ("action", "send_item"),
            ("is_shh_mode", "0"),
            ("send_attribution", "direct_thread"),
            ("thread_ids", thread_ids.as_str()),
            ("text", text),
            ("client_context", client_context.as_str()),
            ("mutation_token", client_context.as_str()),
            ("offline_threading_id", client_context.as_str()),
            ("_uuid", self.device_uuid.as_str()),
        ];

        if let Some(item) = reply_to {
            form.push(("replied_to_action_source", "swipe"));
            form.push(("replied_to_item_id", item.item_id.as_str()));
            if let Some(ref ctx) = item.client_context {
                form.push(("replied_to_client_context", ctx.as_str()));
            }
        }

        let url = format!("{}/direct_v2/threads/broadcast/text/", BASE_URL);
        self.post_form(&url, &form).await
    }

    /// Mark an item in a thread as seen.
    pub async fn direct_message_seen(&self, thread_id: &str, item_id: &str) -> Result<()> {
        let client_context = Uuid::new_v4().to_string();
        let form = [
            ("thread_id", thread_id),
            ("action", "mark_seen"),
            ("client_context", client_context.as_str()),
            ("offline_threading_id", client_context.as_str()),
            ("_uuid", self.device_uuid.as_str()),
            ("use_unified_inbox", "true"),
        ];

        let url = format!(
            "{}/direct_v2/threads/{}/items/{}/seen/",
            BASE_URL, thread_id, item_id
        );
        self.post_form(&url, &form).await
    }

    fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(value) = self
            .authorization
            .as_deref()
            .and_then(|a| HeaderValue::from_str(a).ok())
        {
            headers.insert(AUTHORIZATION, value);
        }
        headers.insert(
            "ig-u-ds-user-id",
            HeaderValue::from_str(&self.user.pk).unwrap_or(HeaderValue::from_static("0")),
        );
        headers
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let resp = self
            .http
            .get(url)
            .headers(self.auth_headers())
            .send()
            .await?;

        let resp = error_for_status(resp).await?;
        Ok(resp.json().await?)
    }

    async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<()> {
        let resp = self
            .http
            .post(url)
            .headers(self.auth_headers())
            .form(form)
            .send()
            .await?;

        let status = resp.status();
        let resp = error_for_status(resp).await?;
        let body: StatusResponse = resp.json().await?;
        if !body.is_ok() {
            return Err(InstagramError::Api {
                status: status.as_u16(),
                message: body.message.unwrap_or_else(|| "request not accepted".to_string()),
            });
        }
        Ok(())
    }
}

fn app_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(APP_USER_AGENT));
    headers.insert("x-ig-app-id", HeaderValue::from_static(APP_ID));
    headers.insert("x-ig-capabilities", HeaderValue::from_static("3brTv10="));
    headers.insert("x-ig-connection-type", HeaderValue::from_static("WIFI"));
    headers.insert("accept-language", HeaderValue::from_static("en-US"));
    headers
}

/// Derive the `android-<16 hex>` device id from the session uuid.
fn android_device_id(device_uuid: &str) -> String {
    let hex: String = device_uuid.chars().filter(|c| *c != '-').take(16).collect();
    format!("android-{}", hex)
}

async fn error_for_status(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(InstagramError::Api {
        status: status.as_u16(),
        message: body,
    })
}
