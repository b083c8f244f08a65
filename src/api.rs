// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Typed client for the lending platform's HTTP API.
//!
//! Requests go through a [`Transport`] so the client can be exercised without
//! a server. Every response is decoded into the schemas in [`crate::models`]
//! at this boundary; a 401 anywhere tears the shared [`Session`] down.

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::errors::{ApiError, NO_PERMISSION, SESSION_EXPIRED};
use crate::forms::{BidForm, FieldErrors, RegistrationForm};
use crate::models::{
    AuthResponse, ConfirmPaymentResponse, Dashboard, Investment, InvestmentsEnvelope,
    LoginRequest, ReferralSummary, ReferrerInfo, SellShare, SellSharesEnvelope, SystemOverview,
    User,
};
use crate::session::Session;

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    /// Query pairs, percent-encoded by the transport.
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub bearer: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }
}

pub trait Transport {
    /// Perform one exchange. Only failures to get any response are errors here;
    /// HTTP error statuses come back as an [`ApiResponse`].
    fn send(&self, req: &ApiRequest) -> Result<ApiResponse, ApiError>;
}

pub struct HttpTransport {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: crate::utils::http_client(timeout)?,
        })
    }

    /// The outgoing HTTP request for `req`, without sending it.
    pub fn build_request(&self, req: &ApiRequest) -> reqwest::Result<reqwest::blocking::Request> {
        let url = format!("{}{}", self.base_url, req.path);
        let mut rb = self
            .client
            .request(req.method.clone(), url)
            .header(reqwest::header::ACCEPT, "application/json");
        if !req.query.is_empty() {
            rb = rb.query(&req.query);
        }
        if let Some(token) = &req.bearer {
            rb = rb.bearer_auth(token);
        }
        if let Some(body) = &req.body {
            rb = rb.json(body);
        }
        rb.build()
    }
}

impl Transport for HttpTransport {
    fn send(&self, req: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let request = self
            .build_request(req)
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let resp = self
            .client
            .execute(request)
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = resp.status().as_u16();
        let text = resp.text().map_err(|e| ApiError::Transport(e.to_string()))?;
        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };
        Ok(ApiResponse { status, body })
    }
}

fn error_text(body: &Value) -> Option<String> {
    ["error", "detail", "message"]
        .iter()
        .find_map(|k| body.get(*k).and_then(Value::as_str))
        .map(str::to_string)
}

/// What a 401 does beyond tearing the session down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OnUnauthorized {
    /// Fire the login-required hook.
    Redirect,
    /// A sign-in attempt: the caller reports the credentials error itself.
    Quiet,
}

fn decode<R: DeserializeOwned>(body: Value) -> Result<R, ApiError> {
    serde_json::from_value(body).map_err(|e| ApiError::Decode(e.to_string()))
}

pub struct ApiClient<T> {
    transport: T,
    session: Arc<Session>,
    retries: u32,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T, session: Arc<Session>) -> Self {
        Self {
            transport,
            session,
            retries: 0,
        }
    }

    /// Extra attempts for transport failures. HTTP errors are never retried.
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn request(&self, method: Method, path: &str) -> ApiRequest {
        ApiRequest {
            method,
            path: path.to_string(),
            query: Vec::new(),
            body: None,
            bearer: self.session.token(),
        }
    }

    fn exchange(&self, req: ApiRequest, on_401: OnUnauthorized) -> Result<Value, ApiError> {
        let mut attempt = 0;
        let resp = loop {
            match self.transport.send(&req) {
                Ok(r) => break r,
                Err(ApiError::Transport(msg)) if attempt < self.retries => {
                    attempt += 1;
                    warn!(path = %req.path, attempt, error = %msg, "transport failure; retrying");
                }
                Err(e) => return Err(e),
            }
        };
        debug!(method = %req.method, path = %req.path, status = resp.status, "api response");
        match resp.status {
            200..=299 => Ok(resp.body),
            401 => {
                let seen = req.bearer.as_deref();
                match on_401 {
                    OnUnauthorized::Redirect => self.session.invalidate(seen)?,
                    OnUnauthorized::Quiet => self.session.invalidate_quietly(seen)?,
                };
                Err(ApiError::Unauthorized(
                    error_text(&resp.body).unwrap_or_else(|| SESSION_EXPIRED.to_string()),
                ))
            }
            403 => Err(ApiError::Forbidden(
                error_text(&resp.body).unwrap_or_else(|| NO_PERMISSION.to_string()),
            )),
            404 => Err(ApiError::NotFound(
                error_text(&resp.body).unwrap_or_else(|| format!("{} not found", req.path)),
            )),
            400 => Err(ApiError::Validation(FieldErrors::from_payload(
                &resp.body,
                "Request failed. Please check your input and try again.",
            ))),
            status => Err(ApiError::Server {
                status,
                message: error_text(&resp.body).unwrap_or_else(|| "request failed".to_string()),
            }),
        }
    }

    fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        decode(self.exchange(self.request(Method::GET, path), OnUnauthorized::Redirect)?)
    }

    fn post_with<B, R>(
        &self,
        path: &str,
        body: Option<&B>,
        on_401: OnUnauthorized,
    ) -> Result<R, ApiError>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let mut req = self.request(Method::POST, path);
        req.body = body
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        decode(self.exchange(req, on_401)?)
    }

    fn post<B, R>(&self, path: &str, body: Option<&B>) -> Result<R, ApiError>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        self.post_with(path, body, OnUnauthorized::Redirect)
    }

    fn require_login(&self) -> Result<(), ApiError> {
        if self.session.is_authenticated() {
            Ok(())
        } else {
            Err(ApiError::NotAuthenticated)
        }
    }

    fn adopt(&self, auth: &AuthResponse) -> Result<(), ApiError> {
        if let Some(token) = auth.access.as_deref().filter(|t| !t.is_empty()) {
            self.session.establish(token, auth.user.clone())?;
        }
        Ok(())
    }

    pub fn login(&self, phone_number: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let req = LoginRequest {
            phone_number: phone_number.trim().to_string(),
            password: password.to_string(),
        };
        // Wrong credentials come back as 401. Any stored session is still
        // dropped, but without the session-expired notice.
        let auth: AuthResponse =
            self.post_with("/api/login/", Some(&req), OnUnauthorized::Quiet)?;
        self.adopt(&auth)?;
        Ok(auth)
    }

    /// Validates locally first; an invalid form never reaches the network.
    pub fn register(&self, form: &RegistrationForm) -> Result<AuthResponse, ApiError> {
        form.validate().map_err(ApiError::Validation)?;
        let auth: AuthResponse = self
            .post("/api/register/", Some(&form.to_request()))
            .map_err(|e| match e {
                ApiError::Server { status, message } if status < 500 => {
                    ApiError::Validation(FieldErrors::submit(message))
                }
                other => other,
            })?;
        self.adopt(&auth)?;
        Ok(auth)
    }

    pub fn verify_referral_code(&self, code: &str) -> Result<ReferrerInfo, ApiError> {
        let code = code.trim();
        if code.is_empty() {
            let mut f = FieldErrors::new();
            f.insert("referral_code", "Invalid referral code");
            return Err(ApiError::Validation(f));
        }
        let mut req = self.request(Method::GET, "/api/register/");
        req.query.push(("ref".to_string(), code.to_string()));
        decode(self.exchange(req, OnUnauthorized::Redirect)?)
    }

    /// Local only; the server keeps no session to end.
    pub fn logout(&self) -> Result<(), ApiError> {
        self.session.clear()?;
        Ok(())
    }

    /// Re-verify the stored token and refresh the stored profile.
    pub fn current_user(&self) -> Result<User, ApiError> {
        self.require_login()?;
        let user: User = self.get("/api/user/me/")?;
        self.session.update_user(user.clone())?;
        Ok(user)
    }

    pub fn dashboard(&self) -> Result<Dashboard, ApiError> {
        self.require_login()?;
        let body = self.exchange(
            self.request(Method::GET, "/api/user-dashboard/"),
            OnUnauthorized::Redirect,
        )?;
        if let Some(msg) = body.get("error").and_then(Value::as_str) {
            return Err(ApiError::Rejected(msg.to_string()));
        }
        decode(body)
    }

    pub fn place_bid(&self, form: &BidForm) -> Result<Investment, ApiError> {
        form.validate().map_err(ApiError::Validation)?;
        self.require_login()?;
        self.post("/api/investments/create/", Some(&form.to_request()))
    }

    pub fn my_investments(&self) -> Result<Vec<Investment>, ApiError> {
        self.require_login()?;
        let env: InvestmentsEnvelope = self.get("/api/my_investments/")?;
        match (env.status.as_deref(), env.data) {
            (Some("success"), Some(data)) => Ok(data),
            _ => Err(ApiError::Rejected(
                env.error
                    .unwrap_or_else(|| "Invalid data format received".to_string()),
            )),
        }
    }

    pub fn sell_shares(&self) -> Result<Vec<SellShare>, ApiError> {
        self.require_login()?;
        let env: SellSharesEnvelope = self.get("/api/sell-shares/")?;
        if let Some(msg) = env.error {
            return Err(ApiError::Rejected(msg));
        }
        Ok(env.data.unwrap_or_default())
    }

    pub fn confirm_payment(&self, id: i64) -> Result<ConfirmPaymentResponse, ApiError> {
        self.require_login()?;
        let resp: ConfirmPaymentResponse =
            self.post::<Value, _>(&format!("/api/confirm-payment/{}/", id), None)?;
        if !resp.success {
            return Err(ApiError::Rejected(
                resp.error
                    .clone()
                    .unwrap_or_else(|| "Failed to confirm payment".to_string()),
            ));
        }
        Ok(resp)
    }

    pub fn referrals(&self) -> Result<ReferralSummary, ApiError> {
        self.require_login()?;
        self.get("/api/referrals/")
    }

    /// Admin only. Non-admin sessions are refused before any request is made.
    pub fn system_overview(&self) -> Result<SystemOverview, ApiError> {
        self.require_login()?;
        if !self.session.user().is_some_and(|u| u.is_admin()) {
            return Err(ApiError::Forbidden(NO_PERMISSION.to_string()));
        }
        self.get("/api/system-overview/")
    }
}
