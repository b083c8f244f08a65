// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

#![allow(dead_code)]

use lendclip::api::{ApiClient, ApiRequest, ApiResponse, Transport};
use lendclip::errors::ApiError;
use lendclip::session::Session;
use reqwest::Method;
use rusqlite::Connection;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

type RouteKey = (Method, String);

/// Replies from a fixed table keyed by method and path; records every request.
#[derive(Default)]
pub struct FakeTransport {
    routes: Mutex<HashMap<RouteKey, ApiResponse>>,
    /// Remaining successful replies per route before it starts failing.
    budgets: Mutex<HashMap<RouteKey, usize>>,
    pub calls: Mutex<Vec<ApiRequest>>,
    pub offline: bool,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    pub fn route(self, method: Method, path: &str, status: u16, body: Value) -> Self {
        self.routes
            .lock()
            .unwrap()
            .insert((method, path.to_string()), ApiResponse::new(status, body));
        self
    }

    pub fn set(&self, method: Method, path: &str, status: u16, body: Value) {
        self.routes
            .lock()
            .unwrap()
            .insert((method, path.to_string()), ApiResponse::new(status, body));
    }

    /// Answer `n` requests on this route, then fail like a dropped connection.
    pub fn fail_after(self, method: Method, path: &str, n: usize) -> Self {
        self.budgets
            .lock()
            .unwrap()
            .insert((method, path.to_string()), n);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_call(&self) -> Option<ApiRequest> {
        self.calls.lock().unwrap().last().cloned()
    }
}

impl Transport for FakeTransport {
    fn send(&self, req: &ApiRequest) -> Result<ApiResponse, ApiError> {
        self.calls.lock().unwrap().push(req.clone());
        if self.offline {
            return Err(ApiError::Transport("connection refused".into()));
        }
        let key = (req.method.clone(), req.path.clone());
        if let Some(left) = self.budgets.lock().unwrap().get_mut(&key) {
            if *left == 0 {
                return Err(ApiError::Transport("connection reset".into()));
            }
            *left -= 1;
        }
        self.routes
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .ok_or_else(|| ApiError::Transport(format!("no route for {}", req.path)))
    }
}

pub fn store() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    lendclip::db::init_schema(&conn).unwrap();
    conn
}

pub fn session() -> Arc<Session> {
    Arc::new(Session::hydrate(store()).unwrap())
}

pub fn signed_in(token: &str, user: Value) -> Arc<Session> {
    let s = session();
    s.establish(token, Some(serde_json::from_value(user).unwrap()))
        .unwrap();
    s
}

pub fn client(transport: FakeTransport, session: Arc<Session>) -> ApiClient<FakeTransport> {
    ApiClient::new(transport, session)
}
