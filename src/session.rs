// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The signed-in identity shared by every request.
//!
//! State lives behind one mutex and its persisted copy behind another; the
//! state lock is always taken first. Writes are last-writer-wins.

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

use crate::models::User;

#[derive(Debug, Clone, PartialEq)]
struct SessionState {
    token: String,
    user: Option<User>,
}

type RedirectHook = Box<dyn Fn() + Send + Sync>;

pub struct Session {
    state: Mutex<Option<SessionState>>,
    store: Mutex<Connection>,
    on_login_required: Mutex<Option<RedirectHook>>,
}

fn guard<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Session {
    /// Load whatever identity was persisted by a previous run.
    pub fn hydrate(conn: Connection) -> rusqlite::Result<Self> {
        let row: Option<(String, Option<String>)> = conn
            .query_row(
                "SELECT token, user_json FROM session WHERE id = 1",
                [],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .optional()?;
        let state = row.map(|(token, user_json)| {
            let user = user_json.and_then(|j| match serde_json::from_str::<User>(&j) {
                Ok(u) => Some(u),
                Err(e) => {
                    warn!(error = %e, "stored user is unreadable; keeping token only");
                    None
                }
            });
            SessionState { token, user }
        });
        debug!(authenticated = state.is_some(), "session hydrated");
        Ok(Self {
            state: Mutex::new(state),
            store: Mutex::new(conn),
            on_login_required: Mutex::new(None),
        })
    }

    /// Called once each time a 401 tears the session down.
    pub fn set_login_redirect<F>(&self, hook: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        *guard(&self.on_login_required) = Some(Box::new(hook));
    }

    pub fn token(&self) -> Option<String> {
        guard(&self.state).as_ref().map(|s| s.token.clone())
    }

    pub fn user(&self) -> Option<User> {
        guard(&self.state).as_ref().and_then(|s| s.user.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        guard(&self.state).is_some()
    }

    pub fn establish(&self, token: &str, user: Option<User>) -> rusqlite::Result<()> {
        let mut state = guard(&self.state);
        persist(&guard(&self.store), token, user.as_ref())?;
        *state = Some(SessionState {
            token: token.to_string(),
            user,
        });
        info!("session established");
        Ok(())
    }

    /// Replace the stored profile without touching the token.
    pub fn update_user(&self, user: User) -> rusqlite::Result<()> {
        let mut state = guard(&self.state);
        let Some(current) = state.as_mut() else {
            return Ok(());
        };
        persist(&guard(&self.store), &current.token, Some(&user))?;
        current.user = Some(user);
        Ok(())
    }

    pub fn clear(&self) -> rusqlite::Result<()> {
        let mut state = guard(&self.state);
        guard(&self.store).execute("DELETE FROM session", [])?;
        *state = None;
        info!("session cleared");
        Ok(())
    }

    /// Tear down after a 401 on a request that carried `seen_token`.
    ///
    /// Only the first caller holding the current token clears it; later
    /// callers (concurrent requests with the same stale token) see it gone.
    /// Returns whether this call tore the session down.
    pub fn invalidate(&self, seen_token: Option<&str>) -> rusqlite::Result<bool> {
        let torn_down = self.tear_down(seen_token)?;
        if torn_down {
            if let Some(hook) = guard(&self.on_login_required).as_ref() {
                hook();
            }
        }
        Ok(torn_down)
    }

    /// As [`Session::invalidate`], without the login-required hook.
    pub fn invalidate_quietly(&self, seen_token: Option<&str>) -> rusqlite::Result<bool> {
        self.tear_down(seen_token)
    }

    fn tear_down(&self, seen_token: Option<&str>) -> rusqlite::Result<bool> {
        let mut state = guard(&self.state);
        match (state.as_ref(), seen_token) {
            (Some(cur), Some(seen)) if cur.token == seen => {
                guard(&self.store).execute("DELETE FROM session", [])?;
                *state = None;
                warn!("session rejected by server; login required");
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Run `f` against the backing store, e.g. to read settings.
    pub fn with_store<R>(&self, f: impl FnOnce(&Connection) -> R) -> R {
        f(&guard(&self.store))
    }
}

fn persist(conn: &Connection, token: &str, user: Option<&User>) -> rusqlite::Result<()> {
    let user_json = user
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
    let saved_at: DateTime<Utc> = Utc::now();
    conn.execute(
        "INSERT INTO session(id, token, user_json, saved_at) VALUES (1, ?1, ?2, ?3)
         ON CONFLICT(id) DO UPDATE SET
            token=excluded.token, user_json=excluded.user_json, saved_at=excluded.saved_at",
        params![token, user_json, saved_at],
    )?;
    Ok(())
}
