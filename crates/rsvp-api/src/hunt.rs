//! The easter-egg hunt.
//!
//! Discovery and recording are two separate calls: `claim-secret` only
//! reveals the flag behind a browser action, and nothing is stored until the
//! player hands that flag back through `submit`.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use rsvp_db::{Database, FlagWrite};
use rsvp_types::api::{
    ClaimSecretRequest, ClaimSecretResponse, ConsolationResponse, EasterEggResponse,
    ProgressResponse, SubmitFlagRequest, SubmitFlagResponse,
};
use rsvp_types::hunt::{FLAG_CONSOLATION, FLAG_HTTP_MASTER, Secret, SecretBook};
use rsvp_types::models::{HuntResult, HuntState};

use crate::auth::AppState;
use crate::error::{ApiError, run_blocking};

const LEADERBOARD_SIZE: u32 = 10;

#[derive(Debug)]
pub enum Submission {
    Recorded { total: usize, complete: bool },
    /// Unknown flag. Nothing was written.
    Consolation,
}

#[derive(Debug)]
pub enum Leaderboard {
    Ranking(Vec<HuntResult>),
    EasterEgg,
}

pub struct HuntEngine {
    secrets: SecretBook,
}

impl HuntEngine {
    pub fn new(secrets: SecretBook) -> Self {
        Self { secrets }
    }

    pub fn secrets(&self) -> &SecretBook {
        &self.secrets
    }

    /// Reveal the flag behind `action`. Never touches storage.
    pub fn claim_secret(&self, action: &str, nickname: &str) -> Result<&Secret, ApiError> {
        match self.secrets.reveal(action) {
            Some(secret) => {
                debug!("'{}' revealed {} via {}", nickname, secret.flag, action);
                Ok(secret)
            }
            None => {
                warn!("'{}' claimed unknown action '{}'", nickname, action);
                Err(ApiError::InvalidAction)
            }
        }
    }

    pub fn submit_flag(
        &self,
        db: &Database,
        nickname: &str,
        flag: &str,
        now: DateTime<Utc>,
    ) -> Result<Submission, ApiError> {
        if nickname.trim().is_empty() {
            return Err(ApiError::MissingNickname);
        }

        if !self.secrets.is_known(flag) {
            info!("'{}' submitted unknown flag '{}'", nickname, flag);
            return Ok(Submission::Consolation);
        }

        match db.record_flag(nickname, flag, now)? {
            FlagWrite::Duplicate { total } => {
                debug!("'{}' resubmitted {} (total {})", nickname, flag, total);
                Err(ApiError::DuplicateSubmission)
            }
            FlagWrite::Recorded { found } => {
                let total = found.len();
                let complete = self.secrets.state_of(Some(found.as_slice())) == HuntState::Complete;
                info!("'{}' recorded {} (total {}, complete: {})", nickname, flag, total, complete);
                Ok(Submission::Recorded { total, complete })
            }
        }
    }

    /// GET reads the ranking. Any other verb earns the HTTP flag and skips
    /// storage entirely.
    pub fn leaderboard(&self, db: &Database, method: &Method) -> Result<Leaderboard, ApiError> {
        if !is_read(method) {
            info!("Leaderboard hit with {}, handing out {}", method, FLAG_HTTP_MASTER);
            return Ok(Leaderboard::EasterEgg);
        }

        let ranking = db
            .get_leaderboard(LEADERBOARD_SIZE)?
            .into_iter()
            .map(|row| row.into_result())
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(Leaderboard::Ranking(ranking))
    }

    pub fn progress(&self, db: &Database, nickname: &str) -> Result<ProgressResponse, ApiError> {
        let found = db.get_hunt_result(nickname)?.map(|r| r.found_flags);
        let state = self.secrets.state_of(found.as_deref());
        let found_flags = found.unwrap_or_default();

        Ok(ProgressResponse {
            nickname: nickname.to_string(),
            state,
            total: found_flags.len(),
            found_flags,
        })
    }
}

fn is_read(method: &Method) -> bool {
    *method == Method::GET || *method == Method::HEAD
}

fn easter_egg() -> EasterEggResponse {
    EasterEggResponse {
        is_easter: true,
        flag: FLAG_HTTP_MASTER.to_string(),
        message: "You are not supposed to talk to the leaderboard like that. Take this flag.".into(),
    }
}

// -- Handlers --

/// POST /api/hunt/claim-secret
pub async fn claim_secret(
    State(state): State<AppState>,
    payload: Result<Json<ClaimSecretRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let action = req.action.unwrap_or_default();
    let nickname = req.nickname.unwrap_or_else(|| "Anonymous".into());

    let secret = state.hunt.claim_secret(&action, &nickname)?;

    Ok(Json(ClaimSecretResponse {
        success: true,
        flag: secret.flag.to_string(),
        message: secret.message.to_string(),
    }))
}

/// POST /api/hunt/submit
pub async fn submit_flag(
    State(state): State<AppState>,
    payload: Result<Json<SubmitFlagRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = payload?;
    let nickname = req.nickname.unwrap_or_default();
    let flag = req.flag.unwrap_or_default();

    let st = state.clone();
    let outcome =
        run_blocking(move || st.hunt.submit_flag(&st.db, &nickname, &flag, Utc::now())).await?;

    let response = match outcome {
        Submission::Recorded { total, complete } => Json(SubmitFlagResponse {
            success: true,
            message: format!("Flag accepted! You have found {} so far.", total),
            total,
            complete,
        })
        .into_response(),
        Submission::Consolation => (
            StatusCode::BAD_REQUEST,
            Json(ConsolationResponse {
                success: false,
                is_mistake: true,
                flag: FLAG_CONSOLATION.to_string(),
                message: "That flag is not one of ours, but nice try. Have this one instead.".into(),
            }),
        )
            .into_response(),
    };

    Ok(response)
}

/// ANY /api/hunt/leaderboard
pub async fn leaderboard(
    State(state): State<AppState>,
    method: Method,
) -> Result<Response, ApiError> {
    let st = state.clone();
    let board = run_blocking(move || st.hunt.leaderboard(&st.db, &method)).await?;

    Ok(match board {
        Leaderboard::Ranking(results) => Json(results).into_response(),
        Leaderboard::EasterEgg => Json(easter_egg()).into_response(),
    })
}

/// GET /api/hunt/progress/{nickname}
pub async fn progress(
    State(state): State<AppState>,
    Path(nickname): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let st = state.clone();
    let progress = run_blocking(move || st.hunt.progress(&st.db, &nickname)).await?;
    Ok(Json(progress))
}
