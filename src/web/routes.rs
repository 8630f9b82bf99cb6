use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;

use crate::app::{AppContext, Result, TweetstatsError};
use crate::session::{SessionContext, SESSION_COOKIE};
use crate::stats::StatsView;
use crate::store::Store;
use crate::web::render;

type Ctx = State<Arc<AppContext>>;

fn session_id(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE).map(|c| c.value().to_string())
}

fn session_context(ctx: &AppContext, jar: &CookieJar) -> Option<Arc<SessionContext>> {
    session_id(jar).and_then(|id| ctx.sessions.context(&id))
}

fn session_cookie(id: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Starts sign-in: a fresh session bound to a new request token. Any
/// session the browser already had is discarded.
pub async fn login(State(ctx): Ctx, jar: CookieJar) -> Result<(CookieJar, Redirect)> {
    let callback_url = ctx.config.server.callback_url();
    let request_token = ctx.oauth.request_token(&callback_url).await.map_err(|e| {
        tracing::error!("Failed to obtain request token: {}", e);
        e
    })?;
    let authenticate_url = ctx.oauth.authenticate_url(&request_token)?;

    if let Some(previous) = session_id(&jar) {
        if ctx.sessions.remove(&previous) {
            tracing::debug!("Dropped previous session {} on new sign-in", previous);
        }
    }

    let id = crate::session::SessionStore::new_id();
    ctx.sessions.begin(&id, request_token);
    tracing::debug!("Started sign-in for session {}", id);

    Ok((
        jar.add(session_cookie(id)),
        Redirect::to(authenticate_url.as_str()),
    ))
}

#[derive(Debug, Default, Deserialize)]
pub struct CallbackParams {
    pub oauth_token: Option<String>,
    pub oauth_verifier: Option<String>,
    pub denied: Option<String>,
}

pub async fn callback(
    State(ctx): Ctx,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> Response {
    match complete_sign_in(&ctx, &jar, params).await {
        Ok(()) => Redirect::to("/about").into_response(),
        Err(e) => {
            tracing::error!("Sign-in failed: {}", e);
            e.into_response()
        }
    }
}

async fn complete_sign_in(ctx: &AppContext, jar: &CookieJar, params: CallbackParams) -> Result<()> {
    let id = session_id(jar)
        .ok_or_else(|| TweetstatsError::OAuth("No sign-in in progress".into()))?;

    if params.denied.is_some() {
        ctx.sessions.remove(&id);
        return Err(TweetstatsError::OAuth("Authorization was denied".into()));
    }

    let request_token = ctx
        .sessions
        .pending_token(&id)
        .ok_or_else(|| TweetstatsError::OAuth("No sign-in in progress".into()))?;
    let verifier = params
        .oauth_verifier
        .ok_or_else(|| TweetstatsError::OAuth("Callback is missing oauth_verifier".into()))?;

    if let Some(token) = params.oauth_token {
        if token != request_token.token {
            return Err(TweetstatsError::OAuth("Callback token does not match".into()));
        }
    }

    let access_token = ctx.oauth.access_token(&request_token, &verifier).await?;
    let snapshot = ctx.timeline.fetch_feed_snapshot(&access_token).await?;

    tracing::info!(
        "Signed in @{} with {} posts",
        access_token.screen_name,
        snapshot.len()
    );
    ctx.sessions
        .authenticate(&id, SessionContext::new(access_token, snapshot));

    Ok(())
}

pub async fn about(State(ctx): Ctx, jar: CookieJar) -> Response {
    match session_context(&ctx, &jar) {
        Some(session) => Html(render::about_page(&session)).into_response(),
        None => Redirect::to("/").into_response(),
    }
}

pub async fn recent(State(ctx): Ctx, jar: CookieJar) -> Response {
    match session_context(&ctx, &jar) {
        Some(session) => Html(render::recent_page(&session.snapshot, ctx.timezone)).into_response(),
        None => Redirect::to("/").into_response(),
    }
}

fn stats_view(ctx: &AppContext, jar: &CookieJar, view: StatsView) -> Response {
    let Some(session) = session_context(ctx, jar) else {
        return Redirect::to("/").into_response();
    };

    match view.report(&session.snapshot) {
        Ok(report) => Html(render::stats_page(&report)).into_response(),
        Err(e) => {
            tracing::error!("Failed to build {} view: {}", view, e);
            e.into_response()
        }
    }
}

pub async fn top_users(State(ctx): Ctx, jar: CookieJar) -> Response {
    stats_view(&ctx, &jar, StatsView::TopUsers)
}

pub async fn top_clients(State(ctx): Ctx, jar: CookieJar) -> Response {
    stats_view(&ctx, &jar, StatsView::TopClients)
}

pub async fn top_tweeters(State(ctx): Ctx, jar: CookieJar) -> Response {
    stats_view(&ctx, &jar, StatsView::TopTweeters)
}

pub async fn top_followers(State(ctx): Ctx, jar: CookieJar) -> Response {
    stats_view(&ctx, &jar, StatsView::TopFollowers)
}

pub async fn logout(State(ctx): Ctx, jar: CookieJar) -> (CookieJar, Html<String>) {
    if let Some(id) = session_id(&jar) {
        ctx.sessions.remove(&id);
    }
    (
        jar.remove(Cookie::build(SESSION_COOKIE).path("/")),
        Html(render::signed_out_page()),
    )
}

pub async fn db(State(ctx): Ctx) -> Response {
    match ctx.store.ping() {
        Ok(ticks) => Html(render::db_page(&ticks)).into_response(),
        Err(e) => {
            tracing::error!("Database check failed: {}", e);
            e.into_response()
        }
    }
}
