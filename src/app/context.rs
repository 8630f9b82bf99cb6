use std::path::PathBuf;
use std::sync::Arc;

use chrono_tz::Tz;

use crate::app::error::{Result, TweetstatsError};
use crate::config::Config;
use crate::fetcher::http_fetcher::{http_client, HttpTimelineClient};
use crate::fetcher::TimelineSource;
use crate::oauth::{OAuthClient, OAuthProvider};
use crate::session::SessionStore;
use crate::store::sqlite::SqliteStore;

pub struct AppContext {
    pub config: Config,
    pub store: Arc<SqliteStore>,
    pub oauth: Arc<dyn OAuthProvider + Send + Sync>,
    pub timeline: Arc<dyn TimelineSource + Send + Sync>,
    pub sessions: SessionStore,
    pub timezone: Tz,
}

impl AppContext {
    /// Builds the context used by the web server: file-backed store and
    /// HTTP clients for the provider.
    pub fn new(config: Config) -> Result<Self> {
        let consumer = config
            .consumer()
            .map_err(|e| TweetstatsError::Config(e.to_string()))?;
        let http = http_client(&config.api)?;

        let oauth: Arc<dyn OAuthProvider + Send + Sync> = Arc::new(OAuthClient::new(
            http.clone(),
            consumer.clone(),
            config.api.clone(),
        ));
        let timeline: Arc<dyn TimelineSource + Send + Sync> = Arc::new(
            HttpTimelineClient::new(http, consumer, config.api.clone()),
        );
        let store = Arc::new(SqliteStore::new(Self::db_path(&config)?)?);

        Self::with_parts(config, store, oauth, timeline)
    }

    pub fn with_parts(
        config: Config,
        store: Arc<SqliteStore>,
        oauth: Arc<dyn OAuthProvider + Send + Sync>,
        timeline: Arc<dyn TimelineSource + Send + Sync>,
    ) -> Result<Self> {
        let timezone = config
            .display
            .tz()
            .map_err(|e| TweetstatsError::Config(e.to_string()))?;
        let sessions = SessionStore::new(config.server.session_ttl());

        Ok(Self {
            config,
            store,
            oauth,
            timeline,
            sessions,
            timezone,
        })
    }

    pub fn db_path(config: &Config) -> Result<PathBuf> {
        match &config.database.path {
            Some(p) => Ok(p.clone()),
            None => Self::default_db_path(),
        }
    }

    fn default_db_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| TweetstatsError::Config("Could not find data directory".into()))?;
        let app_dir = data_dir.join("tweetstats");
        std::fs::create_dir_all(&app_dir)?;
        Ok(app_dir.join("tweetstats.db"))
    }
}
