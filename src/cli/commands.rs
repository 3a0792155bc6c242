use std::{sync::Arc, time::Duration};

use serde::Serialize;

use crate::cli::flags::{Cli, Command};
use crate::config::{load_config, AppConfig};
use crate::core::{
    error::ScoutError,
    throttle::{SearchThrottle, ThrottleStatus},
    time::now_utc,
};
use crate::credits::CreditsService;
use crate::search::{http::HttpSearchBackend, SearchBackend, SearchQuery, SearchService};
use crate::site::{
    i18n::{Dictionary, DictionaryProvider},
    sitemap,
};

/// Totals for one `search` invocation and the gate state it left behind.
#[derive(Debug, Clone, Serialize)]
pub struct SearchRunSummary {
    pub completed: usize,
    pub throttled: usize,
    pub throttle: ThrottleStatus,
}

pub async fn run(cli: Cli) -> Result<(), ScoutError> {
    let cfg = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Search {
            query,
            location,
            limit,
            locale,
            repeat,
            pause_ms,
        } => {
            // One gate for the whole process.
            let throttle = Arc::new(SearchThrottle::new(cfg.throttle.delay()));
            let backend = HttpSearchBackend::new(&cfg.search)?;
            let service = SearchService::new(throttle, backend);
            let dict = load_dictionary(&cfg, locale.as_deref());
            let query = SearchQuery {
                text: query,
                location,
                limit: limit.unwrap_or(cfg.search.default_limit),
            };
            let summary = run_search(
                &service,
                query,
                repeat,
                Duration::from_millis(pause_ms),
                dict.as_deref(),
            )
            .await?;
            print_json(&serde_json::json!({ "summary": summary }))
        }
        Command::Credits { user } => {
            let credits = CreditsService::new(&cfg.credits).lookup(user.as_deref());
            print_json(&credits)
        }
        Command::Dict { locale, key } => run_dict(&cfg, locale.as_deref(), key.as_deref()),
        Command::Sitemap { output } => {
            let list = sitemap::entries(
                &cfg.site.base_url,
                &cfg.site.routes,
                &cfg.site.locales,
                &cfg.site.default_locale,
                now_utc(),
            );
            match output {
                Some(path) => sitemap::write_sitemap(&list, &path)?,
                None => print!("{}", sitemap::render_xml(&list)),
            }
            Ok(())
        }
    }
}

/// Run `repeat` searches through one service; throttled attempts are
/// reported and skipped, other errors abort.
pub async fn run_search<B: SearchBackend>(
    service: &SearchService<B>,
    query: SearchQuery,
    repeat: usize,
    pause: Duration,
    dict: Option<&Dictionary>,
) -> Result<SearchRunSummary, ScoutError> {
    let mut completed = 0;
    let mut throttled = 0;
    for attempt in 1..=repeat.max(1) {
        if attempt > 1 && !pause.is_zero() {
            tokio::time::sleep(pause).await;
        }
        match service.search(query.clone()).await {
            Ok(results) => {
                completed += 1;
                print_json(&results)?;
            }
            Err(err @ ScoutError::Throttled { remaining_seconds }) => {
                throttled += 1;
                tracing::info!("attempt {attempt}: {err}");
                print_json(&serde_json::json!({
                    "allowed": false,
                    "remaining_seconds": remaining_seconds,
                    "message": throttled_message(dict, &err, remaining_seconds),
                }))?;
            }
            Err(err) => return Err(err),
        }
    }
    Ok(SearchRunSummary {
        completed,
        throttled,
        throttle: service.throttle().status(),
    })
}

/// Localized "try again in N seconds", or the error text when no
/// translation is available.
pub fn throttled_message(
    dict: Option<&Dictionary>,
    err: &ScoutError,
    remaining_seconds: u64,
) -> String {
    let seconds = remaining_seconds.to_string();
    dict.and_then(|d| d.format("search.throttled", &[("seconds", seconds.as_str())]))
        .unwrap_or_else(|| err.to_string())
}

fn load_dictionary(cfg: &AppConfig, locale: Option<&str>) -> Option<Arc<Dictionary>> {
    let provider = DictionaryProvider::from_config(&cfg.site).ok()?;
    match provider.dictionary(locale.unwrap_or(provider.default_locale())) {
        Ok(dict) => Some(dict),
        Err(err) => {
            tracing::warn!("messages fall back to English: {err}");
            None
        }
    }
}

fn run_dict(cfg: &AppConfig, locale: Option<&str>, key: Option<&str>) -> Result<(), ScoutError> {
    let provider = DictionaryProvider::from_config(&cfg.site)?;
    let dict = provider.dictionary(locale.unwrap_or(provider.default_locale()))?;
    match key {
        Some(key) => {
            let value = dict.get(key).ok_or_else(|| {
                ScoutError::Locale(format!("no translation for {key} in {}", dict.locale))
            })?;
            println!("{value}");
            Ok(())
        }
        None => print_json(dict.entries()),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), ScoutError> {
    let json = serde_json::to_string_pretty(value).map_err(|_| ScoutError::Unknown)?;
    println!("{json}");
    Ok(())
}
