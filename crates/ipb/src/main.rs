use std::{sync::Arc, time::Duration};

use ipb_core::{
    config::Config,
    i18n::{TranslationStore, Translations},
    navigation::Navigator,
    profile::{ProfileCache, ProfileProvider},
    session::SessionStore,
};
use ipb_instagram::InstagramClient;

#[tokio::main]
async fn main() -> Result<(), ipb_core::Error> {
    let cfg = Arc::new(Config::load()?);
    ipb_core::logging::init("ipb", &cfg)?;

    let translations: Arc<dyn TranslationStore> =
        Arc::new(Translations::load(cfg.translations_dir.as_deref())?);

    let provider: Arc<dyn ProfileProvider> = Arc::new(InstagramClient::new(&cfg)?);
    // Slightly above the HTTP client's own timeout.
    let cache = Arc::new(ProfileCache::new(
        provider,
        cfg.cache_ttl,
        cfg.provider_timeout + Duration::from_secs(1),
    ));

    let navigator = Arc::new(Navigator::new(
        translations,
        cache,
        Arc::new(SessionStore::new()),
        cfg.inline_cache_time,
    ));

    tracing::info!(
        cache_ttl = ?cfg.cache_ttl,
        provider_timeout = ?cfg.provider_timeout,
        "starting instagram profile bot"
    );

    ipb_telegram::router::run_polling(cfg, navigator)
        .await
        .map_err(|e| ipb_core::Error::External(format!("telegram bot failed: {e}")))?;

    Ok(())
}
