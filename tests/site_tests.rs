use local_scout::config::load_config;
use local_scout::credits::CreditsService;
use local_scout::site::i18n::DictionaryProvider;
use local_scout::site::sitemap::{entries, render_xml};

#[test]
fn shipped_config_and_dictionaries_agree() {
    let cfg = load_config(Some("config/localscout.toml")).unwrap();
    let provider = DictionaryProvider::from_config(&cfg.site).unwrap();

    for locale in provider.supported_locales() {
        let dict = provider.dictionary(locale).unwrap();
        assert_eq!(&dict.locale, locale);
        let msg = dict
            .format("search.throttled", &[("seconds", "9")])
            .unwrap();
        assert!(msg.contains('9'), "{locale}: {msg}");
        assert!(!msg.contains("{seconds}"), "{locale}: {msg}");
    }

    let fallback = provider.dictionary("de-AT").unwrap();
    assert_eq!(fallback.locale, cfg.site.default_locale);
}

#[test]
fn shipped_config_sitemap_covers_every_route_and_locale() {
    std::env::set_var("LS_FIXED_TIME", "2025-01-02T00:00:00Z");
    let cfg = load_config(Some("config/localscout.toml")).unwrap();
    let list = entries(
        &cfg.site.base_url,
        &cfg.site.routes,
        &cfg.site.locales,
        &cfg.site.default_locale,
        local_scout::core::time::now_utc(),
    );
    assert_eq!(list.len(), cfg.site.routes.len() * cfg.site.locales.len());

    let xml = render_xml(&list);
    assert_eq!(xml.matches("<url>").count(), list.len());
    assert!(xml.contains("<loc>https://localscout.example/fr/pricing</loc>"));
    assert!(xml.contains("<lastmod>2025-01-02T00:00:00Z</lastmod>"));
}

#[test]
fn shipped_credits_fall_back_to_free_plan() {
    let cfg = load_config(Some("config/localscout.toml")).unwrap();
    let credits = CreditsService::new(&cfg.credits);
    assert_eq!(credits.lookup(Some("demo-pro")).credits_used, 258);
    assert_eq!(credits.lookup(Some("someone-else")).plan, "free");
}
