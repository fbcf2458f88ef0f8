//! Currency resolution - effective display currency for a profile

use std::sync::Arc;

use crate::domain::{CurrencyCode, UserProfile};
use crate::ports::{LogEvent, LogSink};

/// Resolves the display currency for a (possibly not yet loaded) profile
pub trait CurrencyResolver: Send + Sync {
    fn resolve_currency(&self, profile: Option<&UserProfile>) -> CurrencyCode;
}

/// The preferred currency when set to a supported code, else the default.
///
/// Total: a missing profile, a missing or blank preference and an
/// unsupported code all yield [`CurrencyCode::DEFAULT`].
pub fn resolve_currency(profile: Option<&UserProfile>) -> CurrencyCode {
    match preferred_code(profile) {
        Some(Ok(code)) => code,
        _ => CurrencyCode::DEFAULT,
    }
}

/// `None` when no preference applies, `Err(raw)` for an unsupported code
fn preferred_code(profile: Option<&UserProfile>) -> Option<Result<CurrencyCode, String>> {
    let raw = profile?.preferred_currency.as_deref()?;
    if raw.trim().is_empty() {
        return None;
    }
    Some(raw.parse::<CurrencyCode>().map_err(|_| raw.to_string()))
}

/// [`resolve_currency`] that reports unsupported stored codes
pub struct ProfileCurrencyResolver {
    sink: Arc<dyn LogSink>,
}

impl ProfileCurrencyResolver {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }
}

impl CurrencyResolver for ProfileCurrencyResolver {
    fn resolve_currency(&self, profile: Option<&UserProfile>) -> CurrencyCode {
        match preferred_code(profile) {
            Some(Ok(code)) => code,
            Some(Err(raw)) => {
                let mut event = LogEvent::debug("unsupported_currency")
                    .with_message(format!("{:?}, using {}", raw, CurrencyCode::DEFAULT));
                if let Some(p) = profile {
                    event = event.with_account(p.account_id);
                }
                self.sink.record(event);
                CurrencyCode::DEFAULT
            }
            None => CurrencyCode::DEFAULT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sinks::MemorySink;
    use uuid::Uuid;

    fn profile(code: Option<&str>) -> UserProfile {
        let mut p = UserProfile::new(Uuid::new_v4());
        p.preferred_currency = code.map(String::from);
        p
    }

    #[test]
    fn test_preferred_currency_wins() {
        assert_eq!(resolve_currency(Some(&profile(Some("EUR")))), CurrencyCode::Eur);
        assert_eq!(resolve_currency(Some(&profile(Some("jpy")))), CurrencyCode::Jpy);
    }

    #[test]
    fn test_missing_profile_is_default() {
        assert_eq!(resolve_currency(None), CurrencyCode::Usd);
    }

    #[test]
    fn test_missing_or_blank_preference_is_default() {
        assert_eq!(resolve_currency(Some(&profile(None))), CurrencyCode::DEFAULT);
        assert_eq!(resolve_currency(Some(&profile(Some("")))), CurrencyCode::DEFAULT);
        assert_eq!(resolve_currency(Some(&profile(Some("   ")))), CurrencyCode::DEFAULT);
    }

    #[test]
    fn test_every_supported_code_resolves_to_itself() {
        for code in CurrencyCode::ALL {
            assert_eq!(resolve_currency(Some(&profile(Some(code.as_str())))), code);
        }
    }

    #[test]
    fn test_unsupported_code_is_default_and_reported() {
        let sink = Arc::new(MemorySink::new());
        let resolver = ProfileCurrencyResolver::new(sink.clone());

        let p = profile(Some("DOGE"));
        assert_eq!(resolver.resolve_currency(Some(&p)), CurrencyCode::DEFAULT);

        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event, "unsupported_currency");
        assert_eq!(events[0].account_id, Some(p.account_id));
    }

    #[test]
    fn test_resolver_is_silent_for_valid_and_missing_preferences() {
        let sink = Arc::new(MemorySink::new());
        let resolver = ProfileCurrencyResolver::new(sink.clone());

        resolver.resolve_currency(Some(&profile(Some("GBP"))));
        resolver.resolve_currency(Some(&profile(None)));
        resolver.resolve_currency(None);
        assert!(sink.events().is_empty());
    }
}
