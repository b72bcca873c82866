//! Priority-ordered provider chain.
//!
//! Adapters are tried in order; the first success wins and later adapters
//! are never invoked. One attempt per adapter per call — trying the next
//! provider takes the place of retrying the current one.

use crate::{
    config::Config,
    error::ResolveError,
    model::WeatherRecord,
    provider::{
        ProviderId, WeatherProvider, mock::MockProvider, openweather::OpenWeatherProvider,
        visualcrossing::VisualCrossingProvider, weatherapi::WeatherApiProvider,
    },
};

#[derive(Debug)]
pub struct FallbackChain {
    providers: Vec<Box<dyn WeatherProvider>>,
}

impl FallbackChain {
    pub fn new(providers: Vec<Box<dyn WeatherProvider>>) -> Self {
        Self { providers }
    }

    /// Build the default chain from configured credentials:
    /// WeatherAPI, then OpenWeather, then Visual Crossing, with the
    /// synthetic generator always terminal. Remote adapters without an API
    /// key are left out.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let mut providers: Vec<Box<dyn WeatherProvider>> = Vec::new();

        if let Some(key) = config.provider_api_key(ProviderId::WeatherApi) {
            providers.push(Box::new(WeatherApiProvider::new(key.to_owned())?));
        }
        if let Some(key) = config.provider_api_key(ProviderId::OpenWeather) {
            providers.push(Box::new(OpenWeatherProvider::new(key.to_owned())?));
        }
        if let Some(key) = config.provider_api_key(ProviderId::VisualCrossing) {
            providers.push(Box::new(VisualCrossingProvider::new(key.to_owned())?));
        }
        providers.push(Box::new(MockProvider::new()));

        Ok(Self::new(providers))
    }

    pub fn provider_ids(&self) -> Vec<ProviderId> {
        self.providers.iter().map(|p| p.id()).collect()
    }

    /// Resolve a city through the chain. With the terminal mock present
    /// this cannot fail; `AllProvidersFailed` covers chains rebuilt
    /// without it.
    pub async fn resolve(&self, city: &str) -> Result<WeatherRecord, ResolveError> {
        let mut attempts = Vec::new();

        for provider in &self.providers {
            match provider.fetch(city).await {
                Ok(record) => {
                    tracing::info!(provider = %provider.id(), city, "resolved weather");
                    return Ok(record);
                }
                Err(err) => {
                    tracing::warn!(provider = %provider.id(), city, error = %err, "provider failed, falling back");
                    attempts.push((provider.id(), err));
                }
            }
        }

        Err(ResolveError::AllProvidersFailed { attempts })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn unconfigured_chain_is_mock_only() {
        let chain = FallbackChain::from_config(&Config::default()).expect("chain builds");
        assert_eq!(chain.provider_ids(), vec![ProviderId::Mock]);
    }

    #[test]
    fn configured_remotes_come_before_the_mock() {
        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "OW_KEY".to_string());
        cfg.upsert_provider_api_key(ProviderId::WeatherApi, "WA_KEY".to_string());

        let chain = FallbackChain::from_config(&cfg).expect("chain builds");
        assert_eq!(
            chain.provider_ids(),
            vec![ProviderId::WeatherApi, ProviderId::OpenWeather, ProviderId::Mock]
        );
    }

    #[tokio::test]
    async fn empty_chain_reports_all_providers_failed() {
        let chain = FallbackChain::new(Vec::new());
        let err = chain.resolve("London").await.unwrap_err();
        assert_eq!(err.to_string(), "All weather services unavailable");
    }
}
