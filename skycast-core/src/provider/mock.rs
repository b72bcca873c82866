//! Terminal adapter: a synthetic generator that always produces a record.
//!
//! Known cities come from a fixed table; anything else gets a plausible
//! randomized record. Sitting last in the chain, this adapter is what makes
//! the fallback guarantee hold.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    error::ProviderError,
    format::capitalize_words,
    model::{self, Coordinates, WeatherRecord},
};

use super::{ProviderId, WeatherProvider};

struct MockCity {
    key: &'static str,
    name: &'static str,
    country: &'static str,
    temp_c: f64,
    condition: &'static str,
    icon: &'static str,
}

const MOCK_CITIES: &[MockCity] = &[
    MockCity { key: "london", name: "London", country: "GB", temp_c: 15.0, condition: "Cloudy", icon: "04d" },
    MockCity { key: "new york", name: "New York", country: "US", temp_c: 18.0, condition: "Partly Cloudy", icon: "02d" },
    MockCity { key: "tokyo", name: "Tokyo", country: "JP", temp_c: 20.0, condition: "Clear", icon: "01d" },
    MockCity { key: "paris", name: "Paris", country: "FR", temp_c: 17.0, condition: "Light Rain", icon: "10d" },
    MockCity { key: "sydney", name: "Sydney", country: "AU", temp_c: 25.0, condition: "Sunny", icon: "01d" },
    MockCity { key: "ethiopia", name: "Addis Ababa", country: "ET", temp_c: 22.0, condition: "Sunny", icon: "01d" },
    MockCity { key: "addis ababa", name: "Addis Ababa", country: "ET", temp_c: 22.0, condition: "Sunny", icon: "01d" },
    MockCity { key: "berlin", name: "Berlin", country: "DE", temp_c: 16.0, condition: "Cloudy", icon: "03d" },
    MockCity { key: "moscow", name: "Moscow", country: "RU", temp_c: 10.0, condition: "Cold", icon: "13d" },
    MockCity { key: "dubai", name: "Dubai", country: "AE", temp_c: 35.0, condition: "Sunny", icon: "01d" },
    MockCity { key: "mumbai", name: "Mumbai", country: "IN", temp_c: 30.0, condition: "Humid", icon: "50d" },
    MockCity { key: "cairo", name: "Cairo", country: "EG", temp_c: 28.0, condition: "Sunny", icon: "01d" },
    MockCity { key: "nairobi", name: "Nairobi", country: "KE", temp_c: 23.0, condition: "Partly Cloudy", icon: "02d" },
    MockCity { key: "johannesburg", name: "Johannesburg", country: "ZA", temp_c: 20.0, condition: "Sunny", icon: "01d" },
    MockCity { key: "shanghai", name: "Shanghai", country: "CN", temp_c: 19.0, condition: "Cloudy", icon: "03d" },
    MockCity { key: "toronto", name: "Toronto", country: "CA", temp_c: 12.0, condition: "Clear", icon: "01d" },
    MockCity { key: "sao paulo", name: "São Paulo", country: "BR", temp_c: 24.0, condition: "Cloudy", icon: "04d" },
    MockCity { key: "mexico city", name: "Mexico City", country: "MX", temp_c: 21.0, condition: "Sunny", icon: "01d" },
];

const SYNTHETIC_CONDITIONS: [&str; 3] = ["Sunny", "Cloudy", "Partly Cloudy"];

#[derive(Debug)]
pub struct MockProvider {
    rng: Mutex<StdRng>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self { rng: Mutex::new(StdRng::from_entropy()) }
    }

    /// Deterministic variant for tests asserting on the randomized fields.
    pub fn with_seed(seed: u64) -> Self {
        Self { rng: Mutex::new(StdRng::seed_from_u64(seed)) }
    }

    fn generate(&self, city: &str) -> WeatherRecord {
        let mut rng = self.rng.lock().unwrap_or_else(std::sync::PoisonError::into_inner);

        let normalized = city.trim().to_lowercase();
        let known = MOCK_CITIES.iter().find(|c| c.key == normalized);

        let (name, country, temp_c, condition, icon) = match known {
            Some(c) => (
                c.name.to_string(),
                c.country.to_string(),
                c.temp_c,
                c.condition.to_string(),
                c.icon.to_string(),
            ),
            None => (
                capitalize_words(city.trim()),
                model::UNKNOWN_COUNTRY.to_string(),
                20.0 + f64::from(rng.gen_range(0..15u8)),
                SYNTHETIC_CONDITIONS[rng.gen_range(0..SYNTHETIC_CONDITIONS.len())].to_string(),
                model::DEFAULT_ICON.to_string(),
            ),
        };

        let cloudiness_pct = if condition.contains("Cloud") { 70 } else { 20 };

        WeatherRecord {
            city_name: name,
            country_code: country,
            temperature_c: temp_c,
            feels_like_c: temp_c - 1.0,
            humidity_pct: 60 + rng.gen_range(0..30u8),
            pressure_hpa: 1013,
            condition_description: condition.to_lowercase(),
            condition_main: condition,
            icon_code: icon,
            wind_speed_mps: 3.0 + rng.r#gen::<f64>() * 5.0,
            wind_direction_deg: rng.gen_range(0..360u16),
            cloudiness_pct,
            visibility_meters: model::DEFAULT_VISIBILITY_METERS,
            observed_at: Utc::now(),
            coordinates: Coordinates::default(),
        }
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WeatherProvider for MockProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Mock
    }

    async fn fetch(&self, city: &str) -> Result<WeatherRecord, ProviderError> {
        Ok(self.generate(city))
    }
}
