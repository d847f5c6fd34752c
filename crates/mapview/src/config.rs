use std::env;

use foundation::LatLon;
use style::{AugmentConfig, DEFAULT_VECTOR_SOURCE_ID, StyleDocument, StyleError, StyleMode};
use tracing::debug;
use url::Url;

use crate::engine::StyleSource;
use crate::follow::FollowPolicy;
use crate::viewport::Viewport;

pub const ENV_VECTOR_STYLE_URL: &str = "MAP_VECTOR_STYLE_URL";
pub const ENV_STYLE_MODE: &str = "MAP_STYLE_MODE";
pub const ENV_LABEL_LANGUAGE: &str = "MAP_LABEL_LANGUAGE";
pub const ENV_INITIAL_LAT: &str = "MAP_INITIAL_LAT";
pub const ENV_INITIAL_LON: &str = "MAP_INITIAL_LON";
pub const ENV_INITIAL_ZOOM: &str = "MAP_INITIAL_ZOOM";
pub const ENV_CANCEL_FOLLOW_ON_GESTURE: &str = "MAP_CANCEL_FOLLOW_ON_GESTURE";

const STYLE_URL_SCHEMES: &[&str] = &["https", "http", "asset", "file"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    MissingVectorEndpoint,
    MalformedVectorEndpoint(String),
    InvalidValue { key: &'static str, value: String },
    BundledStyle(StyleError),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingVectorEndpoint => write!(f, "no vector style endpoint configured"),
            ConfigError::MalformedVectorEndpoint(url) => {
                write!(f, "vector style endpoint is malformed: {url:?}")
            }
            ConfigError::InvalidValue { key, value } => {
                write!(f, "invalid value for {key}: {value:?}")
            }
            ConfigError::BundledStyle(err) => write!(f, "bundled raster style unusable: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<StyleError> for ConfigError {
    fn from(err: StyleError) -> Self {
        ConfigError::BundledStyle(err)
    }
}

#[derive(Debug, Clone)]
pub struct MapConfig {
    pub vector_style_url: Option<String>,
    pub raster_style: StyleDocument,
    pub initial_mode: StyleMode,
    pub initial_viewport: Viewport,
    pub label_language: String,
    pub vector_source_id: String,
    pub follow_policy: FollowPolicy,
}

impl MapConfig {
    pub fn new(raster_style: StyleDocument) -> Self {
        Self {
            vector_style_url: None,
            raster_style,
            initial_mode: StyleMode::Raster,
            initial_viewport: Viewport::default(),
            label_language: "en".to_string(),
            vector_source_id: DEFAULT_VECTOR_SOURCE_ID.to_string(),
            follow_policy: FollowPolicy::default(),
        }
    }

    /// Defaults with the raster style compiled into the binary.
    pub fn with_bundled_raster() -> Result<Self, ConfigError> {
        Ok(Self::new(StyleDocument::bundled_raster()?))
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key/value source; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::with_bundled_raster()?;

        config.vector_style_url = lookup(ENV_VECTOR_STYLE_URL);

        if let Some(raw) = lookup(ENV_STYLE_MODE) {
            config.initial_mode = StyleMode::parse(&raw).ok_or(ConfigError::InvalidValue {
                key: ENV_STYLE_MODE,
                value: raw,
            })?;
        }

        if let Some(lang) = lookup(ENV_LABEL_LANGUAGE) {
            let lang = lang.trim();
            if lang.is_empty() || !lang.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
                return Err(ConfigError::InvalidValue {
                    key: ENV_LABEL_LANGUAGE,
                    value: lang.to_string(),
                });
            }
            config.label_language = lang.to_string();
        }

        let lat = parse_f64(&lookup, ENV_INITIAL_LAT, config.initial_viewport.center.lat)?;
        let lon = parse_f64(&lookup, ENV_INITIAL_LON, config.initial_viewport.center.lon)?;
        let center = LatLon::new(lat, lon);
        if !center.is_valid() {
            return Err(ConfigError::InvalidValue {
                key: ENV_INITIAL_LAT,
                value: format!("{lat},{lon}"),
            });
        }
        let zoom = parse_f64(&lookup, ENV_INITIAL_ZOOM, config.initial_viewport.zoom)?;
        config.initial_viewport = Viewport::new(center, zoom, config.initial_mode.required_pitch());

        if let Some(raw) = lookup(ENV_CANCEL_FOLLOW_ON_GESTURE) {
            config.follow_policy.cancel_on_gesture = parse_bool(&raw).ok_or(ConfigError::InvalidValue {
                key: ENV_CANCEL_FOLLOW_ON_GESTURE,
                value: raw,
            })?;
        }

        Ok(config)
    }

    pub fn augment_config(&self) -> AugmentConfig {
        AugmentConfig {
            vector_source_id: self.vector_source_id.clone(),
            language: self.label_language.clone(),
        }
    }

    /// The style source for `mode`. Vector modes fail when the endpoint is
    /// absent or malformed; raster never fails.
    pub fn style_source(&self, mode: StyleMode) -> Result<StyleSource, ConfigError> {
        if !mode.is_vector() {
            return Ok(StyleSource::Document(self.raster_style.clone()));
        }
        let url = self
            .vector_style_url
            .as_deref()
            .ok_or(ConfigError::MissingVectorEndpoint)?;
        validate_style_url(url).map(StyleSource::Url)
    }
}

/// Parses `url` and accepts it when the scheme is one the engine can load
/// styles from. Network schemes must name a host.
pub fn validate_style_url(url: &str) -> Result<String, ConfigError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(ConfigError::MissingVectorEndpoint);
    }
    let malformed = || ConfigError::MalformedVectorEndpoint(url.to_string());
    let parsed = Url::parse(url).map_err(|err| {
        debug!(url, %err, "vector style endpoint does not parse");
        malformed()
    })?;
    if !STYLE_URL_SCHEMES.contains(&parsed.scheme()) {
        return Err(malformed());
    }
    if matches!(parsed.scheme(), "http" | "https") && !parsed.has_host() {
        return Err(malformed());
    }
    Ok(url.to_string())
}

fn parse_f64<F>(lookup: &F, key: &'static str, default: f64) -> Result<f64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(ConfigError::InvalidValue { key, value: raw }),
        },
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = MapConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.vector_style_url, None);
        assert_eq!(config.initial_mode, StyleMode::Raster);
        assert_eq!(config.label_language, "en");
        assert!(config.follow_policy.cancel_on_gesture);
    }

    #[test]
    fn reads_every_key() {
        let config = MapConfig::from_lookup(lookup_from(&[
            (ENV_VECTOR_STYLE_URL, "https://tiles.example.test/style.json"),
            (ENV_STYLE_MODE, "vector-3d"),
            (ENV_LABEL_LANGUAGE, "de"),
            (ENV_INITIAL_LAT, "52.52"),
            (ENV_INITIAL_LON, "13.405"),
            (ENV_INITIAL_ZOOM, "12"),
            (ENV_CANCEL_FOLLOW_ON_GESTURE, "false"),
        ]))
        .unwrap();
        assert_eq!(config.initial_mode, StyleMode::Vector3D);
        assert_eq!(config.label_language, "de");
        assert_eq!(config.initial_viewport.center, LatLon::new(52.52, 13.405));
        assert_eq!(config.initial_viewport.zoom, 12.0);
        assert_eq!(config.initial_viewport.pitch, 45.0);
        assert!(!config.follow_policy.cancel_on_gesture);
    }

    #[test]
    fn rejects_bad_values() {
        let err = MapConfig::from_lookup(lookup_from(&[(ENV_STYLE_MODE, "satellite")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: ENV_STYLE_MODE,
                value: "satellite".into()
            }
        );
        assert!(MapConfig::from_lookup(lookup_from(&[(ENV_INITIAL_ZOOM, "deep")])).is_err());
        assert!(MapConfig::from_lookup(lookup_from(&[(ENV_INITIAL_LAT, "95")])).is_err());
        assert!(MapConfig::from_lookup(lookup_from(&[(ENV_LABEL_LANGUAGE, "d e")])).is_err());
    }

    #[test]
    fn initial_zoom_is_clamped() {
        let config = MapConfig::from_lookup(lookup_from(&[(ENV_INITIAL_ZOOM, "30")])).unwrap();
        assert_eq!(config.initial_viewport.zoom, 20.0);
    }

    #[test]
    fn style_url_validation() {
        assert_eq!(
            validate_style_url(" https://a.test/s.json "),
            Ok("https://a.test/s.json".to_string())
        );
        assert_eq!(validate_style_url(""), Err(ConfigError::MissingVectorEndpoint));
        assert!(matches!(
            validate_style_url("tiles.example.test/style.json"),
            Err(ConfigError::MalformedVectorEndpoint(_))
        ));
        assert!(matches!(
            validate_style_url("ftp://a.test/s.json"),
            Err(ConfigError::MalformedVectorEndpoint(_))
        ));
        assert!(matches!(
            validate_style_url("https://"),
            Err(ConfigError::MalformedVectorEndpoint(_))
        ));
        assert_eq!(
            validate_style_url("asset://styles/liberty.json"),
            Ok("asset://styles/liberty.json".to_string())
        );
    }

    #[test]
    fn unparseable_endpoints_are_malformed() {
        for url in [
            "https://[broken/style.json",
            "http://host:notaport/style.json",
            "https://a%zz/%%/style.json",
        ] {
            assert_eq!(
                validate_style_url(url),
                Err(ConfigError::MalformedVectorEndpoint(url.to_string()))
            );

            let mut config = MapConfig::with_bundled_raster().unwrap();
            config.vector_style_url = Some(url.to_string());
            assert!(matches!(
                config.style_source(StyleMode::VectorFlat),
                Err(ConfigError::MalformedVectorEndpoint(_))
            ));
        }
    }

    #[test]
    fn raster_source_never_fails() {
        let config = MapConfig::with_bundled_raster().unwrap();
        assert!(matches!(
            config.style_source(StyleMode::Raster),
            Ok(StyleSource::Document(_))
        ));
        assert_eq!(
            config.style_source(StyleMode::VectorFlat),
            Err(ConfigError::MissingVectorEndpoint)
        );
    }
}
