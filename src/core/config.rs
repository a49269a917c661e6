//! Configuration for print exports
//!
//! Scale indicator settings are validated once into a [`ScaleSpec`] and then
//! treated as immutable. Pipeline tuning lives in [`PrintConfig`], which can be
//! built from a [`PrintProfile`] preset or deserialized from JSON.

use crate::{
    core::constants::{DEFAULT_PRINT_DPI, PRINT_MAX_ZOOM, QUIESCE_TIMEOUT_MS},
    ui::controls::ControlPosition,
    PrintError, Result,
};
use serde::{Deserialize, Serialize};
use std::{str::FromStr, time::Duration};

/// Page orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl FromStr for Orientation {
    type Err = PrintError;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "p" | "portrait" => Ok(Orientation::Portrait),
            "l" | "landscape" => Ok(Orientation::Landscape),
            _ => Err(PrintError::InvalidOrientation(value.to_string())),
        }
    }
}

impl TryFrom<String> for Orientation {
    type Error = PrintError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

/// Unit system of the graphical scale bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleUnit {
    #[default]
    Metric,
    Imperial,
    Nautical,
}

impl ScaleUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScaleUnit::Metric => "metric",
            ScaleUnit::Imperial => "imperial",
            ScaleUnit::Nautical => "nautical",
        }
    }
}

impl FromStr for ScaleUnit {
    type Err = PrintError;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value {
            "metric" => Ok(ScaleUnit::Metric),
            "imperial" => Ok(ScaleUnit::Imperial),
            "nautical" => Ok(ScaleUnit::Nautical),
            other => Err(PrintError::InvalidScale(format!("unknown unit {other:?}"))),
        }
    }
}

/// Validated scale indicator configuration.
///
/// `max_width_percent` is always a fraction in `(0, 1]` of the container width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawScaleSpec")]
pub struct ScaleSpec {
    graphic: bool,
    numeric: bool,
    max_width_percent: f64,
    unit: ScaleUnit,
}

/// Unvalidated wire form of [`ScaleSpec`]
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawScaleSpec {
    #[serde(default)]
    graphic: bool,
    #[serde(default)]
    numeric: bool,
    max_width_percent: f64,
    unit: String,
}

impl TryFrom<RawScaleSpec> for ScaleSpec {
    type Error = PrintError;

    fn try_from(raw: RawScaleSpec) -> std::result::Result<Self, Self::Error> {
        let unit = raw.unit.parse()?;
        ScaleSpec::new(raw.graphic, raw.numeric, raw.max_width_percent, unit)
    }
}

/// Normalizes a bar width given either as a fraction `(0, 1]` or a
/// percentage `(1, 100]`. Anything else is rejected.
pub fn normalize_max_width_percent(value: f64) -> Option<f64> {
    if !value.is_finite() || value <= 0.0 || value > 100.0 {
        None
    } else if value > 1.0 {
        Some(value / 100.0)
    } else {
        Some(value)
    }
}

impl ScaleSpec {
    pub fn new(
        graphic: bool,
        numeric: bool,
        max_width_percent: f64,
        unit: ScaleUnit,
    ) -> std::result::Result<Self, PrintError> {
        let max_width_percent = normalize_max_width_percent(max_width_percent).ok_or_else(|| {
            PrintError::InvalidScale(format!(
                "maxWidthPercent must be in (0, 100], got {max_width_percent}"
            ))
        })?;

        Ok(Self {
            graphic,
            numeric,
            max_width_percent,
            unit,
        })
    }

    /// Validates a loosely typed scale object and returns its normalized form.
    ///
    /// `maxWidthPercent` must be a number and `unit` one of the known unit
    /// strings. `graphic`/`numeric` default to `false` when absent and must be
    /// booleans when present. The input is never modified.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        let object = value.as_object()?;
        let max_width_percent = object.get("maxWidthPercent")?.as_f64()?;
        let unit = object.get("unit")?.as_str()?.parse().ok()?;
        let flag = |key: &str| match object.get(key) {
            None => Some(false),
            Some(value) => value.as_bool(),
        };

        Self::new(flag("graphic")?, flag("numeric")?, max_width_percent, unit).ok()
    }

    pub fn graphic(&self) -> bool {
        self.graphic
    }

    pub fn numeric(&self) -> bool {
        self.numeric
    }

    pub fn max_width_percent(&self) -> f64 {
        self.max_width_percent
    }

    pub fn unit(&self) -> ScaleUnit {
        self.unit
    }

    /// True when neither indicator is requested
    pub fn is_empty(&self) -> bool {
        !self.graphic && !self.numeric
    }
}

/// Returns whether `candidate` describes a valid scale configuration.
///
/// Pure: the normalized value is available through [`ScaleSpec::from_json`].
pub fn is_valid_scale_object(candidate: &serde_json::Value) -> bool {
    ScaleSpec::from_json(candidate).is_some()
}

/// Settling behaviour of the quiescence wait
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuiescenceConfig {
    /// Quiet period required between two polls
    pub settle_window_ms: u64,
    /// Upper bound for the whole wait; `None` waits indefinitely
    pub timeout_ms: Option<u64>,
}

impl QuiescenceConfig {
    pub fn settle_window(&self) -> Duration {
        Duration::from_millis(self.settle_window_ms)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

impl Default for QuiescenceConfig {
    fn default() -> Self {
        Self {
            settle_window_ms: QUIESCE_TIMEOUT_MS,
            timeout_ms: None,
        }
    }
}

/// Pipeline-wide print options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintConfig {
    pub quiescence: QuiescenceConfig,
    /// Requested DPI when an export request does not name one
    pub default_dpi: f64,
    pub max_zoom: f64,
    pub antialias: bool,
    pub numeric_scale_position: ControlPosition,
}

impl PrintConfig {
    /// Parses and validates a configuration; missing fields take the
    /// [`PrintProfile::Standard`] values.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects a zero settle window and a default DPI that is not a positive
    /// finite number.
    pub fn validate(&self) -> std::result::Result<(), PrintError> {
        if self.quiescence.settle_window_ms == 0 {
            return Err(PrintError::InvalidConfig(
                "quiescence.settle_window_ms must be greater than zero".into(),
            ));
        }
        if !self.default_dpi.is_finite() || self.default_dpi <= 0.0 {
            return Err(PrintError::InvalidConfig(format!(
                "default_dpi must be a positive number, got {}",
                self.default_dpi
            )));
        }
        Ok(())
    }
}

impl Default for PrintConfig {
    fn default() -> Self {
        PrintProfile::default().resolve()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum PrintProfile {
    /// Quick proofs: lower resolution, shorter settle window, bounded wait
    Draft,
    #[default]
    Standard,
    /// Press output: high resolution, long settle window
    HighQuality,
    Custom(PrintConfig),
}

impl PrintProfile {
    pub fn resolve(&self) -> PrintConfig {
        match self {
            Self::Draft => PrintConfig {
                quiescence: QuiescenceConfig {
                    settle_window_ms: 250,
                    timeout_ms: Some(10_000),
                },
                default_dpi: 150.0,
                max_zoom: PRINT_MAX_ZOOM,
                antialias: false,
                numeric_scale_position: ControlPosition::BottomLeft,
            },
            Self::Standard => PrintConfig {
                quiescence: QuiescenceConfig::default(),
                default_dpi: DEFAULT_PRINT_DPI,
                max_zoom: PRINT_MAX_ZOOM,
                antialias: true,
                numeric_scale_position: ControlPosition::BottomLeft,
            },
            Self::HighQuality => PrintConfig {
                quiescence: QuiescenceConfig {
                    settle_window_ms: 1_000,
                    timeout_ms: None,
                },
                default_dpi: 600.0,
                max_zoom: PRINT_MAX_ZOOM,
                antialias: true,
                numeric_scale_position: ControlPosition::BottomLeft,
            },
            Self::Custom(config) => config.clone(),
        }
    }

    /// Like [`resolve`](Self::resolve), but checks a custom configuration
    pub fn try_resolve(&self) -> Result<PrintConfig> {
        let config = self.resolve();
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_percentages_are_normalized() {
        for percent in [1.5, 25.0, 50.0, 99.9, 100.0] {
            let spec = ScaleSpec::from_json(&json!({ "maxWidthPercent": percent, "unit": "metric" }))
                .unwrap();
            assert_eq!(spec.max_width_percent(), percent / 100.0);
        }
    }

    #[test]
    fn test_fractions_are_kept() {
        for fraction in [0.01, 0.25, 0.5, 1.0] {
            let candidate = json!({ "maxWidthPercent": fraction, "unit": "imperial" });
            assert!(is_valid_scale_object(&candidate));
            let spec = ScaleSpec::from_json(&candidate).unwrap();
            assert_eq!(spec.max_width_percent(), fraction);
            // the candidate itself is left untouched
            assert_eq!(candidate["maxWidthPercent"], json!(fraction));
        }
    }

    #[test]
    fn test_non_positive_widths_are_rejected() {
        for width in [0.0, -0.5, -20.0] {
            assert!(!is_valid_scale_object(&json!({ "maxWidthPercent": width, "unit": "metric" })));
        }
        assert!(ScaleSpec::new(true, false, f64::NAN, ScaleUnit::Metric).is_err());
        assert!(ScaleSpec::new(true, false, 150.0, ScaleUnit::Metric).is_err());
    }

    #[test]
    fn test_unknown_units_are_rejected() {
        for unit in ["Metric", "km", "", "furlongs"] {
            let candidate = json!({ "graphic": true, "numeric": true, "maxWidthPercent": 0.5, "unit": unit });
            assert!(!is_valid_scale_object(&candidate), "{unit:?} accepted");
        }
    }

    #[test]
    fn test_malformed_candidates_are_rejected() {
        assert!(!is_valid_scale_object(&json!(null)));
        assert!(!is_valid_scale_object(&json!([0.5, "metric"])));
        assert!(!is_valid_scale_object(&json!({ "unit": "metric" })));
        assert!(!is_valid_scale_object(&json!({ "maxWidthPercent": 0.5 })));
        assert!(!is_valid_scale_object(&json!({ "maxWidthPercent": "50", "unit": "metric" })));
        assert!(!is_valid_scale_object(&json!({ "maxWidthPercent": 0.5, "unit": 3 })));
    }

    #[test]
    fn test_non_boolean_flags_are_rejected() {
        let candidates = [
            json!({ "graphic": "true", "numeric": 1, "maxWidthPercent": 0.5, "unit": "metric" }),
            json!({ "graphic": true, "numeric": "yes", "maxWidthPercent": 0.5, "unit": "metric" }),
            json!({ "graphic": null, "maxWidthPercent": 0.5, "unit": "metric" }),
        ];
        for candidate in candidates {
            assert!(ScaleSpec::from_json(&candidate).is_none(), "{candidate} accepted");
            assert!(!is_valid_scale_object(&candidate));
            assert!(serde_json::from_value::<ScaleSpec>(candidate).is_err());
        }

        let explicit = json!({ "graphic": false, "numeric": true, "maxWidthPercent": 0.5, "unit": "metric" });
        let spec = ScaleSpec::from_json(&explicit).unwrap();
        assert!(!spec.graphic() && spec.numeric());
    }

    #[test]
    fn test_scale_spec_deserialization_validates() {
        let spec: ScaleSpec = serde_json::from_str(
            r#"{ "graphic": true, "numeric": false, "maxWidthPercent": 30, "unit": "nautical" }"#,
        )
        .unwrap();
        assert!(spec.graphic());
        assert!(!spec.numeric());
        assert_eq!(spec.max_width_percent(), 0.3);
        assert_eq!(spec.unit(), ScaleUnit::Nautical);

        let err = serde_json::from_str::<ScaleSpec>(r#"{ "maxWidthPercent": 0, "unit": "metric" }"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_orientation_parsing() {
        assert_eq!("l".parse::<Orientation>().unwrap(), Orientation::Landscape);
        assert_eq!("Landscape".parse::<Orientation>().unwrap(), Orientation::Landscape);
        assert_eq!("p".parse::<Orientation>().unwrap(), Orientation::Portrait);
        assert_eq!("portrait".parse::<Orientation>().unwrap(), Orientation::Portrait);
        assert!(matches!(
            "sideways".parse::<Orientation>(),
            Err(PrintError::InvalidOrientation(_))
        ));

        let parsed: Orientation = serde_json::from_str("\"l\"").unwrap();
        assert_eq!(parsed, Orientation::Landscape);
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"landscape\"");
    }

    #[test]
    fn test_print_profile_presets() {
        let draft = PrintProfile::Draft.resolve();
        let standard = PrintProfile::Standard.resolve();
        let high_quality = PrintProfile::HighQuality.resolve();

        assert_eq!(standard.quiescence.settle_window(), Duration::from_millis(500));
        assert_eq!(standard.quiescence.timeout(), None);
        assert!(draft.quiescence.timeout().is_some());
        assert!(draft.default_dpi < standard.default_dpi);
        assert!(high_quality.default_dpi > standard.default_dpi);
        assert_eq!(PrintConfig::default(), standard);
    }

    #[test]
    fn test_print_config_from_json() {
        let config =
            PrintConfig::from_json_str(r#"{ "default_dpi": 200, "quiescence": { "timeout_ms": 5000 } }"#)
                .unwrap();
        assert_eq!(config.default_dpi, 200.0);
        assert_eq!(config.quiescence.settle_window_ms, QUIESCE_TIMEOUT_MS);
        assert_eq!(config.quiescence.timeout(), Some(Duration::from_secs(5)));
        assert_eq!(config.max_zoom, PRINT_MAX_ZOOM);

        assert!(PrintConfig::from_json_str("{ not json").is_err());
    }

    #[test]
    fn test_print_config_rejects_invalid_values() {
        for json in [
            r#"{ "quiescence": { "settle_window_ms": 0 } }"#,
            r#"{ "default_dpi": -5 }"#,
            r#"{ "default_dpi": 0 }"#,
            r#"{ "quiescence": { "settle_window_ms": 0 }, "default_dpi": -5 }"#,
        ] {
            let err = PrintConfig::from_json_str(json).unwrap_err();
            assert!(
                matches!(err.downcast_ref::<PrintError>(), Some(PrintError::InvalidConfig(_))),
                "{json} accepted"
            );
        }

        let mut config = PrintConfig::default();
        config.default_dpi = f64::NAN;
        assert!(matches!(config.validate(), Err(PrintError::InvalidConfig(_))));
        config.default_dpi = f64::INFINITY;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_custom_profile_is_validated() {
        for preset in [PrintProfile::Draft, PrintProfile::Standard, PrintProfile::HighQuality] {
            assert!(preset.try_resolve().is_ok());
        }

        let mut config = PrintConfig::default();
        config.quiescence.settle_window_ms = 0;
        let err = PrintProfile::Custom(config).try_resolve().unwrap_err();
        assert!(matches!(err.downcast_ref::<PrintError>(), Some(PrintError::InvalidConfig(_))));

        let custom = PrintConfig {
            default_dpi: 72.0,
            ..PrintConfig::default()
        };
        assert_eq!(PrintProfile::Custom(custom.clone()).try_resolve().unwrap(), custom);
    }
}
