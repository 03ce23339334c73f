//! Lenient readers for settings passed in as a `serde_json::Value` object.
//!
//! The presentation layer hands settings over as loose JSON. Every helper
//! takes the object, a key, and a default, and never fails: a missing key,
//! a `null`, or a value of the wrong type all yield the default.

use serde_json::Value;
use std::str::FromStr;

/// Reads a number from `params[name]`. Integers are widened to `f64`.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// Reads a non-negative integer from `params[name]`.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| usize::try_from(v).ok())
        .unwrap_or(default)
}

/// Reads a boolean from `params[name]`.
pub fn param_bool(params: &Value, name: &str, default: bool) -> bool {
    params.get(name).and_then(Value::as_bool).unwrap_or(default)
}

/// Reads a string from `params[name]` and parses it with [`FromStr`].
///
/// Used for enumerated settings such as falloff laws and polarity modes.
/// An unparseable string falls back to `default` like any other bad value.
pub fn param_parsed<T: FromStr>(params: &Value, name: &str, default: T) -> T {
    params
        .get(name)
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Reads an angle given in degrees from `params[name]` and returns radians.
///
/// UI controls expose angles in degrees; evaluators work in radians.
pub fn param_degrees(params: &Value, name: &str, default_radians: f64) -> f64 {
    params
        .get(name)
        .and_then(Value::as_f64)
        .map(f64::to_radians)
        .unwrap_or(default_radians)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, PartialEq)]
    enum Mode {
        Attract,
        Repel,
    }

    impl FromStr for Mode {
        type Err = ();
        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s {
                "attract" => Ok(Mode::Attract),
                "repel" => Ok(Mode::Repel),
                _ => Err(()),
            }
        }
    }

    // -- param_f64 --

    #[test]
    fn param_f64_extracts_existing_float() {
        let params = json!({"contour_interval": 25.5});
        assert!((param_f64(&params, "contour_interval", 50.0) - 25.5).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_widens_integer() {
        let params = json!({"max_elevation": 1000});
        assert!((param_f64(&params, "max_elevation", 0.0) - 1000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_returns_default_for_missing_null_or_string() {
        assert!((param_f64(&json!({}), "k", 3.0) - 3.0).abs() < f64::EPSILON);
        assert!((param_f64(&json!({"k": null}), "k", 4.0) - 4.0).abs() < f64::EPSILON);
        assert!((param_f64(&json!({"k": "high"}), "k", 5.0) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_returns_default_for_non_object() {
        let params = json!([1, 2, 3]);
        assert!((param_f64(&params, "k", 7.0) - 7.0).abs() < f64::EPSILON);
    }

    // -- param_usize --

    #[test]
    fn param_usize_extracts_existing_integer() {
        assert_eq!(param_usize(&json!({"octaves": 4}), "octaves", 1), 4);
    }

    #[test]
    fn param_usize_rejects_float_and_negative() {
        assert_eq!(param_usize(&json!({"octaves": 2.5}), "octaves", 1), 1);
        assert_eq!(param_usize(&json!({"octaves": -3}), "octaves", 1), 1);
    }

    // -- param_bool --

    #[test]
    fn param_bool_extracts_value_and_falls_back() {
        assert!(param_bool(&json!({"bias_enabled": true}), "bias_enabled", false));
        assert!(!param_bool(&json!({"bias_enabled": 1}), "bias_enabled", false));
        assert!(param_bool(&json!({}), "bias_enabled", true));
    }

    // -- param_parsed --

    #[test]
    fn param_parsed_reads_known_variant() {
        let params = json!({"polarity": "repel"});
        assert_eq!(param_parsed(&params, "polarity", Mode::Attract), Mode::Repel);
    }

    #[test]
    fn param_parsed_falls_back_on_unknown_variant() {
        let params = json!({"polarity": "sideways"});
        assert_eq!(param_parsed(&params, "polarity", Mode::Attract), Mode::Attract);
    }

    #[test]
    fn param_parsed_falls_back_on_wrong_type() {
        let params = json!({"polarity": 2});
        assert_eq!(param_parsed(&params, "polarity", Mode::Repel), Mode::Repel);
    }

    // -- param_degrees --

    #[test]
    fn param_degrees_converts_to_radians() {
        let params = json!({"bias_angle": 180});
        let rad = param_degrees(&params, "bias_angle", 0.0);
        assert!((rad - std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn param_degrees_default_is_already_radians() {
        let rad = param_degrees(&json!({}), "bias_angle", 1.25);
        assert!((rad - 1.25).abs() < f64::EPSILON);
    }
}
