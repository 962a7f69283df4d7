// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tolerances and constants for every geometry pass.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Length unit of the layout coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    #[default]
    Meters,
    Centimeters,
    Millimeters,
}

impl LengthUnit {
    /// Number of units in one metre.
    pub fn per_meter(&self) -> f64 {
        match self {
            LengthUnit::Meters => 1.0,
            LengthUnit::Centimeters => 100.0,
            LengthUnit::Millimeters => 1000.0,
        }
    }
}

/// Geometry configuration.
///
/// Lengths are in `unit`; `overlap_epsilon` is an area in `unit` squared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Unit the remaining values are expressed in
    pub unit: LengthUnit,
    /// Overlap area below which two footprints count as merely touching
    pub overlap_epsilon: f64,
    /// Buffer applied to areas and spaces when deriving separator/opening indices
    pub adjacency_tolerance: f64,
    /// Outward buffer that closes the gap between areas and walls
    pub area_buffer: f64,
    /// Mitre length / buffer distance beyond which corners are bevelled
    pub mitre_limit: f64,
    /// Maximum distance from an item edge to a wall line for snapping
    pub snap_distance: f64,
    /// Allowed `1 - |dot|` between an item edge and a wall segment
    pub snap_parallel_tolerance: f64,
    /// Angular deviation (degrees) that snapping corrects by rotation
    pub snap_alignment_tolerance_deg: f64,
    /// Item edge must be shorter than wall segment length times this ratio
    pub snap_length_ratio: f64,
    /// Douglas-Peucker tolerance for label regions
    pub label_simplify_tolerance: f64,
    /// Precision of the pole-of-inaccessibility search
    pub label_precision: f64,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            unit: LengthUnit::Meters,
            overlap_epsilon: 1e-6,
            adjacency_tolerance: 0.05,
            area_buffer: 0.02,
            mitre_limit: 5.0,
            snap_distance: 0.3,
            snap_parallel_tolerance: 1e-3,
            snap_alignment_tolerance_deg: 5.0,
            snap_length_ratio: 1.1,
            label_simplify_tolerance: 0.01,
            label_precision: 0.01,
        }
    }
}

impl GeometryConfig {
    /// Defaults scaled to `unit`.
    pub fn for_unit(unit: LengthUnit) -> Self {
        let scale = unit.per_meter();
        let base = Self::default();
        Self {
            unit,
            overlap_epsilon: base.overlap_epsilon * scale * scale,
            adjacency_tolerance: base.adjacency_tolerance * scale,
            area_buffer: base.area_buffer * scale,
            snap_distance: base.snap_distance * scale,
            label_simplify_tolerance: base.label_simplify_tolerance * scale,
            label_precision: base.label_precision * scale,
            ..base
        }
    }

    /// Parse a configuration from JSON.
    ///
    /// When only `unit` is given the defaults for that unit are used; any
    /// other field overrides the scaled default.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))?;

        let unit = match value.get("unit") {
            Some(u) => serde_json::from_value(u.clone())
                .map_err(|e| Error::Serialization(e.to_string()))?,
            None => LengthUnit::default(),
        };

        let mut merged = serde_json::to_value(Self::for_unit(unit))
            .map_err(|e| Error::Serialization(e.to_string()))?;
        if let (Some(target), Some(overrides)) = (merged.as_object_mut(), value.as_object()) {
            for (key, v) in overrides {
                target.insert(key.clone(), v.clone());
            }
        }

        let config: Self =
            serde_json::from_value(merged).map_err(|e| Error::Serialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no geometry pass can work with.
    pub fn validate(&self) -> Result<()> {
        let non_negative = [
            ("overlap_epsilon", self.overlap_epsilon),
            ("adjacency_tolerance", self.adjacency_tolerance),
            ("area_buffer", self.area_buffer),
            ("snap_distance", self.snap_distance),
            ("snap_parallel_tolerance", self.snap_parallel_tolerance),
            ("snap_alignment_tolerance_deg", self.snap_alignment_tolerance_deg),
            ("label_simplify_tolerance", self.label_simplify_tolerance),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::Serialization(format!(
                    "{name} must be a finite non-negative number, got {value}"
                )));
            }
        }
        if self.mitre_limit.is_nan() || self.mitre_limit < 1.0 {
            return Err(Error::Serialization(format!(
                "mitre_limit must be at least 1, got {}",
                self.mitre_limit
            )));
        }
        if self.snap_length_ratio.is_nan()
            || self.snap_length_ratio <= 0.0
            || self.label_precision.is_nan()
            || self.label_precision <= 0.0
        {
            return Err(Error::Serialization(
                "snap_length_ratio and label_precision must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Alignment tolerance in radians
    pub fn snap_alignment_tolerance(&self) -> f64 {
        self.snap_alignment_tolerance_deg.to_radians()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn millimetre_defaults_are_scaled() {
        let mm = GeometryConfig::for_unit(LengthUnit::Millimeters);
        let m = GeometryConfig::default();
        assert_relative_eq!(mm.area_buffer, m.area_buffer * 1000.0);
        assert_relative_eq!(mm.overlap_epsilon, m.overlap_epsilon * 1e6);
        // Ratios do not depend on the unit
        assert_eq!(mm.mitre_limit, m.mitre_limit);
        assert_eq!(mm.snap_length_ratio, m.snap_length_ratio);
    }

    #[test]
    fn json_overrides_scaled_defaults() {
        let config = GeometryConfig::from_json(r#"{ "unit": "centimeters", "area_buffer": 1.5 }"#).unwrap();
        assert_eq!(config.unit, LengthUnit::Centimeters);
        assert_relative_eq!(config.area_buffer, 1.5);
        assert_relative_eq!(config.snap_distance, 30.0);
    }

    #[test]
    fn empty_json_is_default() {
        assert_eq!(GeometryConfig::from_json("{}").unwrap(), GeometryConfig::default());
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(GeometryConfig::from_json("{ unit: "), Err(Error::Serialization(_))));
        assert!(matches!(
            GeometryConfig::from_json(r#"{ "mitre_limit": 0.5 }"#),
            Err(Error::Serialization(_))
        ));
        assert!(matches!(
            GeometryConfig::from_json(r#"{ "area_buffer": -1.0 }"#),
            Err(Error::Serialization(_))
        ));
    }
}
