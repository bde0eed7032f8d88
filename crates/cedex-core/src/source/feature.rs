//! Spatial features of the source model.

use super::Position;
use crate::{CircleId, EditId, LocationId};
use serde::{Deserialize, Serialize};

/// User-visible key of a feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureKey {
    pub text: String,
    /// The key came from a foreign system and is not numeric by contract.
    pub foreign: bool,
    /// The last digit of the key is a check digit.
    pub check_digit: bool,
}

impl FeatureKey {
    /// A native numeric key without check digit.
    #[must_use]
    pub fn numeric(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            foreign: false,
            check_digit: false,
        }
    }

    /// A foreign key.
    #[must_use]
    pub fn foreign(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            foreign: true,
            check_digit: false,
        }
    }

    /// Numeric value of the key, or 0 when the key is foreign or not a
    /// plain run of digits. A check digit is stripped.
    #[must_use]
    pub fn raw_id(&self) -> u32 {
        if self.foreign || self.text.is_empty() || !self.text.bytes().all(|b| b.is_ascii_digit()) {
            return 0;
        }
        match self.text.parse::<u32>() {
            Ok(v) if self.check_digit => v / 10,
            Ok(v) => v,
            Err(_) => 0,
        }
    }
}

/// Geometry of a line feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineGeometry {
    /// A straight segment between the terminals.
    Segment,
    /// A polyline. Vertices include both terminals.
    MultiSegment { vertices: Vec<Position> },
    /// An arc on a circle.
    Arc { circle: CircleId, clockwise: bool },
    /// A section of the line it was split from.
    Section,
}

/// What a text feature displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextContent {
    /// The key of the polygon it labels.
    Key,
    /// Free text.
    Misc { text: String },
    /// A row of an attribute table formatted through a template.
    Row { table: String, template: String },
}

/// A text feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextShape {
    pub content: TextContent,
    /// The string as displayed.
    pub text: String,
    /// Reference position of the text.
    pub position: Position,
    pub font: Option<String>,
    /// Average character width in ground units.
    pub char_width: f64,
    pub height: f64,
    /// Rotation in radians.
    pub rotation: f64,
    /// Polygon reference position of a topological label, when it differs
    /// from the text position.
    pub polygon_position: Option<Position>,
}

impl TextShape {
    /// Displayed width: character width times character count.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.char_width * self.text.chars().count() as f64
    }
}

/// The shape of a feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureShape {
    Point {
        location: LocationId,
    },
    Line {
        start: LocationId,
        end: LocationId,
        geometry: LineGeometry,
    },
    Text(TextShape),
}

/// A spatial feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// The edit that created the feature.
    pub creator: EditId,
    /// Legacy entity type name.
    pub entity: String,
    pub key: Option<FeatureKey>,
    /// Lines bounding polygons and labels of polygons are topological.
    pub topological: bool,
    pub shape: FeatureShape,
}

impl Feature {
    /// True for point features.
    #[must_use]
    pub fn is_point(&self) -> bool {
        matches!(self.shape, FeatureShape::Point { .. })
    }

    /// True for line features.
    #[must_use]
    pub fn is_line(&self) -> bool {
        matches!(self.shape, FeatureShape::Line { .. })
    }

    /// Location of a point feature.
    #[must_use]
    pub fn point_location(&self) -> Option<LocationId> {
        match self.shape {
            FeatureShape::Point { location } => Some(location),
            _ => None,
        }
    }

    /// Start and end locations of a line feature.
    #[must_use]
    pub fn line_terminals(&self) -> Option<(LocationId, LocationId)> {
        match self.shape {
            FeatureShape::Line { start, end, .. } => Some((start, end)),
            _ => None,
        }
    }

    /// Numeric key, or 0 if the feature has none.
    #[must_use]
    pub fn raw_id(&self) -> u32 {
        self.key.as_ref().map_or(0, FeatureKey::raw_id)
    }

    /// Short name of the shape, for diagnostics.
    #[must_use]
    pub fn shape_name(&self) -> &'static str {
        match self.shape {
            FeatureShape::Point { .. } => "point",
            FeatureShape::Line { .. } => "line",
            FeatureShape::Text(_) => "text",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_id_parses_digits() {
        assert_eq!(FeatureKey::numeric("1234").raw_id(), 1234);
    }

    #[test]
    fn raw_id_strips_check_digit() {
        let key = FeatureKey {
            text: "12347".to_string(),
            foreign: false,
            check_digit: true,
        };
        assert_eq!(key.raw_id(), 1234);
    }

    #[test]
    fn raw_id_is_zero_for_foreign_or_non_numeric() {
        assert_eq!(FeatureKey::foreign("1234").raw_id(), 0);
        assert_eq!(FeatureKey::numeric("12A4").raw_id(), 0);
        assert_eq!(FeatureKey::numeric("").raw_id(), 0);
        assert_eq!(FeatureKey::numeric("99999999999").raw_id(), 0);
    }

    #[test]
    fn text_width_counts_characters() {
        let shape = TextShape {
            content: TextContent::Key,
            text: "Lot 7".to_string(),
            position: Position::default(),
            font: None,
            char_width: 1.5,
            height: 3.0,
            rotation: 0.0,
            polygon_position: None,
        };
        assert!((shape.width() - 7.5).abs() < f64::EPSILON);
    }
}
