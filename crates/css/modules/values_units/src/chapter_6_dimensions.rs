//! CSS Values & Units: §6 Dimensions (CSS 2 lengths and angles)
//! See: <https://www.w3.org/TR/CSS2/syndata.html#length-units>

/// Millimetres per inch.
pub const MM_PER_INCH: f32 = 25.4;
/// Points per inch.
pub const POINTS_PER_INCH: f32 = 72.0;
/// Picas per inch.
pub const PICAS_PER_INCH: f32 = 6.0;

/// Units carried by numeric values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Unit {
    /// Unitless number.
    Number,
    Pixels,
    Millimeters,
    Centimeters,
    Inches,
    Points,
    Picas,
    Ems,
    Exs,
    Percentage,
    Degrees,
    Radians,
    Gradians,
}

impl Unit {
    /// Map a dimension suffix to a unit, ignoring ASCII case.
    pub fn from_dimension(suffix: &str) -> Option<Self> {
        let unit = match suffix.to_ascii_lowercase().as_str() {
            "px" => Self::Pixels,
            "mm" => Self::Millimeters,
            "cm" => Self::Centimeters,
            "in" => Self::Inches,
            "pt" => Self::Points,
            "pc" => Self::Picas,
            "em" => Self::Ems,
            "ex" => Self::Exs,
            "deg" => Self::Degrees,
            "rad" => Self::Radians,
            "grad" => Self::Gradians,
            _ => return None,
        };
        Some(unit)
    }

    /// Text appended after the number when serializing.
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Number => "",
            Self::Pixels => "px",
            Self::Millimeters => "mm",
            Self::Centimeters => "cm",
            Self::Inches => "in",
            Self::Points => "pt",
            Self::Picas => "pc",
            Self::Ems => "em",
            Self::Exs => "ex",
            Self::Percentage => "%",
            Self::Degrees => "deg",
            Self::Radians => "rad",
            Self::Gradians => "grad",
        }
    }

    /// Absolute and font-relative length units, including unitless numbers.
    pub const fn is_length(self) -> bool {
        matches!(
            self,
            Self::Number
                | Self::Pixels
                | Self::Millimeters
                | Self::Centimeters
                | Self::Inches
                | Self::Points
                | Self::Picas
                | Self::Ems
                | Self::Exs
        )
    }

    pub const fn is_angle(self) -> bool {
        matches!(self, Self::Degrees | Self::Radians | Self::Gradians)
    }
}

/// Convert an absolute length to pixels.
///
/// `pixel_unit_to_millimeter` is the size of one pixel in millimetres. Numbers and
/// pixels pass through; relative units (em, ex, percentages) and angles return `None`.
pub fn absolute_length_px(value: f32, unit: Unit, pixel_unit_to_millimeter: f32) -> Option<f32> {
    match unit {
        Unit::Number | Unit::Pixels => Some(value),
        Unit::Millimeters => Some(value / pixel_unit_to_millimeter),
        Unit::Centimeters => Some(value * 10.0 / pixel_unit_to_millimeter),
        Unit::Inches => Some(value * MM_PER_INCH / pixel_unit_to_millimeter),
        Unit::Points => Some(value * MM_PER_INCH / (POINTS_PER_INCH * pixel_unit_to_millimeter)),
        Unit::Picas => Some(value * MM_PER_INCH / (PICAS_PER_INCH * pixel_unit_to_millimeter)),
        Unit::Ems
        | Unit::Exs
        | Unit::Percentage
        | Unit::Degrees
        | Unit::Radians
        | Unit::Gradians => None,
    }
}

/// Convert an angle (or a unitless number, read as degrees) to degrees.
pub fn angle_degrees(value: f32, unit: Unit) -> Option<f32> {
    match unit {
        Unit::Number | Unit::Degrees => Some(value),
        Unit::Radians => Some(value.to_degrees()),
        Unit::Gradians => Some(value * 0.9),
        Unit::Pixels
        | Unit::Millimeters
        | Unit::Centimeters
        | Unit::Inches
        | Unit::Points
        | Unit::Picas
        | Unit::Ems
        | Unit::Exs
        | Unit::Percentage => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{Unit, absolute_length_px, angle_degrees};

    const PIXEL_MM: f32 = 0.264_583;

    fn px(value: f32, unit: Unit) -> f32 {
        absolute_length_px(value, unit, PIXEL_MM).unwrap_or(f32::NAN)
    }

    #[test]
    fn absolute_units_convert_through_millimetres() {
        assert!((px(1.0, Unit::Inches) - 96.0).abs() < 0.01);
        assert!((px(2.54, Unit::Centimeters) - 96.0).abs() < 0.01);
        assert!((px(25.4, Unit::Millimeters) - 96.0).abs() < 0.01);
        assert!((px(72.0, Unit::Points) - 96.0).abs() < 0.01);
        assert!((px(6.0, Unit::Picas) - 96.0).abs() < 0.01);
        assert!((px(12.5, Unit::Pixels) - 12.5).abs() < f32::EPSILON);
        assert!(absolute_length_px(1.0, Unit::Ems, PIXEL_MM).is_none());
    }

    #[test]
    fn angles_normalize_to_degrees() {
        assert!(angle_degrees(100.0, Unit::Gradians).is_some_and(|deg| (deg - 90.0).abs() < 0.001));
        assert!(
            angle_degrees(core::f32::consts::PI, Unit::Radians)
                .is_some_and(|deg| (deg - 180.0).abs() < 0.001)
        );
        assert_eq!(angle_degrees(1.0, Unit::Pixels), None);
        assert_eq!(Unit::from_dimension("GRAD"), Some(Unit::Gradians));
        assert_eq!(Unit::from_dimension("vw"), None);
    }
}
