//! Per-document configuration consulted while creating and computing values.

use core::f32::consts::SQRT_2;
use css_selectors::{ConditionFactory, QualifiedName};
use css_values_units::chapter_6_dimensions::{MM_PER_INCH, POINTS_PER_INCH};
use url::Url;

/// Size of one CSS pixel in millimetres at 96 dpi.
pub const DEFAULT_PIXEL_UNIT_TO_MILLIMETER: f32 = 0.264_583_33;

/// Configuration for one document's cascade.
#[derive(Clone, Debug)]
pub struct CssContext {
    /// Size of a user-space pixel in millimetres.
    pub pixel_unit_to_millimeter: f32,
    /// Computed value of `font-size: medium`, in pixels.
    pub medium_font_size: f32,
    /// Attribute read by class conditions.
    pub class_attribute: QualifiedName,
    /// Attribute read by id conditions.
    pub id_attribute: QualifiedName,
    /// Basis for horizontal percentages.
    pub viewport_width: f32,
    /// Basis for vertical percentages.
    pub viewport_height: f32,
    /// Base against which `url(...)` values resolve.
    pub base_url: Option<Url>,
    /// `bolder` result for weights 100 through 900.
    pub bolder_weights: [f32; 9],
    /// `lighter` result for weights 100 through 900.
    pub lighter_weights: [f32; 9],
}

impl Default for CssContext {
    fn default() -> Self {
        Self {
            pixel_unit_to_millimeter: DEFAULT_PIXEL_UNIT_TO_MILLIMETER,
            medium_font_size: medium_font_size_px(DEFAULT_PIXEL_UNIT_TO_MILLIMETER),
            class_attribute: QualifiedName::local("class"),
            id_attribute: QualifiedName::local("id"),
            viewport_width: 800.0,
            viewport_height: 600.0,
            base_url: None,
            bolder_weights: [600.0, 600.0, 600.0, 600.0, 600.0, 900.0, 900.0, 900.0, 900.0],
            lighter_weights: [100.0, 100.0, 200.0, 300.0, 400.0, 400.0, 400.0, 400.0, 400.0],
        }
    }
}

/// Nine points expressed in pixels.
fn medium_font_size_px(pixel_unit_to_millimeter: f32) -> f32 {
    9.0 * MM_PER_INCH / (POINTS_PER_INCH * pixel_unit_to_millimeter)
}

/// Table slot of a weight, snapping to the nearest hundred within 100..=900.
fn weight_slot(weight: f32) -> usize {
    ((weight / 100.0).round().clamp(1.0, 9.0) as usize).saturating_sub(1)
}

impl CssContext {
    /// Sets the pixel size and re-derives the medium font size from it.
    #[must_use]
    pub fn with_pixel_unit_to_millimeter(mut self, millimeters: f32) -> Self {
        self.pixel_unit_to_millimeter = millimeters;
        self.medium_font_size = medium_font_size_px(millimeters);
        self
    }

    #[must_use]
    pub fn with_medium_font_size(mut self, pixels: f32) -> Self {
        self.medium_font_size = pixels;
        self
    }

    #[must_use]
    pub fn with_viewport(mut self, width: f32, height: f32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    #[must_use]
    pub fn with_class_attribute(mut self, name: QualifiedName) -> Self {
        self.class_attribute = name;
        self
    }

    #[must_use]
    pub fn with_id_attribute(mut self, name: QualifiedName) -> Self {
        self.id_attribute = name;
        self
    }

    /// Condition factory bound to this document's class and id attributes.
    pub fn condition_factory(&self) -> ConditionFactory {
        ConditionFactory::new(self.class_attribute.clone(), self.id_attribute.clone())
    }

    /// Resolve a `url(...)` reference against the base URL.
    ///
    /// Without a base, or when joining fails, the reference is kept as written.
    pub fn resolve_uri(&self, specified: &str) -> String {
        self.base_url
            .as_ref()
            .and_then(|base| base.join(specified).ok())
            .map_or_else(|| specified.to_owned(), String::from)
    }

    /// Weight one step bolder than `weight`.
    ///
    /// See: <https://www.w3.org/TR/CSS2/fonts.html#propdef-font-weight>
    pub fn bolder_font_weight(&self, weight: f32) -> f32 {
        self.bolder_weights[weight_slot(weight)]
    }

    /// Weight one step lighter than `weight`.
    pub fn lighter_font_weight(&self, weight: f32) -> f32 {
        self.lighter_weights[weight_slot(weight)]
    }

    /// Normalized viewport diagonal, the basis for percentages that are
    /// neither horizontal nor vertical.
    pub fn viewport_diagonal(&self) -> f32 {
        self.viewport_width.hypot(self.viewport_height) / SQRT_2
    }
}
