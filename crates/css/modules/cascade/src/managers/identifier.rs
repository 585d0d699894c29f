//! Keyword-only properties.

use super::{ValueManager, invalid_unit, keyword, single_unit};
use crate::context::CssContext;
use crate::error::ValueError;
use css_values_units::{LexicalUnit, ListSeparator, Value};

/// A property whose only values are keywords from a fixed table.
#[derive(Clone, Copy, Debug)]
pub struct IdentifierManager {
    pub name: &'static str,
    pub inherited: bool,
    pub initial: &'static str,
    pub keywords: &'static [&'static str],
}

impl ValueManager for IdentifierManager {
    fn property_name(&self) -> &'static str {
        self.name
    }

    fn is_inherited_property(&self) -> bool {
        self.inherited
    }

    fn default_value(&self) -> Value {
        Value::ident(self.initial)
    }

    fn create_value(&self, units: &[LexicalUnit], _context: &CssContext) -> Result<Value, ValueError> {
        match single_unit(self.name, units)? {
            LexicalUnit::Ident(ident) => keyword(self.name, self.keywords, ident),
            other => Err(invalid_unit(self.name, other)),
        }
    }
}

const fn identifier(
    name: &'static str,
    inherited: bool,
    initial: &'static str,
    keywords: &'static [&'static str],
) -> IdentifierManager {
    IdentifierManager {
        name,
        inherited,
        initial,
        keywords,
    }
}

const RENDERING_HINTS: &[&str] = &["auto", "optimizeSpeed", "optimizeQuality"];
const FILL_RULES: &[&str] = &["nonzero", "evenodd"];
const INTERPOLATION_SPACES: &[&str] = &["auto", "sRGB", "linearRGB"];

/// Keyword properties of the SVG and CSS 2 property sets.
pub const IDENTIFIER_MANAGERS: &[IdentifierManager] = &[
    identifier(
        "alignment-baseline",
        false,
        "auto",
        &[
            "auto",
            "baseline",
            "before-edge",
            "text-before-edge",
            "middle",
            "central",
            "after-edge",
            "text-after-edge",
            "ideographic",
            "alphabetic",
            "hanging",
            "mathematical",
        ],
    ),
    identifier("clip-rule", true, "nonzero", FILL_RULES),
    identifier("color-interpolation", true, "sRGB", INTERPOLATION_SPACES),
    identifier("color-interpolation-filters", true, "linearRGB", INTERPOLATION_SPACES),
    identifier("color-rendering", true, "auto", RENDERING_HINTS),
    identifier("direction", true, "ltr", &["ltr", "rtl"]),
    identifier(
        "display",
        false,
        "inline",
        &[
            "inline",
            "block",
            "list-item",
            "run-in",
            "compact",
            "marker",
            "table",
            "inline-table",
            "table-row-group",
            "table-header-group",
            "table-footer-group",
            "table-row",
            "table-column-group",
            "table-column",
            "table-cell",
            "table-caption",
            "none",
        ],
    ),
    identifier(
        "dominant-baseline",
        false,
        "auto",
        &[
            "auto",
            "use-script",
            "no-change",
            "reset-size",
            "ideographic",
            "alphabetic",
            "hanging",
            "mathematical",
            "central",
            "middle",
            "text-after-edge",
            "text-before-edge",
        ],
    ),
    identifier("fill-rule", true, "nonzero", FILL_RULES),
    identifier("font-style", true, "normal", &["normal", "italic", "oblique"]),
    identifier("font-variant", true, "normal", &["normal", "small-caps"]),
    identifier("image-rendering", true, "auto", RENDERING_HINTS),
    identifier("overflow", false, "visible", &["visible", "hidden", "scroll", "auto"]),
    identifier(
        "pointer-events",
        true,
        "visiblePainted",
        &[
            "visiblePainted",
            "visibleFill",
            "visibleStroke",
            "visible",
            "painted",
            "fill",
            "stroke",
            "all",
            "none",
        ],
    ),
    identifier(
        "shape-rendering",
        true,
        "auto",
        &["auto", "optimizeSpeed", "crispEdges", "geometricPrecision"],
    ),
    identifier("stroke-linecap", true, "butt", &["butt", "round", "square"]),
    identifier("stroke-linejoin", true, "miter", &["miter", "round", "bevel"]),
    identifier("text-anchor", true, "start", &["start", "middle", "end"]),
    identifier(
        "text-rendering",
        true,
        "auto",
        &["auto", "optimizeSpeed", "optimizeLegibility", "geometricPrecision"],
    ),
    identifier("unicode-bidi", false, "normal", &["normal", "embed", "bidi-override"]),
    identifier("visibility", true, "visible", &["visible", "hidden", "collapse"]),
    identifier(
        "writing-mode",
        true,
        "lr-tb",
        &["lr-tb", "rl-tb", "tb-rl", "lr", "rl", "tb"],
    ),
];

const DECORATIONS: &[&str] = &["underline", "overline", "line-through", "blink"];

/// `text-decoration`: `none` or a space-separated set of decorations.
#[derive(Clone, Copy, Debug, Default)]
pub struct TextDecorationManager;

impl ValueManager for TextDecorationManager {
    fn property_name(&self) -> &'static str {
        "text-decoration"
    }

    fn is_inherited_property(&self) -> bool {
        false
    }

    fn default_value(&self) -> Value {
        Value::ident("none")
    }

    fn create_value(&self, units: &[LexicalUnit], _context: &CssContext) -> Result<Value, ValueError> {
        let property = self.property_name();
        if let [LexicalUnit::Ident(ident)] = units
            && ident.eq_ignore_ascii_case("none")
        {
            return Ok(Value::ident("none"));
        }
        let mut decorations = Vec::with_capacity(units.len());
        for unit in units {
            let LexicalUnit::Ident(ident) = unit else {
                return Err(invalid_unit(property, unit));
            };
            let decoration = keyword(property, DECORATIONS, ident)?;
            if decorations.contains(&decoration) {
                return Err(ValueError::InvalidIdentifier {
                    property,
                    ident: ident.clone(),
                });
            }
            decorations.push(decoration);
        }
        Ok(Value::list(ListSeparator::Space, decorations))
    }
}

#[cfg(test)]
mod tests {
    use super::{IDENTIFIER_MANAGERS, IdentifierManager, TextDecorationManager};
    use crate::context::CssContext;
    use crate::error::ValueError;
    use crate::managers::ValueManager;
    use css_values_units::{LexicalUnit, LexicalUnitKind, Value, parse_lexical_units};

    fn manager(name: &str) -> Option<&'static IdentifierManager> {
        IDENTIFIER_MANAGERS.iter().find(|manager| manager.name == name)
    }

    fn create(manager: &dyn ValueManager, text: &str) -> Result<Value, ValueError> {
        let units = parse_lexical_units(text).unwrap_or_default();
        manager.create_declared_value(&units, &CssContext::default())
    }

    #[test]
    fn keywords_ignore_case_and_keep_canonical_spelling() -> Result<(), ValueError> {
        let interpolation = manager("color-interpolation").ok_or(ValueError::MalformedLexicalUnit {
            property: "color-interpolation",
        })?;
        assert_eq!(create(interpolation, "LINEARrgb")?, Value::ident("linearRGB"));
        assert_eq!(interpolation.default_value(), Value::ident("sRGB"));
        Ok(())
    }

    #[test]
    fn defaults_and_inheritance() {
        let display = manager("display");
        assert!(display.is_some_and(|display| !display.inherited && display.initial == "inline"));
        let visibility = manager("visibility");
        assert!(visibility.is_some_and(|visibility| visibility.inherited));
    }

    #[test]
    fn rejections() {
        let Some(display) = manager("display") else {
            return;
        };
        assert_eq!(
            create(display, "flex"),
            Err(ValueError::InvalidIdentifier {
                property: "display",
                ident: "flex".to_owned()
            })
        );
        assert_eq!(
            create(display, "block inline"),
            Err(ValueError::InvalidLexicalUnit {
                property: "display",
                kind: LexicalUnitKind::Ident
            })
        );
        assert_eq!(create(display, "inherit"), Ok(Value::Inherit));
        assert_eq!(
            display.create_declared_value(&[] as &[LexicalUnit], &CssContext::default()),
            Err(ValueError::MalformedLexicalUnit { property: "display" })
        );
    }

    #[test]
    fn text_decoration_sets() {
        let decorations = create(&TextDecorationManager, "underline blink");
        assert_eq!(
            decorations.map(|value| value.to_string()),
            Ok("underline blink".to_owned())
        );
        assert_eq!(create(&TextDecorationManager, "None"), Ok(Value::ident("none")));
        assert!(create(&TextDecorationManager, "underline underline").is_err());
    }
}
