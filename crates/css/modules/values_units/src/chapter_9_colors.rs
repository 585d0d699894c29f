//! CSS Values & Units: §9 Colors (SVG color keywords and hex notation)
//! See: <https://www.w3.org/TR/SVG11/types.html#ColorKeywords>

use csscolorparser::Color;

/// An sRGB triple.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    fn from_color(color: &Color) -> Self {
        let [red, green, blue, _alpha] = color.to_rgba8();
        Self::new(red, green, blue)
    }
}

/// Parse the digits of a 3- or 6-digit hex color (`abc` or `aabbcc`, no `#`).
pub fn parse_hex_color(text: &str) -> Option<Rgb> {
    if !matches!(text.len(), 3 | 6) || !text.bytes().all(|byte| byte.is_ascii_hexdigit()) {
        return None;
    }
    let parsed: Color = format!("#{text}").parse().ok()?;
    Some(Rgb::from_color(&parsed))
}

/// Map a color keyword, ignoring ASCII case, to its sRGB value.
///
/// Only bare keywords resolve: hex digits, functional notation and
/// `transparent` (which has no opaque sRGB value) yield `None`.
pub fn named_color(name: &str) -> Option<Rgb> {
    let keyword = !name.is_empty()
        && name.bytes().all(|byte| byte.is_ascii_alphabetic())
        && !name.bytes().all(|byte| byte.is_ascii_hexdigit())
        && !name.eq_ignore_ascii_case("transparent");
    if !keyword {
        return None;
    }
    let parsed: Color = name.to_ascii_lowercase().parse().ok()?;
    Some(Rgb::from_color(&parsed))
}

#[cfg(test)]
mod tests {
    use super::{Rgb, named_color, parse_hex_color};

    const SVG_KEYWORDS: [&str; 147] = [
        "aliceblue", "antiquewhite", "aqua", "aquamarine", "azure", "beige", "bisque", "black",
        "blanchedalmond", "blue", "blueviolet", "brown", "burlywood", "cadetblue", "chartreuse",
        "chocolate", "coral", "cornflowerblue", "cornsilk", "crimson", "cyan", "darkblue",
        "darkcyan", "darkgoldenrod", "darkgray", "darkgreen", "darkgrey", "darkkhaki",
        "darkmagenta", "darkolivegreen", "darkorange", "darkorchid", "darkred", "darksalmon",
        "darkseagreen", "darkslateblue", "darkslategray", "darkslategrey", "darkturquoise",
        "darkviolet", "deeppink", "deepskyblue", "dimgray", "dimgrey", "dodgerblue", "firebrick",
        "floralwhite", "forestgreen", "fuchsia", "gainsboro", "ghostwhite", "gold", "goldenrod",
        "gray", "grey", "green", "greenyellow", "honeydew", "hotpink", "indianred", "indigo",
        "ivory", "khaki", "lavender", "lavenderblush", "lawngreen", "lemonchiffon", "lightblue",
        "lightcoral", "lightcyan", "lightgoldenrodyellow", "lightgray", "lightgreen", "lightgrey",
        "lightpink", "lightsalmon", "lightseagreen", "lightskyblue", "lightslategray",
        "lightslategrey", "lightsteelblue", "lightyellow", "lime", "limegreen", "linen", "magenta",
        "maroon", "mediumaquamarine", "mediumblue", "mediumorchid", "mediumpurple",
        "mediumseagreen", "mediumslateblue", "mediumspringgreen", "mediumturquoise",
        "mediumvioletred", "midnightblue", "mintcream", "mistyrose", "moccasin", "navajowhite",
        "navy", "oldlace", "olive", "olivedrab", "orange", "orangered", "orchid", "palegoldenrod",
        "palegreen", "paleturquoise", "palevioletred", "papayawhip", "peachpuff", "peru", "pink",
        "plum", "powderblue", "purple", "red", "rosybrown", "royalblue", "saddlebrown", "salmon",
        "sandybrown", "seagreen", "seashell", "sienna", "silver", "skyblue", "slateblue",
        "slategray", "slategrey", "snow", "springgreen", "steelblue", "tan", "teal", "thistle",
        "tomato", "turquoise", "violet", "wheat", "white", "whitesmoke", "yellow", "yellowgreen",
    ];

    #[test]
    fn hex_triplets_and_sextets() {
        assert_eq!(parse_hex_color("fa0"), Some(Rgb::new(255, 170, 0)));
        assert_eq!(parse_hex_color("0080FF"), Some(Rgb::new(0, 128, 255)));
        assert_eq!(parse_hex_color("12345"), None);
        assert_eq!(parse_hex_color("xyz"), None);
        assert_eq!(parse_hex_color("ff00ff80"), None);
    }

    #[test]
    fn keywords_ignore_case() {
        assert_eq!(named_color("Navy"), Some(Rgb::new(0, 0, 128)));
        assert_eq!(named_color("currentColor"), None);
    }

    #[test]
    fn every_svg_keyword_resolves() {
        let missing: Vec<&str> = SVG_KEYWORDS
            .iter()
            .copied()
            .filter(|name| named_color(name).is_none())
            .collect();
        assert!(missing.is_empty(), "unresolved keywords: {missing:?}");
        assert_eq!(named_color("AliceBlue"), Some(Rgb::new(240, 248, 255)));
        assert_eq!(named_color("cornflowerblue"), Some(Rgb::new(100, 149, 237)));
        assert_eq!(named_color("yellowgreen"), Some(Rgb::new(154, 205, 50)));
        assert_eq!(named_color("lightgoldenrodyellow"), Some(Rgb::new(250, 250, 210)));
    }

    #[test]
    fn non_keywords_are_rejected() {
        assert_eq!(named_color("fab"), None);
        assert_eq!(named_color("#fff"), None);
        assert_eq!(named_color("rgb(1,2,3)"), None);
        assert_eq!(named_color("transparent"), None);
        assert_eq!(named_color(""), None);
        assert_eq!(named_color("notacolor"), None);
    }
}
