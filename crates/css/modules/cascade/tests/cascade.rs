#![cfg(test)]

use css_cascade::{CascadeError, CssEngine, Declaration, Origin, StyleSheet, ValueError, registry};
use css_dom_fixture::{Document, NodeId};
use css_values_units::{ListSeparator, Value};
use std::error::Error;

fn init_logging() {
    env_logger::builder().is_test(true).try_init().unwrap_or_default();
}

/// `<svg><g><text/><rect id="r"/></g></svg>`
struct Fixture {
    doc: Document,
    svg: NodeId,
    group: NodeId,
    text: NodeId,
    rect: NodeId,
}

fn fixture() -> Result<Fixture, Box<dyn Error>> {
    let mut doc = Document::new();
    let root = doc.root();
    let svg = doc.append_element(root, "svg")?;
    let group = doc.append_element(svg, "g")?;
    let text = doc.append_element(group, "text")?;
    let rect = doc.append_element(group, "rect")?;
    doc.set_attribute(rect, "id", "r");
    Ok(Fixture {
        doc,
        svg,
        group,
        text,
        rect,
    })
}

fn engine_with(origin: Origin, css: &str) -> Result<CssEngine, Box<dyn Error>> {
    let mut engine = CssEngine::default();
    let sheet = StyleSheet::parse(origin, css, &engine.context().condition_factory())?;
    let rejected = engine.add_stylesheet(&sheet);
    assert!(rejected.is_empty(), "unexpected rejections: {rejected:?}");
    Ok(engine)
}

fn pixels(
    engine: &mut CssEngine,
    doc: &Document,
    element: NodeId,
    property: &str,
) -> Result<f32, Box<dyn Error>> {
    engine
        .computed_value(doc, element, None, property)?
        .as_float()
        .ok_or_else(|| format!("{property} is not numeric").into())
}

fn close(actual: f32, expected: f32) -> bool {
    (actual - expected).abs() < 0.01
}

#[test]
fn em_lengths_follow_the_parent_font_size() -> Result<(), Box<dyn Error>> {
    init_logging();
    let Fixture {
        doc, group, text, ..
    } = fixture()?;
    let mut engine = engine_with(
        Origin::Author,
        "text { font-size: 1.5em; stroke-width: 2em }",
    )?;
    engine.set_inline_style(&doc, group, &Declaration::parse_block("font-size: 20px"));

    assert!(close(pixels(&mut engine, &doc, text, "font-size")?, 30.0));
    assert!(close(pixels(&mut engine, &doc, text, "stroke-width")?, 60.0));
    let font_size = registry().font_size_index();
    let stroke_width = engine.property_index("stroke-width").ok_or("no stroke-width")?;
    let map = engine.style_map(&doc, text, None).ok_or("text was not styled")?;
    assert!(map.is_parent_relative(font_size));
    assert!(map.is_font_size_relative(stroke_width));
    assert!(!map.is_inherited(font_size));

    engine.set_inline_style(&doc, group, &Declaration::parse_block("font-size: 10px"));
    assert!(close(pixels(&mut engine, &doc, text, "font-size")?, 15.0));
    assert!(close(pixels(&mut engine, &doc, text, "stroke-width")?, 30.0));
    Ok(())
}

#[test]
fn absolute_units_convert_through_the_pixel_size() -> Result<(), Box<dyn Error>> {
    init_logging();
    let Fixture {
        doc, text, rect, ..
    } = fixture()?;
    let mut engine = engine_with(
        Origin::Author,
        "rect { stroke-width: 1in } text { stroke-width: 2.54cm; font-size: 9pt }",
    )?;
    assert!(close(pixels(&mut engine, &doc, rect, "stroke-width")?, 96.0));
    assert!(close(pixels(&mut engine, &doc, text, "stroke-width")?, 96.0));
    assert!(close(pixels(&mut engine, &doc, text, "font-size")?, 12.0));
    Ok(())
}

#[test]
fn font_keywords_scale_from_medium() -> Result<(), Box<dyn Error>> {
    init_logging();
    let Fixture {
        doc,
        svg,
        group,
        text,
        rect,
    } = fixture()?;
    let mut engine = engine_with(
        Origin::Author,
        "svg { font-size: large } g { font-size: 10px } text { font-size: larger } rect { font-size: x-small }",
    )?;
    assert!(close(pixels(&mut engine, &doc, svg, "font-size")?, 14.4));
    assert!(close(pixels(&mut engine, &doc, group, "font-size")?, 10.0));
    assert!(close(pixels(&mut engine, &doc, text, "font-size")?, 12.0));
    assert!(close(pixels(&mut engine, &doc, rect, "font-size")?, 12.0 / 1.44));

    let mut sizes = CssEngine::default();
    sizes.set_inline_style(&doc, text, &Declaration::parse_block("font-size: smaller"));
    assert!(close(pixels(&mut sizes, &doc, text, "font-size")?, 10.0));
    Ok(())
}

#[test]
fn relative_weights_and_stretches_step_from_the_parent() -> Result<(), Box<dyn Error>> {
    init_logging();
    let Fixture {
        doc, text, rect, ..
    } = fixture()?;
    let mut engine = engine_with(
        Origin::Author,
        "g { font-weight: bold; font-stretch: condensed }
         text { font-weight: bolder; font-stretch: wider }
         rect { font-weight: lighter; font-stretch: narrower }",
    )?;
    assert!(close(pixels(&mut engine, &doc, text, "font-weight")?, 900.0));
    assert!(close(pixels(&mut engine, &doc, rect, "font-weight")?, 400.0));
    assert_eq!(
        engine.computed_value(&doc, text, None, "font-stretch")?,
        Value::ident("semi-condensed")
    );
    assert_eq!(
        engine.computed_value(&doc, rect, None, "font-stretch")?,
        Value::ident("extra-condensed")
    );
    Ok(())
}

#[test]
fn current_color_reads_the_inherited_color() -> Result<(), Box<dyn Error>> {
    init_logging();
    let Fixture {
        doc, group, rect, ..
    } = fixture()?;
    let mut engine = engine_with(
        Origin::Author,
        "g { color: red } rect { fill: currentColor; stroke: blue }",
    )?;
    assert_eq!(engine.computed_value(&doc, rect, None, "fill")?, Value::rgb(255, 0, 0));
    assert_eq!(engine.computed_value(&doc, rect, None, "stroke")?, Value::rgb(0, 0, 255));
    let fill = engine.property_index("fill").ok_or("no fill")?;
    assert!(
        engine
            .style_map(&doc, rect, None)
            .is_some_and(|map| map.is_color_relative(fill))
    );

    engine.set_inline_style(&doc, group, &Declaration::parse_block("color: lime"));
    assert_eq!(engine.computed_value(&doc, rect, None, "fill")?, Value::rgb(0, 255, 0));
    Ok(())
}

#[test]
fn defaults_and_inheritance() -> Result<(), Box<dyn Error>> {
    init_logging();
    let Fixture {
        doc,
        svg,
        group,
        text,
        ..
    } = fixture()?;
    let mut engine = engine_with(Origin::Author, "g { cursor: pointer; display: none }")?;

    assert_eq!(engine.computed_value(&doc, svg, None, "cursor")?, Value::ident("auto"));
    let group_cursor = engine.computed_value(&doc, group, None, "cursor")?;
    assert_ne!(group_cursor, Value::ident("auto"));
    assert_eq!(engine.computed_value(&doc, text, None, "cursor")?, group_cursor);
    let cursor = engine.property_index("cursor").ok_or("no cursor")?;
    assert!(
        engine
            .style_map(&doc, text, None)
            .is_some_and(|map| map.is_inherited(cursor) && map.is_null_cascaded(cursor))
    );

    assert_eq!(engine.computed_value(&doc, group, None, "display")?, Value::ident("none"));
    assert_eq!(engine.computed_value(&doc, text, None, "display")?, Value::ident("inline"));
    assert_eq!(engine.computed_value(&doc, svg, None, "fill")?, Value::rgb(0, 0, 0));
    assert_eq!(engine.computed_value(&doc, svg, None, "stroke")?, Value::ident("none"));
    Ok(())
}

#[test]
fn explicit_inherit_copies_non_inherited_properties() -> Result<(), Box<dyn Error>> {
    init_logging();
    let Fixture {
        doc, group, rect, ..
    } = fixture()?;
    let mut engine = engine_with(
        Origin::Author,
        "g { opacity: 0.5 } rect { opacity: inherit }",
    )?;
    assert!(close(pixels(&mut engine, &doc, group, "opacity")?, 0.5));
    assert!(close(pixels(&mut engine, &doc, rect, "opacity")?, 0.5));
    Ok(())
}

#[test]
fn shorthands_expand_into_longhands() -> Result<(), Box<dyn Error>> {
    init_logging();
    let Fixture {
        doc, text, rect, ..
    } = fixture()?;
    let mut engine = engine_with(
        Origin::Author,
        "rect { padding: 1px 2px 3px; marker: url(#dot) } text { margin: 4px 5px }",
    )?;
    assert!(close(pixels(&mut engine, &doc, rect, "padding-top")?, 1.0));
    assert!(close(pixels(&mut engine, &doc, rect, "padding-right")?, 2.0));
    assert!(close(pixels(&mut engine, &doc, rect, "padding-bottom")?, 3.0));
    assert!(close(pixels(&mut engine, &doc, rect, "padding-left")?, 2.0));
    assert!(close(pixels(&mut engine, &doc, text, "margin-bottom")?, 4.0));
    assert!(close(pixels(&mut engine, &doc, text, "margin-left")?, 5.0));
    for marker in ["marker-start", "marker-mid", "marker-end"] {
        assert_eq!(
            engine.computed_value(&doc, rect, None, marker)?,
            Value::uri("#dot", "#dot")
        );
    }
    Ok(())
}

#[test]
fn origin_importance_and_specificity_rank_declarations() -> Result<(), Box<dyn Error>> {
    init_logging();
    let Fixture {
        doc, text, rect, ..
    } = fixture()?;
    let mut engine = CssEngine::default();
    let conditions = engine.context().condition_factory();
    for (origin, css) in [
        (Origin::UserAgent, "rect { fill: blue !important; stroke: blue }"),
        (Origin::User, "rect { stroke: green } text { fill: green !important }"),
        (Origin::Author, "#r { fill: red; stroke: red } rect { stroke: yellow } text { fill: red !important }"),
    ] {
        let rejected = engine.add_stylesheet(&StyleSheet::parse(origin, css, &conditions)?);
        assert!(rejected.is_empty());
    }
    assert_eq!(engine.computed_value(&doc, rect, None, "fill")?, Value::rgb(0, 0, 255));
    assert_eq!(engine.computed_value(&doc, rect, None, "stroke")?, Value::rgb(255, 0, 0));
    assert_eq!(engine.computed_value(&doc, text, None, "fill")?, Value::rgb(0, 128, 0));
    let fill = engine.property_index("fill").ok_or("no fill")?;
    assert!(engine.style_map(&doc, rect, None).is_some_and(|map| {
        map.is_important(fill) && map.origin(fill) == Some(Origin::UserAgent)
    }));

    let matched = engine.matching_rules(&doc, rect, None);
    let orders: Vec<u32> = matched.iter().map(|rule| rule.source_order).collect();
    assert_eq!(orders, [0, 1, 4, 3]);
    Ok(())
}

#[test]
fn matching_rules_rank_origin_before_specificity() -> Result<(), Box<dyn Error>> {
    init_logging();
    let Fixture { doc, rect, .. } = fixture()?;
    let mut engine = CssEngine::default();
    let conditions = engine.context().condition_factory();
    for (origin, css) in [
        (Origin::Author, "rect { stroke: lightseagreen }"),
        (Origin::User, "g > #r { stroke: blue }"),
        (Origin::UserAgent, "svg #r { stroke: black }"),
    ] {
        let rejected = engine.add_stylesheet(&StyleSheet::parse(origin, css, &conditions)?);
        assert!(rejected.is_empty());
    }
    let matched = engine.matching_rules(&doc, rect, None);
    let origins: Vec<Origin> = matched.iter().map(|rule| rule.origin).collect();
    assert_eq!(origins, [Origin::UserAgent, Origin::User, Origin::Author]);
    assert_eq!(
        matched.last().map(|rule| rule.source_order),
        Some(0),
        "the last rule carries the winning declaration"
    );
    assert_eq!(engine.computed_value(&doc, rect, None, "stroke")?, Value::rgb(32, 178, 170));
    Ok(())
}

#[test]
fn extended_color_keywords_and_quoted_values_cascade() -> Result<(), Box<dyn Error>> {
    init_logging();
    let Fixture {
        doc, text, rect, ..
    } = fixture()?;
    let mut engine = engine_with(
        Origin::Author,
        "rect { fill: AliceBlue; stroke: cornflowerblue } \
         text { font-family: \"Foo;Bar}\", serif; fill: yellowgreen }",
    )?;
    assert_eq!(engine.computed_value(&doc, rect, None, "fill")?, Value::rgb(240, 248, 255));
    assert_eq!(engine.computed_value(&doc, rect, None, "stroke")?, Value::rgb(100, 149, 237));
    assert_eq!(engine.computed_value(&doc, text, None, "fill")?, Value::rgb(154, 205, 50));
    assert_eq!(
        engine.computed_value(&doc, text, None, "font-family")?,
        Value::list(ListSeparator::Comma, vec![Value::string("Foo;Bar}"), Value::ident("serif")])
    );
    Ok(())
}

#[test]
fn inline_styles_beat_normal_author_rules() -> Result<(), Box<dyn Error>> {
    init_logging();
    let Fixture { doc, rect, .. } = fixture()?;
    let mut engine = engine_with(
        Origin::Author,
        "#r { fill: red; stroke: red !important }",
    )?;
    let rejected =
        engine.set_inline_style(&doc, rect, &Declaration::parse_block("fill: green; stroke: green"));
    assert!(rejected.is_empty());
    assert_eq!(engine.computed_value(&doc, rect, None, "fill")?, Value::rgb(0, 128, 0));
    assert_eq!(engine.computed_value(&doc, rect, None, "stroke")?, Value::rgb(255, 0, 0));

    engine.set_inline_style(&doc, rect, &[]);
    assert_eq!(engine.computed_value(&doc, rect, None, "fill")?, Value::rgb(255, 0, 0));
    Ok(())
}

#[test]
fn rejected_declarations_are_reported_and_skipped() -> Result<(), Box<dyn Error>> {
    init_logging();
    let Fixture { doc, rect, .. } = fixture()?;
    let mut engine = CssEngine::default();
    let sheet = StyleSheet::parse(
        Origin::Author,
        "rect { fill: 12px; bogus: 1; stroke-width: -2; opacity: 0.25; padding: 1px, 2px }",
        &engine.context().condition_factory(),
    )?;
    let rejected = engine.add_stylesheet(&sheet);
    assert_eq!(rejected.len(), 4);
    assert!(
        rejected
            .iter()
            .any(|error| matches!(error, CascadeError::UnknownProperty(name) if name == "bogus"))
    );
    assert!(rejected.iter().any(|error| matches!(
        error,
        CascadeError::Value(ValueError::OutOfRange {
            property: "stroke-width",
            ..
        })
    )));
    assert!(close(pixels(&mut engine, &doc, rect, "opacity")?, 0.25));
    assert!(close(pixels(&mut engine, &doc, rect, "stroke-width")?, 1.0));
    assert!(matches!(
        engine.computed_value(&doc, rect, None, "no-such-property"),
        Err(CascadeError::UnknownProperty(_))
    ));
    Ok(())
}

#[test]
fn attribute_changes_invalidate_only_when_selectors_read_them() -> Result<(), Box<dyn Error>> {
    init_logging();
    let Fixture { mut doc, rect, .. } = fixture()?;
    let mut engine = engine_with(
        Origin::Author,
        "rect[kind=big] { stroke-width: 4 } .hot { fill: red }",
    )?;
    assert!(close(pixels(&mut engine, &doc, rect, "stroke-width")?, 1.0));

    doc.set_attribute(rect, "kind", "big");
    assert!(engine.attribute_changed(&doc, rect, None, "kind"));
    assert!(close(pixels(&mut engine, &doc, rect, "stroke-width")?, 4.0));

    doc.set_attribute(rect, "class", "hot");
    assert!(engine.attribute_changed(&doc, rect, None, "class"));
    assert_eq!(engine.computed_value(&doc, rect, None, "fill")?, Value::rgb(255, 0, 0));

    doc.set_attribute(rect, "title", "ignored");
    assert!(!engine.attribute_changed(&doc, rect, None, "title"));
    Ok(())
}

#[test]
fn combinator_rules_follow_ancestor_changes() -> Result<(), Box<dyn Error>> {
    init_logging();
    let Fixture {
        mut doc,
        group,
        rect,
        ..
    } = fixture()?;
    let mut engine = engine_with(Origin::Author, "g.on rect { fill: red } g:hover > rect { stroke: red }")?;
    assert_eq!(engine.computed_value(&doc, rect, None, "fill")?, Value::rgb(0, 0, 0));

    doc.set_attribute(group, "class", "on");
    assert!(engine.attribute_changed(&doc, group, None, "class"));
    assert_eq!(engine.computed_value(&doc, rect, None, "fill")?, Value::rgb(255, 0, 0));

    doc.set_pseudo_class(group, "hover", true);
    engine.pseudo_class_changed(&doc, group);
    assert_eq!(engine.computed_value(&doc, rect, None, "stroke")?, Value::rgb(255, 0, 0));
    Ok(())
}

#[test]
fn pseudo_elements_have_their_own_styles() -> Result<(), Box<dyn Error>> {
    init_logging();
    let Fixture {
        doc, group, text, ..
    } = fixture()?;
    let mut engine = engine_with(
        Origin::Author,
        "g { font-size: 20px } text { fill: blue } text::first-line { fill: green }",
    )?;
    assert_eq!(
        engine.computed_value(&doc, text, Some("first-line"), "fill")?,
        Value::rgb(0, 128, 0)
    );
    assert_eq!(engine.computed_value(&doc, text, None, "fill")?, Value::rgb(0, 0, 255));
    assert_eq!(
        engine.computed_value(&doc, text, Some("first-line"), "font-size")?,
        engine.computed_value(&doc, group, None, "font-size")?
    );
    assert!(engine.style_map(&doc, text, Some("first-line")).is_some());
    Ok(())
}

#[test]
fn computed_style_covers_every_property() -> Result<(), Box<dyn Error>> {
    init_logging();
    let Fixture { doc, rect, .. } = fixture()?;
    let mut engine = engine_with(Origin::Author, "rect { visibility: hidden }")?;
    let style = engine.computed_style(&doc, rect, None)?;
    assert_eq!(style.len(), registry().len());
    assert!(style.contains(&("visibility", Value::ident("hidden"))));

    engine.element_removed(&doc, rect);
    assert!(engine.style_map(&doc, rect, None).is_none());
    engine.clear_rules();
    assert_eq!(
        engine.computed_value(&doc, rect, None, "visibility")?,
        Value::ident("visible")
    );
    Ok(())
}

#[test]
fn documents_style_independently_across_threads() -> anyhow::Result<()> {
    use rayon::prelude::*;

    init_logging();
    let sizes: Vec<f32> = (1..=8_u8)
        .into_par_iter()
        .map(|step| -> anyhow::Result<f32> {
            let mut doc = Document::new();
            let root = doc.root();
            let parent = doc.append_element(root, "g")?;
            let child = doc.append_element(parent, "text")?;
            let mut engine = CssEngine::default();
            let css = format!("g {{ font-size: {step}px }} text {{ font-size: 2em }}");
            let sheet =
                StyleSheet::parse(Origin::Author, &css, &engine.context().condition_factory())?;
            engine.add_stylesheet(&sheet);
            engine
                .computed_value(&doc, child, None, "font-size")?
                .as_float()
                .ok_or_else(|| anyhow::anyhow!("font-size is not numeric"))
        })
        .collect::<anyhow::Result<_>>()?;
    let expected: Vec<f32> = (1..=8_u8).map(|step| f32::from(step) * 2.0).collect();
    assert!(sizes.iter().zip(&expected).all(|(size, want)| close(*size, *want)));
    Ok(())
}
