use explore_charts::bake::{
    bake_media_card, chart_to_svg, export_filename, ChartIndex, SlugRedirect,
};
use explore_charts::config::{
    ChartConfigProps, ChartConfigStore, Dimension, PersistedChartRecord, RenderEnvironment,
};
use explore_charts::data::{VariableData, VariableDataBinder, VariableDataPayload};
use explore_charts::render::{
    build_frame, interpolate_gaps, Color, NullBackend, Renderer, TextHAlign, TextPrimitive,
};
use explore_charts::{ChartType, ChartView};

fn sample_payload() -> VariableDataPayload {
    VariableDataPayload::single(VariableData {
        id: 104_402,
        name: Some("Life expectancy".to_owned()),
        years: vec![1960, 1970, 1980, 1990, 2000, 1960, 1970, 1980, 1990, 2000],
        entities: vec![
            "USA".to_owned(),
            "USA".to_owned(),
            "USA".to_owned(),
            "USA".to_owned(),
            "USA".to_owned(),
            "France".to_owned(),
            "France".to_owned(),
            "France".to_owned(),
            "France".to_owned(),
            "France".to_owned(),
        ],
        values: vec![
            Some(69.8),
            Some(70.8),
            None,
            Some(75.2),
            Some(76.6),
            Some(70.2),
            Some(72.2),
            Some(74.1),
            Some(76.6),
            Some(79.0),
        ],
    })
}

fn sample_props() -> ChartConfigProps {
    ChartConfigProps {
        title: Some("Life expectancy".to_owned()),
        slug: Some("life-expectancy".to_owned()),
        dimensions: vec![Dimension::y(104_402)],
        ..ChartConfigProps::default()
    }
}

#[test]
fn empty_configuration_still_produces_valid_markup() {
    let view = ChartView::new(ChartConfigStore::default());
    let binder = VariableDataBinder::new();
    let env = RenderEnvironment::default();

    let svg = view.static_markup(&binder, &env).expect("markup");
    assert!(svg.starts_with("<svg"));
    assert!(svg.ends_with("</svg>\n"));
    // No title, no series: nothing beyond the background.
    assert!(!svg.contains("<text"));
    assert!(!svg.contains("<polyline"));
}

#[test]
fn markup_contains_title_and_document_size() {
    let store = ChartConfigStore::from_props(sample_props(), RenderEnvironment::default());
    let view = ChartView::new(store);
    let mut binder = VariableDataBinder::new();
    binder.receive_data(sample_payload()).expect("ingest");

    let env = RenderEnvironment::default();
    let bounds = view.ideal_bounds(&env);
    let svg = view.static_markup(&binder, &env).expect("markup");

    assert!(svg.contains("Life expectancy"));
    assert!(svg.contains(&format!(r#"width="{}""#, bounds.width)));
    assert!(svg.contains(&format!(r#"height="{}""#, bounds.height)));
    assert!(svg.contains("<polyline"));
}

#[test]
fn extreme_year_spans_export_without_overflow() {
    // A payload whose years sit at both ends of the i32 range still maps to
    // finite plot coordinates.
    let payload = VariableDataPayload::single(VariableData {
        id: 104_402,
        name: None,
        years: vec![i32::MIN, 0, i32::MAX],
        entities: vec!["USA".to_owned(), "USA".to_owned(), "USA".to_owned()],
        values: vec![Some(1.0), Some(2.0), Some(3.0)],
    });
    let mut binder = VariableDataBinder::new();
    binder.receive_data(payload).expect("ingest");

    let store = ChartConfigStore::from_props(sample_props(), RenderEnvironment::default());
    let view = ChartView::new(store);
    let svg = view
        .static_markup(&binder, &RenderEnvironment::default())
        .expect("markup");
    assert!(svg.contains("<polyline"));
    assert!(!svg.contains("NaN"));
    assert!(!svg.contains("inf"));

    // The interior gap interpolates over the same full-range span.
    let filled = interpolate_gaps(&[
        (i32::MIN, Some(1.0)),
        (0, None),
        (i32::MAX, Some(3.0)),
    ]);
    assert_eq!(filled.len(), 3);
    assert!(filled.iter().all(|&(_, v)| v.is_finite()));
}

#[test]
fn every_chart_type_builds_a_valid_frame() {
    let mut binder = VariableDataBinder::new();
    binder.receive_data(sample_payload()).expect("ingest");
    let env = RenderEnvironment::default();

    for chart_type in explore_charts::config::ALL_CHART_TYPES {
        let mut store = ChartConfigStore::from_props(sample_props(), env.clone());
        store.set_chart_type(chart_type);

        let frame =
            build_frame(&store, binder.active_bundle(), &env).expect("frame builds");
        let mut backend = NullBackend::default();
        backend.render(&frame).expect("frame validates");
        assert!(
            !frame.is_blank(),
            "chart type {chart_type:?} must draw something"
        );
    }
}

#[test]
fn title_text_is_xml_escaped() {
    let mut props = sample_props();
    props.title = Some("Fish & chips <consumption>".to_owned());
    let store = ChartConfigStore::from_props(props, RenderEnvironment::default());
    let view = ChartView::new(store);
    let binder = VariableDataBinder::new();

    let svg = view
        .static_markup(&binder, &RenderEnvironment::default())
        .expect("markup");
    assert!(svg.contains("Fish &amp; chips &lt;consumption&gt;"));
}

#[test]
fn empty_text_is_rejected_and_empty_titles_are_filtered() {
    let label = TextPrimitive::new("", 10.0, 10.0, 12.0, Color::rgb(0.1, 0.1, 0.1), TextHAlign::Left);
    assert!(label.validate().is_err());

    // An empty persisted title is dropped from the frame instead of failing
    // the export with an empty text node.
    let mut props = sample_props();
    props.title = Some(String::new());
    let store = ChartConfigStore::from_props(props, RenderEnvironment::default());
    let view = ChartView::new(store);
    let mut binder = VariableDataBinder::new();
    binder.receive_data(sample_payload()).expect("ingest");

    let svg = view
        .static_markup(&binder, &RenderEnvironment::default())
        .expect("markup");
    assert!(!svg.contains("<text"));
}

#[test]
fn entity_selection_restricts_rendered_series() {
    let env = RenderEnvironment::default();
    let mut store = ChartConfigStore::from_props(sample_props(), env.clone());
    store.select_entity("France");

    let mut binder = VariableDataBinder::new();
    binder.receive_data(sample_payload()).expect("ingest");

    let frame = build_frame(&store, binder.active_bundle(), &env).expect("frame");
    // France has no gaps, so exactly one polyline beyond the two axis lines.
    assert_eq!(frame.polylines.len(), 3);
}

#[test]
fn gaps_split_line_series_into_runs() {
    let env = RenderEnvironment::default();
    let mut store = ChartConfigStore::from_props(sample_props(), env.clone());
    store.select_entity("USA");

    let mut binder = VariableDataBinder::new();
    binder.receive_data(sample_payload()).expect("ingest");

    let frame = build_frame(&store, binder.active_bundle(), &env).expect("frame");
    // USA's 1980 gap breaks its line into two runs, plus two axis lines.
    assert_eq!(frame.polylines.len(), 4);
}

#[test]
fn interpolation_is_linear_and_drops_edge_gaps() {
    let points = [
        (1999, None),
        (2000, Some(10.0)),
        (2002, None),
        (2004, Some(30.0)),
        (2005, None),
    ];
    let filled = interpolate_gaps(&points);
    assert_eq!(filled, vec![(2000, 10.0), (2002, 20.0), (2004, 30.0)]);
}

#[test]
fn bake_chart_to_svg_applies_the_query_string() {
    let export = chart_to_svg(
        sample_props(),
        sample_payload(),
        Some("type=DiscreteBar&time=1970..2000"),
        &RenderEnvironment::for_export("https://example.org/charts"),
    )
    .expect("export");

    assert!(export.svg.contains("<rect"));
    assert!(export.width > 0 && export.height > 0);
}

#[test]
fn media_card_export_uses_card_bounds() {
    let export =
        bake_media_card(sample_props(), sample_payload(), "https://example.org/charts")
            .expect("export");
    assert_eq!((export.width, export.height), (1200, 630));
}

#[test]
fn chart_index_resolves_redirect_slugs() {
    let records = vec![
        PersistedChartRecord {
            id: 1,
            slug: "life-expectancy".to_owned(),
            version: 1,
            config: sample_props(),
        },
        PersistedChartRecord {
            id: 2,
            slug: "co2-emissions".to_owned(),
            version: 1,
            config: ChartConfigProps::default(),
        },
    ];
    let redirects = vec![
        SlugRedirect {
            slug: "life-expectancy-at-birth".to_owned(),
            chart_id: 1,
        },
        SlugRedirect {
            slug: "dangling".to_owned(),
            chart_id: 99,
        },
    ];

    let index = ChartIndex::from_rows(records, redirects);
    assert_eq!(index.len(), 3);
    assert_eq!(
        index
            .by_slug("life-expectancy-at-birth")
            .and_then(|c| c.title.as_deref()),
        Some("Life expectancy")
    );
    assert!(index.by_slug("dangling").is_none());
}

#[test]
fn export_filenames_embed_query_and_version() {
    assert_eq!(
        export_filename("life-expectancy", None, 1),
        "life-expectancy_v1.svg"
    );
    assert_eq!(
        export_filename("life-expectancy", Some("type=WorldMap&time=1960..2005"), 1),
        "life-expectancy_type_WorldMap_time_1960..2005_v1.svg"
    );
    assert_eq!(
        export_filename("life-expectancy", Some(""), 2),
        "life-expectancy_v2.svg"
    );
}

#[test]
fn world_map_export_shades_cells_per_entity() {
    let env = RenderEnvironment::default();
    let mut store = ChartConfigStore::from_props(sample_props(), env.clone());
    store.set_chart_type(ChartType::WorldMap);

    let mut binder = VariableDataBinder::new();
    binder.receive_data(sample_payload()).expect("ingest");

    let frame = build_frame(&store, binder.active_bundle(), &env).expect("frame");
    let entity_labels: Vec<&str> = frame
        .texts
        .iter()
        .map(|t| t.text.as_str())
        .filter(|t| *t == "USA" || *t == "France")
        .collect();
    assert_eq!(entity_labels.len(), 2);
}
