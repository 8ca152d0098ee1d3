use explore_charts::config::query_string::{decode, encode};
use explore_charts::config::{
    ideal_bounds, ChartConfigProps, ChartConfigStore, Dimension, RenderEnvironment,
    ALL_CHART_TYPES,
};
use proptest::prelude::*;

fn chart_type_strategy() -> impl Strategy<Value = explore_charts::ChartType> {
    (0usize..ALL_CHART_TYPES.len()).prop_map(|i| ALL_CHART_TYPES[i])
}

proptest! {
    #[test]
    fn ideal_bounds_are_always_positive(
        type_index in 0usize..ALL_CHART_TYPES.len(),
        is_server_side in any::<bool>(),
        is_editor_mode in any::<bool>(),
        is_media_card in any::<bool>(),
        dimension_count in 0usize..4
    ) {
        let env = RenderEnvironment {
            is_server_side,
            is_editor_mode,
            is_media_card,
            asset_root_url: String::new(),
        };
        let mut store = ChartConfigStore::new(env.clone());
        store.set_chart_type(ALL_CHART_TYPES[type_index]);
        let dimensions: Vec<Dimension> =
            (0..dimension_count).map(|i| Dimension::y(i as u64 + 1)).collect();
        if !dimensions.is_empty() {
            store.load(ChartConfigProps { dimensions, ..ChartConfigProps::default() });
        }

        let bounds = store.ideal_bounds();
        prop_assert!(bounds.width > 0);
        prop_assert!(bounds.height > 0);
        prop_assert_eq!(bounds, ideal_bounds(store.chart_type(), &env));
    }

    #[test]
    fn query_round_trip_reproduces_whitelisted_fields(
        chart_type in chart_type_strategy(),
        time in proptest::option::of((-10_000i32..10_000, 0i32..5_000)),
        indicator in proptest::option::of(1u64..1_000_000)
    ) {
        let mut store = ChartConfigStore::default();
        store.set_chart_type(chart_type);
        if let Some((start, span)) = time {
            store.set_time_domain(start, start.saturating_add(span));
        }
        if let Some(id) = indicator {
            store.load(ChartConfigProps {
                dimensions: vec![Dimension::y(id)],
                ..ChartConfigProps::default()
            });
        }

        let partial = decode(&encode(&store));

        if chart_type != explore_charts::ChartType::default() {
            prop_assert_eq!(partial.chart_type, Some(chart_type));
        } else {
            // The default type is a sentinel and is encoded sparsely.
            prop_assert_eq!(partial.chart_type, None);
        }
        if let Some((start, span)) = time {
            prop_assert_eq!(
                partial.time_domain,
                Some((start, start.saturating_add(span)))
            );
        } else {
            prop_assert_eq!(partial.time_domain, None);
        }
        prop_assert_eq!(partial.indicator_id, indicator);
    }

    #[test]
    fn decode_never_panics_and_never_invents_time_domains(query in ".{0,120}") {
        let partial = decode(&query);
        if let Some((min, max)) = partial.time_domain {
            prop_assert!(min <= max);
        }
    }

    #[test]
    fn malformed_time_values_leave_the_domain_unset(value in "[a-zA-Z ._%-]{1,24}") {
        let partial = decode(&format!("time={value}"));
        prop_assert_eq!(partial.time_domain, None);
    }
}
