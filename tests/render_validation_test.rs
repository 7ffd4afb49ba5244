//! End-to-end validation and rendering tests.
//!
//! Every failing case must produce exactly one message and no artifact;
//! every passing case must assemble the same figure on every call.
//!
//! Run: cargo test --test render_validation_test

#![allow(clippy::unwrap_used, missing_docs)]

use proptest::prelude::*;
use trueno_plot::prelude::*;

/// Renderer that records how many figures reached it.
#[derive(Default)]
struct Recorder {
    figures: Vec<Figure>,
}

impl Renderer for Recorder {
    type Output = ();

    fn render(&mut self, figure: &Figure) -> Result<()> {
        self.figures.push(figure.clone());
        Ok(())
    }
}

fn failure<G: Graph>(data: &G, configuration: &G::Configuration) -> String {
    let mut recorder = Recorder::default();
    let message = render(data, configuration, &mut recorder).unwrap_err().to_string();
    assert!(recorder.figures.is_empty(), "no figure may reach the renderer on failure");
    message
}

// ============================================================================
// Concrete scenarios
// ============================================================================

#[test]
fn test_distribution_without_summary() {
    let data = DistributionData { values: vec![1.0, 2.0, 3.0], name: None };
    let mut configuration = DistributionConfiguration::default();
    configuration.style.show_box = false;
    configuration.style.show_violin = false;
    configuration.style.show_curve = false;
    assert_eq!(
        failure(&data, &configuration),
        "must specify at least one of: configuration.show_box, configuration.show_violin, configuration.show_curve"
    );
}

#[test]
fn test_zero_width() {
    let data = PointsData { points_xs: vec![1.0], points_ys: vec![1.0], ..Default::default() };
    let mut configuration = PointsConfiguration::default();
    configuration.graph.width = 0.0;
    assert_eq!(failure(&data, &configuration), "non-positive configuration.graph.width: 0");
}

#[test]
fn test_value_axis_reversed_range() {
    let data = BarData { values: vec![1.0, 2.0], ..Default::default() };
    let configuration = BarConfiguration {
        value_axis: AxisConfiguration::new().minimum(1.0).maximum(0.0),
        ..Default::default()
    };
    assert_eq!(
        failure(&data, &configuration),
        "configuration.value_axis.maximum: 0\nis not larger than configuration.value_axis.minimum: 1"
    );
}

#[test]
fn test_bar_series_of_different_lengths() {
    let data = BarsData {
        values: vec![vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 2.0, 3.0]],
        ..Default::default()
    };
    assert_eq!(
        failure(&data, &BarsConfiguration::default()),
        "inconsistent size of data.values[1]: 4\nexpected size (from data.values[0]): 3"
    );
}

#[test]
fn test_minimal_line_is_reproducible() {
    let data = LineData {
        points_xs: vec![0.0, 1.0, 2.0],
        points_ys: vec![-0.2, 1.2, 1.8],
        ..Default::default()
    };
    let configuration = LineConfiguration::default();
    let mut recorder = Recorder::default();
    render(&data, &configuration, &mut recorder).unwrap();
    render(&data, &configuration, &mut recorder).unwrap();
    assert_eq!(recorder.figures.len(), 2);
    assert_eq!(recorder.figures[0], recorder.figures[1]);

    let first = SvgRenderer::new().render(&recorder.figures[0]).unwrap();
    let second = render(&data, &configuration, &mut SvgRenderer::new()).unwrap();
    assert_eq!(first, second);
    assert!(first.contains("<polyline"));
}

#[test]
fn test_reversed_categorical_palette() {
    let data = BarData {
        values: vec![1.0, 2.0],
        colors: Some(vec![ColorValue::key("a"), ColorValue::key("b")]),
        ..Default::default()
    };
    let mut configuration = BarConfiguration::default();
    configuration.color_scale.color_palette = Some(Palette::CategoricalPairs(vec![
        ("a".into(), "red".into()),
        ("b".into(), "blue".into()),
    ]));
    configuration.color_scale.reverse_color_scale = true;
    assert_eq!(failure(&data, &configuration), "reversed categorical configuration.color_scale.color_palette");
}

// ============================================================================
// Cross-kind behavior
// ============================================================================

#[test]
fn test_graph_ref_dispatch() {
    let heatmap = HeatmapData { values: vec![vec![1.0, 2.0], vec![3.0, 4.0]], ..Default::default() };
    let heatmap_configuration = HeatmapConfiguration::default();
    let cdf = CdfData { values: vec![3.0, 1.0, 2.0], name: Some("latency".into()) };
    let cdf_configuration = CdfConfiguration::default();
    let graphs = [
        GraphRef::Heatmap(&heatmap, &heatmap_configuration),
        GraphRef::Cdf(&cdf, &cdf_configuration),
    ];
    let kinds: Vec<String> = graphs.iter().map(|graph| graph.kind().to_string()).collect();
    assert_eq!(kinds, vec!["heatmap", "cdf"]);
    for graph in &graphs {
        graph.validate().unwrap();
        assert_eq!(graph.figure().unwrap().traces.len(), 1);
    }
}

#[test]
fn test_configuration_reused_across_calls() {
    let mut configuration = PointsConfiguration::default();
    let good = PointsData { points_xs: vec![1.0, 2.0], points_ys: vec![1.0, 2.0], ..Default::default() };
    let bad = PointsData { points_xs: vec![1.0, 2.0], points_ys: vec![0.0, 2.0], ..Default::default() };
    configuration.xy.y_axis = AxisConfiguration::new().log_regularization(0.0);
    assert_eq!(failure(&bad, &configuration), "log of non-positive data.points_ys[0]: 0");
    configuration.graph.title = Some("retry".into());
    let figure = figure(&good, &configuration).unwrap();
    assert_eq!(figure.layout.title.as_deref(), Some("retry"));
}

#[test]
fn test_grid_renders_size_legend() {
    let data = GridData {
        points_sizes: Some(vec![vec![1.0, 2.0], vec![3.0, 4.0]]),
        ..Default::default()
    };
    let mut configuration = GridConfiguration::default();
    configuration.size_scale.show_size_scale = true;
    configuration.size_scale.title = Some("count".into());
    let svg = render(&data, &configuration, &mut SvgRenderer::new()).unwrap();
    assert!(svg.contains(">count</text>"));
}

#[cfg(feature = "serde")]
#[test]
fn test_configuration_from_json() {
    let configuration: LineConfiguration = serde_json::from_str(
        r#"{ "graph": { "width": 640, "title": "loaded" }, "y_axis": { "log_regularization": 0.0 } }"#,
    )
    .unwrap();
    assert_eq!(configuration.graph.width, 640.0);
    assert_eq!(configuration.graph.height, 600.0);
    let data = LineData { points_xs: vec![0.0, 1.0], points_ys: vec![1.0, -1.0], ..Default::default() };
    assert_eq!(failure(&data, &configuration), "log of non-positive data.points_ys[1]: -1");
}

// ============================================================================
// Property tests
// ============================================================================

mod proptests {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_parallel_arrays_must_agree(n in 1usize..8, m in 0usize..8) {
            let data = PointsData {
                points_xs: (0..n).map(|i| i as f64).collect(),
                points_ys: (0..m).map(|i| i as f64).collect(),
                ..Default::default()
            };
            let result = figure(&data, &PointsConfiguration::default());
            if n == m {
                prop_assert!(result.is_ok());
            } else {
                let message = result.unwrap_err().to_string();
                prop_assert_eq!(
                    message,
                    format!("inconsistent size of data.points_ys: {m}\nexpected size (from data.points_xs): {n}")
                );
            }
        }

        #[test]
        fn prop_log_axis_needs_positive_values(
            ys in prop::collection::vec(-5i32..5, 1..8),
            regularization in 0u8..3,
        ) {
            let regularization = f64::from(regularization);
            let ys: Vec<f64> = ys.into_iter().map(f64::from).collect();
            let data = PointsData {
                points_xs: (0..ys.len()).map(|i| i as f64).collect(),
                points_ys: ys.clone(),
                ..Default::default()
            };
            let mut configuration = PointsConfiguration::default();
            configuration.xy.y_axis = AxisConfiguration::new().log_regularization(regularization);
            let valid = ys.iter().all(|y| y + regularization > 0.0);
            prop_assert_eq!(figure(&data, &configuration).is_ok(), valid);
        }

        #[test]
        fn prop_bands_must_increase(low in -3i32..3, middle in -3i32..3, high in -3i32..3) {
            let (low, middle, high) = (f64::from(low), f64::from(middle), f64::from(high));
            let data = LineData { points_xs: vec![0.0, 1.0], points_ys: vec![0.0, 1.0], ..Default::default() };
            let mut configuration = LineConfiguration::default();
            configuration.xy.y_bands = BandConfiguration {
                low: Some(Band::line(low)),
                middle: Some(Band::line(middle)),
                high: Some(Band::line(high)),
            };
            let valid = low < middle && middle < high;
            prop_assert_eq!(figure(&data, &configuration).is_ok(), valid);
        }

        #[test]
        fn prop_figure_is_deterministic(ys in prop::collection::vec(-100.0f64..100.0, 2..20)) {
            let data = LineData {
                points_xs: (0..ys.len()).map(|i| i as f64).collect(),
                points_ys: ys,
                ..Default::default()
            };
            let configuration = LineConfiguration::default();
            prop_assert_eq!(figure(&data, &configuration).unwrap(), figure(&data, &configuration).unwrap());
        }
    }
}
