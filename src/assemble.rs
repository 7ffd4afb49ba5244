//! Figure assembly.
//!
//! [`figure`] runs one graph through validation, the engines and trace/layout
//! construction. [`render`] additionally hands the result to a [`Renderer`].
//! Inputs are only borrowed; nothing is cached between calls.

use crate::error::Result;
use crate::figure::{Figure, LegendEntry};
use crate::graph::Graph;
use crate::output::Renderer;

/// Validates `data` against `configuration` and assembles the figure.
///
/// # Errors
///
/// Returns the first violated invariant; no figure is produced in that case.
pub fn figure<G: Graph>(data: &G, configuration: &G::Configuration) -> Result<Figure> {
    let kind = G::KIND;
    tracing::debug!(%kind, "assembling figure");
    data.validate(configuration).inspect_err(|e| {
        tracing::debug!(%kind, error = %e, "validation failed");
    })?;

    let prepared = data.prepare(configuration)?;
    let traces = data.build_traces(configuration, &prepared);
    let layout = data.build_layout(configuration, &prepared);

    let legend = if G::graph_configuration(configuration).show_legend {
        let mut entries: Vec<LegendEntry> = data.legend_entries(configuration, &prepared);
        for bands in G::band_configurations(configuration) {
            entries.extend(bands.legend_entries());
        }
        entries
    } else {
        Vec::new()
    };

    tracing::debug!(
        %kind,
        traces = traces.len(),
        shapes = layout.shapes.len(),
        legend = legend.len(),
        "assembled figure"
    );
    Ok(Figure { traces, layout, legend })
}

/// Assembles the figure and passes it to `renderer`.
///
/// # Errors
///
/// Returns the first violated invariant, or the renderer's own failure.
pub fn render<G: Graph, R: Renderer>(
    data: &G,
    configuration: &G::Configuration,
    renderer: &mut R,
) -> Result<R::Output> {
    let figure = figure(data, configuration)?;
    renderer.render(&figure)
}
