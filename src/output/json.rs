//! JSON figure description for interactive front ends.

use crate::error::Result;
use crate::figure::Figure;
use crate::output::Renderer;

/// Serializes figures with `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer {
    pretty: bool,
}

impl JsonRenderer {
    /// Compact output.
    #[must_use]
    pub const fn new() -> Self {
        Self { pretty: false }
    }

    /// Indented output.
    #[must_use]
    pub const fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Renderer for JsonRenderer {
    type Output = String;

    fn render(&mut self, figure: &Figure) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(figure)?
        } else {
            serde_json::to_string(figure)?
        };
        tracing::debug!(bytes = json.len(), pretty = self.pretty, "serialized figure");
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::figure;
    use crate::graph::{BarConfiguration, BarData};

    fn bar() -> Figure {
        let data = BarData { values: vec![1.0, 3.0], names: Some(vec!["a".into(), "b".into()]), ..Default::default() };
        figure(&data, &BarConfiguration::default()).unwrap()
    }

    #[test]
    fn test_tagged_traces() {
        let json = JsonRenderer::new().render(&bar()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["traces"][0]["type"], "bars");
        assert_eq!(value["traces"][0]["upper"][1], 3.0);
        assert_eq!(value["layout"]["x_axis"]["ticks"][1]["label"], "b");
    }

    #[test]
    fn test_colors_as_hex() {
        let json = JsonRenderer::new().render(&bar()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let color = value["traces"][0]["colors"][0].as_str().unwrap();
        assert!(color.starts_with('#'));
    }

    #[test]
    fn test_pretty_output() {
        let compact = JsonRenderer::new().render(&bar()).unwrap();
        let pretty = JsonRenderer::new().pretty(true).render(&bar()).unwrap();
        assert!(!compact.contains('\n'));
        assert!(pretty.contains('\n'));
    }

    #[test]
    fn test_round_trip_structure() {
        let json = JsonRenderer::new().render(&bar()).unwrap();
        let parsed: Figure = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.traces.len(), 1);
        assert_eq!(parsed.layout.width, 800.0);
        assert_eq!(parsed.layout.x_axis.ticks.len(), 2);
    }
}
