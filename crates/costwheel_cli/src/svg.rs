//! SVG rendering surface.

use costwheel_core::{
    ArcPath, ChartError, ChartResult, Color, RecordId, RenderSurface, Style, Tooltip,
};
use std::fmt::Write;

const LEGEND_WIDTH: f64 = 180.0;
const LEGEND_ROW: f64 = 20.0;
const SWATCH: f64 = 12.0;

/// One legend row.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    /// Record name.
    pub name: String,
    /// Swatch color.
    pub color: Color,
}

/// Writes each frame as a standalone SVG document.
///
/// The chart is centred in a square of side `2 * radius`; the legend sits
/// to its right.
#[derive(Debug)]
pub struct SvgSurface {
    radius: f64,
    legend: Vec<LegendEntry>,
    body: String,
    document: Option<String>,
}

impl SvgSurface {
    /// Creates a surface for a chart of the given outer radius.
    pub fn new(radius: f64) -> Self {
        Self {
            radius,
            legend: Vec::new(),
            body: String::new(),
            document: None,
        }
    }

    /// Sets the legend drawn with the next frame.
    pub fn set_legend(&mut self, legend: Vec<LegendEntry>) {
        self.legend = legend;
    }

    /// The last completed document.
    pub fn document(&self) -> Option<&str> {
        self.document.as_deref()
    }

    fn push(&mut self, args: std::fmt::Arguments<'_>) -> ChartResult<()> {
        self.body
            .write_fmt(args)
            .map_err(|e| ChartError::surface(format!("svg write failed: {e}")))
    }

    fn legend_markup(&self) -> String {
        let x = 2.0 * self.radius + 20.0;
        let mut markup = format!("<g class=\"legend\" transform=\"translate({x},20)\">");
        for (row, entry) in self.legend.iter().enumerate() {
            let y = row as f64 * LEGEND_ROW;
            markup.push_str(&format!(
                "<rect x=\"0\" y=\"{y}\" width=\"{SWATCH}\" height=\"{SWATCH}\" fill=\"{}\"/>\
                 <text x=\"{}\" y=\"{}\">{}</text>",
                entry.color,
                SWATCH + 6.0,
                y + SWATCH - 1.0,
                escape(&entry.name),
            ));
        }
        markup.push_str("</g>");
        markup
    }
}

impl RenderSurface for SvgSurface {
    fn begin_frame(&mut self) -> ChartResult<()> {
        self.body.clear();
        let r = self.radius;
        self.push(format_args!("<g class=\"chart\" transform=\"translate({r},{r})\">"))
    }

    fn draw_path(&mut self, id: &RecordId, path: &ArcPath, style: &Style) -> ChartResult<()> {
        self.push(format_args!(
            "<path data-id=\"{}\" d=\"{path}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>",
            escape(id.as_str()),
            style.fill,
            style.stroke,
            style.stroke_width,
        ))
    }

    fn draw_tooltip(&mut self, tooltip: &Tooltip) -> ChartResult<()> {
        let (x, y) = (tooltip.anchor.x, tooltip.anchor.y);
        self.push(format_args!(
            "<g class=\"tooltip\"><text x=\"{x:.1}\" y=\"{y:.1}\" text-anchor=\"middle\">\
             {}: ${}</text><text x=\"{x:.1}\" y=\"{:.1}\" text-anchor=\"middle\">{}</text></g>",
            escape(&tooltip.name),
            tooltip.cost,
            y + 14.0,
            escape(tooltip.hint),
        ))
    }

    fn end_frame(&mut self) -> ChartResult<()> {
        self.push(format_args!("</g>"))?;
        let side = 2.0 * self.radius;
        let width = side + LEGEND_WIDTH;
        let legend = self.legend_markup();
        self.document = Some(format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{side}\" \
             viewBox=\"0 0 {width} {side}\">{}{legend}</svg>\n",
            self.body
        ));
        Ok(())
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use costwheel_core::{arc_path, ArcGeometry, Point, Radii, DELETE_HINT};

    #[test]
    fn frame_is_a_complete_document() {
        let mut surface = SvgSurface::new(150.0);
        surface.set_legend(vec![LegendEntry {
            name: "rent & bills".to_string(),
            color: Color::from_u32(0xe41a1c),
        }]);
        let path = arc_path(
            &ArcGeometry::new(0.0, std::f64::consts::FRAC_PI_2, 1.0),
            &Radii::new(150.0, 75.0),
        );
        let style = Style {
            fill: Color::from_u32(0xe41a1c),
            stroke: Color::WHITE,
            stroke_width: 3.0,
        };

        surface.begin_frame().unwrap();
        surface.draw_path(&RecordId::new("a"), &path, &style).unwrap();
        surface.end_frame().unwrap();

        let doc = surface.document().unwrap();
        assert!(doc.starts_with("<svg"));
        assert!(doc.trim_end().ends_with("</svg>"));
        assert!(doc.contains("d=\"M0,-150A150,150,0,0,1,150,0L75,0A75,75,0,0,0,0,-75Z\""));
        assert!(doc.contains("fill=\"#e41a1c\""));
        assert!(doc.contains("rent &amp; bills"));
    }

    #[test]
    fn begin_frame_discards_previous_body() {
        let mut surface = SvgSurface::new(10.0);
        surface.begin_frame().unwrap();
        surface
            .draw_path(
                &RecordId::new("a"),
                &ArcPath::default(),
                &Style {
                    fill: Color::BLACK,
                    stroke: Color::WHITE,
                    stroke_width: 1.0,
                },
            )
            .unwrap();
        surface.begin_frame().unwrap();
        surface.end_frame().unwrap();
        assert!(!surface.document().unwrap().contains("<path"));
    }

    #[test]
    fn tooltip_shows_cost_in_dollars() {
        let mut surface = SvgSurface::new(150.0);
        surface.begin_frame().unwrap();
        surface
            .draw_tooltip(&Tooltip {
                record_id: RecordId::new("a"),
                name: "rent & bills".to_string(),
                cost: 100.0,
                hint: DELETE_HINT,
                anchor: Point::new(0.0, -110.0),
            })
            .unwrap();
        surface.end_frame().unwrap();

        let document = surface.document().unwrap();
        assert!(document.contains("rent &amp; bills: $100</text>"));
        assert!(document.contains("Click slice to delete"));
    }
}
