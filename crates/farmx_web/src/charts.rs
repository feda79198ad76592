//! SVG bar charts for the comparison views, drawn with plotters

use crate::errors::ChartError;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

const SIZE: (u32, u32) = (480, 360);

/// Default 5% top margin above the tallest yield bar
pub const YIELD_HEADROOM: f64 = 1.05;
/// Room above the tallest nitrogen bar for its value label
pub const NITROGEN_HEADROOM: f64 = 1.2;

const BLUE_BAR: RGBColor = RGBColor(0x00, 0x00, 0xFF);
const GREEN_BAR: RGBColor = RGBColor(0x00, 0x80, 0x00);
const ORANGE_BAR: RGBColor = RGBColor(0xFF, 0x98, 0x00);
const PURPLE_BAR: RGBColor = RGBColor(0x9C, 0x27, 0xB0);

type DrawResult = Result<(), DrawingAreaErrorKind<std::io::Error>>;

#[derive(Debug, Clone)]
pub struct Bar {
    pub label: String,
    pub value: f64,
    pub color: RGBColor,
}

#[derive(Debug, Clone)]
pub struct BarChart {
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub bars: Vec<Bar>,
    /// Upper y limit as a multiple of the tallest bar
    pub headroom: f64,
    /// Unit appended to value labels drawn above each bar
    pub value_unit: Option<&'static str>,
}

impl BarChart {
    /// Upper bound of the y axis. Never zero, so an all-zero chart still
    /// has a usable scale.
    pub fn y_max(&self) -> f64 {
        let tallest = self
            .bars
            .iter()
            .map(|bar| bar.value)
            .filter(|v| v.is_finite())
            .fold(0.0_f64, f64::max);
        if tallest > 0.0 {
            tallest * self.headroom
        } else {
            1.0
        }
    }

    /// Render the chart as a standalone `<svg>` document.
    pub fn render_svg(&self) -> Result<String, ChartError> {
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, SIZE).into_drawing_area();
            self.draw(&root)
                .map_err(|err| ChartError::Render(err.to_string()))?;
        }
        Ok(svg)
    }

    fn draw(&self, root: &DrawingArea<SVGBackend, Shift>) -> DrawResult {
        let y_max = self.y_max();
        let count = self.bars.len();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(root)
            .caption(self.title, ("sans-serif", 20))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d((0..count).into_segmented(), 0f64..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(count)
            .x_label_formatter(&|x| match x {
                SegmentValue::CenterOf(i) => self
                    .bars
                    .get(*i)
                    .map(|bar| bar.label.clone())
                    .unwrap_or_default(),
                _ => String::new(),
            })
            .x_desc(self.x_label)
            .y_desc(self.y_label)
            .draw()?;

        let tops: Vec<f64> = self
            .bars
            .iter()
            .map(|bar| {
                if bar.value.is_finite() {
                    bar.value.clamp(0.0, y_max)
                } else {
                    0.0
                }
            })
            .collect();

        chart.draw_series(self.bars.iter().zip(&tops).enumerate().map(|(i, (bar, top))| {
            let mut rect = Rectangle::new(
                [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), *top)],
                bar.color.filled(),
            );
            rect.set_margin(0, 0, 20, 20);
            rect
        }))?;

        if let Some(unit) = self.value_unit {
            let style = TextStyle::from(("sans-serif", 14).into_font())
                .pos(Pos::new(HPos::Center, VPos::Bottom));
            chart.draw_series(self.bars.iter().zip(&tops).enumerate().map(|(i, (bar, top))| {
                Text::new(
                    format!("{:.2} {unit}", bar.value),
                    (SegmentValue::CenterOf(i), *top),
                    style.clone(),
                )
            }))?;
        }

        root.present()?;
        Ok(())
    }
}

/// "Yield Comparison" chart, first crop blue and second green.
pub fn yield_comparison(crops: [(&str, f64); 2]) -> BarChart {
    BarChart {
        title: "Yield Comparison",
        x_label: "Crop",
        y_label: "Projected Yield (kg)",
        bars: bars(crops, [BLUE_BAR, GREEN_BAR]),
        headroom: YIELD_HEADROOM,
        value_unit: None,
    }
}

/// "Nitrogen Prediction Comparison" chart with labelled bars.
pub fn nitrogen_comparison(crops: [(&str, f64); 2]) -> BarChart {
    BarChart {
        title: "Nitrogen Prediction Comparison",
        x_label: "Crop",
        y_label: "Predicted Nitrogen Value (kg/ha)",
        bars: bars(crops, [ORANGE_BAR, PURPLE_BAR]),
        headroom: NITROGEN_HEADROOM,
        value_unit: Some("kg/ha"),
    }
}

fn bars(crops: [(&str, f64); 2], colors: [RGBColor; 2]) -> Vec<Bar> {
    crops
        .into_iter()
        .zip(colors)
        .map(|((label, value), color)| Bar {
            label: label.to_string(),
            value,
            color,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nitrogen_chart_has_headroom_and_labels() {
        let chart = nitrogen_comparison([("rice", 50.0), ("maize", 100.0)]);
        assert!((chart.y_max() - 120.0).abs() < 1e-9);

        let svg = chart.render_svg().unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("Nitrogen Prediction Comparison"));
        assert!(svg.contains("#FF9800"));
        assert!(svg.contains("#9C27B0"));
        assert!(svg.contains("50.00 kg/ha"));
        assert!(svg.contains("100.00 kg/ha"));
        assert!(svg.contains("rice"));
        assert!(svg.contains("maize"));
    }

    #[test]
    fn yield_chart_has_no_value_labels() {
        let chart = yield_comparison([("rice", 3000.0), ("maize", 1500.0)]);
        assert!((chart.y_max() - 3000.0 * YIELD_HEADROOM).abs() < 1e-9);

        let svg = chart.render_svg().unwrap();
        assert!(svg.contains("Yield Comparison"));
        assert!(svg.contains("#0000FF"));
        assert!(svg.contains("#008000"));
        assert!(!svg.contains("kg/ha"));
    }

    #[test]
    fn all_zero_values_still_render() {
        let chart = nitrogen_comparison([("rice", 0.0), ("maize", 0.0)]);
        assert_eq!(chart.y_max(), 1.0);
        let svg = chart.render_svg().unwrap();
        assert!(!svg.contains("NaN"));
        assert!(svg.contains("0.00 kg/ha"));
    }
}
