//! Plotters-powered two-panel chart.
//!
//! Top panel: tabulated cross-sections (log scale) with every fitted curve,
//! nominal solid and ±1σ dashed, one colour per window.
//! Bottom panel: actual / fitted with the fit-uncertainty band in yellow.

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::error::AppError;
use crate::plot::{LineStyleTag, PlotData};

const WIDTH: u32 = 800;
const HEIGHT: u32 = 800;
const TOP_HEIGHT: i32 = 600;

const Y_RANGE: (f64, f64) = (1e-3, 1e5);
const RATIO_RANGE: (f64, f64) = (0.8, 1.2);

/// Window colours, cycled when there are more windows than entries.
const PALETTE: [RGBColor; 10] = [
    RGBColor(0, 0, 255),
    RGBColor(0, 200, 0),
    RGBColor(255, 165, 0),
    RGBColor(255, 0, 0),
    RGBColor(102, 153, 255),
    RGBColor(230, 200, 0),
    RGBColor(128, 0, 255),
    RGBColor(0, 128, 128),
    RGBColor(255, 0, 128),
    RGBColor(255, 0, 255),
];

/// Render the chart to an SVG file.
pub fn render_svg(path: &Path, data: &PlotData) -> Result<(), AppError> {
    let root = SVGBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
    draw_panels(&root, data)
        .and_then(|_| root.present())
        .map_err(|e| AppError::Output(format!("Failed to render plot '{}': {e}", path.display())))
}

fn draw_panels<DB>(root: &DrawingArea<DB, Shift>, data: &PlotData) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    let (top, bottom) = root.split_vertically(TOP_HEIGHT);
    let (x0, x1) = data.x_range;

    let mut chart = ChartBuilder::on(&top)
        .margin(15)
        .caption(&data.title, ("sans-serif", 18))
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 20)
        .build_cartesian_2d(x0..x1, (Y_RANGE.0..Y_RANGE.1).log_scale())?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .y_desc("σ [fb]")
        .x_label_formatter(&|_| String::new())
        .y_label_formatter(&|v| format!("{v:.0e}"))
        .draw()?;

    let mut solid_labelled = false;
    let mut dashed_labelled = false;
    for trace in &data.curves {
        let color = PALETTE[trace.window.index % PALETTE.len()];
        let style = color.stroke_width(2);
        let points: Vec<(f64, f64)> = trace
            .points
            .iter()
            .map(|&(m, y)| (m, y.clamp(Y_RANGE.0, Y_RANGE.1)))
            .collect();

        match trace.style {
            LineStyleTag::Solid => {
                let anno = chart.draw_series(LineSeries::new(points, style))?;
                if !solid_labelled {
                    solid_labelled = true;
                    anno.label("nominal fit")
                        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK.stroke_width(2)));
                }
            }
            LineStyleTag::Dashed => {
                let anno = chart.draw_series(
                    dashed_segments(&points).map(|seg| PathElement::new(seg, style)),
                )?;
                if !dashed_labelled {
                    dashed_labelled = true;
                    anno.label("±1σ fits").legend(|(x, y)| {
                        PathElement::new(vec![(x, y), (x + 8, y)], BLACK.stroke_width(2))
                    });
                }
            }
        }
    }

    chart
        .draw_series(
            data.samples
                .iter()
                .filter(|s| s.xsec >= Y_RANGE.0 && s.xsec <= Y_RANGE.1)
                .map(|s| Circle::new((s.mass, s.xsec), 3, BLACK.filled())),
        )?
        .label(data.title.as_str())
        .legend(|(x, y)| Circle::new((x + 10, y), 3, BLACK.filled()));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(WHITE)
        .draw()?;

    let mut ratio = ChartBuilder::on(&bottom)
        .margin(15)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(x0..x1, RATIO_RANGE.0..RATIO_RANGE.1)?;

    ratio
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("mass [GeV]")
        .y_desc("Actual/Fitted")
        .y_labels(5)
        .draw()?;

    let half = data.band.step / 2.0;
    ratio.draw_series(data.band.samples.iter().map(|s| {
        Rectangle::new(
            [
                ((s.mass - half).max(x0), clamp_ratio(1.0 - s.fraction)),
                ((s.mass + half).min(x1), clamp_ratio(1.0 + s.fraction)),
            ],
            YELLOW.filled(),
        )
    }))?;

    let unit_line: Vec<(f64, f64)> = (0..=100).map(|i| (x0 + (x1 - x0) * i as f64 / 100.0, 1.0)).collect();
    ratio.draw_series(dashed_segments(&unit_line).map(|seg| PathElement::new(seg, RED.stroke_width(2))))?;

    ratio.draw_series(data.ratio.iter().map(|r| {
        PathElement::new(
            vec![
                (r.mass, clamp_ratio(r.ratio - r.err)),
                (r.mass, clamp_ratio(r.ratio + r.err)),
            ],
            BLACK.stroke_width(1),
        )
    }))?;
    ratio.draw_series(
        data.ratio
            .iter()
            .filter(|r| r.ratio >= RATIO_RANGE.0 && r.ratio <= RATIO_RANGE.1)
            .map(|r| Circle::new((r.mass, r.ratio), 3, BLACK.filled())),
    )?;

    Ok(())
}

fn clamp_ratio(v: f64) -> f64 {
    v.clamp(RATIO_RANGE.0, RATIO_RANGE.1)
}

/// Two segments on, two off.
fn dashed_segments(points: &[(f64, f64)]) -> impl Iterator<Item = Vec<(f64, f64)>> + '_ {
    points
        .windows(2)
        .enumerate()
        .filter(|(i, _)| (i / 2) % 2 == 0)
        .map(|(_, w)| w.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EnvelopeSample, FitWindow, Sample, SeriesVariant};
    use crate::fit::envelope::EnvelopeBand;
    use crate::plot::{CurveTrace, RatioPoint};

    #[test]
    fn dashes_skip_every_other_pair() {
        let pts: Vec<(f64, f64)> = (0..9).map(|i| (i as f64, 1.0)).collect();
        let segs: Vec<_> = dashed_segments(&pts).collect();
        assert_eq!(segs.len(), 4);
        assert_eq!(segs[0], vec![(0.0, 1.0), (1.0, 1.0)]);
        assert_eq!(segs[2], vec![(4.0, 1.0), (5.0, 1.0)]);
    }

    #[test]
    fn renders_svg_file() {
        let window = FitWindow { index: 0, lo: 100.0, hi: 200.0 };
        let trace = |variant, style, scale: f64| CurveTrace {
            variant,
            window,
            style,
            points: (0..10).map(|i| (100.0 + 10.0 * i as f64, scale * 100.0)).collect(),
        };
        let data = PlotData {
            title: "13 TeV C1N2 wino cross-sections".to_string(),
            x_range: (100.0, 200.0),
            samples: vec![Sample { mass: 150.0, xsec: 100.0, xsec_unc: 5.0 }],
            curves: vec![
                trace(SeriesVariant::Nominal, LineStyleTag::Solid, 1.0),
                trace(SeriesVariant::Up, LineStyleTag::Dashed, 1.05),
                trace(SeriesVariant::Down, LineStyleTag::Dashed, 0.95),
            ],
            band: EnvelopeBand {
                step: 10.0,
                samples: vec![EnvelopeSample { mass: 150.0, fraction: 0.05 }],
            },
            ratio: vec![RatioPoint { mass: 150.0, ratio: 1.0, err: 0.05 }],
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plot.svg");
        render_svg(&path, &data).unwrap();
        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
    }
}
