use clap::ValueEnum;
use std::error::Error;
use std::path::Path;
use std::sync::Arc;
use svg::node::element::{Line, Polyline};
use svg::Document;
use wavedft::{DftError, Progress, ProgressObserver, Strategy, Transform};

pub const CHART_WIDTH: f64 = 800.0;
pub const CHART_HEIGHT: f64 = 300.0;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrategyArg {
    Direct,
    Fast,
    Parallel,
}

fn log_progress(p: Progress) {
    log::info!("{:?}: {}%", p.direction, p.percent());
}

impl StrategyArg {
    /// The library strategy this flag selects.
    pub fn to_strategy(self, partitions: usize, threads: Option<usize>) -> Strategy {
        match self {
            StrategyArg::Direct => Strategy::Direct,
            StrategyArg::Fast => Strategy::Fast,
            StrategyArg::Parallel => Strategy::Parallel {
                partitions,
                threads,
            },
        }
    }
}

/// Build the selected transform, logging progress at `info` level.
pub fn build_transform(
    strategy: StrategyArg,
    partitions: usize,
    threads: Option<usize>,
) -> Result<Box<dyn Transform>, DftError> {
    strategy
        .to_strategy(partitions, threads)
        .build_observed(Some(Arc::new(log_progress) as Arc<dyn ProgressObserver>))
}

/// Largest absolute per-sample difference; `None` when the lengths differ.
pub fn max_abs_diff(a: &[i32], b: &[i32]) -> Option<i64> {
    if a.len() != b.len() {
        return None;
    }
    Some(
        a.iter()
            .zip(b)
            .map(|(&x, &y)| (x as i64 - y as i64).abs())
            .max()
            .unwrap_or(0),
    )
}

/// Map `(xs[i], ys[i])` into a `width` x `height` box with the y axis pointing up.
pub fn chart_points(xs: &[f64], ys: &[f64], width: f64, height: f64) -> Vec<(f64, f64)> {
    let range = |v: &[f64]| {
        v.iter()
            .filter(|x| x.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
                (lo.min(x), hi.max(x))
            })
    };
    let (x_lo, x_hi) = range(xs);
    let (y_lo, y_hi) = range(ys);
    let span = |lo: f64, hi: f64| if hi > lo { hi - lo } else { 1.0 };
    let (x_span, y_span) = (span(x_lo, x_hi), span(y_lo, y_hi));
    xs.iter()
        .zip(ys)
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .map(|(&x, &y)| {
            (
                (x - x_lo) / x_span * width,
                height - (y - y_lo) / y_span * height,
            )
        })
        .collect()
}

fn save_chart(xs: &[f64], ys: &[f64], path: &Path, title: &str) -> Result<(), Box<dyn Error>> {
    let points: Vec<String> = chart_points(xs, ys, CHART_WIDTH, CHART_HEIGHT)
        .into_iter()
        .map(|(x, y)| format!("{x:.2},{y:.2}"))
        .collect();
    let axis = |x1, y1, x2, y2| {
        Line::new()
            .set("x1", x1)
            .set("y1", y1)
            .set("x2", x2)
            .set("y2", y2)
            .set("stroke", "black")
    };
    let document = Document::new()
        .set("viewBox", (0, 0, CHART_WIDTH, CHART_HEIGHT))
        .add(svg::node::element::Title::new(title))
        .add(axis(0.0, CHART_HEIGHT, CHART_WIDTH, CHART_HEIGHT))
        .add(axis(0.0, 0.0, 0.0, CHART_HEIGHT))
        .add(
            Polyline::new()
                .set("fill", "none")
                .set("stroke", "steelblue")
                .set("stroke-width", 1)
                .set("points", points.join(" ")),
        );
    svg::save(path, &document)?;
    Ok(())
}

/// Amplitude against frequency.
pub fn save_spectrum_svg(
    frequency: &[f64],
    amplitude: &[f64],
    path: &Path,
) -> Result<(), Box<dyn Error>> {
    save_chart(frequency, amplitude, path, "amplitude / frequency (Hz)")
}

/// Samples against time.
pub fn save_waveform_svg(time: &[f64], samples: &[i32], path: &Path) -> Result<(), Box<dyn Error>> {
    let ys: Vec<f64> = samples.iter().map(|&s| s as f64).collect();
    save_chart(time, &ys, path, "samples / time (s)")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn diff_of_equal_slices_is_zero() {
        assert_eq!(max_abs_diff(&[1, -2, 3], &[1, -2, 3]), Some(0));
        assert_eq!(max_abs_diff(&[i32::MIN], &[i32::MAX]), Some(u32::MAX as i64));
        assert_eq!(max_abs_diff(&[1], &[]), None);
    }

    #[test]
    fn points_fill_the_box() {
        let pts = chart_points(&[0.0, 1.0, 2.0], &[0.0, 4.0, 2.0], 100.0, 50.0);
        assert_eq!(pts, vec![(0.0, 50.0), (50.0, 0.0), (100.0, 25.0)]);
    }

    #[test]
    fn flat_series_does_not_divide_by_zero() {
        let pts = chart_points(&[3.0, 3.0], &[7.0, 7.0], 10.0, 10.0);
        assert!(pts.iter().all(|(x, y)| x.is_finite() && y.is_finite()));
    }

    #[test]
    fn saves_svg_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spectrum.svg");
        save_spectrum_svg(&[0.0, 1.0, 2.0], &[0.0, 2.0, 0.5], &path).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("<svg"));
        assert!(content.contains("polyline"));
    }

    #[test]
    fn builds_every_strategy() {
        for s in [StrategyArg::Direct, StrategyArg::Fast, StrategyArg::Parallel] {
            let t = build_transform(s, 4, Some(2)).unwrap();
            let half = t.forward_half(&[1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
            assert_eq!(half.len(), 5);
        }
        assert!(build_transform(StrategyArg::Parallel, 0, None).is_err());
    }

    #[test]
    fn flags_map_onto_library_strategies() {
        assert_eq!(StrategyArg::Fast.to_strategy(8, None), Strategy::Fast);
        assert_eq!(StrategyArg::Direct.to_strategy(8, Some(3)), Strategy::Direct);
        assert_eq!(
            StrategyArg::Parallel.to_strategy(5, Some(3)),
            Strategy::Parallel {
                partitions: 5,
                threads: Some(3)
            }
        );
    }
}
