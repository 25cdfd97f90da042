use eframe::egui::{Align2, Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoint, PlotPoints, Points, Text};

use crate::color::ColorMap;
use rusty_convert::data::chart::{ChartData, ChartKind, XAxis};

const SERIES_COLOR: Color32 = Color32::LIGHT_BLUE;

// ---------------------------------------------------------------------------
// Chart plot
// ---------------------------------------------------------------------------

/// Draw a validated chart.
pub fn chart_plot(ui: &mut Ui, id_salt: &str, chart: &ChartData) {
    ui.strong(chart.title);

    let mut plot = Plot::new(id_salt)
        .legend(Legend::default())
        .x_axis_label(chart.x_label.clone())
        .y_axis_label(chart.y_label.clone())
        .height(320.0)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true);

    let color_map = match &chart.x_axis {
        XAxis::Categorical(labels) => {
            let axis_labels = labels.clone();
            plot = plot.x_axis_formatter(move |mark, _range| {
                let pos = mark.value;
                if pos < 0.0 || (pos - pos.round()).abs() > 1e-6 {
                    return String::new();
                }
                axis_labels
                    .get(pos.round() as usize)
                    .cloned()
                    .unwrap_or_default()
            });
            Some((ColorMap::new(labels), labels))
        }
        XAxis::Numeric => None,
    };

    let name = chart.y_label.as_str();
    plot.show(ui, |plot_ui| match chart.kind {
        ChartKind::Bar => {
            let bars: Vec<Bar> = chart
                .points
                .iter()
                .map(|&[x, y]| {
                    let color = color_map
                        .as_ref()
                        .and_then(|(cm, labels)| {
                            labels.get(x as usize).map(|l| cm.color_for(l))
                        })
                        .unwrap_or(SERIES_COLOR);
                    Bar::new(x, y).fill(color)
                })
                .collect();
            plot_ui.bar_chart(BarChart::new(bars).name(name).color(SERIES_COLOR));
            for &[x, y] in &chart.points {
                plot_ui.text(
                    Text::new(PlotPoint::new(x, y), format!("{y}"))
                        .anchor(Align2::CENTER_BOTTOM),
                );
            }
        }
        ChartKind::Line => {
            let points: PlotPoints = chart.points.clone().into();
            plot_ui.line(Line::new(points).name(name).color(SERIES_COLOR).width(1.5));
            plot_ui.points(
                Points::new(chart.points.clone())
                    .radius(3.0)
                    .color(SERIES_COLOR),
            );
        }
        ChartKind::Scatter => {
            plot_ui.points(
                Points::new(chart.points.clone())
                    .name(name)
                    .radius(5.0)
                    .color(SERIES_COLOR),
            );
        }
    });
}
