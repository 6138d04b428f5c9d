//! Rendering a [`Figure`] in an egui window.

use eframe::egui::{self, Color32};
use egui_plot::{Legend, Line, MarkerShape, Plot, PlotBounds, PlotPoints, Points};

use crate::{Figure, Marker, Rgb, TrialStyle};

/// Configuration for rendering a [`Figure`].
///
/// Construct with [`ShowConfig::new`] and chain builder methods as needed.
///
/// # Example
///
/// ```ignore
/// figure.show(ShowConfig::new().title("Rosenbrock trials").legend())?;
/// ```
pub struct ShowConfig {
    title: Option<String>,
    legend: bool,
}

impl ShowConfig {
    /// Creates a new `ShowConfig` with defaults: no title, no legend.
    #[must_use]
    pub fn new() -> Self {
        Self {
            title: None,
            legend: false,
        }
    }

    /// Sets the window title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Enables a legend labeling each trajectory by name.
    #[must_use]
    pub fn legend(mut self) -> Self {
        self.legend = true;
        self
    }
}

impl Default for ShowConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Figure {
    /// Opens a blocking egui window displaying the figure.
    ///
    /// Blocks until the window is closed by the user.
    ///
    /// # Errors
    ///
    /// Returns an error if the native window cannot be created.
    pub fn show(self, config: ShowConfig) -> Result<(), eframe::Error> {
        let options = eframe::NativeOptions::default();
        let title = config.title.unwrap_or_default();

        eframe::run_native(
            &title,
            options,
            Box::new(move |_cc| {
                Ok(Box::new(FigureApp {
                    figure: self,
                    legend: config.legend,
                }))
            }),
        )
    }
}

/// The egui [`eframe::App`] that renders a figure.
struct FigureApp {
    figure: Figure,
    legend: bool,
}

impl eframe::App for FigureApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let (min, max) = self.figure.axis_limits();

            // Fixed axes: the limits are the figure domain.
            let mut plot = Plot::new("waypoint_figure")
                .allow_drag(false)
                .allow_zoom(false)
                .allow_scroll(false)
                .allow_boxed_zoom(false)
                .allow_double_click_reset(false);
            if self.legend {
                plot = plot.legend(Legend::default());
            }

            plot.show(ui, |plot_ui| {
                plot_ui.set_plot_bounds(PlotBounds::from_min_max(min, max));

                let contour_color = color(Rgb::GRAY);
                for contour in self.figure.contours() {
                    for line in &contour.lines {
                        let points: PlotPoints = line.iter().copied().collect();
                        plot_ui.line(Line::new(points).color(contour_color).width(0.5_f32));
                    }
                }

                for series in self.figure.series() {
                    let style_color = color(series.style.color);
                    let path: PlotPoints = series.points.iter().copied().collect();
                    plot_ui.line(Line::new(path).color(style_color).name(&series.name));

                    let markers: PlotPoints = series.points.iter().copied().collect();
                    plot_ui.points(
                        Points::new(markers)
                            .shape(shape(series.style.marker))
                            .radius(2.5_f32)
                            .color(style_color)
                            .name(&series.name),
                    );

                    if let Some(last) = series.final_point() {
                        plot_ui.points(
                            Points::new(PlotPoints::from(vec![last]))
                                .shape(MarkerShape::Circle)
                                .radius(5.0_f32)
                                .filled(true)
                                .color(color(TrialStyle::FINAL)),
                        );
                    }
                }
            });
        });
    }
}

fn color(Rgb(r, g, b): Rgb) -> Color32 {
    Color32::from_rgb(r, g, b)
}

fn shape(marker: Marker) -> MarkerShape {
    match marker {
        Marker::Circle => MarkerShape::Circle,
        Marker::Cross => MarkerShape::Cross,
    }
}
