use crate::core::loader::{DataLocation, DatasetLoader};
use crate::models::Dataset;
use crate::view::chart::chart_config;
use crate::view::table::{project_rows, TableBody};
use crate::view::widget::{ChartSlot, ChartWidget, Panel, Surface, ViewManager};
use anyhow::Result;
use tracing::{error, info};

/// Everything one dashboard session owns: the loaded snapshot, the table
/// body currently shown, and the single live chart.
///
/// Navigation handlers are plain methods; whatever dispatches UI events calls
/// them directly.
pub struct Session<V: ViewManager, W: ChartWidget> {
    dataset: Dataset,
    table: TableBody,
    views: V,
    widget: W,
    surface: Surface,
    chart: ChartSlot<W::Handle>,
}

impl<V: ViewManager, W: ChartWidget> Session<V, W> {
    pub fn new(views: V, widget: W) -> Self {
        Self {
            dataset: Dataset::default(),
            table: TableBody::default(),
            views,
            widget,
            surface: Surface::default(),
            chart: ChartSlot::default(),
        }
    }

    pub fn with_surface(mut self, surface: Surface) -> Self {
        self.surface = surface;
        self
    }

    /// Loads the dataset once. On success the table is rendered; on failure
    /// the table shows a single failure row and the dataset stays empty.
    /// The chart is left alone either way.
    pub async fn start(&mut self, loader: &DatasetLoader, location: &DataLocation) -> bool {
        match loader.load(location).await {
            Ok(dataset) => {
                self.dataset = dataset;
                self.render_table();
                true
            }
            Err(e) => {
                error!("Failed to load data: {:#}", e);
                self.dataset = Dataset::default();
                self.table = TableBody::load_failure();
                false
            }
        }
    }

    /// Replaces the table body with one row per record.
    pub fn render_table(&mut self) {
        self.table = TableBody::Rows(project_rows(&self.dataset));
    }

    /// Tears down the previous chart, then builds a fresh one from the
    /// current dataset.
    pub fn render_chart(&mut self) -> Result<()> {
        let config = chart_config(&self.dataset);
        let points = config.data.labels.len();
        let widget = &mut self.widget;
        let surface = &self.surface;
        self.chart.replace_with(|| widget.construct(surface, &config))?;
        info!(points, surface = %surface.0, "chart rendered");
        Ok(())
    }

    pub fn show_history(&mut self) {
        self.views.hide(Panel::Menu);
        self.views.show(Panel::History);
    }

    pub fn show_graph(&mut self) -> Result<()> {
        self.views.hide(Panel::Menu);
        self.views.show(Panel::Graph);
        self.render_chart()
    }

    pub fn back_to_menu(&mut self) {
        self.views.hide(Panel::History);
        self.views.hide(Panel::Graph);
        self.views.show(Panel::Menu);
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn table(&self) -> &TableBody {
        &self.table
    }

    pub fn views(&self) -> &V {
        &self.views
    }

    pub fn chart(&self) -> Option<&W::Handle> {
        self.chart.get()
    }
}
