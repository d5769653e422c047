//! Horizontal bar chart rendering of importance rankings

use crate::data::DataTable;
use crate::error::{FeatimpError, Result};
use crate::importance::{ImportanceResult, PermutationImportance};
use crate::model::PredictFn;
use crate::plot::backend::{Color, PlotBackend, Surface, DEFAULT_PALETTE};
use ndarray::Array2;
use tracing::debug;

/// Renders a permutation importance ranking as a horizontal bar chart.
///
/// Score computation is delegated to [`PermutationImportance`]; drawing goes
/// through an injected [`PlotBackend`]. Bars reach the surface in the
/// inverse of the requested sort order, so an ascending ranking puts its
/// largest bar at the base of the axis; the returned scores keep the
/// requested order.
pub struct ImportanceChart<M: PredictFn> {
    engine: PermutationImportance<M>,
    backend: Option<Box<dyn PlotBackend>>,
    palette: Vec<Color>,
}

impl<M: PredictFn> ImportanceChart<M> {
    /// Create a chart over a prediction capability with default settings.
    pub fn new(model: M) -> Self {
        Self::from_engine(PermutationImportance::new(model))
    }

    /// Create a chart over a pre-configured engine.
    pub fn from_engine(engine: PermutationImportance<M>) -> Self {
        Self {
            engine,
            backend: None,
            palette: DEFAULT_PALETTE.to_vec(),
        }
    }

    /// Inject the plot backend used to open fresh surfaces.
    pub fn with_backend(mut self, backend: impl PlotBackend + 'static) -> Self {
        self.backend = Some(Box::new(backend));
        self
    }

    /// Replace the bar palette. An empty palette is ignored.
    pub fn with_palette(mut self, palette: Vec<Color>) -> Self {
        if !palette.is_empty() {
            self.palette = palette;
        }
        self
    }

    /// Set the sort order of the returned ranking.
    pub fn with_ascending(mut self, ascending: bool) -> Self {
        self.engine = self.engine.with_ascending(ascending);
        self
    }

    /// Set the random seed for reproducible sampling.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.engine = self.engine.with_seed(seed);
        self
    }

    /// Compute scores and draw them onto a fresh surface from the backend.
    ///
    /// Fails with `RenderBackendUnavailable` when no backend was injected.
    /// Returns the ranking together with the surface it was drawn on.
    pub fn render(&mut self, table: &DataTable) -> Result<(ImportanceResult, Box<dyn Surface>)> {
        let result = self.engine.compute(table)?;
        let surface = self.draw_on_fresh_surface(&result)?;
        Ok((result, surface))
    }

    /// Like [`ImportanceChart::render`], scoring against an externally
    /// supplied baseline instead of the model's own predictions.
    pub fn render_with_baseline(
        &mut self,
        table: &DataTable,
        baseline: &Array2<f64>,
    ) -> Result<(ImportanceResult, Box<dyn Surface>)> {
        let result = self.engine.compute_with_baseline(table, baseline)?;
        let surface = self.draw_on_fresh_surface(&result)?;
        Ok((result, surface))
    }

    /// Compute scores and draw them onto a caller-supplied surface.
    pub fn render_on(
        &self,
        table: &DataTable,
        surface: &mut dyn Surface,
    ) -> Result<ImportanceResult> {
        let result = self.engine.compute(table)?;
        self.draw(&result, surface)?;
        Ok(result)
    }

    /// Like [`ImportanceChart::render_on`], scoring against an externally
    /// supplied baseline.
    pub fn render_on_with_baseline(
        &self,
        table: &DataTable,
        baseline: &Array2<f64>,
        surface: &mut dyn Surface,
    ) -> Result<ImportanceResult> {
        let result = self.engine.compute_with_baseline(table, baseline)?;
        self.draw(&result, surface)?;
        Ok(result)
    }

    fn draw_on_fresh_surface(&mut self, result: &ImportanceResult) -> Result<Box<dyn Surface>> {
        let backend = self.backend.as_deref_mut().ok_or_else(|| {
            FeatimpError::RenderBackendUnavailable("No plot backend configured".to_string())
        })?;
        let mut surface = backend.new_surface()?;
        self.draw(result, surface.as_mut())?;
        Ok(surface)
    }

    fn draw(&self, result: &ImportanceResult, surface: &mut dyn Surface) -> Result<()> {
        // every independent call starts the palette cycle over
        let color = self.palette.first().copied().unwrap_or(DEFAULT_PALETTE[0]);
        let bars = result.scores_sorted(!result.ascending);
        debug!("drawing {} bars with color {}", bars.len(), color.to_hex());
        surface.draw_hbars(&bars, color)
    }
}
