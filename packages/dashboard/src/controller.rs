//! The dashboard controller.
//!
//! A [`DashboardController`] owns the loaded boundaries and statistics, the
//! current [`SelectionState`] and [`ViewMode`], and the most recently
//! rendered [`DashboardView`]. Every input change recomputes the view
//! synchronously; the selection and view are only replaced when the
//! recomputation succeeds.
//!
//! ```text
//! Unloaded --load--> Idle --apply/set_view_mode--> Idle --shutdown--> Closed
//! ```

use std::collections::BTreeSet;

use county_atlas_dashboard_models::view::{Binning, DashboardView};
use county_atlas_dashboard_models::{
    InvalidSelectionError, RawSelection, Scope, Selectable, SelectionState, ViewMode,
};
use county_atlas_geography::{BoundarySource, BoundaryStore};
use county_atlas_statistics::{StatisticsGenerator, StatisticsTable};
use county_atlas_statistics_models::period_label;
use rand::{Rng, SeedableRng as _, rngs::StdRng};
use strum_macros::{AsRefStr, Display};

use crate::export::ExportSink;
use crate::{DashboardConfig, DashboardError, filter, map_view, trend_view};

/// Lifecycle state of a [`DashboardController`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum DashboardState {
    /// Created, no data yet.
    Unloaded,
    /// Data loaded, waiting for input.
    Idle,
    /// Shut down; no further operations are accepted.
    Closed,
}

/// Controls the presentation layer reads a selection from.
///
/// Values are untrusted and validated exactly like a [`RawSelection`].
pub struct SelectionInputs<'a> {
    /// State dropdown (`"All States"` or a state name).
    pub state: &'a dyn Selectable<String>,
    /// County dropdown (`"All Counties"` or a county name).
    pub county: &'a dyn Selectable<String>,
    /// Metric dropdown (snake case metric name).
    pub metric: &'a dyn Selectable<String>,
    /// Time slider.
    pub time_index: &'a dyn Selectable<usize>,
    /// View toggle (`"map"` or `"trends"`), if the front end has one.
    pub view_mode: Option<&'a dyn Selectable<String>>,
}

impl SelectionInputs<'_> {
    /// Snapshot of the current control values.
    #[must_use]
    pub fn read(&self) -> RawSelection {
        RawSelection {
            state: self.state.current(),
            county: self.county.current(),
            metric: self.metric.current(),
            time_index: self.time_index.current(),
        }
    }
}

/// Loaded data plus the committed selection and view.
struct Session {
    store: BoundaryStore,
    table: StatisticsTable,
    selection: SelectionState,
    view_mode: ViewMode,
    view: DashboardView,
}

enum Phase {
    Unloaded,
    Ready(Box<Session>),
    Closed,
}

/// Owns one dashboard's data and selection.
pub struct DashboardController {
    config: DashboardConfig,
    binning: Binning,
    phase: Phase,
}

impl std::fmt::Debug for DashboardController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardController")
            .field("state", &self.state())
            .field("binning", &self.binning)
            .finish_non_exhaustive()
    }
}

impl DashboardController {
    /// Creates an unloaded controller.
    #[must_use]
    pub fn new(config: DashboardConfig) -> Self {
        let binning = config.map.binning();
        Self {
            config,
            binning,
            phase: Phase::Unloaded,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> DashboardState {
        match self.phase {
            Phase::Unloaded => DashboardState::Unloaded,
            Phase::Ready(_) => DashboardState::Idle,
            Phase::Closed => DashboardState::Closed,
        }
    }

    /// Configuration this controller was created with.
    #[must_use]
    pub const fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Loads boundaries from `source` and generates statistics with a
    /// generator seeded by `seed`.
    ///
    /// # Errors
    ///
    /// See [`Self::load_with_rng`].
    pub fn load(&mut self, source: &BoundarySource, seed: u64) -> Result<(), DashboardError> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.load_with_rng(source, &mut rng)
    }

    /// Loads boundaries from `source` and generates statistics drawing
    /// from `rng`.
    ///
    /// # Errors
    ///
    /// * [`DashboardError::NotReady`] if the controller is closed.
    /// * [`DashboardError::Boundary`] if the boundaries are invalid.
    /// * [`DashboardError::Stats`] if generation fails.
    pub fn load_with_rng<R: Rng>(
        &mut self,
        source: &BoundarySource,
        rng: &mut R,
    ) -> Result<(), DashboardError> {
        self.ensure_open()?;
        let store = BoundaryStore::load(source, &self.config.boundaries.load_options())?;
        let range = self.config.statistics.time_range();
        let table = StatisticsGenerator::default().generate(store.counties(), &range, rng)?;
        self.load_with(store, table)
    }

    /// Installs already-loaded data and renders the initial view: every
    /// state and county, population, the latest period, map mode.
    ///
    /// Reloading an idle controller replaces its data and resets the
    /// selection.
    ///
    /// # Errors
    ///
    /// * [`DashboardError::NotReady`] if the controller is closed.
    /// * [`DashboardError::Selection`] if `table` has no periods.
    pub fn load_with(
        &mut self,
        store: BoundaryStore,
        table: StatisticsTable,
    ) -> Result<(), DashboardError> {
        self.ensure_open()?;

        let selection = SelectionState::initial(table.dates().len());
        let view_mode = ViewMode::default();
        let view = compute(&store, &table, &selection, view_mode, &self.binning)?;

        log::info!(
            "Dashboard loaded: {} boundaries, {} statistics rows over {} periods",
            store.len(),
            table.len(),
            table.dates().len()
        );

        self.phase = Phase::Ready(Box::new(Session {
            store,
            table,
            selection,
            view_mode,
            view,
        }));
        Ok(())
    }

    /// Applies a new selection and re-renders the active view.
    ///
    /// # Errors
    ///
    /// * [`DashboardError::NotReady`] if the controller is not loaded.
    /// * [`DashboardError::Selection`] if the time index is out of range;
    ///   the previous selection and view are kept.
    pub fn apply(&mut self, selection: SelectionState) -> Result<&DashboardView, DashboardError> {
        let binning = self.binning.clone();
        let session = self.session_mut()?;
        let view_mode = session.view_mode;
        session.commit(selection, view_mode, &binning)
    }

    /// Validates untrusted selection values and applies them.
    ///
    /// # Errors
    ///
    /// As [`Self::apply`], plus [`DashboardError::Selection`] for an
    /// unknown metric name.
    pub fn apply_raw(&mut self, raw: &RawSelection) -> Result<&DashboardView, DashboardError> {
        self.ensure_ready()?;
        let selection = raw.parse().inspect_err(log_rejected)?;
        self.apply(selection)
    }

    /// Reads every control and applies the result as one change.
    ///
    /// # Errors
    ///
    /// As [`Self::apply_raw`], plus [`DashboardError::Selection`] for an
    /// unknown view mode.
    pub fn apply_inputs(
        &mut self,
        inputs: &SelectionInputs<'_>,
    ) -> Result<&DashboardView, DashboardError> {
        let binning = self.binning.clone();
        let session = self.session_mut()?;

        let selection = inputs.read().parse().inspect_err(log_rejected)?;
        let view_mode = match inputs.view_mode {
            Some(control) => ViewMode::parse(&control.current()).inspect_err(log_rejected)?,
            None => session.view_mode,
        };
        session.commit(selection, view_mode, &binning)
    }

    /// Switches between map and trend views, re-rendering with the
    /// current selection.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::NotReady`] if the controller is not
    /// loaded.
    pub fn set_view_mode(&mut self, view_mode: ViewMode) -> Result<&DashboardView, DashboardError> {
        let binning = self.binning.clone();
        let session = self.session_mut()?;
        let selection = session.selection.clone();
        session.commit(selection, view_mode, &binning)
    }

    /// The most recently rendered view.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::NotReady`] if the controller is not
    /// loaded.
    pub fn current_view(&self) -> Result<&DashboardView, DashboardError> {
        Ok(&self.session()?.view)
    }

    /// The committed selection.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::NotReady`] if the controller is not
    /// loaded.
    pub fn selection(&self) -> Result<&SelectionState, DashboardError> {
        Ok(&self.session()?.selection)
    }

    /// The committed view mode.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::NotReady`] if the controller is not
    /// loaded.
    pub fn view_mode(&self) -> Result<ViewMode, DashboardError> {
        Ok(self.session()?.view_mode)
    }

    /// Loaded boundaries.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::NotReady`] if the controller is not
    /// loaded.
    pub fn boundaries(&self) -> Result<&BoundaryStore, DashboardError> {
        Ok(&self.session()?.store)
    }

    /// Loaded statistics.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::NotReady`] if the controller is not
    /// loaded.
    pub fn statistics(&self) -> Result<&StatisticsTable, DashboardError> {
        Ok(&self.session()?.table)
    }

    /// State dropdown options: "All States" followed by every state with
    /// boundaries, alphabetically.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::NotReady`] if the controller is not
    /// loaded.
    pub fn available_states(&self) -> Result<Vec<String>, DashboardError> {
        let session = self.session()?;
        Ok(std::iter::once(Scope::ALL_STATES_LABEL.to_string())
            .chain(session.store.states().into_iter().map(str::to_string))
            .collect())
    }

    /// County dropdown options for the committed state filter: "All
    /// Counties" followed by county names, alphabetically and without
    /// repeats.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::NotReady`] if the controller is not
    /// loaded.
    pub fn available_counties(&self) -> Result<Vec<String>, DashboardError> {
        let session = self.session()?;
        let names: BTreeSet<&str> = match &session.selection.state {
            Scope::All => session
                .store
                .counties()
                .iter()
                .map(|c| c.name.as_str())
                .collect(),
            Scope::Named(state) => session.store.counties_in_state(state).into_iter().collect(),
        };
        Ok(std::iter::once(Scope::ALL_COUNTIES_LABEL.to_string())
            .chain(names.into_iter().map(str::to_string))
            .collect())
    }

    /// Time slider labels, one per period in ascending order.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::NotReady`] if the controller is not
    /// loaded.
    pub fn time_labels(&self) -> Result<Vec<String>, DashboardError> {
        Ok(self
            .session()?
            .table
            .dates()
            .iter()
            .map(|d| period_label(*d))
            .collect())
    }

    /// Hands the statistics table and boundaries to `sink`.
    ///
    /// # Errors
    ///
    /// * [`DashboardError::NotReady`] if the controller is not loaded.
    /// * [`DashboardError::Export`] if the sink fails.
    pub fn export(&self, sink: &mut dyn ExportSink) -> Result<(), DashboardError> {
        let session = self.session()?;
        sink.write_table(session.table.records())?;
        sink.write_geometry(&session.store)?;
        Ok(())
    }

    /// Optionally exports, then closes the controller and drops its data.
    ///
    /// An unloaded controller can be closed without a sink. If the export
    /// fails the controller stays open.
    ///
    /// # Errors
    ///
    /// * [`DashboardError::NotReady`] if already closed, or if a sink is
    ///   given but nothing is loaded.
    /// * [`DashboardError::Export`] if the sink fails.
    pub fn shutdown(&mut self, sink: Option<&mut dyn ExportSink>) -> Result<(), DashboardError> {
        self.ensure_open()?;
        if let Some(sink) = sink {
            self.export(sink)?;
        }
        self.phase = Phase::Closed;
        log::info!("Dashboard closed");
        Ok(())
    }

    fn not_ready(&self) -> DashboardError {
        DashboardError::NotReady {
            state: self.state(),
        }
    }

    fn ensure_open(&self) -> Result<(), DashboardError> {
        match self.phase {
            Phase::Closed => Err(self.not_ready()),
            Phase::Unloaded | Phase::Ready(_) => Ok(()),
        }
    }

    fn ensure_ready(&self) -> Result<(), DashboardError> {
        self.session().map(|_| ())
    }

    fn session(&self) -> Result<&Session, DashboardError> {
        match &self.phase {
            Phase::Ready(session) => Ok(&**session),
            Phase::Unloaded | Phase::Closed => Err(self.not_ready()),
        }
    }

    fn session_mut(&mut self) -> Result<&mut Session, DashboardError> {
        let err = self.not_ready();
        match &mut self.phase {
            Phase::Ready(session) => Ok(&mut **session),
            Phase::Unloaded | Phase::Closed => Err(err),
        }
    }
}

impl Session {
    /// Renders `selection` in `view_mode` and, on success, makes both
    /// current.
    fn commit(
        &mut self,
        selection: SelectionState,
        view_mode: ViewMode,
        binning: &Binning,
    ) -> Result<&DashboardView, DashboardError> {
        let view = compute(&self.store, &self.table, &selection, view_mode, binning)
            .inspect_err(log_rejected)?;
        self.selection = selection;
        self.view_mode = view_mode;
        self.view = view;
        Ok(&self.view)
    }
}

fn log_rejected(err: &InvalidSelectionError) {
    log::warn!("Rejected selection: {err}");
}

/// Filters and renders one view. A valid selection that matches no rows
/// becomes [`DashboardView::NoData`].
fn compute(
    store: &BoundaryStore,
    table: &StatisticsTable,
    selection: &SelectionState,
    view_mode: ViewMode,
    binning: &Binning,
) -> Result<DashboardView, InvalidSelectionError> {
    let slice = filter::filter_with_dates(table.records(), table.dates(), store.counties(), selection)?;

    let rendered = match view_mode {
        ViewMode::Map => {
            map_view::render(&slice.snapshot, slice.metric(), &slice.geometries, binning)
                .map(DashboardView::Map)
        }
        ViewMode::Trends => trend_view::render(
            &slice.trend,
            slice.metric(),
            trend_view::grouping_for(&selection.county),
        )
        .map(DashboardView::Trend),
    };

    Ok(rendered.unwrap_or_else(|err| {
        log::debug!("No data for {}: {err}", selection.describe());
        DashboardView::NoData {
            reason: err.to_string(),
        }
    }))
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use county_atlas_dashboard_models::view::TrendGrouping;
    use county_atlas_dashboard_models::{Dropdown, Slider};
    use county_atlas_geography::{BoundarySource, LoadOptions, sample};
    use county_atlas_statistics_models::{Metric, StatRecord, TimeRange};

    use crate::export::ExportError;

    use super::*;

    fn config() -> DashboardConfig {
        DashboardConfig::from_toml_str("[statistics]\nend_date = \"2025-06-30\"\n").unwrap()
    }

    fn sample_source(count: usize) -> BoundarySource {
        BoundarySource::Text(sample::sample_feature_collection(count).to_string())
    }

    fn loaded(count: usize) -> DashboardController {
        let mut controller = DashboardController::new(config());
        controller.load(&sample_source(count), 42).unwrap();
        controller
    }

    /// A control whose value the test sets directly.
    struct Fixed<T>(RefCell<T>);

    impl<T: Clone> Selectable<T> for Fixed<T> {
        fn current(&self) -> T {
            self.0.borrow().clone()
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        rows: usize,
        boundaries: usize,
        fail: bool,
    }

    impl ExportSink for RecordingSink {
        fn write_table(&mut self, records: &[StatRecord]) -> Result<(), ExportError> {
            if self.fail {
                return Err(ExportError::Io(std::io::Error::other("disk full")));
            }
            self.rows = records.len();
            Ok(())
        }

        fn write_geometry(&mut self, store: &BoundaryStore) -> Result<(), ExportError> {
            self.boundaries = store.len();
            Ok(())
        }
    }

    #[test]
    fn full_scale_load() {
        let controller = loaded(sample::US_COUNTY_COUNT);
        let table = controller.statistics().unwrap();
        assert_eq!(controller.boundaries().unwrap().len(), 3_143);
        assert_eq!(table.len(), 37_716);
        assert_eq!(table.dates().len(), 12);
        assert_eq!(table.county_count(), 3_143);

        let map = controller.current_view().unwrap().as_map().unwrap();
        assert_eq!(map.metric, Metric::Population);
        assert_eq!(map.features.len(), 3_143);
        assert_eq!(map.styled_count(), 3_143);
        assert_eq!(controller.selection().unwrap().time_index, 11);
        assert_eq!(controller.view_mode().unwrap(), ViewMode::Map);
    }

    #[test]
    fn california_unemployment_map() {
        let mut controller = loaded(sample::US_COUNTY_COUNT);
        let selection = SelectionState::initial(12)
            .with_state(Scope::named("California"))
            .with_metric(Metric::UnemploymentRate)
            .with_time_index(11);

        let view = controller.apply(selection).unwrap().clone();
        let map = view.as_map().unwrap();
        assert_eq!(map.metric, Metric::UnemploymentRate);
        assert!(!map.features.is_empty());
        assert!(map.features.iter().all(|f| f.state == "California"));
        assert_eq!(map.styled_count(), map.features.len());
        assert_eq!(map.date, controller.statistics().unwrap().dates()[11]);
        let summary = map.summary.unwrap();
        assert!(summary.min >= 1.0 && summary.max <= 15.0);
    }

    #[test]
    fn all_counties_trend_is_one_series() {
        let mut controller = loaded(200);
        let chart = controller
            .set_view_mode(ViewMode::Trends)
            .unwrap()
            .as_trend()
            .unwrap()
            .clone();
        assert_eq!(chart.grouping, TrendGrouping::Aggregate);
        assert_eq!(chart.series.len(), 1);
        assert_eq!(chart.series[0].points.len(), 12);
        assert_eq!(chart.series[0].label, "All States (mean)");
        assert_eq!(controller.view_mode().unwrap(), ViewMode::Trends);
    }

    #[test]
    fn named_county_trend_per_county() {
        let mut controller = loaded(200);
        let state = controller.available_states().unwrap()[1].clone();
        let county = controller.boundaries().unwrap().counties_in_state(&state)[0].to_string();
        controller.set_view_mode(ViewMode::Trends).unwrap();

        let selection = SelectionState::initial(12)
            .with_state(Scope::named(state.clone()))
            .with_county(Scope::named(county.clone()));
        let chart = controller.apply(selection).unwrap().as_trend().unwrap();
        assert_eq!(chart.grouping, TrendGrouping::PerCounty);
        assert_eq!(chart.series.len(), 1);
        assert_eq!(chart.series[0].label, format!("{county}, {state}"));
    }

    #[test]
    fn invalid_selection_keeps_previous_state() {
        let mut controller = loaded(50);
        let before = controller.current_view().unwrap().clone();

        let err = controller
            .apply(SelectionState::initial(12).with_time_index(12))
            .unwrap_err();
        assert!(matches!(
            err,
            DashboardError::Selection(InvalidSelectionError::TimeIndexOutOfRange {
                index: 12,
                len: 12
            })
        ));

        let raw = RawSelection {
            state: "All States".into(),
            county: "All Counties".into(),
            metric: "happiness".into(),
            time_index: 0,
        };
        assert!(matches!(
            controller.apply_raw(&raw),
            Err(DashboardError::Selection(
                InvalidSelectionError::UnknownMetric { .. }
            ))
        ));

        assert_eq!(controller.current_view().unwrap(), &before);
        assert_eq!(controller.selection().unwrap(), &SelectionState::initial(12));
    }

    #[test]
    fn missing_county_shows_no_data() {
        let mut controller = loaded(50);
        let selection = SelectionState::initial(12)
            .with_state(Scope::named("Alabama"))
            .with_county(Scope::named("Atlantis"));

        let view = controller.apply(selection.clone()).unwrap();
        assert!(matches!(view, DashboardView::NoData { .. }));
        assert_eq!(controller.selection().unwrap(), &selection);

        let view = controller.set_view_mode(ViewMode::Trends).unwrap();
        assert!(matches!(view, DashboardView::NoData { .. }));
    }

    #[test]
    fn inputs_drive_selection_and_mode() {
        let mut controller = loaded(100);
        let states = controller.available_states().unwrap();
        let mut state_dropdown = Dropdown::new(states).unwrap();
        assert!(state_dropdown.select(&"Ohio".to_string()));

        let county = Dropdown::new(vec![Scope::ALL_COUNTIES_LABEL.to_string()]).unwrap();
        let metric = Fixed(RefCell::new("median_income".to_string()));
        let slider = Slider::new(0, 11, 3);
        let mode = Fixed(RefCell::new("trends".to_string()));

        let inputs = SelectionInputs {
            state: &state_dropdown,
            county: &county,
            metric: &metric,
            time_index: &slider,
            view_mode: Some(&mode),
        };

        let chart = controller.apply_inputs(&inputs).unwrap().as_trend().unwrap();
        assert_eq!(chart.metric, Metric::MedianIncome);
        assert_eq!(chart.series[0].label, "Ohio (mean)");

        let selection = controller.selection().unwrap();
        assert_eq!(selection.state, Scope::named("Ohio"));
        assert_eq!(selection.county, Scope::All);
        assert_eq!(selection.time_index, 3);

        mode.0.replace("table".to_string());
        assert!(matches!(
            controller.apply_inputs(&inputs),
            Err(DashboardError::Selection(
                InvalidSelectionError::UnknownViewMode { .. }
            ))
        ));
        assert_eq!(controller.view_mode().unwrap(), ViewMode::Trends);
    }

    #[test]
    fn dropdown_options() {
        let mut controller = loaded(120);
        let states = controller.available_states().unwrap();
        assert_eq!(states[0], "All States");
        assert!(states.windows(2).skip(1).all(|w| w[0] < w[1]));

        let counties = controller.available_counties().unwrap();
        assert_eq!(counties[0], "All Counties");
        assert!(counties.len() > 1);

        controller
            .apply(SelectionState::initial(12).with_state(Scope::named("Ohio")))
            .unwrap();
        let ohio = controller.available_counties().unwrap();
        assert_eq!(
            ohio.len() - 1,
            controller.boundaries().unwrap().counties_in_state("Ohio").len()
        );

        let labels = controller.time_labels().unwrap();
        assert_eq!(labels.len(), 12);
        assert_eq!(labels[11], "Jun 2025");
        assert_eq!(labels[0], "Jul 2024");
    }

    #[test]
    fn state_names_are_snake_case() {
        assert_eq!(DashboardState::Unloaded.to_string(), "unloaded");
        assert_eq!(DashboardState::Idle.as_ref(), "idle");
        assert_eq!(DashboardState::Closed.to_string(), "closed");
    }

    #[test]
    fn unloaded_and_closed_reject_operations() {
        let mut controller = DashboardController::new(DashboardConfig::default());
        assert_eq!(controller.state(), DashboardState::Unloaded);
        assert!(matches!(
            controller.current_view(),
            Err(DashboardError::NotReady {
                state: DashboardState::Unloaded
            })
        ));
        assert!(controller.set_view_mode(ViewMode::Trends).is_err());
        assert!(controller.shutdown(Some(&mut RecordingSink::default())).is_err());

        controller.shutdown(None).unwrap();
        assert_eq!(controller.state(), DashboardState::Closed);
        assert!(matches!(
            controller.load(&sample_source(5), 1),
            Err(DashboardError::NotReady {
                state: DashboardState::Closed
            })
        ));
        assert!(controller.shutdown(None).is_err());
    }

    #[test]
    fn shutdown_exports_then_closes() {
        let mut controller = loaded(30);
        let mut failing = RecordingSink {
            fail: true,
            ..RecordingSink::default()
        };
        assert!(matches!(
            controller.shutdown(Some(&mut failing)),
            Err(DashboardError::Export(_))
        ));
        assert_eq!(controller.state(), DashboardState::Idle);

        let mut sink = RecordingSink::default();
        controller.shutdown(Some(&mut sink)).unwrap();
        assert_eq!(sink.rows, 30 * 12);
        assert_eq!(sink.boundaries, 30);
        assert_eq!(controller.state(), DashboardState::Closed);
        assert!(controller.statistics().is_err());
    }

    #[test]
    fn load_with_prebuilt_data() {
        let store =
            BoundaryStore::load(&sample_source(10), &LoadOptions::default()).unwrap();
        let range = TimeRange::ending_at(chrono::NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(), 4);
        let table = StatisticsGenerator::default()
            .generate_seeded(store.counties(), &range, 3)
            .unwrap();

        let mut controller = DashboardController::new(DashboardConfig::default());
        controller.load_with(store, table).unwrap();
        assert_eq!(controller.state(), DashboardState::Idle);
        assert_eq!(controller.selection().unwrap().time_index, 3);
        assert_eq!(controller.time_labels().unwrap()[3], "Dec 2024");
    }

    #[test]
    fn same_seed_same_view() {
        let a = loaded(40);
        let b = loaded(40);
        assert_eq!(a.statistics().unwrap(), b.statistics().unwrap());
        assert_eq!(a.current_view().unwrap(), b.current_view().unwrap());
    }
}
