//! Client-side view state: the base lists, the search projection, the single
//! selection and the derived export URI.
//!
//! # Selection
//!
//! ```text
//!                check X                   check Y
//! NoSelection ──────────▶ OneSelected(X) ──────────▶ OneSelected(Y)
//!      ▲                        │
//!      └────── uncheck X ───────┘
//! ```
//!
//! Checking an instrument clears the flag on every other instrument of the
//! current projection. With [`SelectionScope::Projection`] instruments hidden
//! by the search keep whatever flag they had; [`SelectionScope::All`] clears
//! the whole base list.
//!
//! # Sorting
//!
//! Stock, industry and currency-code sorts reorder the projection. A sector
//! sort reorders the base list only, so it becomes visible after the next
//! search recompute.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use tracing::{debug, warn};

use crate::data_source::{Collection, DataSource, SourceError};
use crate::export::{generate_export_uri, TrustedUri};
use crate::search::{filter_instruments, SearchTerm};
use crate::sorting::{
    sort_instruments, sort_value_records, InstrumentSortCriteria, SortOrder, SortTarget,
    ValueSortCriteria,
};
use crate::{
    ConfigError, CoreError, Instrument, InstrumentId, SelectableInstrument, ValueRecord,
};

/// Which instruments lose their flag when another one is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionScope {
    /// Only instruments in the current projection.
    #[default]
    Projection,
    /// Every instrument in the base list.
    All,
}

impl SelectionScope {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Projection => "projection",
            Self::All => "all",
        }
    }
}

impl FromStr for SelectionScope {
    type Err = ConfigError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "projection" | "filtered" => Ok(Self::Projection),
            "all" | "full" => Ok(Self::All),
            _ => Err(ConfigError::InvalidSelectionScope {
                value: input.to_owned(),
            }),
        }
    }
}

impl Display for SelectionScope {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    NoSelection,
    OneSelected(InstrumentId),
}

/// Outcome of loading one collection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadOutcome {
    #[default]
    Pending,
    Loaded {
        count: usize,
    },
    Failed(SourceError),
}

/// Per-collection outcome of the initial load.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoadReport {
    pub instruments: LoadOutcome,
    pub value_records: LoadOutcome,
}

impl LoadReport {
    pub fn failures(&self) -> Vec<(Collection, &SourceError)> {
        [
            (Collection::Instruments, &self.instruments),
            (Collection::ValueRecords, &self.value_records),
        ]
        .into_iter()
        .filter_map(|(collection, outcome)| match outcome {
            LoadOutcome::Failed(error) => Some((collection, error)),
            _ => None,
        })
        .collect()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures().is_empty()
    }

    pub fn is_complete(&self) -> bool {
        !matches!(self.instruments, LoadOutcome::Pending)
            && !matches!(self.value_records, LoadOutcome::Pending)
    }

    fn outcome_mut(&mut self, collection: Collection) -> &mut LoadOutcome {
        match collection {
            Collection::Instruments => &mut self.instruments,
            Collection::ValueRecords => &mut self.value_records,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ViewState {
    scope: SelectionScope,
    instruments: Vec<SelectableInstrument>,
    filtered_instruments: Vec<SelectableInstrument>,
    selected_instrument: Option<Instrument>,
    value_records: Vec<ValueRecord>,
    filtered_value_records: Vec<ValueRecord>,
    export_uri: Option<TrustedUri>,
    search_term: String,
    load_report: LoadReport,
}

impl ViewState {
    pub fn new(scope: SelectionScope) -> Self {
        Self {
            scope,
            ..Self::default()
        }
    }

    /// Build a view state and load both collections from `source`.
    pub async fn load(source: &dyn DataSource, scope: SelectionScope) -> Result<Self, CoreError> {
        let mut state = Self::new(scope);
        state.initialize(source).await?;
        Ok(state)
    }

    /// Fetch both collections concurrently. A failed fetch leaves its
    /// collection empty and is recorded in the [`LoadReport`].
    pub async fn initialize(&mut self, source: &dyn DataSource) -> Result<(), CoreError> {
        let (instruments, value_records) =
            tokio::join!(source.fetch_instruments(), source.fetch_value_records());

        match instruments {
            Ok(instruments) => self.apply_instruments(instruments),
            Err(error) => self.record_failure(Collection::Instruments, error),
        }

        match value_records {
            Ok(records) => self.apply_value_records(records)?,
            Err(error) => self.record_failure(Collection::ValueRecords, error),
        }

        Ok(())
    }

    /// Install the instrument list, all unselected, and rebuild the
    /// projection for the current search term. Any selection is dropped.
    pub fn apply_instruments(&mut self, instruments: Vec<Instrument>) {
        self.load_report.instruments = LoadOutcome::Loaded {
            count: instruments.len(),
        };
        self.instruments = instruments
            .into_iter()
            .map(SelectableInstrument::from)
            .collect();
        self.filtered_instruments =
            filter_instruments(&self.instruments, &SearchTerm::new(&self.search_term));
        self.selected_instrument = None;
        self.filtered_value_records.clear();
        self.export_uri = None;
        debug!(count = self.instruments.len(), "instruments applied");
    }

    /// Install the value records. May arrive before or after a selection; an
    /// existing selection picks up its records immediately.
    pub fn apply_value_records(&mut self, records: Vec<ValueRecord>) -> Result<(), CoreError> {
        self.load_report.value_records = LoadOutcome::Loaded {
            count: records.len(),
        };
        self.value_records = records;
        debug!(count = self.value_records.len(), "value records applied");

        if self.selected_instrument.is_some() {
            self.refresh_selected_values()?;
        }
        Ok(())
    }

    pub fn record_failure(&mut self, collection: Collection, error: SourceError) {
        warn!(collection = collection.as_str(), error = %error, "load failed, showing empty list");
        *self.load_report.outcome_mut(collection) = LoadOutcome::Failed(error);
    }

    /// Recompute the projection from the full base list. Call with a settled
    /// (debounced) term.
    pub fn apply_search_term(&mut self, term: &str) -> usize {
        self.search_term = term.to_owned();
        self.filtered_instruments =
            filter_instruments(&self.instruments, &SearchTerm::new(term));
        debug!(term, matches = self.filtered_instruments.len(), "projection recomputed");
        self.filtered_instruments.len()
    }

    pub fn toggle_selection(
        &mut self,
        id: InstrumentId,
        checked: bool,
    ) -> Result<SelectionState, CoreError> {
        if checked {
            self.select(id);
        } else {
            self.deselect(id);
        }

        self.refresh_selected_values()?;
        let state = self.selection_state();
        debug!(%id, checked, ?state, "selection toggled");
        Ok(state)
    }

    fn select(&mut self, id: InstrumentId) {
        self.selected_instrument = self
            .filtered_instruments
            .iter()
            .find(|entry| entry.id() == id)
            .map(|entry| entry.instrument.clone());
        let found = self.selected_instrument.is_some();

        for entry in &mut self.filtered_instruments {
            entry.selected = found && entry.id() == id;
        }

        match self.scope {
            SelectionScope::Projection => {
                for shown in &self.filtered_instruments {
                    if let Some(base) = self.instruments.iter_mut().find(|b| b.id() == shown.id()) {
                        base.selected = shown.selected;
                    }
                }
            }
            SelectionScope::All => {
                for base in &mut self.instruments {
                    base.selected = found && base.id() == id;
                }
            }
        }
    }

    fn deselect(&mut self, id: InstrumentId) {
        self.selected_instrument = None;
        for entry in self
            .instruments
            .iter_mut()
            .chain(self.filtered_instruments.iter_mut())
            .filter(|entry| entry.id() == id)
        {
            entry.selected = false;
        }
    }

    fn refresh_selected_values(&mut self) -> Result<(), CoreError> {
        self.filtered_value_records = match &self.selected_instrument {
            Some(selected) => self
                .value_records
                .iter()
                .filter(|record| record.stock_id == selected.id)
                .cloned()
                .collect(),
            None => Vec::new(),
        };
        self.generate_export_uri()?;
        Ok(())
    }

    pub fn sort_instruments(&mut self, criteria: InstrumentSortCriteria, order: SortOrder) {
        match criteria.target() {
            SortTarget::Projection => {
                self.filtered_instruments =
                    sort_instruments(&self.filtered_instruments, criteria, order);
            }
            SortTarget::Base => {
                self.instruments = sort_instruments(&self.instruments, criteria, order);
            }
        }
        debug!(%criteria, %order, "instruments sorted");
    }

    /// Sort by a criteria name from user input. Unknown names are ignored;
    /// returns whether a sort happened.
    pub fn sort_instruments_by_name(&mut self, criteria: &str, order: SortOrder) -> bool {
        match criteria.parse::<InstrumentSortCriteria>() {
            Ok(criteria) => {
                self.sort_instruments(criteria, order);
                true
            }
            Err(error) => {
                debug!(%error, "ignoring sort request");
                false
            }
        }
    }

    /// Reorder the selected instrument's records. The export URI follows the
    /// new order.
    pub fn sort_value_records(
        &mut self,
        criteria: ValueSortCriteria,
        order: SortOrder,
    ) -> Result<(), CoreError> {
        self.filtered_value_records =
            sort_value_records(&self.filtered_value_records, criteria, order);
        self.generate_export_uri()?;
        Ok(())
    }

    pub fn sort_value_records_by_name(
        &mut self,
        criteria: &str,
        order: SortOrder,
    ) -> Result<bool, CoreError> {
        match criteria.parse::<ValueSortCriteria>() {
            Ok(criteria) => {
                self.sort_value_records(criteria, order)?;
                Ok(true)
            }
            Err(error) => {
                debug!(%error, "ignoring sort request");
                Ok(false)
            }
        }
    }

    /// Regenerate the export URI from the current value subset.
    pub fn generate_export_uri(&mut self) -> Result<&TrustedUri, CoreError> {
        let uri = generate_export_uri(&self.filtered_value_records)?;
        Ok(self.export_uri.insert(uri))
    }

    pub fn selection_state(&self) -> SelectionState {
        match &self.selected_instrument {
            Some(instrument) => SelectionState::OneSelected(instrument.id),
            None => SelectionState::NoSelection,
        }
    }

    pub fn scope(&self) -> SelectionScope {
        self.scope
    }

    pub fn instruments(&self) -> &[SelectableInstrument] {
        &self.instruments
    }

    pub fn filtered_instruments(&self) -> &[SelectableInstrument] {
        &self.filtered_instruments
    }

    pub fn instrument(&self, id: InstrumentId) -> Option<&SelectableInstrument> {
        self.instruments.iter().find(|entry| entry.id() == id)
    }

    pub fn selected_instrument(&self) -> Option<&Instrument> {
        self.selected_instrument.as_ref()
    }

    pub fn value_records(&self) -> &[ValueRecord] {
        &self.value_records
    }

    pub fn filtered_value_records(&self) -> &[ValueRecord] {
        &self.filtered_value_records
    }

    /// `None` until the first selection change.
    pub fn export_uri(&self) -> Option<&TrustedUri> {
        self.export_uri.as_ref()
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn load_report(&self) -> &LoadReport {
        &self.load_report
    }
}
