//! Dashboard controller.
//!
//! Owns the selection and the three remote-data views (currency catalog,
//! spot rate, history series). Loads run as spawned tasks and report back
//! over a channel; each completion carries the generation of the loader
//! that issued it, and anything older than the current generation is
//! dropped. Whatever the order in which responses arrive, the displayed
//! rate and history always belong to the latest selection.

use anyhow::{Result, bail};
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::core::rates::{Catalog, DateWindow, HistorySeries, RateProvider};
use crate::core::selection::normalize_code;
use crate::core::stats::{self, DerivedView};
use crate::core::{Amount, LookbackPeriod, Selection};

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogState {
    Loading,
    Ready(Catalog),
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RateState {
    Pending,
    Ready(f64),
    Unavailable,
}

impl RateState {
    pub fn value(&self) -> Option<f64> {
        match self {
            RateState::Ready(rate) => Some(*rate),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HistoryState {
    Pending,
    Ready(HistorySeries),
    Unavailable,
    /// Source and target are the same currency, nothing to chart.
    SamePair,
}

impl HistoryState {
    pub fn series(&self) -> Option<&HistorySeries> {
        match self {
            HistoryState::Ready(series) => Some(series),
            _ => None,
        }
    }
}

/// Which view a completion was meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadKind {
    Catalog,
    Rate,
    History,
}

/// Outcome of applying one completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Catalog,
    Rate,
    History,
    /// Completion belonged to a superseded selection and was dropped.
    Discarded(LoadKind),
}

#[derive(Debug)]
enum LoadEvent {
    Catalog(Result<Catalog>),
    Rate {
        generation: u64,
        result: Result<f64>,
    },
    History {
        generation: u64,
        result: Result<HistorySeries>,
    },
}

pub struct Dashboard {
    provider: Arc<dyn RateProvider>,
    selection: Selection,
    catalog: CatalogState,
    rate: RateState,
    history: HistoryState,
    rate_generation: u64,
    history_generation: u64,
    catalog_requested: bool,
    replace_unknown_codes: bool,
    in_flight: usize,
    today: fn() -> NaiveDate,
    events_tx: mpsc::UnboundedSender<LoadEvent>,
    events_rx: mpsc::UnboundedReceiver<LoadEvent>,
}

fn utc_today() -> NaiveDate {
    Utc::now().date_naive()
}

impl Dashboard {
    pub fn new(provider: Arc<dyn RateProvider>, selection: Selection) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Dashboard {
            provider,
            selection,
            catalog: CatalogState::Loading,
            rate: RateState::Pending,
            history: HistoryState::Pending,
            rate_generation: 0,
            history_generation: 0,
            catalog_requested: false,
            replace_unknown_codes: true,
            in_flight: 0,
            today: utc_today,
            events_tx,
            events_rx,
        }
    }

    /// Overrides the calendar used to compute history windows.
    pub fn with_today(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Leaves codes the catalog doesn't know about in place instead of
    /// replacing them, so the caller can report them.
    pub fn keep_unknown_codes(mut self) -> Self {
        self.replace_unknown_codes = false;
        self
    }

    /// Fires the catalog load and the initial rate and history loads.
    /// Only the first call has any effect.
    pub fn start(&mut self) {
        if self.catalog_requested {
            return;
        }
        self.catalog_requested = true;
        info!("Loading currency catalog");

        let provider = Arc::clone(&self.provider);
        self.spawn(async move { LoadEvent::Catalog(provider.get_currencies().await) });

        self.refresh_rate();
        self.refresh_history();
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn catalog(&self) -> &CatalogState {
        &self.catalog
    }

    pub fn rate(&self) -> RateState {
        self.rate
    }

    pub fn history(&self) -> &HistoryState {
        &self.history
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.catalog, CatalogState::Ready(_))
    }

    pub fn has_pending(&self) -> bool {
        self.in_flight > 0
    }

    /// Derived values for the current snapshot. Never touches the network.
    pub fn view(&self) -> DerivedView {
        stats::derive(
            &self.selection.amount,
            self.rate.value(),
            self.history.series(),
        )
    }

    pub fn set_amount(&mut self, text: &str) {
        self.selection.amount = Amount::parse(text);
    }

    pub fn set_source(&mut self, code: &str) -> Result<()> {
        let code = self.validate_code(code)?;
        if code == self.selection.source {
            return Ok(());
        }
        self.selection.source = code;
        self.on_pair_changed();
        Ok(())
    }

    pub fn set_target(&mut self, code: &str) -> Result<()> {
        let code = self.validate_code(code)?;
        if code == self.selection.target {
            return Ok(());
        }
        self.selection.target = code;
        self.on_pair_changed();
        Ok(())
    }

    /// Exchanges source and target as a single transition.
    pub fn swap(&mut self) {
        let selection = &mut self.selection;
        std::mem::swap(&mut selection.source, &mut selection.target);
        if !self.selection.is_same_pair() {
            self.on_pair_changed();
        }
    }

    pub fn set_period(&mut self, period: LookbackPeriod) {
        if period == self.selection.period {
            return;
        }
        self.selection.period = period;
        self.refresh_history();
    }

    /// Waits for the next completion and applies it.
    ///
    /// Returns `None` when no load is in flight.
    pub async fn next_event(&mut self) -> Option<Applied> {
        if self.in_flight == 0 {
            return None;
        }
        let event = self.events_rx.recv().await?;
        self.in_flight -= 1;
        Some(self.apply(event))
    }

    /// Applies completions until nothing is in flight.
    pub async fn settle(&mut self) {
        while self.next_event().await.is_some() {}
    }

    fn validate_code(&self, code: &str) -> Result<String> {
        let code = normalize_code(code);
        if code.is_empty() {
            bail!("Currency code is empty");
        }
        if let CatalogState::Ready(catalog) = &self.catalog {
            if !catalog.contains(&code) {
                bail!("Unsupported currency: {}", code);
            }
        }
        Ok(code)
    }

    fn on_pair_changed(&mut self) {
        debug!(
            source = %self.selection.source,
            target = %self.selection.target,
            "Currency pair changed"
        );
        self.refresh_rate();
        self.refresh_history();
    }

    fn spawn<F>(&mut self, load: F)
    where
        F: Future<Output = LoadEvent> + Send + 'static,
    {
        let tx = self.events_tx.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            // Receiver lives as long as the dashboard; a failed send means it's gone
            let _ = tx.send(load.await);
        });
    }

    fn refresh_rate(&mut self) {
        self.rate_generation += 1;
        let generation = self.rate_generation;

        if self.selection.is_same_pair() {
            self.rate = RateState::Ready(1.0);
            return;
        }
        self.rate = RateState::Pending;

        let provider = Arc::clone(&self.provider);
        let (from, to) = (self.selection.source.clone(), self.selection.target.clone());
        debug!(generation, %from, %to, "Requesting spot rate");
        self.spawn(async move {
            LoadEvent::Rate {
                generation,
                result: provider.get_rate(&from, &to).await,
            }
        });
    }

    fn refresh_history(&mut self) {
        self.history_generation += 1;
        let generation = self.history_generation;

        if self.selection.is_same_pair() {
            self.history = HistoryState::SamePair;
            return;
        }
        self.history = HistoryState::Pending;

        let window: DateWindow = self.selection.period.window_ending((self.today)());
        let provider = Arc::clone(&self.provider);
        let (from, to) = (self.selection.source.clone(), self.selection.target.clone());
        debug!(generation, %from, %to, %window, "Requesting history");
        self.spawn(async move {
            LoadEvent::History {
                generation,
                result: provider.get_history(&from, &to, &window).await,
            }
        });
    }

    fn apply(&mut self, event: LoadEvent) -> Applied {
        match event {
            LoadEvent::Catalog(result) => {
                match result {
                    Ok(catalog) => {
                        info!(currencies = catalog.len(), "Currency catalog loaded");
                        self.catalog = CatalogState::Ready(catalog);
                        if self.replace_unknown_codes {
                            self.reconcile_selection();
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to load currency catalog");
                        self.catalog = CatalogState::Failed(e.to_string());
                    }
                }
                Applied::Catalog
            }
            LoadEvent::Rate { generation, .. } if generation != self.rate_generation => {
                debug!(generation, current = self.rate_generation, "Discarding stale rate");
                Applied::Discarded(LoadKind::Rate)
            }
            LoadEvent::Rate { result, .. } => {
                self.rate = match result {
                    Ok(rate) => RateState::Ready(rate),
                    Err(e) => {
                        warn!(error = %e, "Spot rate unavailable");
                        RateState::Unavailable
                    }
                };
                Applied::Rate
            }
            LoadEvent::History { generation, .. } if generation != self.history_generation => {
                debug!(
                    generation,
                    current = self.history_generation,
                    "Discarding stale history"
                );
                Applied::Discarded(LoadKind::History)
            }
            LoadEvent::History { result, .. } => {
                self.history = match result {
                    Ok(series) => HistoryState::Ready(series),
                    Err(e) => {
                        warn!(error = %e, "History unavailable");
                        HistoryState::Unavailable
                    }
                };
                Applied::History
            }
        }
    }

    /// Replaces source or target codes the catalog doesn't know about.
    ///
    /// Prefers a code different from the other side; a single-currency
    /// catalog yields a same-pair selection.
    fn reconcile_selection(&mut self) {
        let CatalogState::Ready(catalog) = &self.catalog else {
            return;
        };

        let pick = |other: &str| {
            catalog
                .codes()
                .find(|code| *code != other)
                .or_else(|| catalog.codes().next())
                .map(str::to_string)
        };

        let mut changed = false;
        if !catalog.contains(&self.selection.source) {
            if let Some(code) = pick(&self.selection.target) {
                warn!(from = %self.selection.source, to = %code, "Unknown source currency replaced");
                self.selection.source = code;
                changed = true;
            }
        }
        if !catalog.contains(&self.selection.target) {
            if let Some(code) = pick(&self.selection.source) {
                warn!(from = %self.selection.target, to = %code, "Unknown target currency replaced");
                self.selection.target = code;
                changed = true;
            }
        }

        if changed {
            self.on_pair_changed();
        }
    }
}
