// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of EnerView.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! The navigation controller: owns the page state, issues the per-date
//! fetches, and drives the per-section loading state machine.

use crate::catalog::resolve_report_date;
use crate::sink::DashboardSink;
use enerview_client::{
    ClientError, ClientResult, PayloadKind, ReportApi, process_bids, process_dates,
    process_energy, validate,
};
use enerview_types::{
    BidData, DateSyntaxError, EnergyData, PageDate, ReportMonths, Section, SectionState,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::{error, info, warn};

/// Loading state of the three section machines, mutated independently
#[derive(Debug, Default, Clone, Copy)]
struct SectionStates {
    energy: SectionState,
    market: SectionState,
    dates: SectionState,
}

impl SectionStates {
    fn get(&self, section: Section) -> SectionState {
        match section {
            Section::Energy => self.energy,
            Section::Market => self.market,
            Section::Dates => self.dates,
        }
    }

    fn set(&mut self, section: Section, state: SectionState) {
        match section {
            Section::Energy => self.energy = state,
            Section::Market => self.market = state,
            Section::Dates => self.dates = state,
        }
    }
}

/// Navigation state owned by the controller. The cached aggregates are the
/// last successfully fetched datasets; `None` marks a dataset unavailable
/// after a failed load.
#[derive(Debug, Default)]
struct PageState {
    current: Option<PageDate>,
    catalog: Option<ReportMonths>,
    energy: Option<EnergyData>,
    bids: Option<BidData>,
    sections: SectionStates,
}

/// Coordinates navigation events against the reporting API and the UI sink.
///
/// One navigation event runs the energy and market pipelines concurrently;
/// each pipeline owns its success/failure branch and flips only its own
/// section, while the shared in-flight counter brackets the whole group.
/// A navigation event does not cancel earlier in-flight events: a slow
/// response from a previous date can still land after a newer one and
/// overwrite its data. Embedders that cannot tolerate that must serialize
/// their `change_date` calls.
pub struct NavigationController<A, S> {
    api: A,
    sink: S,
    state: Mutex<PageState>,
    in_flight: AtomicU32,
}

impl<A: ReportApi, S: DashboardSink> NavigationController<A, S> {
    pub fn new(api: A, sink: S) -> Self {
        Self {
            api,
            sink,
            state: Mutex::new(PageState::default()),
            in_flight: AtomicU32::new(0),
        }
    }

    /// Date of the page currently shown (or being loaded)
    pub fn current_date(&self) -> Option<PageDate> {
        self.state.lock().current
    }

    pub fn section_state(&self, section: Section) -> SectionState {
        self.state.lock().sections.get(section)
    }

    /// True while any navigation event's fetch group is unsettled
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) != 0
    }

    pub fn catalog(&self) -> Option<ReportMonths> {
        self.state.lock().catalog.clone()
    }

    pub fn cached_energy(&self) -> Option<EnergyData> {
        self.state.lock().energy.clone()
    }

    pub fn cached_bids(&self) -> Option<BidData> {
        self.state.lock().bids.clone()
    }

    /// Startup: fetch the dates catalog once, seed the target from the
    /// requested date (the page URL's `date` parameter) or today, resolve
    /// it against the catalog, and load the resolved page. A target whose
    /// month is absent from the catalog is logged and loads nothing.
    pub async fn start(&self, requested: Option<&str>) {
        self.load_catalog().await;

        let target = match requested {
            Some(input) => input.parse::<PageDate>().unwrap_or_else(|parse_error| {
                warn!("ignoring requested start date: {}", parse_error);
                PageDate::today()
            }),
            None => PageDate::today(),
        };

        let resolved = {
            let page = self.state.lock();
            let Some(catalog) = page.catalog.as_ref() else {
                error!("report catalog unavailable, not loading {}", target);
                return;
            };
            match resolve_report_date(catalog, &target) {
                Ok(resolved) => resolved.date().to_owned(),
                Err(resolve_error) => {
                    error!("{}", resolve_error);
                    return;
                }
            }
        };

        if let Err(syntax_error) = self.change_date(&resolved).await {
            // Catalog dates are synthesized in the accepted syntax, so
            // this only fires on a corrupted catalog entry.
            error!("resolved date rejected: {}", syntax_error);
        }
    }

    /// Navigate to `input`.
    ///
    /// Bad syntax is rejected with a logged error and no state change.
    /// Otherwise the current date, title, and location update immediately
    /// and the energy and market pipelines run concurrently; this returns
    /// once both have settled.
    pub async fn change_date(&self, input: &str) -> Result<(), DateSyntaxError> {
        let date = match input.parse::<PageDate>() {
            Ok(date) => date,
            Err(syntax_error) => {
                error!("rejected navigation: {}", syntax_error);
                return Err(syntax_error);
            }
        };

        info!("📅 navigating to {} ({} view)", date, date.granularity());
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        self.state.lock().current = Some(date);
        self.sink.set_page_location(&date, &date.title());

        // Both pipelines run to settlement in either order; sections flip
        // independently as each one finishes.
        tokio::join!(self.run_energy_pipeline(date), self.run_market_pipeline(date));

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.sink.loading_finished();
        Ok(())
    }

    /// Trigger CSV exports for the datasets whose last fetch succeeded.
    /// Refused with a logged error while any fetch group is in flight.
    /// Returns whether downloads were triggered.
    pub fn download(&self) -> bool {
        if self.is_loading() {
            error!("download refused: reports are still loading");
            return false;
        }

        let (date, has_energy, has_bids) = {
            let page = self.state.lock();
            let Some(date) = page.current else {
                error!("download refused: no report loaded");
                return false;
            };
            (date, page.energy.is_some(), page.bids.is_some())
        };

        if has_energy {
            self.sink.trigger_download(&self.api.energy_download_url(&date));
        }
        if has_bids {
            self.sink.trigger_download(&self.api.bids_download_url(&date));
        }
        true
    }

    fn set_section(&self, section: Section, state: SectionState) {
        self.state.lock().sections.set(section, state);
        self.sink.apply_section_state(section, state, state.effect());
    }

    async fn load_catalog(&self) {
        self.set_section(Section::Dates, SectionState::Visible);

        match self.fetch_catalog().await {
            Ok(months) => {
                info!("report catalog loaded: {} months", months.len());
                self.sink.render_dates(&months);
                self.state.lock().catalog = Some(months);
                self.set_section(Section::Dates, SectionState::Hidden);
            }
            Err(client_error) => {
                error!("date catalog load failed: {}", client_error);
                self.set_section(Section::Dates, SectionState::Error);
            }
        }
    }

    async fn fetch_catalog(&self) -> ClientResult<ReportMonths> {
        let payload = self.api.fetch_dates().await?;
        if !validate(&payload, PayloadKind::Dates) {
            return Err(ClientError::InvalidPayload {
                kind: PayloadKind::Dates,
            });
        }
        Ok(process_dates(&payload))
    }

    async fn run_energy_pipeline(&self, date: PageDate) {
        self.set_section(Section::Energy, SectionState::Visible);

        match self.fetch_energy(&date).await {
            Ok(data) => {
                self.sink.render_energy(&date, &data);
                self.state.lock().energy = Some(data);
                self.set_section(Section::Energy, SectionState::Hidden);
            }
            Err(client_error) => {
                error!("energy report for {} unavailable: {}", date, client_error);
                self.state.lock().energy = None;
                self.sink.render_energy_unavailable(&date);
                self.set_section(Section::Energy, SectionState::Error);
            }
        }
    }

    async fn fetch_energy(&self, date: &PageDate) -> ClientResult<EnergyData> {
        let payload = self.api.fetch_report(date).await?;
        if !validate(&payload, PayloadKind::Energy) {
            return Err(ClientError::InvalidPayload {
                kind: PayloadKind::Energy,
            });
        }
        Ok(process_energy(&payload))
    }

    async fn run_market_pipeline(&self, date: PageDate) {
        self.set_section(Section::Market, SectionState::Visible);

        match self.fetch_bids(&date).await {
            Ok(data) => {
                self.sink.render_market(&date, &data);
                self.state.lock().bids = Some(data);
                self.set_section(Section::Market, SectionState::Hidden);
            }
            Err(client_error) => {
                error!("bids for {} unavailable: {}", date, client_error);
                self.state.lock().bids = None;
                self.sink.render_market_unavailable(&date);
                self.set_section(Section::Market, SectionState::Error);
            }
        }
    }

    async fn fetch_bids(&self, date: &PageDate) -> ClientResult<BidData> {
        let payload = self.api.fetch_bids(date).await?;
        if !validate(&payload, PayloadKind::Bids) {
            return Err(ClientError::InvalidPayload {
                kind: PayloadKind::Bids,
            });
        }
        Ok(process_bids(&payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use enerview_types::{ReportMonth, SkeletonEffect};
    use serde_json::{Value, json};
    use std::sync::Arc;
    use std::time::Duration;

    /// Canned API; `None` for a payload makes that endpoint fail
    #[derive(Default)]
    struct StubApi {
        bids: Mutex<Option<Value>>,
        report: Mutex<Option<Value>>,
        dates: Mutex<Option<Value>>,
        delay: Option<Duration>,
    }

    impl StubApi {
        fn serving(bids: Value, report: Value, dates: Value) -> Self {
            Self {
                bids: Mutex::new(Some(bids)),
                report: Mutex::new(Some(report)),
                dates: Mutex::new(Some(dates)),
                delay: None,
            }
        }

        fn not_found() -> ClientError {
            ClientError::Status {
                status: 404,
                url: "stub".to_owned(),
            }
        }
    }

    #[async_trait]
    impl ReportApi for StubApi {
        async fn fetch_bids(&self, _date: &PageDate) -> ClientResult<Value> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.bids.lock().clone().ok_or_else(Self::not_found)
        }

        async fn fetch_report(&self, _date: &PageDate) -> ClientResult<Value> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.report.lock().clone().ok_or_else(Self::not_found)
        }

        async fn fetch_dates(&self) -> ClientResult<Value> {
            self.dates.lock().clone().ok_or_else(Self::not_found)
        }

        fn energy_download_url(&self, date: &PageDate) -> String {
            format!("stub/downloads/energy/{date}")
        }

        fn bids_download_url(&self, date: &PageDate) -> String {
            format!("stub/downloads/bids/{date}")
        }
    }

    /// Records every sink effect in call order
    #[derive(Default)]
    struct RecordingSink {
        events: Mutex<Vec<String>>,
    }

    impl RecordingSink {
        fn events(&self) -> Vec<String> {
            self.events.lock().clone()
        }

        fn record(&self, event: String) {
            self.events.lock().push(event);
        }
    }

    impl DashboardSink for RecordingSink {
        fn apply_section_state(
            &self,
            section: Section,
            state: SectionState,
            effect: SkeletonEffect,
        ) {
            assert_eq!(effect, state.effect());
            self.record(format!("{section}:{state}"));
        }

        fn render_energy(&self, _date: &PageDate, data: &EnergyData) {
            self.record(format!("render-energy:{}", data.len()));
        }

        fn render_energy_unavailable(&self, _date: &PageDate) {
            self.record("energy-no-data".to_owned());
        }

        fn render_market(&self, _date: &PageDate, data: &BidData) {
            self.record(format!("render-market:{}", data.len()));
        }

        fn render_market_unavailable(&self, _date: &PageDate) {
            self.record("market-no-data".to_owned());
        }

        fn render_dates(&self, months: &[ReportMonth]) {
            self.record(format!("render-dates:{}", months.len()));
        }

        fn set_page_location(&self, date: &PageDate, title: &str) {
            self.record(format!("location:{date}:{title}"));
        }

        fn trigger_download(&self, url: &str) {
            self.record(format!("download:{url}"));
        }

        fn loading_finished(&self) {
            self.record("loaded".to_owned());
        }
    }

    fn bids_payload() -> Value {
        json!({"data": [
            ["2021-07-22", 0, "SELL", 10, 50],
            ["2021-07-22", 1, "BUY", 5, 40],
        ]})
    }

    fn report_payload() -> Value {
        json!({
            "carbonRate": {"2021-07-22": 0.2},
            "data": [["2021-07-22 00:00:00+00:00", 80, 30, 60, 70, 40, 50]],
        })
    }

    fn dates_payload() -> Value {
        json!({"2021-07": [5, 20, 22]})
    }

    fn controller(
        api: StubApi,
    ) -> (
        Arc<NavigationController<StubApi, Arc<RecordingSink>>>,
        Arc<RecordingSink>,
    ) {
        let sink = Arc::new(RecordingSink::default());
        (
            Arc::new(NavigationController::new(api, sink.clone())),
            sink,
        )
    }

    #[tokio::test]
    async fn test_change_date_success_path() {
        let api = StubApi::serving(bids_payload(), report_payload(), dates_payload());
        let (controller, sink) = controller(api);

        controller.change_date("2021-07-22").await.unwrap();

        assert_eq!(controller.current_date(), Some("2021-07-22".parse().unwrap()));
        assert_eq!(controller.section_state(Section::Energy), SectionState::Hidden);
        assert_eq!(controller.section_state(Section::Market), SectionState::Hidden);
        assert!(!controller.is_loading());

        let bids = controller.cached_bids().unwrap();
        assert_eq!(bids.profit, 300.0);
        let energy = controller.cached_energy().unwrap();
        assert_eq!(energy.real_net[0], Some(20.0));

        let events = sink.events();
        assert!(events.contains(&"location:2021-07-22:22 July 2021".to_owned()));
        assert!(events.contains(&"energy:visible".to_owned()));
        assert!(events.contains(&"render-energy:1".to_owned()));
        assert!(events.contains(&"render-market:2".to_owned()));
        assert_eq!(events.last().unwrap(), "loaded");
    }

    #[tokio::test]
    async fn test_invalid_date_rejected_without_state_change() {
        let api = StubApi::serving(bids_payload(), report_payload(), dates_payload());
        let (controller, sink) = controller(api);

        assert!(controller.change_date("2021-13").await.is_err());

        assert_eq!(controller.current_date(), None);
        assert_eq!(controller.section_state(Section::Energy), SectionState::Hidden);
        assert!(sink.events().is_empty());
        assert!(!controller.is_loading());
    }

    #[tokio::test]
    async fn test_transport_failure_marks_section_error() {
        let api = StubApi::serving(bids_payload(), report_payload(), dates_payload());
        *api.bids.lock() = None;
        let (controller, sink) = controller(api);

        controller.change_date("2021-07-22").await.unwrap();

        assert_eq!(controller.section_state(Section::Market), SectionState::Error);
        assert_eq!(controller.section_state(Section::Energy), SectionState::Hidden);
        assert!(controller.cached_bids().is_none());
        assert!(controller.cached_energy().is_some());

        let events = sink.events();
        assert!(events.contains(&"market-no-data".to_owned()));
        assert!(events.contains(&"market:error".to_owned()));
        // The group still settles
        assert_eq!(events.last().unwrap(), "loaded");
    }

    #[tokio::test]
    async fn test_invalid_payload_marks_section_error() {
        let api = StubApi::serving(bids_payload(), json!({"data": "not-an-array"}), dates_payload());
        let (controller, _sink) = controller(api);

        controller.change_date("2021-07-22").await.unwrap();

        assert_eq!(controller.section_state(Section::Energy), SectionState::Error);
        assert!(controller.cached_energy().is_none());
    }

    #[tokio::test]
    async fn test_error_recovers_on_next_navigation() {
        let api = StubApi::serving(bids_payload(), report_payload(), dates_payload());
        *api.report.lock() = None;
        let (controller, _sink) = controller(api);

        controller.change_date("2021-07-22").await.unwrap();
        assert_eq!(controller.section_state(Section::Energy), SectionState::Error);

        // No retry happens on its own; a new navigation event recovers
        *controller.api.report.lock() = Some(report_payload());
        controller.change_date("2021-07-22").await.unwrap();
        assert_eq!(controller.section_state(Section::Energy), SectionState::Hidden);
        assert!(controller.cached_energy().is_some());
    }

    #[tokio::test]
    async fn test_download_gated_on_in_flight_counter() {
        let api = StubApi {
            delay: Some(Duration::from_millis(50)),
            ..StubApi::serving(bids_payload(), report_payload(), dates_payload())
        };
        let (controller, sink) = controller(api);

        let navigating = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.change_date("2021-07-22").await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert!(controller.is_loading());
        assert!(!controller.download());

        navigating.await.unwrap().unwrap();
        assert!(controller.download());

        let events = sink.events();
        assert!(events.contains(&"download:stub/downloads/energy/2021-07-22".to_owned()));
        assert!(events.contains(&"download:stub/downloads/bids/2021-07-22".to_owned()));
    }

    #[tokio::test]
    async fn test_download_skips_unavailable_dataset() {
        let api = StubApi::serving(bids_payload(), report_payload(), dates_payload());
        *api.report.lock() = None;
        let (controller, sink) = controller(api);

        controller.change_date("2021-07-22").await.unwrap();
        assert!(controller.download());

        let downloads: Vec<_> = sink
            .events()
            .into_iter()
            .filter(|event| event.starts_with("download:"))
            .collect();
        assert_eq!(downloads, vec!["download:stub/downloads/bids/2021-07-22".to_owned()]);
    }

    #[tokio::test]
    async fn test_download_without_navigation_is_refused() {
        let api = StubApi::serving(bids_payload(), report_payload(), dates_payload());
        let (controller, sink) = controller(api);

        assert!(!controller.download());
        assert!(sink.events().is_empty());
    }

    #[tokio::test]
    async fn test_start_adopts_fallback_silently() {
        let api = StubApi::serving(bids_payload(), report_payload(), dates_payload());
        let (controller, sink) = controller(api);

        controller.start(Some("2021-07-10")).await;

        // No report for the 10th; the month's highest day stands in
        assert_eq!(controller.current_date(), Some("2021-07-22".parse().unwrap()));
        assert_eq!(controller.section_state(Section::Dates), SectionState::Hidden);

        let events = sink.events();
        assert!(events.contains(&"render-dates:1".to_owned()));
        assert_eq!(events.last().unwrap(), "loaded");
    }

    #[tokio::test]
    async fn test_start_with_unknown_month_loads_nothing() {
        let api = StubApi::serving(bids_payload(), report_payload(), dates_payload());
        let (controller, sink) = controller(api);

        controller.start(Some("2020-01-01")).await;

        assert_eq!(controller.current_date(), None);
        let events = sink.events();
        // Catalog section loaded, but no energy/market pipeline ran
        assert!(events.contains(&"dates:hidden".to_owned()));
        assert!(!events.iter().any(|event| event.starts_with("energy")));
        assert!(!events.iter().any(|event| event.starts_with("market")));
    }

    #[tokio::test]
    async fn test_start_with_failed_catalog_loads_nothing() {
        let api = StubApi::serving(bids_payload(), report_payload(), dates_payload());
        *api.dates.lock() = None;
        let (controller, _sink) = controller(api);

        controller.start(Some("2021-07-22")).await;

        assert_eq!(controller.section_state(Section::Dates), SectionState::Error);
        assert_eq!(controller.current_date(), None);
    }
}
