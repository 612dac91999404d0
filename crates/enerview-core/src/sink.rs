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

use enerview_types::{
    BidData, EnergyData, PageDate, ReportMonth, Section, SectionState, SkeletonEffect,
};
use std::sync::Arc;

/// The UI side of the dashboard: skeleton toggling, chart rendering, page
/// chrome, and download triggering.
///
/// The engine never draws anything itself; every visible effect goes
/// through this trait. Skeleton changes arrive with the effect row from the
/// shared state table, so implementations apply it instead of branching on
/// the state again. Implementations are called from the fetch pipelines and
/// must not block.
pub trait DashboardSink: Send + Sync {
    /// A section's loading state changed
    fn apply_section_state(&self, section: Section, state: SectionState, effect: SkeletonEffect);

    /// Render the energy charts and carbon summary cards
    fn render_energy(&self, date: &PageDate, data: &EnergyData);

    /// The energy report failed to load; show the "No Data" summary cards
    fn render_energy_unavailable(&self, date: &PageDate);

    /// Render the market bid chart and profit summary cards
    fn render_market(&self, date: &PageDate, data: &BidData);

    /// The bids failed to load; show the "No Data" summary cards
    fn render_market_unavailable(&self, date: &PageDate);

    /// Render the month/day report catalog in the navigation bar
    fn render_dates(&self, months: &[ReportMonth]);

    /// Update the page title and history location for a navigation event
    fn set_page_location(&self, date: &PageDate, title: &str);

    /// Trigger a CSV export download (the original fires a synthetic
    /// anchor click at this URL)
    fn trigger_download(&self, url: &str);

    /// Every fetch of the current navigation event has settled
    fn loading_finished(&self);
}

impl<T: DashboardSink + ?Sized> DashboardSink for Arc<T> {
    fn apply_section_state(&self, section: Section, state: SectionState, effect: SkeletonEffect) {
        (**self).apply_section_state(section, state, effect);
    }

    fn render_energy(&self, date: &PageDate, data: &EnergyData) {
        (**self).render_energy(date, data);
    }

    fn render_energy_unavailable(&self, date: &PageDate) {
        (**self).render_energy_unavailable(date);
    }

    fn render_market(&self, date: &PageDate, data: &BidData) {
        (**self).render_market(date, data);
    }

    fn render_market_unavailable(&self, date: &PageDate) {
        (**self).render_market_unavailable(date);
    }

    fn render_dates(&self, months: &[ReportMonth]) {
        (**self).render_dates(months);
    }

    fn set_page_location(&self, date: &PageDate, title: &str) {
        (**self).set_page_location(date, title);
    }

    fn trigger_download(&self, url: &str) {
        (**self).trigger_download(url);
    }

    fn loading_finished(&self) {
        (**self).loading_finished();
    }
}
