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

use enerview_core::DashboardSink;
use enerview_types::{
    BidData, EnergyData, PageDate, ReportMonth, Section, SectionState, SkeletonEffect,
};
use tracing::{debug, info, warn};

/// Stands in for the web page: every UI effect becomes a log line, with the
/// summary-card figures printed the way the dashboard shows them.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl DashboardSink for ConsoleSink {
    fn apply_section_state(&self, section: Section, state: SectionState, effect: SkeletonEffect) {
        debug!(
            "section {} -> {} (skeleton: {}, error-styled: {}, content: {})",
            section, state, effect.skeleton_shown, effect.error_styled, effect.content_shown
        );
    }

    fn render_energy(&self, date: &PageDate, data: &EnergyData) {
        info!("⚡ energy report {}: {} rows", date, data.len());
        info!("   predicted carbon saved: {:.2} kg CO2", data.predicted_carbon_saved);
        info!("   measured carbon saved:  {:.2} kg CO2", data.real_carbon_saved);
    }

    fn render_energy_unavailable(&self, date: &PageDate) {
        warn!("⚡ energy report {}: No Data", date);
    }

    fn render_market(&self, date: &PageDate, data: &BidData) {
        info!("💰 market report {}: {} bids", date, data.len());
        info!("   profit: {:.2}", data.profit);
        info!(
            "   volume: {:.1} MWh (sold {:.1}, bought {:.1})",
            data.total_volume, data.volume_sold, data.volume_bought
        );
    }

    fn render_market_unavailable(&self, date: &PageDate) {
        warn!("💰 market report {}: No Data", date);
    }

    fn render_dates(&self, months: &[ReportMonth]) {
        info!("🗓  report catalog: {} months", months.len());
        for month in months {
            debug!("   {} {}: {} days", month.name, month.year, month.days.len());
        }
    }

    fn set_page_location(&self, date: &PageDate, title: &str) {
        info!("📄 {} (?date={})", title, date);
    }

    fn trigger_download(&self, url: &str) {
        info!("⬇️  download {}", url);
    }

    fn loading_finished(&self) {
        debug!("all sections settled");
    }
}
