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

use serde::Serialize;
use std::collections::HashMap;

/// Energy report series for one page (a day or a whole month).
///
/// All vectors are index-aligned with `times`. Predicted series are always
/// present; real series carry `None` where the site had no measurement.
/// Null handling is two-tier: `real_total` is computed whenever both
/// generation readings exist, but `real_net` additionally requires the
/// demand reading, so `real_net[i]` can be `None` while `real_total[i]`
/// is not.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnergyData {
    /// Row timestamps as sent by the API (null rows preserved)
    pub times: Vec<Option<String>>,

    // Predictions (MW)
    pub predicted_demand: Vec<f64>,
    pub predicted_solar: Vec<f64>,
    pub predicted_wind: Vec<f64>,
    /// `predicted_solar + predicted_wind`, per row
    pub predicted_total: Vec<f64>,
    /// `predicted_total - predicted_demand`, per row
    pub predicted_net: Vec<f64>,

    // Site measurements (MW)
    pub real_demand: Vec<Option<f64>>,
    pub real_solar: Vec<Option<f64>>,
    pub real_wind: Vec<Option<f64>>,
    pub real_total: Vec<Option<f64>>,
    pub real_net: Vec<Option<f64>>,

    /// Grid carbon intensity per calendar day (kg CO2 per MWh)
    pub carbon_rate: HashMap<String, f64>,

    /// Carbon saved by the predicted net surplus, summed over all rows
    pub predicted_carbon_saved: f64,
    /// Carbon saved by the measured net surplus; rows without a computable
    /// net contribute nothing
    pub real_carbon_saved: f64,
}

impl EnergyData {
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}
