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

//! Structural validation of raw API payloads.
//!
//! These checks gate malformed responses before any transformation runs.
//! They look only at JSON shape; value-level rules (field positions, ranges)
//! belong to the transformers.

use serde_json::Value;
use std::fmt;
use tracing::warn;

/// The three response kinds the reporting API serves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Bids,
    Energy,
    Dates,
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bids => write!(f, "bids"),
            Self::Energy => write!(f, "energy"),
            Self::Dates => write!(f, "dates"),
        }
    }
}

/// Check a raw payload against the structural rules for `kind`.
///
/// Returns false and logs the violated rule on the first mismatch; never
/// panics. Callers must discard the payload when this returns false.
pub fn validate(payload: &Value, kind: PayloadKind) -> bool {
    match kind {
        PayloadKind::Bids => validate_bids(payload),
        PayloadKind::Energy => validate_energy(payload),
        PayloadKind::Dates => validate_dates(payload),
    }
}

/// Bids: `data` is an array of rows, every row an array whose cells are
/// each numeric or string (the type tag is a string cell)
fn validate_bids(payload: &Value) -> bool {
    let Some(data) = payload.get("data") else {
        warn!("bids payload has no 'data' field");
        return false;
    };
    let Some(rows) = data.as_array() else {
        warn!("bids 'data' is not an array");
        return false;
    };

    for (index, row) in rows.iter().enumerate() {
        let Some(cells) = row.as_array() else {
            warn!("bids row {} is not an array", index);
            return false;
        };
        for (col, cell) in cells.iter().enumerate() {
            if !cell.is_number() && !cell.is_string() {
                warn!("bids row {} cell {} is neither numeric nor string", index, col);
                return false;
            }
        }
    }
    true
}

/// Energy: `carbonRate` is a non-null mapping of day keys to numeric rates;
/// `data` rows have a string-or-null timestamp at position 0 and
/// number-or-null cells after it
fn validate_energy(payload: &Value) -> bool {
    let Some(rates) = payload.get("carbonRate") else {
        warn!("energy payload has no 'carbonRate' field");
        return false;
    };
    let Some(rates) = rates.as_object() else {
        warn!("energy 'carbonRate' is not a mapping");
        return false;
    };
    for (day, rate) in rates {
        if !rate.is_number() {
            warn!("energy carbonRate['{}'] is not numeric", day);
            return false;
        }
    }

    let Some(data) = payload.get("data") else {
        warn!("energy payload has no 'data' field");
        return false;
    };
    let Some(rows) = data.as_array() else {
        warn!("energy 'data' is not an array");
        return false;
    };

    for (index, row) in rows.iter().enumerate() {
        let Some(cells) = row.as_array() else {
            warn!("energy row {} is not an array", index);
            return false;
        };
        if let Some(time) = cells.first()
            && !time.is_string()
            && !time.is_null()
        {
            warn!("energy row {} timestamp is neither string nor null", index);
            return false;
        }
        for (col, cell) in cells.iter().enumerate().skip(1) {
            if !cell.is_number() && !cell.is_null() {
                warn!("energy row {} cell {} is neither numeric nor null", index, col);
                return false;
            }
        }
    }
    true
}

/// Dates: a mapping whose every value is an array. The day numbers inside
/// are not checked here.
fn validate_dates(payload: &Value) -> bool {
    let Some(map) = payload.as_object() else {
        warn!("dates payload is not a mapping");
        return false;
    };
    for (key, days) in map {
        if !days.is_array() {
            warn!("dates['{}'] is not an array", key);
            return false;
        }
    }
    true
}
