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

//! The three pure transformation pipelines: validated raw payloads in,
//! typed datasets out. No mutation of inputs, no hidden state; the same
//! payload always produces the same output.

use enerview_types::{
    Bid, BidData, EnergyData, ReportDay, ReportMonth, ReportMonths, month_name,
};
use serde_json::Value;
use tracing::warn;

fn cell_str(cells: &[Value], index: usize) -> Option<&str> {
    cells.get(index).and_then(Value::as_str)
}

fn cell_f64(cells: &[Value], index: usize) -> Option<f64> {
    cells.get(index).and_then(Value::as_f64)
}

/// Build [`BidData`] from a validated bids payload.
///
/// Field meaning is positional: 0 date, 1 hour, 2 type tag, 3 volume,
/// 4 price. Rows that passed the structural check but break the positional
/// contract (short row, non-numeric volume, unknown type tag) are skipped
/// with a warning. Row order is preserved.
pub fn process_bids(payload: &Value) -> BidData {
    let mut data = BidData::default();
    let Some(rows) = payload.get("data").and_then(Value::as_array) else {
        return data;
    };

    for (index, row) in rows.iter().enumerate() {
        let Some(cells) = row.as_array() else {
            continue;
        };
        match extract_bid(cells) {
            Some(bid) => data.push(bid),
            None => warn!("skipping bid row {}: positional fields missing or mistyped", index),
        }
    }
    data
}

fn extract_bid(cells: &[Value]) -> Option<Bid> {
    let date = cell_str(cells, 0)?.to_owned();
    let hour = cell_f64(cells, 1)?;
    if !(0.0..24.0).contains(&hour) {
        return None;
    }
    let bid_type = cell_str(cells, 2)?.parse().ok()?;
    let volume_mwh = cell_f64(cells, 3)?;
    let price = cell_f64(cells, 4)?;

    Some(Bid {
        date,
        hour: hour as u8,
        bid_type,
        volume_mwh,
        price,
    })
}

/// Build [`EnergyData`] from a validated energy payload.
///
/// Row layout: 0 timestamp, 1-3 predicted demand/solar/wind, 4-6 measured
/// demand/solar/wind. Prediction nulls count as zero. The carbon rate for a
/// row is looked up by the day portion (first 10 characters) of its
/// timestamp; rows without a string timestamp get rate 0.
///
/// Null propagation is two-tier and intentionally asymmetric: `real_total`
/// only needs both generation readings, while `real_net` additionally
/// requires the demand reading. A row with measured generation but no
/// demand keeps its total and leaves net empty.
pub fn process_energy(payload: &Value) -> EnergyData {
    let mut data = EnergyData::default();

    if let Some(rates) = payload.get("carbonRate").and_then(Value::as_object) {
        for (day, rate) in rates {
            if let Some(rate) = rate.as_f64() {
                data.carbon_rate.insert(day.clone(), rate);
            }
        }
    }

    let Some(rows) = payload.get("data").and_then(Value::as_array) else {
        return data;
    };

    for row in rows {
        let Some(cells) = row.as_array() else {
            continue;
        };

        let time = cells.first().and_then(Value::as_str).map(ToOwned::to_owned);
        let rate = time
            .as_deref()
            .and_then(|t| t.get(..10))
            .and_then(|day| data.carbon_rate.get(day).copied())
            .unwrap_or(0.0);

        let predicted_demand = cell_f64(cells, 1).unwrap_or(0.0);
        let predicted_solar = cell_f64(cells, 2).unwrap_or(0.0);
        let predicted_wind = cell_f64(cells, 3).unwrap_or(0.0);
        let real_demand = cell_f64(cells, 4);
        let real_solar = cell_f64(cells, 5);
        let real_wind = cell_f64(cells, 6);

        let predicted_total = predicted_solar + predicted_wind;
        let predicted_net = predicted_total - predicted_demand;
        data.predicted_carbon_saved += predicted_net * rate;

        let real_total = match (real_solar, real_wind) {
            (Some(solar), Some(wind)) => Some(solar + wind),
            _ => None,
        };
        let real_net = match (real_total, real_demand) {
            (Some(total), Some(demand)) => Some(total - demand),
            _ => None,
        };
        if let Some(net) = real_net {
            data.real_carbon_saved += net * rate;
        }

        data.times.push(time);
        data.predicted_demand.push(predicted_demand);
        data.predicted_solar.push(predicted_solar);
        data.predicted_wind.push(predicted_wind);
        data.predicted_total.push(predicted_total);
        data.predicted_net.push(predicted_net);
        data.real_demand.push(real_demand);
        data.real_solar.push(real_solar);
        data.real_wind.push(real_wind);
        data.real_total.push(real_total);
        data.real_net.push(real_net);
    }
    data
}

/// Build the report catalog from a validated dates payload.
///
/// The payload maps `"YYYY-MM"` keys to arrays of day numbers. Months come
/// out in the payload's own key order (the serde_json map preserves
/// insertion order), not sorted chronologically. Malformed keys are skipped
/// with a warning.
pub fn process_dates(payload: &Value) -> ReportMonths {
    let mut months = ReportMonths::new();
    let Some(map) = payload.as_object() else {
        return months;
    };

    for (key, value) in map {
        let Some(day_numbers) = value.as_array() else {
            continue;
        };
        match build_month(key, day_numbers) {
            Some(month) => months.push(month),
            None => warn!("skipping malformed catalog month key '{}'", key),
        }
    }
    months
}

fn build_month(key: &str, day_numbers: &[Value]) -> Option<ReportMonth> {
    let (year_part, month_part) = key.split_once('-')?;
    let year: i32 = year_part.parse().ok()?;
    let month: u32 = month_part.parse().ok()?;
    let name = month_name(month)?;

    let mut days = Vec::with_capacity(day_numbers.len());
    for number in day_numbers {
        let Some(day) = number.as_u64() else {
            continue;
        };
        let day = day as u32;
        days.push(ReportDay {
            date: format!("{key}-{day:02}"),
            day,
        });
    }

    Some(ReportMonth {
        date: key.to_owned(),
        month,
        year,
        name: name.to_owned(),
        days,
    })
}
