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

//! Error types for the reporting API client

use crate::validate::PayloadKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The request itself failed: connection refused, timeout, or a body
    /// that was not valid JSON
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-success status (404 for unknown dates)
    #[error("api returned status {status} for {url}")]
    Status { status: u16, url: String },

    /// The payload decoded but failed the structural validation rules
    #[error("{kind} payload failed validation")]
    InvalidPayload { kind: PayloadKind },
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;
