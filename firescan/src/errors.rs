/*
 * Copyright © 2025, United States Government, as represented by the Administrator of 
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License"); 
 * you may not use this file except in compliance with the License. You may obtain a copy 
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

use std::time::Duration;
use thiserror::Error;
use firescan_common::{CommonError, datetime::TimeWindow};

pub type Result<T> = std::result::Result<T, FirescanError>;

#[derive(Error,Debug)]
pub enum FirescanError {

    #[error("image {image} has no band {band}")]
    MissingBand { image: String, band: String },

    #[error("query of {collection} in {window} failed: {msg}")]
    DataSource { collection: String, window: TimeWindow, msg: String },

    #[error("query of {collection} in {window} timed out after {timeout:?}")]
    QueryTimeout { collection: String, window: TimeWindow, timeout: Duration },

    #[error("query of {collection} in {window} was cancelled")]
    QueryCancelled { collection: String, window: TimeWindow },

    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("invalid time window: {0}")]
    InvalidWindow(String),

    #[error("incompatible grids: {0}")]
    IncompatibleGrid(String),

    #[error("config error {0}")]
    ConfigError( #[from] ron::error::SpannedError),

    #[error("IO error {0}")]
    IOError( #[from] std::io::Error),

    #[error("CSV error {0}")]
    CsvError( #[from] csv::Error),

    #[error("JSON error {0}")]
    SerdeError( #[from] serde_json::Error),

    #[error("task join error {0}")]
    JoinError( #[from] tokio::task::JoinError),

    #[error("operation failed {0}")]
    OpFailed(String),
}

impl FirescanError {
    /// true for the errors that are tied to a single data source query, i.e. the ones that can
    /// be reported per collection instead of aborting a whole scan
    pub fn is_query_error (&self)->bool {
        matches!( self, FirescanError::DataSource{..} | FirescanError::QueryTimeout{..} | FirescanError::QueryCancelled{..})
    }
}

impl From<CommonError> for FirescanError {
    fn from (e: CommonError)->Self {
        match e {
            CommonError::InvalidWindow(msg) => FirescanError::InvalidWindow(msg),
            CommonError::InvalidGeometry(msg) | CommonError::InvalidCoordinate(msg) => FirescanError::InvalidGeometry(msg),
            CommonError::ParseError(msg) => FirescanError::OpFailed(msg),
        }
    }
}

macro_rules! op_failed {
    ($fmt:literal $(, $arg:expr )* ) => {
        FirescanError::OpFailed( format!( $fmt $(, $arg)* ))
    };
}
pub (crate) use op_failed;

macro_rules! invalid_geometry {
    ($fmt:literal $(, $arg:expr )* ) => {
        FirescanError::InvalidGeometry( format!( $fmt $(, $arg)* ))
    };
}
pub (crate) use invalid_geometry;

macro_rules! incompatible_grid {
    ($fmt:literal $(, $arg:expr )* ) => {
        FirescanError::IncompatibleGrid( format!( $fmt $(, $arg)* ))
    };
}
pub (crate) use incompatible_grid;

pub fn missing_band (image: &str, band: &str)->FirescanError {
    FirescanError::MissingBand { image: image.to_string(), band: band.to_string() }
}
