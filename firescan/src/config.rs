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
#![allow(unused)]

use std::{path::PathBuf, time::Duration};
use serde::{Serialize,Deserialize};
use firescan_common::datetime::{TimeWindow, deserialize_optional_duration, serialize_optional_duration};
use crate::aoi::AoiSpec;
use crate::baseline::DEFAULT_Z_THRESHOLD;
use crate::burn::BurnConfig;
use crate::daily::DailyCountJob;
use crate::detection::DetectionSource;
use crate::evt::TailConfig;
use crate::raster::BandScaling;
use crate::threshold::MissingBandPolicy;
use crate::weather::HeatwaveCheck;

/// detection of anomalous pixel centers for a number of sensors within one window
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct DetectionJob {
    pub window: TimeWindow,
    pub sources: Vec<DetectionSource>,
}

fn default_z_threshold ()->f64 { DEFAULT_Z_THRESHOLD }

/// offset between Kelvin and degree Celsius
pub const ZERO_CELSIUS: f64 = 273.15;

/// check of the scene ΔT (LST max - LST mean) against the 99th percentile of the training ΔT
#[derive(Debug,Clone,Default,PartialEq,Serialize,Deserialize)]
pub struct DeltaTCheck {
    /// fixed threshold [°C] instead of the one learned from the training table
    #[serde(default)]
    pub override_threshold: Option<f64>,
}

/// per scene thermal spread scored against baselines learned from a training table
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct ThermalJob {
    pub collection: String,
    pub window: TimeWindow,
    /// baseline group the evaluated scenes belong to
    pub group: String,
    pub lst_band: String,
    #[serde(default)]
    pub cloud_band: Option<String>,
    #[serde(default)]
    pub nodata: Option<f32>,
    /// applied to the stored LST values before any statistics are computed
    #[serde(default)]
    pub scaling: Option<BandScaling>,
    /// subtracted after scaling, [`ZERO_CELSIUS`] turns Kelvin into °C
    #[serde(default)]
    pub kelvin_offset: Option<f64>,
    /// CSV file with `scene,group,time,spread,lst_max,lst_mean,air_tmax` training rows [°C]
    pub training: PathBuf,
    #[serde(default="default_z_threshold")]
    pub z_threshold: f64,
    #[serde(default)]
    pub tail: TailConfig,
    #[serde(default)]
    pub delta_t: Option<DeltaTCheck>,
    #[serde(default)]
    pub heatwave: Option<HeatwaveCheck>,
}

impl ThermalJob {
    /// physical value (usually °C) of a stored LST value
    pub fn physical (&self, raw: f64)->f64 {
        let v = match &self.scaling {
            Some(s) => raw * s.scale + s.offset,
            None => raw
        };
        v - self.kelvin_offset.unwrap_or(0.0)
    }
}

/// the top level configuration of a scan. Each job is optional
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct ScanConfig {
    pub aoi: AoiSpec,

    #[serde(default, deserialize_with="deserialize_optional_duration", serialize_with="serialize_optional_duration")]
    pub query_timeout: Option<Duration>,

    #[serde(default)]
    pub missing_band: MissingBandPolicy,

    #[serde(default)]
    pub detections: Option<DetectionJob>,

    #[serde(default)]
    pub daily: Option<DailyCountJob>,

    #[serde(default)]
    pub burn: Option<BurnConfig>,

    #[serde(default)]
    pub thermal: Option<ThermalJob>,
}
