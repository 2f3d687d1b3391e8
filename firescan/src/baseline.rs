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

//! baseline anomaly scoring of per scene thermal statistics. Baselines are robust (median/MAD)
//! statistics per (baseline group, calendar month) learned from training observations. A
//! flag is raised if the robust z score of an observation reaches the threshold. A third flag
//! is raised if the spread lies above the extreme value tail quantile of its group/month.
//! The sum of the three flags decides.
//!
//! Independent of the score, the scene ΔT (LST max - LST mean) can be checked against a 99th
//! percentile threshold learned from the training ΔT values

use std::collections::HashMap;
use chrono::{DateTime, Datelike, Utc};
use serde::{Serialize,Deserialize};
use tracing::debug;
use crate::evt::{TailConfig, TailQuantile, Threshold99};
use crate::scene::percentile;

/// scale factor that turns the MAD into a standard deviation estimate for normal data
pub const MAD_SCALE: f64 = 1.4826;

pub const DEFAULT_Z_THRESHOLD: f64 = 3.0;

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct ThermalObservation {
    pub scene: String,
    /// sensors with comparable resolution share a baseline group
    pub group: String,
    pub time: DateTime<Utc>,
    /// P95 - median of the scene LST
    pub spread: f64,
    #[serde(default)]
    pub lst_max: Option<f64>,
    #[serde(default)]
    pub lst_mean: Option<f64>,
    #[serde(default)]
    pub air_tmax: Option<f64>,
}

impl ThermalObservation {
    pub fn month (&self)->u32 { self.time.month() }

    /// land surface maximum minus air temperature maximum
    pub fn weather_gap (&self)->Option<f64> {
        match (self.lst_max, self.air_tmax) {
            (Some(lst), Some(air)) if lst.is_finite() && air.is_finite() => Some( lst - air),
            _ => None
        }
    }

    /// hottest minus mean land surface temperature of the scene
    pub fn delta_t (&self)->Option<f64> {
        match (self.lst_max, self.lst_mean) {
            (Some(max), Some(mean)) if max.is_finite() && mean.is_finite() => Some( max - mean),
            _ => None
        }
    }

    fn key (&self)->(String,u32) { (self.group.clone(), self.month()) }
}

#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct RobustStats {
    pub median: f64,
    pub mad: f64,
    pub n: usize,
}

impl RobustStats {
    /// None if there are no finite values
    pub fn from_values (values: &[f64])->Option<Self> {
        let mut vs: Vec<f64> = values.iter().copied().filter( |v| v.is_finite()).collect();
        vs.sort_by( |a,b| a.total_cmp(b));
        let median = percentile( &vs, 50.0)?;

        let mut devs: Vec<f64> = vs.iter().map( |v| (v - median).abs()).collect();
        devs.sort_by( |a,b| a.total_cmp(b));
        let mad = percentile( &devs, 50.0)?;

        Some( RobustStats { median, mad, n: vs.len() })
    }

    pub fn z (&self, x: f64)->f64 {
        (x - self.median) / (MAD_SCALE * (self.mad + 1e-9))
    }
}

#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize,Deserialize)]
pub enum Decision { Investigate, LowInterest, Ignore }

impl Decision {
    pub fn from_score (score: u32)->Self {
        match score {
            0 => Decision::Ignore,
            1 => Decision::LowInterest,
            _ => Decision::Investigate
        }
    }
}

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct AnomalyScore {
    pub scene: String,
    pub time: DateTime<Utc>,
    /// None if there is no baseline for the group/month
    pub spread_z: Option<f64>,
    pub gap_z: Option<f64>,
    /// None if there were not enough training exceedances for a tail model
    pub tail_quantile: Option<f64>,
    pub spread_flag: bool,
    pub gap_flag: bool,
    pub tail_flag: bool,
    pub score: u32,
    pub decision: Decision,
    pub delta_t: Option<f64>,
    /// not part of the score
    pub delta_t_flag: bool,
}

#[derive(Debug,Clone,Default)]
pub struct Baseline {
    spread: HashMap<(String,u32),RobustStats>,
    gap: HashMap<(String,u32),RobustStats>,
    tail: HashMap<(String,u32),TailQuantile>,
    threshold: f64,
    delta_t: Option<Threshold99>,
}

impl Baseline {
    /// robust baselines and tail models with default [`TailConfig`]
    pub fn fit (training: &[ThermalObservation], threshold: f64)->Self {
        Self::fit_with( training, threshold, &TailConfig::default())
    }

    pub fn fit_with (training: &[ThermalObservation], threshold: f64, tail_config: &TailConfig)->Self {
        let mut spreads: HashMap<(String,u32),Vec<f64>> = HashMap::new();
        let mut gaps: HashMap<(String,u32),Vec<f64>> = HashMap::new();

        for obs in training {
            spreads.entry( obs.key()).or_default().push( obs.spread);
            if let Some(gap) = obs.weather_gap() {
                gaps.entry( obs.key()).or_default().push( gap);
            }
        }

        let tail: HashMap<(String,u32),TailQuantile> = spreads.iter()
            .filter_map( |(k,vs)| TailQuantile::fit( vs, tail_config).map( |t| (k.clone(),t)))
            .collect();

        let stats = |m: HashMap<(String,u32),Vec<f64>>| -> HashMap<(String,u32),RobustStats> {
            m.into_iter().filter_map( |(k,vs)| RobustStats::from_values( &vs).map( |s| (k,s))).collect()
        };

        let baseline = Baseline { spread: stats( spreads), gap: stats( gaps), tail, threshold, delta_t: None };
        debug!("fitted {} spread, {} gap and {} tail baselines", baseline.spread.len(), baseline.gap.len(), baseline.tail.len());
        baseline
    }

    /// enable the ΔT check
    pub fn with_delta_t_threshold (mut self, threshold: Threshold99)->Self {
        self.delta_t = Some(threshold);
        self
    }

    pub fn spread_stats (&self, group: &str, month: u32)->Option<&RobustStats> {
        self.spread.get( &(group.to_string(), month))
    }

    pub fn tail_quantile (&self, group: &str, month: u32)->Option<&TailQuantile> {
        self.tail.get( &(group.to_string(), month))
    }

    pub fn delta_t_threshold (&self)->Option<&Threshold99> { self.delta_t.as_ref() }

    pub fn score (&self, obs: &ThermalObservation)->AnomalyScore {
        let key = obs.key();
        let spread_z = if obs.spread.is_finite() { self.spread.get( &key).map( |s| s.z( obs.spread)) } else { None };
        let gap_z = obs.weather_gap().and_then( |g| self.gap.get( &key).map( |s| s.z( g)));

        let tail = self.tail.get( &key);

        let spread_flag = spread_z.is_some_and( |z| z >= self.threshold);
        let gap_flag = gap_z.is_some_and( |z| z >= self.threshold);
        let tail_flag = obs.spread.is_finite() && tail.is_some_and( |t| t.exceeds( obs.spread));
        let score = spread_flag as u32 + gap_flag as u32 + tail_flag as u32;

        let delta_t = obs.delta_t();
        let delta_t_flag = match (delta_t, &self.delta_t) {
            (Some(dt), Some(thr)) => thr.exceeds( dt),
            _ => false
        };

        AnomalyScore {
            scene: obs.scene.clone(),
            time: obs.time,
            spread_z, gap_z,
            tail_quantile: tail.map( |t| t.quantile),
            spread_flag, gap_flag, tail_flag,
            score,
            decision: Decision::from_score( score),
            delta_t, delta_t_flag
        }
    }

    pub fn score_all (&self, observations: &[ThermalObservation])->Vec<AnomalyScore> {
        observations.iter().map( |obs| self.score( obs)).collect()
    }
}
