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

//! heatwave context for thermal anomalies. A daily air temperature maximum series is compared to
//! a monthly climatology (usually July) learned from a baseline period. A heatwave is a run of at
//! least `min_days` consecutive days above the climatology percentile

use std::{fs::File, path::{Path, PathBuf}};
use chrono::{Datelike, NaiveDate};
use serde::{Serialize,Deserialize};
use tracing::{debug, info};
use firescan_common::datetime::TimeWindow;
use crate::errors::Result;
use crate::scene::percentile;

pub const DEFAULT_CLIMATOLOGY_MONTH: u32 = 7;
pub const DEFAULT_HEATWAVE_PERCENTILE: f64 = 95.0;
pub const DEFAULT_HEATWAVE_DAYS: usize = 3;

/// one row of a daily weather table. Missing values are empty fields
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct DailyTmax {
    pub date: NaiveDate,
    /// [°C]
    pub air_tmax: Option<f64>,
}

impl DailyTmax {
    pub fn new (date: NaiveDate, air_tmax: Option<f64>)->Self { DailyTmax { date, air_tmax } }

    fn value (&self)->Option<f64> { self.air_tmax.filter( |t| t.is_finite()) }
}

pub fn read_daily_tmax<P: AsRef<Path>> (path: P)->Result<Vec<DailyTmax>> {
    let mut rdr = csv::Reader::from_reader( File::open( path.as_ref())?);
    let mut rows = Vec::new();
    for rec in rdr.deserialize() {
        rows.push( rec?);
    }
    info!("{} daily air temperature rows from {:?}", rows.len(), path.as_ref());
    Ok( rows )
}

fn default_month ()->u32 { DEFAULT_CLIMATOLOGY_MONTH }
fn default_percentile ()->f64 { DEFAULT_HEATWAVE_PERCENTILE }
fn default_min_days ()->usize { DEFAULT_HEATWAVE_DAYS }

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct HeatwaveCheck {
    /// CSV file with `date,air_tmax` rows covering the baseline period and the evaluated window
    pub weather: PathBuf,
    /// period the climatology is computed from
    pub baseline: TimeWindow,
    #[serde(default="default_month")]
    pub month: u32,
    #[serde(default="default_percentile")]
    pub percentile: f64,
    #[serde(default="default_min_days")]
    pub min_days: usize,
}

impl HeatwaveCheck {
    pub fn new (weather: impl Into<PathBuf>, baseline: TimeWindow)->Self {
        HeatwaveCheck {
            weather: weather.into(),
            baseline,
            month: DEFAULT_CLIMATOLOGY_MONTH,
            percentile: DEFAULT_HEATWAVE_PERCENTILE,
            min_days: DEFAULT_HEATWAVE_DAYS
        }
    }
}

/// mean and percentile of the daily maxima of one calendar month within the baseline period
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct Climatology {
    pub month: u32,
    pub mean: f64,
    pub threshold: f64,
    pub n: usize,
}

impl Climatology {
    /// None if the baseline has no valid value for `month`
    pub fn from_series (series: &[DailyTmax], baseline: &TimeWindow, month: u32, pct: f64)->Option<Self> {
        let mut vs: Vec<f64> = series.iter()
            .filter( |d| d.date.month() == month && baseline.contains_date( d.date))
            .filter_map( |d| d.value())
            .collect();
        vs.sort_by( |a,b| a.total_cmp(b));

        let threshold = percentile( &vs, pct)?;
        let mean = vs.iter().sum::<f64>() / vs.len() as f64;
        Some( Climatology { month, mean, threshold, n: vs.len() })
    }
}

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct HeatwaveDay {
    pub date: NaiveDate,
    pub air_tmax: Option<f64>,
    /// difference to the climatology mean
    pub anomaly: Option<f64>,
    pub above: bool,
    /// length of the run of days above the threshold this day belongs to, 0 if not above
    pub run_len: usize,
    pub heatwave: bool,
}

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct HeatwaveReport {
    pub climatology: Option<Climatology>,
    pub days: Vec<HeatwaveDay>,
    pub max_run: usize,
    pub detected: bool,
}

impl HeatwaveReport {
    /// first and last day of all heatwave runs
    pub fn period (&self)->Option<(NaiveDate,NaiveDate)> {
        let mut hw = self.days.iter().filter( |d| d.heatwave).map( |d| d.date);
        let first = hw.next()?;
        Some( (first, hw.last().unwrap_or( first)) )
    }
}

/// flag the days of `window` that are part of a heatwave. Without a climatology no day is above.
/// Missing values and missing days break runs
pub fn detect_heatwave (series: &[DailyTmax], window: &TimeWindow, check: &HeatwaveCheck)->HeatwaveReport {
    let climatology = Climatology::from_series( series, &check.baseline, check.month, check.percentile);
    if climatology.is_none() {
        debug!("no climatology for month {} in {}", check.month, check.baseline);
    }

    let mut in_window: Vec<&DailyTmax> = series.iter().filter( |d| window.contains_date( d.date)).collect();
    in_window.sort_by_key( |d| d.date);

    let mut days: Vec<HeatwaveDay> = in_window.iter().map( |d| {
        let t = d.value();
        HeatwaveDay {
            date: d.date,
            air_tmax: d.air_tmax,
            anomaly: t.zip( climatology).map( |(t,c)| t - c.mean),
            above: t.zip( climatology).is_some_and( |(t,c)| t > c.threshold),
            run_len: 0,
            heatwave: false
        }
    }).collect();

    // run_len of all members is the length of the full run
    let mut start = 0;
    while start < days.len() {
        if !days[start].above { start += 1; continue }
        let mut end = start + 1;
        while end < days.len() && days[end].above && days[end].date.pred_opt() == Some(days[end-1].date) {
            end += 1;
        }
        let len = end - start;
        for day in &mut days[start..end] {
            day.run_len = len;
            day.heatwave = len >= check.min_days;
        }
        start = end;
    }

    let max_run = days.iter().map( |d| d.run_len).max().unwrap_or(0);
    let detected = days.iter().any( |d| d.heatwave);
    info!("max run of {} days above the month {} climatology in {}, heatwave: {}", max_run, check.month, window, detected);

    HeatwaveReport { climatology, days, max_run, detected }
}
