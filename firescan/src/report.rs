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

//! result tables and their CSV/JSON output

use std::{collections::BTreeMap, fs::File, io::Write, path::Path};
use serde::{Serialize,Deserialize};
use firescan_common::geo::GeoPoint;
use crate::area::AreaStatistic;
use crate::baseline::AnomalyScore;
use crate::evt::Threshold99;
use crate::weather::HeatwaveReport;
use crate::daily::DailyCountResult;
use crate::errors::Result;
use crate::vectorize::DetectionFeature;

/* #region DetectionTable *****************************************************************************************/

/// a set of detections in deterministic (timestamp, sensor, lon, lat) order
#[derive(Debug,Clone,Default,PartialEq,Serialize,Deserialize)]
pub struct DetectionTable {
    rows: Vec<DetectionFeature>
}

#[derive(Serialize)]
struct DetectionRow<'a> {
    timestamp: &'a str,
    sensor: &'a str,
    lon: f64,
    lat: f64,
}

impl DetectionTable {
    pub fn new ()->Self { DetectionTable::default() }

    pub fn from_features (mut rows: Vec<DetectionFeature>)->Self {
        rows.sort_by( |a,b| {
            a.timestamp.cmp( &b.timestamp)
                .then_with( || a.sensor.cmp( &b.sensor))
                .then_with( || a.geometry.lon().total_cmp( &b.geometry.lon()))
                .then_with( || a.geometry.lat().total_cmp( &b.geometry.lat()))
        });
        rows.dedup();
        DetectionTable { rows }
    }

    /// union of two tables
    pub fn merge (self, other: DetectionTable)->Self {
        let mut rows = self.rows;
        rows.extend( other.rows);
        Self::from_features( rows)
    }

    pub fn rows (&self)->&[DetectionFeature] { &self.rows }
    pub fn len (&self)->usize { self.rows.len() }
    pub fn is_empty (&self)->bool { self.rows.is_empty() }

    pub fn count_by_sensor (&self)->BTreeMap<String,usize> {
        let mut counts = BTreeMap::new();
        for r in &self.rows {
            *counts.entry( r.sensor.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// timestamp,sensor,lon,lat with header, also if there are no rows
    pub fn write_csv<W: Write> (&self, w: W)->Result<()> {
        let mut wtr = csv::Writer::from_writer( w);
        if self.rows.is_empty() {
            wtr.write_record( &["timestamp","sensor","lon","lat"])?;
        }
        for r in &self.rows {
            wtr.serialize( DetectionRow { timestamp: &r.timestamp, sensor: &r.sensor, lon: r.geometry.lon(), lat: r.geometry.lat() })?;
        }
        wtr.flush()?;
        Ok(())
    }
}

/* #endregion DetectionTable */

/* #region DailyCountTable ****************************************************************************************/

#[derive(Debug,Clone,PartialEq,Eq,Serialize,Deserialize)]
pub struct DailyCount {
    pub date: String,
    pub pixel_count: u64,
}

/// per day pixel counts in ascending date order
#[derive(Debug,Clone,Default,PartialEq,Eq,Serialize,Deserialize)]
pub struct DailyCountTable {
    rows: Vec<DailyCount>
}

impl DailyCountTable {
    pub fn new ()->Self { DailyCountTable::default() }

    pub fn from_counts (counts: BTreeMap<String,u64>)->Self {
        DailyCountTable { rows: counts.into_iter().map( |(date,pixel_count)| DailyCount{date,pixel_count}).collect() }
    }

    pub fn rows (&self)->&[DailyCount] { &self.rows }
    pub fn len (&self)->usize { self.rows.len() }
    pub fn is_empty (&self)->bool { self.rows.is_empty() }

    pub fn total (&self)->u64 { self.rows.iter().map( |r| r.pixel_count).sum() }

    pub fn get (&self, date: &str)->Option<u64> {
        self.rows.iter().find( |r| r.date == date).map( |r| r.pixel_count)
    }

    pub fn write_csv<W: Write> (&self, w: W)->Result<()> {
        let mut wtr = csv::Writer::from_writer( w);
        if self.rows.is_empty() {
            wtr.write_record( &["date","pixel_count"])?;
        }
        for r in &self.rows { wtr.serialize( r)?; }
        wtr.flush()?;
        Ok(())
    }
}

/* #endregion DailyCountTable */

pub fn write_area_csv<W: Write> (areas: &[AreaStatistic], w: W)->Result<()> {
    let mut wtr = csv::Writer::from_writer( w);
    if areas.is_empty() {
        wtr.write_record( &["label","hectares"])?;
    }
    for a in areas { wtr.serialize( a)?; }
    wtr.flush()?;
    Ok(())
}

/// everything a scan produced. Parts that were not configured are None
#[derive(Debug,Clone,Default,PartialEq,Serialize,Deserialize)]
pub struct ScanReport {
    #[serde(default, skip_serializing_if="firescan_common::is_none")]
    pub detections: Option<DetectionTable>,
    #[serde(default, skip_serializing_if="firescan_common::is_none")]
    pub daily: Option<DailyCountResult>,
    #[serde(default)]
    pub areas: Vec<AreaStatistic>,
    /// number of (pre,post) images that went into the burn composites
    #[serde(default, skip_serializing_if="firescan_common::is_none")]
    pub burn_images: Option<(usize,usize)>,
    #[serde(default, skip_serializing_if="firescan_common::is_none")]
    pub thermal: Option<Vec<AnomalyScore>>,
    #[serde(default, skip_serializing_if="firescan_common::is_none")]
    pub delta_t_threshold: Option<Threshold99>,
    #[serde(default, skip_serializing_if="firescan_common::is_none")]
    pub heatwave: Option<HeatwaveReport>,
}

impl ScanReport {
    /// writes the CSV tables of all configured parts and report.json into `dir`
    pub fn write_to_dir<P: AsRef<Path>> (&self, dir: P)->Result<()> {
        let dir = dir.as_ref();
        std::fs::create_dir_all( dir)?;

        if let Some(detections) = &self.detections {
            detections.write_csv( File::create( dir.join("detections.csv"))?)?;
        }
        if let Some(daily) = &self.daily {
            daily.table.write_csv( File::create( dir.join("daily_counts.csv"))?)?;
        }
        if !self.areas.is_empty() {
            write_area_csv( &self.areas, File::create( dir.join("areas.csv"))?)?;
        }
        if let Some(scores) = &self.thermal {
            let mut wtr = csv::Writer::from_writer( File::create( dir.join("thermal_scores.csv"))?);
            for s in scores { wtr.serialize( s)?; }
            wtr.flush()?;
        }
        if let Some(hw) = &self.heatwave {
            let mut wtr = csv::Writer::from_writer( File::create( dir.join("heatwave.csv"))?);
            for d in &hw.days { wtr.serialize( d)?; }
            wtr.flush()?;
        }

        let mut file = File::create( dir.join("report.json"))?;
        file.write_all( self.to_json()?.as_bytes())?;
        Ok(())
    }

    pub fn to_json (&self)->Result<String> {
        Ok( serde_json::to_string_pretty( self)? )
    }
}
