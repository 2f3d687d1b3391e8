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

//! per day anomaly pixel counts over a window

use std::collections::BTreeMap;
use chrono::NaiveDate;
use serde::{Serialize,Deserialize};
use tracing::{debug, info};
use firescan_common::datetime::{TimeWindow, DATE_FORMAT};
use crate::aoi::Aoi;
use crate::detection::DetectionSource;
use crate::errors::{FirescanError, Result, op_failed};
use crate::image::ImageRecord;
use crate::mask::AnomalyMask;
use crate::raster::Scale;
use crate::reduce::Reducer;
use crate::report::DailyCountTable;
use crate::source::{DataSource, QueryBoundary};
use crate::threshold::{build_masks, MissingBandPolicy};

const COUNT_BAND: &str = "pixel_count";

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct DailyCountJob {
    pub detection: DetectionSource,
    pub window: TimeWindow,
    /// day for which the any-detection layer is narrowed down separately
    #[serde(default)]
    pub focus_day: Option<NaiveDate>,
}

#[derive(Debug,Clone,Default,PartialEq,Serialize,Deserialize)]
pub struct DailyCountResult {
    pub table: DailyCountTable,
    /// pixels that were anomalous on any day of the window
    pub any_px: u64,
    pub focus_day_px: Option<u64>,
}

/// number of set pixels of `mask` inside `aoi` at `scale`, computed as a `Count` reduction of the
/// self-masked mask through `source`
pub fn count_in_region (source: &dyn DataSource, mask: &AnomalyMask, aoi: &Aoi, scale: Scale)->Result<u64> {
    if mask.is_empty() { return Ok(0) }

    let src = mask.source();
    let img = ImageRecord::new( format!("count:{}", src.image_id), &src.collection, src.time, mask.grid().clone())
        .with_band( COUNT_BAND, mask.to_band())?;
    let reduction = source.reduce_region( &img, aoi, scale, Reducer::Count)?;

    reduction.get( COUNT_BAND).map( |n| *n as u64).ok_or_else( || op_failed!("count reduction has no {} band", COUNT_BAND))
}

/// one row per calendar day that has masks, counts of the same day are summed
pub fn daily_counts (source: &dyn DataSource, masks: &[AnomalyMask], aoi: &Aoi, scale: Scale)->Result<DailyCountTable> {
    let mut counts: BTreeMap<String,u64> = BTreeMap::new();
    for mask in masks {
        let n = count_in_region( source, mask, aoi, scale)?;
        *counts.entry( mask.source().time.format( DATE_FORMAT).to_string()).or_insert(0) += n;
    }
    Ok( DailyCountTable::from_counts( counts) )
}

/// per pixel OR of all masks (the "anomalous at any time" layer). Masks on other grids are resampled
/// onto the grid of the first one. None for no masks
pub fn any_detection_mask (masks: &[AnomalyMask])->Result<Option<AnomalyMask>> {
    let Some(first) = masks.first() else { return Ok(None) };

    let mut acc = first.clone();
    for mask in &masks[1..] {
        acc = acc.union( &mask.resample( first.grid()))?;
    }
    Ok( Some(acc) )
}

/// the masks whose source was captured within `window`
pub fn filter_window<'a> (masks: &'a [AnomalyMask], window: &TimeWindow)->Vec<&'a AnomalyMask> {
    masks.iter().filter( |m| window.contains( &m.source().time)).collect()
}

/// query, threshold and count the configured collection
pub async fn run_daily_counts (source: &dyn DataSource, boundary: &QueryBoundary, job: &DailyCountJob,
                               aoi: &Aoi, policy: MissingBandPolicy)->Result<DailyCountResult>
{
    let det = &job.detection;
    let images = boundary.query( source, &det.collection, aoi.bounds(), &job.window).await?;
    let masks = build_masks( &images, &det.band, &det.rule, policy)?;
    if masks.is_empty() {
        info!("no {} masks in {}", det.sensor, job.window);
    }

    let table = daily_counts( source, &masks, aoi, det.scale)?;

    let any_px = match any_detection_mask( &masks)? {
        Some(mask) => count_in_region( source, &mask, aoi, det.scale)?,
        None => 0
    };

    let focus_day_px = match job.focus_day {
        Some(day) => {
            let day_window = TimeWindow::single_day( day)?;
            let day_masks: Vec<AnomalyMask> = filter_window( &masks, &day_window).into_iter().cloned().collect();
            Some( match any_detection_mask( &day_masks)? {
                Some(mask) => count_in_region( source, &mask, aoi, det.scale)?,
                None => 0
            })
        }
        None => None
    };

    debug!("{} daily rows, {} px total, {} px any", table.len(), table.total(), any_px);
    Ok( DailyCountResult { table, any_px, focus_day_px } )
}
