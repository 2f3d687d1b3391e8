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

//! scene level statistics: cloud cover over an AOI and robust thermal spread

use serde::{Serialize,Deserialize};
use tracing::{debug, info};
use crate::aoi::Aoi;
use crate::errors::Result;
use crate::image::ImageRecord;
use crate::raster::{Band, Scale};
use crate::reduce::values_in_region;
use crate::threshold::{MissingBandPolicy, ThresholdRule};

/// keep scenes whose cloud fraction over the AOI is below `max_cloud_fraction`
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct SceneFilter {
    pub qa_band: String,
    /// holds for cloudy pixels
    pub cloudy: ThresholdRule,
    pub max_cloud_fraction: f64,
    #[serde(default)]
    pub scale: Scale,
}

impl SceneFilter {
    /// Landsat collection 2 QA_PIXEL based filter, evaluated at 30m
    pub fn landsat (max_cloud_fraction: f64)->Self {
        SceneFilter { qa_band: "QA_PIXEL".into(), cloudy: ThresholdRule::landsat_cloudy(), max_cloud_fraction, scale: Scale::Meters(30.0) }
    }
}

/// mean of the cloud flag over the valid QA pixels whose centers are inside `aoi`. None if there are
/// no such pixels
pub fn cloud_fraction (image: &ImageRecord, qa_band: &str, cloudy: &ThresholdRule, aoi: &Aoi, scale: Scale)->Result<Option<f64>> {
    let grid = image.grid.at_scale( scale)?;
    let qa = image.band( qa_band)?.resample( &image.grid, &grid);
    let flags = qa.map( |v| if v.is_nan() { f32::NAN } else if cloudy.holds(v) { 1.0 } else { 0.0 });

    let (n,sum) = values_in_region( &flags, &grid, aoi).fold( (0usize,0.0), |(n,s),v| (n+1, s+v));
    Ok( if n > 0 { Some( sum / n as f64) } else { None } )
}

/// the scenes that pass `filter`, in capture time order. Scenes without any valid QA pixel in the
/// AOI are dropped
pub fn select_clear_scenes (images: &[ImageRecord], filter: &SceneFilter, aoi: &Aoi, policy: MissingBandPolicy)->Result<Vec<ImageRecord>> {
    let mut selected = Vec::new();
    for img in images {
        match policy.apply( cloud_fraction( img, &filter.qa_band, &filter.cloudy, aoi, filter.scale))? {
            Some(Some(f)) if f < filter.max_cloud_fraction => selected.push( img.clone()),
            Some(f) => debug!("dropping scene {} with cloud fraction {:?}", img.id, f),
            None => {}
        }
    }
    selected.sort_by( |a,b| a.time.cmp( &b.time).then_with( || a.id.cmp( &b.id)));
    info!("{} of {} scenes are clear", selected.len(), images.len());
    Ok( selected )
}

/// linear interpolated percentile (0..=100) of sorted values
pub fn percentile (sorted: &[f64], p: f64)->Option<f64> {
    if sorted.is_empty() { return None }
    let rank = (p / 100.0).clamp( 0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    Some( sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64))
}

/// the values of a thermal band that are not NaN, not `nodata` and not flagged by a non-zero `cloud`
/// value, in ascending order
pub fn valid_thermal_values (band: &Band, cloud: Option<&Band>, nodata: Option<f32>)->Vec<f64> {
    let (rows,cols) = band.shape();
    let mut values: Vec<f64> = Vec::with_capacity( rows*cols);

    for row in 0..rows {
        for col in 0..cols {
            let v = band.get( col, row);
            if v.is_nan() || Some(v) == nodata { continue }
            if let Some(c) = cloud {
                let cv = c.get( col, row);
                if !cv.is_nan() && cv != 0.0 { continue }
            }
            values.push( v as f64);
        }
    }

    values.sort_by( |a,b| a.total_cmp(b));
    values
}

/// P95 - median of the valid pixels of a thermal band (see [`valid_thermal_values`]).
/// None if no valid pixel remains
pub fn robust_spread (band: &Band, cloud: Option<&Band>, nodata: Option<f32>)->Option<f64> {
    let values = valid_thermal_values( band, cloud, nodata);
    Some( percentile( &values, 95.0)? - percentile( &values, 50.0)? )
}
