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

//! mask areas in hectares. The area of a mask is `sum(mask * pixel_area)` over the AOI at an
//! explicit scale: the mask is first resampled to that scale, so the result depends on it

use serde::{Serialize,Deserialize};
use firescan_common::geo_constants::SQUARE_METERS_PER_HECTARE;
use crate::aoi::Aoi;
use crate::errors::{Result, op_failed, FirescanError};
use crate::image::ImageRecord;
use crate::mask::AnomalyMask;
use crate::raster::{Band, GridSpec, Scale};
use crate::reduce::{self, Reducer};

pub const AREA_BAND: &str = "area";

/// a labeled area value
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct AreaStatistic {
    pub label: String,
    pub hectares: f64,
}

impl AreaStatistic {
    pub fn new (label: impl ToString, hectares: f64)->Self {
        AreaStatistic { label: label.to_string(), hectares }
    }
}

/// per pixel area in m²
pub fn pixel_area_grid (grid: &GridSpec)->Band {
    let row_areas: Vec<f32> = (0..grid.rows).map( |row| grid.cell_area( row) as f32).collect();
    Band::from_fn( grid.rows, grid.cols, |_,row| row_areas[row])
}

/// an image with a single [`AREA_BAND`] that holds the pixel area of set pixels and 0 elsewhere.
/// The mask is resampled to `scale` first
pub fn mask_area_image (mask: &AnomalyMask, scale: Scale)->Result<ImageRecord> {
    let mask = mask.at_scale( scale)?;
    let grid = mask.grid().clone();
    let areas = pixel_area_grid( &grid);
    let band = Band::from_fn( grid.rows, grid.cols, |c,r| if mask.get(c,r) { areas.get(c,r) } else { 0.0 });

    let src = mask.source();
    ImageRecord::new( format!("area:{}", src.image_id), &src.collection, src.time, grid).with_band( AREA_BAND, band)
}

/// hectares from the result of a `Sum` reduction of a [`mask_area_image`]
pub fn hectares_of (reduction: &std::collections::BTreeMap<String,f64>)->Result<f64> {
    reduction.get( AREA_BAND)
        .map( |m2| m2 / SQUARE_METERS_PER_HECTARE)
        .ok_or_else( || op_failed!("area reduction has no {} band", AREA_BAND))
}

/// area in hectares of the set pixels of `mask` whose centers (at `scale`) are inside `aoi`
pub fn area_hectares (mask: &AnomalyMask, aoi: &Aoi, scale: Scale)->Result<f64> {
    if mask.is_empty() { return Ok( 0.0 ) }

    let img = mask_area_image( mask, scale)?;
    hectares_of( &reduce::reduce_region( &img, aoi, Scale::Native, Reducer::Sum)?)
}
