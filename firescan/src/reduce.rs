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

use std::collections::BTreeMap;
use serde::{Serialize,Deserialize};
use crate::aoi::Aoi;
use crate::errors::Result;
use crate::image::ImageRecord;
use crate::raster::{Band, GridSpec, Scale};

/// aggregation over the valid (non NaN) pixels of a region
#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize,Deserialize)]
pub enum Reducer { Sum, Count, Mean, Min, Max }

impl Reducer {
    /// Sum and Count of an empty pixel set are 0, all others are undefined (None)
    pub fn reduce<I> (&self, values: I)->Option<f64> where I: Iterator<Item=f64> {
        let mut n = 0usize;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in values {
            n += 1;
            sum += v;
            min = min.min(v);
            max = max.max(v);
        }

        match self {
            Reducer::Sum => Some( sum),
            Reducer::Count => Some( n as f64),
            Reducer::Mean => if n > 0 { Some( sum / n as f64) } else { None },
            Reducer::Min => if n > 0 { Some( min) } else { None },
            Reducer::Max => if n > 0 { Some( max) } else { None },
        }
    }
}

/// the valid values of `band` (on `grid`) whose pixel center is inside `region`
pub fn values_in_region<'a> (band: &'a Band, grid: &'a GridSpec, region: &'a Aoi)->impl Iterator<Item=f64> + 'a {
    (0..grid.rows).flat_map( move |row| (0..grid.cols).map( move |col| (col,row)))
        .filter_map( move |(col,row)| {
            let v = band.get( col, row);
            if !v.is_nan() && region.contains( &grid.pixel_center_geo( col, row)) { Some( v as f64) } else { None }
        })
}

/// reduce each band of `image` over `region`, after resampling to `scale`. Bands for which the
/// reducer is undefined are omitted from the result
pub fn reduce_region (image: &ImageRecord, region: &Aoi, scale: Scale, reducer: Reducer)->Result<BTreeMap<String,f64>> {
    let grid = image.grid.at_scale( scale)?;
    let mut result = BTreeMap::new();

    for (name,band) in image.bands() {
        let band = band.resample( &image.grid, &grid);
        if let Some(v) = reducer.reduce( values_in_region( &band, &grid, region)) {
            result.insert( name.clone(), v);
        }
    }
    Ok( result )
}
