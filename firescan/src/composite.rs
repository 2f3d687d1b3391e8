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
use chrono::{DateTime, Utc};
use ndarray::Array2;
use tracing::debug;
use crate::errors::{FirescanError, Result};
use crate::image::ImageRecord;
use crate::raster::Band;
use crate::threshold::{MissingBandPolicy, ThresholdRule};

/// a copy of `image` in which all pixels that do not satisfy `clear` on `qa_band` are masked
/// (set to NaN) in every band. For categorical QA bands `clear` is usually an
/// [`ThresholdRule::ExcludeCodes`] rule
pub fn exclusion_masked (image: &ImageRecord, qa_band: &str, clear: &ThresholdRule)->Result<ImageRecord> {
    let qa = image.band( qa_band)?;
    let mut masked = image.select( &[])?;

    for (name,band) in image.bands() {
        let mut b = band.clone();
        for row in 0..image.grid.rows {
            for col in 0..image.grid.cols {
                if !clear.holds( qa.get( col, row)) { b.set( col, row, f32::NAN) }
            }
        }
        masked.insert_band( name, b)?;
    }
    Ok( masked )
}

/// median of the non NaN values, the mean of the two middle values for even counts.
/// NaN if there are no valid values
pub fn median (values: &mut Vec<f32>)->f32 {
    values.retain( |v| !v.is_nan());
    if values.is_empty() { return f32::NAN }

    values.sort_by( |a,b| a.total_cmp(b));
    let n = values.len();
    if n % 2 == 1 {
        values[n/2]
    } else {
        ((values[n/2 - 1] as f64 + values[n/2] as f64) / 2.0) as f32
    }
}

/// property that holds the number of images a composite was built from
pub const N_IMAGES: &str = "n_images";

/// the number of inputs that went into a [`median_composite`], 0 for images that are no composites
pub fn composite_size (composite: &ImageRecord)->usize {
    composite.properties.get( N_IMAGES).and_then( |s| s.parse().ok()).unwrap_or(0)
}

/// per pixel median of `bands` over all `images`, ignoring masked pixels. All images are resampled
/// onto the grid of the first one. Returns None if there are no (usable) images. The composite
/// gets the time of the latest input
pub fn median_composite (id: &str, images: &[ImageRecord], bands: &[&str], policy: MissingBandPolicy)->Result<Option<ImageRecord>> {
    let mut usable: Vec<&ImageRecord> = Vec::with_capacity( images.len());
    for img in images {
        let check = bands.iter().try_for_each( |b| img.band( b).map( |_| ()));
        if policy.apply( check)?.is_some() { usable.push( img) }
    }

    let Some(first) = usable.first() else {
        debug!("no images for composite {id}");
        return Ok( None )
    };

    let grid = first.grid.clone();
    let aligned: Vec<ImageRecord> = usable.iter().map( |img| img.resampled( &grid)).collect();
    let time = aligned.iter().map( |img| img.time).max().unwrap_or( first.time);

    let mut composite = ImageRecord::new( id, &first.collection, time, grid.clone())
        .with_property( N_IMAGES, aligned.len());

    let mut values: Vec<f32> = Vec::with_capacity( aligned.len());
    for name in bands {
        let srcs = aligned.iter().map( |img| img.band( name)).collect::<Result<Vec<&Band>>>()?;
        let band = Band::from_fn( grid.rows, grid.cols, |c,r| {
            values.clear();
            values.extend( srcs.iter().map( |b| b.get( c, r)));
            median( &mut values)
        });
        composite.insert_band( *name, band)?;
    }

    Ok( Some(composite) )
}
