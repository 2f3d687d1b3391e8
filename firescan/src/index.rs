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

//! spectral indices

use crate::errors::Result;
use crate::image::ImageRecord;
use crate::raster::Band;

pub const NBR: &str = "NBR";
pub const NDVI: &str = "NDVI";
pub const DNBR: &str = "dNBR";

/// `(a - b) / (a + b)`, NaN where either input is NaN or the denominator vanishes
pub fn normalized_difference (a: &Band, b: &Band)->Result<Band> {
    a.zip_with( b, |x,y| {
        if x.is_nan() || y.is_nan() { return f32::NAN }
        let sum = x as f64 + y as f64;
        if sum.abs() < 1e-10 { f32::NAN } else { ((x as f64 - y as f64) / sum) as f32 }
    })
}

/// `a - b`, NaN propagates
pub fn difference (a: &Band, b: &Band)->Result<Band> {
    a.zip_with( b, |x,y| x - y)
}

/// single band image `name` = normalized difference of bands `a` and `b` of `image`
pub fn normalized_difference_image (image: &ImageRecord, a: &str, b: &str, name: &str)->Result<ImageRecord> {
    let nd = normalized_difference( image.band( a)?, image.band( b)?)?;
    image.select( &[])?.with_band( name, nd)
}

/// normalized burn ratio from near and short wave infrared
pub fn nbr (image: &ImageRecord, nir: &str, swir: &str)->Result<Band> {
    normalized_difference( image.band( nir)?, image.band( swir)?)
}

/// normalized difference vegetation index from near infrared and red
pub fn ndvi (image: &ImageRecord, nir: &str, red: &str)->Result<Band> {
    normalized_difference( image.band( nir)?, image.band( red)?)
}
