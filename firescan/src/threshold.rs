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

use std::fmt;
use serde::{Serialize,Deserialize};
use tracing::{debug, warn};
use crate::errors::{FirescanError, Result};
use crate::image::ImageRecord;
use crate::mask::{AnomalyMask, MaskSource};

#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize,Deserialize)]
pub enum Comparison { Gt, Ge, Lt, Le, Eq, Ne }

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self { Comparison::Gt => ">", Comparison::Ge => ">=", Comparison::Lt => "<",
                             Comparison::Le => "<=", Comparison::Eq => "==", Comparison::Ne => "!=" };
        write!(f, "{s}")
    }
}

/// a per-pixel predicate on a single band. Masked (NaN) pixels never satisfy a rule
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub enum ThresholdRule {
    Compare { op: Comparison, value: f64 },
    /// valid unless the (integer) pixel value is one of the codes
    ExcludeCodes(Vec<i64>),
    /// bits `start..=end` of the integer pixel value equal `value`
    QaBits { start: u8, end: u8, value: u32 },
}

impl ThresholdRule {
    pub fn at_least (value: f64)->Self { ThresholdRule::Compare { op: Comparison::Ge, value } }
    pub fn greater_than (value: f64)->Self { ThresholdRule::Compare { op: Comparison::Gt, value } }

    /// Sentinel-2 scene classification codes for cloud shadow, medium and high probability clouds,
    /// thin cirrus and snow
    pub fn sentinel2_clear ()->Self { ThresholdRule::ExcludeCodes( vec![3, 8, 9, 10, 11]) }

    /// Landsat collection 2 QA_PIXEL: bit 6 (clear) not set
    pub fn landsat_cloudy ()->Self { ThresholdRule::QaBits { start: 6, end: 6, value: 0 } }

    pub fn holds (&self, x: f32)->bool {
        if x.is_nan() { return false }

        match self {
            ThresholdRule::Compare { op, value } => {
                let x = x as f64;
                match op {
                    Comparison::Gt => x > *value,
                    Comparison::Ge => x >= *value,
                    Comparison::Lt => x < *value,
                    Comparison::Le => x <= *value,
                    Comparison::Eq => x == *value,
                    Comparison::Ne => x != *value,
                }
            }
            ThresholdRule::ExcludeCodes( codes) => {
                !(x.fract() == 0.0 && codes.iter().any( |c| *c as f64 == x as f64))
            }
            ThresholdRule::QaBits { start, end, value } => {
                if x < 0.0 || x.fract() != 0.0 || x > u32::MAX as f32 || start > end || *end > 31 { return false }
                let v = x as u32;
                let width = (end - start + 1) as u32;
                let pattern = if width >= 32 { u32::MAX } else { (1u32 << width) - 1 };
                (v >> start) & pattern == *value
            }
        }
    }
}

impl fmt::Display for ThresholdRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThresholdRule::Compare { op, value } => write!(f, "{op} {value}"),
            ThresholdRule::ExcludeCodes( codes) => write!(f, "not in {codes:?}"),
            ThresholdRule::QaBits { start, end, value } => write!(f, "bits[{start}..={end}] == {value}"),
        }
    }
}

/// what to do with images that lack a required band
#[derive(Debug,Clone,Copy,PartialEq,Eq,Default,Serialize,Deserialize)]
pub enum MissingBandPolicy {
    /// log and leave the image out
    #[default]
    Skip,
    /// fail the operation
    Abort,
}

impl MissingBandPolicy {
    /// turn a per-image result into an optional value according to the policy
    pub fn apply<T> (&self, res: Result<T>)->Result<Option<T>> {
        match res {
            Ok(v) => Ok( Some(v) ),
            Err( e @ FirescanError::MissingBand{..}) if *self == MissingBandPolicy::Skip => {
                warn!("skipping image: {e}");
                Ok( None )
            }
            Err(e) => Err(e)
        }
    }
}

pub fn mask_source (image: &ImageRecord)->MaskSource {
    MaskSource { image_id: image.id.clone(), collection: image.collection.clone(), time: image.time }
}

/// the mask of all pixels of `band` that satisfy `rule`, on the image grid
pub fn build_mask (image: &ImageRecord, band: &str, rule: &ThresholdRule)->Result<AnomalyMask> {
    let data = image.band( band)?;
    Ok( AnomalyMask::from_predicate( image.grid.clone(), mask_source( image), rule.clone(), |c,r| rule.holds( data.get( c, r))) )
}

/// one mask per image, in input order. An empty input yields an empty result
pub fn build_masks (images: &[ImageRecord], band: &str, rule: &ThresholdRule, policy: MissingBandPolicy)->Result<Vec<AnomalyMask>> {
    if images.is_empty() {
        debug!("no images to threshold");
        return Ok( Vec::new() )
    }

    let mut masks = Vec::with_capacity( images.len());
    for image in images {
        if let Some(mask) = policy.apply( build_mask( image, band, rule))? {
            masks.push( mask);
        }
    }
    Ok( masks )
}
