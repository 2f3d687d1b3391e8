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

//! conversion of anomaly masks into point features at pixel centers

use std::collections::BTreeMap;
use serde::{Serialize,Deserialize};
use tracing::debug;
use firescan_common::datetime::format_minute;
use firescan_common::geo::{GeoPoint, GeoRect};
use crate::aoi::Aoi;
use crate::errors::Result;
use crate::mask::AnomalyMask;
use crate::raster::{Projection, Scale};

/// an untagged vector feature as produced by a data source reduction
#[derive(Debug,Clone,PartialEq)]
pub struct VectorFeature {
    pub geometry: GeoPoint,
    pub attributes: BTreeMap<String,String>,
}

/// a detection as reported: pixel center, capture time (minute resolution) and sensor tag
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct DetectionFeature {
    pub timestamp: String,
    pub sensor: String,
    pub geometry: GeoPoint,
}

/// the pixel centers of all set pixels whose center lies inside the `region` envelope. The mask is
/// resampled to `scale` (and reprojected if `projection` is given) before centers are computed.
/// This is envelope-based only, callers that need exact AOI containment have to re-check
pub fn reduce_to_vectors (mask: &AnomalyMask, region: &GeoRect, scale: Scale, projection: Option<Projection>)->Result<Vec<VectorFeature>> {
    if mask.is_empty() { return Ok( Vec::new() ) }

    let projection = projection.unwrap_or( mask.grid().projection);
    let grid = mask.grid().reprojected( projection, scale)?;
    let mask = mask.resample( &grid);

    let features = mask.iter().filter_map( |(col,row)| {
        let p = grid.pixel_center_geo( col, row);
        if region.contains( &p) {
            let mut attributes = BTreeMap::new();
            attributes.insert( "col".to_string(), col.to_string());
            attributes.insert( "row".to_string(), row.to_string());
            Some( VectorFeature { geometry: p, attributes })
        } else {
            None
        }
    }).collect();

    Ok( features )
}

/// keep only the features whose geometry is inside `aoi`, and tag them with the capture
/// time of `mask` and `sensor`
pub fn tag_features (features: Vec<VectorFeature>, mask: &AnomalyMask, aoi: &Aoi, sensor: &str)->Vec<DetectionFeature> {
    let n = features.len();
    let timestamp = format_minute( &mask.source().time);

    let detections: Vec<DetectionFeature> = features.into_iter()
        .filter( |f| aoi.contains( &f.geometry))
        .map( |f| DetectionFeature { timestamp: timestamp.clone(), sensor: sensor.to_string(), geometry: f.geometry })
        .collect();

    if detections.len() < n {
        debug!("{} of {} pixel centers of {} outside of AOI", n - detections.len(), n, mask.source().image_id);
    }
    detections
}

/// pixel centers of `mask` at `scale` that are inside `aoi`, tagged with `sensor`
pub fn vectorize (mask: &AnomalyMask, scale: Scale, aoi: &Aoi, sensor: &str)->Result<Vec<DetectionFeature>> {
    let features = reduce_to_vectors( mask, aoi.bounds(), scale, None)?;
    Ok( tag_features( features, mask, aoi, sensor) )
}
