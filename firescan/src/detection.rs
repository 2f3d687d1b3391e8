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

//! per-sensor detection of anomalous pixel centers inside an AOI

use std::sync::Arc;
use futures::future::try_join_all;
use serde::{Serialize,Deserialize};
use tokio::task::JoinSet;
use tracing::{debug, info};
use firescan_common::datetime::TimeWindow;
use crate::aoi::Aoi;
use crate::errors::Result;
use crate::image::ImageRecord;
use crate::raster::Scale;
use crate::report::DetectionTable;
use crate::source::{DataSource, QueryBoundary};
use crate::threshold::{build_mask, MissingBandPolicy, ThresholdRule};
use crate::vectorize::{tag_features, DetectionFeature};

/// what to detect in which collection, and how to tag it
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct DetectionSource {
    pub sensor: String,
    pub collection: String,
    pub band: String,
    pub rule: ThresholdRule,
    pub scale: Scale,
}

impl DetectionSource {
    /// VIIRS daily active fire product, fire mask classes 7..9 (low to high confidence fire)
    pub fn viirs_fire_mask ()->Self {
        DetectionSource {
            sensor: "VIIRS".into(),
            collection: "NOAA/VIIRS/001/VNP14A1".into(),
            band: "FireMask".into(),
            rule: ThresholdRule::at_least( 7.0),
            scale: Scale::Meters( 375.0),
        }
    }

    /// MODIS Terra daily thermal anomalies, fire mask classes 7..9
    pub fn modis_fire_mask ()->Self {
        DetectionSource {
            sensor: "MODIS".into(),
            collection: "MODIS/061/MOD14A1".into(),
            band: "FireMask".into(),
            rule: ThresholdRule::at_least( 7.0),
            scale: Scale::Meters( 1000.0),
        }
    }

    /// FIRMS rasterized hotspots with a detection confidence of at least 60%
    pub fn firms_confidence ()->Self {
        DetectionSource {
            sensor: "FIRMS".into(),
            collection: "FIRMS".into(),
            band: "confidence".into(),
            rule: ThresholdRule::at_least( 60.0),
            scale: Scale::Meters( 1000.0),
        }
    }
}

/// threshold a single image, vectorize the mask through `source` and keep the centers inside `aoi`
pub fn detect_in_image (source: &dyn DataSource, image: &ImageRecord, det: &DetectionSource, aoi: &Aoi)->Result<Vec<DetectionFeature>> {
    let mask = build_mask( image, &det.band, &det.rule)?;
    if mask.is_empty() { return Ok( Vec::new() ) }

    let features = source.reduce_to_vectors( &mask, aoi.bounds(), det.scale, None)?;
    Ok( tag_features( features, &mask, aoi, &det.sensor) )
}

/// all detections of `det` within `aoi` and `window`. Images are processed concurrently on the
/// blocking thread pool. No images is not an error but an empty table
pub async fn detect_centers (source: Arc<dyn DataSource>, boundary: &QueryBoundary, det: &DetectionSource,
                             aoi: &Aoi, window: &TimeWindow, policy: MissingBandPolicy)->Result<DetectionTable>
{
    let images = boundary.query( source.as_ref(), &det.collection, aoi.bounds(), window).await?;
    if images.is_empty() {
        info!("no {} images in {}", det.sensor, window);
        return Ok( DetectionTable::new() )
    }

    let mut join_set = JoinSet::new();
    for image in images {
        let source = source.clone();
        let det = det.clone();
        let aoi = aoi.clone();
        join_set.spawn_blocking( move || policy.apply( detect_in_image( source.as_ref(), &image, &det, &aoi)));
    }

    let mut features = Vec::new();
    while let Some(res) = join_set.join_next().await {
        if let Some(fs) = res?? {
            features.extend( fs);
        }
    }

    debug!("{} {} detections in {}", features.len(), det.sensor, window);
    Ok( DetectionTable::from_features( features) )
}

/// the merged detections of all `sources`
pub async fn detect_all (source: Arc<dyn DataSource>, boundary: &QueryBoundary, sources: &[DetectionSource],
                         aoi: &Aoi, window: &TimeWindow, policy: MissingBandPolicy)->Result<DetectionTable>
{
    let tables = try_join_all( sources.iter().map( |det| detect_centers( source.clone(), boundary, det, aoi, window, policy))).await?;
    Ok( tables.into_iter().fold( DetectionTable::new(), DetectionTable::merge) )
}
