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

mod common;

use std::{sync::Arc, time::Duration};
use tokio_util::sync::CancellationToken;
use firescan::detection::{detect_all, detect_centers, DetectionSource};
use firescan::raster::Scale;
use firescan::report::DetectionTable;
use firescan::source::{DataSource, MemorySource, QueryBoundary};
use firescan::threshold::MissingBandPolicy;
use firescan::FirescanError;
use common::*;

const VIIRS: &str = "NOAA/VIIRS/001/VNP14A1";
const MODIS: &str = "MODIS/061/MOD14A1";

fn native (det: DetectionSource)->DetectionSource {
    DetectionSource { scale: Scale::Native, ..det }
}

fn sources ()->Vec<DetectionSource> {
    vec![ native( DetectionSource::viirs_fire_mask()), native( DetectionSource::modis_fire_mask()) ]
}

fn fire_scenes ()->MemorySource {
    MemorySource::from_images( vec![
        fire_mask_image( VIIRS, "viirs_0702", utc(2024,7,2,10,42), &[(10,10), (14,7)]),
        fire_mask_image( VIIRS, "viirs_0703", utc(2024,7,3,11,17), &[(9,9)]),
        fire_mask_image( MODIS, "modis_0702", utc(2024,7,2,8,30), &[(10,10)]),
        fire_mask_image( MODIS, "modis_0703", utc(2024,7,3,11,17), &[(12,12)]),
        fire_mask_image( MODIS, "modis_0706", utc(2024,7,6,9,0), &[(10,10)]),
    ])
}

#[tokio::test]
async fn test_detect_all () {
    let source: Arc<dyn DataSource> = Arc::new( fire_scenes());
    let boundary = QueryBoundary::new( Some(Duration::from_secs(10)));
    let aoi = point_aoi();
    let window = window( "2024-07-02", "2024-07-05");

    let table = detect_all( source.clone(), &boundary, &sources(), &aoi, &window, MissingBandPolicy::Skip).await.unwrap();
    for r in table.rows() { println!("{} {:5} {}", r.timestamp, r.sensor, r.geometry) }

    assert_eq!( table.len(), 4);
    let tags: Vec<(&str,&str)> = table.rows().iter().map( |r| (r.timestamp.as_str(), r.sensor.as_str())).collect();
    assert_eq!( tags, vec![
        ("2024-07-02 08:30", "MODIS"),
        ("2024-07-02 10:42", "VIIRS"),
        ("2024-07-03 11:17", "MODIS"),
        ("2024-07-03 11:17", "VIIRS"),
    ]);
    assert!( table.rows().iter().all( |r| aoi.contains( &r.geometry)));
    assert_eq!( table.count_by_sensor()["VIIRS"], 2);

    // same inputs, same table
    let again = detect_all( source.clone(), &boundary, &sources(), &aoi, &window, MissingBandPolicy::Skip).await.unwrap();
    assert_eq!( table, again);

    let mut csv: Vec<u8> = Vec::new();
    table.write_csv( &mut csv).unwrap();
    let csv = String::from_utf8( csv).unwrap();
    println!("{}", csv);
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!( lines.len(), 5);
    assert_eq!( lines[0], "timestamp,sensor,lon,lat");
    assert!( lines[1].starts_with( "2024-07-02 08:30,MODIS,"));
}

#[tokio::test]
async fn test_merge_dedups () {
    let source: Arc<dyn DataSource> = Arc::new( fire_scenes());
    let boundary = QueryBoundary::default();
    let aoi = point_aoi();
    let window = window( "2024-07-02", "2024-07-05");

    let viirs = detect_centers( source.clone(), &boundary, &sources()[0], &aoi, &window, MissingBandPolicy::Skip).await.unwrap();
    let modis = detect_centers( source.clone(), &boundary, &sources()[1], &aoi, &window, MissingBandPolicy::Skip).await.unwrap();
    assert_eq!( viirs.len(), 2);
    assert_eq!( modis.len(), 2);

    let merged = viirs.clone().merge( modis.clone());
    assert_eq!( merged.len(), 4);
    assert_eq!( merged, modis.merge( viirs.clone()));
    assert_eq!( viirs.clone().merge( viirs.clone()), viirs);
}

#[tokio::test]
async fn test_no_images () {
    let source: Arc<dyn DataSource> = Arc::new( fire_scenes());
    let boundary = QueryBoundary::default();
    let aoi = point_aoi();

    // nothing in the window
    let table = detect_all( source.clone(), &boundary, &sources(), &aoi, &window( "2024-08-01", "2024-08-05"), MissingBandPolicy::Abort).await.unwrap();
    assert!( table.is_empty());

    // unknown collection
    let firms = native( DetectionSource::firms_confidence());
    let table = detect_centers( source.clone(), &boundary, &firms, &aoi, &window( "2024-07-02", "2024-07-05"), MissingBandPolicy::Abort).await.unwrap();
    assert!( table.is_empty());

    let mut csv: Vec<u8> = Vec::new();
    table.write_csv( &mut csv).unwrap();
    assert_eq!( String::from_utf8( csv).unwrap().trim(), "timestamp,sensor,lon,lat");
}

#[tokio::test]
async fn test_missing_band () {
    let mut scenes = fire_scenes();
    let mut broken = firms_image( "viirs_broken", utc(2024,7,2,12,0), &[(10,10)]);
    broken.collection = VIIRS.into();
    scenes.add( broken);

    let source: Arc<dyn DataSource> = Arc::new( scenes);
    let boundary = QueryBoundary::default();
    let aoi = point_aoi();
    let window = window( "2024-07-02", "2024-07-05");

    let table = detect_all( source.clone(), &boundary, &sources(), &aoi, &window, MissingBandPolicy::Skip).await.unwrap();
    assert_eq!( table.len(), 4);

    let res = detect_all( source.clone(), &boundary, &sources(), &aoi, &window, MissingBandPolicy::Abort).await;
    println!("abort: {:?}", res.as_ref().err());
    assert!( matches!( res, Err(FirescanError::MissingBand{..})));
}

#[tokio::test]
async fn test_query_timeout () {
    let source: Arc<dyn DataSource> = Arc::new( SlowSource { delay: Duration::from_secs(2) });
    let boundary = QueryBoundary::new( Some(Duration::from_millis(50)));
    let det = native( DetectionSource::viirs_fire_mask());

    let res = detect_centers( source, &boundary, &det, &point_aoi(), &window( "2024-07-02", "2024-07-05"), MissingBandPolicy::Skip).await;
    println!("{:?}", res.as_ref().err());
    match res {
        Err(FirescanError::QueryTimeout { collection, window, timeout }) => {
            assert_eq!( collection, VIIRS);
            assert_eq!( window.to_string(), "[2024-07-02, 2024-07-05)");
            assert_eq!( timeout, Duration::from_millis(50));
        }
        other => panic!("expected timeout, got {:?}", other)
    }
}

#[tokio::test]
async fn test_query_cancelled () {
    let source: Arc<dyn DataSource> = Arc::new( SlowSource { delay: Duration::from_secs(2) });
    let token = CancellationToken::new();
    let boundary = QueryBoundary::new( None).with_cancellation( token.clone());
    token.cancel();

    let res = detect_all( source, &boundary, &sources(), &point_aoi(), &window( "2024-07-02", "2024-07-05"), MissingBandPolicy::Skip).await;
    println!("{:?}", res.as_ref().err());
    assert!( matches!( res, Err(FirescanError::QueryCancelled{..})));
}

#[tokio::test]
async fn test_failing_source () {
    let source: Arc<dyn DataSource> = Arc::new( FailingSource);
    let boundary = QueryBoundary::default();
    let det = native( DetectionSource::modis_fire_mask());

    let res = detect_centers( source.clone(), &boundary, &det, &point_aoi(), &window( "2024-07-02", "2024-07-05"), MissingBandPolicy::Skip).await;
    println!("{:?}", res.as_ref().err());
    match res {
        Err(e @ FirescanError::DataSource{..}) => {
            assert!( e.is_query_error());
            let msg = e.to_string();
            assert!( msg.contains( MODIS));
            assert!( msg.contains( "backend refused"));
        }
        other => panic!("expected data source error, got {:?}", other)
    }

    // empty windows are not queried
    let table = detect_centers( source, &boundary, &det, &point_aoi(), &window( "2024-07-02", "2024-07-02"), MissingBandPolicy::Skip).await.unwrap();
    assert!( table.is_empty());
}
