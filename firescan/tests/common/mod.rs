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

// synthetic scenes around a point of interest at 34.5851E 47.5067N

use std::{path::PathBuf, time::Duration};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use firescan_common::datetime::TimeWindow;
use firescan_common::geo::{GeoPoint, GeoRect};
use firescan::{FirescanError, Result};
use firescan::aoi::Aoi;
use firescan::image::ImageRecord;
use firescan::raster::{Band, GridSpec, Projection};
use firescan::source::DataSource;

pub const LON: f64 = 34.5851;
pub const LAT: f64 = 47.5067;

pub fn center ()->GeoPoint { GeoPoint::from_lon_lat_degrees( LON, LAT) }

/// 2km around the point
pub fn point_aoi ()->Aoi { Aoi::point_buffer( center(), 2000.0).unwrap() }

/// the plant rectangle plus 10m
pub fn plant_aoi ()->Aoi { Aoi::rect( 34.5765, 47.4945, 34.6010, 47.5095).unwrap().buffer( 10.0).unwrap() }

pub fn utc (y: i32, m: u32, d: u32, h: u32, min: u32)->DateTime<Utc> {
    Utc.with_ymd_and_hms( y, m, d, h, min, 0).unwrap()
}

pub fn window (start: &str, end: &str)->TimeWindow { TimeWindow::parse( start, end).unwrap() }

/// 20x20 pixels of 0.005°, centered on the point. Pixel (10,10) is ~335m from it, (14,7) is inside
/// the 2km AOI envelope but ~2188m away, (0,0) is outside of the envelope
pub fn point_grid ()->GridSpec {
    GridSpec::new( Projection::Geographic, LON - 0.05, LAT + 0.05, 0.005, -0.005, 20, 20).unwrap()
}

/// 12x8 pixels of 0.0025° whose outer ring is outside the plant rectangle
pub fn plant_grid ()->GridSpec {
    GridSpec::new( Projection::Geographic, 34.5740, 47.5120, 0.0025, -0.0025, 12, 8).unwrap()
}

/// a single band image with `background` everywhere except the given (col,row,value) pixels
pub fn band_image (collection: &str, id: &str, time: DateTime<Utc>, grid: &GridSpec, band: &str, background: f32, pixels: &[(usize,usize,f32)])->ImageRecord {
    let mut b = Band::filled( grid.rows, grid.cols, background);
    for (c,r,v) in pixels { b.set( *c, *r, *v) }
    ImageRecord::new( id, collection, time, grid.clone()).with_band( band, b).unwrap()
}

pub fn firms_image (id: &str, time: DateTime<Utc>, hot: &[(usize,usize)])->ImageRecord {
    let pixels: Vec<(usize,usize,f32)> = hot.iter().map( |(c,r)| (*c, *r, 80.0)).collect();
    band_image( "FIRMS", id, time, &point_grid(), "confidence", 30.0, &pixels)
}

/// FIRMS scenes from 07-01 to 07-05. Within [07-02,07-05) the AOI counts are 07-02: 2 (two images),
/// 07-03: 3, 07-04: 0
pub fn firms_scenes ()->Vec<ImageRecord> {
    vec![
        firms_image( "firms_0701", utc(2024,7,1,10,30), &[(10,10)]),
        firms_image( "firms_0702a", utc(2024,7,2,10,42), &[(10,10), (14,7)]),
        firms_image( "firms_0702b", utc(2024,7,2,23,5), &[(9,9)]),
        firms_image( "firms_0703", utc(2024,7,3,11,17), &[(10,10), (11,9), (12,12), (0,0)]),
        firms_image( "firms_0704", utc(2024,7,4,10,55), &[]),
        firms_image( "firms_0705", utc(2024,7,5,10,20), &[(10,10)]),
    ]
}

pub fn fire_mask_image (collection: &str, id: &str, time: DateTime<Utc>, fire: &[(usize,usize)])->ImageRecord {
    let pixels: Vec<(usize,usize,f32)> = fire.iter().map( |(c,r)| (*c, *r, 8.0)).collect();
    band_image( collection, id, time, &point_grid(), "FireMask", 5.0, &pixels)
}

/* #region Sentinel-2 burn scenes ********************************************************************************/

// cols 3..=6 x rows 2..=4 are burned vegetation (12px), cols 8..=9 are bare soil and burned in
// rows 2..=4 (6px), col 0 is burned vegetation outside of the AOI (3px)

fn is_bare (c: usize, _r: usize)->bool { c == 8 || c == 9 }
fn is_burned (c: usize, r: usize)->bool { (2..=4).contains(&r) && ((3..=6).contains(&c) || is_bare(c,r) || c == 0) }

pub fn s2_image (id: &str, time: DateTime<Utc>, post_fire: bool, cloudy: &[(usize,usize)])->ImageRecord {
    let grid = plant_grid();
    let (rows,cols) = (grid.rows, grid.cols);
    let burned = |c,r| post_fire && is_burned(c,r);
    let cloud = |c,r| cloudy.contains( &(c,r));

    let b8 = Band::from_fn( rows, cols, |c,r| {
        if cloud(c,r) { 0.9 } else if burned(c,r) { if is_bare(c,r) { 0.10 } else { 0.15 } } else if is_bare(c,r) { 0.20 } else { 0.40 }
    });
    let b12 = Band::from_fn( rows, cols, |c,r| {
        if cloud(c,r) { 0.9 } else if burned(c,r) { 0.30 } else if is_bare(c,r) { 0.10 } else { 0.15 }
    });
    let b4 = Band::from_fn( rows, cols, |c,r| {
        if cloud(c,r) { 0.9 } else if is_bare(c,r) { 0.18 } else { 0.05 }
    });
    let scl = Band::from_fn( rows, cols, |c,r| if cloud(c,r) { 9.0 } else if is_bare(c,r) { 5.0 } else { 4.0 });

    ImageRecord::new( id, "COPERNICUS/S2_SR_HARMONIZED", time, grid)
        .with_band( "B8", b8).unwrap()
        .with_band( "B12", b12).unwrap()
        .with_band( "B4", b4).unwrap()
        .with_band( "SCL", scl).unwrap()
}

/// two pre fire scenes (one with clouds over the burn area), one pre fire scene without B12 and two
/// identical post fire scenes
pub fn s2_scenes ()->Vec<ImageRecord> {
    let broken = s2_image( "s2_0628", utc(2024,6,28,8,56), false, &[]);
    let broken = broken.select( &["B8", "B4", "SCL"]).unwrap();

    vec![
        s2_image( "s2_0620", utc(2024,6,20,8,56), false, &[]),
        s2_image( "s2_0625", utc(2024,6,25,8,56), false, &[(3,2), (4,2), (5,3)]),
        broken,
        s2_image( "s2_0704", utc(2024,7,4,8,56), true, &[]),
        s2_image( "s2_0705", utc(2024,7,5,8,56), true, &[]),
    ]
}

/* #endregion Sentinel-2 burn scenes */

/* #region failing data sources *********************************************************************************/

pub struct SlowSource { pub delay: Duration }

#[async_trait]
impl DataSource for SlowSource {
    async fn query (&self, _collection: &str, _bounds: &GeoRect, _window: &TimeWindow)->Result<Vec<ImageRecord>> {
        tokio::time::sleep( self.delay).await;
        Ok( Vec::new() )
    }
}

pub struct FailingSource;

#[async_trait]
impl DataSource for FailingSource {
    async fn query (&self, collection: &str, _bounds: &GeoRect, _window: &TimeWindow)->Result<Vec<ImageRecord>> {
        Err( FirescanError::OpFailed( format!("backend refused {collection}")))
    }
}

/* #endregion failing data sources */

/// a fresh scratch directory under the system temp dir
pub fn scratch_dir (name: &str)->PathBuf {
    let dir = std::env::temp_dir().join( format!("firescan_{}_{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all( &dir);
    std::fs::create_dir_all( &dir).unwrap();
    dir
}
