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

use firescan_common::utm::geo_to_utm;
use firescan::area::{area_hectares, mask_area_image, pixel_area_grid, AREA_BAND};
use firescan::mask::{AnomalyMask, MaskSource};
use firescan::raster::{GridSpec, Projection, Scale};
use firescan::reduce::{reduce_region, Reducer};
use firescan::threshold::{build_mask, ThresholdRule};
use common::*;

/// 100x100 pixels of 10m in the UTM zone of the point, (0,0) is 500m west and north of it
fn utm_grid ()->GridSpec {
    let utm = geo_to_utm( &center()).unwrap();
    GridSpec::new( Projection::Utm( utm.zone), utm.easting - 500.0, utm.northing + 500.0, 10.0, -10.0, 100, 100).unwrap()
}

fn utm_mask (blocks: &[(std::ops::Range<usize>, std::ops::Range<usize>)])->AnomalyMask {
    let src = MaskSource { image_id: "blocks".into(), collection: "X".into(), time: utc(2024,7,4,0,0) };
    AnomalyMask::from_predicate( utm_grid(), src, ThresholdRule::at_least( 1.0), |c,r| {
        blocks.iter().any( |(cs,rs)| cs.contains(&c) && rs.contains(&r))
    })
}

#[test]
fn test_hectare_block () {
    let aoi = point_aoi();
    let mask = utm_mask( &[(40..50, 40..50)]);
    assert_eq!( mask.count(), 100);

    let ha = area_hectares( &mask, &aoi, Scale::Native).unwrap();
    println!("10x10 px of 10m: {} ha", ha);
    assert_eq!( ha, 1.0);
}

#[test]
fn test_area_additive () {
    let aoi = point_aoi();
    let a = utm_mask( &[(0..10, 0..10)]);
    let b = utm_mask( &[(20..30, 0..5)]);
    let ab = a.union( &b).unwrap();

    let ha_a = area_hectares( &a, &aoi, Scale::Native).unwrap();
    let ha_b = area_hectares( &b, &aoi, Scale::Native).unwrap();
    let ha_ab = area_hectares( &ab, &aoi, Scale::Native).unwrap();
    println!("{} + {} = {}", ha_a, ha_b, ha_ab);
    assert_eq!( ha_a, 1.0);
    assert_eq!( ha_b, 0.5);
    assert_eq!( ha_ab, ha_a + ha_b);
}

#[test]
fn test_area_depends_on_scale () {
    let aoi = point_aoi();
    let a = utm_mask( &[(0..10, 0..10)]);

    // the 20m grid is aligned with the 10m block
    assert_eq!( area_hectares( &a, &aoi, Scale::Meters(20.0)).unwrap(), 1.0);

    // a single 1km pixel whose center is not in the block
    let coarse = area_hectares( &a, &aoi, Scale::Meters(1000.0)).unwrap();
    println!("1km: {} ha", coarse);
    assert_eq!( coarse, 0.0);

    let img = mask_area_image( &a, Scale::Meters(1000.0)).unwrap();
    assert_eq!( img.grid.cols, 1);
    assert_eq!( img.grid.rows, 1);
}

#[test]
fn test_empty_and_outside () {
    let aoi = point_aoi();
    assert_eq!( area_hectares( &utm_mask( &[]), &aoi, Scale::Native).unwrap(), 0.0);

    // the AOI is east of the grid
    let far = firescan::aoi::Aoi::point_buffer( center().destination( 90.0, 700.0), 100.0).unwrap();
    assert_eq!( area_hectares( &utm_mask( &[(40..50, 40..50)]), &far, Scale::Native).unwrap(), 0.0);
}

#[test]
fn test_geographic_cell_area () {
    let grid = point_grid();
    let areas = pixel_area_grid( &grid);
    let expected = 0.005 * 111_195.0 * LAT.to_radians().cos() * 0.005 * 111_195.0;
    let a = areas.get( 10, 10) as f64;
    println!("cell area {} m², spherical estimate {} m²", a, expected);
    assert!( (a - expected).abs() / expected < 0.02);

    // sum of cell areas of the pixels inside the AOI
    let aoi = point_aoi();
    let img = firms_image( "firms", utc(2024,7,3,11,17), &[(10,10), (9,9), (14,7)]);
    let mask = build_mask( &img, "confidence", &ThresholdRule::at_least( 60.0)).unwrap();
    let ha = area_hectares( &mask, &aoi, Scale::Native).unwrap();
    let expected = (areas.get( 10, 10) as f64 + areas.get( 9, 9) as f64) / 10_000.0;
    println!("{} ha, expected {} ha", ha, expected);
    assert!( (ha - expected).abs() < 1e-6);
}

#[test]
fn test_reducers () {
    let aoi = point_aoi();
    let mask = utm_mask( &[(40..50, 40..50)]);
    let img = mask_area_image( &mask, Scale::Native).unwrap();

    let sum = reduce_region( &img, &aoi, Scale::Native, Reducer::Sum).unwrap();
    let max = reduce_region( &img, &aoi, Scale::Native, Reducer::Max).unwrap();
    let count = reduce_region( &img, &aoi, Scale::Native, Reducer::Count).unwrap();
    println!("sum: {:?}, max: {:?}, count: {:?}", sum, max, count);

    assert_eq!( sum[AREA_BAND], 10_000.0);
    assert_eq!( max[AREA_BAND], 100.0);
    // unset pixels are 0, not masked
    assert_eq!( count[AREA_BAND], 10_000.0);

    let empty = mask.to_band().map( |_| f32::NAN);
    let img = firescan::image::ImageRecord::new( "empty", "X", utc(2024,7,4,0,0), mask.grid().clone()).with_band( "v", empty).unwrap();
    let mean = reduce_region( &img, &aoi, Scale::Native, Reducer::Mean).unwrap();
    let count = reduce_region( &img, &aoi, Scale::Native, Reducer::Count).unwrap();
    assert!( mean.get("v").is_none());
    assert_eq!( count["v"], 0.0);
}
