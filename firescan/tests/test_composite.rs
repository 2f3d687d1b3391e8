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

use firescan::composite::{composite_size, exclusion_masked, median, median_composite};
use firescan::index::{difference, normalized_difference, normalized_difference_image, nbr};
use firescan::raster::{Band, BandScaling};
use firescan::threshold::{MissingBandPolicy, ThresholdRule};
use firescan::FirescanError;
use common::*;

#[test]
fn test_median () {
    assert_eq!( median( &mut vec![3.0, 1.0, 2.0]), 2.0);
    assert_eq!( median( &mut vec![4.0, 1.0, 2.0, 3.0]), 2.5);
    assert_eq!( median( &mut vec![f32::NAN, 5.0, f32::NAN]), 5.0);
    assert!( median( &mut vec![f32::NAN, f32::NAN]).is_nan());
    assert!( median( &mut vec![]).is_nan());
}

#[test]
fn test_exclusion_mask () {
    let img = s2_image( "s2", utc(2024,6,25,8,56), false, &[(3,2), (4,2)]);
    let masked = exclusion_masked( &img, "SCL", &ThresholdRule::sentinel2_clear()).unwrap();

    for band in ["B8", "B12", "B4", "SCL"] {
        let b = masked.band( band).unwrap();
        println!("{}: {} valid", band, b.valid_count());
        assert!( b.get( 3, 2).is_nan());
        assert!( b.get( 4, 2).is_nan());
        assert_eq!( b.valid_count(), img.grid.len() - 2);
    }
    assert_eq!( masked.band( "B8").unwrap().get( 5, 2), 0.40);

    assert!( matches!( exclusion_masked( &img, "QA60", &ThresholdRule::sentinel2_clear()), Err(FirescanError::MissingBand{..})));
}

#[test]
fn test_median_composite () {
    let images = s2_scenes();
    let pre: Vec<_> = images.iter().filter( |img| img.time < utc(2024,7,1,0,0))
        .map( |img| exclusion_masked( img, "SCL", &ThresholdRule::sentinel2_clear()).unwrap())
        .collect();
    assert_eq!( pre.len(), 3);

    // the scene without B12 is skipped
    let c = median_composite( "pre", &pre, &["B8", "B12", "B4"], MissingBandPolicy::Skip).unwrap().unwrap();
    println!("composite {} at {} with {:?}", c.id, c.time, c.properties);
    assert_eq!( c.properties["n_images"], "2");
    assert_eq!( composite_size( &c), 2);
    assert_eq!( composite_size( &s2_scenes()[0]), 0);
    assert_eq!( c.time, utc(2024,6,25,8,56));

    // clouded pixels of the second scene fall back to the first one
    let b8 = c.band( "B8").unwrap();
    assert_eq!( b8.get( 3, 2), 0.40);
    assert_eq!( b8.get( 8, 2), 0.20);
    assert_eq!( b8.valid_count(), c.grid.len());

    let res = median_composite( "pre", &pre, &["B8", "B12", "B4"], MissingBandPolicy::Abort);
    assert!( matches!( res, Err(FirescanError::MissingBand{..})));

    assert!( median_composite( "none", &[], &["B8"], MissingBandPolicy::Abort).unwrap().is_none());
}

#[test]
fn test_median_of_two () {
    let grid = plant_grid();
    let a = band_image( "X", "a", utc(2024,6,1,0,0), &grid, "v", 1.0, &[]);
    let b = band_image( "X", "b", utc(2024,6,2,0,0), &grid, "v", 2.0, &[(0,0,f32::NAN)]);
    let c = median_composite( "ab", &[a, b], &["v"], MissingBandPolicy::Abort).unwrap().unwrap();
    assert_eq!( c.band( "v").unwrap().get( 1, 1), 1.5);
    assert_eq!( c.band( "v").unwrap().get( 0, 0), 1.0);
}

#[test]
fn test_normalized_difference () {
    let a = Band::from_vec( 1, 4, vec![0.4, 0.0, f32::NAN, 0.3]).unwrap();
    let b = Band::from_vec( 1, 4, vec![0.1, 0.0, 0.2, -0.3]).unwrap();
    let nd = normalized_difference( &a, &b).unwrap();
    println!("nd: {:?}", nd.data());

    assert!( (nd.get( 0, 0) - 0.6).abs() < 1e-6);
    assert!( nd.get( 1, 0).is_nan()); // 0/0
    assert!( nd.get( 2, 0).is_nan());
    assert!( nd.get( 3, 0).is_nan()); // a + b == 0

    let short = Band::from_vec( 1, 2, vec![0.1, 0.2]).unwrap();
    assert!( matches!( normalized_difference( &a, &short), Err(FirescanError::IncompatibleGrid(_))));
}

#[test]
fn test_nbr () {
    let pre = s2_image( "pre", utc(2024,6,20,8,56), false, &[]);
    let post = s2_image( "post", utc(2024,7,4,8,56), true, &[]);
    let dnbr = difference( &nbr( &pre, "B8", "B12").unwrap(), &nbr( &post, "B8", "B12").unwrap()).unwrap();

    println!("dNBR burned veg: {}, bare: {}, unburned: {}", dnbr.get( 4, 3), dnbr.get( 8, 3), dnbr.get( 4, 6));
    assert!( dnbr.get( 4, 3) > 0.7);
    assert!( dnbr.get( 8, 3) > 0.7);
    assert_eq!( dnbr.get( 4, 6), 0.0);

    let ndvi = normalized_difference_image( &pre, "B8", "B4", "NDVI").unwrap();
    assert_eq!( ndvi.band_names().collect::<Vec<_>>(), vec!["NDVI"]);
    assert!( ndvi.band( "NDVI").unwrap().get( 4, 3) > 0.7);
    assert!( ndvi.band( "NDVI").unwrap().get( 8, 3) < 0.1);
}

#[test]
fn test_band_scaling () {
    let grid = plant_grid();
    let img = band_image( "X", "raw", utc(2024,6,1,0,0), &grid, "B8", 4000.0, &[(0,0,f32::NAN)]);
    let scaled = img.scaled( &["B8"], &BandScaling::SENTINEL2_SR).unwrap();
    assert!( (scaled.band( "B8").unwrap().get( 1, 1) - 0.4).abs() < 1e-6);
    assert!( scaled.band( "B8").unwrap().get( 0, 0).is_nan());

    let lst = BandScaling::LANDSAT_ST.apply( 44_000.0);
    println!("LST: {} K", lst);
    assert!( (lst - 299.39).abs() < 0.01);
}
