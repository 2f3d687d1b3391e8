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

use firescan_common::geo::GeoPoint;
use firescan_common::utm::*;
use firescan_common::approx_eq;

#[test]
fn test_zones() {
    let p = GeoPoint::from_lon_lat_degrees( 34.5851, 47.5067);
    let zone = utm_zone( &p).unwrap();
    println!("zone of {p}: {zone} (EPSG:{})", zone.epsg());
    assert_eq!( zone, UtmZone{ zone: 36, band: 'T' });
    assert_eq!( zone.epsg(), 32636);

    let sf = GeoPoint::from_lon_lat_degrees( -122.4, 37.7);
    assert_eq!( utm_zone( &sf).unwrap(), UtmZone{ zone: 10, band: 'S' });

    let sydney = GeoPoint::from_lon_lat_degrees( 151.2, -33.9);
    let z = utm_zone( &sydney).unwrap();
    assert_eq!( z, UtmZone{ zone: 56, band: 'H' });
    assert!( !z.is_north());
    assert_eq!( z.epsg(), 32756);

    // Norway and Svalbard exceptions
    assert_eq!( utm_zone( &GeoPoint::from_lon_lat_degrees( 5.0, 60.0)).unwrap().zone, 32);
    assert_eq!( utm_zone( &GeoPoint::from_lon_lat_degrees( 15.0, 78.0)).unwrap().zone, 33);

    assert!( utm_zone( &GeoPoint::from_lon_lat_degrees( 0.0, 85.0)).is_none());
    assert!( utm_zone( &GeoPoint::from_lon_lat_degrees( 0.0, -81.0)).is_none());
    assert_eq!( utm_zone( &GeoPoint::from_lon_lat_degrees( 0.0, 84.0)).unwrap().band, 'X');
}

#[test]
fn test_round_trip() {
    for (lon,lat) in [(34.5851, 47.5067), (-122.4, 37.7), (151.2, -33.9), (33.2, 47.0)] {
        let p = GeoPoint::from_lon_lat_degrees( lon, lat);
        let utm = geo_to_utm( &p).unwrap();
        let q = utm_to_geo( &utm);
        println!("{p} -> {:.3}E {:.3}N {} -> {q}", utm.easting, utm.northing, utm.zone);
        assert!( approx_eq( q.lon(), lon, 1e-6));
        assert!( approx_eq( q.lat(), lat, 1e-6));
    }

    let utm = geo_to_utm( &GeoPoint::from_lon_lat_degrees( 34.5851, 47.5067)).unwrap();
    assert!( approx_eq( utm.easting, 619_362.82, 0.01));
    assert!( approx_eq( utm.northing, 5_262_691.94, 0.01));

    // projecting into a neighbouring zone still round trips
    let p = GeoPoint::from_lon_lat_degrees( 35.9, 47.5);
    let utm = geo_to_utm_zone( &p, UtmZone::new( 37, 'T').unwrap()).unwrap();
    let q = utm_to_geo( &utm);
    assert!( approx_eq( q.lon(), 35.9, 1e-6) && approx_eq( q.lat(), 47.5, 1e-6));
}
