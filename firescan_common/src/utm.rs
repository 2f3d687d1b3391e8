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
#![allow(unused,uncommon_codepoints,non_snake_case,non_upper_case_globals)]

//! UTM projection on the WGS84 ellipsoid using the Krüger series to third order,
//! see https://en.wikipedia.org/wiki/Universal_Transverse_Mercator_coordinate_system

use std::fmt;
use serde::{Deserialize, Serialize};

use crate::{sin, cos, sinh, cosh, atan, atanh, asin, sqrt};
use crate::geo::GeoPoint;
use crate::geo_constants::{UTM_FALSE_EASTING, UTM_FALSE_NORTHING};

// no 'I' or 'O' bands. Each band covers 8°, starting at 80°S ('X' is extended to 84°N)
const LAT_BAND: [char;20] = ['C','D','E','F','G','H','J','K','L','M','N','P','Q','R','S','T','U','V','W','X'];

const k0_A: f64 = 6_364_902.166165087; // k0 * A [m]
const C: f64 = 0.08181919084262149; // 2√n / (1 + n)

// forward series
const α1: f64 = 8.377318188192541E-4;
const α2: f64 = 7.608496958699166E-7;
const α3: f64 = 1.2034877875966646E-9;

// inverse series
const β1: f64 = 8.37732164082144E-4;
const β2: f64 = 5.906110863719917E-8;
const β3: f64 = 1.6769911794379754E-10;
const δ1: f64 = 3.356551448628875E-3;
const δ2: f64 = 6.571913193172695E-6;
const δ3: f64 = 1.76774599620756E-8;

#[derive(Debug,Copy,Clone,Serialize,Deserialize,PartialEq,Eq,Hash)]
pub struct UtmZone {
    pub zone: u32,
    pub band: char,
}

impl UtmZone {
    pub fn new (zone: u32, band: char)->Option<Self> {
        if (1..=60).contains(&zone) && LAT_BAND.contains(&band) { Some( UtmZone{zone,band}) } else { None }
    }

    pub fn is_north (&self)->bool { self.band >= 'N' }

    /// central meridian in degrees
    pub fn central_meridian (&self)->f64 { -183.0 + (self.zone as f64)*6.0 }

    /// EPSG code of the WGS84 / UTM CRS for this zone
    pub fn epsg (&self)->u32 {
        if self.is_north() { 32600 + self.zone } else { 32700 + self.zone }
    }
}

impl fmt::Display for UtmZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.zone, self.band)
    }
}

#[derive(Debug,Copy,Clone,Serialize,Deserialize,PartialEq)]
pub struct UtmCoord {
    pub easting: f64,
    pub northing: f64,
    pub zone: UtmZone,
}

/// the zone `geo` falls into, including the Norway/Svalbard exceptions. None outside of [80°S,84°N]
pub fn utm_zone (geo: &GeoPoint)->Option<UtmZone> {
    let lat = geo.lat();
    let lon = geo.lon();
    if !(-80.0..=84.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) { return None }

    let band = LAT_BAND[ (((lat + 80.0) / 8.0).floor() as usize).min( LAT_BAND.len()-1) ];

    let zone = if lat >= 56.0 && lat < 64.0 && lon >= 3.0 && lon < 12.0 {
        32
    } else if lat >= 72.0 && lon >= 0.0 && lon < 42.0 {
        if lon < 9.0 { 31 } else if lon < 21.0 { 33 } else if lon < 33.0 { 35 } else { 37 }
    } else {
        (((lon + 180.0) / 6.0).floor() as u32 % 60) + 1
    };

    Some( UtmZone{zone,band})
}

/// project into a given zone (which does not have to be the natural zone of `geo`)
pub fn geo_to_utm_zone (geo: &GeoPoint, zone: UtmZone)->Option<UtmCoord> {
    let lat = geo.lat();
    if !(-80.0..=84.0).contains(&lat) { return None }

    let φ = lat.to_radians();
    let dλ = (geo.lon() - zone.central_meridian()).to_radians();
    let N0 = if zone.is_north() { 0.0 } else { UTM_FALSE_NORTHING };

    let sin_φ = sin(φ);
    let t = sinh( atanh(sin_φ) - C * atanh( C*sin_φ));

    let ξ = atan( t/cos(dλ));
    let η = atanh( sin(dλ) / sqrt(1.0 + t*t));

    let easting = UTM_FALSE_EASTING + k0_A*(η + α1*cos(2.0*ξ)*sinh(2.0*η) + α2*cos(4.0*ξ)*sinh(4.0*η) + α3*cos(6.0*ξ)*sinh(6.0*η));
    let northing = N0 + k0_A*(ξ + α1*sin(2.0*ξ)*cosh(2.0*η) + α2*sin(4.0*ξ)*cosh(4.0*η) + α3*sin(6.0*ξ)*cosh(6.0*η));

    if easting.is_finite() && northing.is_finite() { Some( UtmCoord{easting, northing, zone}) } else { None }
}

pub fn geo_to_utm (geo: &GeoPoint)->Option<UtmCoord> {
    utm_zone( geo).and_then( |zone| geo_to_utm_zone( geo, zone))
}

pub fn utm_to_geo (utm: &UtmCoord)->GeoPoint {
    let N0 = if utm.zone.is_north() { 0.0 } else { UTM_FALSE_NORTHING };

    let ξ = (utm.northing - N0) / k0_A;
    let η = (utm.easting - UTM_FALSE_EASTING) / k0_A;

    let ξʹ = ξ - (β1*sin(2.0*ξ)*cosh(2.0*η) + β2*sin(4.0*ξ)*cosh(4.0*η) + β3*sin(6.0*ξ)*cosh(6.0*η));
    let ηʹ = η - (β1*cos(2.0*ξ)*sinh(2.0*η) + β2*cos(4.0*ξ)*sinh(4.0*η) + β3*cos(6.0*ξ)*sinh(6.0*η));

    let χ = asin( sin(ξʹ) / cosh(ηʹ));
    let φ = χ + δ1*sin(2.0*χ) + δ2*sin(4.0*χ) + δ3*sin(6.0*χ);
    let λ = utm.zone.central_meridian().to_radians() + atan( sinh(ηʹ) / cos(ξʹ));

    GeoPoint::from_lon_lat_degrees( λ.to_degrees(), φ.to_degrees())
}
