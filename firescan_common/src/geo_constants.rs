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

// geodetic constants shared by spherical and UTM computations

pub const MEAN_EARTH_RADIUS: f64 = 6_371_000.0; // [m]

/// meters per degree of latitude (and of longitude at the equator) on the mean earth sphere
pub const METERS_PER_DEGREE: f64 = MEAN_EARTH_RADIUS * std::f64::consts::PI / 180.0;

// WGS84 ellipsoid used for UTM
pub const EQUATORIAL_EARTH_RADIUS: f64 = 6_378_137.0; // [m]
pub const FLATTENING: f64 = 1.0 / 298.257223563;

pub const UTM_SCALE: f64 = 0.9996;
pub const UTM_FALSE_EASTING: f64 = 500_000.0;
pub const UTM_FALSE_NORTHING: f64 = 10_000_000.0;

pub const SQUARE_METERS_PER_HECTARE: f64 = 10_000.0;
