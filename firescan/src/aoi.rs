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

//! areas of interest. An [`Aoi`] is a validated circle, rectangle or polygon plus an accumulated
//! metric buffer. Containment is exact (great circle distance for circles, polygon containment or
//! boundary distance for polygons), the envelope returned by [`Aoi::bounds`] is only used to
//! narrow data source queries

use std::fmt;
use serde::{Serialize,Deserialize};
use firescan_common::geo::{GeoPoint, GeoPolygon, GeoRect, meters_to_lat_degrees, meters_to_lon_degrees};
use crate::errors::{FirescanError, Result, invalid_geometry};

/// serializable AOI description as used in configs
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub enum AoiShapeSpec {
    /// point buffered by `radius` meters
    Point { center: GeoPoint, radius: f64 },
    Rect { west: f64, south: f64, east: f64, north: f64 },
    Polygon { exterior: Vec<GeoPoint>, #[serde(default)] interiors: Vec<Vec<GeoPoint>> },
}

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct AoiSpec {
    pub shape: AoiShapeSpec,
    /// additional buffer in meters
    #[serde(default)]
    pub buffer: f64,
}

#[derive(Debug,Clone,PartialEq)]
pub enum AoiShape {
    Circle { center: GeoPoint, radius: f64 },
    Polygon(GeoPolygon),
}

#[derive(Debug,Clone,PartialEq)]
pub struct Aoi {
    shape: AoiShape,
    buffer: f64,
    bounds: GeoRect,
}

impl Aoi {
    /// a circle of `radius` meters around `center`
    pub fn point_buffer (center: GeoPoint, radius: f64)->Result<Self> {
        if !center.is_valid() {
            return Err( invalid_geometry!("invalid center {}", center))
        }
        if !(radius.is_finite() && radius > 0.0) {
            return Err( invalid_geometry!("invalid radius {}", radius))
        }
        let shape = AoiShape::Circle { center, radius };
        Ok( Aoi { bounds: envelope( &shape, 0.0), shape, buffer: 0.0 })
    }

    pub fn rect (west: f64, south: f64, east: f64, north: f64)->Result<Self> {
        let rect = GeoRect::try_from_wsen( west, south, east, north)?;
        Self::polygon( rect.to_polygon())
    }

    pub fn polygon (polygon: GeoPolygon)->Result<Self> {
        let shape = AoiShape::Polygon( polygon);
        Ok( Aoi { bounds: envelope( &shape, 0.0), shape, buffer: 0.0 })
    }

    pub fn from_vertices (exterior: &[GeoPoint], interiors: &[Vec<GeoPoint>])->Result<Self> {
        Self::polygon( GeoPolygon::from_rings( exterior, interiors)?)
    }

    pub fn from_spec (spec: &AoiSpec)->Result<Self> {
        let aoi = match &spec.shape {
            AoiShapeSpec::Point { center, radius } => Self::point_buffer( *center, *radius)?,
            AoiShapeSpec::Rect { west, south, east, north } => Self::rect( *west, *south, *east, *north)?,
            AoiShapeSpec::Polygon { exterior, interiors } => Self::from_vertices( exterior, interiors)?,
        };
        aoi.buffer( spec.buffer)
    }

    /// a new AOI that also contains everything within `dist` meters of this one.
    /// Buffers accumulate, `buffer(0.0)` is the identity
    pub fn buffer (&self, dist: f64)->Result<Self> {
        check_distance( dist)?;
        let buffer = self.buffer + dist;
        Ok( Aoi { shape: self.shape.clone(), buffer, bounds: envelope( &self.shape, buffer) })
    }

    pub fn shape (&self)->&AoiShape { &self.shape }
    pub fn buffer_distance (&self)->f64 { self.buffer }

    /// the lon/lat envelope of the buffered shape
    pub fn bounds (&self)->&GeoRect { &self.bounds }

    pub fn contains (&self, p: &GeoPoint)->bool {
        if !self.bounds.contains( p) { return false }

        match &self.shape {
            AoiShape::Circle { center, radius } => center.distance_to( p) <= radius + self.buffer,
            AoiShape::Polygon( polygon) => {
                polygon.contains( p) || (self.buffer > 0.0 && polygon.distance_to_boundary( p) <= self.buffer)
            }
        }
    }

    /// area in m² of the unbuffered shape
    pub fn shape_area (&self)->f64 {
        match &self.shape {
            AoiShape::Circle { radius, .. } => std::f64::consts::PI * radius * radius,
            AoiShape::Polygon( polygon) => polygon.area()
        }
    }
}

impl fmt::Display for Aoi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.shape {
            AoiShape::Circle { center, radius } => write!(f, "circle({center}, {radius}m)")?,
            AoiShape::Polygon( polygon) => write!(f, "polygon({} vertices)", polygon.exterior().len())?,
        }
        if self.buffer > 0.0 { write!(f, " + {}m", self.buffer) } else { Ok(()) }
    }
}

fn check_distance (dist: f64)->Result<()> {
    if dist.is_finite() && dist >= 0.0 { Ok(()) } else { Err( invalid_geometry!("invalid distance {}", dist)) }
}

fn envelope (shape: &AoiShape, buffer: f64)->GeoRect {
    match shape {
        AoiShape::Circle { center, radius } => {
            GeoRect::from_wsen( center.lon(), center.lat(), center.lon(), center.lat()).expanded_by( radius + buffer)
        }
        AoiShape::Polygon( polygon) => {
            // the buffer is measured from the great circle edges
            if buffer > 0.0 { polygon.arc_bounds().expanded_by( buffer) } else { polygon.bounds() }
        }
    }
}
