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
#![allow(unused,uncommon_codepoints,non_snake_case)]

//! newtype wrappers around [geo](https://docs.rs/geo/latest/geo/index.html) geometries that carry
//! geodetic semantics (WGS84 degrees, x = longitude, y = latitude), plus the spherical helpers we
//! need to test containment against metric buffers.
//!
//! Distances are in meters and computed with the haversine metric space of `geo` on the mean earth
//! sphere, which is accurate to well below a pixel for the regional extents we work with.

use std::fmt;
use serde::{Serialize,Deserialize};
use geo::{BoundingRect, Closest, Contains, Coord, Densify, Destination, Distance, Intersects, Line, LineString, Point, Polygon, Rect};
use geo::algorithm::line_measures::metric_spaces::HaversineMeasure;
use geo::algorithm::geodesic_area::GeodesicArea;
use geo::algorithm::haversine_closest_point::HaversineClosestPoint;

use crate::cos;
use crate::errors::{CommonError, Result};
use crate::geo_constants::{MEAN_EARTH_RADIUS, METERS_PER_DEGREE};

pub type GeoCoord = Coord<f64>;

/// haversine metric on the sphere with [`MEAN_EARTH_RADIUS`]
pub const MEAN_EARTH: HaversineMeasure = HaversineMeasure::new( MEAN_EARTH_RADIUS);

// max great circle length between interpolated points when we compute arc envelopes
const ARC_SAMPLE_LENGTH: f64 = 1000.0;

/* #region GeoPoint ***********************************************************************************************/

/// a wrapper for geo::Point that uses geodetic degrees stored as f64
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
#[serde(from="LonLat", into="LonLat")]
pub struct GeoPoint(Point);

impl GeoPoint {
    /// note this does not normalize - use [`GeoPoint::is_valid`] to check input coordinates
    pub fn from_lon_lat_degrees (lon: f64, lat: f64)->Self {
        GeoPoint( Point::new( lon, lat))
    }

    pub fn lon (&self)->f64 { self.0.x() }
    pub fn lat (&self)->f64 { self.0.y() }

    pub fn point (&self)->&Point { &self.0 }
    pub fn coord (&self)->GeoCoord { self.0.0 }

    pub fn is_valid (&self)->bool {
        let (lon,lat) = (self.lon(), self.lat());
        lon.is_finite() && lat.is_finite() && (-180.0..=180.0).contains(&lon) && (-90.0..=90.0).contains(&lat)
    }

    /// great circle distance in meters
    pub fn distance_to (&self, other: &GeoPoint)->f64 {
        haversine_distance( self, other)
    }

    /// point reached by travelling `dist` meters from here on the initial `bearing` (degrees from north)
    pub fn destination (&self, bearing: f64, dist: f64)->GeoPoint {
        GeoPoint( MEAN_EARTH.destination( self.0, bearing, dist))
    }

    /// shortest great circle distance in meters to the great circle arc (a,b)
    pub fn distance_to_segment (&self, a: &GeoPoint, b: &GeoPoint)->f64 {
        let line = Line::new( a.coord(), b.coord());
        self.distance_to_closest( line.haversine_closest_point( &self.0))
            .unwrap_or_else( || self.distance_to( a).min( self.distance_to( b)))
    }

    fn distance_to_closest (&self, closest: Closest<f64>)->Option<f64> {
        match closest {
            Closest::Intersection(p) | Closest::SinglePoint(p) => Some( MEAN_EARTH.distance( self.0, p)),
            Closest::Indeterminate => None
        }
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.lon(), self.lat())
    }
}

// alternative input names let us read points that were serialized by `geo` ("x","y")
#[derive(Serialize,Deserialize)]
struct LonLat {
    #[serde(alias="longitude", alias="x")]
    lon: f64,
    #[serde(alias="latitude", alias="y")]
    lat: f64,
}

impl From<LonLat> for GeoPoint {
    fn from (ll: LonLat)->Self { GeoPoint::from_lon_lat_degrees( ll.lon, ll.lat) }
}

impl From<GeoPoint> for LonLat {
    fn from (p: GeoPoint)->Self { LonLat { lon: p.lon(), lat: p.lat() } }
}

/* #endregion GeoPoint */

/* #region GeoRect ************************************************************************************************/

/// an axis aligned lon/lat rectangle (envelope). Does not support antimeridian crossing
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
#[serde(from="Wsen", into="Wsen")]
pub struct GeoRect(Rect);

impl GeoRect {
    /// note that geo::Rect normalizes min/max, use [`GeoRect::try_from_wsen`] for checked input
    pub fn from_wsen (west: f64, south: f64, east: f64, north: f64)->Self {
        GeoRect( Rect::new( Coord{x: west, y: south}, Coord{x: east, y: north}))
    }

    pub fn try_from_wsen (west: f64, south: f64, east: f64, north: f64)->Result<Self> {
        let ok = [west,south,east,north].iter().all(|v| v.is_finite())
            && west < east && south < north
            && (-180.0..=180.0).contains(&west) && (-180.0..=180.0).contains(&east)
            && (-90.0..=90.0).contains(&south) && (-90.0..=90.0).contains(&north);

        if ok {
            Ok( Self::from_wsen( west, south, east, north))
        } else {
            Err( CommonError::InvalidGeometry( format!("not a valid rectangle: [{west},{south},{east},{north}]")))
        }
    }

    pub fn west (&self)->f64 { self.0.min().x }
    pub fn south (&self)->f64 { self.0.min().y }
    pub fn east (&self)->f64 { self.0.max().x }
    pub fn north (&self)->f64 { self.0.max().y }

    pub fn rect (&self)->&Rect { &self.0 }

    pub fn center (&self)->GeoPoint {
        let c = self.0.center();
        GeoPoint::from_lon_lat_degrees( c.x, c.y)
    }

    /// inclusive on all edges
    pub fn contains (&self, p: &GeoPoint)->bool {
        p.lon() >= self.west() && p.lon() <= self.east() && p.lat() >= self.south() && p.lat() <= self.north()
    }

    pub fn intersects (&self, other: &GeoRect)->bool {
        self.0.intersects( &other.0)
    }

    /// grow the rectangle by `dist` meters on each side. Longitude growth is computed at the
    /// latitude closest to the pole so that the result always covers the metric buffer
    pub fn expanded_by (&self, dist: f64)->GeoRect {
        if dist <= 0.0 { return *self }

        let dlat = meters_to_lat_degrees( dist);
        let south = (self.south() - dlat).max( -90.0);
        let north = (self.north() + dlat).min( 90.0);
        let dlon = meters_to_lon_degrees( dist, south.abs().max( north.abs()));
        let west = (self.west() - dlon).max( -180.0);
        let east = (self.east() + dlon).min( 180.0);

        GeoRect::from_wsen( west, south, east, north)
    }

    pub fn to_polygon (&self)->GeoPolygon {
        GeoPolygon( self.0.to_polygon())
    }

    /// geodesic area in m²
    pub fn area (&self)->f64 {
        self.0.to_polygon().geodesic_area_unsigned()
    }
}

impl fmt::Display for GeoRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{},{},{}]", self.west(), self.south(), self.east(), self.north())
    }
}

#[derive(Serialize,Deserialize)]
struct Wsen { west: f64, south: f64, east: f64, north: f64 }

impl From<Wsen> for GeoRect {
    fn from (r: Wsen)->Self { GeoRect::from_wsen( r.west, r.south, r.east, r.north) }
}

impl From<GeoRect> for Wsen {
    fn from (r: GeoRect)->Self { Wsen { west: r.west(), south: r.south(), east: r.east(), north: r.north() } }
}

/* #endregion GeoRect */

/* #region GeoPolygon *********************************************************************************************/

/// a wrapper for geo::Polygon in geodetic degrees. Rings are implicitly closed
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
#[serde(try_from="Rings", into="Rings")]
pub struct GeoPolygon(Polygon);

impl GeoPolygon {
    pub fn from_exterior (exterior: &[GeoPoint])->Result<Self> {
        Self::from_rings( exterior, &[])
    }

    /// checks that all vertices are valid, each ring has at least three distinct vertices and the
    /// polygon has a non-zero area
    pub fn from_rings (exterior: &[GeoPoint], interiors: &[Vec<GeoPoint>])->Result<Self> {
        if let Some(p) = exterior.iter().chain( interiors.iter().flatten()).find( |p| !p.is_valid()) {
            return Err( CommonError::InvalidCoordinate( p.to_string()))
        }

        let ext = ring( exterior)?;
        let ints = interiors.iter().map( |r| ring(r)).collect::<Result<Vec<LineString>>>()?;
        let polygon = Polygon::new( ext, ints);

        if polygon.geodesic_area_unsigned() > 0.0 {
            Ok( GeoPolygon(polygon))
        } else {
            Err( CommonError::InvalidGeometry( "polygon has zero area".into()))
        }
    }

    pub fn polygon (&self)->&Polygon { &self.0 }

    pub fn exterior (&self)->Vec<GeoPoint> {
        self.0.exterior().points().map( GeoPoint).collect()
    }

    /// points on the boundary are not contained
    pub fn contains (&self, p: &GeoPoint)->bool {
        self.0.contains( p.point())
    }

    pub fn bounds (&self)->GeoRect {
        // validated polygons always have a bounding rect
        self.0.bounding_rect().map( GeoRect).unwrap_or( GeoRect::from_wsen( 0.0, 0.0, 0.0, 0.0))
    }

    /// geodesic area in m²
    pub fn area (&self)->f64 {
        self.0.geodesic_area_unsigned()
    }

    /// shortest great circle distance in meters from `p` to any ring
    pub fn distance_to_boundary (&self, p: &GeoPoint)->f64 {
        std::iter::once( self.0.exterior())
            .chain( self.0.interiors().iter())
            .map( |ring| {
                p.distance_to_closest( ring.haversine_closest_point( p.point()))
                    .unwrap_or_else( || ring.points().map( |v| p.distance_to( &GeoPoint(v))).fold( f64::INFINITY, f64::min))
            })
            .fold( f64::INFINITY, f64::min)
    }

    /// lon/lat envelope of the polygon with its edges taken as great circle arcs. Arcs can bulge
    /// poleward of their end points, so this can exceed [`GeoPolygon::bounds`]
    pub fn arc_bounds (&self)->GeoRect {
        let dense = MEAN_EARTH.densify( &self.0, ARC_SAMPLE_LENGTH);
        match dense.bounding_rect() {
            Some(r) => {
                let b = self.bounds();
                GeoRect::from_wsen( r.min().x.min( b.west()), r.min().y.min( b.south()), r.max().x.max( b.east()), r.max().y.max( b.north()))
            }
            None => self.bounds()
        }
    }
}

fn ring (points: &[GeoPoint])->Result<LineString> {
    let mut coords: Vec<GeoCoord> = Vec::with_capacity( points.len()+1);
    for p in points {
        let c = p.coord();
        if coords.last() != Some(&c) { coords.push(c) }
    }
    if coords.len() > 1 && coords.first() == coords.last() { coords.pop(); }

    if coords.len() < 3 {
        Err( CommonError::InvalidGeometry( format!("ring needs at least 3 distinct vertices, got {}", coords.len())))
    } else {
        Ok( LineString::from( coords))
    }
}

#[derive(Serialize,Deserialize)]
struct Rings {
    exterior: Vec<GeoPoint>,
    #[serde(default)]
    interiors: Vec<Vec<GeoPoint>>
}

impl TryFrom<Rings> for GeoPolygon {
    type Error = CommonError;
    fn try_from (r: Rings)->Result<Self> { GeoPolygon::from_rings( &r.exterior, &r.interiors) }
}

impl From<GeoPolygon> for Rings {
    fn from (p: GeoPolygon)->Self {
        let interiors = p.0.interiors().iter().map( |ls| ls.points().map( GeoPoint).collect()).collect();
        Rings { exterior: p.exterior(), interiors }
    }
}

impl From<GeoRect> for GeoPolygon {
    fn from (r: GeoRect)->Self { r.to_polygon() }
}

/* #endregion GeoPolygon */

/* #region spherical helpers **************************************************************************************/

pub fn haversine_distance (a: &GeoPoint, b: &GeoPoint)->f64 {
    MEAN_EARTH.distance( a.0, b.0)
}

#[inline] pub fn meters_to_lat_degrees (dist: f64)->f64 { dist / METERS_PER_DEGREE }

/// degrees of longitude spanned by `dist` meters at latitude `lat` (degrees)
pub fn meters_to_lon_degrees (dist: f64, lat: f64)->f64 {
    let c = cos( lat.to_radians());
    if c > 1e-9 { (dist / (METERS_PER_DEGREE * c)).min( 360.0) } else { 360.0 }
}

/* #endregion spherical helpers */
