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

//! the raster data model: projections, regular grids and NaN-masked bands

use std::fmt;
use ndarray::{Array2, Zip};
use serde::{Serialize,Deserialize};
use firescan_common::approx_eq;
use firescan_common::geo::{GeoPoint, GeoRect, meters_to_lat_degrees, meters_to_lon_degrees};
use firescan_common::geo_constants::METERS_PER_DEGREE;
use firescan_common::utm::{self, UtmCoord, UtmZone};
use crate::errors::{FirescanError, Result, incompatible_grid, invalid_geometry};

/* #region Projection *********************************************************************************************/

#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,Serialize,Deserialize)]
pub enum Projection {
    /// WGS84 lon/lat degrees
    Geographic,
    /// WGS84 UTM meters
    Utm(UtmZone)
}

impl Projection {
    /// the UTM projection for the natural zone of `p`
    pub fn utm_for (p: &GeoPoint)->Option<Projection> {
        utm::utm_zone( p).map( Projection::Utm)
    }

    pub fn epsg (&self)->u32 {
        match self {
            Projection::Geographic => 4326,
            Projection::Utm(zone) => zone.epsg()
        }
    }

    pub fn is_metric (&self)->bool { matches!( self, Projection::Utm(_)) }

    pub fn to_geo (&self, x: f64, y: f64)->GeoPoint {
        match self {
            Projection::Geographic => GeoPoint::from_lon_lat_degrees( x, y),
            Projection::Utm(zone) => utm::utm_to_geo( &UtmCoord{ easting: x, northing: y, zone: *zone })
        }
    }

    pub fn from_geo (&self, p: &GeoPoint)->Option<(f64,f64)> {
        match self {
            Projection::Geographic => Some( (p.lon(), p.lat()) ),
            Projection::Utm(zone) => utm::geo_to_utm_zone( p, *zone).map( |u| (u.easting, u.northing))
        }
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.epsg())
    }
}

/* #endregion Projection */

/// the nominal pixel size at which a reduction is evaluated. This is always explicit since
/// counts and areas depend on it
#[derive(Debug,Clone,Copy,PartialEq,Default,Serialize,Deserialize)]
pub enum Scale {
    /// the native grid of the input
    #[default]
    Native,
    /// pixel edge length in meters
    Meters(f64)
}

impl Scale {
    pub fn meters (m: f64)->Self { Scale::Meters(m) }

    /// a pixel size has to be finite and positive
    pub fn check (&self)->Result<()> {
        match *self {
            Scale::Meters(m) if !m.is_finite() || m <= 0.0 => Err( invalid_geometry!("invalid scale {}m", m)),
            _ => Ok(())
        }
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scale::Native => write!(f, "native"),
            Scale::Meters(m) => write!(f, "{m}m")
        }
    }
}

/* #region GridSpec ***********************************************************************************************/

/// a north-up (or south-up) regular grid. `(x0,y0)` is the outer corner of pixel (0,0), pixel
/// centers are at `x0 + (col + 0.5)*dx`, `y0 + (row + 0.5)*dy`
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct GridSpec {
    pub projection: Projection,
    pub x0: f64,
    pub y0: f64,
    pub dx: f64,
    pub dy: f64,
    pub cols: usize,
    pub rows: usize,
}

impl GridSpec {
    pub fn new (projection: Projection, x0: f64, y0: f64, dx: f64, dy: f64, cols: usize, rows: usize)->Result<Self> {
        let grid = GridSpec { projection, x0, y0, dx, dy, cols, rows };
        grid.check()?;
        Ok( grid )
    }

    /// a geographic grid whose outer edges are the given rect
    pub fn geographic (bounds: &GeoRect, cols: usize, rows: usize)->Result<Self> {
        if cols == 0 || rows == 0 { return Err( invalid_geometry!("empty grid")) }
        let dx = (bounds.east() - bounds.west()) / cols as f64;
        let dy = -(bounds.north() - bounds.south()) / rows as f64;
        Self::new( Projection::Geographic, bounds.west(), bounds.north(), dx, dy, cols, rows)
    }

    pub fn check (&self)->Result<()> {
        let ok = [self.x0, self.y0, self.dx, self.dy].iter().all(|v| v.is_finite())
            && self.dx != 0.0 && self.dy != 0.0 && self.cols > 0 && self.rows > 0;
        if ok { Ok(()) } else { Err( invalid_geometry!("invalid grid {:?}", self)) }
    }

    pub fn len (&self)->usize { self.cols * self.rows }

    /// (rows,cols) in ndarray order
    pub fn shape (&self)->(usize,usize) { (self.rows, self.cols) }

    pub fn pixel_center (&self, col: usize, row: usize)->(f64,f64) {
        (self.x0 + (col as f64 + 0.5) * self.dx, self.y0 + (row as f64 + 0.5) * self.dy)
    }

    pub fn pixel_center_geo (&self, col: usize, row: usize)->GeoPoint {
        let (x,y) = self.pixel_center( col, row);
        self.projection.to_geo( x, y)
    }

    pub fn index_of (&self, x: f64, y: f64)->Option<(usize,usize)> {
        let c = ((x - self.x0) / self.dx).floor();
        let r = ((y - self.y0) / self.dy).floor();
        if c >= 0.0 && r >= 0.0 && (c as usize) < self.cols && (r as usize) < self.rows {
            Some( (c as usize, r as usize) )
        } else {
            None
        }
    }

    pub fn index_of_geo (&self, p: &GeoPoint)->Option<(usize,usize)> {
        self.projection.from_geo( p).and_then( |(x,y)| self.index_of( x, y))
    }

    /// the outer extent in grid coordinates as (xmin,ymin,xmax,ymax)
    pub fn extent (&self)->(f64,f64,f64,f64) {
        let x1 = self.x0 + self.cols as f64 * self.dx;
        let y1 = self.y0 + self.rows as f64 * self.dy;
        (self.x0.min(x1), self.y0.min(y1), self.x0.max(x1), self.y0.max(y1))
    }

    /// lon/lat envelope of the grid. For projected grids this samples the outline
    pub fn geo_bounds (&self)->GeoRect {
        let (xmin,ymin,xmax,ymax) = self.extent();
        let n = if self.projection.is_metric() { 8 } else { 1 };
        let mut w = f64::INFINITY; let mut s = f64::INFINITY;
        let mut e = f64::NEG_INFINITY; let mut nn = f64::NEG_INFINITY;

        for i in 0..=n {
            let f = i as f64 / n as f64;
            let x = xmin + f * (xmax - xmin);
            let y = ymin + f * (ymax - ymin);
            for (px,py) in [(x,ymin), (x,ymax), (xmin,y), (xmax,y)] {
                let p = self.projection.to_geo( px, py);
                w = w.min( p.lon()); e = e.max( p.lon());
                s = s.min( p.lat()); nn = nn.max( p.lat());
            }
        }
        GeoRect::from_wsen( w, s, e, nn)
    }

    fn center_lat (&self)->f64 {
        self.pixel_center_geo( self.cols / 2, self.rows / 2).lat()
    }

    /// nominal pixel edge length in meters
    pub fn pixel_size (&self)->f64 {
        match self.projection {
            Projection::Utm(_) => (self.dx * self.dy).abs().sqrt(),
            Projection::Geographic => {
                let w = self.dx.abs() * METERS_PER_DEGREE * self.center_lat().to_radians().cos();
                let h = self.dy.abs() * METERS_PER_DEGREE;
                (w * h).sqrt()
            }
        }
    }

    /// area in m² of a pixel in `row`. Constant for projected grids, geodesic per row for geographic ones
    pub fn cell_area (&self, row: usize)->f64 {
        match self.projection {
            Projection::Utm(_) => (self.dx * self.dy).abs(),
            Projection::Geographic => {
                let ya = self.y0 + row as f64 * self.dy;
                let yb = ya + self.dy;
                GeoRect::from_wsen( self.x0, ya.min(yb), self.x0 + self.dx.abs(), ya.max(yb)).area()
            }
        }
    }

    /// the grid covering the same extent and projection at the requested scale
    pub fn at_scale (&self, scale: Scale)->Result<GridSpec> {
        self.reprojected( self.projection, scale)
    }

    /// a grid in `projection` that covers this grid's extent, with pixels of the requested scale
    /// (the native pixel size if `Scale::Native`)
    pub fn reprojected (&self, projection: Projection, scale: Scale)->Result<GridSpec> {
        let size = match scale {
            Scale::Native => self.pixel_size(),
            Scale::Meters(m) if m.is_finite() && m > 0.0 => m,
            Scale::Meters(m) => return Err( invalid_geometry!("invalid scale {}", m))
        };

        if projection == self.projection {
            if approx_eq( size, self.pixel_size(), size * 1e-9) { return Ok( self.clone()) }

            let (xmin,ymin,xmax,ymax) = self.extent();
            let (sx,sy) = match projection {
                Projection::Utm(_) => (size, size),
                Projection::Geographic => (meters_to_lon_degrees( size, self.center_lat()), meters_to_lat_degrees( size)),
            };
            let cols = (((xmax - xmin) / sx) - 1e-9).ceil().max(1.0) as usize;
            let rows = (((ymax - ymin) / sy) - 1e-9).ceil().max(1.0) as usize;
            GridSpec::new( projection, self.x0, self.y0, sx.copysign( self.dx), sy.copysign( self.dy), cols, rows)

        } else {
            let bounds = self.geo_bounds();
            let mut xmin = f64::INFINITY; let mut ymin = f64::INFINITY;
            let mut xmax = f64::NEG_INFINITY; let mut ymax = f64::NEG_INFINITY;
            let n = 8;
            for i in 0..=n {
                let f = i as f64 / n as f64;
                let lon = bounds.west() + f * (bounds.east() - bounds.west());
                let lat = bounds.south() + f * (bounds.north() - bounds.south());
                for p in [(lon, bounds.south()), (lon, bounds.north()), (bounds.west(), lat), (bounds.east(), lat)] {
                    let (x,y) = projection.from_geo( &GeoPoint::from_lon_lat_degrees( p.0, p.1))
                        .ok_or_else( || incompatible_grid!("extent of {:?} not representable in {}", self, projection))?;
                    xmin = xmin.min(x); xmax = xmax.max(x);
                    ymin = ymin.min(y); ymax = ymax.max(y);
                }
            }
            let (sx,sy) = match projection {
                Projection::Utm(_) => (size, size),
                Projection::Geographic => (meters_to_lon_degrees( size, bounds.center().lat()), meters_to_lat_degrees( size)),
            };
            let cols = ((xmax - xmin) / sx).ceil().max(1.0) as usize;
            let rows = ((ymax - ymin) / sy).ceil().max(1.0) as usize;
            GridSpec::new( projection, xmin, ymax, sx, -sy, cols, rows)
        }
    }

    /// same projection, origin, pixel size and dimensions (within float tolerance)
    pub fn is_aligned_with (&self, other: &GridSpec)->bool {
        let eps = 1e-9 * self.dx.abs().max( self.dy.abs());
        self.projection == other.projection && self.cols == other.cols && self.rows == other.rows
            && approx_eq( self.x0, other.x0, eps) && approx_eq( self.y0, other.y0, eps)
            && approx_eq( self.dx, other.dx, eps) && approx_eq( self.dy, other.dy, eps)
    }

    /// nearest neighbour source index for each pixel of `target` (row major), None if the
    /// target pixel center falls outside of this grid
    pub fn sample_indices (&self, target: &GridSpec)->Vec<Option<(usize,usize)>> {
        let mut indices = Vec::with_capacity( target.len());
        for row in 0..target.rows {
            for col in 0..target.cols {
                let (x,y) = target.pixel_center( col, row);
                let idx = if target.projection == self.projection {
                    self.index_of( x, y)
                } else {
                    self.index_of_geo( &target.projection.to_geo( x, y))
                };
                indices.push( idx);
            }
        }
        indices
    }
}

/* #endregion GridSpec */

/* #region Band ***************************************************************************************************/

/// linear scaling from stored to physical values: `v * scale + offset`
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct BandScaling {
    pub scale: f64,
    pub offset: f64,
}

impl BandScaling {
    pub const IDENTITY: BandScaling = BandScaling { scale: 1.0, offset: 0.0 };

    /// Landsat collection 2 level 2 surface reflectance
    pub const LANDSAT_SR: BandScaling = BandScaling { scale: 0.0000275, offset: -0.2 };

    /// Landsat collection 2 level 2 surface temperature [K]
    pub const LANDSAT_ST: BandScaling = BandScaling { scale: 0.00341802, offset: 149.0 };

    /// Sentinel-2 L2A surface reflectance
    pub const SENTINEL2_SR: BandScaling = BandScaling { scale: 0.0001, offset: 0.0 };

    #[inline] pub fn apply (&self, v: f32)->f32 { (v as f64 * self.scale + self.offset) as f32 }
}

/// a single raster band stored as [row,col] array. NaN marks masked/nodata pixels
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
#[serde(try_from="BandData", into="BandData")]
pub struct Band(Array2<f32>);

impl Band {
    pub fn new (data: Array2<f32>)->Self { Band(data) }

    pub fn filled (rows: usize, cols: usize, v: f32)->Self {
        Band( Array2::from_elem( (rows,cols), v))
    }

    pub fn from_vec (rows: usize, cols: usize, values: Vec<f32>)->Result<Self> {
        Array2::from_shape_vec( (rows,cols), values)
            .map( Band)
            .map_err( |e| incompatible_grid!("band values do not match {}x{}: {}", rows, cols, e))
    }

    /// `f` is called with (col,row)
    pub fn from_fn<F> (rows: usize, cols: usize, mut f: F)->Self where F: FnMut(usize,usize)->f32 {
        Band( Array2::from_shape_fn( (rows,cols), |(r,c)| f(c,r)))
    }

    pub fn data (&self)->&Array2<f32> { &self.0 }

    /// (rows,cols)
    pub fn shape (&self)->(usize,usize) { self.0.dim() }

    /// NaN if out of bounds
    pub fn get (&self, col: usize, row: usize)->f32 {
        self.0.get( (row,col)).copied().unwrap_or( f32::NAN)
    }

    pub fn set (&mut self, col: usize, row: usize, v: f32) {
        if let Some(x) = self.0.get_mut( (row,col)) { *x = v }
    }

    pub fn map<F> (&self, f: F)->Band where F: Fn(f32)->f32 {
        Band( self.0.mapv( f))
    }

    pub fn zip_with<F> (&self, other: &Band, f: F)->Result<Band> where F: Fn(f32,f32)->f32 {
        if self.shape() != other.shape() {
            return Err( incompatible_grid!("band shapes differ: {:?} vs {:?}", self.shape(), other.shape()))
        }
        Ok( Band( Zip::from( &self.0).and( &other.0).map_collect( |&a,&b| f(a,b))))
    }

    pub fn scaled (&self, scaling: &BandScaling)->Band {
        self.map( |v| scaling.apply(v))
    }

    pub fn valid_count (&self)->usize {
        self.0.iter().filter( |v| !v.is_nan()).count()
    }

    /// nearest neighbour resampling from grid `from` onto grid `to`
    pub fn resample (&self, from: &GridSpec, to: &GridSpec)->Band {
        if from.is_aligned_with( to) { return self.clone() }

        let indices = from.sample_indices( to);
        let values = indices.iter().map( |idx| match idx {
            Some((c,r)) => self.get( *c, *r),
            None => f32::NAN
        }).collect();

        // sample_indices always yields rows*cols entries
        Band( Array2::from_shape_vec( to.shape(), values).unwrap_or_else( |_| Array2::from_elem( to.shape(), f32::NAN)))
    }
}

/// the serialized form of a band. JSON has no NaN so masked pixels are `null`, and stored
/// `nodata` sentinel values are converted to NaN on input
#[derive(Serialize,Deserialize)]
struct BandData {
    rows: usize,
    cols: usize,
    #[serde(default)]
    nodata: Option<f32>,
    values: Vec<Option<f32>>,
}

impl TryFrom<BandData> for Band {
    type Error = FirescanError;
    fn try_from (bd: BandData)->Result<Self> {
        let values = bd.values.into_iter().map( |v| match v {
            Some(x) if Some(x) != bd.nodata => x,
            _ => f32::NAN
        }).collect();
        Band::from_vec( bd.rows, bd.cols, values)
    }
}

impl From<Band> for BandData {
    fn from (b: Band)->Self {
        let (rows,cols) = b.shape();
        let values = b.0.iter().map( |v| if v.is_nan() { None } else { Some(*v) }).collect();
        BandData { rows, cols, nodata: None, values }
    }
}

/* #endregion Band */
