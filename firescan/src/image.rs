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

use std::collections::BTreeMap;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Serialize,Deserialize};
use firescan_common::datetime::Dated;
use firescan_common::geo::GeoRect;
use crate::errors::{FirescanError, Result, incompatible_grid, missing_band};
use crate::raster::{Band, BandScaling, GridSpec, Projection, Scale};

/// one acquisition of a collection: named bands on a common grid plus free form properties
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct ImageRecord {
    pub id: String,
    pub collection: String,
    pub time: DateTime<Utc>,
    pub grid: GridSpec,
    #[serde(default)]
    bands: BTreeMap<String,Band>,
    #[serde(default)]
    pub properties: BTreeMap<String,String>,
}

impl ImageRecord {
    pub fn new (id: impl ToString, collection: impl ToString, time: DateTime<Utc>, grid: GridSpec)->Self {
        ImageRecord { id: id.to_string(), collection: collection.to_string(), time, grid, bands: BTreeMap::new(), properties: BTreeMap::new() }
    }

    /// builder style band addition, fails if the band shape does not match the grid
    pub fn with_band (mut self, name: impl ToString, band: Band)->Result<Self> {
        self.insert_band( name, band)?;
        Ok( self )
    }

    pub fn with_property (mut self, key: impl ToString, value: impl ToString)->Self {
        self.properties.insert( key.to_string(), value.to_string());
        self
    }

    pub fn insert_band (&mut self, name: impl ToString, band: Band)->Result<()> {
        if band.shape() != self.grid.shape() {
            return Err( incompatible_grid!("band shape {:?} does not match grid of {}", band.shape(), self.id))
        }
        self.bands.insert( name.to_string(), band);
        Ok(())
    }

    /// check that images read from external sources are consistent
    pub fn validate (&self)->Result<()> {
        self.grid.check()?;
        match self.bands.iter().find( |(_,b)| b.shape() != self.grid.shape()) {
            Some((name,_)) => Err( incompatible_grid!("band {} of {} does not match its grid", name, self.id)),
            None => Ok(())
        }
    }

    pub fn band (&self, name: &str)->Result<&Band> {
        self.bands.get( name).ok_or_else( || missing_band( &self.id, name))
    }

    pub fn has_band (&self, name: &str)->bool { self.bands.contains_key( name) }

    pub fn band_names (&self)->impl Iterator<Item=&str> {
        self.bands.keys().map( |k| k.as_str())
    }

    pub fn bands (&self)->&BTreeMap<String,Band> { &self.bands }

    /// a copy that only contains the given bands
    pub fn select (&self, names: &[&str])->Result<ImageRecord> {
        let mut img = ImageRecord { bands: BTreeMap::new(), ..self.clone() };
        for name in names {
            img.bands.insert( name.to_string(), self.band( name)?.clone());
        }
        Ok( img )
    }

    /// apply `scaling` to the given bands, all others are kept as is
    pub fn scaled (&self, names: &[&str], scaling: &BandScaling)->Result<ImageRecord> {
        let mut img = self.clone();
        for name in names {
            let band = self.band( name)?.scaled( scaling);
            img.bands.insert( name.to_string(), band);
        }
        Ok( img )
    }

    /// the UTC calendar day of the acquisition
    pub fn day (&self)->NaiveDate { self.time.date_naive() }

    pub fn geo_bounds (&self)->GeoRect { self.grid.geo_bounds() }

    /// nearest neighbour resampling of all bands onto `grid`
    pub fn resampled (&self, grid: &GridSpec)->ImageRecord {
        if self.grid.is_aligned_with( grid) { return self.clone() }

        let bands = self.bands.iter().map( |(k,b)| (k.clone(), b.resample( &self.grid, grid))).collect();
        ImageRecord { grid: grid.clone(), bands, ..self.clone() }
    }
}

impl Dated for ImageRecord {
    fn date (&self)->DateTime<Utc> { self.time }
}

/// resample `image` into `projection` at `scale`
pub fn reproject_image (image: &ImageRecord, projection: Projection, scale: Scale)->Result<ImageRecord> {
    let grid = image.grid.reprojected( projection, scale)?;
    Ok( image.resampled( &grid) )
}
