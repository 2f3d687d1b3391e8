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

use bit_set::BitSet;
use chrono::{DateTime, Utc};
use serde::{Serialize,Deserialize};
use crate::aoi::Aoi;
use crate::errors::{FirescanError, Result, incompatible_grid};
use crate::raster::{Band, GridSpec, Scale};
use crate::threshold::ThresholdRule;

/// where a mask came from
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct MaskSource {
    pub image_id: String,
    pub collection: String,
    pub time: DateTime<Utc>,
}

/// a boolean raster that marks anomalous pixels of one image on that image's grid.
/// Bit `row*cols + col` is set if pixel (col,row) satisfied `rule`
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct AnomalyMask {
    grid: GridSpec,
    source: MaskSource,
    rule: ThresholdRule,
    data: BitSet,
}

impl AnomalyMask {
    pub fn new (grid: GridSpec, source: MaskSource, rule: ThresholdRule)->Self {
        let data = BitSet::with_capacity( grid.len());
        AnomalyMask { grid, source, rule, data }
    }

    /// set all pixels for which `pred(col,row)` holds
    pub fn from_predicate<F> (grid: GridSpec, source: MaskSource, rule: ThresholdRule, pred: F)->Self
        where F: Fn(usize,usize)->bool
    {
        let mut mask = Self::new( grid, source, rule);
        for row in 0..mask.grid.rows {
            for col in 0..mask.grid.cols {
                if pred( col, row) { mask.set( col, row) }
            }
        }
        mask
    }

    pub fn grid (&self)->&GridSpec { &self.grid }
    pub fn source (&self)->&MaskSource { &self.source }
    pub fn rule (&self)->&ThresholdRule { &self.rule }

    /// (cols,rows)
    pub fn dimensions (&self)->(usize,usize) { (self.grid.cols, self.grid.rows) }

    pub fn get (&self, col: usize, row: usize)->bool {
        col < self.grid.cols && self.data.contains( row*self.grid.cols + col)
    }

    pub fn set (&mut self, col: usize, row: usize) {
        if col < self.grid.cols && row < self.grid.rows {
            self.data.insert( row*self.grid.cols + col);
        }
    }

    pub fn unset (&mut self, col: usize, row: usize)->bool {
        col < self.grid.cols && self.data.remove( row*self.grid.cols + col)
    }

    pub fn clear (&mut self) {
        self.data.clear();
    }

    /// number of set pixels
    pub fn count (&self)->usize { self.data.len() }

    pub fn is_empty (&self)->bool { self.data.is_empty() }

    /// set pixels as (col,row) in row major order
    pub fn iter (&self)->impl Iterator<Item=(usize,usize)> + '_ {
        let cols = self.grid.cols;
        self.data.iter().map( move |i| (i % cols, i / cols))
    }

    pub fn is_subset (&self, other: &AnomalyMask)->bool {
        self.data.is_subset( &other.data)
    }

    fn check_grid (&self, other: &AnomalyMask)->Result<()> {
        if self.grid.is_aligned_with( &other.grid) {
            Ok(())
        } else {
            Err( incompatible_grid!("masks of {} and {} are not on the same grid", self.source.image_id, other.source.image_id))
        }
    }

    // the set operations keep the provenance of the left operand

    pub fn union (&self, other: &AnomalyMask)->Result<Self> {
        self.check_grid( other)?;
        let mut data = self.data.clone();
        data.union_with( &other.data);
        Ok( AnomalyMask{ data, ..self.clone() } )
    }

    pub fn intersection (&self, other: &AnomalyMask)->Result<Self> {
        self.check_grid( other)?;
        let mut data = self.data.clone();
        data.intersect_with( &other.data);
        Ok( AnomalyMask{ data, ..self.clone() } )
    }

    pub fn difference (&self, other: &AnomalyMask)->Result<Self> {
        self.check_grid( other)?;
        let mut data = self.data.clone();
        data.difference_with( &other.data);
        Ok( AnomalyMask{ data, ..self.clone() } )
    }

    /// nearest neighbour resampling onto `grid`
    pub fn resample (&self, grid: &GridSpec)->AnomalyMask {
        if self.grid.is_aligned_with( grid) { return self.clone() }

        let mut mask = AnomalyMask::new( grid.clone(), self.source.clone(), self.rule.clone());
        for (i,idx) in self.grid.sample_indices( grid).into_iter().enumerate() {
            if let Some((c,r)) = idx {
                if self.get( c, r) { mask.data.insert( i); }
            }
        }
        mask
    }

    pub fn at_scale (&self, scale: Scale)->Result<AnomalyMask> {
        Ok( self.resample( &self.grid.at_scale( scale)?) )
    }

    /// unset all pixels whose center is not inside `aoi`
    pub fn clipped (&self, aoi: &Aoi)->AnomalyMask {
        let mut mask = self.clone();
        for (col,row) in self.iter() {
            if !aoi.contains( &self.grid.pixel_center_geo( col, row)) {
                mask.unset( col, row);
            }
        }
        mask
    }

    /// 1.0 for set pixels, NaN (masked) for all others
    pub fn to_band (&self)->Band {
        Band::from_fn( self.grid.rows, self.grid.cols, |c,r| if self.get(c,r) { 1.0 } else { f32::NAN })
    }

    pub fn print (&self) {
        let (w,h) = self.dimensions();

        print!( "     ");
        for x in 0..w { print!( "{:3}", x); }
        println!();
        print!("    ┌");
        for x in 0..w { print!( "───"); }
        println!("─┐");

        for y in 0..h {
            print!( "{:3} │", y);
            for x in 0..w {
                if self.get(x, y) { print!( "  ◼︎"); } else { print!("   "); }
            }
            println!(" │ {:3}", y);
        }

        print!("    └");
        for x in 0..w { print!( "───"); }
        println!("─┘");
    }
}
