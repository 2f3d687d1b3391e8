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

//! firescan - detection and quantification of thermal and burn-scar anomalies in satellite raster
//! collections over an area of interest.
//!
//! The processing core is independent of where imagery comes from: it talks to a [`source::DataSource`]
//! that answers collection queries and performs region reductions. All operations treat an empty
//! collection as a valid (empty) result.

use std::{fs, path::Path};
use serde::de::DeserializeOwned;

mod errors;
pub use errors::*;

pub mod aoi;
pub mod raster;
pub mod image;
pub mod mask;
pub mod threshold;
pub mod vectorize;
pub mod reduce;
pub mod area;
pub mod index;
pub mod composite;
pub mod burn;
pub mod detection;
pub mod daily;
pub mod scene;
pub mod evt;
pub mod baseline;
pub mod weather;
pub mod source;
pub mod report;
pub mod config;
pub mod pipeline;

/// load a RON config from `path`
pub fn load_config<C,P> (path: P)->Result<C> where C: DeserializeOwned, P: AsRef<Path> {
    let bytes = fs::read( path)?;
    Ok( ron::de::from_bytes( &bytes)? )
}

/// parse a RON config from a string
pub fn parse_config<C> (src: &str)->Result<C> where C: DeserializeOwned {
    Ok( ron::from_str( src)? )
}
