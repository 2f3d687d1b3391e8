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

//! the boundary to imagery providers. A [`DataSource`] answers collection queries and performs the
//! raster reductions that a remote backend would run server side. The provided method defaults run
//! them locally

use std::{collections::{BTreeMap, HashMap}, fs, path::{Path, PathBuf}, sync::Arc, time::Duration};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use firescan_common::datetime::TimeWindow;
use firescan_common::geo::GeoRect;
use crate::aoi::Aoi;
use crate::errors::{FirescanError, Result};
use crate::image::{ImageRecord, reproject_image};
use crate::mask::AnomalyMask;
use crate::raster::{Projection, Scale};
use crate::reduce::{self, Reducer};
use crate::vectorize::{self, VectorFeature};

#[async_trait]
pub trait DataSource: Send + Sync {
    /// all images of `collection` that intersect `bounds` and were captured within `window`,
    /// ordered by capture time. An empty result is not an error
    async fn query (&self, collection: &str, bounds: &GeoRect, window: &TimeWindow)->Result<Vec<ImageRecord>>;

    /// pixel centers of set mask pixels within the `region` envelope
    fn reduce_to_vectors (&self, mask: &AnomalyMask, region: &GeoRect, scale: Scale, projection: Option<Projection>)->Result<Vec<VectorFeature>> {
        vectorize::reduce_to_vectors( mask, region, scale, projection)
    }

    /// per band aggregation over `region`
    fn reduce_region (&self, image: &ImageRecord, region: &Aoi, scale: Scale, reducer: Reducer)->Result<BTreeMap<String,f64>> {
        reduce::reduce_region( image, region, scale, reducer)
    }

    fn reproject (&self, image: &ImageRecord, projection: Projection, scale: Scale)->Result<ImageRecord> {
        reproject_image( image, projection, scale)
    }
}

/* #region QueryBoundary ******************************************************************************************/

/// runs data source queries with an optional timeout and cancellation token, and attributes
/// failures to the collection and window that were queried
#[derive(Debug,Clone,Default)]
pub struct QueryBoundary {
    timeout: Option<Duration>,
    cancel: Option<CancellationToken>,
}

impl QueryBoundary {
    pub fn new (timeout: Option<Duration>)->Self {
        QueryBoundary { timeout, cancel: None }
    }

    pub fn with_cancellation (mut self, token: CancellationToken)->Self {
        self.cancel = Some(token);
        self
    }

    pub fn timeout (&self)->Option<Duration> { self.timeout }

    pub async fn query (&self, source: &dyn DataSource, collection: &str, bounds: &GeoRect, window: &TimeWindow)->Result<Vec<ImageRecord>> {
        if window.is_empty() {
            debug!("empty window {window} for {collection}");
            return Ok( Vec::new() )
        }

        let query = async {
            match self.timeout {
                Some(timeout) => match tokio::time::timeout( timeout, source.query( collection, bounds, window)).await {
                    Ok(res) => res,
                    Err(_) => Err( FirescanError::QueryTimeout { collection: collection.to_string(), window: *window, timeout })
                }
                None => source.query( collection, bounds, window).await
            }
        };

        let res = match &self.cancel {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => Err( FirescanError::QueryCancelled { collection: collection.to_string(), window: *window }),
                res = query => res
            },
            None => query.await
        };

        match res {
            Ok(images) => {
                debug!("{} images of {} in {}", images.len(), collection, window);
                Ok( images )
            }
            Err(e) if e.is_query_error() => Err(e),
            Err(e) => Err( FirescanError::DataSource { collection: collection.to_string(), window: *window, msg: e.to_string() })
        }
    }
}

/* #endregion QueryBoundary */

/* #region MemorySource *******************************************************************************************/

/// a data source over images held in memory
#[derive(Debug,Clone,Default)]
pub struct MemorySource {
    collections: HashMap<String,Vec<ImageRecord>>
}

impl MemorySource {
    pub fn new ()->Self { MemorySource::default() }

    pub fn from_images (images: impl IntoIterator<Item=ImageRecord>)->Self {
        let mut src = MemorySource::new();
        for img in images { src.add( img) }
        src
    }

    pub fn add (&mut self, image: ImageRecord) {
        let images = self.collections.entry( image.collection.clone()).or_default();
        images.push( image);
        images.sort_by( |a,b| a.time.cmp( &b.time).then_with( || a.id.cmp( &b.id)));
    }

    pub fn len (&self)->usize { self.collections.values().map( |v| v.len()).sum() }

    pub fn is_empty (&self)->bool { self.len() == 0 }

    pub fn collection_names (&self)->impl Iterator<Item=&str> {
        self.collections.keys().map( |k| k.as_str())
    }

    /// synchronous query used by the async trait method
    pub fn select (&self, collection: &str, bounds: &GeoRect, window: &TimeWindow)->Vec<ImageRecord> {
        self.collections.get( collection).map( |images| {
            images.iter()
                .filter( |img| window.contains( &img.time) && img.geo_bounds().intersects( bounds))
                .cloned()
                .collect()
        }).unwrap_or_default()
    }
}

#[async_trait]
impl DataSource for MemorySource {
    async fn query (&self, collection: &str, bounds: &GeoRect, window: &TimeWindow)->Result<Vec<ImageRecord>> {
        Ok( self.select( collection, bounds, window) )
    }
}

/* #endregion MemorySource */

/* #region SceneDirectory *****************************************************************************************/

/// a data source over a directory tree of JSON serialized [`ImageRecord`]s (one per file, `*.json`)
#[derive(Debug,Clone)]
pub struct SceneDirectory {
    root: PathBuf,
    scenes: MemorySource,
}

impl SceneDirectory {
    pub fn open<P: AsRef<Path>> (root: P)->Result<Self> {
        let root = root.as_ref().to_path_buf();
        let mut paths = Vec::new();
        collect_scene_files( &root, &mut paths)?;
        paths.sort();

        let mut scenes = MemorySource::new();
        for path in &paths {
            let img: ImageRecord = serde_json::from_slice( &fs::read( path)?)?;
            img.validate()?;
            scenes.add( img);
        }
        info!("loaded {} scenes from {:?}", scenes.len(), root);

        Ok( SceneDirectory { root, scenes } )
    }

    pub fn root (&self)->&Path { &self.root }

    pub fn len (&self)->usize { self.scenes.len() }

    /// write `image` as `<root>/<collection>/<id>.json`
    pub fn store (&mut self, image: ImageRecord)->Result<PathBuf> {
        let dir = self.root.join( sanitize( &image.collection));
        fs::create_dir_all( &dir)?;
        let path = dir.join( format!("{}.json", sanitize( &image.id)));
        fs::write( &path, serde_json::to_vec( &image)?)?;
        self.scenes.add( image);
        Ok( path )
    }
}

#[async_trait]
impl DataSource for SceneDirectory {
    async fn query (&self, collection: &str, bounds: &GeoRect, window: &TimeWindow)->Result<Vec<ImageRecord>> {
        Ok( self.scenes.select( collection, bounds, window) )
    }
}

fn collect_scene_files (dir: &Path, paths: &mut Vec<PathBuf>)->Result<()> {
    for entry in fs::read_dir( dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_scene_files( &path, paths)?;
        } else if path.extension().is_some_and( |ext| ext == "json") {
            paths.push( path);
        }
    }
    Ok(())
}

fn sanitize (s: &str)->String {
    s.chars().map( |c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' { c } else { '_' }).collect()
}

/* #endregion SceneDirectory */
