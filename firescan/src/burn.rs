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

//! burn scar assessment from pre/post fire median composites. dNBR = NBR(pre) - NBR(post), a pixel
//! is burned if dNBR exceeds the threshold, and burned vegetation if the pre fire NDVI also does

use serde::{Serialize,Deserialize};
use tracing::{debug, info};
use firescan_common::datetime::TimeWindow;
use crate::aoi::Aoi;
use crate::area::{AreaStatistic, hectares_of, mask_area_image};
use crate::composite::{composite_size, exclusion_masked, median_composite};
use crate::errors::Result;
use crate::image::ImageRecord;
use crate::index::{self, DNBR, NDVI};
use crate::mask::AnomalyMask;
use crate::raster::{BandScaling, Projection, Scale};
use crate::reduce::Reducer;
use crate::scene::{SceneFilter, select_clear_scenes};
use crate::source::{DataSource, QueryBoundary};
use crate::threshold::{build_mask, MissingBandPolicy, ThresholdRule};

fn default_nir ()->String { "B8".into() }
fn default_swir ()->String { "B12".into() }
fn default_red ()->String { "B4".into() }
fn default_qa ()->String { "SCL".into() }
fn default_dnbr_threshold ()->f64 { 0.27 }
fn default_ndvi_threshold ()->f64 { 0.30 }
fn default_scale ()->Scale { Scale::Meters(20.0) }

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct BurnConfig {
    pub collection: String,
    pub pre: TimeWindow,
    pub post: TimeWindow,

    #[serde(default="default_nir")]
    pub nir: String,
    #[serde(default="default_swir")]
    pub swir: String,
    #[serde(default="default_red")]
    pub red: String,
    #[serde(default="default_qa")]
    pub qa_band: String,

    /// holds for usable (clear) QA values
    #[serde(default="ThresholdRule::sentinel2_clear")]
    pub clear_rule: ThresholdRule,

    #[serde(default="default_dnbr_threshold")]
    pub dnbr_threshold: f64,
    #[serde(default="default_ndvi_threshold")]
    pub ndvi_threshold: f64,

    /// area reduction scale
    #[serde(default="default_scale")]
    pub scale: Scale,

    /// common projection the inputs are brought into before compositing
    #[serde(default)]
    pub projection: Option<Projection>,

    /// applied to the reflectance bands before compositing
    #[serde(default)]
    pub scaling: Option<BandScaling>,

    #[serde(default)]
    pub scene_filter: Option<SceneFilter>,
}

impl BurnConfig {
    /// Sentinel-2 L2A defaults for the given windows
    pub fn sentinel2 (pre: TimeWindow, post: TimeWindow)->Self {
        BurnConfig {
            collection: "COPERNICUS/S2_SR_HARMONIZED".into(),
            pre, post,
            nir: default_nir(), swir: default_swir(), red: default_red(), qa_band: default_qa(),
            clear_rule: ThresholdRule::sentinel2_clear(),
            dnbr_threshold: default_dnbr_threshold(),
            ndvi_threshold: default_ndvi_threshold(),
            scale: default_scale(),
            projection: None,
            scaling: None,
            scene_filter: None,
        }
    }
}

#[derive(Debug,Clone,Default,PartialEq)]
pub struct BurnAssessment {
    pub pre_images: usize,
    pub post_images: usize,
    /// dNBR and pre fire NDVI bands on the pre composite grid
    pub dnbr: Option<ImageRecord>,
    pub burn_any: Option<AnomalyMask>,
    pub burn_veg: Option<AnomalyMask>,
    pub burn_any_ha: f64,
    pub burn_veg_ha: f64,
}

impl BurnAssessment {
    pub fn has_data (&self)->bool { self.dnbr.is_some() }

    pub fn area_statistics (&self)->Vec<AreaStatistic> {
        vec![
            AreaStatistic::new( "burn_any", self.burn_any_ha),
            AreaStatistic::new( "burn_veg", self.burn_veg_ha),
        ]
    }
}

pub struct BurnDetector {
    config: BurnConfig
}

impl BurnDetector {
    pub fn new (config: BurnConfig)->Self { BurnDetector { config } }

    pub fn config (&self)->&BurnConfig { &self.config }

    /// query both windows, composite and compare. Windows without usable images result in an
    /// assessment without data and zero areas
    pub async fn assess (&self, source: &dyn DataSource, boundary: &QueryBoundary, aoi: &Aoi, policy: MissingBandPolicy)->Result<BurnAssessment> {
        let cfg = &self.config;
        let pre_images = boundary.query( source, &cfg.collection, aoi.bounds(), &cfg.pre).await?;
        let post_images = boundary.query( source, &cfg.collection, aoi.bounds(), &cfg.post).await?;

        let pre = self.prepare( source, &pre_images, aoi, policy)?;
        let post = self.prepare( source, &post_images, aoi, policy)?;
        info!("burn composites from {} pre and {} post images", pre.len(), post.len());

        let pre_id = format!("median:{}:{}", cfg.collection, cfg.pre);
        let post_id = format!("median:{}:{}", cfg.collection, cfg.post);
        let pre_c = median_composite( &pre_id, &pre, &[cfg.nir.as_str(), cfg.swir.as_str(), cfg.red.as_str()], policy)?;
        let post_c = median_composite( &post_id, &post, &[cfg.nir.as_str(), cfg.swir.as_str()], policy)?;

        // only images that made it into a composite count
        let n_pre = pre_c.as_ref().map_or( 0, composite_size);
        let n_post = post_c.as_ref().map_or( 0, composite_size);

        match (pre_c, post_c) {
            (Some(pre_c), Some(post_c)) => {
                let assessment = self.assess_composites( source, &pre_c, &post_c, aoi)?;
                Ok( BurnAssessment { pre_images: n_pre, post_images: n_post, ..assessment } )
            }
            _ => {
                debug!("no composite for {} or {}", cfg.pre, cfg.post);
                Ok( BurnAssessment { pre_images: n_pre, post_images: n_post, ..BurnAssessment::default() } )
            }
        }
    }

    /// scene filtering, scaling, QA exclusion and reprojection of the raw images of one window
    fn prepare (&self, source: &dyn DataSource, images: &[ImageRecord], aoi: &Aoi, policy: MissingBandPolicy)->Result<Vec<ImageRecord>> {
        let cfg = &self.config;
        let selected = match &cfg.scene_filter {
            Some(filter) => select_clear_scenes( images, filter, aoi, policy)?,
            None => images.to_vec()
        };

        let mut prepared = Vec::with_capacity( selected.len());
        for img in &selected {
            let res = self.prepare_image( source, img);
            if let Some(img) = policy.apply( res)? {
                prepared.push( img);
            }
        }
        Ok( prepared )
    }

    fn prepare_image (&self, source: &dyn DataSource, img: &ImageRecord)->Result<ImageRecord> {
        let cfg = &self.config;
        let mut img = exclusion_masked( img, &cfg.qa_band, &cfg.clear_rule)?;
        if let Some(scaling) = &cfg.scaling {
            img = img.scaled( &[cfg.nir.as_str(), cfg.swir.as_str(), cfg.red.as_str()], scaling)?;
        }
        if let Some(projection) = cfg.projection {
            img = source.reproject( &img, projection, cfg.scale)?;
        }
        Ok( img )
    }

    /// dNBR, burn masks and their areas from a pre and a post composite. The post composite is
    /// resampled onto the pre composite grid
    pub fn assess_composites (&self, source: &dyn DataSource, pre: &ImageRecord, post: &ImageRecord, aoi: &Aoi)->Result<BurnAssessment> {
        let cfg = &self.config;
        let post = post.resampled( &pre.grid);

        let nbr_pre = index::nbr( pre, &cfg.nir, &cfg.swir)?;
        let nbr_post = index::nbr( &post, &cfg.nir, &cfg.swir)?;
        let dnbr = index::difference( &nbr_pre, &nbr_post)?;
        let ndvi_pre = index::ndvi( pre, &cfg.nir, &cfg.red)?;

        let dnbr_img = ImageRecord::new( format!("dNBR:{}:{}", cfg.pre, cfg.post), &cfg.collection, post.time, pre.grid.clone())
            .with_band( DNBR, dnbr)?
            .with_band( NDVI, ndvi_pre)?;

        let burn_any = build_mask( &dnbr_img, DNBR, &ThresholdRule::greater_than( cfg.dnbr_threshold))?.clipped( aoi);
        let vegetated = build_mask( &dnbr_img, NDVI, &ThresholdRule::greater_than( cfg.ndvi_threshold))?;
        let burn_veg = burn_any.intersection( &vegetated)?;

        let burn_any_ha = self.hectares( source, &burn_any, aoi)?;
        let burn_veg_ha = self.hectares( source, &burn_veg, aoi)?;
        info!("burned area {:.2}ha, burned vegetation {:.2}ha at {}", burn_any_ha, burn_veg_ha, cfg.scale);

        Ok( BurnAssessment {
            pre_images: 1,
            post_images: 1,
            dnbr: Some(dnbr_img),
            burn_any: Some(burn_any),
            burn_veg: Some(burn_veg),
            burn_any_ha,
            burn_veg_ha
        })
    }

    fn hectares (&self, source: &dyn DataSource, mask: &AnomalyMask, aoi: &Aoi)->Result<f64> {
        if mask.is_empty() { return Ok(0.0) }
        let img = mask_area_image( mask, self.config.scale)?;
        hectares_of( &source.reduce_region( &img, aoi, Scale::Native, Reducer::Sum)?)
    }
}
