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

//! a configured scan over a data source

use std::{fs::File, sync::Arc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use crate::aoi::Aoi;
use crate::baseline::{AnomalyScore, Baseline, ThermalObservation};
use crate::burn::BurnDetector;
use crate::config::{ScanConfig, ThermalJob};
use crate::daily::run_daily_counts;
use crate::detection::detect_all;
use crate::errors::{FirescanError, Result, op_failed};
use crate::evt::Threshold99;
use crate::image::ImageRecord;
use crate::report::ScanReport;
use crate::scene::{percentile, valid_thermal_values};
use crate::source::{DataSource, QueryBoundary};
use crate::threshold::MissingBandPolicy;
use crate::weather::{detect_heatwave, read_daily_tmax};

pub struct Scan {
    config: ScanConfig,
    aoi: Aoi,
    boundary: QueryBoundary,
}

impl Scan {
    /// validates the AOI and all configured scales, windows are already checked when the config
    /// is deserialized
    pub fn new (config: ScanConfig)->Result<Self> {
        let aoi = Aoi::from_spec( &config.aoi)?;
        check_scales( &config)?;
        let boundary = QueryBoundary::new( config.query_timeout);
        info!("scan AOI {}", aoi);
        Ok( Scan { config, aoi, boundary } )
    }

    pub fn with_cancellation (mut self, token: CancellationToken)->Self {
        self.boundary = self.boundary.with_cancellation( token);
        self
    }

    pub fn aoi (&self)->&Aoi { &self.aoi }
    pub fn config (&self)->&ScanConfig { &self.config }

    pub async fn run (&self, source: Arc<dyn DataSource>)->Result<ScanReport> {
        let policy = self.config.missing_band;
        let mut report = ScanReport::default();

        if let Some(job) = &self.config.detections {
            let table = detect_all( source.clone(), &self.boundary, &job.sources, &self.aoi, &job.window, policy).await?;
            info!("{} detections in {}: {:?}", table.len(), job.window, table.count_by_sensor());
            report.detections = Some(table);
        }

        if let Some(job) = &self.config.daily {
            let daily = run_daily_counts( source.as_ref(), &self.boundary, job, &self.aoi, policy).await?;
            info!("{} days with {} data, {} px in total", daily.table.len(), job.detection.sensor, daily.table.total());
            report.daily = Some(daily);
        }

        if let Some(burn) = &self.config.burn {
            let assessment = BurnDetector::new( burn.clone()).assess( source.as_ref(), &self.boundary, &self.aoi, policy).await?;
            report.burn_images = Some( (assessment.pre_images, assessment.post_images) );
            report.areas.extend( assessment.area_statistics());
        }

        if let Some(job) = &self.config.thermal {
            let (scores, delta_t) = self.score_thermal( source.as_ref(), job, policy).await?;
            report.thermal = Some(scores);
            report.delta_t_threshold = delta_t;

            if let Some(check) = &job.heatwave {
                let series = read_daily_tmax( &check.weather)?;
                report.heatwave = Some( detect_heatwave( &series, &job.window, check));
            }
        }

        Ok( report )
    }

    async fn score_thermal (&self, source: &dyn DataSource, job: &ThermalJob, policy: MissingBandPolicy)->Result<(Vec<AnomalyScore>,Option<Threshold99>)> {
        let training = read_training( job)?;
        let mut baseline = Baseline::fit_with( &training, job.z_threshold, &job.tail);

        if let Some(check) = &job.delta_t {
            let threshold = match check.override_threshold {
                Some(v) => Some( Threshold99::fixed( v)),
                None => {
                    let deltas: Vec<f64> = training.iter().filter( |o| o.group == job.group).filter_map( |o| o.delta_t()).collect();
                    Threshold99::from_values( &deltas)
                }
            };
            match threshold {
                Some(thr) => {
                    info!("ΔT threshold {:.3} ({:?})", thr.value, thr.method);
                    baseline = baseline.with_delta_t_threshold( thr);
                }
                None => warn!("no training ΔT values for group {}", job.group)
            }
        }

        let images = self.boundary.query( source, &job.collection, self.aoi.bounds(), &job.window).await?;
        let mut observations = Vec::with_capacity( images.len());
        for img in &images {
            if let Some(obs) = policy.apply( thermal_observation( img, job))?.flatten() {
                observations.push( obs);
            }
        }

        let scores = baseline.score_all( &observations);
        debug!("scored {} of {} thermal scenes", scores.len(), images.len());
        Ok( (scores, baseline.delta_t_threshold().copied()) )
    }
}

fn check_scales (config: &ScanConfig)->Result<()> {
    if let Some(job) = &config.detections {
        for src in &job.sources { src.scale.check()? }
    }
    if let Some(job) = &config.daily { job.detection.scale.check()? }
    if let Some(burn) = &config.burn { burn.scale.check()? }
    Ok(())
}

/// convenience wrapper for a single scan run
pub async fn run_scan (config: &ScanConfig, source: Arc<dyn DataSource>)->Result<ScanReport> {
    Scan::new( config.clone())?.run( source).await
}

fn read_training (job: &ThermalJob)->Result<Vec<ThermalObservation>> {
    let mut rdr = csv::Reader::from_reader( File::open( &job.training)?);
    let mut rows = Vec::new();
    for rec in rdr.deserialize() {
        rows.push( rec?);
    }
    info!("{} thermal training observations from {:?}", rows.len(), job.training);
    Ok( rows )
}

/// None if the scene has no valid thermal pixels. LST values are converted with the scaling and
/// offset of `job` before any statistic is computed. The air temperature comes from the optional
/// `air_tmax` image property
pub fn thermal_observation (img: &ImageRecord, job: &ThermalJob)->Result<Option<ThermalObservation>> {
    let lst = img.band( &job.lst_band)?;
    let cloud = match &job.cloud_band {
        Some(name) => Some( img.band( name)?),
        None => None
    };

    let mut values: Vec<f64> = valid_thermal_values( lst, cloud, job.nodata).into_iter().map( |v| job.physical( v)).collect();
    values.sort_by( |a,b| a.total_cmp(b));
    let (Some(p95), Some(p50)) = (percentile( &values, 95.0), percentile( &values, 50.0)) else {
        debug!("no valid thermal pixels in {}", img.id);
        return Ok(None)
    };

    let air_tmax = img.properties.get( "air_tmax").and_then( |s| s.parse::<f64>().ok());

    Ok( Some( ThermalObservation {
        scene: img.id.clone(),
        group: job.group.clone(),
        time: img.time,
        spread: p95 - p50,
        lst_max: values.last().copied(),
        lst_mean: Some( values.iter().sum::<f64>() / values.len() as f64),
        air_tmax
    }))
}
