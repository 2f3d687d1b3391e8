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

//! extreme value tail models. Values above a body percentile are modeled as a generalized Pareto
//! distribution (peaks over threshold), which gives extreme quantiles that do not depend on a
//! handful of observed maxima. Also the parametric (lognormal) and empirical 99th percentile
//! thresholds of positive temperature differences

use serde::{Serialize,Deserialize};
use tracing::debug;
use crate::scene::percentile;

pub const DEFAULT_P_BODY: f64 = 0.95;
pub const DEFAULT_TARGET_QUANTILE: f64 = 0.99;
pub const DEFAULT_MIN_EXCEEDANCES: usize = 30;

/// standard normal quantile of 0.99
pub const Z_99: f64 = 2.326_347_874_040_840_8;

/// shapes below this are treated as exponential tails
const EXPONENTIAL_SHAPE: f64 = 1e-6;

const N_NEGATIVE: usize = 50;
const N_POSITIVE: usize = 100;
const GOLDEN_ITERATIONS: usize = 60;

/* #region generalized Pareto ************************************************************************************/

/// generalized Pareto distribution with location 0: `F(y) = 1 - (1 + shape*y/scale)^(-1/shape)`
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct Gpd {
    pub shape: f64,
    pub scale: f64,
}

impl Gpd {
    /// maximum likelihood fit to positive exceedances. Uses the profile likelihood over
    /// `theta = shape/scale`, which reduces the fit to a one dimensional search. Shapes below -1
    /// have no regular maximum and are not considered. None if there are less than two usable values
    pub fn fit (exceedances: &[f64])->Option<Gpd> {
        let ys: Vec<f64> = exceedances.iter().copied().filter( |y| y.is_finite() && *y > 0.0).collect();
        if ys.len() < 2 { return None }

        let n = ys.len() as f64;
        let mean = ys.iter().sum::<f64>() / n;
        let max = ys.iter().copied().fold( 0.0, f64::max);
        let profile = Profile { ys: &ys, n, mean, max };

        let grid = profile.theta_grid();
        let mut best: Option<(usize,Gpd,f64)> = None;
        for (i,theta) in grid.iter().enumerate() {
            if let Some((gpd,l)) = profile.eval( *theta) {
                if best.is_none_or( |(_,_,lb)| l > lb) { best = Some( (i,gpd,l)) }
            }
        }
        let (i,gpd,l) = best?;

        // refine between the grid neighbours of the best candidate
        let lo = grid[i.saturating_sub(1)];
        let hi = grid[(i+1).min( grid.len()-1)];
        let theta = golden_section_max( lo, hi, |t| profile.eval( t).map_or( f64::NEG_INFINITY, |(_,l)| l));

        match profile.eval( theta) {
            Some((refined,lr)) if lr >= l => Some( refined),
            _ => Some( gpd)
        }
    }

    /// the `p` quantile of the exceedance
    pub fn quantile (&self, p: f64)->f64 {
        if self.shape.abs() < EXPONENTIAL_SHAPE {
            -self.scale * (1.0 - p).ln()
        } else {
            (self.scale / self.shape) * ((1.0 - p).powf( -self.shape) - 1.0)
        }
    }
}

/// profile log likelihood of a GPD sample
struct Profile<'a> {
    ys: &'a [f64],
    n: f64,
    mean: f64,
    max: f64,
}

impl<'a> Profile<'a> {
    /// the maximizing GPD for a given `theta` and its log likelihood. None outside of the support
    fn eval (&self, theta: f64)->Option<(Gpd,f64)> {
        if (theta * self.max).abs() < 1e-9 {
            let gpd = Gpd { shape: 0.0, scale: self.mean };
            return Some( (gpd, -self.n * self.mean.ln() - self.n))
        }
        if 1.0 + theta * self.max <= 0.0 { return None }

        let shape = self.ys.iter().map( |y| (theta * y).ln_1p()).sum::<f64>() / self.n;
        let scale = shape / theta;
        if shape < -1.0 || !(scale > 0.0) { return None }

        Some( (Gpd { shape, scale }, -self.n * scale.ln() - self.n * (1.0 + shape)) )
    }

    /// ascending candidates from just above the lower support bound `-1/max` to large positive values
    fn theta_grid (&self)->Vec<f64> {
        let mut grid = Vec::with_capacity( N_NEGATIVE + N_POSITIVE);
        for j in (1..N_NEGATIVE).rev() {
            grid.push( -(j as f64 / N_NEGATIVE as f64) / self.max);
        }
        grid.push( 0.0);
        for j in 0..N_POSITIVE {
            let e = -3.0 + 6.0 * j as f64 / (N_POSITIVE - 1) as f64;
            grid.push( 10f64.powf( e) / self.mean);
        }
        grid
    }
}

fn golden_section_max<F> (mut a: f64, mut b: f64, f: F)->f64 where F: Fn(f64)->f64 {
    let g = (5f64.sqrt() - 1.0) / 2.0;
    let mut c = b - g * (b - a);
    let mut d = a + g * (b - a);
    let (mut fc, mut fd) = (f(c), f(d));

    for _ in 0..GOLDEN_ITERATIONS {
        if fc > fd {
            b = d; d = c; fd = fc;
            c = b - g * (b - a); fc = f(c);
        } else {
            a = c; c = d; fc = fd;
            d = a + g * (b - a); fd = f(d);
        }
    }
    (a + b) / 2.0
}

/* #endregion generalized Pareto */

/* #region tail quantile *****************************************************************************************/

/// parameters of a peaks-over-threshold tail estimate
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct TailConfig {
    /// quantile that separates body and tail
    #[serde(default="default_p_body")]
    pub p_body: f64,
    /// the quantile to estimate, has to be above `p_body`
    #[serde(default="default_target")]
    pub target: f64,
    /// below this number of exceedances there is no estimate
    #[serde(default="default_min_exceedances")]
    pub min_exceedances: usize,
}

fn default_p_body ()->f64 { DEFAULT_P_BODY }
fn default_target ()->f64 { DEFAULT_TARGET_QUANTILE }
fn default_min_exceedances ()->usize { DEFAULT_MIN_EXCEEDANCES }

impl Default for TailConfig {
    fn default ()->Self {
        TailConfig { p_body: DEFAULT_P_BODY, target: DEFAULT_TARGET_QUANTILE, min_exceedances: DEFAULT_MIN_EXCEEDANCES }
    }
}

/// an extreme quantile estimated from the GPD of the values above the body quantile
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct TailQuantile {
    /// the body quantile (threshold of the exceedances)
    pub body: f64,
    /// the estimated target quantile
    pub quantile: f64,
    pub exceedances: usize,
    pub gpd: Gpd,
}

impl TailQuantile {
    /// None if there are not enough exceedances or the fit fails
    pub fn fit (values: &[f64], config: &TailConfig)->Option<Self> {
        if !(config.p_body < config.target && config.target < 1.0) { return None }

        let mut vs: Vec<f64> = values.iter().copied().filter( |v| v.is_finite()).collect();
        vs.sort_by( |a,b| a.total_cmp(b));
        let body = percentile( &vs, config.p_body * 100.0)?;

        let exc: Vec<f64> = vs.iter().filter( |v| **v > body).map( |v| v - body).collect();
        if exc.len() < config.min_exceedances {
            debug!("only {} exceedances over {:.3}, no tail estimate", exc.len(), body);
            return None
        }

        let gpd = Gpd::fit( &exc)?;
        let p = (config.target - config.p_body) / (1.0 - config.p_body);
        let quantile = body + gpd.quantile( p);
        quantile.is_finite().then_some( TailQuantile { body, quantile, exceedances: exc.len(), gpd })
    }

    pub fn exceeds (&self, x: f64)->bool { x > self.quantile }
}

/* #endregion tail quantile */

/* #region 99th percentile threshold *****************************************************************************/

#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize,Deserialize)]
pub enum ThresholdMethod {
    /// 99th percentile of a lognormal fitted to the positive values
    Lognormal99,
    /// 99th percentile of the values
    Empirical99,
    /// configured value
    Override,
}

#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct Threshold99 {
    pub value: f64,
    pub method: ThresholdMethod,
}

/// minimum number of positive values for a lognormal fit
pub const MIN_LOGNORMAL_VALUES: usize = 5;

impl Threshold99 {
    /// the lognormal 99th percentile if there are at least [`MIN_LOGNORMAL_VALUES`] positive
    /// values with non-degenerate spread, the empirical 99th percentile otherwise. None if there
    /// are no finite values at all
    pub fn from_values (values: &[f64])->Option<Self> {
        let mut vs: Vec<f64> = values.iter().copied().filter( |v| v.is_finite()).collect();
        vs.sort_by( |a,b| a.total_cmp(b));
        let empirical = Threshold99 { value: percentile( &vs, 99.0)?, method: ThresholdMethod::Empirical99 };

        let logs: Vec<f64> = vs.iter().filter( |v| **v > 0.0).map( |v| v.ln()).collect();
        if logs.len() < MIN_LOGNORMAL_VALUES { return Some( empirical) }

        let n = logs.len() as f64;
        let mu = logs.iter().sum::<f64>() / n;
        let sigma = (logs.iter().map( |l| (l - mu).powi(2)).sum::<f64>() / n).sqrt();
        if !sigma.is_finite() || sigma <= 1e-12 { return Some( empirical) }

        let value = (mu + sigma * Z_99).exp();
        if value.is_finite() {
            Some( Threshold99 { value, method: ThresholdMethod::Lognormal99 })
        } else {
            Some( empirical)
        }
    }

    pub fn fixed (value: f64)->Self { Threshold99 { value, method: ThresholdMethod::Override } }

    pub fn exceeds (&self, x: f64)->bool { x > self.value }
}

/* #endregion 99th percentile threshold */
