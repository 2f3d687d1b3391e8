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

mod common;

use std::fs;
use chrono::NaiveDate;
use firescan::weather::{detect_heatwave, read_daily_tmax, Climatology, DailyTmax, HeatwaveCheck};
use common::*;

fn date (y: i32, m: u32, d: u32)->NaiveDate { NaiveDate::from_ymd_opt( y, m, d).unwrap() }

/// ten Julys of 20..29°C daily maxima plus a hot June day that is not part of the climatology
fn baseline_series ()->Vec<DailyTmax> {
    let mut series = Vec::new();
    for year in 2014..2024 {
        series.push( DailyTmax::new( date( year, 6, 30), Some(40.0)));
        for day in 1..=31 {
            series.push( DailyTmax::new( date( year, 7, day), Some( 20.0 + ((day - 1) % 10) as f64)));
        }
    }
    series
}

/// July 2024 at 25°C with the given (day,tmax) overrides
fn july_2024 (hot: &[(u32,Option<f64>)])->Vec<DailyTmax> {
    (1..=31).map( |day| {
        let t = hot.iter().find( |(d,_)| *d == day).map_or( Some(25.0), |(_,t)| *t);
        DailyTmax::new( date( 2024, 7, day), t)
    }).collect()
}

fn check ()->HeatwaveCheck {
    HeatwaveCheck::new( "weather.csv", window( "2014-01-01", "2024-01-01"))
}

#[test]
fn test_climatology () {
    let series = baseline_series();
    let c = Climatology::from_series( &series, &window( "2014-01-01", "2024-01-01"), 7, 95.0).unwrap();
    println!("{:?}", c);
    assert_eq!( c.n, 310);
    assert_eq!( c.threshold, 29.0);
    assert!( (c.mean - 24.3548).abs() < 1e-3);

    // no July inside of the baseline
    assert!( Climatology::from_series( &series, &window( "2014-01-01", "2014-07-01"), 7, 95.0).is_none());
}

#[test]
fn test_heatwave () {
    let mut series = baseline_series();
    series.extend( july_2024( &[(1,Some(29.0)), (10,Some(31.0)), (11,Some(32.0)), (12,Some(33.0)), (20,Some(30.0)), (21,Some(31.0))]));

    let report = detect_heatwave( &series, &window( "2024-07-01", "2024-08-01"), &check());
    for d in report.days.iter().filter( |d| d.above) { println!("{} {:?} run {} -> {}", d.date, d.air_tmax, d.run_len, d.heatwave) }

    assert_eq!( report.days.len(), 31);
    assert_eq!( report.max_run, 3);
    assert!( report.detected);
    assert_eq!( report.period(), Some((date( 2024, 7, 10), date( 2024, 7, 12))));

    let d11 = &report.days[10];
    assert_eq!( (d11.run_len, d11.heatwave), (3, true));
    assert!( (d11.anomaly.unwrap() - (32.0 - 24.3548)).abs() < 1e-3);

    // two days are not enough
    let d20 = &report.days[19];
    assert!( d20.above && !d20.heatwave);
    assert_eq!( d20.run_len, 2);

    // 29.0 equals the threshold and is not above it
    assert!( !report.days[0].above);
}

#[test]
fn test_broken_runs () {
    let mut series = baseline_series();
    let mut july = july_2024( &[(5,Some(33.0)), (6,None), (7,Some(33.0)), (8,Some(33.0)), (20,Some(33.0)), (21,Some(33.0)), (23,Some(33.0))]);
    july.retain( |d| d.date != date( 2024, 7, 22));
    series.extend( july);

    // a missing value on the 6th and a missing day on the 22nd break the runs
    let report = detect_heatwave( &series, &window( "2024-07-01", "2024-08-01"), &check());
    assert_eq!( report.max_run, 2);
    assert!( !report.detected);
    assert!( report.period().is_none());

    // shorter heatwaves can be configured
    let two_days = HeatwaveCheck { min_days: 2, ..check() };
    let report = detect_heatwave( &series, &window( "2024-07-01", "2024-08-01"), &two_days);
    assert!( report.detected);
    assert_eq!( report.period(), Some((date( 2024, 7, 7), date( 2024, 7, 21))));
}

#[test]
fn test_no_climatology () {
    let series = july_2024( &[(10,Some(45.0)), (11,Some(45.0)), (12,Some(45.0))]);
    let report = detect_heatwave( &series, &window( "2024-07-01", "2024-08-01"), &check());

    assert!( report.climatology.is_none());
    assert_eq!( report.days.len(), 31);
    assert!( report.days.iter().all( |d| !d.above && d.anomaly.is_none()));
    assert!( !report.detected);
}

#[test]
fn test_read_weather () {
    let dir = scratch_dir( "weather");
    fs::create_dir_all( &dir).unwrap();
    let path = dir.join( "weather.csv");
    fs::write( &path, "date,air_tmax\n2024-07-01,31.5\n2024-07-02,\n").unwrap();

    let series = read_daily_tmax( &path).unwrap();
    assert_eq!( series, vec![ DailyTmax::new( date( 2024, 7, 1), Some(31.5)), DailyTmax::new( date( 2024, 7, 2), None)]);
    let _ = fs::remove_dir_all( &dir);
}
