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

use std::fmt;
use std::time::Duration;
use chrono::{DateTime, Days, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Serialize, Deserialize, Serializer, Deserializer};
use parse_duration::parse;

use crate::errors::{CommonError, Result};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const MINUTE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// something that has a capture/acquisition time
pub trait Dated {
    fn date (&self)->DateTime<Utc>;
}

impl<Tz:TimeZone> Dated for DateTime<Tz> {
    fn date (&self)->DateTime<Utc> { self.to_utc() }
}

/* #region TimeWindow *********************************************************************************************/

/// a half-open interval of calendar days `[start, end)` in UTC
#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,Serialize,Deserialize)]
#[serde(try_from="WindowSpec", into="WindowSpec")]
pub struct TimeWindow {
    start: NaiveDate,
    end: NaiveDate
}

impl TimeWindow {
    /// `start == end` is a valid (empty) window, `start > end` is not
    pub fn new (start: NaiveDate, end: NaiveDate)->Result<Self> {
        if start <= end {
            Ok( TimeWindow{start,end} )
        } else {
            Err( CommonError::InvalidWindow( format!("start {start} is after end {end}")))
        }
    }

    /// parse from "YYYY-MM-DD" date strings
    pub fn parse (start: &str, end: &str)->Result<Self> {
        let start = NaiveDate::parse_from_str( start, DATE_FORMAT)?;
        let end = NaiveDate::parse_from_str( end, DATE_FORMAT)?;
        Self::new( start, end)
    }

    /// the window covering just `date`
    pub fn single_day (date: NaiveDate)->Result<Self> {
        let end = date.checked_add_days( Days::new(1))
            .ok_or_else( || CommonError::InvalidWindow( format!("no day after {date}")))?;
        Self::new( date, end)
    }

    pub fn start (&self)->NaiveDate { self.start }
    pub fn end (&self)->NaiveDate { self.end }

    pub fn start_time (&self)->DateTime<Utc> { day_start( self.start) }
    pub fn end_time (&self)->DateTime<Utc> { day_start( self.end) }

    pub fn is_empty (&self)->bool { self.start == self.end }

    pub fn num_days (&self)->u64 { (self.end - self.start).num_days().max(0) as u64 }

    pub fn contains (&self, t: &DateTime<Utc>)->bool {
        *t >= self.start_time() && *t < self.end_time()
    }

    pub fn contains_date (&self, date: NaiveDate)->bool {
        date >= self.start && date < self.end
    }

    pub fn overlaps (&self, other: &TimeWindow)->bool {
        !self.is_empty() && !other.is_empty() && self.start < other.end && other.start < self.end
    }

    /// all calendar days of the window in ascending order
    pub fn days (&self)->impl Iterator<Item=NaiveDate> + use<> {
        let end = self.end;
        self.start.iter_days().take_while( move |d| *d < end)
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start.format(DATE_FORMAT), self.end.format(DATE_FORMAT))
    }
}

#[derive(Serialize,Deserialize)]
struct WindowSpec { start: NaiveDate, end: NaiveDate }

impl TryFrom<WindowSpec> for TimeWindow {
    type Error = CommonError;
    fn try_from (w: WindowSpec)->Result<Self> { TimeWindow::new( w.start, w.end) }
}

impl From<TimeWindow> for WindowSpec {
    fn from (w: TimeWindow)->Self { WindowSpec { start: w.start, end: w.end } }
}

/* #endregion TimeWindow */

pub fn day_start (date: NaiveDate)->DateTime<Utc> {
    Utc.from_utc_datetime( &date.and_time( NaiveTime::MIN))
}

/// the "YYYY-MM-DD HH:mm" timestamp used for tagging detections
pub fn format_minute (t: &DateTime<Utc>)->String {
    t.format( MINUTE_FORMAT).to_string()
}

pub fn format_date (t: &DateTime<Utc>)->String {
    t.format( DATE_FORMAT).to_string()
}

pub fn parse_minute (s: &str)->Result<DateTime<Utc>> {
    let ndt = chrono::NaiveDateTime::parse_from_str( s, MINUTE_FORMAT)?;
    Ok( Utc.from_utc_datetime( &ndt))
}

/* #region serde helpers for durations ****************************************************************************/

pub fn deserialize_duration <'a,D>(deserializer: D) -> std::result::Result<Duration,D::Error>
    where D: Deserializer<'a>
{
    String::deserialize(deserializer).and_then( |string| {
        parse(string.as_str())
            .map_err( |e| serde::de::Error::custom(format!("{:?}",e)))
    })
}

pub fn deserialize_optional_duration <'a,D>(deserializer: D) -> std::result::Result<Option<Duration>,D::Error>
    where D: Deserializer<'a>
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) => parse(s.as_str()).map( Some).map_err( |e| serde::de::Error::custom(format!("{:?}",e))),
        None => Ok(None)
    }
}

pub fn serialize_duration<S: Serializer> (dur: &Duration, s: S) -> std::result::Result<S::Ok, S::Error>  {
    s.serialize_str( &format!("{:?}", dur))
}

pub fn serialize_optional_duration<S: Serializer> (dur: &Option<Duration>, s: S) -> std::result::Result<S::Ok, S::Error> {
    match dur {
        Some(d) => s.serialize_some( &format!("{:?}", d)),
        None => s.serialize_none()
    }
}

/* #endregion serde helpers */
