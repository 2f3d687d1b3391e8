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

use crate::{define_error,map_to_opaque_error};

pub type Result<T> = std::result::Result<T, CommonError>;

define_error!{ pub CommonError =
    InvalidCoordinate(String) : "invalid coordinate: {0}",
    InvalidGeometry(String) : "invalid geometry: {0}",
    InvalidWindow(String) : "invalid time window: {0}",
    ParseError(String) : "parse error: {0}"
}

map_to_opaque_error!( chrono::ParseError => CommonError::ParseError);
map_to_opaque_error!( parse_duration::parse::Error => CommonError::ParseError);
