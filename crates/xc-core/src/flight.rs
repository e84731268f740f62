// SPDX-License-Identifier: MIT

use crate::geo;
use crate::manufacturer::{self, Manufacturer};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fix validity flag of a B record: `A` for a 3D fix, `V` for 2D or no fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FixValidity {
    Valid,
    Guessed,
}

impl FixValidity {
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            b'A' => Some(FixValidity::Valid),
            b'V' => Some(FixValidity::Guessed),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            FixValidity::Valid => 'A',
            FixValidity::Guessed => 'V',
        }
    }
}

/// A single position in a flight: either a GPS fix from a B record or a
/// declared task waypoint.
///
/// Waypoints only carry latitude, longitude and description; `time` and
/// `fix_validity` stay `None` for them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub time: Option<NaiveTime>,
    pub latitude: f64,
    pub longitude: f64,
    pub fix_validity: Option<FixValidity>,
    pub pressure_altitude: i64,
    pub gnss_altitude: i64,
    /// Extension fields declared by the I record, keyed by three-letter code.
    pub extensions: BTreeMap<String, String>,
    pub num_satellites: usize,
    pub description: String,
}

impl Point {
    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            ..Default::default()
        }
    }

    /// Great-circle distance to `other`, in meters.
    pub fn distance_to(&self, other: &Point) -> f64 {
        geo::gc_distance(self.latitude, self.longitude, other.latitude, other.longitude)
    }

    pub fn bearing_to(&self, other: &Point) -> f64 {
        geo::bearing(self.latitude, self.longitude, other.latitude, other.longitude)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub manufacturer: String,
    pub unique_id: String,
    pub additional_data: String,
    pub date: Option<NaiveDate>,
    pub fix_accuracy: Option<i64>,
    pub pilot: Option<String>,
    pub crew: Option<String>,
    pub glider_type: Option<String>,
    pub glider_id: Option<String>,
    pub gps_datum: Option<String>,
    pub firmware_version: Option<String>,
    pub hardware_version: Option<String>,
    pub flight_recorder: Option<String>,
    pub gps: Option<String>,
    pub pressure_sensor: Option<String>,
    pub competition_id: Option<String>,
    pub competition_class: Option<String>,
}

impl Header {
    /// Looks up the recorder manufacturer declared in the A record.
    pub fn manufacturer_info(&self) -> Option<&'static Manufacturer> {
        manufacturer::lookup(&self.manufacturer)
    }
}

/// Flight plan declared before takeoff (C records).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub declaration_date: Option<NaiveDateTime>,
    pub flight_date: Option<NaiveDate>,
    pub number: u32,
    pub takeoff: Point,
    pub start: Point,
    pub turnpoints: Vec<Point>,
    pub finish: Point,
    pub landing: Point,
    pub description: String,
}

/// Logbook or comment entry (L record).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub code: String,
    pub text: String,
}

/// Everything recovered from one IGC log.
///
/// `points` keeps file order; the format does not guarantee increasing
/// timestamps and none is enforced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    pub header: Header,
    pub points: Vec<Point>,
    /// K record extension data, keyed by time then three-letter code.
    pub k_records: BTreeMap<NaiveTime, BTreeMap<String, String>>,
    /// E record events, keyed by time then event code.
    pub events: BTreeMap<NaiveTime, BTreeMap<String, String>>,
    /// Satellite ids in view per F record time.
    pub satellites: BTreeMap<NaiveTime, Vec<u32>>,
    pub logbook: Vec<LogEntry>,
    pub task: Option<Task>,
    pub dgps_station_id: Option<String>,
    /// Concatenated payload of all G records, in file order.
    pub signature: String,
}

impl Flight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Combines the declared flight date with a fix's time of day.
    pub fn fix_datetime(&self, point: &Point) -> Option<NaiveDateTime> {
        Some(self.header.date?.and_time(point.time?))
    }
}
