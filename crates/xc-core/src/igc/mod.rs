// SPDX-License-Identifier: MIT

//! IGC flight recorder log parsing.
//!
//! Each line is a record whose type is its first character. Records are
//! fixed-column, and some of them change how later ones are read: I and J
//! declare extension columns for B and K records, F sets the satellite count
//! stamped on following fixes, and the first complete C block is the task.

mod error;

pub use error::{ErrorKind, IgcError, ParseError, RecordError};

use crate::flight::{FixValidity, Flight, Header, LogEntry, Point, Task};
use crate::geo;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use log::{debug, warn};
use std::fs;
use std::path::Path;
use std::slice::SliceIndex;
use std::str::FromStr;

/// chrono format of IGC times (HHMMSS).
pub const TIME_FORMAT: &str = "%H%M%S";
/// chrono format of IGC dates (DDMMYY).
pub const DATE_FORMAT: &str = "%d%m%y";

const B_MIN_LEN: usize = 37;
const C_MIN_LEN: usize = 25;
const TASK_POINT_MIN_LEN: usize = 18;

pub struct IgcParser;

impl IgcParser {
    /// Reads and parses an IGC file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Flight, IgcError> {
        let content = fs::read_to_string(path)?;
        Ok(Self::parse(&content)?)
    }

    /// Parses the full text of one IGC log.
    ///
    /// Stops at the first record that fails; the returned [`ParseError`]
    /// carries the flight built up to that line. Blank lines and unknown
    /// record types are skipped.
    pub fn parse(content: &str) -> Result<Flight, ParseError> {
        let lines: Vec<&str> = content.lines().collect();
        let mut state = ParseState::default();
        let mut flight = Flight::new();

        for (idx, raw) in lines.iter().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            let result = match line.as_bytes()[0] {
                b'A' => parse_a(line, &mut flight.header),
                b'B' => state.parse_b(line, &mut flight),
                b'C' if state.task_done => Ok(()),
                b'C' => state.parse_c(&lines[idx..], &mut flight),
                b'D' => parse_d(line, &mut flight),
                b'E' => parse_e(line, &mut flight),
                b'F' => state.parse_f(line, &mut flight),
                b'G' => {
                    flight.signature.push_str(&line[1..]);
                    Ok(())
                }
                b'H' => parse_h(line, &mut flight.header),
                b'I' => parse_extensions(line, 'I').map(|fields| state.i_fields = fields),
                b'J' => parse_extensions(line, 'J').map(|fields| state.j_fields = fields),
                b'K' => state.parse_k(line, &mut flight),
                b'L' => parse_l(line, &mut flight),
                _ => {
                    debug!("Ignoring unrecognised record — line={} record={}", idx + 1, line);
                    Ok(())
                }
            };

            if let Err(source) = result {
                return Err(ParseError::new(idx + 1, source, flight));
            }
        }

        if !flight.header.manufacturer.is_empty() && flight.header.manufacturer_info().is_none() {
            warn!(
                "Unknown recorder manufacturer — code={}",
                flight.header.manufacturer
            );
        }

        debug!(
            "Parsed IGC log — points={} events={} k_records={} task={}",
            flight.points.len(),
            flight.events.len(),
            flight.k_records.len(),
            flight.task.is_some()
        );
        Ok(flight)
    }
}

/// Column layout of one extension field declared by an I or J record.
/// Columns are 1-based and inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ExtensionField {
    start: usize,
    end: usize,
    code: String,
}

impl ExtensionField {
    fn slice<'a>(&self, line: &'a str) -> Result<&'a str, RecordError> {
        if self.end > line.len() {
            return Err(RecordError::ExtensionOutOfRange {
                code: self.code.clone(),
                start: self.start,
                end: self.end,
                line: line.to_string(),
            });
        }
        field(line, self.start - 1..self.end)
    }
}

/// State carried between records of a single parse.
#[derive(Debug, Default)]
struct ParseState {
    i_fields: Vec<ExtensionField>,
    j_fields: Vec<ExtensionField>,
    task_done: bool,
    num_satellites: usize,
}

impl ParseState {
    fn parse_b(&self, line: &str, flight: &mut Flight) -> Result<(), RecordError> {
        require_len(line, 'B', B_MIN_LEN)?;

        let time = parse_time(field(line, 1..7)?)?;
        let latitude = parse_coordinate(field(line, 7..15)?)?;
        let longitude = parse_coordinate(field(line, 15..24)?)?;
        let validity = line.as_bytes()[24];
        let fix_validity = FixValidity::from_byte(validity)
            .ok_or(RecordError::InvalidFixValidity(validity as char))?;
        let pressure_altitude = parse_number(field(line, 25..30)?, "pressure altitude")?;
        let gnss_altitude = parse_number(field(line, 30..35)?, "GNSS altitude")?;

        let mut point = Point {
            time: Some(time),
            latitude,
            longitude,
            fix_validity: Some(fix_validity),
            pressure_altitude,
            gnss_altitude,
            num_satellites: self.num_satellites,
            ..Default::default()
        };
        for ext in &self.i_fields {
            point
                .extensions
                .insert(ext.code.clone(), ext.slice(line)?.to_string());
        }

        flight.points.push(point);
        Ok(())
    }

    /// `lines` starts at the C header and runs to the end of the input.
    fn parse_c(&mut self, lines: &[&str], flight: &mut Flight) -> Result<(), RecordError> {
        let line = lines[0].trim();
        require_len(line, 'C', C_MIN_LEN)?;

        let n_tp: usize = parse_number(field(line, 23..25)?, "turnpoint count")?;
        let expected = n_tp + 5;
        if lines.len() < expected {
            return Err(RecordError::MissingTaskLines {
                expected,
                available: lines.len(),
            });
        }

        let declared = field(line, 1..13)?;
        let declaration_date = match parse_datetime(declared) {
            Ok(dt) => Some(dt),
            Err(_) => {
                warn!("Unparseable task declaration date — value={}", declared);
                None
            }
        };
        let flight_day = field(line, 13..19)?;
        let flight_date = match parse_date(flight_day) {
            Ok(d) => Some(d),
            Err(_) => {
                warn!("Unparseable task flight date — value={}", flight_day);
                None
            }
        };
        let number = parse_number(field(line, 19..23)?, "task number")?;
        let description = field(line, 25..)?.to_string();

        let takeoff = parse_task_point(lines[1])?;
        let start = parse_task_point(lines[2])?;
        let turnpoints = lines[3..3 + n_tp]
            .iter()
            .map(|l| parse_task_point(l))
            .collect::<Result<Vec<_>, _>>()?;
        let finish = parse_task_point(lines[3 + n_tp])?;
        let landing = parse_task_point(lines[4 + n_tp])?;

        flight.task = Some(Task {
            declaration_date,
            flight_date,
            number,
            takeoff,
            start,
            turnpoints,
            finish,
            landing,
            description,
        });
        self.task_done = true;
        Ok(())
    }

    fn parse_f(&mut self, line: &str, flight: &mut Flight) -> Result<(), RecordError> {
        require_len(line, 'F', 7)?;
        let time = parse_time(field(line, 1..7)?)?;

        let mut ids = Vec::with_capacity((line.len() - 7) / 2);
        let mut i = 7;
        while i + 2 <= line.len() {
            ids.push(parse_number::<u32>(field(line, i..i + 2)?, "satellite id")?);
            i += 2;
        }

        let in_view = flight.satellites.entry(time).or_default();
        in_view.extend(ids);
        self.num_satellites = in_view.len();
        Ok(())
    }

    fn parse_k(&self, line: &str, flight: &mut Flight) -> Result<(), RecordError> {
        require_len(line, 'K', 7)?;
        let time = parse_time(field(line, 1..7)?)?;

        let fields = self
            .j_fields
            .iter()
            .map(|ext| -> Result<(String, String), RecordError> {
                Ok((ext.code.clone(), ext.slice(line)?.to_string()))
            })
            .collect::<Result<_, _>>()?;
        flight.k_records.insert(time, fields);
        Ok(())
    }
}

fn parse_a(line: &str, header: &mut Header) -> Result<(), RecordError> {
    require_len(line, 'A', 7)?;
    let manufacturer = field(line, 1..4)?;
    let unique_id = field(line, 4..7)?;
    let additional_data = field(line, 7..)?;

    header.manufacturer = manufacturer.to_string();
    header.unique_id = unique_id.to_string();
    header.additional_data = additional_data.to_string();
    Ok(())
}

fn parse_d(line: &str, flight: &mut Flight) -> Result<(), RecordError> {
    require_len(line, 'D', 6)?;
    if line.as_bytes()[1] == b'2' {
        flight.dgps_station_id = Some(field(line, 2..6)?.to_string());
    }
    Ok(())
}

fn parse_e(line: &str, flight: &mut Flight) -> Result<(), RecordError> {
    require_len(line, 'E', 10)?;
    let time = parse_time(field(line, 1..7)?)?;
    let code = field(line, 7..10)?;
    let text = field(line, 10..)?;

    flight
        .events
        .entry(time)
        .or_default()
        .insert(code.to_string(), text.to_string());
    Ok(())
}

fn parse_h(line: &str, header: &mut Header) -> Result<(), RecordError> {
    require_len(line, 'H', 5)?;
    let text = || -> Result<Option<String>, RecordError> { Ok(Some(field(line, 5..)?.to_string())) };

    match field(line, 2..5)? {
        "DTE" => {
            require_len(line, 'H', 11)?;
            header.date = Some(parse_date(field(line, 5..11)?)?);
        }
        "FXA" => {
            require_len(line, 'H', 8)?;
            header.fix_accuracy = Some(parse_number(field(line, 5..8)?, "fix accuracy")?);
        }
        "DTM" => {
            require_len(line, 'H', 8)?;
            header.gps_datum = Some(field(line, 5..8)?.to_string());
        }
        "PLT" => header.pilot = text()?,
        "CM2" => header.crew = text()?,
        "GTY" => header.glider_type = text()?,
        "GID" => header.glider_id = text()?,
        "RFW" => header.firmware_version = text()?,
        "RHW" => header.hardware_version = text()?,
        "FTY" => header.flight_recorder = text()?,
        "GPS" => header.gps = text()?,
        "PRS" => header.pressure_sensor = text()?,
        "CID" => header.competition_id = text()?,
        "CCL" => header.competition_class = text()?,
        other => return Err(RecordError::UnknownHeaderField(other.to_string())),
    }
    Ok(())
}

/// Parses an I or J declaration into its extension column layouts.
fn parse_extensions(line: &str, record: char) -> Result<Vec<ExtensionField>, RecordError> {
    require_len(line, record, 3)?;
    let count: usize = parse_number(field(line, 1..3)?, "extension count")?;
    if line.len() != count * 7 + 3 {
        return Err(RecordError::WrongLineSize {
            record,
            count,
            len: line.len(),
            line: line.to_string(),
        });
    }

    (0..count)
        .map(|i| -> Result<ExtensionField, RecordError> {
            let s = 3 + i * 7;
            let group = field(line, s..s + 7)?;
            let start: usize = parse_number(field(group, 0..2)?, "extension start column")?;
            let end: usize = parse_number(field(group, 2..4)?, "extension end column")?;
            if start == 0 || end < start {
                return Err(RecordError::InvalidExtension(group.to_string()));
            }
            Ok(ExtensionField {
                start,
                end,
                code: field(group, 4..7)?.to_string(),
            })
        })
        .collect()
}

fn parse_l(line: &str, flight: &mut Flight) -> Result<(), RecordError> {
    require_len(line, 'L', 4)?;
    let code = field(line, 1..4)?;
    let text = field(line, 4..)?;

    flight.logbook.push(LogEntry {
        code: code.to_string(),
        text: text.to_string(),
    });
    Ok(())
}

/// One waypoint line of a C block: latitude, longitude, description.
fn parse_task_point(raw: &str) -> Result<Point, RecordError> {
    let line = raw.trim();
    require_len(line, 'C', TASK_POINT_MIN_LEN)?;
    Ok(Point {
        latitude: parse_coordinate(field(line, 1..9)?)?,
        longitude: parse_coordinate(field(line, 9..18)?)?,
        description: field(line, 18..)?.to_string(),
        ..Default::default()
    })
}

fn require_len(line: &str, record: char, min: usize) -> Result<(), RecordError> {
    if line.len() < min {
        return Err(RecordError::LineTooShort {
            record,
            min,
            len: line.len(),
            line: line.to_string(),
        });
    }
    Ok(())
}

/// Byte-column slice that fails instead of panicking on a char boundary.
fn field<I>(line: &str, range: I) -> Result<&str, RecordError>
where
    I: SliceIndex<str, Output = str>,
{
    line.get(range)
        .ok_or_else(|| RecordError::Misaligned(line.to_string()))
}

fn parse_number<T: FromStr>(value: &str, name: &'static str) -> Result<T, RecordError> {
    value.parse().map_err(|_| RecordError::InvalidNumber {
        field: name,
        value: value.to_string(),
    })
}

fn parse_coordinate(value: &str) -> Result<f64, RecordError> {
    geo::dmd_to_decimal(value).ok_or_else(|| RecordError::InvalidCoordinate(value.to_string()))
}

fn all_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|b| b.is_ascii_digit())
}

fn parse_time(value: &str) -> Result<NaiveTime, RecordError> {
    let invalid = || RecordError::InvalidTime(value.to_string());
    if !all_digits(value, 6) {
        return Err(invalid());
    }
    NaiveTime::parse_from_str(value, TIME_FORMAT).map_err(|_| invalid())
}

fn parse_date(value: &str) -> Result<NaiveDate, RecordError> {
    let invalid = || RecordError::InvalidDate(value.to_string());
    if !all_digits(value, 6) {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| invalid())
}

fn parse_datetime(value: &str) -> Result<NaiveDateTime, RecordError> {
    let invalid = || RecordError::InvalidDate(value.to_string());
    if !all_digits(value, 12) {
        return Err(invalid());
    }
    let format = format!("{}{}", DATE_FORMAT, TIME_FORMAT);
    NaiveDateTime::parse_from_str(value, &format).map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_extensions() {
        let fields = parse_extensions("I033638FXA3940SIU4143ENL", 'I').unwrap();
        assert_eq!(fields.len(), 3);
        assert_eq!(
            fields[0],
            ExtensionField {
                start: 36,
                end: 38,
                code: "FXA".to_string()
            }
        );
        assert_eq!(fields[2].code, "ENL");

        assert!(parse_extensions("I00", 'I').unwrap().is_empty());
    }

    #[test]
    fn test_parse_extensions_rejects_bad_columns() {
        let err = parse_extensions("I01aa38FXA", 'I').unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);

        let err = parse_extensions("I013836FXA", 'I').unwrap_err();
        assert_eq!(err, RecordError::InvalidExtension("3836FXA".to_string()));

        let err = parse_extensions("I010038FXA", 'I').unwrap_err();
        assert!(matches!(err, RecordError::InvalidExtension(_)));
    }

    #[test]
    fn test_extension_out_of_range() {
        let ext = ExtensionField {
            start: 8,
            end: 12,
            code: "HDT".to_string(),
        };
        assert_eq!(ext.slice("K16024800090").unwrap(), "00090");
        let err = ext.slice("K160248000").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Structural);
    }

    #[test]
    fn test_parse_time_and_date() {
        assert_eq!(
            parse_time("160245").unwrap(),
            NaiveTime::from_hms_opt(16, 2, 45).unwrap()
        );
        assert!(parse_time("310310").is_err());
        assert!(parse_time("16024").is_err());
        assert!(parse_time("1602 5").is_err());

        assert_eq!(
            parse_date("010203").unwrap(),
            NaiveDate::from_ymd_opt(2003, 2, 1).unwrap()
        );
        assert!(parse_date("330203").is_err());

        let dt = parse_datetime("150701213841").unwrap();
        assert_eq!(
            dt,
            NaiveDate::from_ymd_opt(2001, 7, 15)
                .unwrap()
                .and_hms_opt(21, 38, 41)
                .unwrap()
        );
    }

    #[test]
    fn test_task_point() {
        let p = parse_task_point("C5111359N00101899WEZ TAKEOFF").unwrap();
        assert!((p.latitude - 51.18931666666667).abs() < 1e-12);
        assert!((p.longitude - -1.03165).abs() < 1e-12);
        assert_eq!(p.description, "EZ TAKEOFF");
        assert_eq!(p.time, None);

        assert!(parse_task_point("C5111359N00101899W").is_ok());
        assert!(parse_task_point("C5111359N00101899").is_err());
        assert!(parse_task_point("C51113x9N00101899WEZ").is_err());
    }

    #[test]
    fn test_field_does_not_panic_on_multibyte() {
        let line = "HFPLTJ\u{00fc}rgen";
        assert_eq!(field(line, 5..).unwrap(), "J\u{00fc}rgen");
        assert!(field(line, 2..7).is_err());
    }
}
