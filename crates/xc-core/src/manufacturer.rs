// SPDX-License-Identifier: MIT

use serde::Serialize;

/// A flight recorder manufacturer from the IGC manufacturer code table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Manufacturer {
    /// Single character code used in short file names.
    pub code: char,
    /// Three-letter code used in the A record.
    pub short: &'static str,
    pub name: &'static str,
}

const fn m(code: char, short: &'static str, name: &'static str) -> Manufacturer {
    Manufacturer { code, short, name }
}

pub static MANUFACTURERS: &[Manufacturer] = &[
    m('A', "GCS", "Garrecht"),
    m('B', "LGS", "Logstream"),
    m('C', "CAM", "Cambridge Aero Instruments"),
    m('D', "DSX", "Data Swan/DSX"),
    m('E', "EWA", "EW Avionics"),
    m('F', "FIL", "Filser"),
    m('G', "FLA", "Flarm (Flight Alarm)"),
    m('H', "SCH", "Scheffel"),
    m('I', "ACT", "Aircotec"),
    m('K', "CNI", "ClearNav Instruments"),
    m('K', "NKL", "NKL"),
    m('L', "LXN", "LX Navigation"),
    m('M', "IMI", "IMI Gliding Equipment"),
    m('N', "NTE", "New Technologies s.r.l."),
    m('O', "NAV", "Naviter"),
    m('P', "PES", "Peschges"),
    m('R', "PRT", "Print Technik"),
    m('S', "SDI", "Streamline Data Instruments"),
    m('T', "TRI", "Triadis Engineering GmbH"),
    m('V', "LXV", "LXNAV d.o.o."),
    m('W', "WES", "Westerboer"),
    m('X', "XYY", "Other manufacturer"),
    m('Z', "ZAN", "Zander"),
];

/// Finds a manufacturer by its three-letter code (case sensitive, as written
/// in the A record).
pub fn lookup(short: &str) -> Option<&'static Manufacturer> {
    MANUFACTURERS.iter().find(|m| m.short == short)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let flarm = lookup("FLA").unwrap();
        assert_eq!(flarm.code, 'G');
        assert_eq!(flarm.name, "Flarm (Flight Alarm)");

        // CNI and NKL share a single-char code
        assert_eq!(lookup("CNI").unwrap().code, lookup("NKL").unwrap().code);

        assert!(lookup("fla").is_none());
        assert!(lookup("QQQ").is_none());
    }
}
