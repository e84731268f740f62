// SPDX-License-Identifier: MIT

use simplelog::{Config, LevelFilter, TestLogger};
use xc_core::optimizer::{optimizer_by_id, route_distance, OptimizeError};
use xc_core::{Flight, IgcParser, OptimizerConfig};

/// Out-and-return log: `out` fixes flying east along 45N from 6E, then
/// `back` fixes returning west in half-size steps slightly further north.
/// The return leg may not pass west of the start.
fn out_and_return_log(out: usize, back: usize) -> String {
    assert!(back <= 2 * (out - 1), "return leg overshoots the start");
    let mut log = String::from("AXCS001\nHFDTE140726\n");
    let mut second = 0;
    let mut push_fix = |log: &mut String, lat: &str, lon_thousandths: usize| {
        let (h, m, s) = (10 + second / 3600, (second / 60) % 60, second % 60);
        log.push_str(&format!(
            "B{:02}{:02}{:02}{}006{:05}EA010000105000\n",
            h, m, s, lat, lon_thousandths
        ));
        second += 10;
    };

    for i in 0..out {
        push_fix(&mut log, "4500000N", i * 600);
    }
    let turn = (out - 1) * 600;
    for j in 1..=back {
        push_fix(&mut log, "4500060N", turn - j * 300);
    }
    log
}

fn parse(out: usize, back: usize) -> Flight {
    let _ = TestLogger::init(LevelFilter::Debug, Config::default());
    IgcParser::parse(&out_and_return_log(out, back)).unwrap()
}

fn config(seed: u64) -> OptimizerConfig {
    OptimizerConfig {
        cycles: 4,
        mc_cycles: 2_000,
        seed: Some(seed),
    }
}

#[test]
fn test_log_decodes_to_expected_track() {
    let flight = parse(20, 38);
    assert_eq!(flight.points.len(), 58);
    assert!((flight.points[0].longitude - 6.0).abs() < 1e-9);
    assert!((flight.points[19].longitude - 6.19).abs() < 1e-9);
    assert!((flight.points[20].latitude - 45.001).abs() < 1e-9);
}

#[test]
fn test_optimize_parsed_flight() {
    let flight = parse(20, 38);
    let track = &flight.points;
    let optimizer = optimizer_by_id("montecarlo", config(11)).unwrap();

    let result = optimizer.optimize(track, 3).unwrap();
    assert_eq!(result.turnpoints.len(), 3);
    assert_eq!(result.turnpoints[0], track[0]);
    assert_eq!(result.turnpoints[2], track[track.len() - 1]);
    assert_eq!(result.turnpoints[1], track[19]);

    let spread = route_distance(track, &[0, track.len() / 2, track.len() - 1]);
    assert!(result.distance >= spread);
    assert_eq!(result.score, 0.0);
    assert_eq!(result.scorer_id, None);
}

#[test]
fn test_turnpoints_follow_track_order() {
    let flight = parse(25, 40);
    let optimizer = optimizer_by_id("montecarlo", config(5)).unwrap();
    let result = optimizer.optimize(&flight.points, 5).unwrap();

    let times: Vec<_> = result.turnpoints.iter().map(|p| p.time.unwrap()).collect();
    assert!(times.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_seeded_runs_repeat() {
    let flight = parse(16, 30);
    assert_eq!(flight.points.len(), 46);
    let a = optimizer_by_id("montecarlo", config(42))
        .unwrap()
        .optimize(&flight.points, 4)
        .unwrap();
    let b = optimizer_by_id("montecarlo", config(42))
        .unwrap()
        .optimize(&flight.points, 4)
        .unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_short_track_is_rejected() {
    let flight = parse(2, 1);
    let optimizer = optimizer_by_id("montecarlo", config(0)).unwrap();
    assert_eq!(
        optimizer.optimize(&flight.points, 4),
        Err(OptimizeError::TrackTooShort {
            points: 3,
            turnpoints: 4
        })
    );
}
