use super::*;

const TOLERANCE: f64 = 0.0001;

fn config(track_type: TrackType, configuration: Configuration) -> SectionConfiguration {
    SectionConfiguration {
        track_type,
        configuration,
        shutter_width_deduction: 3.175,
        height_deduction: 66.675,
        three_track_width_addition: 63.5,
        glass_width_deduction: 104.775,
        glass_height_deduction: 104.775,
        track_rail_deduction: Some(40.0),
        frame_multiplier_width: 2,
        frame_multiplier_height: 2,
        separate_mosquito_net: false,
        different_frame_materials: false,
    }
}

fn assert_close(actual: f64, expected: f64, what: &str) {
    assert!(
        (actual - expected).abs() <= TOLERANCE,
        "{}: expected {}, got {}",
        what,
        expected,
        actual
    );
}

/// (track, configuration, width, height, shutter width, final height, glass width, glass height, pane area)
const REGRESSION_CASES: [(TrackType, Configuration, f64, f64, f64, f64, f64, f64, f64); 4] = [
    (
        TrackType::TwoTrack,
        Configuration::AllGlass,
        1000.0,
        1000.0,
        496.825,
        933.325,
        392.05,
        828.55,
        324833.0275,
    ),
    (
        TrackType::TwoTrack,
        Configuration::GlassMosquito,
        1000.0,
        1000.0,
        496.825,
        933.325,
        392.05,
        828.55,
        324833.0275,
    ),
    (
        TrackType::ThreeTrack,
        Configuration::AllGlass,
        1500.0,
        1500.0,
        521.1667,
        1433.325,
        416.3917,
        1328.55,
        553197.1487,
    ),
    (
        TrackType::ThreeTrack,
        Configuration::GlassMosquito,
        1500.0,
        1500.0,
        746.825,
        1433.325,
        642.05,
        1328.55,
        852995.5275,
    ),
];

#[test]
fn test_regression_dimensions() {
    for (track, configuration, width, height, sw, sh, gw, gh, area) in REGRESSION_CASES {
        let cfg = config(track, configuration);
        let geometry = SectionGeometry::new(&cfg);
        let label = format!("{} {}", track, configuration);

        let finals = geometry.final_dimensions(width, height);
        assert_close(finals.shutter_width, sw, &format!("{} shutter width", label));
        assert_close(finals.height, sh, &format!("{} final height", label));

        let glass = geometry.glass_size(width, height, 1);
        assert_close(glass.width, gw, &format!("{} glass width", label));
        assert_close(glass.height, gh, &format!("{} glass height", label));
        assert_close(glass.area, area, &format!("{} glass area", label));
        assert_close(
            glass.total_area,
            area * track.tracks() as f64,
            &format!("{} total area", label),
        );
    }
}

#[test]
fn test_total_area_scales_with_quantity() {
    let cfg = config(TrackType::ThreeTrack, Configuration::AllGlass);
    let geometry = SectionGeometry::new(&cfg);
    let one = geometry.glass_size(1500.0, 1500.0, 1);
    let four = geometry.glass_size(1500.0, 1500.0, 4);
    assert_close(four.total_area, one.total_area * 4.0, "total area");
    assert_close(four.area, one.area, "pane area");
}

#[test]
fn test_two_shutter_width_round_trip() {
    let cfg = config(TrackType::TwoTrack, Configuration::AllGlass);
    let geometry = SectionGeometry::new(&cfg);
    for width in [300.0, 812.5, 1000.0, 2437.9, 5000.0] {
        let finals = geometry.final_dimensions(width, 1000.0);
        let recovered = 2.0 * (finals.shutter_width + cfg.shutter_width_deduction);
        assert!((recovered - width).abs() < 1e-9);
    }
}

#[test]
fn test_interlock_length_is_final_height() {
    let cfg = config(TrackType::TwoTrack, Configuration::AllGlass);
    let geometry = SectionGeometry::new(&cfg);
    assert_close(geometry.interlock_length(1000.0), 933.325, "interlock length");
    assert_close(
        geometry.interlock_length(1000.0),
        geometry.final_dimensions(1234.0, 1000.0).height,
        "interlock vs final height",
    );
}

#[test]
fn test_interlock_count_skips_mosquito_shutter() {
    let cases = [
        (TrackType::TwoTrack, Configuration::AllGlass, 6),
        (TrackType::TwoTrack, Configuration::GlassMosquito, 3),
        (TrackType::ThreeTrack, Configuration::AllGlass, 9),
        (TrackType::ThreeTrack, Configuration::GlassMosquito, 6),
    ];
    for (track, configuration, expected) in cases {
        let cfg = config(track, configuration);
        assert_eq!(SectionGeometry::new(&cfg).interlock_count(3), expected);
    }
}

#[test]
fn test_track_rail_piece() {
    let cfg = config(TrackType::ThreeTrack, Configuration::AllGlass);
    assert_eq!(
        SectionGeometry::new(&cfg).track_rail_piece(1500.0, 2),
        (1460.0, 6)
    );

    let mut cfg = config(TrackType::TwoTrack, Configuration::AllGlass);
    cfg.track_rail_deduction = None;
    let (length, count) = SectionGeometry::new(&cfg).track_rail_piece(1500.0, 2);
    assert_eq!(length, 0.0);
    assert_eq!(count, 4);
}

#[test]
fn test_accessories() {
    let three_mosquito = config(TrackType::ThreeTrack, Configuration::GlassMosquito);
    let two_mosquito = config(TrackType::TwoTrack, Configuration::GlassMosquito);
    let three_glass = config(TrackType::ThreeTrack, Configuration::AllGlass);

    assert_eq!(
        SectionGeometry::new(&three_mosquito).accessories(5),
        Accessories {
            mosquito_c_channel: 5,
            track_cap: 5
        }
    );
    assert_eq!(
        SectionGeometry::new(&two_mosquito).accessories(5).mosquito_c_channel,
        0
    );
    assert_eq!(
        SectionGeometry::new(&three_glass).accessories(5).mosquito_c_channel,
        0
    );
}

#[test]
fn test_negative_lengths_propagate() {
    let mut cfg = config(TrackType::TwoTrack, Configuration::AllGlass);
    cfg.height_deduction = 500.0;
    let finals = SectionGeometry::new(&cfg).final_dimensions(1000.0, 400.0);
    assert!(finals.height < 0.0);
}

#[test]
fn test_shutter_labels() {
    let cfg = config(TrackType::ThreeTrack, Configuration::GlassMosquito);
    assert_eq!(
        SectionGeometry::new(&cfg).shutter_label(),
        "Glass + Mosquito shutters (3)"
    );
    let cfg = config(TrackType::TwoTrack, Configuration::GlassMosquito);
    assert_eq!(SectionGeometry::new(&cfg).shutter_label(), "Glass shutters (2)");
}
