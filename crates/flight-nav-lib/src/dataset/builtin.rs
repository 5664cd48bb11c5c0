//! Built-in sample navigation data (continental US)
//!
//! Airways in this sample start and end at airports so the graph is routable
//! end-to-end without terminal procedures.

use super::NavDataset;
use crate::model::{
    Airway, AirwayLevel, ApproachKind, ApproachProcedure, Sid, Star, Waypoint, WaypointType,
};

/// (id, lat, lon, elevation ft, region)
const AIRPORTS: &[(&str, f64, f64, i32, &str)] = &[
    ("KJFK", 40.6398, -73.7789, 13, "K6"),
    ("KLGA", 40.7772, -73.8726, 21, "K6"),
    ("KEWR", 40.6925, -74.1687, 18, "K6"),
    ("KBOS", 42.3643, -71.0052, 20, "K6"),
    ("KPHL", 39.8719, -75.2411, 36, "K6"),
    ("KDCA", 38.8521, -77.0377, 15, "K6"),
    ("KIAD", 38.9445, -77.4558, 313, "K6"),
    ("KORD", 41.9786, -87.9048, 672, "K5"),
    ("KMSP", 44.8820, -93.2218, 841, "K5"),
    ("KATL", 33.6367, -84.4281, 1026, "K7"),
    ("KCLT", 35.2140, -80.9431, 748, "K7"),
    ("KMIA", 25.7932, -80.2906, 8, "K7"),
    ("KDFW", 32.8968, -97.0380, 607, "K4"),
    ("KDEN", 39.8617, -104.6732, 5434, "K2"),
    ("KSLC", 40.7884, -111.9778, 4227, "K2"),
    ("KPHX", 33.4343, -112.0116, 1135, "K2"),
    ("KLAS", 36.0801, -115.1522, 2181, "K2"),
    ("KLAX", 33.9425, -118.4081, 128, "K2"),
    ("KSFO", 37.6189, -122.3750, 13, "K2"),
    ("KSEA", 47.4490, -122.3093, 433, "K1"),
];

/// (id, lat, lon, frequency MHz, elevation ft, region)
const VORS: &[(&str, f64, f64, f64, i32, &str)] = &[
    ("JFK", 40.6328, -73.7714, 115.9, 12, "K6"),
    ("LGA", 40.7834, -73.8683, 113.1, 20, "K6"),
    ("BOS", 42.3573, -70.9895, 112.7, 20, "K6"),
    ("CYN", 39.8170, -74.4316, 113.4, 190, "K6"),
    ("ETX", 40.5810, -75.6826, 110.2, 640, "K6"),
    ("PSB", 40.9163, -77.9927, 115.5, 2410, "K6"),
    ("DCA", 38.8583, -77.0364, 111.0, 10, "K6"),
    ("GVE", 38.0131, -78.1527, 115.1, 470, "K6"),
    ("LYH", 37.2544, -79.2359, 109.2, 940, "K6"),
    ("DJB", 41.3581, -82.1618, 116.6, 800, "K5"),
    ("FWA", 40.9786, -85.1951, 117.8, 800, "K5"),
    ("GIJ", 41.7686, -86.3186, 115.4, 770, "K5"),
    ("OBK", 42.2218, -87.9514, 113.0, 700, "K5"),
    ("IOW", 41.5191, -91.6134, 116.2, 680, "K5"),
    ("DSM", 41.4378, -93.6481, 117.5, 960, "K5"),
    ("OBH", 41.3756, -98.3536, 114.8, 2010, "K3"),
    ("LBF", 41.0480, -100.7470, 117.4, 3050, "K3"),
    ("SNY", 41.0972, -102.9828, 115.9, 4210, "K3"),
    ("DEN", 39.8125, -104.6608, 117.9, 5440, "K2"),
    ("EKR", 40.0675, -107.9247, 115.2, 6540, "K2"),
    ("MTU", 40.1450, -110.1275, 112.9, 5330, "K2"),
    ("MLF", 38.3603, -113.0128, 112.1, 5020, "K2"),
    ("LAS", 36.0797, -115.1599, 116.9, 2180, "K2"),
    ("HEC", 34.7972, -116.4627, 112.7, 1880, "K2"),
    ("PMD", 34.6306, -118.0639, 114.5, 2520, "K2"),
    ("LAX", 33.9331, -118.4319, 113.6, 180, "K2"),
    ("FIM", 34.3567, -118.8805, 115.6, 2300, "K2"),
    ("AVE", 35.6469, -119.9786, 117.1, 740, "K2"),
    ("SFO", 37.6195, -122.3739, 115.8, 10, "K2"),
    ("SPA", 35.0337, -81.9271, 115.7, 940, "K7"),
    ("ATL", 33.6292, -84.4350, 116.9, 1010, "K7"),
    ("MGM", 32.2237, -86.3197, 112.1, 280, "K7"),
    ("MEI", 32.3784, -88.8044, 117.0, 300, "K7"),
    ("MLU", 32.5164, -92.0374, 117.2, 80, "K4"),
    ("GGG", 32.4175, -94.7533, 112.9, 330, "K4"),
    ("DFW", 32.8654, -97.0282, 117.0, 560, "K4"),
    ("ABI", 32.4813, -99.8635, 113.7, 1800, "K4"),
    ("INK", 31.8748, -103.2438, 112.1, 2860, "K4"),
    ("ELP", 31.8158, -106.2819, 115.2, 4020, "K2"),
    ("TUS", 32.0952, -110.9146, 116.0, 2670, "K2"),
    ("PHX", 33.4330, -111.9700, 115.6, 1130, "K2"),
    ("BLH", 33.5965, -114.7613, 117.4, 390, "K2"),
    ("PSP", 33.8700, -116.4295, 115.5, 460, "K2"),
];

/// (id, lat, lon, frequency MHz, region)
const NDBS: &[(&str, f64, f64, f64, &str)] = &[
    ("BRK", 40.8167, -72.8667, 0.238, "K6"),
    ("LQ", 40.7500, -73.5500, 0.350, "K6"),
    ("RQ", 33.9500, -118.0500, 0.278, "K2"),
];

/// (id, lat, lon, region)
const FIXES: &[(&str, f64, f64, &str)] = &[
    ("MERIT", 41.3819, -73.1375, "K6"),
    ("GREKI", 41.4798, -73.3141, "K6"),
    ("DEEZZ", 40.5883, -73.4222, "K6"),
    ("ROBER", 40.4900, -73.9900, "K6"),
    ("LENDY", 40.9147, -74.1353, "K6"),
    ("CAMRN", 40.0173, -73.8614, "K6"),
    ("ROSLY", 40.5300, -73.8500, "K6"),
    ("SEAVU", 33.8786, -117.5922, "K2"),
    ("ANJLL", 34.1194, -118.0328, "K2"),
    ("LIMMA", 33.9200, -118.1200, "K2"),
    ("FUELR", 33.9500, -118.2300, "K2"),
    ("CAANN", 33.6500, -84.7800, "K7"),
];

const JET_BAND: (i32, i32) = (18000, 45000);
const VICTOR_BAND: (i32, i32) = (1200, 17999);

/// (name, level, waypoint ids)
const AIRWAYS: &[(&str, AirwayLevel, &[&str])] = &[
    (
        "J80",
        AirwayLevel::High,
        &["KJFK", "JFK", "ETX", "PSB", "DJB", "FWA", "GIJ", "OBK", "KORD"],
    ),
    (
        "J94",
        AirwayLevel::High,
        &["KORD", "OBK", "IOW", "DSM", "OBH", "LBF", "SNY", "DEN", "KDEN"],
    ),
    (
        "J60",
        AirwayLevel::High,
        &["KDEN", "DEN", "EKR", "MTU", "MLF", "LAS", "KLAS"],
    ),
    (
        "J146",
        AirwayLevel::High,
        &["KLAS", "LAS", "HEC", "PMD", "LAX", "KLAX"],
    ),
    (
        "J75",
        AirwayLevel::High,
        &["KDCA", "DCA", "GVE", "LYH", "SPA", "ATL", "KATL"],
    ),
    (
        "J14",
        AirwayLevel::High,
        &["KATL", "ATL", "MGM", "MEI", "MLU", "GGG", "DFW", "KDFW"],
    ),
    (
        "J4",
        AirwayLevel::High,
        &["KDFW", "DFW", "ABI", "INK", "ELP", "TUS", "PHX", "BLH", "PSP", "LAX", "KLAX"],
    ),
    (
        "J65",
        AirwayLevel::High,
        &["KLAX", "LAX", "FIM", "AVE", "SFO", "KSFO"],
    ),
    (
        "V1",
        AirwayLevel::Low,
        &["KBOS", "BOS", "MERIT", "GREKI", "LGA", "KLGA"],
    ),
    (
        "V16",
        AirwayLevel::Low,
        &["KJFK", "JFK", "CYN", "DCA", "KDCA"],
    ),
    ("V139", AirwayLevel::Low, &["LGA", "JFK", "DEEZZ", "BRK"]),
];

pub(super) fn dataset() -> NavDataset {
    let airports = AIRPORTS.iter().map(|&(id, lat, lon, elevation, region)| {
        Waypoint::new(id, lat, lon, WaypointType::Airport)
            .with_elevation(elevation)
            .with_region(region)
    });
    let vors = VORS.iter().map(|&(id, lat, lon, freq, elevation, region)| {
        Waypoint::new(id, lat, lon, WaypointType::Vor)
            .with_frequency(freq)
            .with_elevation(elevation)
            .with_region(region)
    });
    let ndbs = NDBS.iter().map(|&(id, lat, lon, freq, region)| {
        Waypoint::new(id, lat, lon, WaypointType::Ndb)
            .with_frequency(freq)
            .with_region(region)
    });
    let fixes = FIXES.iter().map(|&(id, lat, lon, region)| {
        Waypoint::new(id, lat, lon, WaypointType::Fix).with_region(region)
    });

    let airways = AIRWAYS.iter().map(|&(name, level, ids)| {
        let (min, max) = match level {
            AirwayLevel::High => JET_BAND,
            AirwayLevel::Low => VICTOR_BAND,
        };
        Airway::new(name, level, min, max, ids.iter().copied())
    });

    NavDataset::new()
        .with_waypoints(airports.chain(vors).chain(ndbs).chain(fixes))
        .with_airways(airways)
        .with_sids(sids())
        .with_stars(stars())
        .with_approaches(approaches())
}

fn ids(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn sids() -> Vec<Sid> {
    vec![
        Sid {
            name: "SKORR5".into(),
            airport: "KJFK".into(),
            runway: "31L".into(),
            waypoints: ids(&["ROBER", "LENDY", "ETX"]),
            altitude_restrictions: vec![Some(2000), Some(5000), None],
            speed_restrictions: vec![Some(210), None, None],
            initial_heading_deg: 310.0,
            initial_altitude_ft: 5000,
            is_rnav: false,
            distance_nm: 95.0,
        },
        Sid {
            name: "DEEZZ5".into(),
            airport: "KJFK".into(),
            runway: "04L".into(),
            waypoints: ids(&["DEEZZ", "BRK"]),
            altitude_restrictions: vec![Some(3000), None],
            speed_restrictions: vec![None, None],
            initial_heading_deg: 40.0,
            initial_altitude_ft: 5000,
            is_rnav: true,
            distance_nm: 48.0,
        },
        Sid {
            name: "VNY2".into(),
            airport: "KLAX".into(),
            runway: "25R".into(),
            waypoints: ids(&["FUELR", "FIM"]),
            altitude_restrictions: vec![Some(3000), Some(9000)],
            speed_restrictions: vec![Some(230), None],
            initial_heading_deg: 250.0,
            initial_altitude_ft: 7000,
            is_rnav: false,
            distance_nm: 32.0,
        },
        Sid {
            name: "CAANN2".into(),
            airport: "KATL".into(),
            runway: "26L".into(),
            waypoints: ids(&["CAANN", "MGM"]),
            altitude_restrictions: vec![Some(10000), None],
            speed_restrictions: vec![None, None],
            initial_heading_deg: 265.0,
            initial_altitude_ft: 10000,
            is_rnav: true,
            distance_nm: 130.0,
        },
    ]
}

fn stars() -> Vec<Star> {
    vec![
        Star {
            name: "ANJLL4".into(),
            airport: "KLAX".into(),
            runway: "24R".into(),
            waypoints: ids(&["HEC", "SEAVU", "ANJLL", "LIMMA"]),
            altitude_restrictions: vec![Some(24000), Some(13000), Some(10000), Some(7000)],
            speed_restrictions: vec![None, Some(280), Some(250), Some(210)],
            initial_altitude_ft: 24000,
            final_altitude_ft: 7000,
            is_rnav: true,
            distance_nm: 120.0,
        },
        Star {
            name: "CAMRN4".into(),
            airport: "KJFK".into(),
            runway: "04R".into(),
            waypoints: ids(&["CYN", "CAMRN", "ROSLY"]),
            altitude_restrictions: vec![Some(19000), Some(11000), Some(3000)],
            speed_restrictions: vec![None, Some(250), Some(210)],
            initial_altitude_ft: 19000,
            final_altitude_ft: 3000,
            is_rnav: false,
            distance_nm: 60.0,
        },
        Star {
            name: "GIJ1".into(),
            airport: "KORD".into(),
            runway: "27L".into(),
            waypoints: ids(&["GIJ", "OBK"]),
            altitude_restrictions: vec![Some(16000), Some(8000)],
            speed_restrictions: vec![None, Some(250)],
            initial_altitude_ft: 16000,
            final_altitude_ft: 8000,
            is_rnav: false,
            distance_nm: 90.0,
        },
    ]
}

fn approaches() -> Vec<ApproachProcedure> {
    vec![
        ApproachProcedure {
            airport: "KJFK".into(),
            runway: "04R".into(),
            kind: ApproachKind::Ils,
            waypoints: ids(&["CAMRN", "ROSLY"]),
            decision_altitude_ft: 213,
            minimum_visibility_sm: 0.5,
            has_glideslope: true,
        },
        ApproachProcedure {
            airport: "KJFK".into(),
            runway: "31L".into(),
            kind: ApproachKind::Rnav,
            waypoints: ids(&["LENDY", "ROBER"]),
            decision_altitude_ft: 420,
            minimum_visibility_sm: 1.0,
            has_glideslope: false,
        },
        ApproachProcedure {
            airport: "KLAX".into(),
            runway: "24R".into(),
            kind: ApproachKind::Ils,
            waypoints: ids(&["LIMMA", "FUELR"]),
            decision_altitude_ft: 326,
            minimum_visibility_sm: 0.5,
            has_glideslope: true,
        },
        ApproachProcedure {
            airport: "KLAX".into(),
            runway: "24R".into(),
            kind: ApproachKind::Rnav,
            waypoints: ids(&["ANJLL", "LIMMA", "FUELR"]),
            decision_altitude_ft: 480,
            minimum_visibility_sm: 1.0,
            has_glideslope: false,
        },
        ApproachProcedure {
            airport: "KBOS".into(),
            runway: "04R".into(),
            kind: ApproachKind::Vor,
            waypoints: ids(&["BOS"]),
            decision_altitude_ft: 600,
            minimum_visibility_sm: 1.0,
            has_glideslope: false,
        },
    ]
}
