//! Planet positions from Keplerian elements with secular rates.
//!
//! Elements are the JPL "approximate positions of the major planets" set
//! (valid 1800–2050). Heliocentric ecliptic positions are reduced to
//! geocentric by subtracting the Earth–Moon barycenter, then rotated to
//! equatorial and horizontal coordinates.

use std::f64::consts::PI;

use serde::Serialize;

use super::coords::{altitude, azimuth_from_south, ecliptic_vector_to_equatorial, Equatorial};
use super::time::{centuries_since_j2000, days_since_j2000, sidereal_time, RAD};
use super::CelestialPosition;

/// The eight bodies the widget tracks besides the sun and moon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Planet {
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
}

impl Planet {
    pub const COUNT: usize = 8;

    pub const ALL: [Planet; Planet::COUNT] = [
        Planet::Mercury,
        Planet::Venus,
        Planet::Mars,
        Planet::Jupiter,
        Planet::Saturn,
        Planet::Uranus,
        Planet::Neptune,
        Planet::Pluto,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Planet::Mercury => "Mercury",
            Planet::Venus => "Venus",
            Planet::Mars => "Mars",
            Planet::Jupiter => "Jupiter",
            Planet::Saturn => "Saturn",
            Planet::Uranus => "Uranus",
            Planet::Neptune => "Neptune",
            Planet::Pluto => "Pluto",
        }
    }

    fn elements(self) -> &'static OrbitalElements {
        &PLANET_ELEMENTS[self.index()]
    }
}

/// Keplerian elements at J2000 with rates per Julian century.
/// Angles in degrees, distances in AU.
#[derive(Debug, Clone, Copy)]
struct OrbitalElements {
    a: (f64, f64),
    e: (f64, f64),
    inclination: (f64, f64),
    mean_longitude: (f64, f64),
    perihelion_longitude: (f64, f64),
    node_longitude: (f64, f64),
}

const EARTH_ELEMENTS: OrbitalElements = OrbitalElements {
    a: (1.000_002_61, 0.000_005_62),
    e: (0.016_711_23, -0.000_043_92),
    inclination: (-0.000_015_31, -0.012_946_68),
    mean_longitude: (100.464_571_66, 35_999.372_449_81),
    perihelion_longitude: (102.937_681_93, 0.323_273_64),
    node_longitude: (0.0, 0.0),
};

const PLANET_ELEMENTS: [OrbitalElements; Planet::COUNT] = [
    // Mercury
    OrbitalElements {
        a: (0.387_099_27, 0.000_000_37),
        e: (0.205_635_93, 0.000_019_06),
        inclination: (7.004_979_02, -0.005_947_49),
        mean_longitude: (252.250_323_50, 149_472.674_111_75),
        perihelion_longitude: (77.457_796_28, 0.160_476_89),
        node_longitude: (48.330_765_93, -0.125_340_81),
    },
    // Venus
    OrbitalElements {
        a: (0.723_335_66, 0.000_003_90),
        e: (0.006_776_72, -0.000_041_07),
        inclination: (3.394_676_05, -0.000_788_90),
        mean_longitude: (181.979_099_50, 58_517.815_387_29),
        perihelion_longitude: (131.602_467_18, 0.002_683_29),
        node_longitude: (76.679_842_55, -0.277_694_18),
    },
    // Mars
    OrbitalElements {
        a: (1.523_710_34, 0.000_018_47),
        e: (0.093_394_10, 0.000_078_82),
        inclination: (1.849_691_42, -0.008_131_31),
        mean_longitude: (-4.553_432_05, 19_140.302_684_99),
        perihelion_longitude: (-23.943_629_59, 0.444_410_88),
        node_longitude: (49.559_538_91, -0.292_573_43),
    },
    // Jupiter
    OrbitalElements {
        a: (5.202_887_00, -0.000_116_07),
        e: (0.048_386_24, -0.000_132_53),
        inclination: (1.304_396_95, -0.001_837_14),
        mean_longitude: (34.396_440_51, 3_034.746_127_75),
        perihelion_longitude: (14.728_479_83, 0.212_526_68),
        node_longitude: (100.473_909_09, 0.204_691_06),
    },
    // Saturn
    OrbitalElements {
        a: (9.536_675_94, -0.001_250_60),
        e: (0.053_861_79, -0.000_509_91),
        inclination: (2.485_991_87, 0.001_936_09),
        mean_longitude: (49.954_244_23, 1_222.493_622_01),
        perihelion_longitude: (92.598_878_31, -0.418_972_16),
        node_longitude: (113.662_424_48, -0.288_677_94),
    },
    // Uranus
    OrbitalElements {
        a: (19.189_164_64, -0.001_961_76),
        e: (0.047_257_44, -0.000_043_97),
        inclination: (0.772_637_83, -0.002_429_39),
        mean_longitude: (313.238_104_51, 428.482_027_85),
        perihelion_longitude: (170.954_276_30, 0.408_052_81),
        node_longitude: (74.016_925_03, 0.042_405_89),
    },
    // Neptune
    OrbitalElements {
        a: (30.069_922_76, 0.000_262_91),
        e: (0.008_590_48, 0.000_051_05),
        inclination: (1.770_043_47, 0.000_353_72),
        mean_longitude: (-55.120_029_69, 218.459_453_25),
        perihelion_longitude: (44.964_762_27, -0.322_414_64),
        node_longitude: (131.784_225_74, -0.005_086_64),
    },
    // Pluto
    OrbitalElements {
        a: (39.482_116_75, -0.000_315_96),
        e: (0.248_827_30, 0.000_051_70),
        inclination: (17.140_012_06, 0.000_048_18),
        mean_longitude: (238.929_038_33, 145.207_805_15),
        perihelion_longitude: (224.068_916_29, -0.040_629_42),
        node_longitude: (110.303_936_84, -0.011_834_82),
    },
];

/// Solve Kepler's equation `E - e·sin(E) = M` by Newton-Raphson.
fn solve_kepler(mean_anomaly: f64, eccentricity: f64) -> f64 {
    let mut ea = mean_anomaly;
    for _ in 0..15 {
        let delta = ea - eccentricity * ea.sin() - mean_anomaly;
        ea -= delta / (1.0 - eccentricity * ea.cos());
        if delta.abs() < 1e-12 {
            break;
        }
    }
    ea
}

/// Heliocentric ecliptic rectangular position (AU).
fn heliocentric(elements: &OrbitalElements, t: f64) -> [f64; 3] {
    let at = |(base, rate): (f64, f64)| base + rate * t;

    let a = at(elements.a);
    let e = at(elements.e);
    let i = at(elements.inclination) * RAD;
    let l = at(elements.mean_longitude);
    let varpi = at(elements.perihelion_longitude);
    let node = at(elements.node_longitude);

    let m = ((l - varpi + 180.0).rem_euclid(360.0) - 180.0) * RAD;
    let w = (varpi - node) * RAD;
    let node = node * RAD;

    let ea = solve_kepler(m, e);
    let xp = a * (ea.cos() - e);
    let yp = a * (1.0 - e * e).sqrt() * ea.sin();

    let (sw, cw) = w.sin_cos();
    let (sn, cn) = node.sin_cos();
    let (si, ci) = i.sin_cos();

    [
        (cw * cn - sw * sn * ci) * xp + (-sw * cn - cw * sn * ci) * yp,
        (cw * sn + sw * cn * ci) * xp + (-sw * sn + cw * cn * ci) * yp,
        sw * si * xp + cw * si * yp,
    ]
}

/// Geocentric equatorial coordinates of a planet.
pub(crate) fn planet_equatorial(planet: Planet, unix_ms: f64) -> Equatorial {
    let t = centuries_since_j2000(unix_ms);
    let earth = heliocentric(&EARTH_ELEMENTS, t);
    let body = heliocentric(planet.elements(), t);
    ecliptic_vector_to_equatorial(body[0] - earth[0], body[1] - earth[1], body[2] - earth[2])
}

/// Apparent position of one planet for an observer.
pub fn planet_position(
    planet: Planet,
    unix_ms: f64,
    latitude: f64,
    longitude: f64,
) -> CelestialPosition {
    let lw = RAD * -longitude;
    let phi = RAD * latitude;
    let eq = planet_equatorial(planet, unix_ms);
    let h = sidereal_time(days_since_j2000(unix_ms), lw) - eq.right_ascension;

    CelestialPosition::new(
        altitude(h, phi, eq.declination),
        azimuth_from_south(h, phi, eq.declination) + PI,
    )
}

/// Positions of every tracked planet, indexed by [`Planet::index`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlanetPositions([CelestialPosition; Planet::COUNT]);

impl PlanetPositions {
    pub fn get(&self, planet: Planet) -> CelestialPosition {
        self.0[planet.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Planet, CelestialPosition)> + '_ {
        Planet::ALL.iter().map(move |&p| (p, self.0[p.index()]))
    }
}

pub fn planet_positions(unix_ms: f64, latitude: f64, longitude: f64) -> PlanetPositions {
    PlanetPositions(Planet::ALL.map(|p| planet_position(p, unix_ms, latitude, longitude)))
}
