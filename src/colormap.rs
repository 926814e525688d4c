//! Named continuous colormaps.
//!
//! Each map is a table of color stops over [0, 1] sampled with linear
//! interpolation. The names follow matplotlib's vocabulary; the tables are
//! piecewise-linear approximations of those maps, close enough for art.

use crate::canvas::Color;
use crate::error::{Error, Result};
use std::fmt;

/// A single color stop: position in [0, 1] and an sRGB triplet.
type Stop = (f32, [u8; 3]);

const VIRIDIS: &[Stop] = &[
    (0.0, [68, 1, 84]),
    (0.125, [71, 44, 122]),
    (0.25, [59, 81, 139]),
    (0.375, [44, 113, 142]),
    (0.5, [33, 144, 141]),
    (0.625, [39, 173, 129]),
    (0.75, [92, 200, 99]),
    (0.875, [170, 220, 50]),
    (1.0, [253, 231, 37]),
];

const PLASMA: &[Stop] = &[
    (0.0, [13, 8, 135]),
    (0.125, [75, 3, 161]),
    (0.25, [125, 3, 168]),
    (0.375, [168, 34, 150]),
    (0.5, [203, 70, 121]),
    (0.625, [229, 107, 93]),
    (0.75, [248, 148, 65]),
    (0.875, [253, 195, 40]),
    (1.0, [240, 249, 33]),
];

const INFERNO: &[Stop] = &[
    (0.0, [0, 0, 4]),
    (0.125, [31, 12, 72]),
    (0.25, [85, 15, 109]),
    (0.375, [136, 34, 106]),
    (0.5, [186, 54, 85]),
    (0.625, [227, 89, 51]),
    (0.75, [249, 140, 10]),
    (0.875, [249, 201, 50]),
    (1.0, [252, 255, 164]),
];

const MAGMA: &[Stop] = &[
    (0.0, [0, 0, 4]),
    (0.125, [28, 16, 68]),
    (0.25, [79, 18, 123]),
    (0.375, [129, 37, 129]),
    (0.5, [181, 54, 122]),
    (0.625, [229, 80, 100]),
    (0.75, [251, 135, 97]),
    (0.875, [254, 194, 135]),
    (1.0, [252, 253, 191]),
];

const CIVIDIS: &[Stop] = &[
    (0.0, [0, 34, 78]),
    (0.25, [64, 77, 108]),
    (0.5, [124, 123, 120]),
    (0.75, [188, 175, 111]),
    (1.0, [254, 232, 56]),
];

const GRAY: &[Stop] = &[(0.0, [0, 0, 0]), (1.0, [255, 255, 255])];

const BONE: &[Stop] = &[
    (0.0, [0, 0, 0]),
    (0.375, [84, 84, 116]),
    (0.75, [166, 198, 198]),
    (1.0, [255, 255, 255]),
];

const PINK: &[Stop] = &[
    (0.0, [30, 0, 0]),
    (0.375, [198, 147, 147]),
    (0.75, [231, 231, 183]),
    (1.0, [255, 255, 255]),
];

const HOT: &[Stop] = &[
    (0.0, [10, 0, 0]),
    (0.365, [255, 0, 0]),
    (0.746, [255, 255, 0]),
    (1.0, [255, 255, 255]),
];

const COPPER: &[Stop] = &[(0.0, [0, 0, 0]), (0.8, [255, 199, 127]), (1.0, [255, 199, 127])];

const SPRING: &[Stop] = &[(0.0, [255, 0, 255]), (1.0, [255, 255, 0])];
const SUMMER: &[Stop] = &[(0.0, [0, 128, 102]), (1.0, [255, 255, 102])];
const AUTUMN: &[Stop] = &[(0.0, [255, 0, 0]), (1.0, [255, 255, 0])];
const WINTER: &[Stop] = &[(0.0, [0, 0, 255]), (1.0, [0, 255, 128])];
const COOL: &[Stop] = &[(0.0, [0, 255, 255]), (1.0, [255, 0, 255])];

const JET: &[Stop] = &[
    (0.0, [0, 0, 128]),
    (0.125, [0, 0, 255]),
    (0.375, [0, 255, 255]),
    (0.625, [255, 255, 0]),
    (0.875, [255, 0, 0]),
    (1.0, [128, 0, 0]),
];

const RAINBOW: &[Stop] = &[
    (0.0, [128, 0, 255]),
    (0.25, [0, 180, 235]),
    (0.5, [128, 255, 180]),
    (0.75, [255, 180, 98]),
    (1.0, [255, 0, 0]),
];

const HSV: &[Stop] = &[
    (0.0, [255, 0, 0]),
    (1.0 / 6.0, [255, 255, 0]),
    (2.0 / 6.0, [0, 255, 0]),
    (0.5, [0, 255, 255]),
    (4.0 / 6.0, [0, 0, 255]),
    (5.0 / 6.0, [255, 0, 255]),
    (1.0, [255, 0, 0]),
];

const COOLWARM: &[Stop] = &[(0.0, [59, 76, 192]), (0.5, [221, 221, 221]), (1.0, [180, 4, 38])];

// Cyclic: both ends are the same color.
const TWILIGHT: &[Stop] = &[
    (0.0, [226, 217, 226]),
    (0.25, [94, 130, 185]),
    (0.5, [47, 20, 57]),
    (0.75, [170, 84, 80]),
    (1.0, [226, 217, 226]),
];

const OCEAN: &[Stop] = &[
    (0.0, [0, 128, 0]),
    (1.0 / 3.0, [0, 0, 85]),
    (2.0 / 3.0, [0, 128, 170]),
    (1.0, [255, 255, 255]),
];

const TERRAIN: &[Stop] = &[
    (0.0, [51, 51, 153]),
    (0.15, [0, 153, 255]),
    (0.25, [0, 204, 102]),
    (0.5, [255, 255, 153]),
    (0.75, [128, 92, 84]),
    (1.0, [255, 255, 255]),
];

const WISTIA: &[Stop] = &[
    (0.0, [228, 255, 122]),
    (0.25, [255, 232, 26]),
    (0.5, [255, 189, 0]),
    (0.75, [255, 160, 0]),
    (1.0, [252, 127, 0]),
];

const AFMHOT: &[Stop] = &[
    (0.0, [0, 0, 0]),
    (0.25, [128, 0, 0]),
    (0.5, [255, 128, 0]),
    (0.75, [255, 255, 128]),
    (1.0, [255, 255, 255]),
];

const GIST_HEAT: &[Stop] = &[
    (0.0, [0, 0, 0]),
    (0.5, [191, 0, 0]),
    (2.0 / 3.0, [255, 85, 0]),
    (0.75, [255, 128, 0]),
    (1.0, [255, 255, 255]),
];

/// Eleven evenly spaced ColorBrewer classes.
macro_rules! brewer {
    ($($c:expr),* $(,)?) => {{
        let colors: [[u8; 3]; 11] = [$($c),*];
        [
            (0.0, colors[0]),
            (0.1, colors[1]),
            (0.2, colors[2]),
            (0.3, colors[3]),
            (0.4, colors[4]),
            (0.5, colors[5]),
            (0.6, colors[6]),
            (0.7, colors[7]),
            (0.8, colors[8]),
            (0.9, colors[9]),
            (1.0, colors[10]),
        ]
    }};
}

const PIYG: &[Stop] = &brewer![
    [142, 1, 82], [197, 27, 125], [222, 119, 174], [241, 182, 218], [253, 224, 239],
    [247, 247, 247], [230, 245, 208], [184, 225, 134], [127, 188, 65], [77, 146, 33],
    [39, 100, 25],
];

const PRGN: &[Stop] = &brewer![
    [64, 0, 75], [118, 42, 131], [153, 112, 171], [194, 165, 207], [231, 212, 232],
    [247, 247, 247], [217, 240, 211], [166, 219, 160], [90, 174, 97], [27, 120, 55],
    [0, 68, 27],
];

const BRBG: &[Stop] = &brewer![
    [84, 48, 5], [140, 81, 10], [191, 129, 45], [223, 194, 125], [246, 232, 195],
    [245, 245, 245], [199, 234, 229], [128, 205, 193], [53, 151, 143], [1, 102, 94],
    [0, 60, 48],
];

const PUOR: &[Stop] = &brewer![
    [127, 59, 8], [179, 88, 6], [224, 130, 20], [253, 184, 99], [254, 224, 182],
    [247, 247, 247], [216, 218, 235], [178, 171, 210], [128, 115, 172], [84, 39, 136],
    [45, 0, 75],
];

const RDGY: &[Stop] = &brewer![
    [103, 0, 31], [178, 24, 43], [214, 96, 77], [244, 165, 130], [253, 219, 199],
    [255, 255, 255], [224, 224, 224], [186, 186, 186], [135, 135, 135], [77, 77, 77],
    [26, 26, 26],
];

const RDBU: &[Stop] = &brewer![
    [103, 0, 31], [178, 24, 43], [214, 96, 77], [244, 165, 130], [253, 219, 199],
    [247, 247, 247], [209, 229, 240], [146, 197, 222], [67, 147, 195], [33, 102, 172],
    [5, 48, 97],
];

const RDYLBU: &[Stop] = &brewer![
    [165, 0, 38], [215, 48, 39], [244, 109, 67], [253, 174, 97], [254, 224, 144],
    [255, 255, 191], [224, 243, 248], [171, 217, 233], [116, 173, 209], [69, 117, 180],
    [49, 54, 149],
];

const RDYLGN: &[Stop] = &brewer![
    [165, 0, 38], [215, 48, 39], [244, 109, 67], [253, 174, 97], [254, 224, 139],
    [255, 255, 191], [217, 239, 139], [166, 217, 106], [102, 189, 99], [26, 152, 80],
    [0, 104, 55],
];

const SPECTRAL: &[Stop] = &brewer![
    [158, 1, 66], [213, 62, 79], [244, 109, 67], [253, 174, 97], [254, 224, 139],
    [255, 255, 191], [230, 245, 152], [171, 221, 164], [102, 194, 165], [50, 136, 189],
    [94, 79, 162],
];

const BWR: &[Stop] = &[(0.0, [0, 0, 255]), (0.5, [255, 255, 255]), (1.0, [255, 0, 0])];

const SEISMIC: &[Stop] = &[
    (0.0, [0, 0, 76]),
    (0.25, [0, 0, 255]),
    (0.5, [255, 255, 255]),
    (0.75, [255, 0, 0]),
    (1.0, [128, 0, 0]),
];

// twilight rotated by half a turn and reversed.
const TWILIGHT_SHIFTED: &[Stop] = &[
    (0.0, [47, 20, 57]),
    (0.25, [94, 130, 185]),
    (0.5, [226, 217, 226]),
    (0.75, [170, 84, 80]),
    (1.0, [47, 20, 57]),
];

const GIST_EARTH: &[Stop] = &[
    (0.0, [0, 0, 0]),
    (0.1, [22, 40, 120]),
    (0.25, [45, 110, 125]),
    (0.4, [65, 145, 85]),
    (0.55, [120, 165, 80]),
    (0.7, [170, 175, 95]),
    (0.85, [205, 175, 150]),
    (1.0, [253, 250, 250]),
];

const GIST_STERN: &[Stop] = &[
    (0.0, [0, 0, 0]),
    (0.0547, [255, 14, 28]),
    (0.25, [7, 64, 128]),
    (0.2501, [64, 64, 128]),
    (0.5, [128, 128, 255]),
    (0.735, [187, 187, 0]),
    (1.0, [255, 255, 255]),
];

const GNUPLOT: &[Stop] = &[
    (0.0, [0, 0, 0]),
    (0.125, [90, 0, 180]),
    (0.25, [128, 4, 255]),
    (0.375, [156, 13, 180]),
    (0.5, [180, 32, 0]),
    (0.625, [202, 62, 0]),
    (0.75, [221, 108, 0]),
    (0.875, [239, 171, 0]),
    (1.0, [255, 255, 0]),
];

const GNUPLOT2: &[Stop] = &[
    (0.0, [0, 0, 0]),
    (0.25, [0, 0, 255]),
    (0.42, [135, 0, 255]),
    (0.57, [255, 77, 179]),
    (0.92, [255, 255, 0]),
    (1.0, [255, 255, 255]),
];

const CMRMAP: &[Stop] = &[
    (0.0, [0, 0, 0]),
    (0.125, [38, 38, 128]),
    (0.25, [77, 38, 191]),
    (0.375, [153, 51, 128]),
    (0.5, [255, 64, 38]),
    (0.625, [230, 128, 0]),
    (0.75, [230, 204, 26]),
    (0.875, [230, 230, 128]),
    (1.0, [255, 255, 255]),
];

const CUBEHELIX: &[Stop] = &[
    (0.0, [0, 0, 0]),
    (1.0 / 9.0, [26, 21, 48]),
    (2.0 / 9.0, [22, 61, 78]),
    (3.0 / 9.0, [31, 102, 66]),
    (4.0 / 9.0, [84, 121, 47]),
    (5.0 / 9.0, [160, 121, 73]),
    (6.0 / 9.0, [208, 126, 147]),
    (7.0 / 9.0, [207, 156, 218]),
    (8.0 / 9.0, [193, 202, 243]),
    (1.0, [255, 255, 255]),
];

const BRG: &[Stop] = &[(0.0, [0, 0, 255]), (0.5, [255, 0, 0]), (1.0, [0, 255, 0])];

const GIST_RAINBOW: &[Stop] = &[
    (0.0, [255, 0, 41]),
    (0.03, [255, 0, 0]),
    (0.215, [255, 255, 0]),
    (0.4, [0, 255, 0]),
    (0.586, [0, 255, 255]),
    (0.77, [0, 0, 255]),
    (0.954, [255, 0, 255]),
    (1.0, [255, 0, 191]),
];

const NIPY_SPECTRAL: &[Stop] = &[
    (0.0, [0, 0, 0]),
    (0.1, [136, 0, 153]),
    (0.2, [0, 0, 221]),
    (0.3, [0, 136, 221]),
    (0.4, [0, 170, 136]),
    (0.5, [0, 187, 0]),
    (0.6, [0, 238, 0]),
    (0.7, [187, 255, 0]),
    (0.8, [255, 204, 0]),
    (0.9, [238, 0, 0]),
    (1.0, [204, 204, 204]),
];

const GIST_NCAR: &[Stop] = &[
    (0.0, [0, 0, 128]),
    (0.1, [0, 64, 255]),
    (0.2, [0, 230, 255]),
    (0.3, [0, 255, 100]),
    (0.4, [50, 210, 0]),
    (0.5, [100, 255, 0]),
    (0.6, [255, 255, 0]),
    (0.7, [255, 150, 0]),
    (0.8, [255, 0, 0]),
    (0.9, [255, 0, 255]),
    (1.0, [255, 248, 255]),
];

const TABLE: &[(&str, &[Stop])] = &[
    ("viridis", VIRIDIS),
    ("plasma", PLASMA),
    ("inferno", INFERNO),
    ("magma", MAGMA),
    ("cividis", CIVIDIS),
    ("gray", GRAY),
    ("bone", BONE),
    ("pink", PINK),
    ("hot", HOT),
    ("copper", COPPER),
    ("spring", SPRING),
    ("summer", SUMMER),
    ("autumn", AUTUMN),
    ("winter", WINTER),
    ("cool", COOL),
    ("jet", JET),
    ("rainbow", RAINBOW),
    ("hsv", HSV),
    ("coolwarm", COOLWARM),
    ("twilight", TWILIGHT),
    ("ocean", OCEAN),
    ("terrain", TERRAIN),
    ("Wistia", WISTIA),
    ("afmhot", AFMHOT),
    ("gist_heat", GIST_HEAT),
    ("PiYG", PIYG),
    ("PRGn", PRGN),
    ("BrBG", BRBG),
    ("PuOr", PUOR),
    ("RdGy", RDGY),
    ("RdBu", RDBU),
    ("RdYlBu", RDYLBU),
    ("RdYlGn", RDYLGN),
    ("Spectral", SPECTRAL),
    ("bwr", BWR),
    ("seismic", SEISMIC),
    ("twilight_shifted", TWILIGHT_SHIFTED),
    ("gist_earth", GIST_EARTH),
    ("gist_stern", GIST_STERN),
    ("gnuplot", GNUPLOT),
    ("gnuplot2", GNUPLOT2),
    ("CMRmap", CMRMAP),
    ("cubehelix", CUBEHELIX),
    ("brg", BRG),
    ("gist_rainbow", GIST_RAINBOW),
    ("nipy_spectral", NIPY_SPECTRAL),
    ("gist_ncar", GIST_NCAR),
];

/// A named colormap, `colormap(name, t) -> RGB`
#[derive(Clone, Copy)]
pub struct Colormap {
    name: &'static str,
    stops: &'static [Stop],
}

impl Colormap {
    /// Look a colormap up by name (case-insensitive).
    pub fn by_name(name: &str) -> Result<Self> {
        let wanted = name.trim();
        TABLE
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(wanted))
            .map(|&(name, stops)| Self { name, stops })
            .ok_or_else(|| Error::UnknownColormap(name.to_string()))
    }

    /// All recognized colormap names, default first.
    pub fn names() -> impl Iterator<Item = &'static str> {
        TABLE.iter().map(|(n, _)| *n)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Sample at `t`. Values outside [0, 1] (and NaN) are clamped.
    pub fn sample(&self, t: f64) -> Color {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) as f32 };
        let stops = self.stops;
        let last = stops.len() - 1;

        // Find segment [i, i+1] with v_i <= t <= v_{i+1}
        let i = stops[..last]
            .iter()
            .rposition(|&(v, _)| v <= t)
            .unwrap_or(0);
        let (v0, c0) = stops[i];
        let (v1, c1) = stops[(i + 1).min(last)];
        let f = if v1 > v0 { (t - v0) / (v1 - v0) } else { 0.0 };

        let lerp = |a: u8, b: u8| (a as f32 + f * (b as f32 - a as f32)).round() as u8;
        image::Rgb([lerp(c0[0], c1[0]), lerp(c0[1], c1[1]), lerp(c0[2], c1[2])])
    }
}

impl Default for Colormap {
    fn default() -> Self {
        Self { name: "viridis", stops: VIRIDIS }
    }
}

impl PartialEq for Colormap {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl fmt::Debug for Colormap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Colormap").field(&self.name).finish()
    }
}

impl fmt::Display for Colormap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
