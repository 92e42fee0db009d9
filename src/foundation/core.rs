use crate::foundation::error::{StitchError, StitchResult};

pub use kurbo::{Affine, Point, Rect, Size, Vec2};

/// One printable face of a garment.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Front face.
    Front,
    /// Back face.
    Back,
}

impl Side {
    /// Both sides in rasterization order (front always precedes back).
    pub const ALL: [Side; 2] = [Side::Front, Side::Back];

    /// Lowercase wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Front => "front",
            Side::Back => "back",
        }
    }

    /// The opposite face.
    pub fn other(self) -> Side {
        match self {
            Side::Front => Side::Back,
            Side::Back => Side::Front,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Side {
    type Err = StitchError;

    fn from_str(s: &str) -> StitchResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "front" => Ok(Side::Front),
            "back" => Ok(Side::Back),
            other => Err(StitchError::validation(format!("unknown side '{other}'"))),
        }
    }
}

/// Which sides a submission covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SideSelection {
    /// Only the front was customized.
    Front,
    /// Only the back was customized.
    Back,
    /// Both faces were customized.
    Both,
}

impl SideSelection {
    /// `None` when neither side qualifies.
    pub fn from_flags(front: bool, back: bool) -> Option<Self> {
        match (front, back) {
            (true, true) => Some(Self::Both),
            (true, false) => Some(Self::Front),
            (false, true) => Some(Self::Back),
            (false, false) => None,
        }
    }

    /// Whether `side` is part of the selection.
    pub fn includes(self, side: Side) -> bool {
        match self {
            Self::Both => true,
            Self::Front => side == Side::Front,
            Self::Back => side == Side::Back,
        }
    }

    /// Selected sides in rasterization order.
    pub fn sides(self) -> impl Iterator<Item = Side> {
        Side::ALL.into_iter().filter(move |s| self.includes(*s))
    }
}

/// Per-side storage with no shared state between faces.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SideMap<T> {
    /// Front value.
    pub front: T,
    /// Back value.
    pub back: T,
}

impl<T> SideMap<T> {
    /// Borrow the value for `side`.
    pub fn get(&self, side: Side) -> &T {
        match side {
            Side::Front => &self.front,
            Side::Back => &self.back,
        }
    }

    /// Mutably borrow the value for `side`.
    pub fn get_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Front => &mut self.front,
            Side::Back => &mut self.back,
        }
    }
}

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const WHITE: Rgba8 = Rgba8::opaque(255, 255, 255);
    pub const BLACK: Rgba8 = Rgba8::opaque(0, 0, 0);

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse a CSS named color (the subset offered by the customizer) or `#rrggbb[aa]`.
    pub fn parse_css(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex);
        }
        match s.to_ascii_lowercase().as_str() {
            "black" => Some(Self::BLACK),
            "white" => Some(Self::WHITE),
            "red" => Some(Self::opaque(255, 0, 0)),
            "blue" => Some(Self::opaque(0, 0, 255)),
            "green" => Some(Self::opaque(0, 128, 0)),
            "purple" => Some(Self::opaque(128, 0, 128)),
            _ => None,
        }
    }

    /// Premultiplied channel bytes.
    pub fn to_premul(self) -> [u8; 4] {
        fn premul(c: u8, a: u8) -> u8 {
            ((u16::from(c) * u16::from(a) + 127) / 255) as u8
        }
        [
            premul(self.r, self.a),
            premul(self.g, self.a),
            premul(self.b, self.a),
            self.a,
        ]
    }
}

fn parse_hex(hex: &str) -> Option<Rgba8> {
    let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    match hex.len() {
        6 => Some(Rgba8::opaque(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Rgba8 {
            r: byte(0)?,
            g: byte(2)?,
            b: byte(4)?,
            a: byte(6)?,
        }),
        _ => None,
    }
}

/// Clamp a percentage coordinate into `[0, 100]`; non-finite input snaps to the center.
pub fn clamp_percent(v: f64) -> f64 {
    if v.is_finite() { v.clamp(0.0, 100.0) } else { 50.0 }
}

/// Format a money amount with two decimals behind a currency icon.
pub fn format_money(icon: &str, amount: f64) -> String {
    format!("{icon}{amount:.2}")
}
