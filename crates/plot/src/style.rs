/// An opaque sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLUE: Self = Self(0, 0, 255);
    pub const BLACK: Self = Self(0, 0, 0);
    pub const CYAN: Self = Self(0, 191, 191);
    pub const MAGENTA: Self = Self(191, 0, 191);
    pub const YELLOW: Self = Self(191, 191, 0);
    pub const RED: Self = Self(255, 0, 0);
    pub const GRAY: Self = Self(128, 128, 128);
}

/// Marker drawn at every trajectory point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Circle,
    Cross,
}

/// How one trial's trajectory is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialStyle {
    pub color: Rgb,
    pub marker: Marker,
}

impl TrialStyle {
    const COLORS: [Rgb; 5] = [Rgb::BLUE, Rgb::BLACK, Rgb::CYAN, Rgb::MAGENTA, Rgb::YELLOW];
    const MARKERS: [Marker; 2] = [Marker::Circle, Marker::Cross];

    /// Colour used for the final point of every trajectory.
    pub const FINAL: Rgb = Rgb::RED;

    /// Returns the style for the zero-based trial `index`.
    ///
    /// Colours cycle every five trials and markers alternate every five, so
    /// the first ten trials are all distinct.
    #[must_use]
    pub fn for_trial(index: usize) -> Self {
        Self {
            color: Self::COLORS[index % Self::COLORS.len()],
            marker: Self::MARKERS[(index / Self::COLORS.len()) % Self::MARKERS.len()],
        }
    }
}
