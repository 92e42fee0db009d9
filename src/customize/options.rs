/// A selectable font family offered by the customizer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FontOption {
    pub id: &'static str,
    pub name: &'static str,
    /// CSS family name stored on text layers and sent on the wire.
    pub value: &'static str,
}

/// A selectable text color offered by the customizer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorOption {
    pub id: &'static str,
    pub name: &'static str,
    pub value: &'static str,
}

pub const DEFAULT_FONT_FAMILY: &str = "Story Script";
pub const DEFAULT_TEXT_COLOR: &str = "black";

pub static FONT_OPTIONS: [FontOption; 5] = [
    FontOption {
        id: "story",
        name: "Story Script",
        value: "Story Script",
    },
    FontOption {
        id: "monsieur",
        name: "Monsieur",
        value: "Monsieur La Doulaise",
    },
    FontOption {
        id: "michroma",
        name: "Michroma",
        value: "Michroma",
    },
    FontOption {
        id: "vidaloka",
        name: "Vidaloka",
        value: "Vidaloka",
    },
    FontOption {
        id: "manrope",
        name: "Manrope",
        value: "Manrope",
    },
];

pub static COLOR_OPTIONS: [ColorOption; 5] = [
    ColorOption {
        id: "black",
        name: "Black",
        value: "black",
    },
    ColorOption {
        id: "red",
        name: "Red",
        value: "red",
    },
    ColorOption {
        id: "blue",
        name: "Blue",
        value: "blue",
    },
    ColorOption {
        id: "green",
        name: "Green",
        value: "green",
    },
    ColorOption {
        id: "purple",
        name: "Purple",
        value: "purple",
    },
];

#[cfg(test)]
#[path = "../../tests/unit/customize/options.rs"]
mod tests;
