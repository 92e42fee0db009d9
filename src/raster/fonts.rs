use std::{borrow::Cow, path::Path};

use anyhow::Context;

use crate::foundation::{
    core::Rgba8,
    error::{StitchError, StitchResult},
};

/// A registered face: the family name parley resolves plus the lookup keys that reach it.
#[derive(Clone, Debug)]
pub struct FontFace {
    pub family: String,
    keys: Vec<String>,
}

/// Fonts available to text layers, keyed by family name.
///
/// Lookups ignore case, spaces and hyphens. An unknown family falls back to the first
/// registered face so a design never fails to render over a missing webfont.
pub struct FontBook {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<Rgba8>,
    faces: Vec<FontFace>,
}

impl Default for FontBook {
    fn default() -> Self {
        Self::new()
    }
}

impl FontBook {
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            faces: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn families(&self) -> impl Iterator<Item = &str> {
        self.faces.iter().map(|f| f.family.as_str())
    }

    /// Register every `.ttf`/`.otf` file in `dir`, in file-name order.
    ///
    /// The file stem is registered as an extra alias. Unreadable faces are skipped with a
    /// warning; returns the number registered.
    pub fn load_dir(&mut self, dir: &Path) -> StitchResult<usize> {
        let mut paths: Vec<_> = std::fs::read_dir(dir)
            .with_context(|| format!("read font dir '{}'", dir.display()))?
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| {
                p.extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| matches!(e.to_ascii_lowercase().as_str(), "ttf" | "otf"))
            })
            .collect();
        paths.sort();

        let mut loaded = 0;
        for path in paths {
            let alias = path.file_stem().and_then(|s| s.to_str()).map(str::to_string);
            let bytes = match std::fs::read(&path) {
                Ok(b) => b,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable font");
                    continue;
                }
            };
            match self.register(bytes, alias.as_deref()) {
                Ok(family) => {
                    tracing::debug!(path = %path.display(), %family, "registered font");
                    loaded += 1;
                }
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping font"),
            }
        }
        Ok(loaded)
    }

    /// Register raw font bytes, optionally under an extra alias. Returns the family name.
    pub fn register(&mut self, font_bytes: Vec<u8>, alias: Option<&str>) -> StitchResult<String> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            StitchError::validation("no font families registered from font bytes")
        })?;
        let family = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| StitchError::validation("registered font family has no name"))?
            .to_string();

        let mut keys = vec![font_key(&family)];
        if let Some(alias) = alias.map(font_key).filter(|k| !k.is_empty() && !keys.contains(k)) {
            keys.push(alias);
        }
        self.faces.push(FontFace {
            family: family.clone(),
            keys,
        });
        Ok(family)
    }

    /// Face for a CSS family name, or the first registered face.
    pub fn resolve(&self, family: &str) -> Option<&FontFace> {
        let key = font_key(family);
        self.faces
            .iter()
            .find(|f| f.keys.contains(&key))
            .or_else(|| self.faces.first())
    }

    /// Shape `text` in `family`, wrapping at `max_width_px`.
    ///
    /// Each glyph run carries the face parley picked for it, which may be a fallback face for
    /// characters the requested family lacks.
    pub fn layout(
        &mut self,
        text: &str,
        family: &str,
        size_px: f32,
        brush: Rgba8,
        max_width_px: Option<f32>,
    ) -> StitchResult<parley::Layout<Rgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(StitchError::validation(
                "text size_px must be finite and > 0",
            ));
        }
        let face = self
            .resolve(family)
            .ok_or_else(|| StitchError::rasterization("no fonts registered for text layers"))?;
        let family_name = face.family.clone();

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<Rgba8> = builder.build(text);
        layout.break_all_lines(max_width_px);
        if let Some(w) = max_width_px {
            layout.align(
                Some(w),
                parley::Alignment::Start,
                parley::AlignmentOptions::default(),
            );
        }
        Ok(layout)
    }
}

fn font_key(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/raster/fonts.rs"]
mod tests;
