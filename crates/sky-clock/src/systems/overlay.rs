//! HUD elements drawn over the canvas.
//!
//! The host owns the DOM nodes. The clock keeps their text, color and
//! placement here; the host reports back each element's rendered size so
//! centering can use it on the next tick.

use serde::Serialize;

use crate::api::config::FeatureSet;
use crate::api::types::Viewport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayId {
    Time,
    Date,
    Timezone,
    Coordinates,
    SunReadout,
    MoonReadout,
    FpsButton,
    PovButton,
}

impl OverlayId {
    pub const ALL: [OverlayId; 8] = [
        OverlayId::Time,
        OverlayId::Date,
        OverlayId::Timezone,
        OverlayId::Coordinates,
        OverlayId::SunReadout,
        OverlayId::MoonReadout,
        OverlayId::FpsButton,
        OverlayId::PovButton,
    ];

    pub fn index(self) -> u32 {
        self as u32
    }

    pub fn from_index(index: u32) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    pub fn is_button(self) -> bool {
        matches!(self, OverlayId::FpsButton | OverlayId::PovButton)
    }

    /// Vertical position as a fraction of the viewport height, for text rows.
    fn top_fraction(self) -> f32 {
        match self {
            OverlayId::Time => 0.08,
            OverlayId::Date => 0.2,
            OverlayId::Timezone | OverlayId::FpsButton | OverlayId::PovButton => 0.78,
            OverlayId::Coordinates => 0.85,
            OverlayId::SunReadout => 0.88,
            OverlayId::MoonReadout => 0.905,
        }
    }

    /// Font size in px as (landscape, portrait).
    fn font_px(self) -> (f32, f32) {
        match self {
            OverlayId::Time => (70.0, 47.0),
            OverlayId::Date | OverlayId::Timezone => (40.0, 27.0),
            OverlayId::Coordinates | OverlayId::SunReadout | OverlayId::MoonReadout => {
                (15.0, 10.0)
            }
            OverlayId::FpsButton | OverlayId::PovButton => (21.0, 14.0),
        }
    }
}

/// Button offset from center, in multiples of the timezone label width.
const BUTTON_SPREAD: f32 = 0.8;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayElement {
    pub id: OverlayId,
    pub text: String,
    pub color: String,
    pub font_size: f32,
    pub left: f32,
    pub top: f32,
    pub visible: bool,
    /// Buttons get a 2px border in the text color.
    pub bordered: bool,
    #[serde(skip)]
    measured: [f32; 2],
}

impl OverlayElement {
    fn new(id: OverlayId) -> Self {
        Self {
            id,
            text: String::new(),
            color: String::from("coral"),
            font_size: id.font_px().0,
            left: 0.0,
            top: 0.0,
            visible: true,
            bordered: id.is_button(),
            measured: [0.0, 0.0],
        }
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn set_color(&mut self, color: &str) {
        if self.color != color {
            self.color.clear();
            self.color.push_str(color);
        }
    }

    pub fn set_font_size(&mut self, px: f32) {
        self.font_size = px;
    }

    /// Rendered width and height, as last reported by the host.
    pub fn measured(&self) -> [f32; 2] {
        self.measured
    }
}

pub struct Overlay {
    elements: Vec<OverlayElement>,
}

impl Overlay {
    pub fn new(features: &FeatureSet) -> Self {
        let elements = OverlayId::ALL
            .iter()
            .map(|&id| {
                let mut el = OverlayElement::new(id);
                if id == OverlayId::PovButton {
                    el.visible = features.pov_toggle;
                }
                el
            })
            .collect();
        Self { elements }
    }

    pub fn get(&self, id: OverlayId) -> &OverlayElement {
        // Every id is created in `new`, in `ALL` order.
        &self.elements[id.index() as usize]
    }

    pub fn get_mut(&mut self, id: OverlayId) -> &mut OverlayElement {
        &mut self.elements[id.index() as usize]
    }

    pub fn set_measured(&mut self, id: OverlayId, width: f32, height: f32) {
        let sanitize = |v: f32| if v.is_finite() { v.max(0.0) } else { 0.0 };
        self.get_mut(id).measured = [sanitize(width), sanitize(height)];
    }

    /// Same color on every element.
    pub fn set_color_all(&mut self, color: &str) {
        for el in &mut self.elements {
            el.set_color(color);
        }
    }

    /// Responsive placement for the current viewport.
    ///
    /// Text rows are centered horizontally. The two buttons flank the
    /// timezone label, vertically centered on it.
    pub fn layout(&mut self, viewport: Viewport) {
        let landscape = viewport.is_landscape();
        let (w, h) = (viewport.width, viewport.height);
        let [tz_w, tz_h] = self.get(OverlayId::Timezone).measured;

        for el in &mut self.elements {
            let (font_l, font_p) = el.id.font_px();
            el.set_font_size(if landscape { font_l } else { font_p });

            let [mw, mh] = el.measured;
            let top = h * el.id.top_fraction();
            match el.id {
                OverlayId::FpsButton => {
                    el.left = w / 2.0 - mw / 2.0 - tz_w * BUTTON_SPREAD;
                    el.top = top - mh / 2.0 + tz_h / 2.0;
                }
                OverlayId::PovButton => {
                    el.left = w / 2.0 - mw / 2.0 + tz_w * BUTTON_SPREAD;
                    el.top = top - mh / 2.0 + tz_h / 2.0;
                }
                _ => {
                    el.left = w / 2.0 - mw / 2.0;
                    el.top = top;
                }
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &OverlayElement> {
        self.elements.iter()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.elements)
    }
}
