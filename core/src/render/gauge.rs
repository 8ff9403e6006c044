/// Bar gauge with a fixed `[0, max]` display range.
#[derive(Debug, Clone, PartialEq)]
pub struct Gauge {
    pub title: &'static str,
    pub max: f32,
}

/// Clamped value ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeReading {
    pub title: &'static str,
    pub max: f32,
    pub value: f32,
}

impl Gauge {
    pub fn new(title: &'static str, max: f32) -> Self {
        Self {
            title,
            max: max.max(0.0),
        }
    }

    /// Clamps `raw` into range; non-finite input reads as zero.
    pub fn reading(&self, raw: f32) -> GaugeReading {
        let value = if raw.is_finite() {
            raw.clamp(0.0, self.max)
        } else {
            0.0
        };
        GaugeReading {
            title: self.title,
            max: self.max,
            value,
        }
    }
}

impl GaugeReading {
    /// Whole units, truncated so a reading never shows the next integer up.
    pub fn text(&self) -> String {
        format!("{}", self.value.trunc() as i64)
    }
}
