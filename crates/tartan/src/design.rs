//! A saved tartan: both warps, the palette and the editor settings.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TartanError};
use crate::loom::{MAX_BORDER_THICKNESS, MAX_THREAD_SIZE, MIN_THREAD_SIZE};
use crate::palette::{Colour, ColourIndex, Palette, SWATCH_COUNT, Swatch};
use crate::warp::{INIT_THREAD_COUNT, MAX_THREAD_COUNT, MAX_THREADS_PER_CLICK, MIN_THREAD_COUNT};

/// Everything needed to restore an editing session.
///
/// Stored as `settings.json` in the design directory. Fields added after
/// the first release carry serde defaults so older files still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Design {
    /// Row pattern, one swatch index per thread
    pub rows: Vec<ColourIndex>,
    /// Column pattern, one swatch index per thread
    pub columns: Vec<ColourIndex>,
    pub selected: ColourIndex,
    pub swatches: Vec<Swatch>,
    pub duplicate: bool,
    pub show_guide: bool,
    pub guide_colour: Colour,
    pub thread_size: f64,
    pub border_thickness: f64,
    #[serde(default = "default_thread_count")]
    pub thread_count: usize,
}

fn default_thread_count() -> usize {
    1
}

impl Default for Design {
    fn default() -> Self {
        Self {
            rows: vec![0; INIT_THREAD_COUNT],
            columns: vec![0; INIT_THREAD_COUNT],
            selected: 1,
            swatches: Palette::default().swatches().to_vec(),
            duplicate: true,
            show_guide: true,
            guide_colour: Colour::RED,
            thread_size: 6.0,
            border_thickness: 1.0,
            thread_count: default_thread_count(),
        }
    }
}

impl Design {
    /// Check the constraints serde cannot express.
    pub fn validate(&self) -> Result<()> {
        for (name, list) in [("row", &self.rows), ("column", &self.columns)] {
            if !(MIN_THREAD_COUNT..=MAX_THREAD_COUNT).contains(&list.len()) {
                return Err(TartanError::invalid_design(format!(
                    "{} list has {} threads, expected {}..={}",
                    name,
                    list.len(),
                    MIN_THREAD_COUNT,
                    MAX_THREAD_COUNT
                )));
            }
            if let Some(bad) = list.iter().find(|&&index| index >= SWATCH_COUNT) {
                return Err(TartanError::invalid_design(format!(
                    "{} list uses swatch {}, palette has {}",
                    name, bad, SWATCH_COUNT
                )));
            }
        }

        // Duplicate mode edits both axes at the same position.
        if self.duplicate && self.rows != self.columns {
            return Err(TartanError::invalid_design(
                "duplicate is set but rows and columns differ",
            ));
        }

        if self.selected >= SWATCH_COUNT {
            return Err(TartanError::invalid_design(format!(
                "selected swatch {} out of range",
                self.selected
            )));
        }
        if self.swatches.len() > SWATCH_COUNT {
            return Err(TartanError::invalid_design(format!(
                "{} swatches, at most {} allowed",
                self.swatches.len(),
                SWATCH_COUNT
            )));
        }
        if !(MIN_THREAD_SIZE..=MAX_THREAD_SIZE).contains(&self.thread_size) {
            return Err(TartanError::invalid_design(format!(
                "thread size {} outside {}..={}",
                self.thread_size, MIN_THREAD_SIZE, MAX_THREAD_SIZE
            )));
        }
        if !(0.0..=MAX_BORDER_THICKNESS).contains(&self.border_thickness) {
            return Err(TartanError::invalid_design(format!(
                "border thickness {} outside 0..={}",
                self.border_thickness, MAX_BORDER_THICKNESS
            )));
        }
        if !(1..=MAX_THREADS_PER_CLICK).contains(&self.thread_count) {
            return Err(TartanError::invalid_design(format!(
                "thread count {} outside 1..={}",
                self.thread_count, MAX_THREADS_PER_CLICK
            )));
        }
        Ok(())
    }

    /// The stored swatches as a full palette.
    pub fn palette(&self) -> Palette {
        Palette::from_swatches(&self.swatches)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and validate.
    pub fn from_json(json: &str) -> Result<Self> {
        let design: Design = serde_json::from_str(json)?;
        design.validate()?;
        Ok(design)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let design = Design::default();
        design.validate().unwrap();
        assert_eq!(design.rows.len(), 114);
        assert_eq!(design.palette(), Palette::default());
    }

    #[test]
    fn json_round_trip() {
        let mut design = Design::default();
        design.rows[3] = 5;
        design.columns[3] = 5;
        design.guide_colour = Colour::BLUE;
        let json = design.to_json().unwrap();
        assert!(json.contains("\"#0000ff\""));
        assert_eq!(Design::from_json(&json).unwrap(), design);
    }

    #[test]
    fn missing_thread_count_defaults() {
        let mut value = serde_json::to_value(Design::default()).unwrap();
        value.as_object_mut().unwrap().remove("thread_count");
        let design: Design = serde_json::from_value(value).unwrap();
        assert_eq!(design.thread_count, 1);
    }

    #[test]
    fn rejects_out_of_range_swatch() {
        let mut design = Design::default();
        design.columns[0] = SWATCH_COUNT;
        let err = design.validate().unwrap_err();
        assert!(err.to_string().contains("column list"));
    }

    #[test]
    fn rejects_empty_and_oversized_lists() {
        let mut design = Design {
            duplicate: false,
            ..Design::default()
        };
        design.rows.clear();
        assert!(design.validate().is_err());
        design.rows = vec![0; MAX_THREAD_COUNT + 1];
        assert!(design.validate().is_err());
    }

    #[test]
    fn rejects_lists_below_the_warp_minimum() {
        let mut design = Design {
            duplicate: false,
            ..Design::default()
        };
        design.rows = vec![0; MIN_THREAD_COUNT - 1];
        let err = design.validate().unwrap_err();
        assert!(err.to_string().contains("row list has 19 threads"));

        design.rows = vec![0; MIN_THREAD_COUNT];
        design.validate().unwrap();
    }

    #[test]
    fn duplicate_requires_matching_axes() {
        let mut design = Design::default();
        design.columns[7] = 3;
        let err = design.validate().unwrap_err();
        assert!(err.to_string().contains("rows and columns differ"));

        design.duplicate = false;
        design.validate().unwrap();

        design.duplicate = true;
        design.rows[7] = 3;
        design.validate().unwrap();
    }

    #[test]
    fn rejects_bad_settings() {
        let bad = [
            Design { thread_size: 1.0, ..Design::default() },
            Design { border_thickness: 11.0, ..Design::default() },
            Design { thread_count: 0, ..Design::default() },
            Design { selected: 8, ..Design::default() },
        ];
        for design in bad {
            assert!(design.validate().is_err(), "{:?} accepted", design.thread_size);
        }
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            Design::from_json("{ not json"),
            Err(TartanError::Json(_))
        ));
    }
}
