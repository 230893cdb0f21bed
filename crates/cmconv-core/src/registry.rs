//! Static catalog of the color models the conversion service understands.

use serde::Serialize;

use crate::error::ConvertError;

/// One tunable numeric input of a color model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParameterSpec {
    /// Wire key (`param1`..`param4`). Unique within a model only.
    pub key: &'static str,
    /// What the key means under its owning model.
    pub label: &'static str,
    pub default: f64,
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl ParameterSpec {
    const fn new(
        key: &'static str,
        label: &'static str,
        default: f64,
        min: f64,
        max: f64,
        step: f64,
    ) -> Self {
        Self {
            key,
            label,
            default,
            min,
            max,
            step,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }

    /// Pin a value into `[min, max]`. NaN maps to the default.
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.default;
        }
        value.clamp(self.min, self.max)
    }

    /// Snap to the nearest multiple of `step` counted from `min`, then clamp.
    pub fn quantize(&self, value: f64) -> f64 {
        let clamped = self.clamp(value);
        let steps = ((clamped - self.min) / self.step).round();
        // Round away float noise so 0.1 + 3 * 0.01 prints as 0.13.
        let snapped = (self.min + steps * self.step) * 1e9;
        self.clamp(snapped.round() / 1e9)
    }

    /// Decimal places worth showing for this spec's step.
    pub fn display_precision(&self) -> usize {
        let mut precision = 0;
        let mut step = self.step;
        while precision < 6 && (step - step.round()).abs() > 1e-9 {
            step *= 10.0;
            precision += 1;
        }
        precision
    }
}

/// Identifies one color model and its parameter schema.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColorModelDefinition {
    pub id: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub parameters: &'static [ParameterSpec],
}

impl ColorModelDefinition {
    pub fn parameter(&self, key: &str) -> Option<&'static ParameterSpec> {
        self.parameters.iter().find(|spec| spec.key == key)
    }
}

const GRAYSCALE_PARAMS: &[ParameterSpec] = &[
    ParameterSpec::new("param1", "Red weight", 0.299, 0.0, 1.0, 0.001),
    ParameterSpec::new("param2", "Green weight", 0.587, 0.0, 1.0, 0.001),
    ParameterSpec::new("param3", "Blue weight", 0.114, 0.0, 1.0, 0.001),
    ParameterSpec::new("param4", "Output gain", 1.0, 0.0, 2.0, 0.01),
];

const HSV_PARAMS: &[ParameterSpec] = &[
    ParameterSpec::new("param1", "Hue shift", 0.0, 0.0, 1.0, 0.01),
    ParameterSpec::new("param2", "Saturation", 1.0, 0.0, 2.0, 0.01),
    ParameterSpec::new("param3", "Value", 1.0, 0.0, 2.0, 0.01),
];

const CMYK_PARAMS: &[ParameterSpec] = &[
    ParameterSpec::new("param1", "Cyan", 1.0, 0.0, 2.0, 0.01),
    ParameterSpec::new("param2", "Magenta", 1.0, 0.0, 2.0, 0.01),
    ParameterSpec::new("param3", "Yellow", 1.0, 0.0, 2.0, 0.01),
    ParameterSpec::new("param4", "Key (black)", 1.0, 0.0, 2.0, 0.01),
];

const YIQ_PARAMS: &[ParameterSpec] = &[
    ParameterSpec::new("param1", "Y (luma)", 1.0, 0.0, 2.0, 0.01),
    ParameterSpec::new("param2", "I (in-phase)", 1.0, 0.0, 2.0, 0.01),
    ParameterSpec::new("param3", "Q (quadrature)", 1.0, 0.0, 2.0, 0.01),
];

const YUV_PARAMS: &[ParameterSpec] = &[
    ParameterSpec::new("param1", "Y (luma)", 1.0, 0.0, 2.0, 0.01),
    ParameterSpec::new("param2", "U (blue difference)", 1.0, 0.0, 2.0, 0.01),
    ParameterSpec::new("param3", "V (red difference)", 1.0, 0.0, 2.0, 0.01),
];

const YCBCR_PARAMS: &[ParameterSpec] = &[
    ParameterSpec::new("param1", "Y (luma)", 1.0, 0.0, 2.0, 0.01),
    ParameterSpec::new("param2", "Cb (blue chroma)", 1.0, 0.0, 2.0, 0.01),
    ParameterSpec::new("param3", "Cr (red chroma)", 1.0, 0.0, 2.0, 0.01),
];

const GAMMA_PARAMS: &[ParameterSpec] = &[ParameterSpec::new(
    "param1", "Gamma", 1.0, 0.1, 3.0, 0.01,
)];

/// Registry contents in display order. The first entry is the startup model.
pub const BUILTIN_MODELS: &[ColorModelDefinition] = &[
    ColorModelDefinition {
        id: "grayscale",
        display_name: "Grayscale",
        description: "Collapses the image to shades of gray by weighting the red, green and blue \
                      channels and summing them into one intensity. The default weights \
                      (0.299, 0.587, 0.114) follow how bright each primary looks to the human eye.",
        parameters: GRAYSCALE_PARAMS,
    },
    ColorModelDefinition {
        id: "hsv",
        display_name: "HSV (Hue, Saturation, Value)",
        description: "A cylindrical remapping of RGB. Hue is the kind of color (0 to 360 degrees, \
                      shifted here as a fraction of a full turn), saturation is how intense it is \
                      and value is how bright it is. Common in color pickers and photo editors.",
        parameters: HSV_PARAMS,
    },
    ColorModelDefinition {
        id: "cmyk",
        display_name: "CMYK (Cyan, Magenta, Yellow, Key)",
        description: "The subtractive model used in print. Cyan absorbs red, magenta absorbs green \
                      and yellow absorbs blue; the key (black) plate adds contrast and saves ink.",
        parameters: CMYK_PARAMS,
    },
    ColorModelDefinition {
        id: "yiq",
        display_name: "YIQ",
        description: "The NTSC broadcast encoding. Y carries luminance while I and Q carry the \
                      orange-blue and purple-green chrominance axes.",
        parameters: YIQ_PARAMS,
    },
    ColorModelDefinition {
        id: "yuv",
        display_name: "YUV",
        description: "Separates luminance (Y) from two color differences: U is blue minus luma and \
                      V is red minus luma. Designed so black and white receivers could ignore the \
                      color signal.",
        parameters: YUV_PARAMS,
    },
    ColorModelDefinition {
        id: "ycbcr",
        display_name: "YCbCr",
        description: "The digital sibling of YUV used by JPEG and digital video. Cb and Cr are the \
                      blue and red chroma differences, which is what chroma subsampling thins out.",
        parameters: YCBCR_PARAMS,
    },
    ColorModelDefinition {
        id: "srgb",
        display_name: "sRGB (Standard RGB)",
        description: "The default color space of the web, most monitors and most cameras. Its \
                      transfer curve maps stored values to displayed light intensity; the gamma \
                      control scales that curve.",
        parameters: GAMMA_PARAMS,
    },
    ColorModelDefinition {
        id: "adobergb",
        display_name: "Adobe RGB",
        description: "Adobe's 1998 working space with a wider gamut than sRGB, mostly in the \
                      cyan-greens. Uses a 2.2 gamma and is common in professional photography \
                      and print workflows.",
        parameters: GAMMA_PARAMS,
    },
];

/// Read-only catalog of color models.
#[derive(Debug, Clone, Copy)]
pub struct ColorModelRegistry {
    models: &'static [ColorModelDefinition],
}

impl ColorModelRegistry {
    /// The registry shipped with the application.
    pub const fn builtin() -> Self {
        Self {
            models: BUILTIN_MODELS,
        }
    }

    pub fn list_models(&self) -> &'static [ColorModelDefinition] {
        self.models
    }

    pub fn get_model(&self, id: &str) -> Result<&'static ColorModelDefinition, ConvertError> {
        self.models
            .iter()
            .find(|model| model.id == id)
            .ok_or_else(|| ConvertError::not_found(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.models.iter().any(|model| model.id == id)
    }

    pub fn default_model(&self) -> &'static ColorModelDefinition {
        &self.models[0]
    }

    pub fn ids(&self) -> impl Iterator<Item = &'static str> {
        self.models.iter().map(|model| model.id)
    }
}

impl Default for ColorModelRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
