//! The fixed list of report fields.
//!
//! Each [`FieldSpec`] names where a value comes from, whether the report can
//! be produced without it, and how it is rendered. [`FIELD_SPECS`] is the
//! complete list in report order; the pipeline in [`crate::report`] walks it
//! front to back.
//!
//! | Component Name | Source | Presence | Rendering |
//! |----------------|--------|----------|-----------|
//! | Voltage | `f32` @ `ImageInfo/Voltage` | required | 0 decimals |
//! | Power | `f32` @ `AcquisitionSettings/SrcPower` | required | 0 decimals |
//! | Source Filter | text @ `AcquisitionSettings/SourceFilterName` | required | verbatim |
//! | Frames per image | `i32` @ `AcquisitionSettings/FramesPerImage` | required | 0 decimals |
//! | Exposure time | `f32` @ `AcquisitionSettings/ExpTime` | required | 1 decimal |
//! | Objective | text @ `ImageInfo/ObjectiveName` | required | verbatim |
//! | Binning | `i32` @ `AcquisitionSettings/Binning` | required | 0 decimals |
//! | Number of stitches | `i32` @ `AcquisitionSettings/StitchParams/AutoStitchSettings/NumSegments` | default 1 | 0 decimals |
//! | Projections | `i32` @ `ImageInfo/NoOfImages` | required | 0 decimals |
//! | Pixel Size | `f32` @ `ImageInfo/PixelSize` | required | 2 decimals |
//! | Scan Time | dates @ `ImageInfo/Date` | required | hours, 2 decimals |
//! | Alignment time | report parameter | always | 0 decimals |
//! | Beam Hardening | `f32` @ `ReconSettings/BeamHardening` | required | 2 decimals |
//! | VLT Correction | text @ `ReconSettings/BeamHardeningFileName` | required | `TRUE`/`FALSE` |
//! | Processing Time | report parameter | always | 0 decimals |
//!
//! Numbers are rendered with Rust's `{:.N}` formatting, which rounds the
//! exact binary value half to even: `0.5` becomes `0`, `1.5` and `2.5`
//! both become `2`.

use std::fmt;

use chrono::Duration;

/// Beam-hardening file name that marks a Very Low Transmission correction.
pub const VLT_CORRECTION_NAME: &str = "BH Correction for Very Low Transmission";

/// Where a field's value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSource {
    /// First `f32` of the stream at the path
    Float(&'static str),
    /// First `i32` of the stream at the path
    Int(&'static str),
    /// NUL-terminated ASCII text at the path
    Text(&'static str),
    /// Duration between first and last timestamp at the path
    DateRange(&'static str),
    /// Caller-supplied alignment time
    AlignmentTime,
    /// Caller-supplied processing time
    ProcessingTime,
}

impl FieldSource {
    /// Container path read by this source, if any.
    pub fn path(&self) -> Option<&'static str> {
        match self {
            FieldSource::Float(p)
            | FieldSource::Int(p)
            | FieldSource::Text(p)
            | FieldSource::DateRange(p) => Some(*p),
            FieldSource::AlignmentTime | FieldSource::ProcessingTime => None,
        }
    }
}

/// Whether a report can be produced without the field.
#[derive(Debug, Clone, PartialEq)]
pub enum Presence {
    /// Missing value aborts the whole extraction
    Required,
    /// Missing value is replaced and the row is still emitted
    OptionalWithDefault(FieldValue),
}

/// How a value is rendered into the `Value` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldFormat {
    /// Fixed number of decimals
    Decimals(usize),
    /// Text as read
    Verbatim,
    /// Duration in hours with a fixed number of decimals
    Hours(usize),
    /// `TRUE` if the text equals the given string exactly, else `FALSE`
    FlagIfEquals(&'static str),
}

/// A decoded field value, before rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Single-precision number
    Float(f32),
    /// Integer (container `i32` or caller parameter)
    Int(i64),
    /// ASCII text
    Text(String),
    /// Elapsed time
    Duration(Duration),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Float(v) => write!(f, "{}", v),
            FieldValue::Int(v) => write!(f, "{}", v),
            FieldValue::Text(v) => f.write_str(v),
            FieldValue::Duration(d) => write!(f, "{} s", d.num_seconds()),
        }
    }
}

/// Descriptor for one report row.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    /// Component Name written to the report
    pub label: &'static str,
    /// Where the value comes from
    pub source: FieldSource,
    /// Required or defaulted
    pub presence: Presence,
    /// Rendering rule
    pub format: FieldFormat,
    /// Unit shown in the feedback trail
    pub unit: Option<&'static str>,
}

impl FieldSpec {
    const fn required(
        label: &'static str,
        source: FieldSource,
        format: FieldFormat,
        unit: Option<&'static str>,
    ) -> Self {
        Self {
            label,
            source,
            presence: Presence::Required,
            format,
            unit,
        }
    }

    /// Render a value into the `Value` column.
    pub fn render(&self, value: &FieldValue) -> String {
        self.format.render(value)
    }
}

impl FieldFormat {
    /// Render `value` according to this rule.
    pub fn render(&self, value: &FieldValue) -> String {
        match (self, value) {
            (FieldFormat::Decimals(n), FieldValue::Float(v)) => format!("{:.*}", *n, v),
            (FieldFormat::Decimals(0), FieldValue::Int(v)) => v.to_string(),
            (FieldFormat::Decimals(n), FieldValue::Int(v)) => format!("{:.*}", *n, *v as f64),
            (FieldFormat::Hours(n), FieldValue::Duration(d)) => {
                format!("{:.*}", *n, d.num_seconds() as f64 / 3600.0)
            }
            (FieldFormat::FlagIfEquals(expected), FieldValue::Text(v)) => {
                let flag = if v.as_str() == *expected { "TRUE" } else { "FALSE" };
                flag.to_string()
            }
            (FieldFormat::FlagIfEquals(_), _) => "FALSE".to_string(),
            (_, other) => other.to_string(),
        }
    }
}

/// All report fields, in report order.
pub static FIELD_SPECS: [FieldSpec; 15] = [
    FieldSpec::required(
        "Voltage",
        FieldSource::Float("ImageInfo/Voltage"),
        FieldFormat::Decimals(0),
        Some("kV"),
    ),
    FieldSpec::required(
        "Power",
        FieldSource::Float("AcquisitionSettings/SrcPower"),
        FieldFormat::Decimals(0),
        Some("W"),
    ),
    FieldSpec::required(
        "Source Filter",
        FieldSource::Text("AcquisitionSettings/SourceFilterName"),
        FieldFormat::Verbatim,
        None,
    ),
    FieldSpec::required(
        "Frames per image",
        FieldSource::Int("AcquisitionSettings/FramesPerImage"),
        FieldFormat::Decimals(0),
        None,
    ),
    FieldSpec::required(
        "Exposure time",
        FieldSource::Float("AcquisitionSettings/ExpTime"),
        FieldFormat::Decimals(1),
        Some("s"),
    ),
    FieldSpec::required(
        "Objective",
        FieldSource::Text("ImageInfo/ObjectiveName"),
        FieldFormat::Verbatim,
        None,
    ),
    FieldSpec::required(
        "Binning",
        FieldSource::Int("AcquisitionSettings/Binning"),
        FieldFormat::Decimals(0),
        None,
    ),
    FieldSpec {
        label: "Number of stitches",
        source: FieldSource::Int("AcquisitionSettings/StitchParams/AutoStitchSettings/NumSegments"),
        presence: Presence::OptionalWithDefault(FieldValue::Int(1)),
        format: FieldFormat::Decimals(0),
        unit: None,
    },
    FieldSpec::required(
        "Projections",
        FieldSource::Int("ImageInfo/NoOfImages"),
        FieldFormat::Decimals(0),
        None,
    ),
    FieldSpec::required(
        "Pixel Size",
        FieldSource::Float("ImageInfo/PixelSize"),
        FieldFormat::Decimals(2),
        Some("um"),
    ),
    FieldSpec::required(
        "Scan Time",
        FieldSource::DateRange("ImageInfo/Date"),
        FieldFormat::Hours(2),
        Some("h"),
    ),
    FieldSpec::required(
        "Alignment time",
        FieldSource::AlignmentTime,
        FieldFormat::Decimals(0),
        None,
    ),
    FieldSpec::required(
        "Beam Hardening",
        FieldSource::Float("ReconSettings/BeamHardening"),
        FieldFormat::Decimals(2),
        None,
    ),
    FieldSpec::required(
        "VLT Correction",
        FieldSource::Text("ReconSettings/BeamHardeningFileName"),
        FieldFormat::FlagIfEquals(VLT_CORRECTION_NAME),
        None,
    ),
    FieldSpec::required(
        "Processing Time",
        FieldSource::ProcessingTime,
        FieldFormat::Decimals(0),
        None,
    ),
];

/// Look up a field by its Component Name.
pub fn field_by_label(label: &str) -> Option<&'static FieldSpec> {
    FIELD_SPECS.iter().find(|spec| spec.label == label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_order() {
        let labels: Vec<&str> = FIELD_SPECS.iter().map(|s| s.label).collect();
        assert_eq!(
            labels,
            vec![
                "Voltage",
                "Power",
                "Source Filter",
                "Frames per image",
                "Exposure time",
                "Objective",
                "Binning",
                "Number of stitches",
                "Projections",
                "Pixel Size",
                "Scan Time",
                "Alignment time",
                "Beam Hardening",
                "VLT Correction",
                "Processing Time",
            ]
        );
    }

    #[test]
    fn test_only_stitches_is_optional() {
        let optional: Vec<&str> = FIELD_SPECS
            .iter()
            .filter(|s| s.presence != Presence::Required)
            .map(|s| s.label)
            .collect();
        assert_eq!(optional, vec!["Number of stitches"]);
    }

    #[test]
    fn test_zero_decimals_rounds_half_to_even() {
        let fmt = FieldFormat::Decimals(0);
        assert_eq!(fmt.render(&FieldValue::Float(0.5)), "0");
        assert_eq!(fmt.render(&FieldValue::Float(1.5)), "2");
        assert_eq!(fmt.render(&FieldValue::Float(2.5)), "2");
        assert_eq!(fmt.render(&FieldValue::Float(90.5)), "90");
        assert_eq!(fmt.render(&FieldValue::Float(91.5)), "92");
    }

    #[test]
    fn test_rounding_not_truncation() {
        let fmt = FieldFormat::Decimals(0);
        assert_eq!(fmt.render(&FieldValue::Float(90.3)), "90");
        assert_eq!(fmt.render(&FieldValue::Float(89.7)), "90");
        assert_eq!(fmt.render(&FieldValue::Float(-0.7)), "-1");
    }

    #[test]
    fn test_decimals() {
        assert_eq!(FieldFormat::Decimals(1).render(&FieldValue::Float(2.0)), "2.0");
        assert_eq!(FieldFormat::Decimals(2).render(&FieldValue::Float(0.7)), "0.70");
        assert_eq!(FieldFormat::Decimals(0).render(&FieldValue::Int(-4)), "-4");
        assert_eq!(FieldFormat::Decimals(2).render(&FieldValue::Int(3)), "3.00");
    }

    #[test]
    fn test_hours() {
        let fmt = FieldFormat::Hours(2);
        assert_eq!(fmt.render(&FieldValue::Duration(Duration::seconds(5400))), "1.50");
        assert_eq!(fmt.render(&FieldValue::Duration(Duration::seconds(60))), "0.02");
    }

    #[test]
    fn test_vlt_flag_exact_match() {
        let fmt = FieldFormat::FlagIfEquals(VLT_CORRECTION_NAME);
        let flag = |s: &str| fmt.render(&FieldValue::Text(s.to_string()));

        assert_eq!(flag("BH Correction for Very Low Transmission"), "TRUE");
        assert_eq!(flag("BH Correction for Very Low Transmission "), "FALSE");
        assert_eq!(flag("bh correction for very low transmission"), "FALSE");
        assert_eq!(flag("Standard BH"), "FALSE");
        assert_eq!(flag(""), "FALSE");
    }

    #[test]
    fn test_field_by_label() {
        let spec = field_by_label("Pixel Size").unwrap();
        assert_eq!(spec.source.path(), Some("ImageInfo/PixelSize"));
        assert!(field_by_label("Current").is_none());
    }
}
