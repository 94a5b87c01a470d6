/// Axis-aligned bounding box in pixel coordinates of the source image.
/// Invariant (enforced by the normalizer): `x1 < x2` and `y1 < y2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl BoundingBox {
    pub fn width(&self) -> u32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> u32 {
        self.y2 - self.y1
    }
}

/// One localized defect reported by the detection capability, after
/// validation. Findings are ephemeral: they are consumed as an ordered
/// set and only a flattened summary of them is persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    pub class_name: String,
    /// Detector confidence in [0, 1].
    pub confidence: f32,
    pub bbox: BoundingBox,
}

impl Finding {
    /// Confidence as display text with two decimals, e.g. "41.98%".
    pub fn confidence_percent(&self) -> String {
        format!("{:.2}%", self.confidence * 100.0)
    }

    /// Label text drawn on the annotated image, whole-percent rounded.
    pub fn label(&self) -> String {
        format!("{} | {:.0}%", self.class_name, self.confidence * 100.0)
    }
}

/// Binary vehicle condition derived from the finding set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleStatus {
    Pass,
    Fail,
}

impl VehicleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleStatus::Pass => "pass",
            VehicleStatus::Fail => "fail",
        }
    }
}

impl std::fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for VehicleStatus {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pass" => Ok(VehicleStatus::Pass),
            "fail" => Ok(VehicleStatus::Fail),
            _ => Err(anyhow::anyhow!("Invalid vehicle status: {}", value)),
        }
    }
}

/// Opaque operator identity owned by the external identity provider.
/// The ledger stores this verbatim and never re-validates it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OperatorRef(String);

impl OperatorRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OperatorRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OperatorRef {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
