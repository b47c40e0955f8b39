//! Target code sets for evaluation and procedure volume

/// Evaluation & management codes whose mix defines the undercoding ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvalCode {
    NewPatientLevel3,
    EstablishedLevel3,
    NewPatientLevel4,
    NewPatientLevel5,
    EstablishedLevel4,
    EstablishedLevel5,
}

/// Complexity band of an evaluation code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalLevel {
    Level3,
    Level4Or5,
}

/// Low-complexity evaluation codes
pub const LEVEL_3_CODES: [&str; 2] = ["99203", "99213"];
/// High-complexity evaluation codes
pub const LEVEL_4_5_CODES: [&str; 4] = ["99204", "99205", "99214", "99215"];

/// Inclusive numeric range of procedure codes
pub const PROCEDURE_CODE_RANGE: std::ops::RangeInclusive<u32> = 10_000..=69_999;

impl EvalCode {
    /// Number of target evaluation codes
    pub const COUNT: usize = 6;

    pub const ALL: [Self; Self::COUNT] = [
        Self::NewPatientLevel3,
        Self::EstablishedLevel3,
        Self::NewPatientLevel4,
        Self::NewPatientLevel5,
        Self::EstablishedLevel4,
        Self::EstablishedLevel5,
    ];

    /// Exact match against the target codes
    #[must_use]
    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "99203" => Some(Self::NewPatientLevel3),
            "99213" => Some(Self::EstablishedLevel3),
            "99204" => Some(Self::NewPatientLevel4),
            "99205" => Some(Self::NewPatientLevel5),
            "99214" => Some(Self::EstablishedLevel4),
            "99215" => Some(Self::EstablishedLevel5),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NewPatientLevel3 => "99203",
            Self::EstablishedLevel3 => "99213",
            Self::NewPatientLevel4 => "99204",
            Self::NewPatientLevel5 => "99205",
            Self::EstablishedLevel4 => "99214",
            Self::EstablishedLevel5 => "99215",
        }
    }

    #[must_use]
    pub const fn level(self) -> EvalLevel {
        match self {
            Self::NewPatientLevel3 | Self::EstablishedLevel3 => EvalLevel::Level3,
            _ => EvalLevel::Level4Or5,
        }
    }

    /// Position in `ALL`
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Whether a HCPCS code is a procedure code
///
/// Codes shorter than four characters never are. Otherwise the first five
/// characters must all be digits and their value must lie in
/// `PROCEDURE_CODE_RANGE`.
#[must_use]
pub fn is_procedure_code(code: &str) -> bool {
    if code.len() < 4 {
        return false;
    }
    let head = &code.as_bytes()[..code.len().min(5)];
    if !head.iter().all(u8::is_ascii_digit) {
        return false;
    }
    let value = head
        .iter()
        .fold(0u32, |value, digit| value * 10 + u32::from(digit - b'0'));
    PROCEDURE_CODE_RANGE.contains(&value)
}

/// Classification of one utilization row's code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeClass {
    Evaluation(EvalCode),
    Procedure,
}

/// Classify a code; `None` for codes the aggregator ignores
#[must_use]
pub fn classify(code: &str) -> Option<CodeClass> {
    if let Some(eval) = EvalCode::parse(code) {
        return Some(CodeClass::Evaluation(eval));
    }
    is_procedure_code(code).then_some(CodeClass::Procedure)
}
