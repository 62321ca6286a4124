//! Function descriptors for qureg state transformations.
//!
//! A transform request names a gate or block (`f_type`), where it applies
//! (`f_size`, `f_rep`, `f_lsq`, control/target ranges), an optional
//! sub-function for controlled-U forms (`f_uType`) and a typed argument list
//! (`f_args`).
//!
//! The argument list layout the server accepts depends only on the function
//! category and, for n-qubit gates, on the sub-function category. That
//! mapping is the [`SHAPE_TABLE`] below; the encoder validates caller
//! arguments against it before anything is sent.

use std::fmt;

use thiserror::Error;

use crate::qasm::encode::IndexRange;
use crate::qasm::tags;

/// Gate and block types, numbered as on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionType {
    // 1 qubit
    I,
    H,
    X,
    Y,
    Z,
    SX,
    /// Phase shift.
    PS,
    T,
    S,
    Rx,
    Ry,
    Rz,
    // 2 qubits
    /// Controlled-U with a 1-qubit sub-function.
    CU,
    CX,
    CY,
    CZ,
    // n qubits
    /// Multi-controlled short/long range U.
    McsLru,
    /// Toffoli.
    Ccx,
    // function blocks
    SwapQ1,
    SwapQn,
    CswapQ1,
    CswapQn,
    // QML function blocks
    QmlFeatureMap,
    QmlQnet,
}

const FUNCTION_CODES: &[(FunctionType, i32)] = &[
    (FunctionType::I, 0),
    (FunctionType::H, 1),
    (FunctionType::X, 2),
    (FunctionType::Y, 3),
    (FunctionType::Z, 4),
    (FunctionType::SX, 5),
    (FunctionType::PS, 6),
    (FunctionType::T, 7),
    (FunctionType::S, 8),
    (FunctionType::Rx, 9),
    (FunctionType::Ry, 10),
    (FunctionType::Rz, 11),
    (FunctionType::CU, 12),
    (FunctionType::CX, 13),
    (FunctionType::CY, 14),
    (FunctionType::CZ, 15),
    (FunctionType::McsLru, 16),
    (FunctionType::Ccx, 17),
    (FunctionType::SwapQ1, 100),
    (FunctionType::SwapQn, 101),
    (FunctionType::CswapQ1, 102),
    (FunctionType::CswapQn, 103),
    (FunctionType::QmlFeatureMap, 200),
    (FunctionType::QmlQnet, 201),
];

impl FunctionType {
    /// Wire code (`f_type` / `f_uType` value).
    pub fn code(self) -> i32 {
        FUNCTION_CODES
            .iter()
            .find(|(ft, _)| *ft == self)
            .map(|(_, code)| *code)
            .unwrap_or(-1)
    }

    pub fn from_code(code: i32) -> Option<Self> {
        FUNCTION_CODES
            .iter()
            .find(|(_, c)| *c == code)
            .map(|(ft, _)| *ft)
    }

    pub fn category(self) -> FunctionCategory {
        use FunctionType::*;
        match self {
            PS | Rx | Ry | Rz => FunctionCategory::SingleQubitParametric,
            I | H | X | Y | Z | SX | T | S => FunctionCategory::SingleQubit,
            CU => FunctionCategory::ControlledU,
            CX | CY | CZ => FunctionCategory::TwoQubit,
            McsLru | Ccx => FunctionCategory::MultiQubit,
            SwapQ1 | SwapQn | CswapQ1 | CswapQn => FunctionCategory::Block,
            QmlFeatureMap | QmlQnet => FunctionCategory::QmlBlock,
        }
    }

    pub fn is_single_qubit(self) -> bool {
        matches!(
            self.category(),
            FunctionCategory::SingleQubit | FunctionCategory::SingleQubitParametric
        )
    }

    /// Gate applied through a sub-function (`f_uType`).
    pub fn requires_sub_function(self) -> bool {
        matches!(self, FunctionType::CU | FunctionType::McsLru)
    }
}

impl fmt::Display for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self, self.code())
    }
}

/// Argument-layout families of [`FunctionType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionCategory {
    SingleQubit,
    SingleQubitParametric,
    ControlledU,
    TwoQubit,
    MultiQubit,
    Block,
    QmlBlock,
}

/// Sub-function family, relevant for n-qubit gates only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubCategory {
    /// No sub-function given.
    Absent,
    /// 1-qubit sub-function.
    SingleQubit,
    /// 2-qubit or wider sub-function.
    Wider,
}

impl SubCategory {
    pub fn of(sub_function: Option<FunctionType>) -> Self {
        match sub_function {
            None => SubCategory::Absent,
            Some(ft) if ft.is_single_qubit() => SubCategory::SingleQubit,
            Some(_) => SubCategory::Wider,
        }
    }
}

/// Argument list layout expected by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgShape {
    /// No arguments; anything supplied is dropped.
    Empty,
    /// At most one double; extras are dropped.
    OptionalDouble,
    /// Control range, target range, then at most one double.
    RangesThenOptionalDouble,
    /// One or more doubles, all sent.
    Doubles,
}

struct ShapeRule {
    category: FunctionCategory,
    /// `None` matches any sub-category.
    sub: Option<SubCategory>,
    shape: ArgShape,
}

const fn rule(category: FunctionCategory, sub: Option<SubCategory>, shape: ArgShape) -> ShapeRule {
    ShapeRule {
        category,
        sub,
        shape,
    }
}

/// `(category, sub-category) -> shape`. First match wins.
const SHAPE_TABLE: &[ShapeRule] = &[
    rule(FunctionCategory::SingleQubit, None, ArgShape::Empty),
    rule(FunctionCategory::SingleQubitParametric, None, ArgShape::OptionalDouble),
    rule(FunctionCategory::ControlledU, None, ArgShape::OptionalDouble),
    rule(FunctionCategory::TwoQubit, None, ArgShape::Empty),
    rule(FunctionCategory::MultiQubit, Some(SubCategory::Absent), ArgShape::Empty),
    rule(FunctionCategory::MultiQubit, Some(SubCategory::SingleQubit), ArgShape::OptionalDouble),
    rule(FunctionCategory::MultiQubit, Some(SubCategory::Wider), ArgShape::RangesThenOptionalDouble),
    rule(FunctionCategory::Block, None, ArgShape::Empty),
    rule(FunctionCategory::QmlBlock, None, ArgShape::Doubles),
];

/// Look up the argument layout for a function and optional sub-function.
pub fn arg_shape(ftype: FunctionType, sub_function: Option<FunctionType>) -> ArgShape {
    let category = ftype.category();
    let sub = SubCategory::of(sub_function);
    SHAPE_TABLE
        .iter()
        .find(|r| r.category == category && r.sub.map_or(true, |s| s == sub))
        .map(|r| r.shape)
        .unwrap_or(ArgShape::Empty)
}

/// One typed function argument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FunctionArg {
    /// Reserved by the protocol; no current gate takes one.
    Int(i64),
    Double(f64),
    Range(IndexRange),
}

impl FunctionArg {
    pub fn kind(&self) -> ArgKind {
        match self {
            FunctionArg::Int(_) => ArgKind::Int,
            FunctionArg::Double(_) => ArgKind::Double,
            FunctionArg::Range(_) => ArgKind::Range,
        }
    }
}

/// `value|TYPE` with `TYPE` one of `I`, `D`, `R`.
impl fmt::Display for FunctionArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionArg::Int(v) => write!(f, "{}|I", v),
            FunctionArg::Double(v) => write!(f, "{:?}|D", v),
            FunctionArg::Range(r) => write!(f, "{}|R", r),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    Int,
    Double,
    Range,
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ArgKind::Int => "integer",
            ArgKind::Double => "double",
            ArgKind::Range => "range",
        })
    }
}

/// Caller-supplied arguments do not fit the function's layout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentShapeError {
    #[error("{ftype}: argument {position} must be a {expected}, got a {found}")]
    WrongType {
        ftype: FunctionType,
        position: usize,
        expected: ArgKind,
        found: ArgKind,
    },

    #[error("{ftype}: missing required {expected} argument at position {position}")]
    Missing {
        ftype: FunctionType,
        position: usize,
        expected: ArgKind,
    },

    #[error("{ftype} requires a sub-function type")]
    MissingSubFunction { ftype: FunctionType },

    #[error("{sub_function} cannot be used as sub-function of {ftype}")]
    InvalidSubFunction {
        ftype: FunctionType,
        sub_function: FunctionType,
    },

    /// QML blocks carry their own parameters; see [`QmlBlock`].
    #[error("{ftype} must be sent as a QML block")]
    QmlBlockType { ftype: FunctionType },
}

/// Encode `args` as `"[a1,a2,...]"` following `shape`.
///
/// Trailing arguments beyond the shape are dropped; missing or wrong-typed
/// required arguments are an error.
pub fn encode_args(
    ftype: FunctionType,
    shape: ArgShape,
    args: &[FunctionArg],
) -> Result<String, ArgumentShapeError> {
    let take_arg = |position: usize, expected: ArgKind| match args.get(position) {
        Some(arg) if arg.kind() == expected => Ok(*arg),
        Some(arg) => Err(ArgumentShapeError::WrongType {
            ftype,
            position,
            expected,
            found: arg.kind(),
        }),
        None => Err(ArgumentShapeError::Missing {
            ftype,
            position,
            expected,
        }),
    };

    let selected: Vec<FunctionArg> = match shape {
        ArgShape::Empty => Vec::new(),
        ArgShape::OptionalDouble => match args.first() {
            Some(_) => vec![take_arg(0, ArgKind::Double)?],
            None => Vec::new(),
        },
        ArgShape::RangesThenOptionalDouble => {
            let mut selected = vec![take_arg(0, ArgKind::Range)?, take_arg(1, ArgKind::Range)?];
            if args.len() > 2 {
                selected.push(take_arg(2, ArgKind::Double)?);
            }
            selected
        }
        ArgShape::Doubles => {
            take_arg(0, ArgKind::Double)?;
            (0..args.len())
                .map(|i| take_arg(i, ArgKind::Double))
                .collect::<Result<_, _>>()?
        }
    };

    let body: Vec<String> = selected.iter().map(ToString::to_string).collect();
    Ok(format!("[{}]", body.join(",")))
}

/// Gate or block applied by a state transform request.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDescriptor {
    pub ftype: FunctionType,
    /// Operand dimension, `2^k` for a `k`-qubit function.
    pub size: u32,
    /// Repetition count.
    pub rep: u32,
    /// Least-significant-qubit offset.
    pub lsq: u32,
    pub control: IndexRange,
    pub target: IndexRange,
    /// Sub-function for controlled-U forms.
    pub sub_function: Option<FunctionType>,
    pub args: Vec<FunctionArg>,
}

impl FunctionDescriptor {
    pub fn new(ftype: FunctionType, size: u32, rep: u32, lsq: u32) -> Self {
        Self {
            ftype,
            size,
            rep,
            lsq,
            control: IndexRange::Empty,
            target: IndexRange::Empty,
            sub_function: None,
            args: Vec::new(),
        }
    }

    pub fn with_control(mut self, control: IndexRange) -> Self {
        self.control = control;
        self
    }

    pub fn with_target(mut self, target: IndexRange) -> Self {
        self.target = target;
        self
    }

    pub fn with_sub_function(mut self, sub_function: FunctionType) -> Self {
        self.sub_function = Some(sub_function);
        self
    }

    pub fn with_arg(mut self, arg: FunctionArg) -> Self {
        self.args.push(arg);
        self
    }

    pub fn arg_shape(&self) -> ArgShape {
        arg_shape(self.ftype, self.sub_function)
    }

    /// Validate and encode the `f_*` parameters in wire order.
    pub fn to_params(&self) -> Result<Vec<(&'static str, String)>, ArgumentShapeError> {
        if self.ftype.category() == FunctionCategory::QmlBlock {
            return Err(ArgumentShapeError::QmlBlockType { ftype: self.ftype });
        }
        if self.ftype.requires_sub_function() && self.sub_function.is_none() {
            return Err(ArgumentShapeError::MissingSubFunction { ftype: self.ftype });
        }
        if let Some(sub) = self.sub_function {
            let valid = match self.ftype {
                FunctionType::CU => sub.is_single_qubit(),
                _ => sub.is_single_qubit() || sub.category() == FunctionCategory::TwoQubit
                    || sub.category() == FunctionCategory::ControlledU,
            };
            if !valid {
                return Err(ArgumentShapeError::InvalidSubFunction {
                    ftype: self.ftype,
                    sub_function: sub,
                });
            }
        }

        let f_args = encode_args(self.ftype, self.arg_shape(), &self.args)?;

        let mut params = vec![
            (tags::F_TYPE, self.ftype.code().to_string()),
            (tags::F_SIZE, self.size.to_string()),
            (tags::F_REP, self.rep.to_string()),
            (tags::F_LSQ, self.lsq.to_string()),
            (tags::F_CRANGE, self.control.to_string()),
            (tags::F_TRANGE, self.target.to_string()),
        ];
        if let Some(sub) = self.sub_function {
            params.push((tags::F_UTYPE, sub.code().to_string()));
        }
        params.push((tags::F_ARGS, f_args));
        Ok(params)
    }
}

// =============================================================================
// QML function blocks
// =============================================================================

/// Qubit entanglement pattern inside a QML block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entanglement {
    Linear,
    Circular,
}

impl Entanglement {
    pub fn code(self) -> i32 {
        match self {
            Entanglement::Linear => 0,
            Entanglement::Circular => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureMapKind {
    PauliZ,
    PauliZZ,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QnetLayout {
    RealAmplitudes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QmlBlockKind {
    FeatureMap(FeatureMapKind),
    QNetwork(QnetLayout),
}

impl QmlBlockKind {
    pub fn function_type(self) -> FunctionType {
        match self {
            QmlBlockKind::FeatureMap(_) => FunctionType::QmlFeatureMap,
            QmlBlockKind::QNetwork(_) => FunctionType::QmlQnet,
        }
    }

    /// `fqml_subtype` value.
    pub fn subtype_code(self) -> i32 {
        match self {
            QmlBlockKind::FeatureMap(FeatureMapKind::PauliZ) => 0,
            QmlBlockKind::FeatureMap(FeatureMapKind::PauliZZ) => 1,
            QmlBlockKind::QNetwork(QnetLayout::RealAmplitudes) => 0,
        }
    }
}

/// Feature-map or q-network block expanded server-side into core gates.
#[derive(Debug, Clone, PartialEq)]
pub struct QmlBlock {
    pub kind: QmlBlockKind,
    /// Block repetitions, at least 1.
    pub rep: u32,
    /// `None` is sent as -1 (Pauli-Z feature maps ignore it).
    pub entanglement: Option<Entanglement>,
    /// Feature vector (feature map) or network parameters (q-network).
    pub values: Vec<f64>,
}

impl QmlBlock {
    pub fn to_params(&self) -> Result<Vec<(&'static str, String)>, ArgumentShapeError> {
        let ftype = self.kind.function_type();
        let args: Vec<FunctionArg> = self.values.iter().copied().map(FunctionArg::Double).collect();
        let f_args = encode_args(ftype, arg_shape(ftype, None), &args)?;

        Ok(vec![
            (tags::F_TYPE, ftype.code().to_string()),
            (tags::FQML_REP, self.rep.to_string()),
            (
                tags::FQML_ENTANG,
                self.entanglement.map_or(-1, Entanglement::code).to_string(),
            ),
            (tags::FQML_SUBTYPE, self.kind.subtype_code().to_string()),
            (tags::F_ARGS, f_args),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn d(v: f64) -> FunctionArg {
        FunctionArg::Double(v)
    }

    fn r(low: u32, high: u32) -> FunctionArg {
        FunctionArg::Range(IndexRange::Span(low, high))
    }

    fn args_for(ftype: FunctionType, sub: Option<FunctionType>, args: &[FunctionArg]) -> String {
        encode_args(ftype, arg_shape(ftype, sub), args).expect("Encode failed")
    }

    #[test]
    fn test_function_codes_roundtrip() {
        for (ft, code) in FUNCTION_CODES {
            assert_eq!(ft.code(), *code);
            assert_eq!(FunctionType::from_code(*code), Some(*ft));
        }
        assert_eq!(FunctionType::from_code(18), None);
        assert_eq!(FunctionType::from_code(-1), None);
    }

    #[test]
    fn test_shape_table_dispatch() {
        use FunctionType::*;
        assert_eq!(arg_shape(H, None), ArgShape::Empty);
        assert_eq!(arg_shape(Rx, None), ArgShape::OptionalDouble);
        assert_eq!(arg_shape(CU, Some(PS)), ArgShape::OptionalDouble);
        assert_eq!(arg_shape(CX, None), ArgShape::Empty);
        assert_eq!(arg_shape(McsLru, Some(Rz)), ArgShape::OptionalDouble);
        assert_eq!(arg_shape(McsLru, Some(CX)), ArgShape::RangesThenOptionalDouble);
        assert_eq!(arg_shape(McsLru, Some(CU)), ArgShape::RangesThenOptionalDouble);
        assert_eq!(arg_shape(Ccx, None), ArgShape::Empty);
        assert_eq!(arg_shape(SwapQn, None), ArgShape::Empty);
        assert_eq!(arg_shape(QmlQnet, None), ArgShape::Doubles);
    }

    #[test]
    fn test_single_qubit_non_parametric_drops_args() {
        assert_eq!(args_for(FunctionType::H, None, &[]), "[]");
        assert_eq!(args_for(FunctionType::X, None, &[d(0.5)]), "[]");
    }

    #[test]
    fn test_single_qubit_parametric() {
        assert_eq!(args_for(FunctionType::PS, None, &[]), "[]");
        assert_eq!(args_for(FunctionType::Ry, None, &[d(0.5)]), "[0.5|D]");
        assert_eq!(args_for(FunctionType::Rz, None, &[d(1.0), d(2.0), d(3.0)]), "[1.0|D]");
    }

    #[test]
    fn test_two_qubit_args() {
        assert_eq!(args_for(FunctionType::CU, Some(FunctionType::Rx), &[d(0.25), d(9.0)]), "[0.25|D]");
        assert_eq!(args_for(FunctionType::CZ, None, &[d(0.25)]), "[]");
    }

    #[test]
    fn test_n_qubit_args() {
        use FunctionType::*;
        assert_eq!(args_for(McsLru, Some(H), &[]), "[]");
        assert_eq!(args_for(McsLru, Some(PS), &[d(3.5)]), "[3.5|D]");
        assert_eq!(
            args_for(McsLru, Some(CX), &[r(0, 1), r(4, 4)]),
            "[(0, 1)|R,(4, 4)|R]"
        );
        assert_eq!(
            args_for(McsLru, Some(CU), &[r(0, 1), FunctionArg::Range(IndexRange::Single(3)), d(0.5), d(7.0)]),
            "[(0, 1)|R,(3)|R,0.5|D]"
        );
    }

    #[test]
    fn test_n_qubit_wide_sub_function_requires_ranges() {
        let shape = arg_shape(FunctionType::McsLru, Some(FunctionType::CX));

        assert_eq!(
            encode_args(FunctionType::McsLru, shape, &[r(0, 1)]),
            Err(ArgumentShapeError::Missing {
                ftype: FunctionType::McsLru,
                position: 1,
                expected: ArgKind::Range,
            })
        );
        assert_eq!(
            encode_args(FunctionType::McsLru, shape, &[d(0.5), r(0, 1)]),
            Err(ArgumentShapeError::WrongType {
                ftype: FunctionType::McsLru,
                position: 0,
                expected: ArgKind::Range,
                found: ArgKind::Double,
            })
        );
    }

    #[test]
    fn test_optional_double_rejects_wrong_type() {
        let result = encode_args(
            FunctionType::Rx,
            ArgShape::OptionalDouble,
            &[FunctionArg::Int(1)],
        );
        assert!(matches!(
            result,
            Err(ArgumentShapeError::WrongType {
                found: ArgKind::Int,
                ..
            })
        ));
    }

    #[test]
    fn test_function_arg_display() {
        assert_eq!(FunctionArg::Int(-4).to_string(), "-4|I");
        assert_eq!(d(0.1).to_string(), "0.1|D");
        assert_eq!(FunctionArg::Range(IndexRange::Empty).to_string(), "(-1, -1)|R");
    }

    #[test]
    fn test_descriptor_params_for_hadamard() {
        let params = FunctionDescriptor::new(FunctionType::H, 2, 1, 1)
            .to_params()
            .expect("Encode failed");

        assert_eq!(
            params,
            vec![
                (tags::F_TYPE, "1".to_string()),
                (tags::F_SIZE, "2".to_string()),
                (tags::F_REP, "1".to_string()),
                (tags::F_LSQ, "1".to_string()),
                (tags::F_CRANGE, "(-1, -1)".to_string()),
                (tags::F_TRANGE, "(-1, -1)".to_string()),
                (tags::F_ARGS, "[]".to_string()),
            ]
        );
    }

    #[test]
    fn test_descriptor_params_for_controlled_u() {
        let params = FunctionDescriptor::new(FunctionType::CU, 4, 1, 0)
            .with_control(IndexRange::Single(0))
            .with_target(IndexRange::Single(1))
            .with_sub_function(FunctionType::PS)
            .with_arg(d(0.75))
            .to_params()
            .expect("Encode failed");

        let tags_in_order: Vec<&str> = params.iter().map(|(t, _)| *t).collect();
        assert_eq!(
            tags_in_order,
            vec!["f_type", "f_size", "f_rep", "f_lsq", "f_cRange", "f_tRange", "f_uType", "f_args"]
        );
        assert_eq!(params[6].1, "6");
        assert_eq!(params[7].1, "[0.75|D]");
    }

    #[test]
    fn test_descriptor_validates_sub_function() {
        let missing = FunctionDescriptor::new(FunctionType::CU, 4, 1, 0).to_params();
        assert_eq!(
            missing,
            Err(ArgumentShapeError::MissingSubFunction {
                ftype: FunctionType::CU
            })
        );

        let too_wide = FunctionDescriptor::new(FunctionType::CU, 4, 1, 0)
            .with_sub_function(FunctionType::CX)
            .to_params();
        assert!(matches!(
            too_wide,
            Err(ArgumentShapeError::InvalidSubFunction { .. })
        ));

        let qml = FunctionDescriptor::new(FunctionType::QmlFeatureMap, 2, 1, 0).to_params();
        assert!(matches!(qml, Err(ArgumentShapeError::QmlBlockType { .. })));
    }

    #[test]
    fn test_qml_block_params() {
        let block = QmlBlock {
            kind: QmlBlockKind::FeatureMap(FeatureMapKind::PauliZZ),
            rep: 2,
            entanglement: Some(Entanglement::Circular),
            values: vec![0.5, 1.5],
        };

        assert_eq!(
            block.to_params().expect("Encode failed"),
            vec![
                (tags::F_TYPE, "200".to_string()),
                (tags::FQML_REP, "2".to_string()),
                (tags::FQML_ENTANG, "1".to_string()),
                (tags::FQML_SUBTYPE, "1".to_string()),
                (tags::F_ARGS, "[0.5|D,1.5|D]".to_string()),
            ]
        );
    }

    #[test]
    fn test_qml_block_needs_values() {
        let block = QmlBlock {
            kind: QmlBlockKind::QNetwork(QnetLayout::RealAmplitudes),
            rep: 1,
            entanglement: None,
            values: vec![],
        };

        assert!(matches!(
            block.to_params(),
            Err(ArgumentShapeError::Missing { position: 0, .. })
        ));
    }
}
