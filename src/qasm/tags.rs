//! Parameter tags and fixed parameter values of the QASM message set.

/// Client mnemonic identifier (REGISTER).
pub const CLIENT_ID: &str = "id";
/// Session token issued at registration.
pub const TOKEN: &str = "token";

/// Qureg size in qubits.
pub const QREG_QN: &str = "qr_n";
/// Qureg handle.
pub const QREG_H: &str = "qr_h";
/// Basis state index for a pure state set.
pub const QREG_ST_IDX: &str = "qr_stIdx";
/// Amplitude vector for an arbitrary state set, or the peeked state.
pub const QREG_ST_VALS: &str = "qr_stVals";
/// Measurement start qubit.
pub const QREG_M_QIDX: &str = "qr_mQidx";
/// Measurement length in qubits.
pub const QREG_M_QLEN: &str = "qr_mQlen";
/// Measurement random flag.
pub const QREG_M_RAND: &str = "qr_mRand";
/// Measured state collapse flag.
pub const QREG_M_COLL: &str = "qr_mStColl";
/// Measured state index.
pub const QREG_M_ST_IDX: &str = "qr_mStIdx";
/// Measured state probability.
pub const QREG_M_ST_PR: &str = "qr_mStPr";
/// Residual state index vector.
pub const QREG_M_ST_IDXS: &str = "qr_mStIdxs";
/// Expectation state index.
pub const QREG_EX_ST_IDX: &str = "qr_exStIdx";
/// Expectation start qubit.
pub const QREG_EX_QIDX: &str = "qr_exQidx";
/// Expectation length in qubits.
pub const QREG_EX_QLEN: &str = "qr_exQlen";
/// Expectation observable operator.
pub const QREG_EX_OBS_OP: &str = "qr_exObsOp";
/// Expectation value.
pub const QREG_EX_ST_VAL: &str = "qr_exStVal";

pub const F_TYPE: &str = "f_type";
pub const F_SIZE: &str = "f_size";
pub const F_REP: &str = "f_rep";
pub const F_LSQ: &str = "f_lsq";
pub const F_CRANGE: &str = "f_cRange";
pub const F_TRANGE: &str = "f_tRange";
pub const F_UTYPE: &str = "f_uType";
pub const F_ARGS: &str = "f_args";

pub const FQML_REP: &str = "fqml_rep";
pub const FQML_ENTANG: &str = "fqml_entang_type";
pub const FQML_SUBTYPE: &str = "fqml_subtype";

/// Response outcome, `Ok` or `Not-Ok`.
pub const RESULT: &str = "result";
/// Failure details on a `Not-Ok` response.
pub const ERROR: &str = "error";

pub const RESULT_OK: &str = "Ok";
pub const RESULT_NOT_OK: &str = "Not-Ok";
