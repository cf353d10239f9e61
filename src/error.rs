//! Error status shared by the peripheral and DSP functions.

use core::fmt;

/// Failure status of a fallible operation.
///
/// The numeric codes are the negative `arm_status` values so that results can
/// be handed to C code expecting them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// One or more arguments are incorrect.
    ArgumentError,
    /// Length of data buffer is incorrect.
    LengthError,
    /// Size of matrices is not compatible with the operation.
    SizeMismatch,
    /// Not-a-number (NaN) or infinity is generated.
    NanInf,
    /// Input matrix is singular and cannot be inverted.
    Singular,
    /// Test failed.
    TestFailure,
}

pub type Result<T> = core::result::Result<T, Error>;

impl Error {
    /// Returns the numeric status code.
    #[inline]
    pub fn code(self) -> i8 {
        match self {
            Error::ArgumentError => -1,
            Error::LengthError => -2,
            Error::SizeMismatch => -3,
            Error::NanInf => -4,
            Error::Singular => -5,
            Error::TestFailure => -6,
        }
    }

    /// Decodes a numeric status code. `0` and unknown codes yield `None`.
    #[inline]
    pub fn from_code(code: i8) -> Option<Self> {
        match code {
            -1 => Some(Error::ArgumentError),
            -2 => Some(Error::LengthError),
            -3 => Some(Error::SizeMismatch),
            -4 => Some(Error::NanInf),
            -5 => Some(Error::Singular),
            -6 => Some(Error::TestFailure),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Error::ArgumentError => "argument error",
            Error::LengthError => "length error",
            Error::SizeMismatch => "size mismatch",
            Error::NanInf => "NaN or infinity generated",
            Error::Singular => "singular matrix",
            Error::TestFailure => "test failure",
        };
        f.write_str(msg)
    }
}

/// Converts a result into the numeric status code, `0` meaning success.
#[inline]
pub fn status<T>(result: &Result<T>) -> i8 {
    match result {
        Ok(_) => 0,
        Err(e) => e.code(),
    }
}
