//! Error and diagnostics context for the BER/DER runtime
//!
//! Every codec operation returns [`CodecResult`]. A [`CodecError`] carries:
//! - the failure [`ErrorKind`] (mapped to a negative status code),
//! - up to [`MAX_ERROR_PARAMS`] ordered substitution parameters used to fill
//!   the `%s` placeholders of the kind's message template,
//! - up to [`MAX_STACK_FRAMES`] `(module, line)` frames recorded as the error
//!   crosses function boundaries.
//!
//! The kind is fixed when the error is created, so the root cause is never
//! overwritten by later propagation points. Frames are appended with
//! [`Traced::traced`], which records the caller location through
//! `#[track_caller]`.
//!
//! # Usage Example
//!
//! ```rust
//! use asn1rt_core::error::{CodecError, CodecResult, ErrorKind, Traced};
//!
//! fn inner() -> CodecResult<()> {
//!     Err(CodecError::new(ErrorKind::InvalidLength))
//! }
//!
//! fn outer() -> CodecResult<()> {
//!     inner().traced()
//! }
//!
//! let err = outer().unwrap_err();
//! assert_eq!(err.status(), -5);
//! assert_eq!(err.stack().len(), 2);
//! ```

use std::fmt;
use std::panic::Location;
use thiserror::Error;

/// Maximum number of substitution parameters kept per error
pub const MAX_ERROR_PARAMS: usize = 5;

/// Maximum number of stack frames kept per error
pub const MAX_STACK_FRAMES: usize = 8;

/// Closed set of failure kinds reported by the runtime
///
/// Each kind has a stable negative status code (see [`ErrorKind::code`]) and a
/// message template with positional `%s` placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Encode buffer overflow (fixed-capacity buffer exhausted)
    BufferOverflow,
    /// Unexpected end of buffer on decode
    EndOfBuffer,
    /// Expected tag not found at the decode cursor
    IdNotFound,
    /// Invalid object identifier
    InvalidObjectId,
    /// Invalid field length
    InvalidLength,
    /// Enumerated value not in the defined set
    InvalidEnum,
    /// Duplicate element in a SET
    SetDuplicate,
    /// Missing required element in a SET
    SetMissingRequired,
    /// Element not part of a SET
    NotInSet,
    /// SEQUENCE OF size exceeded
    SeqOverflow,
    /// Invalid CHOICE alternative
    InvalidOption,
    /// Memory could not be obtained
    NoMemory,
    /// Invalid hex string
    InvalidHexString,
    /// Invalid binary string
    InvalidBinaryString,
    /// Invalid REAL value
    InvalidReal,
    /// Content exceeds the capacity of a sized string
    StringOverflow,
    /// Invalid value specification
    BadValue,
    /// Reference to an undefined value
    UndefinedValue,
    /// Reference to an undefined type
    UndefinedType,
    /// Invalid tag encoding
    BadTag,
    /// Nesting level too deep
    TooDeep,
    /// Value constraint violation
    ConstraintViolation,
    /// Invalid range (lower bound greater than upper)
    RangeError,
    /// Unexpected end of file
    EndOfFile,
    /// Invalid UTF-8 encoding
    InvalidUtf8,
    /// Concurrent list modification
    ConcurrentModification,
    /// Illegal state for the attempted operation
    IllegalState,
    /// Index out of bounds
    OutOfBounds,
    /// Invalid parameter
    InvalidParam,
    /// Invalid string format
    InvalidFormat,
    /// Context not initialized
    NotInitialized,
    /// Value does not fit in the target type
    TooBig,
    /// Character outside the permitted alphabet
    InvalidChar,
    /// XML state error
    XmlState,
    /// XML parse error
    XmlParse,
    /// SEQUENCE elements out of order
    SeqOrder,
    /// Invalid table constraint index
    InvalidIndex,
    /// Invalid table constraint value
    InvalidTcValue,
    /// File not found
    FileNotFound,
    /// Read error
    ReadError,
    /// Write error
    WriteError,
    /// Invalid Base64 encoding
    InvalidBase64,
    /// Invalid socket operation
    InvalidSocket,
    /// Local host information unavailable
    HostUnavailable,
    /// File cannot be opened
    CantOpen,
    /// Array size violates a configured limit
    ArraySize,
    /// Evaluation period expired
    Expired,
    /// Missing (null) reference
    NullPtr,
    /// Too many sub-elements
    TooMany,
    /// Loop detected
    LoopDetected,
    /// Type is not a PDU
    NotPdu,
    /// Construct not supported by this runtime
    NotSupported,
}

const ALL_KINDS: [ErrorKind; 52] = [
    ErrorKind::BufferOverflow,
    ErrorKind::EndOfBuffer,
    ErrorKind::IdNotFound,
    ErrorKind::InvalidObjectId,
    ErrorKind::InvalidLength,
    ErrorKind::InvalidEnum,
    ErrorKind::SetDuplicate,
    ErrorKind::SetMissingRequired,
    ErrorKind::NotInSet,
    ErrorKind::SeqOverflow,
    ErrorKind::InvalidOption,
    ErrorKind::NoMemory,
    ErrorKind::InvalidHexString,
    ErrorKind::InvalidBinaryString,
    ErrorKind::InvalidReal,
    ErrorKind::StringOverflow,
    ErrorKind::BadValue,
    ErrorKind::UndefinedValue,
    ErrorKind::UndefinedType,
    ErrorKind::BadTag,
    ErrorKind::TooDeep,
    ErrorKind::ConstraintViolation,
    ErrorKind::RangeError,
    ErrorKind::EndOfFile,
    ErrorKind::InvalidUtf8,
    ErrorKind::ConcurrentModification,
    ErrorKind::IllegalState,
    ErrorKind::OutOfBounds,
    ErrorKind::InvalidParam,
    ErrorKind::InvalidFormat,
    ErrorKind::NotInitialized,
    ErrorKind::TooBig,
    ErrorKind::InvalidChar,
    ErrorKind::XmlState,
    ErrorKind::XmlParse,
    ErrorKind::SeqOrder,
    ErrorKind::InvalidIndex,
    ErrorKind::InvalidTcValue,
    ErrorKind::FileNotFound,
    ErrorKind::ReadError,
    ErrorKind::WriteError,
    ErrorKind::InvalidBase64,
    ErrorKind::InvalidSocket,
    ErrorKind::HostUnavailable,
    ErrorKind::CantOpen,
    ErrorKind::ArraySize,
    ErrorKind::Expired,
    ErrorKind::NullPtr,
    ErrorKind::TooMany,
    ErrorKind::LoopDetected,
    ErrorKind::NotPdu,
    ErrorKind::NotSupported,
];

impl ErrorKind {
    /// Negative status code of this kind
    pub fn code(self) -> i32 {
        match self {
            ErrorKind::BufferOverflow => -1,
            ErrorKind::EndOfBuffer => -2,
            ErrorKind::IdNotFound => -3,
            ErrorKind::InvalidObjectId => -4,
            ErrorKind::InvalidLength => -5,
            ErrorKind::InvalidEnum => -6,
            ErrorKind::SetDuplicate => -7,
            ErrorKind::SetMissingRequired => -8,
            ErrorKind::NotInSet => -9,
            ErrorKind::SeqOverflow => -10,
            ErrorKind::InvalidOption => -11,
            ErrorKind::NoMemory => -12,
            ErrorKind::InvalidHexString => -14,
            ErrorKind::InvalidBinaryString => -15,
            ErrorKind::InvalidReal => -16,
            ErrorKind::StringOverflow => -17,
            ErrorKind::BadValue => -18,
            ErrorKind::UndefinedValue => -19,
            ErrorKind::UndefinedType => -20,
            ErrorKind::BadTag => -21,
            ErrorKind::TooDeep => -22,
            ErrorKind::ConstraintViolation => -23,
            ErrorKind::RangeError => -24,
            ErrorKind::EndOfFile => -25,
            ErrorKind::InvalidUtf8 => -26,
            ErrorKind::ConcurrentModification => -27,
            ErrorKind::IllegalState => -28,
            ErrorKind::OutOfBounds => -29,
            ErrorKind::InvalidParam => -30,
            ErrorKind::InvalidFormat => -31,
            ErrorKind::NotInitialized => -32,
            ErrorKind::TooBig => -33,
            ErrorKind::InvalidChar => -34,
            ErrorKind::XmlState => -35,
            ErrorKind::XmlParse => -36,
            ErrorKind::SeqOrder => -37,
            ErrorKind::InvalidIndex => -38,
            ErrorKind::InvalidTcValue => -39,
            ErrorKind::FileNotFound => -40,
            ErrorKind::ReadError => -41,
            ErrorKind::WriteError => -42,
            ErrorKind::InvalidBase64 => -43,
            ErrorKind::InvalidSocket => -44,
            ErrorKind::HostUnavailable => -45,
            ErrorKind::CantOpen => -46,
            ErrorKind::ArraySize => -47,
            ErrorKind::Expired => -48,
            ErrorKind::NullPtr => -49,
            ErrorKind::TooMany => -50,
            ErrorKind::LoopDetected => -51,
            ErrorKind::NotPdu => -52,
            ErrorKind::NotSupported => -99,
        }
    }

    /// Look up the kind for a status code
    ///
    /// Returns `None` for 0 (success) and for codes outside the known set.
    pub fn from_code(code: i32) -> Option<Self> {
        ALL_KINDS.iter().copied().find(|kind| kind.code() == code)
    }

    /// Message template with `%s` placeholders
    pub fn template(self) -> &'static str {
        match self {
            ErrorKind::BufferOverflow => "Encode buffer overflow",
            ErrorKind::EndOfBuffer => "Unexpected end of buffer on decode",
            ErrorKind::IdNotFound => "Unexpected tag encountered: expected = %s, parsed = %s",
            ErrorKind::InvalidObjectId => "Invalid object identifier",
            ErrorKind::InvalidLength => "Invalid field length detected",
            ErrorKind::InvalidEnum => "Enumerated value %s not in defined set",
            ErrorKind::SetDuplicate => "Duplicate element in SET",
            ErrorKind::SetMissingRequired => "Missing required element in SET",
            ErrorKind::NotInSet => "Element with tag %s not part of SET",
            ErrorKind::SeqOverflow => "Max elements defined for SEQUENCE field exceeded",
            ErrorKind::InvalidOption => "Element with tag %s is an invalid option in choice",
            ErrorKind::NoMemory => "No dynamic memory available",
            ErrorKind::InvalidHexString => "Invalid hex string",
            ErrorKind::InvalidBinaryString => "Invalid binary string",
            ErrorKind::InvalidReal => "Invalid real value",
            ErrorKind::StringOverflow => "Max items in sized BIT or OCTET STRING field exceeded",
            ErrorKind::BadValue => "Invalid value specification",
            ErrorKind::UndefinedValue => "No definition found for referenced defined value",
            ErrorKind::UndefinedType => "No definition found for referenced defined type",
            ErrorKind::BadTag => "Invalid tag value",
            ErrorKind::TooDeep => "Nesting level too deep",
            ErrorKind::ConstraintViolation => "Value constraint violation: field %s, value %s",
            ErrorKind::RangeError => "Value range error: lower bound is greater than upper",
            ErrorKind::EndOfFile => "Unexpected end of file detected",
            ErrorKind::InvalidUtf8 => "Invalid UTF-8 character at index %s",
            ErrorKind::ConcurrentModification => {
                "List error: concurrent modification attempt while iterating"
            }
            ErrorKind::IllegalState => "List error: illegal state for attempted operation",
            ErrorKind::OutOfBounds => "Array index out of bounds",
            ErrorKind::InvalidParam => "Invalid parameter passed to function or method",
            ErrorKind::InvalidFormat => "Invalid time string format",
            ErrorKind::NotInitialized => "Context is not initialized",
            ErrorKind::TooBig => "ASN.1 value will not fit in target variable",
            ErrorKind::InvalidChar => "Character is not within the defined character set",
            ErrorKind::XmlState => "Invalid XML state for attempted operation",
            ErrorKind::XmlParse => "Error condition returned from XML parser:\n%s",
            ErrorKind::SeqOrder => "SEQUENCE elements not in correct order",
            ErrorKind::InvalidIndex => "Invalid index for table constraint identifier",
            ErrorKind::InvalidTcValue => {
                "Invalid value for relational table constraint fixed type field"
            }
            ErrorKind::FileNotFound => "File not found",
            ErrorKind::ReadError => "File read error",
            ErrorKind::WriteError => "File write error",
            ErrorKind::InvalidBase64 => "Invalid Base64 string",
            ErrorKind::InvalidSocket => "Socket error",
            ErrorKind::HostUnavailable => "Local host information is unavailable",
            ErrorKind::CantOpen => "File could not be opened",
            ErrorKind::ArraySize => "Array size violates configured limit",
            ErrorKind::Expired => "Evaluation period has expired",
            ErrorKind::NullPtr => "Missing or released value reference",
            ErrorKind::TooMany => "Too many sub-elements",
            ErrorKind::LoopDetected => "Loop detected",
            ErrorKind::NotPdu => "Type is not a PDU",
            ErrorKind::NotSupported => "Non-supported ASN.1 construct: %s",
        }
    }

    /// Whether generated code may reset this error and try an alternative
    ///
    /// Only a tag mismatch qualifies: it is how OPTIONAL fields and CHOICE
    /// arms are probed.
    pub fn is_recoverable(self) -> bool {
        matches!(self, ErrorKind::IdNotFound)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ({})", self, self.code())
    }
}

/// One propagation point of an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackFrame {
    /// Source file that recorded the frame
    pub module: &'static str,
    /// Line within the source file
    pub line: u32,
}

impl StackFrame {
    #[track_caller]
    fn here() -> Self {
        let location = Location::caller();
        Self {
            module: location.file(),
            line: location.line(),
        }
    }
}

/// Error value returned by every codec operation
///
/// # Diagnostics
///
/// - [`CodecError::message`] fills the kind's template from the parameters
/// - [`CodecError::text`] renders status, message and stack trace
/// - [`CodecError::log`] writes the rendered text through `log::error!`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", self.message())]
pub struct CodecError {
    kind: ErrorKind,
    params: Vec<String>,
    stack: Vec<StackFrame>,
}

impl CodecError {
    /// Create an error of the given kind, recording the caller as first frame
    #[track_caller]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            params: Vec::new(),
            stack: vec![StackFrame::here()],
        }
    }

    /// Add a substitution parameter (builder form)
    pub fn with_param(mut self, param: impl fmt::Display) -> Self {
        self.add_param(param);
        self
    }

    /// Add a substitution parameter
    ///
    /// # Returns
    /// `false` if the parameter list is already full and the value was dropped
    pub fn add_param(&mut self, param: impl fmt::Display) -> bool {
        if self.params.len() < MAX_ERROR_PARAMS {
            self.params.push(param.to_string());
            true
        } else {
            false
        }
    }

    /// Append the caller location to the stack trace
    ///
    /// Frames beyond [`MAX_STACK_FRAMES`] are dropped.
    #[track_caller]
    pub fn trace(mut self) -> Self {
        if self.stack.len() < MAX_STACK_FRAMES {
            self.stack.push(StackFrame::here());
        }
        self
    }

    /// Failure kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Negative status code of the failure kind
    pub fn status(&self) -> i32 {
        self.kind.code()
    }

    /// Substitution parameters in the order they were added
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Recorded frames, innermost first
    pub fn stack(&self) -> &[StackFrame] {
        &self.stack
    }

    /// See [`ErrorKind::is_recoverable`]
    pub fn is_recoverable(&self) -> bool {
        self.kind.is_recoverable()
    }

    /// Template of the kind with parameters substituted
    ///
    /// A placeholder without a matching parameter is rendered as `?`.
    pub fn message(&self) -> String {
        let template = self.kind.template();
        let mut out = String::with_capacity(template.len() + 16);
        let mut params = self.params.iter();
        let mut rest = template;
        while let Some(pos) = rest.find("%s") {
            out.push_str(&rest[..pos]);
            match params.next() {
                Some(param) => out.push_str(param),
                None => out.push('?'),
            }
            rest = &rest[pos + 2..];
        }
        out.push_str(rest);
        out
    }

    /// Full diagnostic text: status line, message and stack trace
    pub fn text(&self) -> String {
        let mut out = format!(
            "ASN.1 ERROR: Status {}\n{}\nStack trace:\n",
            self.status(),
            self.message()
        );
        for frame in self.stack.iter().rev() {
            out.push_str(&format!("  Module: {}, Line {}\n", frame.module, frame.line));
        }
        out
    }

    /// Write the diagnostic text to the `log` facade at error level
    pub fn log(&self) {
        log::error!("{}", self.text());
    }
}

impl From<ErrorKind> for CodecError {
    #[track_caller]
    fn from(kind: ErrorKind) -> Self {
        CodecError::new(kind)
    }
}

/// Result type alias for codec operations
pub type CodecResult<T> = Result<T, CodecError>;

/// Propagation helper recording a stack frame at each boundary
pub trait Traced {
    /// Push the caller location onto the error's stack trace, if any
    fn traced(self) -> Self;
}

impl<T> Traced for CodecResult<T> {
    #[track_caller]
    fn traced(self) -> Self {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(err.trace()),
        }
    }
}
