use std::error::Error;
use std::fmt::{self, Display};

/// Canonical gRPC status codes.
///
/// The discriminants match the wire values, so a code can be recorded on a
/// span with a plain `as i32` cast.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
#[repr(i32)]
pub enum Code {
    Ok = 0,
    Cancelled = 1,
    Unknown = 2,
    InvalidArgument = 3,
    DeadlineExceeded = 4,
    NotFound = 5,
    AlreadyExists = 6,
    PermissionDenied = 7,
    ResourceExhausted = 8,
    FailedPrecondition = 9,
    Aborted = 10,
    OutOfRange = 11,
    Unimplemented = 12,
    Internal = 13,
    Unavailable = 14,
    DataLoss = 15,
    Unauthenticated = 16,
}

/// A structured, machine-readable RPC failure carrying a canonical code.
///
/// Errors reported at the end of a call are downcast against this type to
/// recover their code; anything else is classified as an opaque internal
/// failure.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RpcStatus {
    code: Code,
    message: String,
}

impl RpcStatus {
    pub fn new(code: Code, message: impl Into<String>) -> Self {
        RpcStatus {
            code,
            message: message.into(),
        }
    }

    pub fn code(&self) -> Code {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for RpcStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rpc error: code = {:?} desc = {}",
            self.code, self.message
        )
    }
}

impl Error for RpcStatus {}
