use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// # Error Categories
///
/// ## Wire Format Errors
/// - [`Error::Malformed`] - Corrupted or unrecognized snapshot data (unknown tag byte,
///   invalid UTF-8, unknown mapping source name, negative sequence count)
/// - [`Error::OutOfBounds`] - Attempted to read beyond the end of the byte stream
/// - [`Error::StringTooLong`] - A string exceeds the 65534-byte wire limit during encoding
///
/// ## Registry Errors
/// - [`Error::NamespaceNotFound`] - Lookup of a namespace identifier that was never registered
///
/// Decoding is all-or-nothing: any wire format error discards the partially built
/// container, and the stream cannot be resumed.
///
/// # Examples
///
/// ```rust
/// use mapdex::{codec, Error};
///
/// match codec::decode(&[0xFF]) {
///     Ok(container) => println!("decoded {}", container.name),
///     Err(Error::OutOfBounds) => eprintln!("stream truncated"),
///     Err(Error::Malformed { message, file, line }) => {
///         eprintln!("bad snapshot: {} ({}:{})", message, file, line);
///     }
///     Err(e) => eprintln!("other error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The byte stream is damaged and could not be decoded.
    ///
    /// The error includes the source location where the malformation was
    /// detected for debugging purposes.
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An out of bound access was attempted while decoding the stream.
    ///
    /// This error occurs when trying to read data beyond the end of the byte
    /// stream. It's a safety check to prevent buffer overruns during decoding,
    /// and is the error raised for truncated input.
    #[error("Out of Bound read would have occurred!")]
    OutOfBounds,

    /// A string is too long for the wire format.
    ///
    /// The length prefix of a string is a 16-bit value holding `utf8_len + 1`,
    /// so the longest representable payload is 65534 bytes. Encoding rejects a
    /// longer string before writing any part of it, leaving the stream intact
    /// up to that point.
    #[error("String of {0} UTF-8 bytes exceeds the 65534-byte wire limit")]
    StringTooLong(usize),

    /// Lookup of a namespace identifier that has not been registered.
    ///
    /// Namespaces must be registered before they can be looked up; hitting this
    /// at steady state is a programmer error, not an expected condition.
    #[error("Namespace '{0}' has not been registered")]
    NamespaceNotFound(String),

    /// Generic error for miscellaneous failures.
    ///
    /// Used for errors that don't fit into other categories, such as a source
    /// refresh exceeding its deadline, or for wrapping failures from data-source
    /// implementations with additional context.
    #[error("{0}")]
    Error(String),
}
