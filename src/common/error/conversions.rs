//! Error conversion implementations.
//!
//! This module contains From trait implementations to convert from
//! collaborator error types to the unified Error type.

use super::types::Error;

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

impl From<quick_xml::escape::EscapeError> for Error {
    fn from(err: quick_xml::escape::EscapeError) -> Self {
        Error::Xml(err.to_string())
    }
}

impl From<std::str::Utf8Error> for Error {
    fn from(err: std::str::Utf8Error) -> Self {
        Error::Xml(format!("invalid UTF-8: {}", err))
    }
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Error::Xml(format!("invalid UTF-8: {}", err))
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::Zip(err.to_string())
    }
}
