//! Error conversion implementations.
//!
//! This module contains From trait implementations to convert from internal
//! error types to the unified Error type.

#[cfg(feature = "ooxml")]
use super::types::Error;

#[cfg(feature = "ooxml")]
impl From<crate::ooxml::error::OoxmlError> for Error {
    fn from(err: crate::ooxml::error::OoxmlError) -> Self {
        use crate::ooxml::error::OoxmlError;

        match err {
            OoxmlError::Io(e) => Error::Io(e),
            OoxmlError::Xml(s) => Error::XmlError(s),
            OoxmlError::Zip(s) => Error::ZipError(s),
            OoxmlError::PartNotFound(s) => Error::ComponentNotFound(s),
            OoxmlError::InvalidFormat(s) => Error::InvalidFormat(s),
            OoxmlError::RevisionOutOfRange { index, count } => {
                Error::RevisionOutOfRange { index, count }
            },
            OoxmlError::Unsupported(s) => Error::Unsupported(s),
        }
    }
}

#[cfg(feature = "ooxml")]
impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlError(err.to_string())
    }
}

#[cfg(feature = "ooxml")]
impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipError(err.to_string())
    }
}
