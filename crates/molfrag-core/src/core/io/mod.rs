//! Encoding of molecules into the external tool's text exchange format.

pub mod lgf;
