//! Binary encoding: marker catalogue, system strings, compact string forms
//! and node-level decoding.

pub mod marker;
pub mod strings;
pub mod system_strings;

pub(crate) mod value;

pub(crate) use value::BinaryPayload;
